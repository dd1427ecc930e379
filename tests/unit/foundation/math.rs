use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn unpremultiply_restores_straight_channels() {
    let mut px = vec![64, 32, 0, 128, 10, 20, 30, 255, 9, 9, 9, 0];
    unpremultiply_in_place(&mut px);
    assert_eq!(&px[0..4], &[128, 64, 0, 128]);
    assert_eq!(&px[4..8], &[10, 20, 30, 255]);
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);
}

#[test]
fn flatten_over_white() {
    assert_eq!(flatten_over([0, 0, 0, 0], [255, 255, 255]), [255, 255, 255]);
    assert_eq!(flatten_over([10, 20, 30, 255], [255, 255, 255]), [10, 20, 30]);
    let half = flatten_over([0, 0, 0, 128], [255, 255, 255]);
    assert!(half[0] > 120 && half[0] < 135);
}
