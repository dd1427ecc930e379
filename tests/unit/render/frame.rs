use super::*;

#[test]
fn filled_frame_has_expected_pixels() {
    let f = FrameBuffer::filled(3, 2, [1, 2, 3, 4]).unwrap();
    assert_eq!(f.data().len(), 24);
    assert_eq!(f.pixel(2, 1), Some([1, 2, 3, 4]));
    assert_eq!(f.pixel(3, 0), None);
}

#[test]
fn overflowing_size_is_resource_exhaustion() {
    let err = FrameBuffer::new(u32::MAX, u32::MAX).unwrap_err();
    assert!(matches!(err, HomeshotError::ResourceExhausted(_)));
}

#[test]
fn from_rgba8_checks_length() {
    assert!(FrameBuffer::from_rgba8(2, 2, vec![0; 16]).is_ok());
    let err = FrameBuffer::from_rgba8(2, 2, vec![0; 15]).unwrap_err();
    assert!(matches!(err, HomeshotError::Render(_)));
}

#[test]
fn crop_copies_rows() {
    let mut f = FrameBuffer::new(4, 4).unwrap();
    f.set_pixel(1, 2, [9, 9, 9, 9]);
    let c = f.crop(1, 1, 2, 2).unwrap();
    assert_eq!((c.width(), c.height()), (2, 2));
    assert_eq!(c.pixel(0, 1), Some([9, 9, 9, 9]));
    assert_eq!(c.pixel(1, 1), Some([0, 0, 0, 0]));

    assert!(f.crop(3, 3, 2, 1).is_err());
}
