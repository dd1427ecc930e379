use super::*;

#[test]
fn fixed_ratios_derive_height_from_width() {
    let s = PhotoSize::new(800, 1, AspectRatio::Ratio4x3, 1.0);
    assert_eq!((s.width(), s.height()), (800, 600));

    let s = PhotoSize::new(1920, 1, AspectRatio::Ratio16x9, 1.0);
    assert_eq!((s.width(), s.height()), (1920, 1080));

    let s = PhotoSize::new(301, 7, AspectRatio::Ratio3x2, 1.0);
    assert_eq!(s.height(), 201);
}

#[test]
fn free_ratio_keeps_both_dimensions() {
    let s = PhotoSize::new(640, 123, AspectRatio::Free, 2.0)
        .with_width(700)
        .with_height(50);
    assert_eq!((s.width(), s.height()), (700, 50));
}

#[test]
fn view_ratio_is_used_only_for_view3d() {
    let s = PhotoSize::new(400, 1, AspectRatio::View3d, 2.0);
    assert_eq!(s.height(), 200);
    let s = s.with_height(300);
    assert_eq!(s.width(), 600);

    assert_eq!(AspectRatio::View3d.value(0.0), None);
    assert_eq!(AspectRatio::Square.value(5.0), Some(1.0));
}

#[test]
fn ratios_use_readable_names_in_json() {
    let r: AspectRatio = serde_json::from_str("\"16:9\"").unwrap();
    assert_eq!(r, AspectRatio::Ratio16x9);
    let r: AspectRatio = serde_json::from_str("\"view3d\"").unwrap();
    assert_eq!(r, AspectRatio::View3d);
}
