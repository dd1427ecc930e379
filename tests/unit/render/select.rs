use super::*;

fn q(n: u8) -> QualityLevel {
    QualityLevel::new(n).unwrap()
}

#[test]
fn levels_map_to_strategies() {
    let s = select(q(0), Lens::Rectilinear, 640, 480, true);
    assert_eq!(s.strategy, Strategy::FastRaster { antialias: false });
    let s = select(q(1), Lens::Rectilinear, 640, 480, true);
    assert_eq!(s.strategy, Strategy::FastRaster { antialias: true });
    let s = select(q(2), Lens::Rectilinear, 640, 480, true);
    assert_eq!(
        s.strategy,
        Strategy::PhysicallyBased {
            fidelity: Fidelity::Low
        }
    );
    let s = select(q(3), Lens::Rectilinear, 640, 480, true);
    assert_eq!(
        s.strategy,
        Strategy::PhysicallyBased {
            fidelity: Fidelity::High
        }
    );
}

#[test]
fn fast_path_adjusts_height_for_lens() {
    let s = select(q(0), Lens::Fisheye, 640, 480, true);
    assert_eq!((s.width, s.height), (640, 640));
    let s = select(q(1), Lens::Spherical, 640, 480, true);
    assert_eq!((s.width, s.height), (640, 1280));
    let s = select(q(1), Lens::Rectilinear, 640, 480, true);
    assert_eq!((s.width, s.height), (640, 480));
    let s = select(q(0), Lens::Spherical, u32::MAX, 1, true);
    assert_eq!(s.height, u32::MAX);
}

#[test]
fn physical_path_keeps_dimensions_for_any_lens() {
    for lens in [Lens::Rectilinear, Lens::Fisheye, Lens::Spherical] {
        let s = select(q(3), lens, 640, 480, true);
        assert_eq!((s.width, s.height), (640, 480));
    }
}

#[test]
fn missing_offscreen_raises_fast_levels() {
    let s = select(q(0), Lens::Fisheye, 640, 480, false);
    assert_eq!(s.level.get(), 2);
    assert_eq!(
        s.strategy,
        Strategy::PhysicallyBased {
            fidelity: Fidelity::Low
        }
    );
    assert_eq!((s.width, s.height), (640, 480));

    assert_eq!(select(q(3), Lens::Rectilinear, 1, 1, false).level.get(), 3);
    assert_eq!(min_supported_level(true), QualityLevel::FASTEST);
}

#[test]
fn selection_is_idempotent() {
    let a = select(q(1), Lens::Spherical, 300, 200, true);
    let b = select(q(1), Lens::Spherical, 300, 200, true);
    assert_eq!(a, b);
}

#[test]
fn out_of_range_levels_are_rejected_or_clamped() {
    assert!(matches!(
        QualityLevel::new(QUALITY_LEVEL_COUNT),
        Err(HomeshotError::Configuration(_))
    ));
    assert_eq!(QualityLevel::clamped(200), QualityLevel::BEST);
    assert!(serde_json::from_str::<QualityLevel>("9").is_err());
    assert_eq!(serde_json::from_str::<QualityLevel>("1").unwrap().get(), 1);
}
