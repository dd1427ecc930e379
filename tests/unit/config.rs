use super::*;

#[test]
fn empty_json_gives_defaults() {
    let cfg = BatchConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, BatchConfig::default());
    assert_eq!(cfg.output_format(), OutputFormat::png());
    assert_eq!(cfg.capture_opts().swap_timeout, Duration::from_millis(1000));
}

#[test]
fn jpeg_settings_and_aspect_ratio_apply() {
    let cfg = BatchConfig::from_reader(
        r#"{"width": 1600, "aspect_ratio": "16:9", "format": "jpeg", "compression_quality": 0.7, "quality": 9}"#
            .as_bytes(),
    )
    .unwrap();
    let size = cfg.photo_size();
    assert_eq!((size.width(), size.height()), (1600, 900));
    assert_eq!(cfg.output_format(), OutputFormat::jpeg(0.7));
    assert_eq!(cfg.quality_level(), QualityLevel::BEST);
}

#[test]
fn invalid_configs_are_rejected() {
    for json in [
        r#"{"format": "jpeg"}"#,
        r#"{"format": "png", "compression_quality": 0.5}"#,
        r#"{"format": "jpeg", "compression_quality": 1.5}"#,
        r#"{"width": 0}"#,
        r#"{"capture_timeout_ms": 0}"#,
        r#"{"colour": "red"}"#,
    ] {
        let err = BatchConfig::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, HomeshotError::Configuration(_)), "{json}");
    }
}

#[test]
fn request_for_plans_one_destination_per_viewpoint() {
    let cfg = BatchConfig {
        width: 320,
        height: 200,
        ..BatchConfig::default()
    };
    let vps = vec![
        Viewpoint::new("Front", [0.0, 0.0, 0.0], 0.0, 0.0),
        Viewpoint::new("Front", [1.0, 0.0, 0.0], 0.0, 0.0),
    ];
    let req = cfg.request_for("Villa", &vps, Path::new("out")).unwrap();
    assert_eq!((req.width, req.height), (320, 200));
    assert_eq!(req.targets.len(), 2);
    assert_ne!(req.targets[0].destination, req.targets[1].destination);
    assert!(req.validate().is_ok());
}
