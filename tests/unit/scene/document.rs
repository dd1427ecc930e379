use super::*;

const SCENE: &str = r##"{
    "name": "Villa",
    "viewpoints": [
        {"name": "Front", "x": 0, "y": -600, "z": 170},
        {"name": "Top", "x": 0, "y": 0, "z": 900, "pitch": 1.5}
    ],
    "blocks": [
        {"x": -100, "y": -100, "width": 200, "depth": 200, "height": 250, "color": "#aa3322"}
    ],
    "selection": [0]
}"##;

#[test]
fn loads_and_looks_up_viewpoints() {
    let scene = HomeScene::from_reader(SCENE.as_bytes()).unwrap();
    assert_eq!(scene.name(), "Villa");
    assert_eq!(scene.viewpoints().len(), 2);
    assert_eq!(scene.viewpoint("Top").unwrap().z, 900.0);
    assert!(scene.viewpoint("Back").is_none());
    assert_eq!(scene.background_rgba8(), [204, 224, 255, 255]);
}

#[test]
fn clone_is_independent_of_later_edits() {
    let mut scene = HomeScene::from_reader(SCENE.as_bytes()).unwrap();
    let mut copy = scene.clone();
    copy.clear_selection();
    copy.set_camera(&scene.viewpoints[1].clone());

    assert_eq!(scene.selection, vec![0]);
    assert!(scene.camera.is_none());

    scene.blocks.clear();
    assert_eq!(copy.blocks.len(), 1);
    assert_eq!(copy.camera.as_ref().unwrap().name, "Top");
}

#[test]
fn invalid_blocks_are_rejected() {
    let err = HomeScene::from_reader(
        r##"{"blocks":[{"x":0,"y":0,"width":0,"depth":1,"height":1,"color":"#000000"}]}"##
            .as_bytes(),
    )
    .unwrap_err();
    assert!(matches!(err, HomeshotError::Configuration(_)));

    let err = HomeScene::from_reader(r#"{"selection":[3]}"#.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("missing block"));

    let err = HomeScene::from_reader("not json".as_bytes()).unwrap_err();
    assert!(err.to_string().contains("scene json parse failed"));
}

#[test]
fn block_corners_span_extent() {
    let scene = HomeScene::from_reader(SCENE.as_bytes()).unwrap();
    let c = scene.blocks[0].corners();
    assert_eq!(c[0], [-100.0, -100.0, 0.0]);
    assert_eq!(c[6], [100.0, 100.0, 250.0]);
}
