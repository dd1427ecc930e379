use super::*;

#[test]
fn hex_forms_parse() {
    assert_eq!(
        SceneColor::parse_hex("#FF8000").unwrap(),
        SceneColor([255, 128, 0, 255])
    );
    assert_eq!(
        SceneColor::parse_hex("ff800080").unwrap(),
        SceneColor([255, 128, 0, 128])
    );
    assert!(SceneColor::parse_hex("#fff").is_err());
    assert!(SceneColor::parse_hex("#gg0000").is_err());
}

#[test]
fn object_and_array_forms_deserialize() {
    let c: SceneColor = serde_json::from_str(r#"{"r":1.0,"g":0.0,"b":0.5}"#).unwrap();
    assert_eq!(c, SceneColor([255, 0, 128, 255]));

    let c: SceneColor = serde_json::from_str("[0.0, 1.0, 0.0, 0.0]").unwrap();
    assert_eq!(c, SceneColor([0, 255, 0, 0]));

    assert!(serde_json::from_str::<SceneColor>("[1.0]").is_err());
}

#[test]
fn serializes_as_hex() {
    let s = serde_json::to_string(&SceneColor::rgb(1, 2, 255)).unwrap();
    assert_eq!(s, "\"#0102ffff\"");
}
