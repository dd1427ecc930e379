use super::*;
use crate::encode::writer::MemoryFs;

fn vp(name: &str) -> Viewpoint {
    Viewpoint::new(name, [0.0, 0.0, 0.0], 0.0, 0.0)
}

#[test]
fn names_join_document_and_viewpoint() {
    assert_eq!(
        photo_file_name("Villa", "Front", &OutputFormat::png()),
        "Villa - Front.png"
    );
    assert_eq!(
        photo_file_name("", "Front", &OutputFormat::jpeg(0.5)),
        "Front.jpg"
    );
    assert_eq!(photo_file_name("Villa", " ", &OutputFormat::png()), "Villa - view.png");
}

#[test]
fn separators_are_replaced() {
    assert_eq!(
        photo_file_name("a/b\\c", "d:e;f", &OutputFormat::png()),
        "a-b-c - d-e-f.png"
    );
}

#[test]
fn duplicate_viewpoint_names_get_suffixes() {
    let dir = Path::new("out");
    let paths = plan_destinations(
        dir,
        "Villa",
        &[vp("Front"), vp("Back"), vp("Front"), vp("Front")],
        &OutputFormat::png(),
    );
    assert_eq!(
        paths,
        vec![
            dir.join("Villa - Front.png"),
            dir.join("Villa - Back.png"),
            dir.join("Villa - Front (2).png"),
            dir.join("Villa - Front (3).png"),
        ]
    );
}

#[test]
fn existing_destinations_are_reported() {
    let fs = MemoryFs::new().with_file("out/Villa - Back.png", vec![0]);
    let paths = plan_destinations(
        Path::new("out"),
        "Villa",
        &[vp("Front"), vp("Back")],
        &OutputFormat::png(),
    );
    assert_eq!(
        existing_destinations(&fs, &paths),
        vec![PathBuf::from("out/Villa - Back.png")]
    );
}
