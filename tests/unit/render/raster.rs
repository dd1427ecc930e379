use super::*;
use crate::render::backend::NoProgress;
use crate::scene::color::SceneColor;
use crate::scene::document::Block;
use std::sync::Mutex;

#[derive(Default)]
struct Recorder(Mutex<Vec<f32>>);

impl RenderProgress for Recorder {
    fn report(&self, fraction: f32) {
        self.0.lock().unwrap().push(fraction);
    }
}

fn one_block_scene() -> HomeScene {
    let mut scene = HomeScene::new("Test");
    scene.blocks.push(Block {
        x: -100.0,
        y: -100.0,
        z: 0.0,
        width: 200.0,
        depth: 200.0,
        height: 200.0,
        color: SceneColor::parse_hex("#aa3322").unwrap(),
    });
    scene
}

fn front() -> Viewpoint {
    Viewpoint::new("Front", [0.0, -600.0, 100.0], 0.0, 0.0)
}

const BG: Rgba8 = [204, 224, 255, 255];

#[test]
fn block_face_covers_center_and_background_fills_corners() {
    let scene = one_block_scene();
    let f = rasterize(&scene, &front(), 64, 64, BG, 1, &NoProgress).unwrap();
    assert_eq!(f.pixel(32, 32), Some([137, 41, 27, 255]));
    assert_eq!(f.pixel(0, 0), Some(BG));
    assert_eq!(f.pixel(63, 63), Some(BG));
}

#[test]
fn supersampling_keeps_interior_and_background_exact() {
    let scene = one_block_scene();
    let f = rasterize(&scene, &front(), 64, 64, [255, 255, 255, 255], 4, &NoProgress).unwrap();
    assert_eq!(f.pixel(32, 32), Some([137, 41, 27, 255]));
    assert_eq!(f.pixel(1, 1), Some([255, 255, 255, 255]));
}

#[test]
fn selected_blocks_are_tinted() {
    let mut scene = one_block_scene();
    scene.selection.push(0);
    let f = rasterize(&scene, &front(), 64, 64, BG, 1, &NoProgress).unwrap();
    assert_ne!(f.pixel(32, 32), Some([137, 41, 27, 255]));
}

#[test]
fn geometry_behind_the_camera_is_skipped() {
    let scene = one_block_scene();
    let away = Viewpoint::new("Away", [0.0, -600.0, 100.0], std::f64::consts::PI, 0.0);
    let f = rasterize(&scene, &away, 16, 16, BG, 1, &NoProgress).unwrap();
    assert!(f.data().chunks_exact(4).all(|px| px == BG));
}

#[test]
fn progress_is_reported_per_band() {
    let scene = one_block_scene();
    let rec = Recorder::default();
    rasterize(&scene, &front(), 8, 600, BG, 1, &rec).unwrap();
    let seen = rec.0.lock().unwrap().clone();
    assert_eq!(seen.len(), 3);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(seen.last().copied(), Some(1.0));
}

#[test]
fn oversized_or_empty_frames_are_render_errors() {
    let scene = one_block_scene();
    let err = rasterize(&scene, &front(), 40_000, 1, BG, 2, &NoProgress).unwrap_err();
    assert!(matches!(err, HomeshotError::Render(_)));
    let err = rasterize(&scene, &front(), 0, 10, BG, 1, &NoProgress).unwrap_err();
    assert!(matches!(err, HomeshotError::Render(_)));
}
