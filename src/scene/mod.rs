//! Scene-side inputs of the pipeline: viewpoints, documents, colors and photo geometry.

/// Photo aspect ratios and size derivation.
pub mod aspect;
/// Camera viewpoints and lenses.
pub mod camera;
/// Scene color parsing.
pub mod color;
/// Document trait and the JSON home scene.
pub mod document;
