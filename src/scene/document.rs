use crate::foundation::core::Rgba8;
use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::scene::camera::Viewpoint;
use crate::scene::color::SceneColor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The home model as seen by the rendering pipeline.
///
/// Implementations must deep-copy on `clone`: the batch job renders from a private clone
/// so edits made by the caller while a job runs never reach the worker.
pub trait SceneDocument: Clone + Send + 'static {
    /// Document name used in output file names; empty when unnamed.
    fn name(&self) -> &str;

    /// Stored viewpoints, in display order.
    fn viewpoints(&self) -> &[Viewpoint];

    /// Point the document's camera at `viewpoint`.
    fn set_camera(&mut self, viewpoint: &Viewpoint);

    /// Drop any interactive selection so it is not drawn into output images.
    fn clear_selection(&mut self);

    /// Stored viewpoint by name.
    fn viewpoint(&self, name: &str) -> Option<&Viewpoint> {
        self.viewpoints().iter().find(|v| v.name == name)
    }
}

/// Axis-aligned box standing on the plan, the only geometry the built-in renderers draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Minimum plan x.
    pub x: f64,
    /// Minimum plan y.
    pub y: f64,
    /// Base elevation.
    #[serde(default)]
    pub z: f64,
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub depth: f64,
    /// Extent along z.
    pub height: f64,
    /// Surface color.
    pub color: SceneColor,
}

impl Block {
    pub(crate) fn corners(&self) -> [[f64; 3]; 8] {
        let (x0, y0, z0) = (self.x, self.y, self.z);
        let (x1, y1, z1) = (x0 + self.width, y0 + self.depth, z0 + self.height);
        [
            [x0, y0, z0],
            [x1, y0, z0],
            [x1, y1, z0],
            [x0, y1, z0],
            [x0, y0, z1],
            [x1, y0, z1],
            [x1, y1, z1],
            [x0, y1, z1],
        ]
    }
}

fn default_background() -> SceneColor {
    SceneColor::rgb(204, 224, 255)
}

/// JSON-backed home scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeScene {
    /// Document name.
    #[serde(default)]
    pub name: String,
    /// Stored viewpoints.
    #[serde(default)]
    pub viewpoints: Vec<Viewpoint>,
    /// Scene geometry.
    #[serde(default)]
    pub blocks: Vec<Block>,
    /// Background shown by the live view.
    #[serde(default = "default_background")]
    pub background: SceneColor,
    /// Indices of selected blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selection: Vec<usize>,
    /// Current camera.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Viewpoint>,
}

impl HomeScene {
    /// Empty named scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            viewpoints: Vec::new(),
            blocks: Vec::new(),
            background: default_background(),
            selection: Vec::new(),
            camera: None,
        }
    }

    /// Load from JSON.
    pub fn from_reader(reader: impl std::io::Read) -> HomeshotResult<Self> {
        let scene: Self = serde_json::from_reader(reader)
            .map_err(|e| HomeshotError::configuration(format!("scene json parse failed: {e}")))?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> HomeshotResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| HomeshotError::io(path, e))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Reject scenes the renderers cannot draw.
    pub fn validate(&self) -> HomeshotResult<()> {
        for (i, b) in self.blocks.iter().enumerate() {
            let dims = [b.x, b.y, b.z, b.width, b.depth, b.height];
            if dims.iter().any(|v| !v.is_finite()) {
                return Err(HomeshotError::configuration(format!(
                    "block {i} has a non-finite coordinate"
                )));
            }
            if b.width <= 0.0 || b.depth <= 0.0 || b.height <= 0.0 {
                return Err(HomeshotError::configuration(format!(
                    "block {i} must have positive width, depth and height"
                )));
            }
        }
        if let Some(i) = self.selection.iter().find(|&&i| i >= self.blocks.len()) {
            return Err(HomeshotError::configuration(format!(
                "selection references missing block {i}"
            )));
        }
        Ok(())
    }

    /// Background as straight RGBA8.
    pub fn background_rgba8(&self) -> Rgba8 {
        self.background.rgba8()
    }
}

impl SceneDocument for HomeScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn viewpoints(&self) -> &[Viewpoint] {
        &self.viewpoints
    }

    fn set_camera(&mut self, viewpoint: &Viewpoint) {
        self.camera = Some(viewpoint.clone());
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/document.rs"]
mod tests;
