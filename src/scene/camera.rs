use serde::{Deserialize, Serialize};

/// Field of view used when a viewpoint stores `0`.
pub const DEFAULT_FIELD_OF_VIEW: f64 = 63.0 * std::f64::consts::PI / 180.0;

/// Projection model of a viewpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lens {
    /// Ordinary pinhole projection.
    #[default]
    Rectilinear,
    /// Circular fisheye; output is square.
    Fisheye,
    /// Equirectangular panorama; output is twice as tall as wide.
    Spherical,
}

/// A named camera placement.
///
/// Positions use plan coordinates: `x`/`y` on the floor plan and `z` for elevation.
/// `yaw` turns around the vertical axis, positive `pitch` looks down. Angles are in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    /// Display name, also used to derive output file names.
    pub name: String,
    /// Plan x.
    pub x: f64,
    /// Plan y.
    pub y: f64,
    /// Elevation.
    pub z: f64,
    /// Heading.
    #[serde(default)]
    pub yaw: f64,
    /// Tilt.
    #[serde(default)]
    pub pitch: f64,
    /// Horizontal field of view; `0` selects [`DEFAULT_FIELD_OF_VIEW`].
    #[serde(default)]
    pub field_of_view: f64,
    /// Projection model.
    #[serde(default)]
    pub lens: Lens,
}

impl Viewpoint {
    /// Rectilinear viewpoint with the default field of view.
    pub fn new(name: impl Into<String>, position: [f64; 3], yaw: f64, pitch: f64) -> Self {
        Self {
            name: name.into(),
            x: position[0],
            y: position[1],
            z: position[2],
            yaw,
            pitch,
            field_of_view: 0.0,
            lens: Lens::Rectilinear,
        }
    }

    /// Replace the lens.
    pub fn with_lens(mut self, lens: Lens) -> Self {
        self.lens = lens;
        self
    }

    /// Replace the horizontal field of view.
    pub fn with_field_of_view(mut self, radians: f64) -> Self {
        self.field_of_view = radians;
        self
    }

    /// Field of view actually used for projection.
    pub fn effective_field_of_view(&self) -> f64 {
        if self.field_of_view > 0.0 && self.field_of_view.is_finite() {
            self.field_of_view.min(std::f64::consts::PI * 0.99)
        } else {
            DEFAULT_FIELD_OF_VIEW
        }
    }

    pub(crate) fn basis(&self) -> CameraBasis {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        CameraBasis {
            eye: [self.x, self.y, self.z],
            right: [cy, sy, 0.0],
            up: [-sy * sp, cy * sp, cp],
            forward: [-sy * cp, cy * cp, -sp],
        }
    }
}

/// Orthonormal camera frame derived from a [`Viewpoint`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct CameraBasis {
    pub(crate) eye: [f64; 3],
    pub(crate) right: [f64; 3],
    pub(crate) up: [f64; 3],
    pub(crate) forward: [f64; 3],
}

impl CameraBasis {
    /// World point to camera space `(right, up, depth)`.
    pub(crate) fn to_camera(self, p: [f64; 3]) -> [f64; 3] {
        let d = [p[0] - self.eye[0], p[1] - self.eye[1], p[2] - self.eye[2]];
        [dot(d, self.right), dot(d, self.up), dot(d, self.forward)]
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
#[path = "../../tests/unit/scene/camera.rs"]
mod tests;
