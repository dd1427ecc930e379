use serde::{Deserialize, Serialize};

/// Constraint between photo width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    /// Width and height are independent.
    #[default]
    Free,
    /// Follows the live 3D view; the ratio is supplied at resolution time.
    View3d,
    /// 4:3.
    #[serde(rename = "4:3")]
    Ratio4x3,
    /// 3:2.
    #[serde(rename = "3:2")]
    Ratio3x2,
    /// 16:9.
    #[serde(rename = "16:9")]
    Ratio16x9,
    /// 1:1.
    Square,
}

impl AspectRatio {
    /// Width over height, `None` when unconstrained.
    ///
    /// `view_ratio` is only consulted for [`AspectRatio::View3d`].
    pub fn value(self, view_ratio: f64) -> Option<f64> {
        match self {
            AspectRatio::Free => None,
            AspectRatio::View3d => (view_ratio.is_finite() && view_ratio > 0.0).then_some(view_ratio),
            AspectRatio::Ratio4x3 => Some(4.0 / 3.0),
            AspectRatio::Ratio3x2 => Some(1.5),
            AspectRatio::Ratio16x9 => Some(16.0 / 9.0),
            AspectRatio::Square => Some(1.0),
        }
    }
}

/// Photo dimensions kept consistent with an [`AspectRatio`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoSize {
    width: u32,
    height: u32,
    ratio: Option<f64>,
}

impl PhotoSize {
    /// Start from `width` x `height`; a constrained ratio recomputes the height.
    pub fn new(width: u32, height: u32, aspect: AspectRatio, view_ratio: f64) -> Self {
        let size = Self {
            width: width.max(1),
            height: height.max(1),
            ratio: aspect.value(view_ratio),
        };
        size.with_width(size.width)
    }

    /// Set the width and derive the height from the ratio.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width.max(1);
        if let Some(r) = self.ratio {
            self.height = clamp_dim(f64::from(self.width) / r);
        }
        self
    }

    /// Set the height and derive the width from the ratio.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height.max(1);
        if let Some(r) = self.ratio {
            self.width = clamp_dim(f64::from(self.height) * r);
        }
        self
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

fn clamp_dim(v: f64) -> u32 {
    v.round().clamp(1.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/scene/aspect.rs"]
mod tests;
