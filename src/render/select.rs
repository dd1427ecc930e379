//! Quality-tiered strategy selection.
//!
//! Levels `0..=1` use the fast rasterizer through an offscreen capture, levels `2..` use the
//! physically based renderer. Selection is pure: the same inputs always give the same result.

use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::scene::camera::Lens;
use serde::{Deserialize, Serialize};

/// Number of quality levels.
pub const QUALITY_LEVEL_COUNT: u8 = 4;

/// First level served by the physically based renderer.
const FIRST_PHYSICAL_LEVEL: u8 = 2;

/// Validated quality ordinal in `0..QUALITY_LEVEL_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct QualityLevel(u8);

impl QualityLevel {
    /// Lowest level.
    pub const FASTEST: QualityLevel = QualityLevel(0);
    /// Highest level.
    pub const BEST: QualityLevel = QualityLevel(QUALITY_LEVEL_COUNT - 1);

    /// Validate `level`.
    pub fn new(level: u8) -> HomeshotResult<Self> {
        if level >= QUALITY_LEVEL_COUNT {
            return Err(HomeshotError::configuration(format!(
                "quality level {level} is out of range 0..{QUALITY_LEVEL_COUNT}"
            )));
        }
        Ok(Self(level))
    }

    /// Cap `level` at the highest valid level.
    pub fn clamped(level: u8) -> Self {
        Self(level.min(QUALITY_LEVEL_COUNT - 1))
    }

    /// Ordinal value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// `true` for levels served by the fast rasterizer.
    pub fn is_fast(self) -> bool {
        self.0 < FIRST_PHYSICAL_LEVEL
    }
}

impl TryFrom<u8> for QualityLevel {
    type Error = HomeshotError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<QualityLevel> for u8 {
    fn from(value: QualityLevel) -> Self {
        value.0
    }
}

/// Lowest usable level given the offscreen capability.
pub fn min_supported_level(offscreen_available: bool) -> QualityLevel {
    if offscreen_available {
        QualityLevel::FASTEST
    } else {
        QualityLevel(FIRST_PHYSICAL_LEVEL)
    }
}

/// Sampling budget of the physically based renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fidelity {
    /// Level 2.
    Low,
    /// Level 3 and above.
    High,
}

/// How a frame is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Rasterize in the live view and capture it offscreen.
    FastRaster {
        /// Multisampling on (level 1) or off (level 0).
        antialias: bool,
    },
    /// Synchronous physically based render.
    PhysicallyBased {
        /// Sampling budget.
        fidelity: Fidelity,
    },
}

/// Outcome of [`select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    /// Effective level after clamping.
    pub level: QualityLevel,
    /// Rendering strategy.
    pub strategy: Strategy,
    /// Output width.
    pub width: u32,
    /// Output height, adjusted for the lens on the fast path.
    pub height: u32,
}

/// Choose the strategy and output dimensions for one viewpoint.
///
/// Without an offscreen surface the fast levels are unavailable and the level is raised to
/// the first physically based one. On the fast path the height follows the lens: a fisheye
/// is square and a spherical panorama is twice as tall as wide. The physically based path
/// keeps the requested dimensions; lens handling is the renderer's job there.
pub fn select(
    level: QualityLevel,
    lens: Lens,
    width: u32,
    height: u32,
    offscreen_available: bool,
) -> Selection {
    let level = level.max(min_supported_level(offscreen_available));
    if level.is_fast() {
        let height = match lens {
            Lens::Rectilinear => height,
            Lens::Fisheye => width,
            Lens::Spherical => width.saturating_mul(2),
        };
        Selection {
            level,
            strategy: Strategy::FastRaster {
                antialias: level.get() == 1,
            },
            width,
            height,
        }
    } else {
        let fidelity = if level.get() == FIRST_PHYSICAL_LEVEL {
            Fidelity::Low
        } else {
            Fidelity::High
        };
        Selection {
            level,
            strategy: Strategy::PhysicallyBased { fidelity },
            width,
            height,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/select.rs"]
mod tests;
