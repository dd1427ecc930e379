use crate::encode::format::OutputFormat;
use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::render::select::QualityLevel;
use crate::scene::camera::Viewpoint;
use std::collections::HashSet;
use std::path::PathBuf;

/// One output: where a viewpoint's image goes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    /// Camera to render from.
    pub viewpoint: Viewpoint,
    /// Output file path.
    pub destination: PathBuf,
}

/// Everything a batch job needs; immutable once submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Outputs in render order.
    pub targets: Vec<RenderTarget>,
    /// Requested width in pixels.
    pub width: u32,
    /// Requested height in pixels.
    pub height: u32,
    /// Quality ordinal, validated against [`QUALITY_LEVEL_COUNT`](crate::QUALITY_LEVEL_COUNT).
    pub quality: u8,
    /// File format and compression quality.
    pub format: OutputFormat,
}

impl RenderRequest {
    /// Empty request; add outputs with [`target`](Self::target).
    pub fn new(width: u32, height: u32, quality: u8, format: OutputFormat) -> Self {
        Self {
            targets: Vec::new(),
            width,
            height,
            quality,
            format,
        }
    }

    /// Append an output.
    pub fn target(mut self, viewpoint: Viewpoint, destination: impl Into<PathBuf>) -> Self {
        self.targets.push(RenderTarget {
            viewpoint,
            destination: destination.into(),
        });
        self
    }

    /// Pair `viewpoints` with `destinations` one to one.
    pub fn with_targets(
        mut self,
        viewpoints: Vec<Viewpoint>,
        destinations: Vec<PathBuf>,
    ) -> HomeshotResult<Self> {
        if viewpoints.len() != destinations.len() {
            return Err(HomeshotError::configuration(format!(
                "{} viewpoints but {} destinations",
                viewpoints.len(),
                destinations.len()
            )));
        }
        self.targets.extend(
            viewpoints
                .into_iter()
                .zip(destinations)
                .map(|(viewpoint, destination)| RenderTarget {
                    viewpoint,
                    destination,
                }),
        );
        Ok(self)
    }

    /// Check the request and return its quality level.
    pub fn validate(&self) -> HomeshotResult<QualityLevel> {
        if self.targets.is_empty() {
            return Err(HomeshotError::configuration(
                "render request has no viewpoints",
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(HomeshotError::configuration(format!(
                "output size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        let level = QualityLevel::new(self.quality)?;
        self.format.validate()?;

        let mut seen = HashSet::with_capacity(self.targets.len());
        for t in &self.targets {
            if t.destination.as_os_str().is_empty() {
                return Err(HomeshotError::configuration(format!(
                    "viewpoint \"{}\" has an empty destination",
                    t.viewpoint.name
                )));
            }
            if !seen.insert(&t.destination) {
                return Err(HomeshotError::configuration(format!(
                    "destination '{}' is used more than once",
                    t.destination.display()
                )));
            }
        }
        Ok(level)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/request.rs"]
mod tests;
