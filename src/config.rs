//! JSON batch configuration.

use crate::encode::format::{FileFormat, OutputFormat};
use crate::encode::naming::plan_destinations;
use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::job::batch::BatchOpts;
use crate::job::request::RenderRequest;
use crate::render::capture::CaptureOpts;
use crate::render::select::QualityLevel;
use crate::scene::aspect::{AspectRatio, PhotoSize};
use crate::scene::camera::Viewpoint;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Persistent settings for batch renders.
///
/// Every field is optional in JSON; missing fields take their [`Default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    /// Photo width.
    pub width: u32,
    /// Photo height; recomputed from the width unless the aspect ratio is free.
    pub height: u32,
    /// Width/height constraint.
    pub aspect_ratio: AspectRatio,
    /// Ratio of the live 3D view, used by [`AspectRatio::View3d`].
    pub view_ratio: f64,
    /// Quality level; values past the last level are clamped.
    pub quality: u8,
    /// Output container.
    pub format: FileFormat,
    /// JPEG quality in `(0, 1]`.
    pub compression_quality: Option<f32>,
    /// Swap wait of offscreen captures, in milliseconds.
    pub capture_timeout_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            aspect_ratio: AspectRatio::Free,
            view_ratio: 4.0 / 3.0,
            quality: 0,
            format: FileFormat::Png,
            compression_quality: None,
            capture_timeout_ms: 1000,
        }
    }
}

impl BatchConfig {
    /// Parse JSON.
    pub fn from_reader(reader: impl std::io::Read) -> HomeshotResult<Self> {
        let cfg: Self = serde_json::from_reader(reader).map_err(|e| {
            HomeshotError::configuration(format!("batch config json parse failed: {e}"))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> HomeshotResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path).map_err(|e| HomeshotError::io(path, e))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    /// Reject settings no request could be built from.
    pub fn validate(&self) -> HomeshotResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HomeshotError::configuration(format!(
                "photo size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.capture_timeout_ms == 0 {
            return Err(HomeshotError::configuration(
                "capture_timeout_ms must be positive",
            ));
        }
        self.output_format().validate()
    }

    /// File format plus compression quality.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat {
            format: self.format,
            compression_quality: self.compression_quality,
        }
    }

    /// Photo dimensions after applying the aspect ratio.
    pub fn photo_size(&self) -> PhotoSize {
        PhotoSize::new(self.width, self.height, self.aspect_ratio, self.view_ratio)
    }

    /// Quality level, clamped to the valid range.
    pub fn quality_level(&self) -> QualityLevel {
        let level = QualityLevel::clamped(self.quality);
        if level.get() != self.quality {
            tracing::warn!(
                requested = self.quality,
                used = level.get(),
                "quality level clamped"
            );
        }
        level
    }

    /// Capture timing.
    pub fn capture_opts(&self) -> CaptureOpts {
        CaptureOpts {
            swap_timeout: Duration::from_millis(self.capture_timeout_ms),
        }
    }

    /// Renderer options.
    pub fn batch_opts(&self) -> BatchOpts {
        BatchOpts {
            capture: self.capture_opts(),
            ..BatchOpts::default()
        }
    }

    /// Request rendering `viewpoints` into `out_dir` with derived file names.
    pub fn request_for(
        &self,
        document_name: &str,
        viewpoints: &[Viewpoint],
        out_dir: &Path,
    ) -> HomeshotResult<RenderRequest> {
        let size = self.photo_size();
        let format = self.output_format();
        let destinations = plan_destinations(out_dir, document_name, viewpoints, &format);
        RenderRequest::new(
            size.width(),
            size.height(),
            self.quality_level().get(),
            format,
        )
        .with_targets(viewpoints.to_vec(), destinations)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
