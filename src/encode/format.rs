use crate::foundation::error::{HomeshotError, HomeshotResult};
use serde::{Deserialize, Serialize};

/// Output file container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Lossless, keeps alpha.
    Png,
    /// Lossy, no alpha.
    #[serde(alias = "jpg")]
    Jpeg,
}

impl FileFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            FileFormat::Png => "png",
            FileFormat::Jpeg => "jpg",
        }
    }
}

impl std::str::FromStr for FileFormat {
    type Err = HomeshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(FileFormat::Png),
            "jpeg" | "jpg" => Ok(FileFormat::Jpeg),
            other => Err(HomeshotError::configuration(format!(
                "unknown file format \"{other}\" (expected png or jpeg)"
            ))),
        }
    }
}

/// File format plus the lossy compression quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputFormat {
    /// Container.
    pub format: FileFormat,
    /// JPEG quality in `(0, 1]`; must be absent for PNG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_quality: Option<f32>,
}

impl OutputFormat {
    /// Lossless PNG.
    pub fn png() -> Self {
        Self {
            format: FileFormat::Png,
            compression_quality: None,
        }
    }

    /// JPEG at `quality`; checked by [`validate`](Self::validate).
    pub fn jpeg(quality: f32) -> Self {
        Self {
            format: FileFormat::Jpeg,
            compression_quality: Some(quality),
        }
    }

    /// Reject combinations the encoder cannot honour.
    pub fn validate(&self) -> HomeshotResult<()> {
        match (self.format, self.compression_quality) {
            (FileFormat::Png, None) => Ok(()),
            (FileFormat::Png, Some(q)) => Err(HomeshotError::configuration(format!(
                "png is lossless and takes no compression quality (got {q})"
            ))),
            (FileFormat::Jpeg, None) => Err(HomeshotError::configuration(
                "jpeg requires a compression quality in (0, 1]",
            )),
            (FileFormat::Jpeg, Some(q)) if q > 0.0 && q <= 1.0 => Ok(()),
            (FileFormat::Jpeg, Some(q)) => Err(HomeshotError::configuration(format!(
                "jpeg compression quality must be in (0, 1], got {q}"
            ))),
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// Encoder quality on the `1..=100` scale, `None` for lossless output.
    pub(crate) fn jpeg_quality_percent(&self) -> Option<u8> {
        match self.format {
            FileFormat::Png => None,
            FileFormat::Jpeg => {
                let q = self.compression_quality.unwrap_or(1.0);
                Some((q * 100.0).round().clamp(1.0, 100.0) as u8)
            }
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::png()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/format.rs"]
mod tests;
