use crate::encode::format::{FileFormat, OutputFormat};
use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::foundation::math::flatten_over;
use crate::render::frame::FrameBuffer;
use image::ImageEncoder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Background JPEG output is flattened onto.
const JPEG_MATTE: [u8; 3] = [255, 255, 255];

/// Destination store for encoded images.
///
/// Writes never prompt: overwrite confirmation is the caller's business before a job starts.
pub trait FileSystem: Send + Sync {
    /// `true` when `path` already holds a file.
    fn exists(&self, path: &Path) -> bool;

    /// Create or replace `path` with `bytes`.
    fn write_with_overwrite(&self, path: &Path, bytes: &[u8]) -> HomeshotResult<()>;
}

/// The local filesystem. Parent directories are created on demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

/// Removes a partially written file unless disarmed.
struct PartialFileGuard {
    path: PathBuf,
    armed: bool,
}

impl Drop for PartialFileGuard {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn write_with_overwrite(&self, path: &Path, bytes: &[u8]) -> HomeshotResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| HomeshotError::io(parent, e))?;
        }
        let mut partial = path.as_os_str().to_owned();
        partial.push(".partial");
        let mut guard = PartialFileGuard {
            path: PathBuf::from(partial),
            armed: true,
        };
        std::fs::write(&guard.path, bytes).map_err(|e| HomeshotError::io(path, e))?;
        std::fs::rename(&guard.path, path).map_err(|e| HomeshotError::io(path, e))?;
        guard.armed = false;
        Ok(())
    }
}

/// In-memory file store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemoryFs {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with one file.
    pub fn with_file(self, path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), bytes);
        self
    }

    /// Contents of `path`.
    pub fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// Stored paths in sorted order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    fn write_with_overwrite(&self, path: &Path, bytes: &[u8]) -> HomeshotResult<()> {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

/// Encode `frame` into the bytes of an image file.
///
/// PNG keeps the alpha channel. JPEG has none, so pixels are composited over white first.
pub fn encode_frame(frame: &FrameBuffer, format: &OutputFormat) -> HomeshotResult<Vec<u8>> {
    format.validate()?;
    let (w, h) = (frame.width(), frame.height());
    let mut out = Vec::new();
    match format.format {
        FileFormat::Png => {
            image::codecs::png::PngEncoder::new_with_quality(
                &mut out,
                image::codecs::png::CompressionType::Default,
                image::codecs::png::FilterType::Adaptive,
            )
            .write_image(frame.data(), w, h, image::ExtendedColorType::Rgba8)
            .map_err(|e| HomeshotError::encode(format!("png encode {w}x{h} failed: {e}")))?;
        }
        FileFormat::Jpeg => {
            let quality = format.jpeg_quality_percent().unwrap_or(100);
            let rgb: Vec<u8> = frame
                .data()
                .chunks_exact(4)
                .flat_map(|px| flatten_over([px[0], px[1], px[2], px[3]], JPEG_MATTE))
                .collect();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
                .write_image(&rgb, w, h, image::ExtendedColorType::Rgb8)
                .map_err(|e| HomeshotError::encode(format!("jpeg encode {w}x{h} failed: {e}")))?;
        }
    }
    Ok(out)
}

/// Encode `frame` and store it at `path`, replacing any existing file.
#[tracing::instrument(skip(fs, frame), fields(path = %path.display()))]
pub fn write_frame(
    fs: &dyn FileSystem,
    frame: &FrameBuffer,
    path: &Path,
    format: &OutputFormat,
) -> HomeshotResult<()> {
    let bytes = encode_frame(frame, format)?;
    fs.write_with_overwrite(path, &bytes)?;
    tracing::debug!(bytes = bytes.len(), "frame written");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/writer.rs"]
mod tests;
