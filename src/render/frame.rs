use crate::foundation::core::{Rgba8, rgba8_byte_len};
use crate::foundation::error::{HomeshotError, HomeshotResult};

/// Straight-alpha RGBA8 frame, tightly packed row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl FrameBuffer {
    /// Transparent frame of `width` x `height`.
    ///
    /// Size overflow or a failed allocation is reported as
    /// [`HomeshotError::ResourceExhausted`], never as an abort.
    pub fn new(width: u32, height: u32) -> HomeshotResult<Self> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Frame where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: Rgba8) -> HomeshotResult<Self> {
        let len = rgba8_byte_len(width, height).ok_or_else(|| {
            HomeshotError::resource_exhausted(format!("frame {width}x{height} overflows memory"))
        })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            HomeshotError::resource_exhausted(format!(
                "cannot allocate {len} bytes for a {width}x{height} frame: {e}"
            ))
        })?;
        if rgba == [0, 0, 0, 0] {
            data.resize(len, 0);
        } else {
            for _ in 0..len / 4 {
                data.extend_from_slice(&rgba);
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing pixels; `data` must hold exactly `width * height * 4` bytes.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> HomeshotResult<Self> {
        let expected = rgba8_byte_len(width, height).ok_or_else(|| {
            HomeshotError::resource_exhausted(format!("frame {width}x{height} overflows memory"))
        })?;
        if data.len() != expected {
            return Err(HomeshotError::render(format!(
                "frame data length {} does not match {width}x{height} (expected {expected})",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Pixel at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[i..i + 4]);
        Some(px)
    }

    /// Overwrite the pixel at `(x, y)`; ignored outside the frame.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// `true` when both frames have the same dimensions.
    pub fn same_geometry(&self, other: &FrameBuffer) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Copy a sub-rectangle into a new frame.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> HomeshotResult<FrameBuffer> {
        let fits_x = x.checked_add(width).is_some_and(|r| r <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|b| b <= self.height);
        if !fits_x || !fits_y {
            return Err(HomeshotError::render(format!(
                "crop {width}x{height}+{x}+{y} exceeds frame {}x{}",
                self.width, self.height
            )));
        }
        let mut out = FrameBuffer::new(width, height)?;
        let row = width as usize * 4;
        for r in 0..height as usize {
            let src = ((y as usize + r) * self.width as usize + x as usize) * 4;
            out.data[r * row..(r + 1) * row].copy_from_slice(&self.data[src..src + row]);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
