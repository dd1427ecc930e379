/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Opaque white, the first matte background.
pub const OPAQUE_WHITE: Rgba8 = [255, 255, 255, 255];
/// Opaque black, the second matte background.
pub const OPAQUE_BLACK: Rgba8 = [0, 0, 0, 255];
/// Fully transparent pixel written by the matte differencer.
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

/// Screen-space rectangle of a live view, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewBounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ViewBounds {
    /// Bounds with an explicit origin.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds anchored at the screen origin.
    pub fn at_origin(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// `true` when the rectangle covers no pixel.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `true` when `inner` lies entirely inside `self`.
    pub fn contains(self, inner: ViewBounds) -> bool {
        let right = i64::from(self.x) + i64::from(self.width);
        let bottom = i64::from(self.y) + i64::from(self.height);
        inner.x >= self.x
            && inner.y >= self.y
            && i64::from(inner.x) + i64::from(inner.width) <= right
            && i64::from(inner.y) + i64::from(inner.height) <= bottom
    }
}

/// Byte length of a tightly packed RGBA8 buffer, `None` on overflow.
pub(crate) fn rgba8_byte_len(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(4)
}
