use crate::foundation::core::Rgba8;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Convert premultiplied RGBA8 pixels to straight alpha, in place.
pub(crate) fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// Composite a straight-alpha pixel over an opaque background.
pub(crate) fn flatten_over(px: Rgba8, bg: [u8; 3]) -> [u8; 3] {
    let a = u16::from(px[3]);
    let inv = 255 - a;
    let mix = |c: u8, b: u8| -> u8 {
        mul_div255_u16(u16::from(c), a).saturating_add(mul_div255_u16(u16::from(b), inv)) as u8
    };
    [mix(px[0], bg[0]), mix(px[1], bg[1]), mix(px[2], bg[2])]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
