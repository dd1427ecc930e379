use crate::foundation::core::{OPAQUE_BLACK, OPAQUE_WHITE, TRANSPARENT};
use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::render::frame::FrameBuffer;
use rayon::prelude::*;

/// Recover an alpha matte from two renders of the same scene.
///
/// `on_white` and `on_black` must show identical geometry over opaque white and opaque black
/// backgrounds. A pixel that is pure white in the first and pure black in the second is
/// background and becomes fully transparent; every other pixel keeps its `on_white` value.
/// Model pixels that happen to be pure white or pure black in both renders are kept, and
/// antialiased edges keep their blend with white.
pub fn matte(on_white: &FrameBuffer, on_black: &FrameBuffer) -> HomeshotResult<FrameBuffer> {
    if !on_white.same_geometry(on_black) {
        return Err(HomeshotError::render(format!(
            "matte inputs differ in size: {}x{} vs {}x{}",
            on_white.width(),
            on_white.height(),
            on_black.width(),
            on_black.height()
        )));
    }

    let mut out = on_white.clone();
    out.data_mut()
        .par_chunks_exact_mut(4)
        .zip(on_black.data().par_chunks_exact(4))
        .for_each(|(w, b)| {
            if w != b && b == OPAQUE_BLACK && w == OPAQUE_WHITE {
                w.copy_from_slice(&TRANSPARENT);
            }
        });
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/render/matte.rs"]
mod tests;
