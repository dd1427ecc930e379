use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::render::backend::LiveView;
use crate::render::capture::{CaptureOpts, capture_pair};
use crate::render::frame::FrameBuffer;
use crate::render::matte::matte;
use crate::scene::camera::Viewpoint;

/// Render a square, antialiased icon of `scene` with a transparent background.
///
/// The view renders the scene over opaque white and opaque black and the two captures are
/// differenced into an alpha matte. The view's background is restored before returning.
#[tracing::instrument(skip(view, scene, viewpoint), fields(viewpoint = %viewpoint.name))]
pub fn generate_icon<D>(
    view: &mut dyn LiveView<D>,
    scene: &D,
    viewpoint: &Viewpoint,
    size: u32,
    opts: CaptureOpts,
) -> HomeshotResult<FrameBuffer> {
    if size == 0 {
        return Err(HomeshotError::configuration("icon size must be non-zero"));
    }
    view.show(scene, viewpoint, size, size, true)?;
    let pair = capture_pair(view, opts)?;
    let icon = matte(&pair.on_white.frame, &pair.on_black.frame)?;
    tracing::info!(
        size,
        swap_observed = pair.on_white.swap_observed && pair.on_black.swap_observed,
        "icon generated"
    );
    Ok(icon)
}

#[cfg(test)]
#[path = "../../tests/unit/render/icon.rs"]
mod tests;
