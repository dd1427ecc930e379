use crate::foundation::core::{Rgba8, ViewBounds};
use crate::foundation::error::HomeshotResult;
use crate::render::frame::FrameBuffer;
use crate::render::select::Fidelity;
use crate::scene::camera::Viewpoint;
use std::sync::Arc;

/// Callback invoked once per completed buffer swap of a [`LiveView`].
pub type SwapListener = Arc<dyn Fn() + Send + Sync>;

/// Receives intra-frame progress from a [`PhysicalRenderer`].
pub trait RenderProgress {
    /// `fraction` is in `[0, 1]` and non-decreasing within one frame.
    fn report(&self, fraction: f32);
}

/// Progress sink that drops every report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl RenderProgress for NoProgress {
    fn report(&self, _fraction: f32) {}
}

/// Synchronous, expensive renderer producing a finished frame per call.
pub trait PhysicalRenderer<D>: Send {
    /// Render `scene` from `viewpoint` into `frame`, whose dimensions are the output size.
    fn render(
        &mut self,
        scene: &D,
        viewpoint: &Viewpoint,
        fidelity: Fidelity,
        frame: &mut FrameBuffer,
        progress: &dyn RenderProgress,
    ) -> HomeshotResult<()>;
}

/// Interactive view whose frames arrive asynchronously.
///
/// A redraw request returns immediately; the view later presents the frame and calls the
/// swap listener exactly once for that swap. [`capture_region`](LiveView::capture_region)
/// reads whatever frame is currently presented.
pub trait LiveView<D>: Send {
    /// Screen-space rectangle of the presented frame.
    fn bounds(&self) -> ViewBounds;

    /// Current background color.
    fn background(&self) -> Rgba8;

    /// Change the background used by subsequent redraws.
    fn set_background(&mut self, rgba: Rgba8);

    /// Stage `scene` from `viewpoint` at `width` x `height` for the next redraw.
    fn show(
        &mut self,
        scene: &D,
        viewpoint: &Viewpoint,
        width: u32,
        height: u32,
        antialias: bool,
    ) -> HomeshotResult<()>;

    /// Ask for an asynchronous redraw.
    fn request_redraw(&mut self);

    /// Install or remove the swap listener.
    fn set_swap_listener(&mut self, listener: Option<SwapListener>);

    /// Copy the presented pixels inside `region` (screen coordinates).
    fn capture_region(&self, region: ViewBounds) -> HomeshotResult<FrameBuffer>;
}

impl<D, T: LiveView<D> + ?Sized> LiveView<D> for Box<T> {
    fn bounds(&self) -> ViewBounds {
        (**self).bounds()
    }

    fn background(&self) -> Rgba8 {
        (**self).background()
    }

    fn set_background(&mut self, rgba: Rgba8) {
        (**self).set_background(rgba)
    }

    fn show(
        &mut self,
        scene: &D,
        viewpoint: &Viewpoint,
        width: u32,
        height: u32,
        antialias: bool,
    ) -> HomeshotResult<()> {
        (**self).show(scene, viewpoint, width, height, antialias)
    }

    fn request_redraw(&mut self) {
        (**self).request_redraw()
    }

    fn set_swap_listener(&mut self, listener: Option<SwapListener>) {
        (**self).set_swap_listener(listener)
    }

    fn capture_region(&self, region: ViewBounds) -> HomeshotResult<FrameBuffer> {
        (**self).capture_region(region)
    }
}

impl<D, T: PhysicalRenderer<D> + ?Sized> PhysicalRenderer<D> for Box<T> {
    fn render(
        &mut self,
        scene: &D,
        viewpoint: &Viewpoint,
        fidelity: Fidelity,
        frame: &mut FrameBuffer,
        progress: &dyn RenderProgress,
    ) -> HomeshotResult<()> {
        (**self).render(scene, viewpoint, fidelity, frame, progress)
    }
}
