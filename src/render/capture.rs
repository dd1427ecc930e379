//! Offscreen capture over a [`LiveView`] whose frames arrive asynchronously.
//!
//! A capture stages a background, requests a redraw and waits on a condition variable for
//! the next buffer swap before reading the presented pixels. The wait is bounded: when the
//! view does not swap in time the capture proceeds with whatever is presented and reports
//! `swap_observed = false`.

use crate::foundation::core::{OPAQUE_BLACK, OPAQUE_WHITE, Rgba8, ViewBounds};
use crate::foundation::error::HomeshotResult;
use crate::render::backend::{LiveView, SwapListener};
use crate::render::frame::FrameBuffer;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Default bound on the swap wait of one capture.
pub const DEFAULT_SWAP_TIMEOUT: Duration = Duration::from_millis(1000);

/// Swap notification shared between a view's render thread and a waiting capture.
///
/// Swaps bump a generation counter, so a swap that lands before the waiter starts waiting
/// is not lost.
#[derive(Debug, Default)]
pub struct SwapSignal {
    generation: Mutex<u64>,
    cond: Condvar,
}

impl SwapSignal {
    /// Fresh signal at generation 0.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Record one swap and wake waiters.
    pub fn notify(&self) {
        let mut g = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *g = g.wrapping_add(1);
        self.cond.notify_all();
    }

    /// Number of swaps seen so far.
    pub fn generation(&self) -> u64 {
        *self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until the generation moves past `seen` or `timeout` elapses.
    ///
    /// Returns `true` when a swap was observed.
    pub fn wait_past(&self, seen: u64, timeout: Duration) -> bool {
        let guard = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .cond
            .wait_timeout_while(guard, timeout, |g| *g == seen)
            .unwrap_or_else(PoisonError::into_inner);
        *guard != seen
    }

    /// Listener to install on a view.
    pub fn listener(self: &Arc<Self>) -> SwapListener {
        let signal = Arc::clone(self);
        Arc::new(move || signal.notify())
    }
}

/// Capture timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOpts {
    /// Bound on the swap wait. A white/black pair splits it between both passes.
    pub swap_timeout: Duration,
}

impl Default for CaptureOpts {
    fn default() -> Self {
        Self {
            swap_timeout: DEFAULT_SWAP_TIMEOUT,
        }
    }
}

/// One captured frame.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Pixels read from the view.
    pub frame: FrameBuffer,
    /// `false` when the wait timed out and the frame may be stale.
    pub swap_observed: bool,
}

/// The same scene over opaque white and opaque black.
#[derive(Debug, Clone)]
pub struct CapturePair {
    /// Render over white.
    pub on_white: Capture,
    /// Render over black.
    pub on_black: Capture,
}

/// Swap listener and background borrowed from a view; both are restored on drop.
struct CaptureSession<'a, D> {
    view: &'a mut dyn LiveView<D>,
    signal: Arc<SwapSignal>,
    saved_background: Rgba8,
    bounds: ViewBounds,
}

impl<'a, D> CaptureSession<'a, D> {
    fn begin(view: &'a mut dyn LiveView<D>) -> Self {
        let signal = SwapSignal::new();
        let saved_background = view.background();
        let bounds = view.bounds();
        view.set_swap_listener(Some(signal.listener()));
        Self {
            view,
            signal,
            saved_background,
            bounds,
        }
    }

    fn present(&mut self, background: Option<Rgba8>, timeout: Duration) -> HomeshotResult<Capture> {
        if let Some(bg) = background {
            self.view.set_background(bg);
        }
        let seen = self.signal.generation();
        self.view.request_redraw();
        let swap_observed = self.signal.wait_past(seen, timeout);
        if !swap_observed {
            tracing::warn!(
                timeout_ms = timeout.as_millis() as u64,
                "view did not swap in time; capturing the presented frame"
            );
        }
        let frame = self.view.capture_region(self.bounds)?;
        Ok(Capture {
            frame,
            swap_observed,
        })
    }
}

impl<D> Drop for CaptureSession<'_, D> {
    fn drop(&mut self) {
        self.view.set_swap_listener(None);
        self.view.set_background(self.saved_background);
    }
}

/// Redraw once and capture the view as shown.
#[tracing::instrument(skip(view), fields(timeout_ms = opts.swap_timeout.as_millis() as u64))]
pub fn capture_frame<D>(view: &mut dyn LiveView<D>, opts: CaptureOpts) -> HomeshotResult<Capture> {
    let mut session = CaptureSession::begin(view);
    session.present(None, opts.swap_timeout)
}

/// Capture the view over opaque white, then over opaque black.
///
/// The original background is restored afterwards, also when a capture fails.
#[tracing::instrument(skip(view), fields(timeout_ms = opts.swap_timeout.as_millis() as u64))]
pub fn capture_pair<D>(view: &mut dyn LiveView<D>, opts: CaptureOpts) -> HomeshotResult<CapturePair> {
    let half = opts.swap_timeout / 2;
    let mut session = CaptureSession::begin(view);
    let on_white = session.present(Some(OPAQUE_WHITE), half)?;
    let on_black = session.present(Some(OPAQUE_BLACK), half)?;
    tracing::debug!(
        width = on_white.frame.width(),
        height = on_white.frame.height(),
        "captured matte pair"
    );
    Ok(CapturePair { on_white, on_black })
}

#[cfg(test)]
#[path = "../../tests/unit/render/capture.rs"]
mod tests;
