//! CPU renderers for [`HomeScene`]: a threaded live view and a supersampling "physical" renderer.

use crate::foundation::core::{Rgba8, ViewBounds};
use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::render::backend::{LiveView, NoProgress, PhysicalRenderer, RenderProgress, SwapListener};
use crate::render::frame::FrameBuffer;
use crate::render::raster::{MAX_SCALE, max_raster_width, rasterize};
use crate::render::select::Fidelity;
use crate::scene::camera::Viewpoint;
use crate::scene::document::HomeScene;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

/// Supersampling factor of the live view when antialiasing is on.
const VIEW_ANTIALIAS_SCALE: u32 = 2;

#[derive(Clone)]
struct Staged {
    scene: Option<Arc<HomeScene>>,
    viewpoint: Option<Viewpoint>,
    width: u32,
    height: u32,
    antialias: bool,
    background: Rgba8,
}

enum ViewCommand {
    Redraw(Box<Staged>),
    Shutdown,
}

#[derive(Default)]
struct Presented {
    front: Mutex<Option<FrameBuffer>>,
    listener: Mutex<Option<SwapListener>>,
}

/// Headless [`LiveView`] backed by a render thread.
///
/// [`show`](LiveView::show) adopts the scene's background.
/// [`request_redraw`](LiveView::request_redraw) only queues work. The render thread
/// rasterizes the staged scene, swaps it into the front buffer, then calls the swap listener.
pub struct SoftwareView {
    staged: Staged,
    origin: (i32, i32),
    presented: Arc<Presented>,
    tx: mpsc::Sender<ViewCommand>,
    worker: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for SoftwareView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareView")
            .field("width", &self.staged.width)
            .field("height", &self.staged.height)
            .field("origin", &self.origin)
            .finish()
    }
}

impl SoftwareView {
    /// View of `width` x `height` with an opaque light background.
    pub fn new(width: u32, height: u32) -> HomeshotResult<Self> {
        let presented = Arc::new(Presented::default());
        let (tx, rx) = mpsc::channel::<ViewCommand>();
        let worker = std::thread::Builder::new()
            .name("homeshot-view".to_owned())
            .spawn({
                let presented = Arc::clone(&presented);
                move || view_thread(rx, presented)
            })
            .map_err(|e| {
                HomeshotError::Other(anyhow::Error::new(e).context("spawn view render thread"))
            })?;

        Ok(Self {
            staged: Staged {
                scene: None,
                viewpoint: None,
                width: width.max(1),
                height: height.max(1),
                antialias: false,
                background: [204, 224, 255, 255],
            },
            origin: (0, 0),
            presented,
            tx,
            worker: Some(worker),
        })
    }

    /// Place the view at a screen position.
    pub fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = (x, y);
        self
    }

    /// Copy of the front buffer, if a frame has been presented.
    pub fn front_buffer(&self) -> Option<FrameBuffer> {
        self.presented
            .front
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for SoftwareView {
    fn drop(&mut self) {
        let _ = self.tx.send(ViewCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn view_thread(rx: mpsc::Receiver<ViewCommand>, presented: Arc<Presented>) {
    while let Ok(cmd) = rx.recv() {
        let staged = match cmd {
            ViewCommand::Redraw(staged) => staged,
            ViewCommand::Shutdown => break,
        };
        let frame = match (&staged.scene, &staged.viewpoint) {
            (Some(scene), Some(viewpoint)) => {
                let scale = if staged.antialias {
                    VIEW_ANTIALIAS_SCALE
                } else {
                    1
                };
                rasterize(
                    scene,
                    viewpoint,
                    staged.width,
                    staged.height,
                    staged.background,
                    scale,
                    &NoProgress,
                )
            }
            _ => FrameBuffer::filled(staged.width, staged.height, staged.background),
        };
        match frame {
            Ok(frame) => {
                *presented
                    .front
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(frame);
            }
            Err(err) => {
                tracing::error!(error = %err, "view redraw failed");
                continue;
            }
        }
        let listener = presented
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(listener) = listener {
            listener();
        }
    }
    tracing::debug!("view render thread exiting");
}

impl LiveView<HomeScene> for SoftwareView {
    fn bounds(&self) -> ViewBounds {
        ViewBounds::new(
            self.origin.0,
            self.origin.1,
            self.staged.width,
            self.staged.height,
        )
    }

    fn background(&self) -> Rgba8 {
        self.staged.background
    }

    fn set_background(&mut self, rgba: Rgba8) {
        self.staged.background = rgba;
    }

    fn show(
        &mut self,
        scene: &HomeScene,
        viewpoint: &Viewpoint,
        width: u32,
        height: u32,
        antialias: bool,
    ) -> HomeshotResult<()> {
        let scale = if antialias { VIEW_ANTIALIAS_SCALE } else { 1 };
        if width == 0 || height == 0 || width > max_raster_width(scale) {
            return Err(HomeshotError::render(format!(
                "view cannot present a {width}x{height} frame"
            )));
        }
        self.staged.background = scene.background_rgba8();
        self.staged.scene = Some(Arc::new(scene.clone()));
        self.staged.viewpoint = Some(viewpoint.clone());
        self.staged.width = width;
        self.staged.height = height;
        self.staged.antialias = antialias;
        Ok(())
    }

    fn request_redraw(&mut self) {
        if self
            .tx
            .send(ViewCommand::Redraw(Box::new(self.staged.clone())))
            .is_err()
        {
            tracing::warn!("view render thread is gone; redraw dropped");
        }
    }

    fn set_swap_listener(&mut self, listener: Option<SwapListener>) {
        *self
            .presented
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = listener;
    }

    fn capture_region(&self, region: ViewBounds) -> HomeshotResult<FrameBuffer> {
        let front = self
            .presented
            .front
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let frame = front
            .as_ref()
            .ok_or_else(|| HomeshotError::render("view has not presented a frame yet"))?;
        let presented = ViewBounds::new(self.origin.0, self.origin.1, frame.width(), frame.height());
        if region.is_empty() || !presented.contains(region) {
            return Err(HomeshotError::render(format!(
                "capture region {region:?} is not inside the presented {presented:?}"
            )));
        }
        let x = region.x.abs_diff(presented.x);
        let y = region.y.abs_diff(presented.y);
        frame.crop(x, y, region.width, region.height)
    }
}

/// Synchronous supersampling renderer standing in for a physically based one.
///
/// Every lens is drawn with a pinhole projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupersampledRenderer {
    /// Samples per axis at [`Fidelity::Low`].
    pub low_samples: u32,
    /// Samples per axis at [`Fidelity::High`].
    pub high_samples: u32,
}

impl Default for SupersampledRenderer {
    fn default() -> Self {
        Self {
            low_samples: 2,
            high_samples: 4,
        }
    }
}

impl PhysicalRenderer<HomeScene> for SupersampledRenderer {
    fn render(
        &mut self,
        scene: &HomeScene,
        viewpoint: &Viewpoint,
        fidelity: Fidelity,
        frame: &mut FrameBuffer,
        progress: &dyn RenderProgress,
    ) -> HomeshotResult<()> {
        let samples = match fidelity {
            Fidelity::Low => self.low_samples,
            Fidelity::High => self.high_samples,
        }
        .clamp(1, MAX_SCALE);
        let out = rasterize(
            scene,
            viewpoint,
            frame.width(),
            frame.height(),
            scene.background_rgba8(),
            samples,
            progress,
        )?;
        frame.data_mut().copy_from_slice(out.data());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/software.rs"]
mod tests;
