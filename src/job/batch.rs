//! Background batch rendering.
//!
//! A [`BatchRenderer`] owns the shared rendering resources and runs at most one job at a
//! time. Each job renders its viewpoints in order on a dedicated worker thread:
//!
//! 1. check the cancel flag,
//! 2. select a strategy for the viewpoint,
//! 3. obtain the frame (offscreen capture or physically based render),
//! 4. encode and write it,
//! 5. publish progress.
//!
//! The first error stops the job. Cancellation is observed only at step 1, so a frame in
//! flight is still written.

use crate::encode::writer::{FileSystem, write_frame};
use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::job::events::{ChannelObserver, EventHub, FnObserver, JobEvent, JobObserver};
use crate::job::request::{RenderRequest, RenderTarget};
use crate::job::state::{JobSnapshot, JobStatus, RenderJobState};
use crate::render::backend::{LiveView, PhysicalRenderer, RenderProgress};
use crate::render::capture::{CaptureOpts, capture_frame};
use crate::render::frame::FrameBuffer;
use crate::render::icon::generate_icon;
use crate::render::select::{QualityLevel, Strategy, min_supported_level, select};
use crate::render::surface::{SurfaceLease, SurfaceSlot};
use crate::scene::camera::{Lens, Viewpoint};
use crate::scene::document::SceneDocument;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, mpsc};
use std::thread::JoinHandle;

type ViewSlot<D> = Arc<SurfaceSlot<Box<dyn LiveView<D>>>>;
type RendererSlot<D> = Arc<SurfaceSlot<Box<dyn PhysicalRenderer<D>>>>;

/// Options for a [`BatchRenderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOpts {
    /// Swap wait used by offscreen captures.
    pub capture: CaptureOpts,
    /// Name given to worker threads.
    pub thread_name: String,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            capture: CaptureOpts::default(),
            thread_name: "homeshot-batch".to_owned(),
        }
    }
}

/// Releases the renderer's busy flag when the job ends, however it ends.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Batch renderer over documents of type `D`.
pub struct BatchRenderer<D: SceneDocument> {
    view: Option<ViewSlot<D>>,
    physical: Option<RendererSlot<D>>,
    fs: Arc<dyn FileSystem>,
    opts: BatchOpts,
    busy: Arc<AtomicBool>,
    next_id: AtomicU64,
}

impl<D: SceneDocument> std::fmt::Debug for BatchRenderer<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRenderer")
            .field("offscreen", &self.view.is_some())
            .field("physical", &self.physical.is_some())
            .field("busy", &self.is_busy())
            .field("opts", &self.opts)
            .finish()
    }
}

impl<D: SceneDocument> BatchRenderer<D> {
    /// Renderer writing through `fs`, with no rendering resources attached yet.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            view: None,
            physical: None,
            fs,
            opts: BatchOpts::default(),
            busy: Arc::new(AtomicBool::new(false)),
            next_id: AtomicU64::new(1),
        }
    }

    /// Attach the offscreen live view, enabling the fast quality levels and icons.
    pub fn with_offscreen_view(mut self, view: impl LiveView<D> + 'static) -> Self {
        let view: Box<dyn LiveView<D>> = Box::new(view);
        self.view = Some(SurfaceSlot::new("offscreen view", view));
        self
    }

    /// Attach the physically based renderer used from quality level 2 up.
    pub fn with_physical_renderer(mut self, renderer: impl PhysicalRenderer<D> + 'static) -> Self {
        let renderer: Box<dyn PhysicalRenderer<D>> = Box::new(renderer);
        self.physical = Some(SurfaceSlot::new("physically based renderer", renderer));
        self
    }

    /// Replace the options.
    pub fn with_opts(mut self, opts: BatchOpts) -> Self {
        self.opts = opts;
        self
    }

    /// `true` when an offscreen view is attached.
    pub fn offscreen_available(&self) -> bool {
        self.view.is_some()
    }

    /// Lowest quality level this renderer can honour.
    pub fn min_quality(&self) -> QualityLevel {
        min_supported_level(self.offscreen_available())
    }

    /// `true` while a job is running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Validate `request` and start rendering it in the background.
    ///
    /// The document is cloned and its selection cleared before the worker starts, so later
    /// edits by the caller do not affect the job. Fails with
    /// [`HomeshotError::IllegalState`] while another job runs and with
    /// [`HomeshotError::Configuration`] for an invalid request.
    #[tracing::instrument(skip_all, fields(targets = request.targets.len(), quality = request.quality))]
    pub fn submit(&self, document: &D, request: RenderRequest) -> HomeshotResult<JobHandle> {
        let level = request.validate()?;

        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(HomeshotError::illegal_state(
                "a batch render job is already running",
            ));
        }
        let busy = BusyGuard(Arc::clone(&self.busy));

        let offscreen = self.offscreen_available();
        let frames = match select(level, Lens::Rectilinear, 1, 1, offscreen).strategy {
            Strategy::FastRaster { .. } => match &self.view {
                Some(slot) => FrameSource::Live(slot.acquire()?),
                None => {
                    return Err(HomeshotError::configuration(
                        "fast quality levels need an offscreen view",
                    ));
                }
            },
            Strategy::PhysicallyBased { .. } => match &self.physical {
                Some(slot) => FrameSource::Traced(slot.acquire()?),
                None => {
                    return Err(HomeshotError::configuration(format!(
                        "quality level {} needs a physically based renderer",
                        level.max(self.min_quality()).get()
                    )));
                }
            },
        };

        let mut document = document.clone();
        document.clear_selection();

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let total = request.targets.len();
        let state = Arc::new(RenderJobState::new(total));
        state.start()?;
        let hub = Arc::new(EventHub::default());

        let worker = Worker {
            id,
            document,
            request,
            level,
            offscreen,
            frames,
            fs: Arc::clone(&self.fs),
            capture: self.opts.capture,
            state: Arc::clone(&state),
            hub: Arc::clone(&hub),
            busy,
        };
        let join = std::thread::Builder::new()
            .name(format!("{}-{id}", self.opts.thread_name))
            .spawn(move || worker.run())
            .map_err(|e| {
                HomeshotError::Other(anyhow::Error::new(e).context("spawn batch worker thread"))
            })?;

        tracing::info!(id, total, level = level.get(), "batch job started");
        Ok(JobHandle {
            id,
            state,
            hub,
            join: Some(join),
        })
    }

    /// Request cancellation of `handle`'s job.
    pub fn cancel(&self, handle: &JobHandle) -> bool {
        handle.cancel()
    }

    /// Register `observer` on `handle`'s job.
    pub fn subscribe(&self, handle: &JobHandle, observer: Arc<dyn JobObserver>) {
        handle.subscribe(observer)
    }

    /// Render a transparent square icon through the offscreen view.
    ///
    /// Fails with [`HomeshotError::IllegalState`] while a job holds the view.
    pub fn generate_icon(
        &self,
        document: &D,
        viewpoint: &Viewpoint,
        size: u32,
    ) -> HomeshotResult<FrameBuffer> {
        let slot = self.view.as_ref().ok_or_else(|| {
            HomeshotError::configuration("icon generation needs an offscreen view")
        })?;
        let mut lease = slot.acquire()?;
        let mut document = document.clone();
        document.clear_selection();
        document.set_camera(viewpoint);
        generate_icon(&mut **lease, &document, viewpoint, size, self.opts.capture)
    }
}

/// Resource that produces frames for a job; matches the job's strategy.
enum FrameSource<D> {
    Live(SurfaceLease<Box<dyn LiveView<D>>>),
    Traced(SurfaceLease<Box<dyn PhysicalRenderer<D>>>),
}

enum Stop {
    Completed,
    Cancelled,
}

/// Forwards intra-frame progress into the job state.
struct FrameProgress<'a>(&'a RenderJobState);

impl RenderProgress for FrameProgress<'_> {
    fn report(&self, fraction: f32) {
        self.0.set_frame_progress(fraction);
    }
}

struct Worker<D: SceneDocument> {
    id: u64,
    document: D,
    request: RenderRequest,
    level: QualityLevel,
    offscreen: bool,
    frames: FrameSource<D>,
    fs: Arc<dyn FileSystem>,
    capture: CaptureOpts,
    state: Arc<RenderJobState>,
    hub: Arc<EventHub>,
    busy: BusyGuard,
}

impl<D: SceneDocument> Worker<D> {
    fn run(mut self) -> JobOutcome {
        let span = tracing::info_span!("batch_job", id = self.id);
        let _enter = span.enter();

        let targets = std::mem::take(&mut self.request.targets);
        let mut written = Vec::with_capacity(targets.len());
        let result = self.render_all(&targets, &mut written);

        let Worker {
            state,
            hub,
            frames,
            busy,
            ..
        } = self;

        // Resources go back before the terminal status becomes visible, so a caller that
        // sees it, or a terminal callback, can start the next job.
        drop(frames);
        drop(busy);

        let (status, error, event) = match result {
            Ok(Stop::Completed) => {
                state.finish(JobStatus::Completed);
                tracing::info!(written = written.len(), "batch job completed");
                let event = JobEvent::Completed {
                    written: written.len(),
                };
                (JobStatus::Completed, None, event)
            }
            Ok(Stop::Cancelled) => {
                state.finish(JobStatus::Cancelled);
                tracing::info!(written = written.len(), "batch job cancelled");
                let event = JobEvent::Cancelled {
                    written: written.len(),
                };
                (JobStatus::Cancelled, None, event)
            }
            Err(err) => {
                let err = Arc::new(err);
                state.fail(Arc::clone(&err));
                tracing::warn!(error = %err, written = written.len(), "batch job failed");
                (JobStatus::Failed, Some(Arc::clone(&err)), JobEvent::Failed(err))
            }
        };
        hub.publish(event);

        JobOutcome {
            status,
            written,
            error,
        }
    }

    fn render_all(
        &mut self,
        targets: &[RenderTarget],
        written: &mut Vec<PathBuf>,
    ) -> HomeshotResult<Stop> {
        let total = targets.len();
        for (index, target) in targets.iter().enumerate() {
            if self.state.cancel_requested() {
                return Ok(Stop::Cancelled);
            }
            self.state.begin_frame(index);

            let frame = std::panic::catch_unwind(AssertUnwindSafe(|| self.render_one(target)))
                .map_err(|payload| {
                    HomeshotError::render(format!("renderer panicked: {}", panic_message(&*payload)))
                })??;

            write_frame(
                self.fs.as_ref(),
                &frame,
                &target.destination,
                &self.request.format,
            )?;
            tracing::debug!(
                index,
                total,
                viewpoint = %target.viewpoint.name,
                path = %target.destination.display(),
                "viewpoint written"
            );
            written.push(target.destination.clone());
            self.state.frame_written(Arc::new(frame));
            self.hub.publish(JobEvent::Progress {
                index,
                total,
                path: target.destination.clone(),
            });
        }
        Ok(Stop::Completed)
    }

    fn render_one(&mut self, target: &RenderTarget) -> HomeshotResult<FrameBuffer> {
        let viewpoint = &target.viewpoint;
        self.document.set_camera(viewpoint);
        let sel = select(
            self.level,
            viewpoint.lens,
            self.request.width,
            self.request.height,
            self.offscreen,
        );

        let frame = match (&mut self.frames, sel.strategy) {
            (FrameSource::Live(view), Strategy::FastRaster { antialias }) => {
                let view: &mut dyn LiveView<D> = &mut ***view;
                view.show(&self.document, viewpoint, sel.width, sel.height, antialias)?;
                capture_frame(view, self.capture)?.frame
            }
            (FrameSource::Traced(renderer), Strategy::PhysicallyBased { fidelity }) => {
                let mut frame = FrameBuffer::new(sel.width, sel.height)?;
                renderer.render(
                    &self.document,
                    viewpoint,
                    fidelity,
                    &mut frame,
                    &FrameProgress(&self.state),
                )?;
                frame
            }
            _ => {
                return Err(HomeshotError::illegal_state(
                    "leased renderer does not match the selected strategy",
                ));
            }
        };

        if frame.width() != sel.width || frame.height() != sel.height {
            return Err(HomeshotError::render(format!(
                "renderer produced {}x{} instead of {}x{}",
                frame.width(),
                frame.height(),
                sel.width,
                sel.height
            )));
        }
        Ok(frame)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

/// Final result of a job.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    /// Terminal status.
    pub status: JobStatus,
    /// Files written, in order.
    pub written: Vec<PathBuf>,
    /// Cause when `status` is [`JobStatus::Failed`].
    pub error: Option<Arc<HomeshotError>>,
}

/// Cancels a job from any thread.
#[derive(Debug, Clone)]
pub struct CancelToken(Arc<RenderJobState>);

impl CancelToken {
    /// See [`RenderJobState::request_cancel`].
    pub fn cancel(&self) -> bool {
        self.0.request_cancel()
    }
}

/// Caller-side handle of a running or finished job.
pub struct JobHandle {
    id: u64,
    state: Arc<RenderJobState>,
    hub: Arc<EventHub>,
    join: Option<JoinHandle<JobOutcome>>,
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("id", &self.id)
            .field("state", &self.state.snapshot())
            .finish()
    }
}

impl JobHandle {
    /// Job identifier, unique per renderer.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Shared state for polling.
    pub fn state(&self) -> &Arc<RenderJobState> {
        &self.state
    }

    /// Current counters.
    pub fn snapshot(&self) -> JobSnapshot {
        self.state.snapshot()
    }

    /// Current status.
    pub fn status(&self) -> JobStatus {
        self.state.status()
    }

    /// Ask the job to stop before its next viewpoint. Idempotent.
    pub fn cancel(&self) -> bool {
        let changed = self.state.request_cancel();
        if changed {
            tracing::debug!(id = self.id, "cancellation requested");
        }
        changed
    }

    /// Token that cancels this job from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        CancelToken(Arc::clone(&self.state))
    }

    /// Register an observer; events already published are replayed first.
    pub fn subscribe(&self, observer: Arc<dyn JobObserver>) {
        self.hub.subscribe(observer)
    }

    /// Register three callbacks; see [`FnObserver`].
    pub fn subscribe_fn<P, C, F>(&self, on_progress: P, on_finished: C, on_failed: F)
    where
        P: Fn(usize, usize) + Send + Sync + 'static,
        C: Fn(JobStatus, usize) + Send + Sync + 'static,
        F: Fn(&HomeshotError) + Send + Sync + 'static,
    {
        self.subscribe(Arc::new(FnObserver::new(on_progress, on_finished, on_failed)))
    }

    /// Channel receiving every event of the job, starting from the first.
    pub fn events(&self) -> mpsc::Receiver<JobEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribe(Arc::new(ChannelObserver(tx)));
        rx
    }

    /// Events published so far, in order.
    pub fn history(&self) -> Vec<JobEvent> {
        self.hub.history()
    }

    /// Block until the worker exits.
    pub fn wait(mut self) -> HomeshotResult<JobOutcome> {
        let Some(join) = self.join.take() else {
            return Err(HomeshotError::illegal_state("job was already joined"));
        };
        join.join()
            .map_err(|_| HomeshotError::Other(anyhow::anyhow!("batch worker thread panicked")))
    }
}
