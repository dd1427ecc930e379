use crate::foundation::error::{HomeshotError, HomeshotResult};
use crate::render::frame::FrameBuffer;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Lifecycle of a batch job.
///
/// `Idle -> Running -> {Completed | Cancelled | Failed}`; the last three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum JobStatus {
    /// Not started.
    Idle = 0,
    /// Worker is rendering.
    Running = 1,
    /// Stopped on request; files written so far are kept.
    Cancelled = 2,
    /// Every viewpoint was written.
    Completed = 3,
    /// Stopped at the first error.
    Failed = 4,
}

impl JobStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => JobStatus::Idle,
            1 => JobStatus::Running,
            2 => JobStatus::Cancelled,
            3 => JobStatus::Completed,
            _ => JobStatus::Failed,
        }
    }

    /// `true` for `Cancelled`, `Completed` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Cancelled | JobStatus::Completed | JobStatus::Failed
        )
    }
}

/// Point-in-time copy of a job's counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JobSnapshot {
    /// Lifecycle state.
    pub status: JobStatus,
    /// Index of the viewpoint being rendered.
    pub current: usize,
    /// Number of viewpoints.
    pub total: usize,
    /// Files written so far.
    pub written: usize,
    /// Progress inside the current frame, `[0, 1]`.
    pub frame_progress: f32,
}

/// State shared between the worker and any observer thread.
///
/// Counters are atomics so a UI can poll without blocking the worker.
#[derive(Debug)]
pub struct RenderJobState {
    status: AtomicU8,
    current: AtomicUsize,
    total: usize,
    written: AtomicUsize,
    cancel: AtomicBool,
    frame_progress: AtomicU32,
    failure: Mutex<Option<Arc<HomeshotError>>>,
    preview: Mutex<Option<Arc<FrameBuffer>>>,
}

impl RenderJobState {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            status: AtomicU8::new(JobStatus::Idle as u8),
            current: AtomicUsize::new(0),
            total,
            written: AtomicUsize::new(0),
            cancel: AtomicBool::new(false),
            frame_progress: AtomicU32::new(0f32.to_bits()),
            failure: Mutex::new(None),
            preview: Mutex::new(None),
        }
    }

    /// Lifecycle state.
    pub fn status(&self) -> JobStatus {
        JobStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Index of the viewpoint being rendered.
    pub fn current_index(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    /// Number of viewpoints.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Files written so far.
    pub fn written(&self) -> usize {
        self.written.load(Ordering::Acquire)
    }

    /// Progress inside the current frame.
    pub fn frame_progress(&self) -> f32 {
        f32::from_bits(self.frame_progress.load(Ordering::Relaxed))
    }

    /// `true` once cancellation was requested.
    pub fn cancel_requested(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }

    /// First error that stopped the job.
    pub fn failure(&self) -> Option<Arc<HomeshotError>> {
        self.failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recently finished frame.
    pub fn preview(&self) -> Option<Arc<FrameBuffer>> {
        self.preview
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Ask the worker to stop before its next viewpoint.
    ///
    /// Idempotent; returns `false` when the job already reached a terminal state.
    pub fn request_cancel(&self) -> bool {
        if self.status().is_terminal() {
            return false;
        }
        self.cancel.store(true, Ordering::Release);
        true
    }

    /// Copy all counters.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            status: self.status(),
            current: self.current_index(),
            total: self.total,
            written: self.written(),
            frame_progress: self.frame_progress(),
        }
    }

    pub(crate) fn start(&self) -> HomeshotResult<()> {
        self.status
            .compare_exchange(
                JobStatus::Idle as u8,
                JobStatus::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|v| {
                HomeshotError::illegal_state(format!(
                    "job cannot start from {:?}",
                    JobStatus::from_u8(v)
                ))
            })
    }

    pub(crate) fn begin_frame(&self, index: usize) {
        self.current.store(index, Ordering::Release);
        self.set_frame_progress(0.0);
    }

    pub(crate) fn set_frame_progress(&self, fraction: f32) {
        let f = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.frame_progress.store(f.to_bits(), Ordering::Relaxed);
    }

    pub(crate) fn frame_written(&self, preview: Arc<FrameBuffer>) {
        *self.preview.lock().unwrap_or_else(PoisonError::into_inner) = Some(preview);
        self.set_frame_progress(1.0);
        self.written.fetch_add(1, Ordering::AcqRel);
    }

    /// Move `Running` to a terminal status; later calls are ignored.
    pub(crate) fn finish(&self, status: JobStatus) -> bool {
        debug_assert!(status.is_terminal());
        self.status
            .compare_exchange(
                JobStatus::Running as u8,
                status as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    pub(crate) fn fail(&self, error: Arc<HomeshotError>) -> bool {
        {
            let mut slot = self.failure.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.is_none() {
                *slot = Some(error);
            }
        }
        *self.preview.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.finish(JobStatus::Failed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/state.rs"]
mod tests;
