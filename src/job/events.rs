use crate::foundation::error::HomeshotError;
use crate::job::state::JobStatus;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, mpsc};

/// Notification published by a batch job, in order.
#[derive(Debug, Clone)]
pub enum JobEvent {
    /// Viewpoint `index` of `total` was written to `path`.
    Progress {
        /// Zero-based viewpoint index.
        index: usize,
        /// Number of viewpoints.
        total: usize,
        /// File just written.
        path: PathBuf,
    },
    /// All viewpoints written.
    Completed {
        /// Files written.
        written: usize,
    },
    /// Stopped on request.
    Cancelled {
        /// Files written before stopping.
        written: usize,
    },
    /// Stopped by an error.
    Failed(Arc<HomeshotError>),
}

impl JobEvent {
    /// `true` for the last event of a job.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobEvent::Progress { .. })
    }
}

/// Receives job notifications on the worker thread.
///
/// Callbacks run synchronously before the worker moves on; hand work over to another thread
/// for anything slow. A callback may cancel the job but must not subscribe.
pub trait JobObserver: Send + Sync {
    /// A file was written.
    fn on_progress(&self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// The job completed.
    fn on_completed(&self, written: usize) {
        let _ = written;
    }

    /// The job was cancelled.
    fn on_cancelled(&self, written: usize) {
        let _ = written;
    }

    /// The job failed.
    fn on_failed(&self, error: &HomeshotError) {
        let _ = error;
    }

    /// Entry point for every event; dispatches to the specific callbacks.
    fn on_event(&self, event: &JobEvent) {
        match event {
            JobEvent::Progress { index, total, path } => self.on_progress(*index, *total, path),
            JobEvent::Completed { written } => self.on_completed(*written),
            JobEvent::Cancelled { written } => self.on_cancelled(*written),
            JobEvent::Failed(err) => self.on_failed(err),
        }
    }
}

/// Closure-based observer.
///
/// `on_finished` runs for both completion and cancellation with the terminal status.
pub struct FnObserver<P, C, F> {
    on_progress: P,
    on_finished: C,
    on_failed: F,
}

impl<P, C, F> FnObserver<P, C, F>
where
    P: Fn(usize, usize) + Send + Sync,
    C: Fn(JobStatus, usize) + Send + Sync,
    F: Fn(&HomeshotError) + Send + Sync,
{
    /// Wrap three callbacks.
    pub fn new(on_progress: P, on_finished: C, on_failed: F) -> Self {
        Self {
            on_progress,
            on_finished,
            on_failed,
        }
    }
}

impl<P, C, F> JobObserver for FnObserver<P, C, F>
where
    P: Fn(usize, usize) + Send + Sync,
    C: Fn(JobStatus, usize) + Send + Sync,
    F: Fn(&HomeshotError) + Send + Sync,
{
    fn on_progress(&self, index: usize, total: usize, _path: &Path) {
        (self.on_progress)(index, total)
    }

    fn on_completed(&self, written: usize) {
        (self.on_finished)(JobStatus::Completed, written)
    }

    fn on_cancelled(&self, written: usize) {
        (self.on_finished)(JobStatus::Cancelled, written)
    }

    fn on_failed(&self, error: &HomeshotError) {
        (self.on_failed)(error)
    }
}

/// Forwards events into a channel.
pub(crate) struct ChannelObserver(pub(crate) mpsc::Sender<JobEvent>);

impl JobObserver for ChannelObserver {
    fn on_event(&self, event: &JobEvent) {
        let _ = self.0.send(event.clone());
    }
}

#[derive(Default)]
struct HubInner {
    history: Vec<JobEvent>,
    observers: Vec<Arc<dyn JobObserver>>,
}

/// Ordered fan-out of job events. Late subscribers get the history replayed first.
#[derive(Default)]
pub(crate) struct EventHub {
    inner: Mutex<HubInner>,
}

impl EventHub {
    pub(crate) fn subscribe(&self, observer: Arc<dyn JobObserver>) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        for event in &inner.history {
            deliver_guarded(observer.as_ref(), event);
        }
        inner.observers.push(observer);
    }

    pub(crate) fn publish(&self, event: JobEvent) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        for observer in &inner.observers {
            deliver_guarded(observer.as_ref(), &event);
        }
        inner.history.push(event);
    }

    pub(crate) fn history(&self) -> Vec<JobEvent> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .history
            .clone()
    }
}

fn deliver_guarded(observer: &dyn JobObserver, event: &JobEvent) {
    if std::panic::catch_unwind(AssertUnwindSafe(|| observer.on_event(event))).is_err() {
        tracing::error!("job observer panicked; event dropped for that observer");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/events.rs"]
mod tests;
