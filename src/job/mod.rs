//! Batch render jobs: requests, the background worker, shared state and event delivery.

/// Batch renderer and job handles.
pub mod batch;
/// Job events and observers.
pub mod events;
/// Render requests.
pub mod request;
/// Atomic job state.
pub mod state;
