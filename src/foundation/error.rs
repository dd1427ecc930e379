use std::path::{Path, PathBuf};

/// Result alias used across the crate.
pub type HomeshotResult<T> = Result<T, HomeshotError>;

/// Failure taxonomy of the rendering pipeline.
///
/// A cancelled job is not an error: cancellation is reported as a terminal
/// [`JobStatus`](crate::JobStatus) instead.
#[derive(thiserror::Error, Debug)]
pub enum HomeshotError {
    /// Invalid request or format combination, rejected before any work starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Operation not allowed in the current state (double start, resource already leased).
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Renderer-internal failure.
    #[error("render error: {0}")]
    Render(String),

    /// Filesystem failure while writing an output file.
    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Frame buffer allocation failed or its size overflowed.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Image codec failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HomeshotError {
    /// Build a [`HomeshotError::Configuration`].
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`HomeshotError::IllegalState`].
    pub fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }

    /// Build a [`HomeshotError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`HomeshotError::Io`] for `path`.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a [`HomeshotError::ResourceExhausted`].
    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// Build a [`HomeshotError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
