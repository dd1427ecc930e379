//! Image encoding and output destinations.

/// File formats and compression quality.
pub mod format;
/// Output file naming and overwrite detection.
pub mod naming;
/// Encoders and filesystem abstraction.
pub mod writer;
