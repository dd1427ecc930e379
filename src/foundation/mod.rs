//! Shared building blocks: error taxonomy, pixel constants and integer color math.

/// Pixel constants and frame geometry.
pub mod core;
/// Crate-wide error type.
pub mod error;
pub(crate) mod math;
