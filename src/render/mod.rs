//! Frame production: strategy selection, offscreen capture, matte extraction and the
//! built-in CPU renderers.

/// Renderer and live-view traits.
pub mod backend;
/// Offscreen capture synchronizer.
pub mod capture;
/// Straight-alpha RGBA8 frames.
pub mod frame;
/// Transparent icon generation.
pub mod icon;
/// White/black alpha-matte differencer.
pub mod matte;
pub(crate) mod raster;
/// Quality-tiered strategy selection.
pub mod select;
/// Headless CPU live view and supersampling renderer.
pub mod software;
/// Exclusive leases on shared rendering resources.
pub mod surface;
