//! homeshot renders stored camera viewpoints of a home-design scene into image files.
//!
//! # Pipeline overview
//!
//! 1. **Select**: quality level + lens -> rendering strategy and output size
//!    ([`select`]). Levels 0-1 rasterize in an offscreen live view; levels 2-3 use a
//!    synchronous physically based renderer.
//! 2. **Render**: the physically based renderer fills a [`FrameBuffer`] directly. The live
//!    view draws asynchronously, so frames are read through the capture synchronizer
//!    ([`capture_frame`]), which waits for the view's swap notification with a timeout.
//! 3. **Write**: frames are encoded as PNG or JPEG ([`write_frame`]) through a
//!    [`FileSystem`].
//! 4. **Report**: a [`BatchRenderer`] job runs steps 1-3 per viewpoint on a worker thread and
//!    publishes [`JobEvent`]s; callers poll [`RenderJobState`] or subscribe.
//!
//! Icons use a separate path: the live view renders the scene over white and over black and
//! [`matte`] differences the two captures into a transparent image ([`generate_icon`]).
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **One job at a time** per [`BatchRenderer`]; a second submit fails with
//!   [`HomeshotError::IllegalState`].
//! - **Straight-alpha RGBA8** frames everywhere outside the rasterizer.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// JSON batch configuration.
pub mod config;
mod encode;
mod foundation;
mod job;
mod render;
mod scene;

pub use config::BatchConfig;
pub use encode::format::{FileFormat, OutputFormat};
pub use encode::naming::{existing_destinations, photo_file_name, plan_destinations};
pub use encode::writer::{FileSystem, LocalFs, MemoryFs, encode_frame, write_frame};
pub use foundation::core::{OPAQUE_BLACK, OPAQUE_WHITE, Rgba8, TRANSPARENT, ViewBounds};
pub use foundation::error::{HomeshotError, HomeshotResult};
pub use job::batch::{BatchOpts, BatchRenderer, CancelToken, JobHandle, JobOutcome};
pub use job::events::{FnObserver, JobEvent, JobObserver};
pub use job::request::{RenderRequest, RenderTarget};
pub use job::state::{JobSnapshot, JobStatus, RenderJobState};
pub use render::backend::{LiveView, NoProgress, PhysicalRenderer, RenderProgress, SwapListener};
pub use render::capture::{
    Capture, CaptureOpts, CapturePair, DEFAULT_SWAP_TIMEOUT, SwapSignal, capture_frame,
    capture_pair,
};
pub use render::frame::FrameBuffer;
pub use render::icon::generate_icon;
pub use render::matte::matte;
pub use render::select::{
    Fidelity, QUALITY_LEVEL_COUNT, QualityLevel, Selection, Strategy, min_supported_level, select,
};
pub use render::software::{SoftwareView, SupersampledRenderer};
pub use render::surface::{SurfaceLease, SurfaceSlot};
pub use scene::aspect::{AspectRatio, PhotoSize};
pub use scene::camera::{DEFAULT_FIELD_OF_VIEW, Lens, Viewpoint};
pub use scene::color::SceneColor;
pub use scene::document::{Block, HomeScene, SceneDocument};
