//! Deepfuse composites **deep images** (rasters whose pixels carry ordered,
//! depth-tagged premultiplied RGBA samples) into one merged deep image, and
//! flattens the result to a conventional RGBA raster.
//!
//! The core is a streaming three-stage pipeline over a sliding window of
//! scanlines, bounded in memory regardless of image height:
//!
//! - A *Loader* pulls each layer's scanline through the [`DeepSource`]
//!   contract
//! - A *Merger* fuses per-pixel sample lists with correct volumetric
//!   splitting and near-coincidence fusion ([`PixelMerger`])
//! - A *Flattener* resolves merged rows front to back into a [`FlatImage`]
//!   and optionally streams the deep rows into a [`DeepSink`]
//!
//! [`composite`] runs the whole thing from an [`Options`] description.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compose;
mod foundation;

/// Deep sample, pixel, image and scanline-row containers.
pub mod deep;
/// Front-to-back resolution of deep pixels into flat RGBA.
pub mod flatten;
/// The per-pixel merge algorithm.
pub mod merge;
/// The configuration surface the core consumes.
pub mod options;
/// Output writers and the merged-deep sink contract.
pub mod output;
/// The three-stage streaming pipeline.
pub mod pipeline;
/// Analytic deep-layer generators for demos and tests.
pub mod scene;
/// The layer read contract and bundled sources.
pub mod source;

pub use compose::{CompositeReport, composite};
pub use deep::image::DeepImage;
pub use deep::row::DeepRow;
pub use deep::sample::{DeepPixel, DeepSample};
pub use flatten::{FlatImage, flatten_pixel, flatten_row};
pub use foundation::error::{DeepError, DeepResult};
pub use merge::{PixelInput, PixelMerger};
pub use options::Options;
pub use output::{DeepSink, JsonDeepSink, MemoryDeepSink, write_flat_exr, write_png};
pub use pipeline::{PipelineOpts, status::RowStatus};
pub use source::{DeepSource, layer::LayerSpec, memory::MemorySource};
