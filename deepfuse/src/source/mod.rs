//! Read-side contract for deep layers, plus the preload pass.

/// JSON layer interchange reader.
pub mod layer;
/// In-memory source over a [`DeepImage`](crate::deep::image::DeepImage).
pub mod memory;

use std::path::Path;

use crate::deep::row::DeepRow;
use crate::foundation::error::{DeepError, DeepResult};
use crate::options::Options;

/// Channels every layer must provide.
pub const REQUIRED_CHANNELS: [&str; 5] = ["R", "G", "B", "A", "Z"];

/// Optional back-depth channel; readers synthesize `ZBack := Z` when absent,
/// turning every sample into a point.
pub const Z_BACK_CHANNEL: &str = "ZBack";

/// A handle to one deep layer, read one scanline at a time.
///
/// Only the loader stage touches a source, single-threaded; implementations
/// need no internal synchronization.
pub trait DeepSource: Send {
    /// Layer dimensions as `(width, height)`.
    fn dimensions(&self) -> (u32, u32);

    /// Return `true` when the layer stores the named channel
    /// (`"R"`, `"G"`, `"B"`, `"A"`, `"Z"` or `"ZBack"`).
    fn has_channel(&self, name: &str) -> bool;

    /// Read only the per-pixel sample counts for scanline `y`.
    ///
    /// The returned view stays valid until the next call on the same source.
    /// Panics when `y` is outside the layer.
    fn fetch_sample_counts(&mut self, y: u32) -> DeepResult<&[u32]>;

    /// Fill `row` with scanline `y`'s samples, six channels per sample in
    /// [`crate::deep::row::channel`] order.
    ///
    /// `row` must have been [`prepared`](DeepRow::prepare) from the counts
    /// returned by [`DeepSource::fetch_sample_counts`] for the same `y`.
    fn read_row(&mut self, y: u32, row: &mut DeepRow) -> DeepResult<()>;
}

/// Verify the mandatory channel set, warning when only `ZBack` is absent.
pub fn validate_channels(source: &dyn DeepSource, name: &str) -> DeepResult<()> {
    for ch in REQUIRED_CHANNELS {
        if !source.has_channel(ch) {
            return Err(DeepError::missing_channel(format!("{name}: {ch}")));
        }
    }
    if !source.has_channel(Z_BACK_CHANNEL) {
        tracing::warn!(layer = name, "no ZBack channel, all samples degrade to points");
    }
    Ok(())
}

/// Preload pass: open every configured layer before the pipeline starts.
///
/// Verifies that each path is a readable deep layer, that the required
/// channels are present, and that all dimensions match layer 0. Any failure
/// aborts here, before a single scanline is read.
pub fn open_layers(options: &Options) -> DeepResult<Vec<Box<dyn DeepSource>>> {
    let mut sources: Vec<Box<dyn DeepSource>> = Vec::with_capacity(options.input_files.len());
    let mut expected: Option<(u32, u32)> = None;

    for path in &options.input_files {
        let name = path.display().to_string();
        tracing::debug!(layer = %name, "preloading");

        let source = layer::open(Path::new(path))?;
        validate_channels(&source, &name)?;

        let dims = source.dimensions();
        match expected {
            None => expected = Some(dims),
            Some((w, h)) if dims != (w, h) => {
                return Err(DeepError::dimension_mismatch(format!(
                    "{name}: got {}x{}, expected {w}x{h}",
                    dims.0, dims.1
                )));
            }
            Some(_) => {}
        }

        tracing::debug!(layer = %name, width = dims.0, height = dims.1, "preloaded");
        sources.push(Box::new(source));
    }

    Ok(sources)
}
