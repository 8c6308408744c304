//! One-call front door: validate options, preload layers, run the pipeline
//! and write the requested outputs.

use std::path::PathBuf;

use crate::flatten::FlatImage;
use crate::foundation::error::DeepResult;
use crate::options::Options;
use crate::output::sink::{DeepSink, JsonDeepSink};
use crate::output::{write_flat_exr, write_png};
use crate::pipeline::{self, PipelineOpts};
use crate::source;

/// What a composite run produced.
#[derive(Debug)]
pub struct CompositeReport {
    /// The flattened raster; always produced, written only when requested.
    pub flat: FlatImage,
    /// Output files written, in write order.
    pub written: Vec<PathBuf>,
}

/// Composite the configured layers end to end.
///
/// Preload failures (missing file, missing channel, mismatched dimensions,
/// bad config) abort before the pipeline starts; pipeline and writer
/// failures are returned as-is. Exit-code mapping is the front-end's job.
pub fn composite(options: &Options, pipeline_opts: &PipelineOpts) -> DeepResult<CompositeReport> {
    options.validate()?;
    let sources = source::open_layers(options)?;

    let deep_path = PathBuf::from(format!("{}_merged.json", options.output_prefix));
    let mut deep_sink = options
        .deep_output
        .then(|| JsonDeepSink::new(deep_path.clone()));

    let flat = pipeline::run(
        sources,
        options,
        pipeline_opts,
        deep_sink.as_mut().map(|s| s as &mut dyn DeepSink),
    )?;

    let mut written = Vec::new();
    if options.deep_output {
        tracing::info!(path = %deep_path.display(), "wrote merged deep layer");
        written.push(deep_path);
    }
    if options.flat_output {
        let path = PathBuf::from(format!("{}_flat.exr", options.output_prefix));
        write_flat_exr(&path, &flat)?;
        tracing::info!(path = %path.display(), "wrote flattened exr");
        written.push(path);
    }
    if options.png_output {
        let path = PathBuf::from(format!("{}.png", options.output_prefix));
        write_png(&path, &flat)?;
        tracing::info!(path = %path.display(), "wrote png preview");
        written.push(path);
    }

    Ok(CompositeReport { flat, written })
}
