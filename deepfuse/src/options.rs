use std::path::PathBuf;

use crate::foundation::error::{DeepError, DeepResult};

/// The configuration surface the compositor core consumes.
///
/// Front-ends (the CLI, tests) fill this in; the core only validates and
/// reads it. `verbose` gates diagnostics and never alters pixel output.
#[derive(Clone, Debug)]
pub struct Options {
    /// Ordered layer paths, front-end already stripped of the output prefix.
    pub input_files: Vec<PathBuf>,
    /// Per-layer additive depth offset. Empty means all zero; otherwise the
    /// length must match `input_files`.
    pub input_z_offsets: Vec<f32>,
    /// Depth epsilon for near-coincident sample fusion; 0 disables fusion.
    pub merge_threshold: f32,
    /// Write the merged deep image.
    pub deep_output: bool,
    /// Write the flattened EXR.
    pub flat_output: bool,
    /// Write the PNG preview.
    pub png_output: bool,
    /// Prefix prepended to every output filename.
    pub output_prefix: String,
    /// Emit detailed diagnostics.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            input_files: Vec::new(),
            input_z_offsets: Vec::new(),
            merge_threshold: 0.001,
            deep_output: false,
            flat_output: true,
            png_output: true,
            output_prefix: String::new(),
            verbose: false,
        }
    }
}

impl Options {
    /// Options for the given layers with default outputs and offsets.
    pub fn for_layers(
        input_files: impl IntoIterator<Item = impl Into<PathBuf>>,
        output_prefix: impl Into<String>,
    ) -> Self {
        Self {
            input_files: input_files.into_iter().map(Into::into).collect(),
            output_prefix: output_prefix.into(),
            ..Self::default()
        }
    }

    /// Reject out-of-range values before any file is touched.
    pub fn validate(&self) -> DeepResult<()> {
        if !(self.merge_threshold >= 0.0) {
            return Err(DeepError::invalid_config(format!(
                "merge threshold must be >= 0, got {}",
                self.merge_threshold
            )));
        }
        if self.input_files.len() < 2 {
            return Err(DeepError::invalid_config(format!(
                "need at least two input layers, got {}",
                self.input_files.len()
            )));
        }
        if !self.input_z_offsets.is_empty() && self.input_z_offsets.len() != self.input_files.len()
        {
            return Err(DeepError::invalid_config(format!(
                "{} z offsets for {} layers",
                self.input_z_offsets.len(),
                self.input_files.len()
            )));
        }
        Ok(())
    }

    /// Depth offset for `layer`, defaulting to 0.
    pub fn z_offset(&self, layer: usize) -> f32 {
        self.input_z_offsets.get(layer).copied().unwrap_or(0.0)
    }
}
