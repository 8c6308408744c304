/// Crate-wide result alias.
pub type DeepResult<T> = Result<T, DeepError>;

/// Failure kinds produced by the compositor.
///
/// The first four variants abort before the pipeline starts; the remaining
/// ones stop a running pipeline through the shared failure flag.
#[derive(thiserror::Error, Debug)]
pub enum DeepError {
    /// Option values out of range (negative threshold, too few layers, …).
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Input path is not a readable deep layer.
    #[error("missing file: {0}")]
    MissingFile(String),

    /// A required channel (R, G, B, A or Z) is absent from a layer.
    #[error("missing channel: {0}")]
    MissingChannel(String),

    /// Layer dimensions disagree with the first layer.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// NaN depth or `depth_back < depth` observed at read or merge time.
    #[error("invalid sample: {0}")]
    InvalidSample(String),

    /// A row buffer could not be grown.
    #[error("allocation failure: {0}")]
    Allocation(String),

    /// A downstream writer rejected data.
    #[error("output write failure: {0}")]
    OutputWrite(String),

    /// Anything bubbled up from a collaborator crate.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeepError {
    /// Build an [`DeepError::InvalidConfig`].
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Build a [`DeepError::MissingFile`].
    pub fn missing_file(msg: impl Into<String>) -> Self {
        Self::MissingFile(msg.into())
    }

    /// Build a [`DeepError::MissingChannel`].
    pub fn missing_channel(msg: impl Into<String>) -> Self {
        Self::MissingChannel(msg.into())
    }

    /// Build a [`DeepError::DimensionMismatch`].
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Build an [`DeepError::InvalidSample`].
    pub fn invalid_sample(msg: impl Into<String>) -> Self {
        Self::InvalidSample(msg.into())
    }

    /// Build an [`DeepError::Allocation`].
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build an [`DeepError::OutputWrite`].
    pub fn output_write(msg: impl Into<String>) -> Self {
        Self::OutputWrite(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
