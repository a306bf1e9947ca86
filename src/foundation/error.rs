/// Convenience result type used across latentloop.
pub type LoopResult<T> = Result<T, LoopError>;

/// Top-level error type.
#[derive(thiserror::Error, Debug)]
pub enum LoopError {
    /// An argument or derived value is out of range.
    #[error("validation error: {0}")]
    Validation(String),

    /// A config or manifest file is malformed or inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// A generator call failed where the caller cannot skip it.
    #[error("generation error: {0}")]
    Generation(#[from] GenerationFailure),

    /// Wrapped lower-level error (IO, JSON, image encoding).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoopError {
    /// Construct a [`LoopError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Construct a [`LoopError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// A generator rejected one latent vector.
///
/// The generation pipeline logs these and skips the waypoint; nothing retries.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("generator failed: {reason}")]
pub struct GenerationFailure {
    /// What the generator reported.
    pub reason: String,
}

impl GenerationFailure {
    /// Wrap a failure reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
