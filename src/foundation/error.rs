/// Convenience result type used across Hues.
pub type HuesResult<T> = Result<T, HuesError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum HuesError {
    /// Missing, unparseable or zero-length rhythm track.
    #[error("invalid rhythm track: {0}")]
    InvalidRhythmTrack(String),

    /// The duration probe could not determine a media duration.
    #[error("duration unavailable for '{0}'")]
    DurationUnavailable(String),

    /// Invalid user-provided or session configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while cataloguing or opening respack assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while spawning or streaming to the encoder process.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HuesError {
    /// Build a [`HuesError::InvalidRhythmTrack`] value.
    pub fn rhythm(msg: impl Into<String>) -> Self {
        Self::InvalidRhythmTrack(msg.into())
    }

    /// Build a [`HuesError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HuesError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`HuesError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
