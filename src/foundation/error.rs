/// Convenience result type used across the replay crate.
pub type ReplayResult<T> = Result<T, ReplayError>;

/// Recoverable error taxonomy for replay APIs.
///
/// Integration bugs (a node registered twice, a deletion for an untracked node) are not
/// represented here: they abort through assertions because the key accounting cannot be
/// trusted afterwards.
#[derive(thiserror::Error, Debug)]
pub enum ReplayError {
    /// Invalid caller-provided data, configuration, or keyframe document contents.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors reading or writing an external store.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReplayError {
    /// Build a [`ReplayError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReplayError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`ReplayError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
