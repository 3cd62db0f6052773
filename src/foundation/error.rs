/// Convenience result type used across the wall engine.
pub type WallResult<T> = Result<T, WallError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Unknown item ids and out-of-range numeric controls never produce an error: they are
/// no-ops or clamped at the call site. The variants below cover the cases that must fail fast.
#[derive(thiserror::Error, Debug)]
pub enum WallError {
    /// Invalid configuration or ingested data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A random choice was requested from an empty table.
    #[error("empty choice: {0}")]
    EmptyChoice(String),

    /// A facade was used before its services were constructed.
    #[error("not initialized: {0}")]
    NotInitialized(String),

    /// Transport failure talking to the background computation unit.
    #[error("worker error: {0}")]
    Worker(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors while encoding or writing a frame snapshot.
    #[error("export error: {0}")]
    Export(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WallError {
    /// Build a [`WallError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WallError::EmptyChoice`] value.
    pub fn empty_choice(msg: impl Into<String>) -> Self {
        Self::EmptyChoice(msg.into())
    }

    /// Build a [`WallError::NotInitialized`] value.
    pub fn not_initialized(msg: impl Into<String>) -> Self {
        Self::NotInitialized(msg.into())
    }

    /// Build a [`WallError::Worker`] value.
    pub fn worker(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    /// Build a [`WallError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`WallError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

impl From<serde_json::Error> for WallError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
