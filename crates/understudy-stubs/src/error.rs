//! Error types for the stub kit.

/// Result type alias for stub kit operations.
pub type Result<T> = std::result::Result<T, StubError>;

/// Stub kit errors.
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    /// Core double lifecycle error.
    #[error("double error: {0}")]
    Double(#[from] understudy_core::DoubleError),

    /// A canned payload could not be serialized to a JSON value.
    #[error("payload serialization error: {0}")]
    Payload(#[from] serde_json::Error),
}

impl StubError {
    /// Returns true if the underlying error means global state may be
    /// corrupted and the remaining run should abort.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        match self {
            Self::Double(err) => err.is_fatal(),
            Self::Payload(_) => false,
        }
    }
}
