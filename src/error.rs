use thiserror::Error;

/// Main error type for spindex operations
#[derive(Error, Debug)]
pub enum SpindexError {
    /// A write was attempted on a writer that is no longer open
    #[error("Index state error: {0}")]
    IndexState(String),

    #[error("Index reader is closed")]
    ClosedIndex,

    #[error("Boolean query has no MUST or SHOULD clause")]
    EmptyQuery,

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Index is locked by another open writer")]
    LockObtainFailed,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for spindex operations
pub type Result<T> = std::result::Result<T, SpindexError>;

impl SpindexError {
    /// True when the error comes from calling the API out of contract
    /// (wrong state, closed handle, malformed query) rather than from data.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            SpindexError::IndexState(_)
                | SpindexError::ClosedIndex
                | SpindexError::EmptyQuery
                | SpindexError::LockObtainFailed
        )
    }
}
