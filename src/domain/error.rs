//! Domain error types

use thiserror::Error;

/// Errors that can occur while building or running a signal generator
#[derive(Error, Debug)]
pub enum ExciterError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Carried history did not line up with what the next call needs.
    /// Logged by the generator; processing continues best-effort.
    #[error("Buffer accounting error in {stage}: {observed} samples available, {expected} expected")]
    BufferAccounting {
        stage: &'static str,
        observed: usize,
        expected: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for signal generator operations
pub type ExciterResult<T> = Result<T, ExciterError>;
