//! Error types for the event system

use thiserror::Error;

/// Event system error
#[derive(Error, Debug)]
pub enum EventError {
    #[error("Invalid event '{id}': {reason}")]
    InvalidEvent { id: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type EventResult<T> = Result<T, EventError>;
