//! Error types for lazy streams
//!
//! Pipelines are generic over their error type, so errors raised by user
//! producers and stage functions travel to the terminal operation unchanged.
//! `StreamError` is the default error type and the one the library itself
//! raises (capacity bounds, configuration).

use thiserror::Error;

/// Main error type for lazy stream operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StreamError {
    /// A source failed while producing its next element
    #[error("Producer error: {0}")]
    Producer(String),
    /// A map/filter/flat_map/reduce function failed
    #[error("Stage error: {0}")]
    Stage(String),
    /// A collecting terminal hit its configured `max_items`
    #[error("Collected more than {limit} items")]
    CapacityExceeded { limit: usize },
    /// Invalid or unparsable configuration
    #[error("Configuration error: {0}")]
    Config(String),
    /// Custom error with message
    #[error("Stream error: {0}")]
    Custom(String),
}

impl StreamError {
    pub fn producer(msg: impl Into<String>) -> Self {
        StreamError::Producer(msg.into())
    }

    pub fn stage(msg: impl Into<String>) -> Self {
        StreamError::Stage(msg.into())
    }
}

impl From<serde_json::Error> for StreamError {
    fn from(err: serde_json::Error) -> Self {
        StreamError::Config(err.to_string())
    }
}

/// Result type for lazy stream operations
pub type StreamResult<T> = Result<T, StreamError>;
