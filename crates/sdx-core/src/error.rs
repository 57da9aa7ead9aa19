//! Error types for the core CRDT types.

use thiserror::Error;

/// Errors raised while encoding or decoding a CRDT payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Codec error: {0}")]
    Codec(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Codec(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
