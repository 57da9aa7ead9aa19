//! Error types for index resolution.

use sdx_core::CoreError;
use thiserror::Error;

/// Failures reported by an [`ObjectStore`](crate::store::ObjectStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store rejected write: {0}")]
    Rejected(String),
}

/// Errors that can occur while reading or writing an index.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Resolver requires a bucket name")]
    MissingBucket,

    #[error("Index payloads must be opaque, not multipart: {0}")]
    MultipartContentType(String),

    #[error("Index name must not be empty")]
    EmptyIndexName,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Codec(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, IndexError>;
