//! Merge-on-read indices for the Sardonyx client.
//!
//! An index is a grow-only set of keys stored as a single object. Writers
//! never read before writing, so concurrent writers leave siblings behind;
//! readers fold every sibling into one set and store the result back,
//! collapsing the siblings for whoever reads next.
//!
//! ```rust
//! use sdx_index::{IndexResolver, MemoryStore, ResolverConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(MemoryStore::new());
//! let config = ResolverConfig::builder().bucket("indexes").build();
//! let resolver = IndexResolver::new(store, config).unwrap();
//!
//! resolver.put_index("users_by_team", "alice").await.unwrap();
//! resolver.put_index("users_by_team", "bob").await.unwrap();
//!
//! let members = resolver.get_index("users_by_team").await.unwrap();
//! assert_eq!(members.len(), 2);
//! # }
//! ```
//!
//! - [`store`] - object store boundary and an in-memory implementation
//! - [`config`] - resolver configuration
//! - [`index`] - `put_index` / `get_index`
//! - [`error`] - error types

pub mod config;
pub mod error;
pub mod index;
pub mod store;

pub use config::{ResolverConfig, ResolverConfigBuilder};
pub use error::{IndexError, Result, StoreError};
pub use index::IndexResolver;
pub use store::{MemoryStore, ObjectStore, RObject, Sibling};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::ResolverConfig;
    pub use crate::error::IndexError;
    pub use crate::index::IndexResolver;
    pub use crate::store::{ObjectStore, RObject, Sibling};
    pub use sdx_core::GSet;
}
