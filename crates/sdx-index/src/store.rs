//! Object store boundary.
//!
//! The resolver only needs three things from the store: fetch every sibling
//! of a key, write a single-valued object, and tell whether a fetched object
//! has diverged. Connection handling, node selection and wire framing live
//! behind [`ObjectStore`] implementations.

use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One concurrently written version of an object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sibling {
    pub content_type: String,
    /// `None` for a sibling that carries no payload (e.g. a tombstone).
    pub value: Option<Vec<u8>>,
}

impl Sibling {
    pub fn new(content_type: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            value: Some(value),
        }
    }

    /// A sibling with no payload.
    pub fn empty(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            value: None,
        }
    }
}

/// An addressable object and all of its sibling versions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RObject {
    pub bucket: String,
    pub key: String,
    /// Opaque causal token from the last fetch. Writing with the current
    /// token supersedes every sibling the fetch observed.
    pub vclock: Option<Vec<u8>>,
    pub siblings: Vec<Sibling>,
}

impl RObject {
    /// An empty placeholder for a key that does not exist yet.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            vclock: None,
            siblings: Vec::new(),
        }
    }

    /// Replace all siblings with a single value.
    pub fn with_content(mut self, content: Sibling) -> Self {
        self.siblings = vec![content];
        self
    }

    pub fn has_siblings(&self) -> bool {
        self.siblings.len() > 1
    }
}

/// Abstract object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Fetch all siblings stored under `bucket`/`key`, or `None` if absent.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Option<RObject>, StoreError>;

    /// Store a single-valued object.
    async fn store(&self, object: &RObject) -> Result<(), StoreError>;
}

#[derive(Clone, Debug, Default)]
struct StoredValue {
    version: u64,
    siblings: Vec<Sibling>,
}

fn encode_vclock(version: u64) -> Vec<u8> {
    version.to_be_bytes().to_vec()
}

/// In-memory store with allow-multiple semantics.
///
/// A write carrying the current vclock replaces every sibling; a blind or
/// stale write is kept next to the existing siblings.
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, String), StoredValue>>,
    fetches: AtomicUsize,
    stores: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a key with an explicit sibling list, bypassing vclock rules.
    pub fn seed(&self, bucket: &str, key: &str, siblings: Vec<Sibling>) {
        let mut objects = self.objects.write();
        let entry = objects
            .entry((bucket.to_string(), key.to_string()))
            .or_default();
        entry.version += 1;
        entry.siblings = siblings;
    }

    /// Number of siblings currently stored under a key.
    pub fn sibling_count(&self, bucket: &str, key: &str) -> usize {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .map(|value| value.siblings.len())
            .unwrap_or(0)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn store_count(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Option<RObject>, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let objects = self.objects.read();

        Ok(objects
            .get(&(bucket.to_string(), key.to_string()))
            .map(|value| RObject {
                bucket: bucket.to_string(),
                key: key.to_string(),
                vclock: Some(encode_vclock(value.version)),
                siblings: value.siblings.clone(),
            }))
    }

    async fn store(&self, object: &RObject) -> Result<(), StoreError> {
        if object.siblings.len() != 1 {
            return Err(StoreError::Rejected(format!(
                "expected exactly one value for {}/{}, got {}",
                object.bucket,
                object.key,
                object.siblings.len()
            )));
        }

        self.stores.fetch_add(1, Ordering::SeqCst);
        let mut objects = self.objects.write();
        let entry = objects
            .entry((object.bucket.clone(), object.key.clone()))
            .or_default();

        let current = encode_vclock(entry.version);
        if object.vclock.as_deref() == Some(current.as_slice()) {
            entry.siblings.clear();
        }
        entry.siblings.extend(object.siblings.iter().cloned());
        entry.version += 1;

        Ok(())
    }
}
