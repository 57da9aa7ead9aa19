//! Merge-on-read index resolution.

use crate::config::ResolverConfig;
use crate::error::{IndexError, Result};
use crate::store::{ObjectStore, RObject, Sibling};
use sdx_core::{GSet, Lattice};
use std::sync::Arc;

/// Reads and writes grow-only set indices through an [`ObjectStore`].
///
/// Writes are blind: `put_index` never looks at what is already stored, so
/// two writers racing on the same index leave two siblings. `get_index`
/// folds every sibling back into one set.
pub struct IndexResolver<S: ObjectStore> {
    store: Arc<S>,
    config: ResolverConfig,
}

impl<S: ObjectStore> IndexResolver<S> {
    /// Create a resolver.
    ///
    /// Fails if the configuration names no bucket or stamps payloads with a
    /// multipart content type.
    pub fn new(store: Arc<S>, config: ResolverConfig) -> Result<Self> {
        if config.bucket.trim().is_empty() {
            return Err(IndexError::MissingBucket);
        }
        if is_multipart(&config.content_type) {
            return Err(IndexError::MultipartContentType(config.content_type));
        }
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Store a one-element set holding `key` under `index`.
    pub async fn put_index(&self, index: &str, key: impl Into<String>) -> Result<()> {
        check_index_name(index)?;

        let mut set = GSet::new();
        set.add(key.into());
        let object = RObject::new(&self.config.bucket, index).with_content(self.content(&set)?);

        self.store.store(&object).await?;
        tracing::debug!(bucket = %self.config.bucket, index, "stored index entry");
        Ok(())
    }

    /// Fetch `index`, merge all of its siblings and return the union.
    ///
    /// Siblings without a payload or with a payload that does not decode
    /// contribute nothing. When more than one sibling was seen and
    /// write-back is enabled, the merged set is stored with the fetched
    /// vclock so later readers find a single value. If any payload failed
    /// to decode the siblings are left in place, since the store would
    /// otherwise replace the unreadable one.
    pub async fn get_index(&self, index: &str) -> Result<GSet<String>> {
        check_index_name(index)?;

        let object = self
            .store
            .fetch(&self.config.bucket, index)
            .await?
            .unwrap_or_else(|| RObject::new(&self.config.bucket, index));

        let siblings = object.siblings.len();
        tracing::debug!(bucket = %self.config.bucket, index, siblings, "fetched index");
        if siblings > self.config.sibling_warn_threshold {
            tracing::warn!(
                bucket = %self.config.bucket,
                index,
                siblings,
                threshold = self.config.sibling_warn_threshold,
                "index has an unusually large number of siblings"
            );
        }

        let SiblingMerge {
            merged,
            undecodable,
        } = merge_siblings(index, &object.siblings);

        if object.has_siblings() && self.config.write_back {
            if undecodable > 0 {
                tracing::warn!(
                    bucket = %self.config.bucket,
                    index,
                    undecodable,
                    "keeping siblings: some payloads could not be decoded"
                );
            } else {
                self.write_back(object, &merged).await;
            }
        }

        Ok(merged)
    }

    async fn write_back(&self, fetched: RObject, merged: &GSet<String>) {
        let content = match self.content(merged) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(index = %fetched.key, error = %err, "could not encode merged index");
                return;
            }
        };

        let resolved = fetched.with_content(content);
        match self.store.store(&resolved).await {
            Ok(()) => tracing::debug!(
                bucket = %resolved.bucket,
                index = %resolved.key,
                members = merged.len(),
                "wrote back merged index"
            ),
            Err(err) => tracing::warn!(
                bucket = %resolved.bucket,
                index = %resolved.key,
                error = %err,
                "write-back of merged index failed"
            ),
        }
    }

    fn content(&self, set: &GSet<String>) -> Result<Sibling> {
        Ok(Sibling::new(&self.config.content_type, set.to_bytes()?))
    }
}

fn check_index_name(index: &str) -> Result<()> {
    if index.is_empty() {
        return Err(IndexError::EmptyIndexName);
    }
    Ok(())
}

fn is_multipart(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(..10)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("multipart/"))
}

struct SiblingMerge {
    merged: GSet<String>,
    undecodable: usize,
}

/// Union of every decodable sibling payload.
fn merge_siblings(index: &str, siblings: &[Sibling]) -> SiblingMerge {
    let mut decoded = Vec::with_capacity(siblings.len());
    let mut undecodable = 0;

    for (position, sibling) in siblings.iter().enumerate() {
        let Some(payload) = &sibling.value else {
            tracing::trace!(index, position, "skipping sibling without payload");
            continue;
        };
        match GSet::from_bytes(payload) {
            Ok(set) => decoded.push(set),
            Err(err) => {
                undecodable += 1;
                tracing::warn!(index, position, error = %err, "skipping undecodable sibling");
            }
        }
    }

    SiblingMerge {
        merged: GSet::join_all(&decoded),
        undecodable,
    }
}
