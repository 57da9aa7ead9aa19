//! Grow-only Set - elements can only be added, never removed
//!
//! The set travels through the object store as an opaque payload: the
//! encoding is a JSON array of the elements in sorted order, so two equal
//! sets always encode to the same bytes.

use crate::error::Result;
use crate::lattice::Lattice;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GSet<T: Ord + Clone> {
    elements: BTreeSet<T>,
}

impl<T: Ord + Clone> GSet<T> {
    pub fn new() -> Self {
        Self {
            elements: BTreeSet::new(),
        }
    }

    /// Add an element (the only mutation allowed). Returns `true` if it was new.
    pub fn add(&mut self, value: T) -> bool {
        self.elements.insert(value)
    }

    /// Union `other` into this set and hand back `self` for chaining.
    pub fn merge(&mut self, other: &GSet<T>) -> &mut Self {
        for value in &other.elements {
            if !self.elements.contains(value) {
                self.elements.insert(value.clone());
            }
        }
        self
    }

    pub fn contains(&self, value: &T) -> bool {
        self.elements.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<T> GSet<T>
where
    T: Ord + Clone + Serialize + DeserializeOwned,
{
    /// Encode the set as an opaque payload.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Rebuild a set from a payload produced by [`GSet::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Decode a sibling payload and union it in.
    ///
    /// On a decode failure `self` is left untouched.
    pub fn merge_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        let other = Self::from_bytes(bytes)?;
        Ok(self.merge(&other))
    }
}

impl<T: Ord + Clone> Default for GSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone> FromIterator<T> for GSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord + Clone> Extend<T> for GSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.elements.extend(iter);
    }
}

impl<T: Ord + Clone> IntoIterator for GSet<T> {
    type Item = T;
    type IntoIter = std::collections::btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a, T: Ord + Clone> IntoIterator for &'a GSet<T> {
    type Item = &'a T;
    type IntoIter = std::collections::btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: Ord + Clone> Lattice for GSet<T> {
    fn bottom() -> Self {
        Self::new()
    }

    fn join(&self, other: &Self) -> Self {
        Self {
            elements: self.elements.union(&other.elements).cloned().collect(),
        }
    }
}
