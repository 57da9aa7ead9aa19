//! Decoded CRDT values.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A set of opaque byte-string members.
pub type ByteSet = BTreeSet<Vec<u8>>;

/// Plain value tree built from a map response.
///
/// Every level carries all five slots, even when the server sent nothing
/// for that level, so callers can index into nested maps without checking
/// for missing slots first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTree {
    pub counters: BTreeMap<String, i64>,
    pub flags: BTreeMap<String, bool>,
    pub registers: BTreeMap<String, Vec<u8>>,
    pub sets: BTreeMap<String, ByteSet>,
    pub maps: BTreeMap<String, MapTree>,
}

impl MapTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no slot holds any field.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
            && self.flags.is_empty()
            && self.registers.is_empty()
            && self.sets.is_empty()
            && self.maps.is_empty()
    }

    pub fn counter(&self, name: &str) -> Option<i64> {
        self.counters.get(name).copied()
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    pub fn register(&self, name: &str) -> Option<&[u8]> {
        self.registers.get(name).map(Vec::as_slice)
    }

    pub fn set(&self, name: &str) -> Option<&ByteSet> {
        self.sets.get(name)
    }

    pub fn map(&self, name: &str) -> Option<&MapTree> {
        self.maps.get(name)
    }

    /// Number of fields at this level, across all slots.
    pub fn field_count(&self) -> usize {
        self.counters.len()
            + self.flags.len()
            + self.registers.len()
            + self.sets.len()
            + self.maps.len()
    }
}

/// A decoded top-level data type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrdtValue {
    Counter(i64),
    Set(ByteSet),
    Hll(ByteSet),
    GSet(ByteSet),
    Map(MapTree),
}

impl CrdtValue {
    pub fn as_counter(&self) -> Option<i64> {
        match self {
            CrdtValue::Counter(value) => Some(*value),
            _ => None,
        }
    }

    /// Members of any set-shaped value (set, grow-only set or HyperLogLog).
    pub fn as_set(&self) -> Option<&ByteSet> {
        match self {
            CrdtValue::Set(members) | CrdtValue::Hll(members) | CrdtValue::GSet(members) => {
                Some(members)
            }
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapTree> {
        match self {
            CrdtValue::Map(tree) => Some(tree),
            _ => None,
        }
    }
}
