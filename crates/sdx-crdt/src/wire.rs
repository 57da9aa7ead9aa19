//! Wire-level CRDT fetch responses.
//!
//! These mirror what a transport hands over after reading a data-type fetch
//! reply: a declared data type, an optional opaque causal context and one
//! value slot per data type. Tags are carried as raw integers on the wire
//! and mapped onto closed enums with an `Unknown` catch-all so a newer
//! server can introduce kinds this client does not understand yet.

use serde::{Deserialize, Serialize};

/// Declared data type of a fetch response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum DataType {
    Counter,
    Set,
    Map,
    Hll,
    GSet,
    Unknown(i32),
}

impl From<i32> for DataType {
    fn from(tag: i32) -> Self {
        match tag {
            1 => DataType::Counter,
            2 => DataType::Set,
            3 => DataType::Map,
            4 => DataType::Hll,
            5 => DataType::GSet,
            other => DataType::Unknown(other),
        }
    }
}

impl From<DataType> for i32 {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Counter => 1,
            DataType::Set => 2,
            DataType::Map => 3,
            DataType::Hll => 4,
            DataType::GSet => 5,
            DataType::Unknown(tag) => tag,
        }
    }
}

/// Field type tag of one map entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum FieldType {
    Counter,
    Set,
    Register,
    Flag,
    Map,
    Unknown(i32),
}

impl From<i32> for FieldType {
    fn from(tag: i32) -> Self {
        match tag {
            1 => FieldType::Counter,
            2 => FieldType::Set,
            3 => FieldType::Register,
            4 => FieldType::Flag,
            5 => FieldType::Map,
            other => FieldType::Unknown(other),
        }
    }
}

impl From<FieldType> for i32 {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Counter => 1,
            FieldType::Set => 2,
            FieldType::Register => 3,
            FieldType::Flag => 4,
            FieldType::Map => 5,
            FieldType::Unknown(tag) => tag,
        }
    }
}

/// Name and type of a map field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapField {
    pub name: String,
    pub field_type: FieldType,
}

/// One field of a map response.
///
/// Only the value slot matching `field.field_type` is meaningful; the
/// others are left empty by the server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub field: MapField,
    #[serde(default)]
    pub counter_value: Option<i64>,
    #[serde(default)]
    pub set_value: Vec<Vec<u8>>,
    #[serde(default)]
    pub register_value: Option<Vec<u8>>,
    #[serde(default)]
    pub flag_value: Option<bool>,
    #[serde(default)]
    pub map_value: Vec<MapEntry>,
}

impl MapEntry {
    fn empty(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: MapField {
                name: name.into(),
                field_type,
            },
            counter_value: None,
            set_value: Vec::new(),
            register_value: None,
            flag_value: None,
            map_value: Vec::new(),
        }
    }

    pub fn counter(name: impl Into<String>, value: i64) -> Self {
        Self {
            counter_value: Some(value),
            ..Self::empty(name, FieldType::Counter)
        }
    }

    pub fn flag(name: impl Into<String>, value: bool) -> Self {
        Self {
            flag_value: Some(value),
            ..Self::empty(name, FieldType::Flag)
        }
    }

    pub fn register(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            register_value: Some(value.into()),
            ..Self::empty(name, FieldType::Register)
        }
    }

    pub fn set<I, V>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Vec<u8>>,
    {
        Self {
            set_value: members.into_iter().map(Into::into).collect(),
            ..Self::empty(name, FieldType::Set)
        }
    }

    pub fn map(name: impl Into<String>, entries: Vec<MapEntry>) -> Self {
        Self {
            map_value: entries,
            ..Self::empty(name, FieldType::Map)
        }
    }

    /// An entry carrying a raw type tag, as a newer server might send.
    pub fn with_tag(name: impl Into<String>, tag: i32) -> Self {
        Self::empty(name, FieldType::from(tag))
    }
}

/// Counter slot of a fetch response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterResponse {
    pub value: Option<i64>,
}

impl CounterResponse {
    pub fn new(value: i64) -> Self {
        Self { value: Some(value) }
    }
}

/// Member-list slot shared by sets, grow-only sets and HyperLogLogs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetResponse {
    pub value: Option<Vec<Vec<u8>>>,
}

impl SetResponse {
    pub fn new<I, V>(members: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Vec<u8>>,
    {
        Self {
            value: Some(members.into_iter().map(Into::into).collect()),
        }
    }
}

/// Map slot of a fetch response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapResponse {
    pub entries: Option<Vec<MapEntry>>,
}

impl MapResponse {
    pub fn new(entries: Vec<MapEntry>) -> Self {
        Self {
            entries: Some(entries),
        }
    }
}

/// All value slots a fetch response can carry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtValue {
    #[serde(default)]
    pub counter: CounterResponse,
    #[serde(default)]
    pub set: SetResponse,
    #[serde(default)]
    pub hll: SetResponse,
    #[serde(default)]
    pub gset: SetResponse,
    #[serde(default)]
    pub map: MapResponse,
}

/// A complete data-type fetch response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtFetchResponse {
    /// Opaque causal context to echo back on the next update.
    #[serde(default)]
    pub context: Option<Vec<u8>>,
    pub data_type: DataType,
    /// `None` when the object does not exist on the server.
    #[serde(default)]
    pub value: Option<DtValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_i32() {
        for tag in 1..=5 {
            assert_eq!(i32::from(FieldType::from(tag)), tag);
            assert_eq!(i32::from(DataType::from(tag)), tag);
        }
        assert_eq!(FieldType::from(42), FieldType::Unknown(42));
        assert_eq!(DataType::from(0), DataType::Unknown(0));
    }

    #[test]
    fn test_field_type_serializes_as_integer() {
        let json = serde_json::to_string(&MapEntry::flag("on", true).field).unwrap();
        assert_eq!(json, r#"{"name":"on","field_type":4}"#);
    }

    #[test]
    fn test_constructors_fill_matching_slot() {
        let entry = MapEntry::set("tags", ["a", "b"]);
        assert_eq!(entry.field.field_type, FieldType::Set);
        assert_eq!(entry.set_value, vec![b"a".to_vec(), b"b".to_vec()]);
        assert!(entry.counter_value.is_none());
    }
}
