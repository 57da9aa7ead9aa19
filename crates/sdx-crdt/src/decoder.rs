//! Pure decoding of fetch responses into [`MapTree`] and friends.
//!
//! Nothing here fails: a missing value is `None`, and a map field with a
//! type tag this client does not know is skipped.

use crate::value::{ByteSet, CrdtValue, MapTree};
use crate::wire::{
    CounterResponse, DataType, DtFetchResponse, FieldType, MapEntry, MapResponse, SetResponse,
};

/// Result of decoding a whole fetch response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedResponse {
    /// Causal context to send back with the next update, if the server sent one.
    pub context: Option<Vec<u8>>,
    /// `None` when the object does not exist or its data type is unknown.
    pub value: Option<CrdtValue>,
}

/// Counter value, already resolved by the server.
pub fn decode_counter(response: &CounterResponse) -> Option<i64> {
    response.value
}

pub fn decode_set(response: &SetResponse) -> Option<ByteSet> {
    members(response)
}

/// HyperLogLog members. The client treats the sketch as a plain set.
pub fn decode_hll(response: &SetResponse) -> Option<ByteSet> {
    members(response)
}

pub fn decode_gset(response: &SetResponse) -> Option<ByteSet> {
    members(response)
}

fn members(response: &SetResponse) -> Option<ByteSet> {
    response
        .value
        .as_ref()
        .map(|values| values.iter().cloned().collect())
}

/// Decode a map response into a fresh tree.
///
/// A response without entries yields a tree with all five slots empty.
pub fn decode_map(response: &MapResponse) -> MapTree {
    let mut tree = MapTree::new();
    if let Some(entries) = &response.entries {
        fill_map(&mut tree, entries);
    }
    tree
}

fn fill_map(destination: &mut MapTree, entries: &[MapEntry]) {
    for entry in entries {
        let name = &entry.field.name;
        match entry.field.field_type {
            FieldType::Counter => match entry.counter_value {
                Some(value) => {
                    destination.counters.insert(name.clone(), value);
                }
                None => missing_value(entry),
            },
            FieldType::Flag => match entry.flag_value {
                Some(value) => {
                    destination.flags.insert(name.clone(), value);
                }
                None => missing_value(entry),
            },
            FieldType::Register => match &entry.register_value {
                Some(value) => {
                    destination.registers.insert(name.clone(), value.clone());
                }
                None => missing_value(entry),
            },
            FieldType::Set => {
                let members: ByteSet = entry.set_value.iter().cloned().collect();
                destination.sets.insert(name.clone(), members);
            }
            FieldType::Map => {
                let mut nested = MapTree::new();
                fill_map(&mut nested, &entry.map_value);
                destination.maps.insert(name.clone(), nested);
            }
            FieldType::Unknown(tag) => {
                tracing::trace!(field = %name, tag, "skipping map field with unknown type tag");
            }
        }
    }
}

fn missing_value(entry: &MapEntry) {
    tracing::trace!(
        field = %entry.field.name,
        field_type = ?entry.field.field_type,
        "skipping map field without a value"
    );
}

/// Decode a whole fetch response, dispatching on its declared data type.
pub fn decode_response(response: &DtFetchResponse) -> DecodedResponse {
    let value = response.value.as_ref().and_then(|value| match response.data_type {
        DataType::Counter => decode_counter(&value.counter).map(CrdtValue::Counter),
        DataType::Set => decode_set(&value.set).map(CrdtValue::Set),
        DataType::Hll => decode_hll(&value.hll).map(CrdtValue::Hll),
        DataType::GSet => decode_gset(&value.gset).map(CrdtValue::GSet),
        DataType::Map => Some(CrdtValue::Map(decode_map(&value.map))),
        DataType::Unknown(tag) => {
            tracing::trace!(tag, "skipping response with unknown data type");
            None
        }
    });

    DecodedResponse {
        context: response.context.clone(),
        value,
    }
}
