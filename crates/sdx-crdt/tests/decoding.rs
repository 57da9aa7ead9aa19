//! Integration tests for response decoding.
//!
//! Tests cover:
//! - Totality over arbitrary nested map responses
//! - Determinism when decoding the same wire bytes twice
//! - Deep nesting keeps every level's slots initialized

use proptest::prelude::*;
use sdx_crdt::{
    decode_map, decode_response, CrdtValue, DataType, DtFetchResponse, DtValue, MapEntry,
    MapResponse, MapTree, SetResponse,
};

fn leaf_entry() -> impl Strategy<Value = MapEntry> {
    let name = "[a-z]{1,4}";
    prop_oneof![
        (name, any::<i64>()).prop_map(|(n, v)| MapEntry::counter(n, v)),
        (name, any::<bool>()).prop_map(|(n, v)| MapEntry::flag(n, v)),
        (name, prop::collection::vec(any::<u8>(), 0..8))
            .prop_map(|(n, v)| MapEntry::register(n, v)),
        (name, prop::collection::vec("[a-z]{0,3}", 0..4)).prop_map(|(n, v)| MapEntry::set(n, v)),
        (name, 6i32..64).prop_map(|(n, tag)| MapEntry::with_tag(n, tag)),
    ]
}

fn map_entry() -> impl Strategy<Value = MapEntry> {
    leaf_entry().prop_recursive(4, 32, 6, |inner| {
        ("[a-z]{1,4}", prop::collection::vec(inner, 0..6))
            .prop_map(|(name, entries)| MapEntry::map(name, entries))
    })
}

fn map_response() -> impl Strategy<Value = MapResponse> {
    prop::option::of(prop::collection::vec(map_entry(), 0..8))
        .prop_map(|entries| MapResponse { entries })
}

fn max_depth(tree: &MapTree) -> usize {
    1 + tree.maps.values().map(max_depth).max().unwrap_or(0)
}

proptest! {
    #[test]
    fn decoding_is_total_and_deterministic(response in map_response()) {
        let bytes = serde_json::to_vec(&response).unwrap();

        let first: MapResponse = serde_json::from_slice(&bytes).unwrap();
        let second: MapResponse = serde_json::from_slice(&bytes).unwrap();

        prop_assert_eq!(decode_map(&first), decode_map(&second));
    }

    #[test]
    fn decoded_tree_never_deeper_than_wire(response in map_response()) {
        let tree = decode_map(&response);
        prop_assert!(max_depth(&tree) <= 6);
    }
}

#[test]
fn deep_nesting_initializes_each_level() {
    let response = MapResponse::new(vec![MapEntry::map(
        "a",
        vec![MapEntry::map(
            "b",
            vec![MapEntry::map("c", vec![MapEntry::flag("leaf", true)])],
        )],
    )]);

    let tree = decode_map(&response);
    let a = tree.map("a").unwrap();
    let b = a.map("b").unwrap();
    let c = b.map("c").unwrap();

    assert_eq!(c.flag("leaf"), Some(true));
    assert!(a.counters.is_empty() && a.sets.is_empty());
    assert!(b.registers.is_empty() && b.flags.is_empty());
}

#[test]
fn json_wire_with_unknown_tag_decodes() {
    let wire = r#"{
        "context": [1, 2, 3],
        "data_type": 3,
        "value": {
            "map": {
                "entries": [
                    {"field": {"name": "score", "field_type": 1}, "counter_value": 9},
                    {"field": {"name": "mystery", "field_type": 77}},
                    {"field": {"name": "profile", "field_type": 5}, "map_value": [
                        {"field": {"name": "nick", "field_type": 3}, "register_value": [104, 105]}
                    ]}
                ]
            }
        }
    }"#;

    let response: DtFetchResponse = serde_json::from_str(wire).unwrap();
    assert_eq!(response.data_type, DataType::Map);

    let decoded = decode_response(&response);
    assert_eq!(decoded.context, Some(vec![1, 2, 3]));

    let tree = decoded.value.as_ref().and_then(CrdtValue::as_map).unwrap();
    assert_eq!(tree.counter("score"), Some(9));
    assert_eq!(tree.field_count(), 2);
    assert_eq!(
        tree.map("profile").and_then(|p| p.register("nick")),
        Some(b"hi".as_slice())
    );
}

#[test]
fn hll_and_gset_responses_decode_as_sets() {
    let hll = DtFetchResponse {
        context: None,
        data_type: DataType::Hll,
        value: Some(DtValue {
            hll: SetResponse::new(["u1", "u2"]),
            ..Default::default()
        }),
    };
    let gset = DtFetchResponse {
        context: None,
        data_type: DataType::GSet,
        value: Some(DtValue {
            gset: SetResponse::new(["g"]),
            ..Default::default()
        }),
    };

    let hll_members = decode_response(&hll).value.unwrap();
    assert!(matches!(hll_members, CrdtValue::Hll(_)));
    assert_eq!(hll_members.as_set().map(|s| s.len()), Some(2));

    let gset_members = decode_response(&gset).value.unwrap();
    assert_eq!(gset_members.as_set().map(|s| s.len()), Some(1));
}
