//! Property-based tests for the grow-only set.
//!
//! These tests verify the laws merge-on-read relies on:
//!  - Commutativity: a ⊔ b = b ⊔ a
//!  - Associativity: (a ⊔ b) ⊔ c = a ⊔ (b ⊔ c)
//!  - Idempotence:  (a ⊔ b) ⊔ b = a ⊔ b
//!  - Round-trip: decode(encode(s)) = s

use proptest::prelude::*;
use sdx_core::{GSet, Lattice};

fn gset_string_strategy() -> impl Strategy<Value = GSet<String>> {
    prop::collection::vec("[a-z0-9]{1,8}", 0..20).prop_map(|elements| {
        let mut set = GSet::new();
        for e in elements {
            set.add(e);
        }
        set
    })
}

fn merged(a: &GSet<String>, b: &GSet<String>) -> GSet<String> {
    let mut out = a.clone();
    out.merge(b);
    out
}

proptest! {
    #[test]
    fn merge_is_commutative(
        a in gset_string_strategy(),
        b in gset_string_strategy()
    ) {
        prop_assert_eq!(merged(&a, &b), merged(&b, &a));
    }

    #[test]
    fn merge_is_associative(
        a in gset_string_strategy(),
        b in gset_string_strategy(),
        c in gset_string_strategy()
    ) {
        let left = merged(&merged(&a, &b), &c);
        let right = merged(&a, &merged(&b, &c));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn merge_is_idempotent(
        a in gset_string_strategy(),
        b in gset_string_strategy()
    ) {
        let once = merged(&a, &b);
        prop_assert_eq!(merged(&once, &b), once);
    }

    #[test]
    fn bottom_is_identity(a in gset_string_strategy()) {
        let bottom = GSet::bottom();
        prop_assert_eq!(merged(&a, &bottom), a.clone());
        prop_assert_eq!(merged(&bottom, &a), a);
    }

    #[test]
    fn encoding_round_trips(a in gset_string_strategy()) {
        let bytes = a.to_bytes().unwrap();
        prop_assert_eq!(GSet::<String>::from_bytes(&bytes).unwrap(), a);
    }

    #[test]
    fn merge_never_shrinks(
        a in gset_string_strategy(),
        b in gset_string_strategy()
    ) {
        let joined = merged(&a, &b);
        prop_assert!(a.iter().all(|e| joined.contains(e)));
        prop_assert!(b.iter().all(|e| joined.contains(e)));
    }
}

#[test]
fn sibling_fold_order_does_not_matter() {
    let siblings: Vec<GSet<String>> = vec![
        ["a"].iter().map(|s| s.to_string()).collect(),
        ["b", "c"].iter().map(|s| s.to_string()).collect(),
        ["a", "d"].iter().map(|s| s.to_string()).collect(),
    ];

    let forward = GSet::join_all(siblings.iter());
    let backward = GSet::join_all(siblings.iter().rev());

    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 4);
}
