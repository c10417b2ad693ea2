//! Test assertions for inspected chains.

use crate::inspect::{flatten, keys, pairs};
use crate::scope::Scope;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Asserts the guarantees that hold for every chain:
/// - `keys` and `pairs` agree in length and in the key at each index
/// - `flatten` has one entry per distinct key
/// - every flattened value is what the leaf's lookup returns
pub fn assert_chain_consistent<'a, K, V, S>(scope: Option<&'a S>)
where
    K: Eq + Hash + Debug + 'a,
    V: PartialEq + Debug + 'a,
    S: Scope<K, V>,
{
    let keys = keys(scope);
    let pairs = pairs(scope);
    let mapping = flatten(scope);

    assert_eq!(
        keys.len(),
        pairs.len(),
        "Expected keys and pairs to agree in length, got {:?} and {:?}",
        keys,
        pairs
    );

    for (index, (key, pair)) in keys.iter().zip(&pairs).enumerate() {
        assert_eq!(
            *key, pair.key,
            "Expected pair {} to carry key {:?}, got {:?}",
            index, key, pair.key
        );
    }

    let distinct: HashSet<&K> = keys.iter().copied().collect();
    assert_eq!(
        mapping.len(),
        distinct.len(),
        "Expected one mapping entry per distinct key, got {:?}",
        mapping
    );

    if let Some(leaf) = scope {
        for (key, value) in &mapping {
            assert_eq!(
                *value,
                leaf.lookup(*key),
                "Expected mapping[{:?}] to match the leaf lookup",
                key
            );
        }
    }
}

/// Asserts that `keys` returns exactly `expected`, in order.
pub fn assert_keys<'a, K, V, S>(scope: Option<&'a S>, expected: &[K])
where
    K: PartialEq + Debug + 'a,
    V: 'a,
    S: Scope<K, V>,
{
    let actual = keys(scope);
    let expected: Vec<&K> = expected.iter().collect();
    assert_eq!(actual, expected, "Unexpected keys");
}

/// Asserts that `flatten` returns exactly `expected`.
pub fn assert_mapping<'a, K, V, S>(scope: Option<&'a S>, expected: &[(K, V)])
where
    K: Eq + Hash + Debug + 'a,
    V: PartialEq + Debug + 'a,
    S: Scope<K, V>,
{
    let actual = flatten(scope);
    let expected: HashMap<&K, Option<&V>> = expected.iter().map(|(k, v)| (k, Some(v))).collect();
    assert_eq!(actual, expected, "Unexpected mapping");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn test_assertions_pass_for_duplicates() {
        let ctx = Context::background()
            .with_value("a", 1)
            .with_value("b", 2)
            .with_value("a", 3);

        assert_chain_consistent(Some(&ctx));
        assert_keys(Some(&ctx), &["a", "b", "a"]);
        assert_mapping(Some(&ctx), &[("a", 3), ("b", 2)]);
    }

    #[test]
    #[should_panic(expected = "Unexpected keys")]
    fn test_assert_keys_fails() {
        let ctx = Context::background().with_value("a", 1);
        assert_keys(Some(&ctx), &["b"]);
    }

    #[test]
    #[should_panic(expected = "Unexpected mapping")]
    fn test_assert_mapping_fails() {
        let ctx = Context::background().with_value("a", 1).with_value("a", 2);
        assert_mapping(Some(&ctx), &[("a", 1)]);
    }
}
