//! Property tests for request bodies, embedded documents and backoff.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use dbx_sdk::embedded_json;
use dbx_sdk::types::{CatalogUpdate, PolicyDefinition, PolicyElement};
use dbx_sdk::RetryConfig;
use proptest::prelude::*;
use serde_json::Value;

fn optional_text() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z0-9 _-]{0,12}")
}

fn policy_definition() -> impl Strategy<Value = PolicyDefinition> {
    proptest::collection::btree_map(
        "[a-z_.]{1,16}",
        prop_oneof![
            "\\PC{0,8}".prop_map(|value| PolicyElement::fixed(value)),
            (proptest::option::of(0_i64..1000), proptest::option::of(0_i64..1000))
                .prop_map(|(min, max)| PolicyElement::range(min, max)),
        ],
        0..6,
    )
}

proptest! {
    #[test]
    fn update_bodies_carry_exactly_the_set_fields(
        name in optional_text(),
        comment in optional_text(),
        owner in optional_text(),
    ) {
        let mut expected = BTreeSet::new();
        if name.is_some() { expected.insert("name".to_string()); }
        if comment.is_some() { expected.insert("comment".to_string()); }
        if owner.is_some() { expected.insert("owner".to_string()); }

        let body = serde_json::to_value(CatalogUpdate { name, comment, properties: None, owner })
            .expect("encode");
        let keys: BTreeSet<String> = body
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn embedded_documents_are_ascii_and_stable(definition in policy_definition()) {
        let document = embedded_json::to_string(&definition).expect("encode");
        prop_assert!(document.is_ascii());

        let decoded: PolicyDefinition = embedded_json::from_str(&document).expect("decode");
        prop_assert_eq!(&decoded, &definition);
        prop_assert_eq!(embedded_json::to_string(&decoded).expect("re-encode"), document.clone());

        let plain: Value = serde_json::from_str(&document).expect("plain json");
        let reparsed: Value = serde_json::to_value(&definition).expect("value");
        prop_assert_eq!(plain, reparsed);
    }

    #[test]
    fn embedded_maps_keep_sorted_key_order(
        entries in proptest::collection::btree_map("[a-z]{1,6}", "[a-z]{0,6}", 0..8),
    ) {
        let document = embedded_json::to_string(&entries).expect("encode");
        let expected = entries
            .iter()
            .map(|(key, value)| format!("\"{key}\": \"{value}\""))
            .collect::<Vec<_>>()
            .join(", ");
        prop_assert_eq!(document, format!("{{{expected}}}"));
    }

    #[test]
    fn backoff_is_monotonic_and_capped(
        base_ms in 1_u64..5_000,
        max_secs in 1_u64..600,
        attempts in 1_u32..64,
    ) {
        let config = RetryConfig {
            backoff_base: Duration::from_millis(base_ms),
            backoff_max: Duration::from_secs(max_secs),
            ..RetryConfig::default()
        };
        let delays: Vec<Duration> = (1..=attempts).map(|n| config.delay_for(n, None)).collect();

        prop_assert!(delays.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(delays.iter().all(|delay| *delay <= config.backoff_max));
        prop_assert_eq!(delays[0], config.backoff_base.min(config.backoff_max));
    }

    #[test]
    fn retry_after_overrides_backoff(attempt in 1_u32..10, secs in 0_u64..3_600) {
        let hint = Duration::from_secs(secs);
        prop_assert_eq!(RetryConfig::default().delay_for(attempt, Some(hint)), hint);
    }
}

#[test]
fn empty_definition_encodes_as_empty_object() {
    let definition: PolicyDefinition = BTreeMap::new();
    assert_eq!(embedded_json::to_string(&definition).expect("encode"), "{}");
}
