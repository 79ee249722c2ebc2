//! Property-based tests for state decoding.
//!
//! Uses `proptest` to verify the migration rule across many random documents.

#![allow(clippy::expect_used)]

use std::collections::BTreeMap;

use proptest::prelude::*;

use rime_provision::domain::{InstallationState, Step};

fn document(steps: &BTreeMap<String, bool>, extra_package: Option<&str>) -> String {
    let mut packages = serde_json::Map::new();
    packages.insert("rime".to_string(), serde_json::to_value(steps).expect("steps"));
    if let Some(name) = extra_package {
        packages.insert(name.to_string(), serde_json::json!({ "core": true }));
    }
    serde_json::json!({ "packages": packages }).to_string()
}

fn known_key() -> impl Strategy<Value = String> {
    prop::sample::select(Step::ALL.to_vec()).prop_map(|s| s.key().to_string())
}

proptest! {
    /// Any subset of known steps decodes; present flags are kept, absent ones are pending.
    #[test]
    fn prop_known_subsets_decode_with_defaults(
        steps in prop::collection::btree_map(known_key(), any::<bool>(), 0..=3),
    ) {
        let decoded = InstallationState::decode(&document(&steps, None)).expect("decodes");
        prop_assert!(decoded.dropped_keys.is_empty());
        for &step in Step::ALL {
            let expected = steps.get(step.key()).copied().unwrap_or(false);
            prop_assert_eq!(decoded.state.is_done(step), expected);
        }
    }

    /// Unknown step and package names never fail decoding and are reported.
    #[test]
    fn prop_unknown_keys_are_dropped(
        unknown in "[a-z]{3,12}",
        package in "[a-z]{3,12}",
    ) {
        prop_assume!(Step::ALL.iter().all(|s| s.key() != unknown));
        prop_assume!(package != "rime");

        let mut steps = BTreeMap::new();
        steps.insert(unknown.clone(), true);
        steps.insert("plum".to_string(), true);
        let decoded = InstallationState::decode(&document(&steps, Some(&package))).expect("decodes");

        prop_assert!(decoded.state.is_done(Step::Plum));
        let dropped_step = format!("rime.{unknown}");
        prop_assert!(decoded.dropped_keys.contains(&dropped_step));
        prop_assert!(decoded.dropped_keys.contains(&package));
    }
}
