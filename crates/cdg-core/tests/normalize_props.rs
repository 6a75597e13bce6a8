//! Generated placement data through the normalizer

use cdg_core::placement::normalize;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn slug() -> impl Strategy<Value = String> {
	"[ a-z0-9_]{0,6}"
}

fn scalar() -> impl Strategy<Value = Value> {
	prop_oneof![
		Just(Value::Null),
		any::<bool>().prop_map(Value::Bool),
		any::<i64>().prop_map(Value::from),
		slug().prop_map(Value::String),
		Just(Value::String("dashboard".into())),
	]
}

/// Placement-like record: an optional location plus arbitrary extra fields
fn record() -> impl Strategy<Value = Value> {
	(prop::option::of(scalar()), prop::collection::vec((slug(), scalar()), 0..3)).prop_map(
		|(location, extra)| {
			let mut map: Map<String, Value> = extra.into_iter().collect();
			if let Some(location) = location {
				map.insert("location".into(), location);
			}
			Value::Object(map)
		},
	)
}

fn entry() -> impl Strategy<Value = Value> {
	prop_oneof![
		scalar(),
		record(),
		prop::collection::vec(scalar(), 0..3).prop_map(Value::Array),
	]
}

/// Stored value in any shape seen in option buckets
fn stored() -> impl Strategy<Value = Value> {
	prop_oneof![
		prop::collection::vec(entry(), 0..8).prop_map(Value::Array),
		prop::collection::vec((slug(), entry()), 0..8)
			.prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
		scalar(),
	]
}

proptest! {
	#[test]
	fn prop_normalize_is_idempotent(raw in stored()) {
		let once = normalize(&raw);
		let twice = normalize(&once.to_json());
		prop_assert_eq!(&once, &twice, "input {}", raw);
		prop_assert_eq!(once.to_json(), twice.to_json());
	}

	#[test]
	fn prop_normalized_slugs_are_non_empty(raw in stored()) {
		let map = normalize(&raw);
		for (slug, _) in map.iter() {
			prop_assert!(!slug.is_empty());
		}
		let routed = map.dashboard_targets().len()
			+ map.partition().pages.values().map(|slugs| slugs.len()).sum::<usize>();
		prop_assert_eq!(routed, map.len());
	}
}

// vim: ts=4
