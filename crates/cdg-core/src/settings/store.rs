//! Layered settings store
//!
//! The store reads the override buckets once, merges them over the defaults
//! table and serves every read from that merged view. Core settings and
//! dashboard feature settings live in separate buckets. Updates merge over the
//! effective settings and write each affected bucket back whole.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use cdg_types::option_adapter::OptionAdapter;

use crate::prelude::*;

use super::types::{FrozenSettingsRegistry, SettingGroup, SettingValue};

/// Partial set of typed overrides, as produced by the sanitizer
pub type OverrideSet = BTreeMap<String, SettingValue>;

/// Defaults merged with stored overrides. Holds exactly one value per
/// registered key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveSettings {
	values: BTreeMap<String, SettingValue>,
}

impl EffectiveSettings {
	pub fn get(&self, key: &str) -> Option<&SettingValue> {
		self.values.get(key)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
		self.values.iter().map(|(k, v)| (k.as_str(), v))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Bucket representation: a JSON object keyed by setting key
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Object(self.values.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
	}

	fn lookup(&self, key: &str) -> CdgResult<&SettingValue> {
		self.values
			.get(key)
			.ok_or_else(|| Error::ValidationError(format!("Unknown setting: {}", key)))
	}

	/// Type-safe getters
	pub fn get_bool(&self, key: &str) -> CdgResult<bool> {
		match self.lookup(key)? {
			SettingValue::Bool(b) => Ok(*b),
			v => Err(Error::ValidationError(format!(
				"Setting '{}' is not a boolean, got {}",
				key,
				v.type_name()
			))),
		}
	}

	pub fn get_int(&self, key: &str) -> CdgResult<i64> {
		match self.lookup(key)? {
			SettingValue::Int(i) => Ok(*i),
			v => Err(Error::ValidationError(format!(
				"Setting '{}' is not an integer, got {}",
				key,
				v.type_name()
			))),
		}
	}

	pub fn get_str(&self, key: &str) -> CdgResult<&str> {
		match self.lookup(key)? {
			SettingValue::String(s) => Ok(s),
			v => Err(Error::ValidationError(format!(
				"Setting '{}' is not a string, got {}",
				key,
				v.type_name()
			))),
		}
	}

	pub fn get_list(&self, key: &str) -> CdgResult<&[String]> {
		match self.lookup(key)? {
			SettingValue::List(items) => Ok(items),
			v => Err(Error::ValidationError(format!(
				"Setting '{}' is not a list, got {}",
				key,
				v.type_name()
			))),
		}
	}

	/// Structured values. Lists are returned in their JSON form, which is how
	/// legacy placement data was stored.
	pub fn get_json(&self, key: &str) -> CdgResult<serde_json::Value> {
		match self.lookup(key)? {
			SettingValue::Json(j) => Ok(j.clone()),
			v @ SettingValue::List(_) => Ok(v.to_json()),
			v => Err(Error::ValidationError(format!(
				"Setting '{}' is not JSON, got {}",
				key,
				v.type_name()
			))),
		}
	}
}

pub const DEFAULT_CORE_BUCKET: &str = "cdg_core_settings";
pub const DEFAULT_FEATURE_BUCKET: &str = "quick_tools_settings";

/// Option bucket names per storage group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketNames {
	pub core: Box<str>,
	pub features: Box<str>,
}

impl BucketNames {
	pub fn new(core: impl Into<Box<str>>, features: impl Into<Box<str>>) -> Self {
		Self { core: core.into(), features: features.into() }
	}

	pub fn name(&self, group: SettingGroup) -> &str {
		match group {
			SettingGroup::Core => &self.core,
			SettingGroup::Features => &self.features,
		}
	}

	/// Whether both groups share one bucket
	pub fn is_shared(&self) -> bool {
		self.core == self.features
	}
}

impl Default for BucketNames {
	fn default() -> Self {
		Self::new(DEFAULT_CORE_BUCKET, DEFAULT_FEATURE_BUCKET)
	}
}

/// Custom core bucket, default feature bucket
impl From<&str> for BucketNames {
	fn from(core: &str) -> Self {
		Self::new(core, DEFAULT_FEATURE_BUCKET)
	}
}

impl From<Box<str>> for BucketNames {
	fn from(core: Box<str>) -> Self {
		Self::new(core, DEFAULT_FEATURE_BUCKET)
	}
}

impl From<String> for BucketNames {
	fn from(core: String) -> Self {
		Self::new(core, DEFAULT_FEATURE_BUCKET)
	}
}

type StoredMap = serde_json::Map<String, serde_json::Value>;

/// Request-scoped settings store
#[derive(Debug)]
pub struct SettingsStore {
	registry: Arc<FrozenSettingsRegistry>,
	adapter: Arc<dyn OptionAdapter>,
	buckets: BucketNames,
	settings: EffectiveSettings,
	/// Feature values were read from the core bucket
	legacy_features: bool,
}

impl SettingsStore {
	/// Load the buckets and merge them over the defaults table.
	///
	/// Never fails: an unreadable, missing or malformed bucket is treated as an
	/// empty override set. Feature keys missing from the feature bucket are
	/// looked up in the core bucket, where older installs kept them.
	pub fn load(
		registry: Arc<FrozenSettingsRegistry>,
		adapter: Arc<dyn OptionAdapter>,
		buckets: impl Into<BucketNames>,
	) -> Self {
		let buckets = buckets.into();
		let core = read_bucket(&*adapter, &buckets.core);
		let features =
			if buckets.is_shared() { StoredMap::new() } else { read_bucket(&*adapter, &buckets.features) };

		let mut values = BTreeMap::new();
		let mut legacy_features = false;
		for def in registry.list() {
			let raw = match def.group {
				SettingGroup::Core => core.get(&def.key),
				SettingGroup::Features => features.get(&def.key).or_else(|| {
					let legacy = core.get(&def.key);
					legacy_features |= legacy.is_some() && !buckets.is_shared();
					legacy
				}),
			};
			let value = raw.and_then(|raw| Self::coerce(&registry, &def.key, raw.clone()));
			values.insert(def.key.clone(), value.unwrap_or_else(|| def.default.clone()));
		}

		for key in core.keys().chain(features.keys()).filter(|k| !registry.contains(k)) {
			debug!("Ignoring unknown stored setting: {}", key);
		}

		if legacy_features {
			debug!(
				"Feature settings found in bucket '{}', will move to '{}'",
				buckets.core, buckets.features
			);
		}

		Self { registry, adapter, buckets, settings: EffectiveSettings { values }, legacy_features }
	}

	fn coerce(
		registry: &FrozenSettingsRegistry,
		key: &str,
		raw: serde_json::Value,
	) -> Option<SettingValue> {
		let def = registry.get(key)?;
		let value = match serde_json::from_value::<SettingValue>(raw) {
			Ok(value) => value,
			Err(err) => {
				warn!("Stored setting '{}' is unreadable: {}", key, err);
				return None;
			}
		};
		let coerced = def.kind.coerce_stored(&value);
		if coerced.is_none() {
			warn!(
				"Stored setting '{}' does not fit {:?} ({}), using default",
				key,
				def.kind,
				value.type_name()
			);
		}
		coerced
	}

	/// Effective value of `key`, or `fallback` for keys outside the defaults table
	pub fn get(&self, key: &str, fallback: SettingValue) -> SettingValue {
		self.settings.get(key).cloned().unwrap_or(fallback)
	}

	pub fn settings(&self) -> &EffectiveSettings {
		&self.settings
	}

	pub fn registry(&self) -> &Arc<FrozenSettingsRegistry> {
		&self.registry
	}

	pub fn buckets(&self) -> &BucketNames {
		&self.buckets
	}

	/// Effective values stored in bucket `name`, as a JSON object
	fn bucket_json(&self, name: &str) -> serde_json::Value {
		serde_json::Value::Object(
			self.settings
				.iter()
				.filter(|(key, _)| {
					self.registry.get(key).is_some_and(|def| self.buckets.name(def.group) == name)
				})
				.map(|(key, value)| (key.to_string(), value.to_json()))
				.collect(),
		)
	}

	/// Merge `overrides` over the effective settings and persist the result.
	///
	/// The in-memory settings change before the write is attempted. Every
	/// bucket holding an updated key is rewritten in full, and feature values
	/// still kept in the core bucket are moved to the feature bucket. Returns
	/// `false` when the storage layer rejects any of the writes.
	pub fn update(&mut self, overrides: OverrideSet) -> bool {
		let mut changed = 0usize;
		let mut groups = BTreeSet::new();
		for (key, value) in overrides {
			let Some(def) = self.registry.get(&key) else {
				debug!("Ignoring update of unknown setting: {}", key);
				continue;
			};
			let value = if def.kind.accepts(&value) {
				value
			} else if let Some(coerced) = def.kind.coerce_stored(&value) {
				coerced
			} else {
				warn!(
					"Rejected value for setting '{}': {} does not fit {:?}",
					key,
					value.type_name(),
					def.kind
				);
				continue;
			};
			groups.insert(def.group);
			self.settings.values.insert(key, value);
			changed += 1;
		}

		if self.legacy_features && groups.contains(&SettingGroup::Core) {
			groups.insert(SettingGroup::Features);
		}

		let names: BTreeSet<&str> = groups.iter().map(|group| self.buckets.name(*group)).collect();
		let mut saved = true;
		for name in names {
			match self.adapter.write_bucket(name, &self.bucket_json(name)) {
				Ok(()) => info!("Settings bucket '{}' saved ({} keys updated)", name, changed),
				Err(err) => {
					warn!("Failed to save settings bucket '{}': {}", name, err);
					saved = false;
				}
			}
		}
		if saved && groups.contains(&SettingGroup::Features) {
			self.legacy_features = false;
		}
		saved
	}
}

fn read_bucket(adapter: &dyn OptionAdapter, bucket: &str) -> StoredMap {
	match adapter.read_bucket(bucket) {
		Ok(Some(serde_json::Value::Object(map))) => map,
		Ok(Some(other)) => {
			warn!("Settings bucket '{}' is not an object, using defaults", bucket);
			debug!("Malformed bucket content: {}", other);
			StoredMap::new()
		}
		Ok(None) => StoredMap::new(),
		Err(err) => {
			warn!("Failed to read settings bucket '{}': {}", bucket, err);
			StoredMap::new()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::defaults::{defaults_table, keys};
	use cdg_types::option_adapter::MemoryOptionAdapter;
	use serde_json::json;

	const BUCKET: &str = DEFAULT_CORE_BUCKET;
	const FEATURES: &str = DEFAULT_FEATURE_BUCKET;

	fn registry() -> Arc<FrozenSettingsRegistry> {
		Arc::new(defaults_table().unwrap())
	}

	#[test]
	fn test_load_without_bucket_yields_defaults() {
		let registry = registry();
		let store = SettingsStore::load(registry.clone(), Arc::new(MemoryOptionAdapter::new()), BUCKET);

		assert_eq!(store.settings().len(), registry.len());
		for def in registry.list() {
			assert_eq!(store.get(&def.key, SettingValue::Bool(false)), def.default);
		}
	}

	#[test]
	fn test_load_merges_and_ignores_unknown_keys() {
		let adapter = MemoryOptionAdapter::with_bucket(
			BUCKET,
			json!({
				"disable_xmlrpc": false,
				"documentation_widget_limit": "7",
				"heartbeat_admin": 120,
				"gutenberg_mode": "turbo",
				"some_removed_option": true
			}),
		);
		let store = SettingsStore::load(registry(), Arc::new(adapter), BUCKET);
		let settings = store.settings();

		assert!(!settings.get_bool(keys::DISABLE_XMLRPC).unwrap());
		assert_eq!(settings.get_int(keys::DOCUMENTATION_WIDGET_LIMIT).unwrap(), 7);
		assert_eq!(settings.get_str(keys::HEARTBEAT_ADMIN).unwrap(), "120");
		assert_eq!(settings.get_str(keys::GUTENBERG_MODE).unwrap(), "optimize");
		assert!(settings.get("some_removed_option").is_none());
		assert_eq!(
			store.get("some_removed_option", SettingValue::String("fallback".into())),
			SettingValue::String("fallback".into())
		);
	}

	#[test]
	fn test_load_malformed_bucket() {
		let adapter = MemoryOptionAdapter::with_bucket(BUCKET, json!("a:1:{broken"));
		let store = SettingsStore::load(registry(), Arc::new(adapter), BUCKET);
		assert!(store.settings().get_bool(keys::DISABLE_XMLRPC).unwrap());
	}

	#[test]
	fn test_nested_override_replaces_default() {
		let adapter = MemoryOptionAdapter::with_bucket(
			BUCKET,
			json!({ "selected_cpts": ["blog", "event"] }),
		);
		let store = SettingsStore::load(registry(), Arc::new(adapter), BUCKET);
		assert_eq!(store.settings().get_json(keys::SELECTED_CPTS).unwrap(), json!(["blog", "event"]));
	}

	#[test]
	fn test_update_persists_full_bucket() {
		let adapter = Arc::new(MemoryOptionAdapter::new());
		let mut store = SettingsStore::load(registry(), adapter.clone(), BUCKET);

		let mut overrides = OverrideSet::new();
		overrides.insert(keys::OPTIMIZE_SEARCH.into(), SettingValue::Bool(false));
		overrides.insert("not_a_setting".into(), SettingValue::Bool(true));
		assert!(store.update(overrides));

		let stored = adapter.read_bucket(BUCKET).unwrap().unwrap();
		assert_eq!(stored["optimize_search"], json!(false));
		assert_eq!(stored["disable_xmlrpc"], json!(true));
		assert!(stored.get("not_a_setting").is_none());

		let reloaded = SettingsStore::load(registry(), adapter, BUCKET);
		assert_eq!(reloaded.settings(), store.settings());
	}

	#[test]
	fn test_update_failure_keeps_memory_state() {
		let adapter = Arc::new(MemoryOptionAdapter::new());
		adapter.set_reject_writes(true);
		let mut store = SettingsStore::load(registry(), adapter, BUCKET);

		let mut overrides = OverrideSet::new();
		overrides.insert(keys::DISABLE_XMLRPC.into(), SettingValue::Bool(false));
		assert!(!store.update(overrides));
		assert!(!store.settings().get_bool(keys::DISABLE_XMLRPC).unwrap());
	}

	#[test]
	fn test_placement_loads_from_feature_bucket() {
		let adapter = MemoryOptionAdapter::with_bucket(
			BUCKET,
			json!({ "selected_cpts": ["faq"], "disable_xmlrpc": false }),
		);
		adapter
			.write_bucket(
				FEATURES,
				&json!({
					"selected_cpts": { "blog": { "location": "dashboard" } },
					"cpt_module_style": "minimal",
					"disable_xmlrpc": true
				}),
			)
			.unwrap();
		let store = SettingsStore::load(registry(), Arc::new(adapter), BucketNames::default());
		let settings = store.settings();

		assert_eq!(
			settings.get_json(keys::SELECTED_CPTS).unwrap(),
			json!({ "blog": { "location": "dashboard" } })
		);
		assert_eq!(settings.get_str(keys::CPT_MODULE_STYLE).unwrap(), "minimal");
		// Core keys are only read from the core bucket
		assert!(!settings.get_bool(keys::DISABLE_XMLRPC).unwrap());
	}

	#[test]
	fn test_update_routes_keys_to_their_bucket() {
		let adapter = Arc::new(MemoryOptionAdapter::new());
		let mut store = SettingsStore::load(registry(), adapter.clone(), BucketNames::default());

		let mut overrides = OverrideSet::new();
		overrides.insert(
			keys::SELECTED_CPTS.into(),
			SettingValue::Json(json!({ "blog": { "location": "news" } })),
		);
		overrides.insert(keys::SHOW_RECENT_POSTS.into(), SettingValue::Bool(false));
		assert!(store.update(overrides));

		let core = adapter.read_bucket(BUCKET).unwrap().unwrap();
		let features = adapter.read_bucket(FEATURES).unwrap().unwrap();
		assert_eq!(core["show_recent_posts"], json!(false));
		assert!(core.get("selected_cpts").is_none());
		assert_eq!(features["selected_cpts"], json!({ "blog": { "location": "news" } }));
		assert_eq!(features["documentation_widget_limit"], json!(5));
		assert!(features.get("show_recent_posts").is_none());

		let reloaded = SettingsStore::load(registry(), adapter, BucketNames::default());
		assert_eq!(reloaded.settings(), store.settings());
	}

	#[test]
	fn test_core_update_moves_legacy_feature_values() {
		let adapter = Arc::new(MemoryOptionAdapter::with_bucket(
			BUCKET,
			json!({ "selected_cpts": ["blog"], "documentation_widget_limit": 8 }),
		));
		let mut store = SettingsStore::load(registry(), adapter.clone(), BUCKET);

		let mut overrides = OverrideSet::new();
		overrides.insert(keys::DISABLE_XMLRPC.into(), SettingValue::Bool(false));
		assert!(store.update(overrides));

		let core = adapter.read_bucket(BUCKET).unwrap().unwrap();
		let features = adapter.read_bucket(FEATURES).unwrap().unwrap();
		assert!(core.get("selected_cpts").is_none());
		assert_eq!(features["selected_cpts"], json!(["blog"]));
		assert_eq!(features["documentation_widget_limit"], json!(8));

		let reloaded = SettingsStore::load(registry(), adapter, BUCKET);
		assert_eq!(reloaded.settings().get_json(keys::SELECTED_CPTS).unwrap(), json!(["blog"]));
	}

	#[test]
	fn test_shared_bucket_holds_every_key() {
		let registry = registry();
		let adapter = Arc::new(MemoryOptionAdapter::new());
		let buckets = BucketNames::new("site_options", "site_options");
		let mut store = SettingsStore::load(registry.clone(), adapter.clone(), buckets);

		let mut overrides = OverrideSet::new();
		overrides.insert(keys::CPT_MODULE_STYLE.into(), SettingValue::String("minimal".into()));
		assert!(store.update(overrides));

		let stored = adapter.read_bucket("site_options").unwrap().unwrap();
		assert_eq!(stored.as_object().map(|m| m.len()), Some(registry.len()));
		assert_eq!(stored["cpt_module_style"], json!("minimal"));
		assert!(adapter.read_bucket(FEATURES).unwrap().is_none());
	}

	#[test]
	fn test_typed_getter_mismatch() {
		let store = SettingsStore::load(registry(), Arc::new(MemoryOptionAdapter::new()), BUCKET);
		assert!(matches!(
			store.settings().get_int(keys::DISABLE_XMLRPC),
			Err(Error::ValidationError(_))
		));
		assert!(store.settings().get_bool("nope").is_err());
	}
}

// vim: ts=4
