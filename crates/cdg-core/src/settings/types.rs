//! Settings types and definitions
//!
//! Every recognized option is described by a `SettingDefinition`: its key, the
//! section tag that scopes partial updates, its declared kind and its default.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::prelude::*;

/// Update group a setting belongs to. A section update never touches keys of
/// another section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
	Features,
	Defaults,
	Cleanup,
	Security,
	Performance,
	Integrations,
	Admin,
}

impl Section {
	pub const ALL: [Section; 7] = [
		Section::Features,
		Section::Defaults,
		Section::Cleanup,
		Section::Security,
		Section::Performance,
		Section::Integrations,
		Section::Admin,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Section::Features => "features",
			Section::Defaults => "defaults",
			Section::Cleanup => "cleanup",
			Section::Security => "security",
			Section::Performance => "performance",
			Section::Integrations => "integrations",
			Section::Admin => "admin",
		}
	}
}

impl fmt::Display for Section {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Section {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"features" => Ok(Section::Features),
			"defaults" => Ok(Section::Defaults),
			"cleanup" => Ok(Section::Cleanup),
			"security" => Ok(Section::Security),
			"performance" => Ok(Section::Performance),
			// Older settings forms posted the integrations tab under this name
			"integrations" | "gravity-forms" => Ok(Section::Integrations),
			"admin" => Ok(Section::Admin),
			other => Err(Error::ValidationError(format!("Unknown section: {}", other))),
		}
	}
}

/// Setting value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)] // No type tag - type inferred from SettingDefinition
pub enum SettingValue {
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),
	String(String),
	List(Vec<String>), // Must be before Json so string arrays stay typed
	Json(serde_json::Value),
}

impl SettingValue {
	/// Check if this value matches the type of another value
	pub fn matches_type(&self, other: &SettingValue) -> bool {
		matches!(
			(self, other),
			(SettingValue::String(_), SettingValue::String(_))
				| (SettingValue::Int(_), SettingValue::Int(_))
				| (SettingValue::Bool(_), SettingValue::Bool(_))
				| (SettingValue::List(_), SettingValue::List(_))
				| (SettingValue::Json(_), SettingValue::Json(_))
		)
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::String(_) => "string",
			SettingValue::Int(_) => "int",
			SettingValue::Bool(_) => "bool",
			SettingValue::List(_) => "list",
			SettingValue::Json(_) => "json",
		}
	}

	pub fn to_json(&self) -> serde_json::Value {
		match self {
			SettingValue::Bool(b) => serde_json::Value::Bool(*b),
			SettingValue::Int(i) => serde_json::Value::from(*i),
			SettingValue::String(s) => serde_json::Value::String(s.clone()),
			SettingValue::List(items) => {
				serde_json::Value::Array(items.iter().cloned().map(serde_json::Value::String).collect())
			}
			SettingValue::Json(j) => j.clone(),
		}
	}
}

/// How free text is filtered before it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
	/// Single line, all markup removed
	Plain,
	/// Limited inline markup allowed (links, emphasis)
	Rich,
	/// All tags removed, including script/style bodies; line breaks kept
	StripAll,
}

pub(crate) fn choice_allows(allowed: &[&str], value: &str) -> bool {
	allowed.iter().any(|a| *a == value)
}

/// Declared type of a setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingKind {
	/// Checkbox: missing from a submission means false
	Flag,
	Integer { min: i64, max: i64 },
	Choice(&'static [&'static str]),
	Text(TextFormat),
	List,
	/// Content type placement map (legacy list or structured map)
	Placement,
}

impl SettingKind {
	/// Strict check used for defaults and sanitized values
	pub fn accepts(&self, value: &SettingValue) -> bool {
		match (self, value) {
			(SettingKind::Flag, SettingValue::Bool(_))
			| (SettingKind::Text(_), SettingValue::String(_))
			| (SettingKind::List, SettingValue::List(_)) => true,
			(SettingKind::Integer { min, max }, SettingValue::Int(i)) => i >= min && i <= max,
			(SettingKind::Choice(allowed), SettingValue::String(s)) => choice_allows(allowed, s),
			(SettingKind::Placement, SettingValue::Json(j)) => j.is_object(),
			_ => false,
		}
	}

	/// Lenient conversion of a persisted value written by an older release.
	///
	/// Returns `None` when the value cannot represent this kind.
	pub fn coerce_stored(&self, value: &SettingValue) -> Option<SettingValue> {
		match (self, value) {
			(SettingKind::Flag, SettingValue::Bool(b)) => Some(SettingValue::Bool(*b)),
			(SettingKind::Flag, SettingValue::Int(i)) => Some(SettingValue::Bool(*i != 0)),
			(SettingKind::Flag, SettingValue::String(s)) => match s.trim() {
				"" | "0" | "false" => Some(SettingValue::Bool(false)),
				"1" | "true" | "on" | "yes" => Some(SettingValue::Bool(true)),
				_ => None,
			},
			(SettingKind::Integer { min, max }, SettingValue::Int(i)) => {
				Some(SettingValue::Int((*i).clamp(*min, *max)))
			}
			(SettingKind::Integer { min, max }, SettingValue::String(s)) => {
				s.trim().parse::<i64>().ok().map(|i| SettingValue::Int(i.clamp(*min, *max)))
			}
			(SettingKind::Choice(allowed), SettingValue::String(s)) => {
				choice_allows(allowed, s).then(|| value.clone())
			}
			// Numeric choices (heartbeat intervals) were sometimes stored as numbers
			(SettingKind::Choice(allowed), SettingValue::Int(i)) => {
				let s = i.to_string();
				choice_allows(allowed, &s).then_some(SettingValue::String(s))
			}
			(SettingKind::Text(_), SettingValue::String(_))
			| (SettingKind::List, SettingValue::List(_)) => Some(value.clone()),
			(SettingKind::Text(_), SettingValue::Int(i)) => Some(SettingValue::String(i.to_string())),
			(SettingKind::List, SettingValue::Json(serde_json::Value::Object(map))) => {
				// Arrays with holes come back as index-keyed objects
				map.values()
					.map(|v| v.as_str().map(str::to_string))
					.collect::<Option<Vec<_>>>()
					.map(SettingValue::List)
			}
			(SettingKind::Placement, SettingValue::List(_)) => Some(value.clone()),
			(SettingKind::Placement, SettingValue::Json(j)) if j.is_object() || j.is_array() => {
				Some(value.clone())
			}
			_ => None,
		}
	}
}

/// Storage bucket a setting is persisted in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SettingGroup {
	/// Hardening, cleanup and integration settings
	#[default]
	Core,
	/// Dashboard widget and documentation settings
	Features,
}

/// Setting definition - defines metadata for each setting
#[derive(Debug, Clone)]
pub struct SettingDefinition {
	/// Option key as stored in the bucket (e.g., "disable_xmlrpc")
	pub key: String,

	/// Human-readable description
	pub description: String,

	/// Update group
	pub section: Section,

	/// Bucket the value is stored in
	pub group: SettingGroup,

	pub kind: SettingKind,

	/// Default value, always valid for `kind`
	pub default: SettingValue,
}

impl SettingDefinition {
	/// Create a builder for constructing a SettingDefinition
	pub fn builder(key: impl Into<String>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(key)
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	key: String,
	description: Option<String>,
	section: Option<Section>,
	group: SettingGroup,
	kind: Option<SettingKind>,
	default: Option<SettingValue>,
}

impl SettingDefinitionBuilder {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			description: None,
			section: None,
			group: SettingGroup::Core,
			kind: None,
			default: None,
		}
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn section(mut self, section: Section) -> Self {
		self.section = Some(section);
		self
	}

	pub fn group(mut self, group: SettingGroup) -> Self {
		self.group = group;
		self
	}

	pub fn kind(mut self, kind: SettingKind) -> Self {
		self.kind = Some(kind);
		self
	}

	pub fn default(mut self, value: SettingValue) -> Self {
		self.default = Some(value);
		self
	}

	/// Shorthand for a checkbox setting
	pub fn flag(self, default: bool) -> Self {
		self.kind(SettingKind::Flag).default(SettingValue::Bool(default))
	}

	/// Build the SettingDefinition
	pub fn build(self) -> CdgResult<SettingDefinition> {
		let description = self.description.ok_or_else(|| {
			Error::ConfigError(format!("Setting '{}' needs a description", self.key))
		})?;
		let section = self
			.section
			.ok_or_else(|| Error::ConfigError(format!("Setting '{}' needs a section", self.key)))?;
		let kind = self
			.kind
			.ok_or_else(|| Error::ConfigError(format!("Setting '{}' needs a kind", self.key)))?;
		let default = self
			.default
			.ok_or_else(|| Error::ConfigError(format!("Setting '{}' needs a default", self.key)))?;

		match &kind {
			SettingKind::Integer { min, max } if min > max => {
				return Err(Error::ConfigError(format!(
					"Setting '{}' has an empty range [{}, {}]",
					self.key, min, max
				)));
			}
			SettingKind::Choice(allowed) if allowed.is_empty() => {
				return Err(Error::ConfigError(format!(
					"Setting '{}' has no allowed values",
					self.key
				)));
			}
			_ => {}
		}

		if !kind.accepts(&default) {
			return Err(Error::ConfigError(format!(
				"Default of setting '{}' does not match its kind ({:?}, got {})",
				self.key,
				kind,
				default.type_name()
			)));
		}

		Ok(SettingDefinition { key: self.key, description, section, group: self.group, kind, default })
	}
}

/// Mutable registry used during app initialization
pub struct SettingsRegistry {
	definitions: HashMap<String, SettingDefinition>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self { definitions: HashMap::new() }
	}

	/// Register a new setting definition
	pub fn register(&mut self, def: SettingDefinition) -> CdgResult<()> {
		if self.definitions.contains_key(&def.key) {
			return Err(Error::ConfigError(format!("Setting '{}' is already registered", def.key)));
		}

		debug!("Registering setting: {}", def.key);
		self.definitions.insert(def.key.clone(), def);
		Ok(())
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		info!("Freezing settings registry with {} definitions", self.definitions.len());
		FrozenSettingsRegistry { definitions: self.definitions }
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl Default for SettingsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Immutable defaults table shared by every store instance
#[derive(Debug)]
pub struct FrozenSettingsRegistry {
	definitions: HashMap<String, SettingDefinition>,
}

impl FrozenSettingsRegistry {
	pub fn get(&self, key: &str) -> Option<&SettingDefinition> {
		self.definitions.get(key)
	}

	pub fn contains(&self, key: &str) -> bool {
		self.definitions.contains_key(key)
	}

	/// List all registered settings
	pub fn list(&self) -> impl Iterator<Item = &SettingDefinition> {
		self.definitions.values()
	}

	/// List the settings belonging to one section
	pub fn list_by_section(&self, section: Section) -> impl Iterator<Item = &SettingDefinition> {
		self.definitions.values().filter(move |def| def.section == section)
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_section_parse() {
		assert_eq!("security".parse::<Section>().unwrap(), Section::Security);
		assert_eq!("gravity-forms".parse::<Section>().unwrap(), Section::Integrations);
		assert!("themes".parse::<Section>().is_err());
		for section in Section::ALL {
			assert_eq!(section.as_str().parse::<Section>().unwrap(), section);
		}
	}

	#[test]
	fn test_value_untagged_deserialize() {
		let v: SettingValue = serde_json::from_str("true").unwrap();
		assert_eq!(v, SettingValue::Bool(true));
		let v: SettingValue = serde_json::from_str("5").unwrap();
		assert_eq!(v, SettingValue::Int(5));
		let v: SettingValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
		assert_eq!(v, SettingValue::List(vec!["a".into(), "b".into()]));
		let v: SettingValue = serde_json::from_str(r#"{"blog":{"location":"dashboard"}}"#).unwrap();
		assert!(matches!(v, SettingValue::Json(_)));
	}

	#[test]
	fn test_builder_rejects_bad_default() {
		let res = SettingDefinition::builder("documentation_widget_limit")
			.description("Documentation items per widget")
			.section(Section::Features)
			.kind(SettingKind::Integer { min: 1, max: 10 })
			.default(SettingValue::Int(50))
			.build();
		assert!(matches!(res, Err(Error::ConfigError(_))));

		let res = SettingDefinition::builder("gutenberg_mode")
			.description("Block editor mode")
			.section(Section::Performance)
			.kind(SettingKind::Choice(&["default", "optimize", "disable"]))
			.default(SettingValue::String("fast".into()))
			.build();
		assert!(res.is_err());
	}

	#[test]
	fn test_builder_requires_section() {
		let res = SettingDefinition::builder("disable_xmlrpc").description("x").flag(true).build();
		assert!(matches!(res, Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_registry_duplicate() {
		let mut registry = SettingsRegistry::new();
		let def = || {
			SettingDefinition::builder("disable_xmlrpc")
				.description("Disable XML-RPC")
				.section(Section::Security)
				.flag(true)
				.build()
				.unwrap()
		};
		registry.register(def()).unwrap();
		assert!(registry.register(def()).is_err());
		assert_eq!(registry.freeze().len(), 1);
	}

	#[test]
	fn test_coerce_stored() {
		assert_eq!(
			SettingKind::Flag.coerce_stored(&SettingValue::Int(1)),
			Some(SettingValue::Bool(true))
		);
		assert_eq!(
			SettingKind::Flag.coerce_stored(&SettingValue::String("0".into())),
			Some(SettingValue::Bool(false))
		);
		assert_eq!(
			SettingKind::Integer { min: 1, max: 10 }.coerce_stored(&SettingValue::String("42".into())),
			Some(SettingValue::Int(10))
		);
		assert_eq!(
			SettingKind::Choice(&["default", "60", "120", "disable"])
				.coerce_stored(&SettingValue::Int(120)),
			Some(SettingValue::String("120".into()))
		);
		assert_eq!(
			SettingKind::Choice(&["auto", "manual"]).coerce_stored(&SettingValue::String("x".into())),
			None
		);
		assert_eq!(SettingKind::List.coerce_stored(&SettingValue::Bool(true)), None);
	}
}

// vim: ts=4
