//! Settings subsystem: defaults table, store, form decoding and sanitizer

pub mod defaults;
pub mod form;
pub mod sanitize;
pub mod store;
pub mod text;
pub mod types;

pub use defaults::{defaults_table, keys, register_settings};
pub use form::{FormPayload, FormValue};
pub use sanitize::SectionSanitizer;
pub use store::{
	BucketNames, DEFAULT_CORE_BUCKET, DEFAULT_FEATURE_BUCKET, EffectiveSettings, OverrideSet,
	SettingsStore,
};
pub use text::TextFilter;
pub use types::{
	FrozenSettingsRegistry, Section, SettingDefinition, SettingDefinitionBuilder, SettingGroup,
	SettingKind, SettingValue, SettingsRegistry, TextFormat,
};

// vim: ts=4
