//! Settings model for the CDG site administration toolkit.
//!
//! - **settings**: defaults table, layered store, section-scoped sanitizer
//! - **placement**: legacy normalization and dashboard/page routing of
//!   content-type quick-add widgets
//!
//! Nothing in this crate talks to the host platform. It operates on the data
//! the admin layer supplies: stored buckets, submitted payloads, page ids.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod placement;
pub mod prelude;
pub mod settings;

pub use placement::{ContentTypeAssignment, Location, Placement, PlacementGroups};
pub use settings::{
	BucketNames, EffectiveSettings, FormPayload, FormValue, FrozenSettingsRegistry, OverrideSet,
	Section, SectionSanitizer, SettingDefinition, SettingGroup, SettingKind, SettingValue,
	SettingsRegistry, SettingsStore, TextFormat, keys,
};

// vim: ts=4
