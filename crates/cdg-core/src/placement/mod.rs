//! Content-type quick-add widget placement
//!
//! `selected_cpts` has been stored in two shapes over time: a flat list of
//! content-type slugs (everything on the dashboard) and a map of slug to
//! placement record. `normalize` maps both onto `ContentTypeAssignment`, the
//! only shape the rest of the code reads.

pub mod normalize;
pub mod resolve;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use normalize::{normalize, normalize_setting};
pub use resolve::PlacementGroups;

/// Location value meaning "render on the main dashboard"
pub const DASHBOARD: &str = "dashboard";

/// Where a content type's quick-add widget is rendered
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Location {
	#[default]
	Dashboard,
	/// Admin page slug. Not checked against existing pages.
	Page(Box<str>),
}

impl Location {
	pub fn as_str(&self) -> &str {
		match self {
			Location::Dashboard => DASHBOARD,
			Location::Page(page) => page,
		}
	}

	pub fn is_dashboard(&self) -> bool {
		matches!(self, Location::Dashboard)
	}
}

impl From<&str> for Location {
	fn from(value: &str) -> Self {
		match value.trim() {
			"" | DASHBOARD => Location::Dashboard,
			page => Location::Page(page.into()),
		}
	}
}

impl From<String> for Location {
	fn from(value: String) -> Self {
		Location::from(value.as_str())
	}
}

impl From<Location> for String {
	fn from(location: Location) -> Self {
		location.as_str().to_string()
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Placement record of one content type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
	#[serde(default)]
	pub location: Location,

	/// Other fields of a stored record, carried through unchanged
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Placement {
	pub fn new(location: Location) -> Self {
		Self { location, extra: serde_json::Map::new() }
	}

	pub fn dashboard() -> Self {
		Self::new(Location::Dashboard)
	}
}

/// Canonical placement map: content-type slug to placement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentTypeAssignment(BTreeMap<String, Placement>);

impl ContentTypeAssignment {
	pub fn new() -> Self {
		Self::default()
	}

	/// Later inserts for the same slug replace earlier ones
	pub fn insert(&mut self, slug: impl Into<String>, placement: Placement) {
		self.0.insert(slug.into(), placement);
	}

	pub fn get(&self, slug: &str) -> Option<&Placement> {
		self.0.get(slug)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Placement)> {
		self.0.iter().map(|(slug, placement)| (slug.as_str(), placement))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Canonical stored form: `{slug: {location, ...}}`
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Object(
			self.0
				.iter()
				.map(|(slug, placement)| {
					let mut record = serde_json::Map::new();
					record.insert(
						"location".to_string(),
						serde_json::Value::String(placement.location.as_str().to_string()),
					);
					for (k, v) in &placement.extra {
						record.insert(k.clone(), v.clone());
					}
					(slug.clone(), serde_json::Value::Object(record))
				})
				.collect(),
		)
	}
}

impl FromIterator<(String, Placement)> for ContentTypeAssignment {
	fn from_iter<I: IntoIterator<Item = (String, Placement)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}


// vim: ts=4
