//! Placement routing: dashboard vs named admin page

use std::collections::{BTreeMap, BTreeSet};

use super::ContentTypeAssignment;

/// Content types grouped by where they render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementGroups {
	pub dashboard: BTreeSet<String>,
	pub pages: BTreeMap<String, BTreeSet<String>>,
}

impl ContentTypeAssignment {
	/// Content types placed on the dashboard
	pub fn dashboard_targets(&self) -> BTreeSet<String> {
		self.iter()
			.filter(|(_, placement)| placement.location.is_dashboard())
			.map(|(slug, _)| slug.to_string())
			.collect()
	}

	/// Content types placed on `page_id`, by exact string match
	pub fn targets_for_page(&self, page_id: &str) -> BTreeSet<String> {
		if page_id.is_empty() {
			return BTreeSet::new();
		}
		self.iter()
			.filter(|(_, placement)| placement.location.as_str() == page_id)
			.map(|(slug, _)| slug.to_string())
			.collect()
	}

	pub fn partition(&self) -> PlacementGroups {
		let mut groups = PlacementGroups::default();
		for (slug, placement) in self.iter() {
			if placement.location.is_dashboard() {
				groups.dashboard.insert(slug.to_string());
			} else {
				groups
					.pages
					.entry(placement.location.as_str().to_string())
					.or_default()
					.insert(slug.to_string());
			}
		}
		groups
	}
}


// vim: ts=4
