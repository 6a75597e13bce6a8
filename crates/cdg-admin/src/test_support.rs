//! In-memory host used by unit tests

use parking_lot::Mutex;
use std::collections::HashMap;

use cdg_types::host_adapter::{ContentTypeInfo, Directive, HostAdapter, PostCounts};

use crate::prelude::*;

#[derive(Default)]
pub struct RecordingHost {
	pub page: Option<Box<str>>,
	pub content_types: Vec<ContentTypeInfo>,
	pub capabilities: Vec<&'static str>,
	pub counts: HashMap<String, PostCounts>,
	pub applied: Mutex<Vec<Directive>>,
}

impl RecordingHost {
	pub fn with_content_type(mut self, slug: &str, singular: &str, capability: &str) -> Self {
		self.content_types.push(ContentTypeInfo {
			slug: slug.into(),
			singular_label: singular.into(),
			plural_label: format!("{}s", singular).into(),
			create_capability: capability.into(),
			menu_icon: None,
		});
		self
	}

	pub fn directives(&self) -> Vec<Directive> {
		self.applied.lock().clone()
	}

	pub fn widget_removals(&self) -> Vec<String> {
		self.applied
			.lock()
			.iter()
			.filter_map(|d| match d {
				Directive::RemoveDashboardWidget(id) => Some(id.to_string()),
				_ => None,
			})
			.collect()
	}
}

impl HostAdapter for RecordingHost {
	fn current_page(&self) -> Option<Box<str>> {
		self.page.clone()
	}

	fn content_type(&self, slug: &str) -> Option<ContentTypeInfo> {
		self.content_types.iter().find(|ct| &*ct.slug == slug).cloned()
	}

	fn user_can(&self, capability: &str) -> bool {
		self.capabilities.iter().any(|c| *c == capability)
	}

	fn count_posts(&self, slug: &str) -> PostCounts {
		self.counts.get(slug).copied().unwrap_or_default()
	}

	fn apply(&self, directive: &Directive) -> CdgResult<()> {
		self.applied.lock().push(directive.clone());
		Ok(())
	}
}

// vim: ts=4
