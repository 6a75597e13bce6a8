//! Common test utilities and helpers
//!
//! A host double that records directives, and an app wired to in-memory storage.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;

use cdg_admin::{App, AppBuilderOpts, AppState};
use cdg_core::settings::defaults_table;
use cdg_types::host_adapter::{ContentTypeInfo, Directive, HostAdapter, PostCounts};
use cdg_types::option_adapter::MemoryOptionAdapter;
use cdg_types::prelude::*;
use cdg_types::types::CAP_MANAGE_OPTIONS;

pub const NOW: Timestamp = Timestamp(1_750_000_000);
pub const SECRET: &str = "integration-test-secret-0123456789";

pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_test_writer()
		.try_init();
}

pub fn app_with(adapter: Arc<MemoryOptionAdapter>) -> App {
	setup_test_logging();
	let opts = AppBuilderOpts { token_secret: Some(SECRET.into()), ..Default::default() };
	AppState::new(opts, adapter, defaults_table().expect("defaults table")).expect("app")
}

pub fn admin() -> AuthCtx {
	AuthCtx::new("1", [CAP_MANAGE_OPTIONS, "edit_posts", "edit_pages"])
}

#[derive(Default)]
pub struct MockHost {
	pub page: Option<Box<str>>,
	pub types: Vec<ContentTypeInfo>,
	pub caps: Vec<String>,
	pub directives: Mutex<Vec<Directive>>,
}

impl MockHost {
	pub fn new(caps: &[&str]) -> Self {
		Self { caps: caps.iter().map(|c| c.to_string()).collect(), ..Default::default() }
	}

	pub fn on_page(mut self, page: &str) -> Self {
		self.page = Some(page.into());
		self
	}

	pub fn with_type(mut self, slug: &str, singular: &str, plural: &str, cap: &str) -> Self {
		self.types.push(ContentTypeInfo {
			slug: slug.into(),
			singular_label: singular.into(),
			plural_label: plural.into(),
			create_capability: cap.into(),
			menu_icon: Some("dashicons-admin-post".into()),
		});
		self
	}

	pub fn applied(&self) -> Vec<Directive> {
		self.directives.lock().clone()
	}
}

impl HostAdapter for MockHost {
	fn current_page(&self) -> Option<Box<str>> {
		self.page.clone()
	}

	fn content_type(&self, slug: &str) -> Option<ContentTypeInfo> {
		self.types.iter().find(|t| &*t.slug == slug).cloned()
	}

	fn user_can(&self, capability: &str) -> bool {
		self.caps.iter().any(|c| c == capability)
	}

	fn count_posts(&self, slug: &str) -> PostCounts {
		PostCounts { published: slug.len() as u64, draft: 1 }
	}

	fn apply(&self, directive: &Directive) -> CdgResult<()> {
		self.directives.lock().push(directive.clone());
		Ok(())
	}
}

// vim: ts=4
