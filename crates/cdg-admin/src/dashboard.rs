//! Dashboard widget and page notice planning
//!
//! Decides which quick-add widgets, documentation widget and page notices to
//! render. The host renders the returned plans.

use serde::Serialize;
use serde_with::skip_serializing_none;

use cdg_core::placement::normalize_setting;
use cdg_core::{ContentTypeAssignment, EffectiveSettings, SettingValue, keys};
use cdg_types::host_adapter::{ContentTypeInfo, HostAdapter, PostCounts};

use crate::prelude::*;

pub const MINIMAL_WIDGET_ID: &str = "cdg_cpt_minimal";
pub const DOCUMENTATION_WIDGET_ID: &str = "cdg_documentation";

pub fn quick_add_widget_id(slug: &str) -> String {
	format!("cdg_cpt_widget_{}", slug)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStyle {
	Informative,
	Minimal,
}

impl ModuleStyle {
	/// Anything but "minimal" renders the informative style
	pub fn parse(value: &str) -> Self {
		if value == "minimal" { ModuleStyle::Minimal } else { ModuleStyle::Informative }
	}
}

/// One content type offered for quick creation
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickAddEntry {
	pub slug: Box<str>,
	pub label: Box<str>,
	pub add_new_url: Box<str>,
	pub manage_url: Box<str>,
	pub icon: Option<Box<str>>,
}

impl QuickAddEntry {
	fn from_content_type(info: &ContentTypeInfo) -> Self {
		Self {
			slug: info.slug.clone(),
			label: info.singular_label.clone(),
			add_new_url: format!("post-new.php?post_type={}", info.slug).into(),
			manage_url: format!("edit.php?post_type={}", info.slug).into(),
			icon: info.menu_icon.clone(),
		}
	}
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardWidget {
	/// One widget per content type with publish/draft counts
	QuickAddInformative {
		id: Box<str>,
		entry: QuickAddEntry,
		counts: PostCounts,
		/// Number of recent items to list, when enabled
		recent_limit: Option<u32>,
	},
	/// A single widget with one button per content type
	QuickAddMinimal { id: Box<str>, entries: Vec<QuickAddEntry> },
	Documentation { id: Box<str>, style: ModuleStyle, limit: u32, show_status: bool },
}

/// Quick-add affordance shown at the top of a named admin page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickAddNotice {
	pub page: Box<str>,
	pub entry: QuickAddEntry,
}

fn assignment(settings: &EffectiveSettings) -> CdgResult<ContentTypeAssignment> {
	Ok(normalize_setting(&SettingValue::Json(settings.get_json(keys::SELECTED_CPTS)?)))
}

fn limit(settings: &EffectiveSettings, key: &str) -> CdgResult<u32> {
	Ok(u32::try_from(settings.get_int(key)?.max(0)).unwrap_or(u32::MAX))
}

/// Content types the current user may create, in slug order
fn creatable(
	slugs: impl IntoIterator<Item = String>,
	host: &dyn HostAdapter,
) -> Vec<ContentTypeInfo> {
	slugs
		.into_iter()
		.filter_map(|slug| {
			let Some(info) = host.content_type(&slug) else {
				debug!("Skipping unknown content type {}", slug);
				return None;
			};
			host.user_can(&info.create_capability).then_some(info)
		})
		.collect()
}

/// Widgets to add to the main dashboard
pub fn plan_dashboard(
	settings: &EffectiveSettings,
	host: &dyn HostAdapter,
) -> CdgResult<Vec<DashboardWidget>> {
	let mut widgets = Vec::new();

	if settings.get_bool(keys::ENABLE_CPT_WIDGETS)? && settings.get_bool(keys::SHOW_CPT_WIDGETS)? {
		let types = creatable(assignment(settings)?.dashboard_targets(), host);

		if !types.is_empty() {
			match ModuleStyle::parse(settings.get_str(keys::CPT_MODULE_STYLE)?) {
				ModuleStyle::Minimal => widgets.push(DashboardWidget::QuickAddMinimal {
					id: MINIMAL_WIDGET_ID.into(),
					entries: types.iter().map(QuickAddEntry::from_content_type).collect(),
				}),
				ModuleStyle::Informative => {
					let recent_limit = if settings.get_bool(keys::SHOW_RECENT_POSTS)? {
						Some(limit(settings, keys::RECENT_POSTS_LIMIT)?)
					} else {
						None
					};
					for info in &types {
						widgets.push(DashboardWidget::QuickAddInformative {
							id: quick_add_widget_id(&info.slug).into(),
							entry: QuickAddEntry::from_content_type(info),
							counts: host.count_posts(&info.slug),
							recent_limit,
						});
					}
				}
			}
		}
	}

	if settings.get_bool(keys::ENABLE_DOCUMENTATION)?
		&& settings.get_bool(keys::SHOW_DOCUMENTATION_WIDGETS)?
	{
		widgets.push(DashboardWidget::Documentation {
			id: DOCUMENTATION_WIDGET_ID.into(),
			style: ModuleStyle::parse(settings.get_str(keys::DOCUMENTATION_MODULE_STYLE)?),
			limit: limit(settings, keys::DOCUMENTATION_WIDGET_LIMIT)?,
			show_status: settings.get_bool(keys::SHOW_DOCUMENTATION_STATUS)?,
		});
	}

	debug!("Planned {} dashboard widgets", widgets.len());
	Ok(widgets)
}

/// Quick-add notices for the admin page `page`. Pages nobody is assigned to,
/// including deleted ones, get none.
pub fn plan_page_notices(
	settings: &EffectiveSettings,
	host: &dyn HostAdapter,
	page: &str,
) -> CdgResult<Vec<QuickAddNotice>> {
	if page.is_empty() || !settings.get_bool(keys::ENABLE_CPT_WIDGETS)? {
		return Ok(Vec::new());
	}
	Ok(creatable(assignment(settings)?.targets_for_page(page), host)
		.iter()
		.map(|info| QuickAddNotice { page: page.into(), entry: QuickAddEntry::from_content_type(info) })
		.collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::RecordingHost;
	use cdg_core::SettingsStore;
	use cdg_core::settings::defaults_table;
	use cdg_types::option_adapter::MemoryOptionAdapter;
	use serde_json::json;
	use std::sync::Arc;

	fn settings(bucket: serde_json::Value) -> EffectiveSettings {
		let adapter = MemoryOptionAdapter::with_bucket("cdg_core_settings", bucket);
		SettingsStore::load(Arc::new(defaults_table().unwrap()), Arc::new(adapter), "cdg_core_settings")
			.settings()
			.clone()
	}

	fn host() -> RecordingHost {
		let mut host = RecordingHost { capabilities: vec!["edit_posts"], ..Default::default() }
			.with_content_type("blog", "Blog Post", "edit_posts")
			.with_content_type("event", "Event", "edit_posts")
			.with_content_type("faq", "FAQ", "edit_posts")
			.with_content_type("secret", "Secret", "manage_secrets");
		host.counts.insert("blog".into(), PostCounts { published: 12, draft: 3 });
		host
	}

	#[test]
	fn test_informative_widgets() {
		let settings = settings(json!({
			"selected_cpts": ["blog", "event", "secret", "removed_type"],
			"show_documentation_widgets": false
		}));
		let widgets = plan_dashboard(&settings, &host()).unwrap();

		assert_eq!(widgets.len(), 2);
		let DashboardWidget::QuickAddInformative { id, entry, counts, recent_limit } = &widgets[0]
		else {
			panic!("expected informative widget, got {:?}", widgets[0]);
		};
		assert_eq!(&**id, "cdg_cpt_widget_blog");
		assert_eq!(&*entry.add_new_url, "post-new.php?post_type=blog");
		assert_eq!(*counts, PostCounts { published: 12, draft: 3 });
		assert_eq!(*recent_limit, Some(3));
	}

	#[test]
	fn test_minimal_widget() {
		let settings = settings(json!({
			"selected_cpts": { "blog": { "location": "dashboard" }, "faq": { "location": "support" } },
			"cpt_module_style": "minimal",
			"enable_documentation": false
		}));
		let widgets = plan_dashboard(&settings, &host()).unwrap();

		assert_eq!(widgets.len(), 1);
		match &widgets[0] {
			DashboardWidget::QuickAddMinimal { id, entries } => {
				assert_eq!(&**id, MINIMAL_WIDGET_ID);
				assert_eq!(entries.iter().map(|e| &*e.slug).collect::<Vec<_>>(), vec!["blog"]);
			}
			other => panic!("unexpected widget {:?}", other),
		}
	}

	#[test]
	fn test_documentation_widget() {
		let settings = settings(json!({ "documentation_widget_limit": 8, "enable_cpt_widgets": false }));
		let widgets = plan_dashboard(&settings, &host()).unwrap();
		assert_eq!(
			widgets,
			vec![DashboardWidget::Documentation {
				id: DOCUMENTATION_WIDGET_ID.into(),
				style: ModuleStyle::Informative,
				limit: 8,
				show_status: true,
			}]
		);
	}

	#[test]
	fn test_page_notices() {
		let settings = settings(json!({
			"selected_cpts": {
				"blog": { "location": "dashboard" },
				"faq": { "location": "support-page" },
				"secret": { "location": "support-page" }
			}
		}));
		let host = host();

		let notices = plan_page_notices(&settings, &host, "support-page").unwrap();
		assert_eq!(notices.len(), 1);
		assert_eq!(&*notices[0].entry.slug, "faq");
		assert!(plan_page_notices(&settings, &host, "other-page").unwrap().is_empty());
		assert!(plan_page_notices(&settings, &host, "").unwrap().is_empty());
	}

	#[test]
	fn test_widget_serialization() {
		let widget = DashboardWidget::Documentation {
			id: DOCUMENTATION_WIDGET_ID.into(),
			style: ModuleStyle::Minimal,
			limit: 5,
			show_status: false,
		};
		assert_eq!(
			serde_json::to_value(&widget).unwrap(),
			json!({
				"kind": "documentation",
				"id": "cdg_documentation",
				"style": "minimal",
				"limit": 5,
				"show_status": false
			})
		);
	}
}

// vim: ts=4
