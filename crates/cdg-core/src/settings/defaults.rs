//! Defaults table
//!
//! Registers every recognized option with its section, kind and default. Key
//! names match the stored buckets and must not change.

use crate::prelude::*;

use super::types::{
	FrozenSettingsRegistry, Section, SettingDefinition, SettingGroup, SettingKind, SettingValue,
	SettingsRegistry, TextFormat,
};

/// Keys read outside the defaults table
pub mod keys {
	pub const ENABLE_DOCUMENTATION: &str = "enable_documentation";
	pub const SHOW_DOCUMENTATION_WIDGETS: &str = "show_documentation_widgets";
	pub const SHOW_DOCUMENTATION_STATUS: &str = "show_documentation_status";
	pub const DOCUMENTATION_MODULE_STYLE: &str = "documentation_module_style";
	pub const DOCUMENTATION_WIDGET_LIMIT: &str = "documentation_widget_limit";
	pub const ENABLE_CPT_WIDGETS: &str = "enable_cpt_widgets";
	pub const SHOW_CPT_WIDGETS: &str = "show_cpt_widgets";
	pub const CPT_MODULE_STYLE: &str = "cpt_module_style";
	pub const SELECTED_CPTS: &str = "selected_cpts";
	pub const SHOW_RECENT_POSTS: &str = "show_recent_posts";
	pub const RECENT_POSTS_LIMIT: &str = "recent_posts_limit";
	pub const ENABLE_ADMIN_BRANDING: &str = "enable_admin_branding";

	pub const DISABLE_COMMENTS: &str = "disable_comments";
	pub const HIDE_DIVI_PROJECTS: &str = "hide_divi_projects";
	pub const ENABLE_PROJECT_RENAME: &str = "enable_project_rename";
	pub const PROJECT_RENAME_PLURAL: &str = "project_rename_plural";
	pub const PROJECT_RENAME_SINGULAR: &str = "project_rename_singular";
	pub const PROJECT_RENAME_MENU: &str = "project_rename_menu";
	pub const PROJECT_RENAME_ICON: &str = "project_rename_icon";
	pub const ENABLE_POST_RENAME: &str = "enable_post_rename";
	pub const POST_RENAME_PLURAL: &str = "post_rename_plural";
	pub const POST_RENAME_SINGULAR: &str = "post_rename_singular";
	pub const POST_RENAME_MENU: &str = "post_rename_menu";
	pub const POST_RENAME_ICON: &str = "post_rename_icon";

	pub const REMOVE_WP_VERSION: &str = "remove_wp_version";
	pub const REMOVE_WLW_MANIFEST: &str = "remove_wlw_manifest";
	pub const REMOVE_RSD_LINK: &str = "remove_rsd_link";
	pub const REMOVE_SHORTLINK: &str = "remove_shortlink";
	pub const REMOVE_ADJACENT_POSTS: &str = "remove_adjacent_posts";
	pub const REMOVE_OEMBED_LINKS: &str = "remove_oembed_links";
	pub const REMOVE_REST_API_LINK: &str = "remove_rest_api_link";
	pub const DISABLE_EMOJIS: &str = "disable_emojis";
	pub const REMOVE_QUICK_DRAFT: &str = "remove_quick_draft";
	pub const REMOVE_WP_NEWS: &str = "remove_wp_news";
	pub const REMOVE_PHP_NAG: &str = "remove_php_nag";
	pub const REMOVE_BROWSER_NAG: &str = "remove_browser_nag";
	pub const REMOVE_SITE_HEALTH: &str = "remove_site_health";
	pub const REMOVE_WELCOME_PANEL: &str = "remove_welcome_panel";
	pub const REMOVE_ACTIVITY: &str = "remove_activity";
	pub const REMOVE_AT_A_GLANCE: &str = "remove_at_a_glance";
	pub const HIDDEN_DASHBOARD_WIDGETS: &str = "hidden_dashboard_widgets";
	pub const HEARTBEAT_ADMIN: &str = "heartbeat_admin";
	pub const HEARTBEAT_FRONTEND: &str = "heartbeat_frontend";
	pub const HEARTBEAT_EXCEPTION_BUILDER: &str = "heartbeat_exception_builder";
	pub const HEARTBEAT_EXCEPTION_GF: &str = "heartbeat_exception_gf";

	pub const DISABLE_XMLRPC: &str = "disable_xmlrpc";
	pub const BLOCK_DANGEROUS_UPLOADS: &str = "block_dangerous_uploads";
	pub const REMOVE_POWERED_BY: &str = "remove_powered_by";
	pub const ADD_FRAME_OPTIONS: &str = "add_frame_options";
	pub const DISABLE_CODE_EDITOR: &str = "disable_code_editor";
	pub const ENABLE_SVG_UPLOADS: &str = "enable_svg_uploads";
	pub const SVG_ADMIN_ONLY: &str = "svg_admin_only";

	pub const GUTENBERG_MODE: &str = "gutenberg_mode";
	pub const OPTIMIZE_SEARCH: &str = "optimize_search";
	pub const OPTIMIZE_ARCHIVES: &str = "optimize_archives";
	pub const ENABLE_LAZY_LOADING: &str = "enable_lazy_loading";
	pub const REMOVE_MEDIUM_LARGE: &str = "remove_medium_large";
	pub const REMOVE_DNS_PREFETCH: &str = "remove_dns_prefetch";
	pub const DISABLED_IMAGE_SIZES: &str = "disabled_image_sizes";
	pub const POST_REVISIONS_MODE: &str = "post_revisions_mode";
	pub const POST_REVISIONS_LIMIT: &str = "post_revisions_limit";

	pub const ENABLE_GF_FIXES: &str = "enable_gf_fixes";
	pub const GF_DETECTION_MODE: &str = "gf_detection_mode";
	pub const GF_MANUAL_PAGES: &str = "gf_manual_pages";

	pub const ADMIN_FOOTER_TEXT: &str = "admin_footer_text";
	pub const CUSTOM_ADMIN_CSS: &str = "custom_admin_css";
}

/// Keys kept in the feature bucket shared with the quick tools widgets
pub const FEATURE_GROUP_KEYS: &[&str] = &[
	keys::SHOW_DOCUMENTATION_WIDGETS,
	keys::SHOW_DOCUMENTATION_STATUS,
	keys::DOCUMENTATION_WIDGET_LIMIT,
	keys::DOCUMENTATION_MODULE_STYLE,
	keys::SHOW_CPT_WIDGETS,
	keys::CPT_MODULE_STYLE,
	keys::SELECTED_CPTS,
];

fn group_of(key: &str) -> SettingGroup {
	if FEATURE_GROUP_KEYS.contains(&key) { SettingGroup::Features } else { SettingGroup::Core }
}

pub const MODULE_STYLES: &[&str] = &["informative", "minimal"];
pub const HEARTBEAT_ADMIN_CHOICES: &[&str] = &["default", "60", "120", "disable"];
pub const HEARTBEAT_FRONTEND_CHOICES: &[&str] = &["default", "120", "disable"];
pub const GUTENBERG_MODES: &[&str] = &["default", "optimize", "disable"];
pub const REVISION_MODES: &[&str] = &["unlimited", "disabled", "limited"];
pub const GF_DETECTION_MODES: &[&str] = &["auto", "manual"];

/// Menu icons offered for renamed content types
pub const MENU_ICONS: &[&str] = &[
	"dashicons-admin-post",
	"dashicons-slides",
	"dashicons-images-alt2",
	"dashicons-format-gallery",
	"dashicons-format-image",
	"dashicons-camera",
	"dashicons-video-alt3",
	"dashicons-microphone",
	"dashicons-portfolio",
	"dashicons-book",
	"dashicons-book-alt",
	"dashicons-media-document",
	"dashicons-media-text",
	"dashicons-testimonial",
	"dashicons-star-filled",
	"dashicons-heart",
	"dashicons-awards",
	"dashicons-calendar-alt",
	"dashicons-location",
	"dashicons-businessman",
	"dashicons-groups",
	"dashicons-products",
	"dashicons-cart",
	"dashicons-store",
	"dashicons-building",
	"dashicons-hammer",
	"dashicons-clipboard",
	"dashicons-analytics",
	"dashicons-chart-bar",
	"dashicons-megaphone",
	"dashicons-email",
	"dashicons-admin-links",
	"dashicons-admin-generic",
];

const DEFAULT_FOOTER_TEXT: &str = "Website by <a href=\"https://crawforddesigngroup.com\" target=\"_blank\">Crawford Design Group</a>";

fn flag(
	registry: &mut SettingsRegistry,
	section: Section,
	key: &str,
	default: bool,
	description: &str,
) -> CdgResult<()> {
	registry.register(
		SettingDefinition::builder(key)
			.description(description)
			.section(section)
			.group(group_of(key))
			.flag(default)
			.build()?,
	)
}

fn choice(
	registry: &mut SettingsRegistry,
	section: Section,
	key: &str,
	allowed: &'static [&'static str],
	default: &str,
	description: &str,
) -> CdgResult<()> {
	registry.register(
		SettingDefinition::builder(key)
			.description(description)
			.section(section)
			.group(group_of(key))
			.kind(SettingKind::Choice(allowed))
			.default(SettingValue::String(default.into()))
			.build()?,
	)
}

fn text(
	registry: &mut SettingsRegistry,
	section: Section,
	key: &str,
	format: TextFormat,
	default: &str,
	description: &str,
) -> CdgResult<()> {
	registry.register(
		SettingDefinition::builder(key)
			.description(description)
			.section(section)
			.group(group_of(key))
			.kind(SettingKind::Text(format))
			.default(SettingValue::String(default.into()))
			.build()?,
	)
}

fn integer(
	registry: &mut SettingsRegistry,
	section: Section,
	key: &str,
	(min, max): (i64, i64),
	default: i64,
	description: &str,
) -> CdgResult<()> {
	registry.register(
		SettingDefinition::builder(key)
			.description(description)
			.section(section)
			.group(group_of(key))
			.kind(SettingKind::Integer { min, max })
			.default(SettingValue::Int(default))
			.build()?,
	)
}

fn list(
	registry: &mut SettingsRegistry,
	section: Section,
	key: &str,
	description: &str,
) -> CdgResult<()> {
	registry.register(
		SettingDefinition::builder(key)
			.description(description)
			.section(section)
			.group(group_of(key))
			.kind(SettingKind::List)
			.default(SettingValue::List(Vec::new()))
			.build()?,
	)
}

/// Register all CDG settings
pub fn register_settings(registry: &mut SettingsRegistry) -> CdgResult<()> {
	register_features(registry)?;
	register_defaults(registry)?;
	register_cleanup(registry)?;
	register_security(registry)?;
	register_performance(registry)?;
	register_integrations(registry)?;
	register_admin(registry)?;
	Ok(())
}

/// Build the frozen defaults table
pub fn defaults_table() -> CdgResult<FrozenSettingsRegistry> {
	let mut registry = SettingsRegistry::new();
	register_settings(&mut registry)?;
	Ok(registry.freeze())
}

fn register_features(registry: &mut SettingsRegistry) -> CdgResult<()> {
	use keys::*;
	let s = Section::Features;

	// Documentation
	flag(registry, s, ENABLE_DOCUMENTATION, true, "Enable the documentation repository")?;
	flag(registry, s, SHOW_DOCUMENTATION_WIDGETS, true, "Show documentation widgets on the dashboard")?;
	flag(registry, s, SHOW_DOCUMENTATION_STATUS, true, "Show documentation status in the admin bar")?;
	choice(
		registry,
		s,
		DOCUMENTATION_MODULE_STYLE,
		MODULE_STYLES,
		"informative",
		"Documentation widget style",
	)?;
	integer(registry, s, DOCUMENTATION_WIDGET_LIMIT, (1, 10), 5, "Documentation items per widget")?;

	// Content type widgets
	flag(registry, s, ENABLE_CPT_WIDGETS, true, "Enable quick-add widgets for content types")?;
	flag(registry, s, SHOW_CPT_WIDGETS, true, "Show quick-add widgets")?;
	choice(registry, s, CPT_MODULE_STYLE, MODULE_STYLES, "informative", "Quick-add widget style")?;
	registry.register(
		SettingDefinition::builder(SELECTED_CPTS)
			.description("Content types with a quick-add widget and where it is placed")
			.section(s)
			.group(SettingGroup::Features)
			.kind(SettingKind::Placement)
			.default(SettingValue::Json(serde_json::Value::Object(serde_json::Map::new())))
			.build()?,
	)?;
	flag(registry, s, SHOW_RECENT_POSTS, true, "List recent items in informative widgets")?;
	integer(registry, s, RECENT_POSTS_LIMIT, (1, 10), 3, "Recent items per informative widget")?;

	Ok(())
}

fn register_defaults(registry: &mut SettingsRegistry) -> CdgResult<()> {
	use keys::*;
	let s = Section::Defaults;

	flag(registry, s, DISABLE_COMMENTS, false, "Disable comments site-wide")?;

	// Divi projects
	flag(registry, s, HIDE_DIVI_PROJECTS, false, "Hide the Divi projects content type")?;
	flag(registry, s, ENABLE_PROJECT_RENAME, false, "Rename the Divi projects content type")?;
	text(registry, s, PROJECT_RENAME_PLURAL, TextFormat::Plain, "Projects", "Projects plural label")?;
	text(registry, s, PROJECT_RENAME_SINGULAR, TextFormat::Plain, "Project", "Projects singular label")?;
	text(registry, s, PROJECT_RENAME_MENU, TextFormat::Plain, "Projects", "Projects menu label")?;
	choice(registry, s, PROJECT_RENAME_ICON, MENU_ICONS, "dashicons-portfolio", "Projects menu icon")?;

	// Posts
	flag(registry, s, ENABLE_POST_RENAME, false, "Rename the posts content type")?;
	text(registry, s, POST_RENAME_PLURAL, TextFormat::Plain, "Slides", "Posts plural label")?;
	text(registry, s, POST_RENAME_SINGULAR, TextFormat::Plain, "Slide", "Posts singular label")?;
	text(registry, s, POST_RENAME_MENU, TextFormat::Plain, "Slides", "Posts menu label")?;
	choice(registry, s, POST_RENAME_ICON, MENU_ICONS, "dashicons-slides", "Posts menu icon")?;

	Ok(())
}

fn register_cleanup(registry: &mut SettingsRegistry) -> CdgResult<()> {
	use keys::*;
	let s = Section::Cleanup;

	// Page head
	flag(registry, s, REMOVE_WP_VERSION, true, "Remove the generator meta tag")?;
	flag(registry, s, REMOVE_WLW_MANIFEST, true, "Remove the WLW manifest link")?;
	flag(registry, s, REMOVE_RSD_LINK, true, "Remove the RSD link")?;
	flag(registry, s, REMOVE_SHORTLINK, true, "Remove the shortlink")?;
	flag(registry, s, REMOVE_ADJACENT_POSTS, true, "Remove adjacent post links")?;
	flag(registry, s, REMOVE_OEMBED_LINKS, true, "Remove oEmbed discovery links")?;
	flag(registry, s, REMOVE_REST_API_LINK, true, "Remove the REST API link")?;
	flag(registry, s, DISABLE_EMOJIS, true, "Disable emoji scripts and styles")?;

	// Dashboard widgets
	flag(registry, s, REMOVE_QUICK_DRAFT, true, "Remove the Quick Draft widget")?;
	flag(registry, s, REMOVE_WP_NEWS, true, "Remove the events and news widget")?;
	flag(registry, s, REMOVE_PHP_NAG, true, "Remove the PHP version nag")?;
	flag(registry, s, REMOVE_BROWSER_NAG, true, "Remove the browser nag")?;
	flag(registry, s, REMOVE_SITE_HEALTH, false, "Remove the Site Health widget")?;
	flag(registry, s, REMOVE_WELCOME_PANEL, false, "Remove the welcome panel")?;
	flag(registry, s, REMOVE_ACTIVITY, false, "Remove the Activity widget")?;
	flag(registry, s, REMOVE_AT_A_GLANCE, false, "Remove the At a Glance widget")?;
	list(registry, s, HIDDEN_DASHBOARD_WIDGETS, "Additional dashboard widget ids to hide")?;

	// Heartbeat
	choice(registry, s, HEARTBEAT_ADMIN, HEARTBEAT_ADMIN_CHOICES, "60", "Heartbeat in the admin area")?;
	choice(
		registry,
		s,
		HEARTBEAT_FRONTEND,
		HEARTBEAT_FRONTEND_CHOICES,
		"disable",
		"Heartbeat on the public site",
	)?;
	flag(registry, s, HEARTBEAT_EXCEPTION_BUILDER, true, "Keep heartbeat while the page builder is open")?;
	flag(registry, s, HEARTBEAT_EXCEPTION_GF, true, "Keep heartbeat on form editor pages")?;

	Ok(())
}

fn register_security(registry: &mut SettingsRegistry) -> CdgResult<()> {
	use keys::*;
	let s = Section::Security;

	flag(registry, s, DISABLE_XMLRPC, true, "Disable XML-RPC")?;
	flag(registry, s, BLOCK_DANGEROUS_UPLOADS, true, "Block executable upload types")?;
	flag(registry, s, REMOVE_POWERED_BY, true, "Remove the X-Powered-By header")?;
	flag(registry, s, ADD_FRAME_OPTIONS, true, "Send X-Frame-Options: SAMEORIGIN")?;
	flag(registry, s, DISABLE_CODE_EDITOR, true, "Disable code editing for non-administrators")?;
	flag(registry, s, ENABLE_SVG_UPLOADS, false, "Allow sanitized SVG uploads")?;
	flag(registry, s, SVG_ADMIN_ONLY, true, "Restrict SVG uploads to administrators")?;

	Ok(())
}

fn register_performance(registry: &mut SettingsRegistry) -> CdgResult<()> {
	use keys::*;
	let s = Section::Performance;

	choice(registry, s, GUTENBERG_MODE, GUTENBERG_MODES, "optimize", "Block editor mode")?;
	flag(registry, s, OPTIMIZE_SEARCH, true, "Restrict search to public content")?;
	flag(registry, s, OPTIMIZE_ARCHIVES, true, "Skip counting rows on archive queries")?;
	flag(registry, s, ENABLE_LAZY_LOADING, true, "Lazy-load images")?;
	flag(registry, s, REMOVE_MEDIUM_LARGE, true, "Do not generate the medium_large image size")?;
	flag(registry, s, REMOVE_DNS_PREFETCH, true, "Remove DNS prefetch hints")?;
	list(registry, s, DISABLED_IMAGE_SIZES, "Image sizes that are not generated")?;
	choice(registry, s, POST_REVISIONS_MODE, REVISION_MODES, "limited", "Post revisions mode")?;
	integer(registry, s, POST_REVISIONS_LIMIT, (1, 100), 5, "Revisions kept per post")?;

	Ok(())
}

fn register_integrations(registry: &mut SettingsRegistry) -> CdgResult<()> {
	use keys::*;
	let s = Section::Integrations;

	flag(registry, s, ENABLE_GF_FIXES, true, "Enable form plugin compatibility fixes")?;
	choice(registry, s, GF_DETECTION_MODE, GF_DETECTION_MODES, "auto", "How form pages are detected")?;
	list(registry, s, GF_MANUAL_PAGES, "Pages containing forms, one per line")?;

	Ok(())
}

fn register_admin(registry: &mut SettingsRegistry) -> CdgResult<()> {
	use keys::*;
	let s = Section::Admin;

	flag(registry, s, ENABLE_ADMIN_BRANDING, true, "Show agency branding in the admin footer")?;
	text(registry, s, ADMIN_FOOTER_TEXT, TextFormat::Rich, DEFAULT_FOOTER_TEXT, "Admin footer text")?;
	text(registry, s, CUSTOM_ADMIN_CSS, TextFormat::StripAll, "", "Custom admin CSS")?;

	Ok(())
}


// vim: ts=4
