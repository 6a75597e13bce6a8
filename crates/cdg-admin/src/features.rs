//! Hardening and cleanup features
//!
//! Reads the effective settings once and registers one handler per enabled
//! feature. Handlers only send `Directive`s; the host performs the work.

use std::sync::Arc;

use cdg_core::{EffectiveSettings, keys};
use cdg_types::host_adapter::{
	ContentTypeLabels, Directive, EditorMode, HeadLink, HeartbeatContext, HeartbeatPolicy,
	HostAdapter, RevisionPolicy,
};
use cdg_types::types::CAP_MANAGE_OPTIONS;

use crate::hooks::{DEFAULT_PRIORITY, HookEvent, HookFunction, HookRegistry};
use crate::prelude::*;

/// Upload extensions blocked by `block_dangerous_uploads`
pub const DANGEROUS_EXTENSIONS: &[&str] = &[
	"exe", "php", "phtml", "php3", "php4", "php5", "php7", "phps", "pht", "js", "jsx", "swf",
	"flv", "sh", "bash", "bat", "cmd", "com", "cgi", "pl", "py", "asp", "aspx", "jsp", "htaccess",
];

/// Admin page slugs of the form plugin's editor
const FORM_EDITOR_PAGE_PREFIX: &str = "gf_";

/// Runs after the host registered its own dashboard widgets
const LATE_PRIORITY: i32 = 999;

/// Parse a heartbeat setting: "disable", an interval in seconds, or anything
/// else for the host default
pub fn heartbeat_policy(value: &str) -> HeartbeatPolicy {
	match value.trim() {
		"disable" => HeartbeatPolicy::Disabled,
		v => v.parse::<u32>().map_or(HeartbeatPolicy::Default, HeartbeatPolicy::Interval),
	}
}

pub fn editor_mode(value: &str) -> EditorMode {
	match value {
		"optimize" => EditorMode::Optimize,
		"disable" => EditorMode::Disable,
		_ => EditorMode::Default,
	}
}

pub fn revision_policy(mode: &str, limit: i64) -> RevisionPolicy {
	match mode {
		"disabled" => RevisionPolicy::Disabled,
		"limited" => RevisionPolicy::Limited(u32::try_from(limit.max(1)).unwrap_or(u32::MAX)),
		_ => RevisionPolicy::Unlimited,
	}
}

fn apply_all(directives: Vec<Directive>) -> HookFunction {
	let directives: Arc<[Directive]> = directives.into();
	Arc::new(move |host: &dyn HostAdapter| {
		for directive in directives.iter() {
			host.apply(directive)?;
		}
		Ok(())
	})
}

fn register_directives(
	registry: &mut HookRegistry,
	event: HookEvent,
	name: &str,
	priority: i32,
	directives: Vec<Directive>,
) {
	if !directives.is_empty() {
		registry.register(event, name, priority, apply_all(directives));
	}
}

/// Register handlers for every enabled feature
pub fn register_hooks(settings: &EffectiveSettings, registry: &mut HookRegistry) -> CdgResult<()> {
	let before = registry.len();

	register_cleanup(settings, registry)?;
	register_heartbeat(settings, registry)?;
	register_security(settings, registry)?;
	register_defaults(settings, registry)?;
	register_performance(settings, registry)?;
	register_integrations(settings, registry)?;
	register_branding(settings, registry)?;

	info!("Registered {} feature hooks", registry.len() - before);
	Ok(())
}

fn register_cleanup(settings: &EffectiveSettings, registry: &mut HookRegistry) -> CdgResult<()> {
	let head_links = [
		(keys::REMOVE_WP_VERSION, HeadLink::Generator),
		(keys::REMOVE_WLW_MANIFEST, HeadLink::WlwManifest),
		(keys::REMOVE_RSD_LINK, HeadLink::Rsd),
		(keys::REMOVE_SHORTLINK, HeadLink::Shortlink),
		(keys::REMOVE_ADJACENT_POSTS, HeadLink::AdjacentPosts),
		(keys::REMOVE_OEMBED_LINKS, HeadLink::OEmbed),
		(keys::REMOVE_REST_API_LINK, HeadLink::RestApi),
	];
	let mut directives = Vec::new();
	for (key, link) in head_links {
		if settings.get_bool(key)? {
			directives.push(Directive::RemoveHeadLink(link));
		}
	}
	register_directives(registry, HookEvent::Init, "cleanup_head", DEFAULT_PRIORITY, directives);

	if settings.get_bool(keys::DISABLE_EMOJIS)? {
		register_directives(
			registry,
			HookEvent::Init,
			"disable_emojis",
			DEFAULT_PRIORITY,
			vec![Directive::DisableEmojis],
		);
	}

	let widgets = [
		(keys::REMOVE_QUICK_DRAFT, &["dashboard_quick_press"][..]),
		(keys::REMOVE_WP_NEWS, &["dashboard_primary", "dashboard_secondary"][..]),
		(keys::REMOVE_PHP_NAG, &["dashboard_php_nag"][..]),
		(keys::REMOVE_BROWSER_NAG, &["dashboard_browser_nag"][..]),
		(keys::REMOVE_SITE_HEALTH, &["dashboard_site_health"][..]),
		(keys::REMOVE_ACTIVITY, &["dashboard_activity"][..]),
		(keys::REMOVE_AT_A_GLANCE, &["dashboard_right_now"][..]),
	];
	let mut directives = Vec::new();
	for (key, ids) in widgets {
		if settings.get_bool(key)? {
			directives.extend(ids.iter().map(|id| Directive::RemoveDashboardWidget((*id).into())));
		}
	}
	for id in settings.get_list(keys::HIDDEN_DASHBOARD_WIDGETS)? {
		// Our own widgets cannot be hidden this way
		if !id.starts_with("cdg_") {
			directives.push(Directive::RemoveDashboardWidget(id.as_str().into()));
		}
	}
	if settings.get_bool(keys::REMOVE_WELCOME_PANEL)? {
		directives.push(Directive::RemoveWelcomePanel);
	}
	register_directives(
		registry,
		HookEvent::DashboardSetup,
		"remove_dashboard_widgets",
		LATE_PRIORITY,
		directives,
	);

	Ok(())
}

fn register_heartbeat(settings: &EffectiveSettings, registry: &mut HookRegistry) -> CdgResult<()> {
	let skip_in_builder = settings.get_bool(keys::HEARTBEAT_EXCEPTION_BUILDER)?;

	let frontend = heartbeat_policy(settings.get_str(keys::HEARTBEAT_FRONTEND)?);
	if frontend != HeartbeatPolicy::Default {
		register_directives(
			registry,
			HookEvent::Init,
			"heartbeat_frontend",
			DEFAULT_PRIORITY,
			vec![Directive::Heartbeat {
				context: HeartbeatContext::Frontend,
				policy: frontend,
				skip_in_builder,
			}],
		);
	}

	let admin = heartbeat_policy(settings.get_str(keys::HEARTBEAT_ADMIN)?);
	if admin != HeartbeatPolicy::Default {
		let keep_on_form_pages = settings.get_bool(keys::HEARTBEAT_EXCEPTION_GF)?;
		let directive = Directive::Heartbeat {
			context: HeartbeatContext::Admin,
			policy: admin,
			skip_in_builder,
		};
		registry.register(
			HookEvent::AdminInit,
			"heartbeat_admin",
			DEFAULT_PRIORITY,
			Arc::new(move |host: &dyn HostAdapter| {
				if keep_on_form_pages
					&& host.current_page().is_some_and(|p| p.starts_with(FORM_EDITOR_PAGE_PREFIX))
				{
					debug!("Keeping heartbeat on form editor page");
					return Ok(());
				}
				host.apply(&directive)
			}),
		);
	}

	Ok(())
}

fn register_security(settings: &EffectiveSettings, registry: &mut HookRegistry) -> CdgResult<()> {
	let mut init = Vec::new();
	if settings.get_bool(keys::DISABLE_XMLRPC)? {
		init.push(Directive::DisableXmlRpc);
	}
	if settings.get_bool(keys::BLOCK_DANGEROUS_UPLOADS)? {
		init.push(Directive::BlockUploadExtensions(
			DANGEROUS_EXTENSIONS.iter().map(|ext| (*ext).into()).collect(),
		));
	}
	if settings.get_bool(keys::ENABLE_SVG_UPLOADS)? {
		init.push(Directive::AllowSvgUploads { admin_only: settings.get_bool(keys::SVG_ADMIN_ONLY)? });
	}
	register_directives(registry, HookEvent::Init, "security", DEFAULT_PRIORITY, init);

	let mut headers = Vec::new();
	if settings.get_bool(keys::REMOVE_POWERED_BY)? {
		headers.push(Directive::RemoveResponseHeader("X-Powered-By".into()));
	}
	if settings.get_bool(keys::ADD_FRAME_OPTIONS)? {
		headers.push(Directive::SetResponseHeader {
			name: "X-Frame-Options".into(),
			value: "SAMEORIGIN".into(),
		});
	}
	register_directives(registry, HookEvent::SendHeaders, "security_headers", DEFAULT_PRIORITY, headers);

	if settings.get_bool(keys::DISABLE_CODE_EDITOR)? {
		registry.register(
			HookEvent::AdminInit,
			"disable_code_editor",
			DEFAULT_PRIORITY,
			Arc::new(|host: &dyn HostAdapter| {
				if host.user_can(CAP_MANAGE_OPTIONS) {
					return Ok(());
				}
				host.apply(&Directive::DisableCodeEditor)
			}),
		);
	}

	Ok(())
}

fn register_defaults(settings: &EffectiveSettings, registry: &mut HookRegistry) -> CdgResult<()> {
	if settings.get_bool(keys::DISABLE_COMMENTS)? {
		register_directives(
			registry,
			HookEvent::Init,
			"disable_comments",
			100,
			vec![Directive::DisableComments],
		);
	}

	if settings.get_bool(keys::HIDE_DIVI_PROJECTS)? {
		register_directives(
			registry,
			HookEvent::Init,
			"hide_projects",
			100,
			vec![Directive::UnregisterContentType("project".into())],
		);
	} else if settings.get_bool(keys::ENABLE_PROJECT_RENAME)? {
		let labels = ContentTypeLabels {
			plural: settings.get_str(keys::PROJECT_RENAME_PLURAL)?.into(),
			singular: settings.get_str(keys::PROJECT_RENAME_SINGULAR)?.into(),
			menu: settings.get_str(keys::PROJECT_RENAME_MENU)?.into(),
			icon: settings.get_str(keys::PROJECT_RENAME_ICON)?.into(),
		};
		register_directives(
			registry,
			HookEvent::Init,
			"rename_projects",
			100,
			vec![Directive::RelabelContentType { slug: "project".into(), labels }],
		);
	}

	if settings.get_bool(keys::ENABLE_POST_RENAME)? {
		let labels = ContentTypeLabels {
			plural: settings.get_str(keys::POST_RENAME_PLURAL)?.into(),
			singular: settings.get_str(keys::POST_RENAME_SINGULAR)?.into(),
			menu: settings.get_str(keys::POST_RENAME_MENU)?.into(),
			icon: settings.get_str(keys::POST_RENAME_ICON)?.into(),
		};
		register_directives(
			registry,
			HookEvent::Init,
			"rename_posts",
			99,
			vec![Directive::RelabelContentType { slug: "post".into(), labels }],
		);
		register_directives(
			registry,
			HookEvent::AdminInit,
			"post_page_attributes",
			DEFAULT_PRIORITY,
			vec![Directive::EnablePageAttributes("post".into())],
		);
	}

	Ok(())
}

fn register_performance(settings: &EffectiveSettings, registry: &mut HookRegistry) -> CdgResult<()> {
	let mut directives = Vec::new();

	let mode = editor_mode(settings.get_str(keys::GUTENBERG_MODE)?);
	if mode != EditorMode::Default {
		directives.push(Directive::EditorMode(mode));
	}
	if settings.get_bool(keys::OPTIMIZE_SEARCH)? {
		directives.push(Directive::OptimizeSearch);
	}
	if settings.get_bool(keys::OPTIMIZE_ARCHIVES)? {
		directives.push(Directive::OptimizeArchives);
	}
	if settings.get_bool(keys::ENABLE_LAZY_LOADING)? {
		directives.push(Directive::EnableLazyLoading);
	}
	if settings.get_bool(keys::REMOVE_MEDIUM_LARGE)? {
		directives.push(Directive::RemoveImageSize("medium_large".into()));
	}
	for size in settings.get_list(keys::DISABLED_IMAGE_SIZES)? {
		directives.push(Directive::RemoveImageSize(size.as_str().into()));
	}
	if settings.get_bool(keys::REMOVE_DNS_PREFETCH)? {
		directives.push(Directive::RemoveDnsPrefetch);
	}

	let revisions = revision_policy(
		settings.get_str(keys::POST_REVISIONS_MODE)?,
		settings.get_int(keys::POST_REVISIONS_LIMIT)?,
	);
	if revisions != RevisionPolicy::Unlimited {
		directives.push(Directive::Revisions(revisions));
	}

	register_directives(registry, HookEvent::Init, "performance", DEFAULT_PRIORITY, directives);
	Ok(())
}

fn register_integrations(settings: &EffectiveSettings, registry: &mut HookRegistry) -> CdgResult<()> {
	if !settings.get_bool(keys::ENABLE_GF_FIXES)? {
		return Ok(());
	}
	let manual_pages = match settings.get_str(keys::GF_DETECTION_MODE)? {
		"manual" => Some(
			settings.get_list(keys::GF_MANUAL_PAGES)?.iter().map(|p| p.as_str().into()).collect(),
		),
		_ => None,
	};
	register_directives(
		registry,
		HookEvent::Init,
		"form_compatibility",
		20,
		vec![Directive::FormCompatibility {
			manual_pages,
			keep_heartbeat: settings.get_bool(keys::HEARTBEAT_EXCEPTION_GF)?,
		}],
	);
	Ok(())
}

fn register_branding(settings: &EffectiveSettings, registry: &mut HookRegistry) -> CdgResult<()> {
	if settings.get_bool(keys::ENABLE_ADMIN_BRANDING)? {
		let text = settings.get_str(keys::ADMIN_FOOTER_TEXT)?;
		register_directives(
			registry,
			HookEvent::AdminFooter,
			"admin_footer_text",
			DEFAULT_PRIORITY,
			vec![Directive::AdminFooterText(text.into())],
		);
	}

	let css = settings.get_str(keys::CUSTOM_ADMIN_CSS)?;
	if !css.trim().is_empty() {
		register_directives(
			registry,
			HookEvent::AdminHead,
			"custom_admin_css",
			DEFAULT_PRIORITY,
			vec![Directive::AdminCss(css.into())],
		);
	}
	Ok(())
}


// vim: ts=4
