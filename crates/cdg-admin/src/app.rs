//! App state type

use std::fmt;
use std::sync::Arc;

use cdg_core::settings::{DEFAULT_CORE_BUCKET, DEFAULT_FEATURE_BUCKET};
use cdg_core::{
	BucketNames, EffectiveSettings, FrozenSettingsRegistry, Section, SectionSanitizer, SettingsStore,
};
use cdg_types::option_adapter::OptionAdapter;

use crate::hooks::HookRegistry;
use crate::prelude::*;
use crate::token::{TokenIssuer, settings_action};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_SETTINGS_PAGE: &str = "cdg-core-settings";
/// One day, matching the host's own form tokens
pub const DEFAULT_TOKEN_LIFETIME: u64 = 86_400;

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub option_adapter: Arc<dyn OptionAdapter>,

	// Settings subsystem
	pub settings_registry: Arc<FrozenSettingsRegistry>,
	pub sanitizer: SectionSanitizer,

	pub tokens: TokenIssuer,
}

impl fmt::Debug for AppState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AppState")
			.field("opts", &self.opts)
			.field("option_adapter", &self.option_adapter)
			.field("settings", &self.settings_registry.len())
			.finish_non_exhaustive()
	}
}

impl AppState {
	/// Assemble the app from options, a storage adapter and the defaults table
	pub fn new(
		opts: AppBuilderOpts,
		option_adapter: Arc<dyn OptionAdapter>,
		settings_registry: FrozenSettingsRegistry,
	) -> CdgResult<App> {
		let secret = opts
			.token_secret
			.as_deref()
			.ok_or_else(|| Error::ConfigError("token secret is not set".into()))?;
		let tokens = TokenIssuer::new(secret.as_bytes(), opts.token_lifetime)?;
		let settings_registry = Arc::new(settings_registry);
		let sanitizer = SectionSanitizer::new(settings_registry.clone())?;

		info!(
			"CDG admin {} ready: {} settings in buckets '{}' and '{}'",
			VERSION,
			settings_registry.len(),
			opts.settings_bucket,
			opts.feature_bucket
		);
		Ok(Arc::new(Self { opts, option_adapter, settings_registry, sanitizer, tokens }))
	}

	/// Load the effective settings for one request
	pub fn settings(&self) -> SettingsStore {
		SettingsStore::load(
			self.settings_registry.clone(),
			self.option_adapter.clone(),
			BucketNames::new(self.opts.settings_bucket.clone(), self.opts.feature_bucket.clone()),
		)
	}

	/// Build the hook registry the effective settings ask for
	pub fn hooks(&self, settings: &EffectiveSettings) -> CdgResult<HookRegistry> {
		let mut registry = HookRegistry::new();
		crate::features::register_hooks(settings, &mut registry)?;
		Ok(registry)
	}

	/// Token to embed in the settings form of `section`
	pub fn issue_token(&self, auth: &AuthCtx, section: Section, now: Timestamp) -> CdgResult<Box<str>> {
		self.tokens.issue(&settings_action(section), &auth.user_id, now)
	}
}

pub type App = Arc<AppState>;

#[derive(Clone)]
pub struct AppBuilderOpts {
	/// Name of the option bucket holding the core settings
	pub settings_bucket: Box<str>,
	/// Name of the option bucket holding the dashboard feature settings
	pub feature_bucket: Box<str>,
	/// Secret for request tokens, at least 16 bytes
	pub token_secret: Option<Box<str>>,
	/// Request token lifetime in seconds
	pub token_lifetime: u64,
	/// Admin page slug used in redirects
	pub settings_page: Box<str>,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self {
			settings_bucket: DEFAULT_CORE_BUCKET.into(),
			feature_bucket: DEFAULT_FEATURE_BUCKET.into(),
			token_secret: None,
			token_lifetime: DEFAULT_TOKEN_LIFETIME,
			settings_page: DEFAULT_SETTINGS_PAGE.into(),
		}
	}
}

impl fmt::Debug for AppBuilderOpts {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AppBuilderOpts")
			.field("settings_bucket", &self.settings_bucket)
			.field("feature_bucket", &self.feature_bucket)
			.field("token_secret", &self.token_secret.as_ref().map(|_| "<redacted>"))
			.field("token_lifetime", &self.token_lifetime)
			.field("settings_page", &self.settings_page)
			.finish()
	}
}

impl AppBuilderOpts {
	/// Read options from `CDG_*` environment variables
	pub fn from_env() -> CdgResult<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CdgResult<Self> {
		let mut opts = Self::default();
		let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

		if let Some(bucket) = non_empty("CDG_SETTINGS_BUCKET") {
			opts.settings_bucket = bucket.trim().into();
		}
		if let Some(bucket) = non_empty("CDG_FEATURE_BUCKET") {
			opts.feature_bucket = bucket.trim().into();
		}
		if let Some(secret) = non_empty("CDG_TOKEN_SECRET") {
			opts.token_secret = Some(secret.into());
		}
		if let Some(lifetime) = non_empty("CDG_TOKEN_LIFETIME") {
			opts.token_lifetime = lifetime.trim().parse().map_err(|_| {
				Error::ConfigError(format!("CDG_TOKEN_LIFETIME is not a number: {}", lifetime))
			})?;
		}
		if let Some(page) = non_empty("CDG_SETTINGS_PAGE") {
			opts.settings_page = page.trim().into();
		}
		Ok(opts)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use cdg_core::settings::defaults_table;
	use cdg_types::option_adapter::MemoryOptionAdapter;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> =
			vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		move |name| vars.get(name).cloned()
	}

	#[test]
	fn test_opts_from_lookup() {
		let opts = AppBuilderOpts::from_lookup(lookup(&[
			("CDG_SETTINGS_BUCKET", " site_settings "),
			("CDG_FEATURE_BUCKET", "site_widgets"),
			("CDG_TOKEN_SECRET", "0123456789abcdef0123"),
			("CDG_TOKEN_LIFETIME", "3600"),
			("CDG_SETTINGS_PAGE", ""),
		]))
		.unwrap();

		assert_eq!(&*opts.settings_bucket, "site_settings");
		assert_eq!(&*opts.feature_bucket, "site_widgets");
		assert_eq!(opts.token_secret.as_deref(), Some("0123456789abcdef0123"));
		assert_eq!(opts.token_lifetime, 3600);
		assert_eq!(&*opts.settings_page, DEFAULT_SETTINGS_PAGE);
		assert!(!format!("{:?}", opts).contains("0123456789"));
	}

	#[test]
	fn test_opts_bad_lifetime() {
		let res = AppBuilderOpts::from_lookup(lookup(&[("CDG_TOKEN_LIFETIME", "a day")]));
		assert!(matches!(res, Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_app_requires_secret() {
		let res = AppState::new(
			AppBuilderOpts::default(),
			Arc::new(MemoryOptionAdapter::new()),
			defaults_table().unwrap(),
		);
		assert!(matches!(res, Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_app_settings_and_hooks() {
		let opts = AppBuilderOpts {
			token_secret: Some("0123456789abcdef0123".into()),
			..Default::default()
		};
		let app = AppState::new(opts, Arc::new(MemoryOptionAdapter::new()), defaults_table().unwrap())
			.unwrap();

		let store = app.settings();
		assert_eq!(store.buckets(), &BucketNames::new("cdg_core_settings", "quick_tools_settings"));
		let hooks = app.hooks(store.settings()).unwrap();
		assert!(!hooks.is_empty());

		let auth = AuthCtx::new("1", [cdg_types::types::CAP_MANAGE_OPTIONS]);
		let token = app.issue_token(&auth, Section::Admin, Timestamp(1_700_000_000)).unwrap();
		assert!(app.tokens.verify(
			&token,
			&settings_action(Section::Admin),
			"1",
			Timestamp(1_700_000_000)
		));
	}
}

// vim: ts=4
