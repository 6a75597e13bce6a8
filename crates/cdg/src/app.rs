//! App builder - configures and assembles the CDG admin application

use std::sync::Arc;

use crate::option_adapter::OptionAdapter;
use crate::prelude::*;
use crate::settings::{SettingsRegistry, register_settings};
pub use cdg_admin::app::{App, AppBuilderOpts, AppState, VERSION};

pub struct AppBuilder {
	opts: AppBuilderOpts,
	option_adapter: Option<Arc<dyn OptionAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A host embedding several apps may already have a subscriber
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.try_init();
		AppBuilder { opts: AppBuilderOpts::default(), option_adapter: None }
	}

	/// Start from options read from the environment
	pub fn from_env() -> CdgResult<Self> {
		let mut builder = Self::new();
		builder.opts = AppBuilderOpts::from_env()?;
		Ok(builder)
	}

	// Opts
	pub fn settings_bucket(&mut self, bucket: impl Into<Box<str>>) -> &mut Self {
		self.opts.settings_bucket = bucket.into();
		self
	}

	pub fn feature_bucket(&mut self, bucket: impl Into<Box<str>>) -> &mut Self {
		self.opts.feature_bucket = bucket.into();
		self
	}

	pub fn token_secret(&mut self, secret: impl Into<Box<str>>) -> &mut Self {
		self.opts.token_secret = Some(secret.into());
		self
	}

	pub fn token_lifetime(&mut self, seconds: u64) -> &mut Self {
		self.opts.token_lifetime = seconds;
		self
	}

	pub fn settings_page(&mut self, page: impl Into<Box<str>>) -> &mut Self {
		self.opts.settings_page = page.into();
		self
	}

	// Adapters
	pub fn option_adapter(&mut self, option_adapter: Arc<dyn OptionAdapter>) -> &mut Self {
		self.option_adapter = Some(option_adapter);
		self
	}

	pub fn build(&mut self) -> CdgResult<App> {
		info!("CDG V{}", VERSION);

		let Some(option_adapter) = self.option_adapter.clone() else {
			error!("FATAL: No option adapter configured");
			return Err(Error::ConfigError("No option adapter configured".into()));
		};
		if self.opts.settings_bucket.trim().is_empty() || self.opts.feature_bucket.trim().is_empty() {
			return Err(Error::ConfigError("settings bucket name is empty".into()));
		}

		let mut settings_registry = SettingsRegistry::new();
		register_settings(&mut settings_registry)?;
		info!("Registered {} settings", settings_registry.len());

		AppState::new(self.opts.clone(), option_adapter, settings_registry.freeze()).inspect_err(
			|err| error!("FATAL: {}", err),
		)
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::option_adapter::MemoryOptionAdapter;

	#[test]
	fn test_build_requires_adapter() {
		let res = AppBuilder::new().token_secret("0123456789abcdef0123").build();
		assert!(matches!(res, Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_build_requires_strong_secret() {
		let res = AppBuilder::new()
			.option_adapter(Arc::new(MemoryOptionAdapter::new()))
			.token_secret("short")
			.build();
		assert!(matches!(res, Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_build() {
		let app = AppBuilder::new()
			.option_adapter(Arc::new(MemoryOptionAdapter::new()))
			.token_secret("0123456789abcdef0123")
			.settings_bucket("site_options")
			.feature_bucket("site_widgets")
			.settings_page("site-settings")
			.token_lifetime(3600)
			.build()
			.unwrap();

		assert_eq!(&*app.opts.settings_bucket, "site_options");
		assert_eq!(app.tokens.lifetime(), 3600);
		assert_eq!(&*app.settings().buckets().core, "site_options");
		assert_eq!(&*app.settings().buckets().features, "site_widgets");
	}

	#[test]
	fn test_build_rejects_empty_feature_bucket() {
		let res = AppBuilder::new()
			.option_adapter(Arc::new(MemoryOptionAdapter::new()))
			.token_secret("0123456789abcdef0123")
			.feature_bucket(" ")
			.build();
		assert!(matches!(res, Err(Error::ConfigError(_))));
	}
}

// vim: ts=4
