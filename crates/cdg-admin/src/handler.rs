//! Settings form submission handler

use serde::Serialize;

use cdg_core::{FormPayload, Section};
use cdg_types::types::CAP_MANAGE_OPTIONS;

use crate::app::App;
use crate::prelude::*;
use crate::token::settings_action;

/// Form field carrying the submitted tab
pub const TAB_FIELD: &str = "cdg_core_tab";
/// Form field carrying the request token
pub const TOKEN_FIELD: &str = "cdg_core_nonce";

const DEFAULT_TAB: &str = "features";

/// A settings form post, split into routing fields and setting fields
#[derive(Debug, Clone)]
pub struct SettingsSubmission {
	pub section: Box<str>,
	pub token: Box<str>,
	pub payload: FormPayload,
}

impl SettingsSubmission {
	pub fn from_payload(payload: FormPayload) -> Self {
		let field = |name: &str| payload.get(name).and_then(|v| v.as_single()).map(str::trim);
		let section = field(TAB_FIELD).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_TAB).into();
		let token = field(TOKEN_FIELD).unwrap_or_default().into();
		Self { section, token, payload }
	}

	pub fn from_urlencoded(body: &str) -> CdgResult<Self> {
		Ok(Self::from_payload(FormPayload::from_urlencoded(body)?))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionOutcome {
	pub section: Section,
	/// Whether the storage layer accepted the write
	pub saved: bool,
	pub redirect: Box<str>,
}

/// Validate, sanitize and persist one section of the settings form.
///
/// Only keys of the submitted section are touched. A rejected write still
/// yields an outcome, with `saved` false.
pub fn handle_settings_submission(
	app: &App,
	auth: &AuthCtx,
	submission: &SettingsSubmission,
	now: Timestamp,
) -> CdgResult<SubmissionOutcome> {
	if !auth.can(CAP_MANAGE_OPTIONS) {
		warn!("User {} may not change settings", auth.user_id);
		return Err(Error::PermissionDenied);
	}

	let section: Section = submission.section.parse()?;

	if !app.tokens.verify(&submission.token, &settings_action(section), &auth.user_id, now) {
		warn!("Rejected settings submission for {} from user {}: bad token", section, auth.user_id);
		return Err(Error::Unauthorized);
	}

	let overrides = app.sanitizer.sanitize(section, &submission.payload);
	let mut store = app.settings();
	let saved = store.update(overrides);
	if saved {
		info!("Settings section {} saved by user {}", section, auth.user_id);
	}

	let redirect = format!(
		"options-general.php?page={}&tab={}&settings-updated={}",
		app.opts.settings_page, section, saved
	)
	.into();
	Ok(SubmissionOutcome { section, saved, redirect })
}


// vim: ts=4
