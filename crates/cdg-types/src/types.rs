//! Common value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Capability required to change any setting
pub const CAP_MANAGE_OPTIONS: &str = "manage_options";

/// Unix timestamp in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Self {
		Timestamp(chrono::Utc::now().timestamp())
	}

	pub fn add_seconds(self, seconds: i64) -> Self {
		Timestamp(self.0.saturating_add(seconds))
	}
}

impl fmt::Display for Timestamp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Context struct for an authenticated admin session
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub user_id: Box<str>,
	pub capabilities: Box<[Box<str>]>,
}

impl AuthCtx {
	pub fn new<S: Into<Box<str>>>(
		user_id: impl Into<Box<str>>,
		capabilities: impl IntoIterator<Item = S>,
	) -> Self {
		Self {
			user_id: user_id.into(),
			capabilities: capabilities.into_iter().map(Into::into).collect(),
		}
	}

	/// Check whether the session holds a capability
	pub fn can(&self, capability: &str) -> bool {
		self.capabilities.iter().any(|c| c.as_ref() == capability)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_auth_ctx_can() {
		let auth = AuthCtx::new("7", ["edit_posts", CAP_MANAGE_OPTIONS]);
		assert!(auth.can(CAP_MANAGE_OPTIONS));
		assert!(!auth.can("delete_users"));

		let editor = AuthCtx::new("8", ["edit_posts"]);
		assert!(!editor.can(CAP_MANAGE_OPTIONS));
	}

	#[test]
	fn test_timestamp_add() {
		assert_eq!(Timestamp(10).add_seconds(5), Timestamp(15));
		assert_eq!(Timestamp(i64::MAX).add_seconds(1), Timestamp(i64::MAX));
	}
}

// vim: ts=4
