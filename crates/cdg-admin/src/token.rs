//! Request tokens for settings forms
//!
//! A token is an HMAC-SHA256 over `tick|action|user`, where the tick advances
//! every half lifetime. Tokens from the current and the previous tick verify,
//! so a token lives between one half and one full lifetime.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use cdg_core::Section;

use crate::prelude::*;

type HmacSha256 = Hmac<Sha256>;

/// Action a settings form token is bound to
pub fn settings_action(section: Section) -> String {
	format!("cdg_core_settings:{}", section)
}

#[derive(Clone)]
pub struct TokenIssuer {
	secret: Box<[u8]>,
	lifetime: u64,
}

impl std::fmt::Debug for TokenIssuer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenIssuer")
			.field("secret", &"<redacted>")
			.field("lifetime", &self.lifetime)
			.finish()
	}
}

impl TokenIssuer {
	pub const MIN_SECRET_LEN: usize = 16;

	pub fn new(secret: &[u8], lifetime: u64) -> CdgResult<Self> {
		if secret.len() < Self::MIN_SECRET_LEN {
			return Err(Error::ConfigError(format!(
				"token secret must be at least {} bytes",
				Self::MIN_SECRET_LEN
			)));
		}
		if lifetime < 2 {
			return Err(Error::ConfigError("token lifetime must be at least 2 seconds".into()));
		}
		Ok(Self { secret: secret.into(), lifetime })
	}

	pub fn lifetime(&self) -> u64 {
		self.lifetime
	}

	fn tick(&self, now: Timestamp) -> i64 {
		let half = i64::try_from(self.lifetime / 2).unwrap_or(i64::MAX);
		// ceil(now / half)
		now.0.div_euclid(half) + i64::from(now.0.rem_euclid(half) != 0)
	}

	fn mac(&self, tick: i64, action: &str, user: &str) -> CdgResult<HmacSha256> {
		let mut mac = HmacSha256::new_from_slice(&self.secret)
			.map_err(|e| Error::Internal(format!("HMAC init failed: {}", e)))?;
		mac.update(format!("{}|{}|{}", tick, action, user).as_bytes());
		Ok(mac)
	}

	/// Issue a token for `action` on behalf of `user`
	pub fn issue(&self, action: &str, user: &str, now: Timestamp) -> CdgResult<Box<str>> {
		let mac = self.mac(self.tick(now), action, user)?;
		Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()).into())
	}

	/// Check a submitted token. Malformed tokens simply fail to verify.
	pub fn verify(&self, token: &str, action: &str, user: &str, now: Timestamp) -> bool {
		let Ok(signature) = URL_SAFE_NO_PAD.decode(token.trim().as_bytes()) else {
			debug!("Token is not valid base64url");
			return false;
		};
		let tick = self.tick(now);
		[tick, tick - 1].into_iter().any(|t| {
			self.mac(t, action, user).is_ok_and(|mac| mac.verify_slice(&signature).is_ok())
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

	fn issuer() -> TokenIssuer {
		TokenIssuer::new(SECRET, 86_400).unwrap()
	}

	#[test]
	fn test_issue_and_verify() {
		let tokens = issuer();
		let now = Timestamp(1_700_000_000);
		let action = settings_action(Section::Security);
		let token = tokens.issue(&action, "1", now).unwrap();

		assert!(tokens.verify(&token, &action, "1", now));
		assert!(!tokens.verify(&token, &action, "2", now));
		assert!(!tokens.verify(&token, &settings_action(Section::Cleanup), "1", now));
		assert!(!tokens.verify("not a token!", &action, "1", now));
		assert!(!tokens.verify("", &action, "1", now));
	}

	#[test]
	fn test_token_window() {
		let tokens = issuer();
		let action = settings_action(Section::Features);
		// Tick boundary: the token is issued at the very start of a tick
		let issued = Timestamp(43_200 * 40_000 + 1);
		let token = tokens.issue(&action, "1", issued).unwrap();

		assert!(tokens.verify(&token, &action, "1", issued.add_seconds(43_199)));
		assert!(tokens.verify(&token, &action, "1", issued.add_seconds(43_200)));
		assert!(!tokens.verify(&token, &action, "1", issued.add_seconds(86_400)));
	}

	#[test]
	fn test_rejects_weak_config() {
		assert!(matches!(TokenIssuer::new(b"short", 86_400), Err(Error::ConfigError(_))));
		assert!(matches!(TokenIssuer::new(SECRET, 1), Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_debug_hides_secret() {
		let out = format!("{:?}", issuer());
		assert!(!out.contains("0123456789"));
	}
}

// vim: ts=4
