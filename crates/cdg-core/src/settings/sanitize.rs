//! Section-scoped sanitizer
//!
//! Turns a submitted form into a typed override set for exactly one section.
//! Only the section's own keys are read from the payload, and every one of
//! them is present in the result, so an unchecked box is recorded as `false`.

use std::sync::Arc;

use crate::placement::{ContentTypeAssignment, Location, Placement};
use crate::prelude::*;

use super::defaults::keys;
use super::form::{FormPayload, FormValue};
use super::store::OverrideSet;
use super::text::TextFilter;
use super::types::{
	FrozenSettingsRegistry, Section, SettingDefinition, SettingKind, SettingValue, choice_allows,
};

/// Older form field names still accepted for a key
const FORM_ALIASES: &[(&str, &str)] = &[(keys::SELECTED_CPTS, "cpt_config")];

fn form_field<'a>(payload: &'a FormPayload, key: &str) -> Option<&'a FormValue> {
	payload.get(key).or_else(|| {
		FORM_ALIASES
			.iter()
			.filter(|(canonical, _)| *canonical == key)
			.find_map(|(_, alias)| payload.get(alias))
	})
}

#[derive(Debug, Clone)]
pub struct SectionSanitizer {
	registry: Arc<FrozenSettingsRegistry>,
	filter: TextFilter,
}

impl SectionSanitizer {
	pub fn new(registry: Arc<FrozenSettingsRegistry>) -> CdgResult<Self> {
		Ok(Self { registry, filter: TextFilter::new()? })
	}

	pub fn filter(&self) -> &TextFilter {
		&self.filter
	}

	/// Produce the override set for `section`
	pub fn sanitize(&self, section: Section, payload: &FormPayload) -> OverrideSet {
		let mut overrides = OverrideSet::new();
		for def in self.registry.list_by_section(section) {
			let value = self.sanitize_field(def, form_field(payload, &def.key));
			overrides.insert(def.key.clone(), value);
		}
		debug!("Sanitized {} fields for section {}", overrides.len(), section);
		overrides
	}

	fn sanitize_field(&self, def: &SettingDefinition, raw: Option<&FormValue>) -> SettingValue {
		match &def.kind {
			SettingKind::Flag => SettingValue::Bool(raw.is_some()),
			SettingKind::Integer { min, max } => match raw.and_then(FormValue::as_single) {
				Some(s) => SettingValue::Int(parse_leading_int(s).clamp(*min, *max)),
				None => def.default.clone(),
			},
			SettingKind::Choice(allowed) => match raw.and_then(FormValue::as_single) {
				Some(s) if choice_allows(allowed, s.trim()) => SettingValue::String(s.trim().to_string()),
				Some(s) => {
					debug!("Invalid value '{}' for {}, using default", s, def.key);
					def.default.clone()
				}
				None => def.default.clone(),
			},
			SettingKind::Text(format) => match raw.and_then(FormValue::as_single) {
				Some(s) => SettingValue::String(self.filter.apply(*format, s)),
				None => def.default.clone(),
			},
			SettingKind::List => SettingValue::List(raw.map(|v| self.list(v)).unwrap_or_default()),
			SettingKind::Placement => {
				let map = raw.map(|v| self.placement(v)).unwrap_or_default();
				SettingValue::Json(map.to_json())
			}
		}
	}

	/// Submitted array or newline separated text
	fn list(&self, raw: &FormValue) -> Vec<String> {
		let lines: Vec<&str> = match raw {
			FormValue::Single(s) => s.lines().collect(),
			FormValue::Multi(items) => items.iter().map(String::as_str).collect(),
			FormValue::Nested(map) => map.values().filter_map(FormValue::as_single).collect(),
		};
		lines.into_iter().map(|line| self.filter.plain(line)).filter(|s| !s.is_empty()).collect()
	}

	/// Checkbox list (`selected_cpts[]=blog`) or per-type records
	/// (`selected_cpts[blog][enabled]=1&selected_cpts[blog][location]=page`).
	/// A record is kept only when its `enabled` field is set.
	fn placement(&self, raw: &FormValue) -> ContentTypeAssignment {
		let mut map = ContentTypeAssignment::new();
		match raw {
			FormValue::Single(slug) => self.add_slug(&mut map, slug),
			FormValue::Multi(slugs) => {
				for slug in slugs {
					self.add_slug(&mut map, slug);
				}
			}
			FormValue::Nested(entries) => {
				for (key, entry) in entries {
					match entry {
						FormValue::Nested(fields) => {
							let enabled = fields.get("enabled").and_then(FormValue::as_single).is_some_and(|s| {
								let s = s.trim();
								!s.is_empty() && s != "0"
							});
							let slug = sanitize_key(key);
							if !enabled || slug.is_empty() {
								continue;
							}
							let location = fields
								.get("location")
								.and_then(FormValue::as_single)
								.map(|s| Location::from(self.filter.plain(s).as_str()))
								.unwrap_or_default();
							map.insert(slug, Placement::new(location));
						}
						other => {
							if let Some(slug) = other.as_single() {
								self.add_slug(&mut map, slug);
							}
						}
					}
				}
			}
		}
		map
	}

	fn add_slug(&self, map: &mut ContentTypeAssignment, slug: &str) {
		let slug = sanitize_key(slug);
		if !slug.is_empty() {
			map.insert(slug, Placement::dashboard());
		}
	}
}

/// Lowercase identifier of `[a-z0-9_-]` characters
fn sanitize_key(raw: &str) -> String {
	raw.chars()
		.map(|c| c.to_ascii_lowercase())
		.filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
		.collect()
}

/// Leading integer of a submitted value: "12px" is 12, "abc" is 0
fn parse_leading_int(raw: &str) -> i64 {
	let s = raw.trim();
	let (negative, digits) = match s.as_bytes().first() {
		Some(b'-') => (true, &s[1..]),
		Some(b'+') => (false, &s[1..]),
		_ => (false, s),
	};
	let mut value: i64 = 0;
	for c in digits.chars().take_while(char::is_ascii_digit) {
		let digit = i64::from(c.to_digit(10).unwrap_or(0));
		value = value.saturating_mul(10).saturating_add(digit);
	}
	if negative { -value } else { value }
}


// vim: ts=4
