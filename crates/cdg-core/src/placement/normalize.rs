//! Legacy placement normalization

use serde_json::Value;

use crate::prelude::*;
use crate::settings::SettingValue;

use super::{ContentTypeAssignment, Location, Placement};

/// Convert a stored `selected_cpts` value into the canonical map.
///
/// Entries are processed in encounter order and a later entry for the same
/// slug replaces an earlier one. A plain string entry is a legacy slug placed
/// on the dashboard; a record keeps its own key. Entries that fit neither
/// shape are dropped. Canonical input is returned unchanged.
pub fn normalize(raw: &Value) -> ContentTypeAssignment {
	let mut map = ContentTypeAssignment::new();
	match raw {
		Value::Array(items) => {
			for (index, item) in items.iter().enumerate() {
				normalize_entry(&mut map, &index.to_string(), item);
			}
		}
		Value::Object(entries) => {
			for (key, item) in entries {
				normalize_entry(&mut map, key, item);
			}
		}
		Value::Null => {}
		other => warn!("Unrecognized placement data, ignoring: {}", other),
	}
	map
}

/// Normalize the effective value of the placement setting
pub fn normalize_setting(value: &SettingValue) -> ContentTypeAssignment {
	match value {
		SettingValue::Json(raw) => normalize(raw),
		SettingValue::List(_) => normalize(&value.to_json()),
		other => {
			warn!("Placement setting holds a {}, ignoring", other.type_name());
			ContentTypeAssignment::new()
		}
	}
}

fn normalize_entry(map: &mut ContentTypeAssignment, key: &str, item: &Value) {
	match item {
		Value::String(slug) => {
			let slug = slug.trim();
			if slug.is_empty() {
				warn!("Dropping empty placement entry at '{}'", key);
				return;
			}
			map.insert(slug, Placement::dashboard());
		}
		Value::Object(record) => {
			if key.is_empty() {
				warn!("Dropping placement record without a content type");
				return;
			}
			let location = match record.get("location") {
				None | Some(Value::Null) => Location::Dashboard,
				Some(Value::String(location)) => Location::from(location.as_str()),
				Some(other) => {
					warn!("Dropping placement of '{}': bad location {}", key, other);
					return;
				}
			};
			let extra = record
				.iter()
				.filter(|(k, _)| k.as_str() != "location")
				.map(|(k, v)| (k.clone(), v.clone()))
				.collect();
			map.insert(key, Placement { location, extra });
		}
		other => warn!("Dropping placement entry '{}': unexpected {}", key, other),
	}
}


// vim: ts=4
