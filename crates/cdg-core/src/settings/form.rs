//! Submitted form payloads
//!
//! Field names follow the host's bracket convention: `name` is a single value,
//! `name[]` appends to a list and `name[a][b]` builds a nested map.

use std::collections::BTreeMap;

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
	Single(String),
	Multi(Vec<String>),
	Nested(BTreeMap<String, FormValue>),
}

impl FormValue {
	/// Scalar view. Lists yield their last item.
	pub fn as_single(&self) -> Option<&str> {
		match self {
			FormValue::Single(s) => Some(s),
			FormValue::Multi(items) => items.last().map(String::as_str),
			FormValue::Nested(_) => None,
		}
	}

	pub fn as_nested(&self) -> Option<&BTreeMap<String, FormValue>> {
		match self {
			FormValue::Nested(map) => Some(map),
			_ => None,
		}
	}

	fn insert(&mut self, path: &[String], value: String) {
		match path.split_first() {
			None => *self = FormValue::Single(value),
			Some((head, rest)) if head.is_empty() && rest.is_empty() => match self {
				FormValue::Multi(items) => items.push(value),
				_ => *self = FormValue::Multi(vec![value]),
			},
			Some((head, rest)) => {
				if !matches!(self, FormValue::Nested(_)) {
					*self = FormValue::Nested(BTreeMap::new());
				}
				if let FormValue::Nested(map) = self {
					// `name[][x]` appends a new element
					let key = if head.is_empty() { map.len().to_string() } else { head.clone() };
					map.entry(key)
						.or_insert_with(|| FormValue::Nested(BTreeMap::new()))
						.insert(rest, value);
				}
			}
		}
	}
}

/// Split `base[a][b]` into `base` and its bracket segments
fn parse_name(name: &str) -> (&str, Vec<String>) {
	let Some(open) = name.find('[') else {
		return (name, Vec::new());
	};
	let (base, brackets) = name.split_at(open);
	if base.is_empty() || !brackets.ends_with(']') {
		return (name, Vec::new());
	}

	let inner = &brackets[1..brackets.len() - 1];
	let segments: Vec<String> = inner.split("][").map(str::to_string).collect();
	if segments.iter().any(|s| s.contains('[') || s.contains(']')) {
		return (name, Vec::new());
	}
	(base, segments)
}

/// Decoded form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
	fields: BTreeMap<String, FormValue>,
}

impl FormPayload {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a payload from raw name/value pairs in submission order
	pub fn from_pairs<I, K, V>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let mut payload = Self::new();
		for (name, value) in pairs {
			payload.push(name.as_ref(), value.into());
		}
		payload
	}

	/// Decode an `application/x-www-form-urlencoded` body
	pub fn from_urlencoded(body: &str) -> CdgResult<Self> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(body)
			.map_err(|e| Error::ValidationError(format!("Invalid form body: {}", e)))?;
		Ok(Self::from_pairs(pairs))
	}

	/// Add one submitted field
	pub fn push(&mut self, name: &str, value: String) {
		let (base, path) = parse_name(name);
		let entry = self
			.fields
			.entry(base.to_string())
			.or_insert_with(|| FormValue::Single(String::new()));
		entry.insert(&path, value);
	}

	pub fn get(&self, name: &str) -> Option<&FormValue> {
		self.fields.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}


// vim: ts=4
