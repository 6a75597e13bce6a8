//! Markup filters for free-text settings

use regex::{Captures, Regex};

use crate::prelude::*;

use super::types::TextFormat;

const RICH_TAGS: &[&str] = &["a", "b", "strong", "em", "i", "br", "p", "span"];
const LINK_ATTRS: &[&str] = &["href", "title", "target", "rel"];
const BLOCKED_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:"];

fn compile(pattern: &str) -> CdgResult<Regex> {
	Regex::new(pattern).map_err(|e| Error::Internal(format!("text filter regex failed: {}", e)))
}

/// Compiled filters, built once per sanitizer
#[derive(Debug, Clone)]
pub struct TextFilter {
	script_style: Regex,
	comment: Regex,
	any_tag: Regex,
	tag: Regex,
	attr: Regex,
	whitespace: Regex,
}

impl TextFilter {
	pub fn new() -> CdgResult<Self> {
		Ok(Self {
			script_style: compile(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")?,
			comment: compile(r"(?s)<!--.*?-->")?,
			any_tag: compile(r"<[^>]*>")?,
			tag: compile(r"<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)([^>]*)>")?,
			attr: compile(r#"([a-zA-Z][a-zA-Z0-9_-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)?,
			whitespace: compile(r"\s+")?,
		})
	}

	pub fn apply(&self, format: TextFormat, input: &str) -> String {
		match format {
			TextFormat::Plain => self.plain(input),
			TextFormat::Rich => self.rich(input),
			TextFormat::StripAll => self.strip_all(input),
		}
	}

	/// Single line of text without markup
	pub fn plain(&self, input: &str) -> String {
		let stripped = self.strip_all(input);
		self.whitespace.replace_all(&stripped, " ").trim().to_string()
	}

	/// Remove every tag, dropping script and style bodies. Line breaks are kept.
	pub fn strip_all(&self, input: &str) -> String {
		let without_code = self.script_style.replace_all(input, "");
		let without_comments = self.comment.replace_all(&without_code, "");
		self.any_tag.replace_all(&without_comments, "").trim().to_string()
	}

	/// Keep a small set of inline tags; links keep only safe attributes
	pub fn rich(&self, input: &str) -> String {
		let without_code = self.script_style.replace_all(input, "");
		let without_comments = self.comment.replace_all(&without_code, "");
		self.tag
			.replace_all(&without_comments, |caps: &Captures<'_>| self.rebuild_tag(caps))
			.trim()
			.to_string()
	}

	fn rebuild_tag(&self, caps: &Captures<'_>) -> String {
		let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
		let name = caps.get(2).map(|m| m.as_str().to_ascii_lowercase()).unwrap_or_default();
		if !RICH_TAGS.iter().any(|t| *t == name) {
			return String::new();
		}
		if closing {
			return format!("</{}>", name);
		}
		if name != "a" {
			return format!("<{}>", name);
		}

		let raw_attrs = caps.get(3).map_or("", |m| m.as_str());
		let mut out = String::from("<a");
		for attr in self.attr.captures_iter(raw_attrs) {
			let attr_name =
				attr.get(1).map(|m| m.as_str().to_ascii_lowercase()).unwrap_or_default();
			if !LINK_ATTRS.iter().any(|a| *a == attr_name) {
				continue;
			}
			let value = attr
				.get(2)
				.or_else(|| attr.get(3))
				.or_else(|| attr.get(4))
				.map_or("", |m| m.as_str());
			if attr_name == "href" && has_blocked_scheme(value) {
				debug!("Dropping link with unsafe scheme");
				continue;
			}
			out.push_str(&format!(" {}=\"{}\"", attr_name, value.replace('"', "&quot;")));
		}
		out.push('>');
		out
	}
}

fn has_blocked_scheme(href: &str) -> bool {
	let normalized = href
		.chars()
		.filter(|c| !c.is_whitespace() && !c.is_control())
		.collect::<String>()
		.to_ascii_lowercase();
	BLOCKED_SCHEMES.iter().any(|scheme| normalized.starts_with(scheme))
}


// vim: ts=4
