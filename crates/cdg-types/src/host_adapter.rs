//! Adapter to the host content-management platform.
//!
//! The settings core never talks to the host directly. The admin layer asks
//! the host for the current screen, registered content types and post counts,
//! and hands it `Directive`s describing side effects the host must perform.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::prelude::*;

/// A registered content type as reported by the host
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentTypeInfo {
	pub slug: Box<str>,
	pub singular_label: Box<str>,
	pub plural_label: Box<str>,
	/// Capability needed to create items of this type
	pub create_capability: Box<str>,
	pub menu_icon: Option<Box<str>>,
}

/// Published/draft counts for a content type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCounts {
	pub published: u64,
	pub draft: u64,
}

/// Links the host prints into the public page head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadLink {
	Generator,
	WlwManifest,
	Rsd,
	Shortlink,
	AdjacentPosts,
	OEmbed,
	RestApi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeartbeatContext {
	Admin,
	Frontend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeartbeatPolicy {
	/// Leave the host behaviour untouched
	Default,
	/// Poll every N seconds
	Interval(u32),
	Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorMode {
	Default,
	/// Drop block editor assets on pages without blocks
	Optimize,
	/// Use the classic editor everywhere
	Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionPolicy {
	Unlimited,
	Disabled,
	Limited(u32),
}

/// Replacement labels for a renamed content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTypeLabels {
	pub plural: Box<str>,
	pub singular: Box<str>,
	pub menu: Box<str>,
	pub icon: Box<str>,
}

/// A side effect requested from the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
	RemoveHeadLink(HeadLink),
	DisableEmojis,
	RemoveDashboardWidget(Box<str>),
	RemoveWelcomePanel,
	Heartbeat { context: HeartbeatContext, policy: HeartbeatPolicy, skip_in_builder: bool },
	DisableXmlRpc,
	BlockUploadExtensions(Box<[Box<str>]>),
	RemoveResponseHeader(Box<str>),
	SetResponseHeader { name: Box<str>, value: Box<str> },
	DisableCodeEditor,
	AllowSvgUploads { admin_only: bool },
	DisableComments,
	UnregisterContentType(Box<str>),
	RelabelContentType { slug: Box<str>, labels: ContentTypeLabels },
	EnablePageAttributes(Box<str>),
	EditorMode(EditorMode),
	OptimizeSearch,
	OptimizeArchives,
	EnableLazyLoading,
	RemoveImageSize(Box<str>),
	RemoveDnsPrefetch,
	Revisions(RevisionPolicy),
	FormCompatibility { manual_pages: Option<Box<[Box<str>]>>, keep_heartbeat: bool },
	AdminFooterText(Box<str>),
	AdminCss(Box<str>),
}

pub trait HostAdapter: Send + Sync {
	/// Slug of the admin page being rendered, `None` on screens without one
	fn current_page(&self) -> Option<Box<str>>;

	/// Look up a registered content type
	fn content_type(&self, slug: &str) -> Option<ContentTypeInfo>;

	/// Capability check for the current user
	fn user_can(&self, capability: &str) -> bool;

	fn count_posts(&self, slug: &str) -> PostCounts;

	/// Perform a side effect
	fn apply(&self, directive: &Directive) -> CdgResult<()>;
}

// vim: ts=4
