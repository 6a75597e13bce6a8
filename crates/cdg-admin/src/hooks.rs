//! Hook registry
//!
//! Named handlers are registered against host events with a priority. Firing
//! an event runs its handlers against the injected host adapter.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use cdg_types::host_adapter::HostAdapter;

use crate::prelude::*;

/// Native hook function type
pub type HookFunction = Arc<dyn Fn(&dyn HostAdapter) -> CdgResult<()> + Send + Sync>;

pub const DEFAULT_PRIORITY: i32 = 10;

/// Host events handlers can attach to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
	Init,
	AdminInit,
	DashboardSetup,
	SendHeaders,
	AdminHead,
	AdminFooter,
}

impl HookEvent {
	pub fn as_str(&self) -> &'static str {
		match self {
			HookEvent::Init => "init",
			HookEvent::AdminInit => "admin_init",
			HookEvent::DashboardSetup => "wp_dashboard_setup",
			HookEvent::SendHeaders => "send_headers",
			HookEvent::AdminHead => "admin_head",
			HookEvent::AdminFooter => "admin_footer_text",
		}
	}
}

struct RegisteredHook {
	name: Box<str>,
	priority: i32,
	function: HookFunction,
}

impl fmt::Debug for RegisteredHook {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RegisteredHook")
			.field("name", &self.name)
			.field("priority", &self.priority)
			.field("function", &"<function>")
			.finish()
	}
}

#[derive(Debug, Default)]
pub struct HookRegistry {
	hooks: HashMap<HookEvent, Vec<RegisteredHook>>,
}

impl HookRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a handler. Lower priorities run first; equal priorities run
	/// in registration order.
	pub fn register(
		&mut self,
		event: HookEvent,
		name: impl Into<Box<str>>,
		priority: i32,
		function: HookFunction,
	) {
		let name = name.into();
		debug!("Registering hook {} on {} (priority {})", name, event.as_str(), priority);
		let hooks = self.hooks.entry(event).or_default();
		let pos = hooks.partition_point(|h| h.priority <= priority);
		hooks.insert(pos, RegisteredHook { name, priority, function });
	}

	pub fn has_hook(&self, event: HookEvent, name: &str) -> bool {
		self.hooks.get(&event).is_some_and(|hooks| hooks.iter().any(|h| &*h.name == name))
	}

	/// Handler names of an event in execution order
	pub fn hook_names(&self, event: HookEvent) -> Vec<&str> {
		self.hooks
			.get(&event)
			.map(|hooks| hooks.iter().map(|h| &*h.name).collect())
			.unwrap_or_default()
	}

	pub fn len(&self) -> usize {
		self.hooks.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Run the handlers of `event`. Stops at the first failing handler.
	/// Returns the number of handlers run.
	pub fn fire(&self, event: HookEvent, host: &dyn HostAdapter) -> CdgResult<usize> {
		let Some(hooks) = self.hooks.get(&event) else {
			return Ok(0);
		};
		for hook in hooks {
			if let Err(err) = (hook.function)(host) {
				warn!("Hook {} on {} failed: {}", hook.name, event.as_str(), err);
				return Err(err);
			}
		}
		Ok(hooks.len())
	}
}


// vim: ts=4
