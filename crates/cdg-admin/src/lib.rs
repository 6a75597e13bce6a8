//! Admin layer for the CDG site administration toolkit.
//!
//! - **handler**: settings form submissions (capability, token, sanitize, save)
//! - **token**: time-windowed request tokens bound to a user and a form section
//! - **features**: hooks for the cleanup, security, performance and branding features
//! - **dashboard**: quick-add and documentation widget planning
//!
//! The host platform is reached only through `HostAdapter`.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod dashboard;
pub mod features;
pub mod handler;
pub mod hooks;
pub mod prelude;
pub mod token;

#[cfg(test)]
mod test_support;

pub use app::{App, AppBuilderOpts, AppState, VERSION};
pub use dashboard::{DashboardWidget, QuickAddEntry, QuickAddNotice, plan_dashboard, plan_page_notices};
pub use handler::{SettingsSubmission, SubmissionOutcome, handle_settings_submission};
pub use hooks::{HookEvent, HookFunction, HookRegistry};
pub use token::TokenIssuer;

// vim: ts=4
