//! CDG is a site administration toolkit for content-managed sites.
//!
//! # Features
//!
//! - Layered settings
//!     - one persisted bucket merged over a static defaults table
//!     - section-scoped form updates that never touch other sections
//!     - stored values from older releases coerced on load
//! - Quick-add widgets
//!     - legacy and structured placement data normalized to one shape
//!     - routing to the main dashboard or to named admin pages
//! - Hardening and cleanup features expressed as host directives

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

// Re-export shared types and adapter traits from cdg-types
pub use cdg_types::error;
pub use cdg_types::host_adapter;
pub use cdg_types::option_adapter;
pub use cdg_types::types;

// Feature crate re-exports
pub use cdg_admin as admin;
pub use cdg_core::placement;
pub use cdg_core::settings;

// Local modules
pub mod app;
pub mod prelude;

pub use app::{App, AppBuilder, AppBuilderOpts, AppState, VERSION};

// vim: ts=4
