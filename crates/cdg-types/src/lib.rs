//! Shared types, adapter traits, and core utilities for the CDG toolkit.
//!
//! This crate contains the foundational types shared between the settings core,
//! the admin layer and every storage adapter. Adapters depend only on this crate,
//! never on the feature crates.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod error;
pub mod host_adapter;
pub mod option_adapter;
pub mod prelude;
pub mod types;

// vim: ts=4
