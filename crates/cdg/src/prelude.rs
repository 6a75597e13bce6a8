pub use cdg_types::prelude::*;

pub use crate::app::{App, AppBuilder};
pub use cdg_admin::hooks::HookEvent;
pub use cdg_core::{Section, keys};

// vim: ts=4
