pub use cdg_types::prelude::*;

// vim: ts=4
