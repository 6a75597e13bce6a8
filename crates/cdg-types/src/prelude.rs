pub use crate::error::{CdgResult, Error};
pub use crate::types::{AuthCtx, Timestamp};
pub use tracing::{debug, error, info, warn};

// vim: ts=4
