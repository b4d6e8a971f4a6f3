pub use crate::error::{Error, IgResult};
pub use crate::types::{ClientAddr, Timestamp};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
