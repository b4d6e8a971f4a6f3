pub use crate::config::{EmptyAddrPolicy, GateOpts};
pub use crate::error::{GateError, BLOCKED_BODY};
pub use crate::gate::GateLayer;
pub use ipgate_types::prelude::*;

// vim: ts=4
