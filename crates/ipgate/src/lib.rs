//! Request gating middleware for axum.
//!
//! Every incoming request is checked against an address denylist before it
//! reaches the application; admitted requests are recorded in an audit log
//! first, denylisted ones are answered with 403 and never reach either the
//! log or the application. The denylist and the log live behind the
//! [`TrackAdapter`] trait and are injected into the gate as an explicit
//! dependency.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod gate;
pub mod prelude;
pub mod resolver;

// Re-export commonly used types
pub use config::{EmptyAddrPolicy, GateOpts};
pub use error::{GateError, BLOCKED_BODY};
pub use gate::{GateLayer, GateService};
pub use ipgate_types::track_adapter::TrackAdapter;
pub use resolver::resolve_client_addr;

// vim: ts=4
