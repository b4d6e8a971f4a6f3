//! Shared types, the tracking adapter trait, and error types for ipgate.
//!
//! This crate contains the foundational types that are shared between the
//! gate crate and all adapter implementations. Extracting these into a
//! separate crate allows adapter crates to compile without depending on the
//! middleware itself.

pub mod error;
pub mod extract;
pub mod prelude;
pub mod track_adapter;
pub mod types;

// vim: ts=4
