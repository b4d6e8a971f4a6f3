//! Admission Gate Configuration
//!
//! Configuration types for the admission gate middleware.

/// What to do with a request whose client address cannot be resolved
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyAddrPolicy {
	/// Treat the request as not denylisted and audit it with an empty address
	#[default]
	Audit,
	/// Reject the request with 400 before any store access
	Reject,
}

/// Admission gate configuration
#[derive(Clone, Debug, Default)]
pub struct GateOpts {
	/// Handling of requests without a resolvable client address
	pub empty_addr: EmptyAddrPolicy,
	/// Forward requests whose audit write failed instead of answering 500
	pub tolerate_audit_failure: bool,
}

// vim: ts=4
