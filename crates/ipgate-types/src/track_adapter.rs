//! Adapter that stores the address denylist and the request audit log.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;
use crate::types::serialize_timestamp_iso;

/// A single admitted-request record.
///
/// Entries are append-only: once written they are never updated or deleted
/// by the gate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
	/// Resolved client address, kept verbatim (may be empty)
	pub addr: ClientAddr,

	/// Time the entry was recorded, not the time the request arrived
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub timestamp: Timestamp,

	/// Request path without the query string
	pub path: Box<str>,
}

impl AuditEntry {
	/// Creates an entry for `addr` hitting `path`, stamped with the current time
	pub fn new(addr: ClientAddr, path: &str) -> AuditEntry {
		AuditEntry { addr, timestamp: Timestamp::now(), path: Box::from(path) }
	}
}

/// A denylist record as stored by the adapter
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedAddr {
	pub addr: ClientAddr,
	#[serde(serialize_with = "serialize_timestamp_iso")]
	pub created_at: Timestamp,
}

/// Options for listing audit log entries
#[derive(Debug, Default)]
pub struct ListAuditOptions<'a> {
	/// Exact address match
	pub addr: Option<&'a str>,
	/// Path prefix match
	pub path_prefix: Option<&'a str>,
	/// Only entries recorded at or after this time
	pub since: Option<Timestamp>,
	/// Maximum number of entries to return
	pub limit: Option<u32>,
}

/// An ipgate tracking adapter
///
/// Every `TrackAdapter` implementation is required to implement this trait.
/// A `TrackAdapter` owns the two data sets the admission gate works from:
/// the address denylist and the append-only audit log. The gate itself only
/// calls `is_blocked` and `create_audit`; the remaining operations exist for
/// the processes that maintain the denylist and read the log.
#[async_trait]
pub trait TrackAdapter: Debug + Send + Sync {
	/// Checks whether `addr` is on the denylist.
	///
	/// The match is exact and case sensitive on the stored text.
	async fn is_blocked(&self, addr: &str) -> IgResult<bool>;

	/// Appends one entry to the audit log.
	///
	/// The write is atomic: a failed insert leaves no partial entry behind.
	async fn create_audit(&self, entry: &AuditEntry) -> IgResult<()>;

	// Denylist management
	/// Puts `addr` on the denylist. Adding an address twice is not an error.
	async fn create_block(&self, addr: &str) -> IgResult<()>;

	/// Removes `addr` from the denylist. Fails with `NotFound` if it was not
	/// on the list.
	async fn delete_block(&self, addr: &str) -> IgResult<()>;

	/// Lists the denylist, ordered by address.
	async fn list_blocks(&self) -> IgResult<Vec<BlockedAddr>>;

	/// Lists audit log entries, newest first.
	async fn list_audits(&self, opts: &ListAuditOptions<'_>) -> IgResult<Vec<AuditEntry>>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_audit_entry_stamps_current_time() {
		let before = Timestamp::now();
		let entry = AuditEntry::new(ClientAddr::new("198.51.100.2"), "/home");
		let after = Timestamp::now();

		assert_eq!(entry.addr.as_str(), "198.51.100.2");
		assert_eq!(entry.path.as_ref(), "/home");
		assert!(entry.timestamp >= before && entry.timestamp <= after);
	}

	#[test]
	fn test_audit_entry_serialization() {
		let entry = AuditEntry {
			addr: ClientAddr::new("10.0.0.5"),
			timestamp: Timestamp(0),
			path: Box::from("/api/data"),
		};

		let json = serde_json::to_value(&entry).unwrap();
		assert_eq!(json["addr"], "10.0.0.5");
		assert_eq!(json["timestamp"], "1970-01-01T00:00:00Z");
		assert_eq!(json["path"], "/api/data");
	}

	#[test]
	fn test_blocked_addr_serialization() {
		let blocked = BlockedAddr { addr: ClientAddr::new("10.0.0.5"), created_at: Timestamp(0) };

		let json = serde_json::to_value(&blocked).unwrap();
		assert_eq!(json["addr"], "10.0.0.5");
		assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
	}
}

// vim: ts=4
