//! In-memory tracking adapter.
//!
//! Keeps the denylist and the audit log in process memory. Useful for tests
//! and for single-binary deployments that can live without a durable audit
//! trail.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use ipgate::prelude::*;
use ipgate::track_adapter::{AuditEntry, BlockedAddr, ListAuditOptions, TrackAdapter};

#[derive(Debug, Default)]
pub struct TrackAdapterMem {
	blocks: RwLock<HashMap<Box<str>, Timestamp>>,
	audits: RwLock<Vec<AuditEntry>>,
}

impl TrackAdapterMem {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl TrackAdapter for TrackAdapterMem {
	async fn is_blocked(&self, addr: &str) -> IgResult<bool> {
		Ok(self.blocks.read().contains_key(addr))
	}

	async fn create_audit(&self, entry: &AuditEntry) -> IgResult<()> {
		self.audits.write().push(entry.clone());
		Ok(())
	}

	async fn create_block(&self, addr: &str) -> IgResult<()> {
		// Keeps the original created_at when the address is already listed
		self.blocks.write().entry(Box::from(addr)).or_insert_with(Timestamp::now);
		Ok(())
	}

	async fn delete_block(&self, addr: &str) -> IgResult<()> {
		match self.blocks.write().remove(addr) {
			Some(_) => Ok(()),
			None => Err(Error::NotFound),
		}
	}

	async fn list_blocks(&self) -> IgResult<Vec<BlockedAddr>> {
		let mut list: Vec<BlockedAddr> = self
			.blocks
			.read()
			.iter()
			.map(|(addr, created_at)| BlockedAddr {
				addr: ClientAddr(addr.clone()),
				created_at: *created_at,
			})
			.collect();
		list.sort_by(|a, b| a.addr.as_str().cmp(b.addr.as_str()));
		Ok(list)
	}

	async fn list_audits(&self, opts: &ListAuditOptions<'_>) -> IgResult<Vec<AuditEntry>> {
		let mut list: Vec<AuditEntry> = self
			.audits
			.read()
			.iter()
			.rev()
			.filter(|entry| opts.addr.is_none_or(|addr| entry.addr.as_str() == addr))
			.filter(|entry| opts.path_prefix.is_none_or(|prefix| entry.path.starts_with(prefix)))
			.filter(|entry| opts.since.is_none_or(|since| entry.timestamp >= since))
			.cloned()
			.collect();
		if let Some(limit) = opts.limit {
			list.truncate(limit as usize);
		}
		Ok(list)
	}
}

// vim: ts=4
