//! Tracking adapter CRUD tests
//!
//! Tests denylist management and audit log operations against a temporary
//! SQLite database.

use ipgate::error::Error;
use ipgate::track_adapter::{AuditEntry, ListAuditOptions, TrackAdapter};
use ipgate::types::{ClientAddr, Timestamp};
use ipgate_track_adapter_sqlite::TrackAdapterSqlite;
use tempfile::TempDir;

async fn create_test_adapter() -> (TrackAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");

	let adapter = TrackAdapterSqlite::new(temp_dir.path().join("track.db"))
		.await
		.expect("Failed to create adapter");

	(adapter, temp_dir)
}

#[tokio::test]
async fn test_block_and_unblock() {
	let (adapter, _temp) = create_test_adapter().await;

	assert!(!adapter.is_blocked("10.0.0.5").await.unwrap());

	adapter.create_block("10.0.0.5").await.unwrap();
	assert!(adapter.is_blocked("10.0.0.5").await.unwrap());

	adapter.delete_block("10.0.0.5").await.unwrap();
	assert!(!adapter.is_blocked("10.0.0.5").await.unwrap());
}

#[tokio::test]
async fn test_lookup_is_exact_and_case_sensitive() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.create_block("10.0.0.5").await.unwrap();
	adapter.create_block("Proxy-A").await.unwrap();

	assert!(adapter.is_blocked("10.0.0.5").await.unwrap());
	assert!(!adapter.is_blocked("10.0.0.50").await.unwrap());
	assert!(!adapter.is_blocked("10.0.0.5 ").await.unwrap());
	assert!(adapter.is_blocked("Proxy-A").await.unwrap());
	assert!(!adapter.is_blocked("proxy-a").await.unwrap());
}

#[tokio::test]
async fn test_create_block_is_idempotent() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.create_block("10.0.0.5").await.unwrap();
	adapter.create_block("10.0.0.5").await.unwrap();

	let blocks = adapter.list_blocks().await.unwrap();
	assert_eq!(blocks.len(), 1);
	assert_eq!(blocks[0].addr.as_str(), "10.0.0.5");
}

#[tokio::test]
async fn test_delete_unknown_block_errors() {
	let (adapter, _temp) = create_test_adapter().await;

	let res = adapter.delete_block("203.0.113.1").await;
	assert!(matches!(res, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_list_blocks_sorted() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.create_block("203.0.113.9").await.unwrap();
	adapter.create_block("10.0.0.5").await.unwrap();
	adapter.create_block("198.51.100.2").await.unwrap();

	let blocks = adapter.list_blocks().await.unwrap();
	let addrs: Vec<&str> = blocks.iter().map(|b| b.addr.as_str()).collect();
	assert_eq!(addrs, ["10.0.0.5", "198.51.100.2", "203.0.113.9"]);
	assert!(blocks[0].created_at.0 > 0);
}

#[tokio::test]
async fn test_create_audit_and_list() {
	let (adapter, _temp) = create_test_adapter().await;

	let entry = AuditEntry::new(ClientAddr::new("198.51.100.2"), "/home");
	adapter.create_audit(&entry).await.unwrap();

	let audits = adapter.list_audits(&ListAuditOptions::default()).await.unwrap();
	assert_eq!(audits.len(), 1);
	assert_eq!(audits[0].addr.as_str(), "198.51.100.2");
	assert_eq!(audits[0].path.as_ref(), "/home");
	assert_eq!(audits[0].timestamp, entry.timestamp);
}

#[tokio::test]
async fn test_audit_log_newest_first() {
	let (adapter, _temp) = create_test_adapter().await;

	for (addr, path) in [("10.0.0.1", "/a"), ("10.0.0.2", "/b"), ("10.0.0.3", "/c")] {
		adapter.create_audit(&AuditEntry::new(ClientAddr::new(addr), path)).await.unwrap();
	}

	let audits = adapter.list_audits(&ListAuditOptions::default()).await.unwrap();
	let paths: Vec<&str> = audits.iter().map(|e| e.path.as_ref()).collect();
	assert_eq!(paths, ["/c", "/b", "/a"]);
}

#[tokio::test]
async fn test_list_audits_filters() {
	let (adapter, _temp) = create_test_adapter().await;

	let entries = [
		("10.0.0.1", 100, "/api/data"),
		("10.0.0.2", 200, "/api/users"),
		("10.0.0.1", 300, "/home"),
	];
	for (addr, ts, path) in entries {
		let entry = AuditEntry {
			addr: ClientAddr::new(addr),
			timestamp: Timestamp(ts),
			path: Box::from(path),
		};
		adapter.create_audit(&entry).await.unwrap();
	}

	let by_addr = adapter
		.list_audits(&ListAuditOptions { addr: Some("10.0.0.1"), ..Default::default() })
		.await
		.unwrap();
	assert_eq!(by_addr.len(), 2);

	let by_prefix = adapter
		.list_audits(&ListAuditOptions { path_prefix: Some("/api/"), ..Default::default() })
		.await
		.unwrap();
	assert_eq!(by_prefix.len(), 2);

	let since = adapter
		.list_audits(&ListAuditOptions { since: Some(Timestamp(200)), ..Default::default() })
		.await
		.unwrap();
	assert_eq!(since.len(), 2);

	let limited = adapter
		.list_audits(&ListAuditOptions { limit: Some(1), ..Default::default() })
		.await
		.unwrap();
	assert_eq!(limited.len(), 1);
	assert_eq!(limited[0].path.as_ref(), "/home");
}

#[tokio::test]
async fn test_empty_addr_roundtrip() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.create_audit(&AuditEntry::new(ClientAddr::empty(), "/health")).await.unwrap();

	let audits = adapter
		.list_audits(&ListAuditOptions { addr: Some(""), ..Default::default() })
		.await
		.unwrap();
	assert_eq!(audits.len(), 1);
	assert!(audits[0].addr.is_empty());
}

#[tokio::test]
async fn test_data_survives_reopen() {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let db_file = temp_dir.path().join("track.db");

	{
		let adapter =
			TrackAdapterSqlite::new(&db_file).await.expect("Failed to create adapter");
		adapter.create_block("10.0.0.5").await.unwrap();
		adapter.create_audit(&AuditEntry::new(ClientAddr::new("10.0.0.7"), "/a")).await.unwrap();
	}

	let adapter = TrackAdapterSqlite::new(&db_file).await.expect("Failed to reopen adapter");
	assert!(adapter.is_blocked("10.0.0.5").await.unwrap());
	assert_eq!(adapter.list_audits(&ListAuditOptions::default()).await.unwrap().len(), 1);
}
