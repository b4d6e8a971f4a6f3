//! SQLite-backed tracking adapter.
//!
//! Stores the address denylist and the request audit log in a single SQLite
//! database with WAL journaling. Lookups use the default BINARY collation,
//! so address matching is exact and case sensitive.

use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool, SqliteRow};
use sqlx::Row;

use ipgate::prelude::*;
use ipgate::track_adapter::{AuditEntry, BlockedAddr, ListAuditOptions, TrackAdapter};

// Helper functions
//******************
fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

fn collect_res<T>(iter: impl Iterator<Item = Result<T, sqlx::Error>>) -> IgResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

fn map_audit(row: &SqliteRow) -> Result<AuditEntry, sqlx::Error> {
	Ok(AuditEntry {
		addr: ClientAddr(row.try_get("addr")?),
		timestamp: Timestamp(row.try_get("timestamp")?),
		path: row.try_get("path")?,
	})
}

#[derive(Debug)]
pub struct TrackAdapterSqlite {
	db: SqlitePool,
}

impl TrackAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> IgResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		init_db(&db).await.inspect_err(inspect).map_err(|_| Error::DbError)?;

		Ok(Self { db })
	}
}

#[async_trait]
impl TrackAdapter for TrackAdapterSqlite {
	// Gate operations
	//*****************
	async fn is_blocked(&self, addr: &str) -> IgResult<bool> {
		let res = sqlx::query("SELECT 1 FROM blocked_addrs WHERE addr = ?1")
			.bind(addr)
			.fetch_optional(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		Ok(res.is_some())
	}

	async fn create_audit(&self, entry: &AuditEntry) -> IgResult<()> {
		sqlx::query("INSERT INTO audit_log (addr, timestamp, path) VALUES (?1, ?2, ?3)")
			.bind(entry.addr.as_str())
			.bind(entry.timestamp.0)
			.bind(entry.path.as_ref())
			.execute(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		Ok(())
	}

	// Denylist management
	//*********************
	async fn create_block(&self, addr: &str) -> IgResult<()> {
		sqlx::query("INSERT OR IGNORE INTO blocked_addrs (addr, created_at) VALUES (?1, ?2)")
			.bind(addr)
			.bind(Timestamp::now().0)
			.execute(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		Ok(())
	}

	async fn delete_block(&self, addr: &str) -> IgResult<()> {
		let res = sqlx::query("DELETE FROM blocked_addrs WHERE addr = ?1")
			.bind(addr)
			.execute(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		if res.rows_affected() == 0 {
			return Err(Error::NotFound);
		}
		Ok(())
	}

	async fn list_blocks(&self) -> IgResult<Vec<BlockedAddr>> {
		let res = sqlx::query("SELECT addr, created_at FROM blocked_addrs ORDER BY addr")
			.fetch_all(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		collect_res(res.iter().map(|row| {
			Ok(BlockedAddr {
				addr: ClientAddr(row.try_get("addr")?),
				created_at: Timestamp(row.try_get("created_at")?),
			})
		}))
	}

	async fn list_audits(&self, opts: &ListAuditOptions<'_>) -> IgResult<Vec<AuditEntry>> {
		let mut query =
			sqlx::QueryBuilder::new("SELECT addr, timestamp, path FROM audit_log WHERE timestamp>=");
		query.push_bind(opts.since.unwrap_or(Timestamp(0)).0);

		if let Some(addr) = opts.addr {
			query.push(" AND addr=").push_bind(addr);
		}
		if let Some(path_prefix) = opts.path_prefix {
			query.push(" AND path LIKE ").push_bind(format!("{}%", path_prefix));
		}
		query.push(" ORDER BY log_id DESC");
		if let Some(limit) = opts.limit {
			query.push(" LIMIT ").push_bind(limit);
		}

		let res = query
			.build()
			.fetch_all(&self.db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;

		collect_res(res.iter().map(map_audit))
	}
}

async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Denylist //
	//////////////
	sqlx::query("CREATE TABLE IF NOT EXISTS blocked_addrs (
		addr text NOT NULL,
		created_at datetime DEFAULT (unixepoch()),
		PRIMARY KEY(addr)
	)").execute(&mut *tx).await?;

	// Audit log //
	///////////////
	sqlx::query("CREATE TABLE IF NOT EXISTS audit_log (
		log_id integer NOT NULL,
		addr text NOT NULL,
		timestamp datetime NOT NULL,
		path text NOT NULL,
		PRIMARY KEY(log_id)
	)").execute(&mut *tx).await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_audit_log_addr ON audit_log(addr, timestamp)")
		.execute(&mut *tx).await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
