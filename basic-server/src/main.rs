//! Minimal ipgate server
//!
//! Wires the admission gate in front of a small axum router. The tracking
//! store is SQLite when `TRACK_DB` is set, in-memory otherwise. Useful as a
//! wiring reference and for poking at the gate with curl.

use std::net::SocketAddr;
use std::sync::Arc;
use std::{env, path};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, Response};
use axum::middleware::{self, Next};
use axum::routing::get;
use axum::{Json, Router};

use ipgate::config::{EmptyAddrPolicy, GateOpts};
use ipgate::gate::GateLayer;
use ipgate::prelude::*;
use ipgate_track_adapter_mem::TrackAdapterMem;
use ipgate_track_adapter_sqlite::TrackAdapterSqlite;
use ipgate_types::track_adapter::{AuditEntry, BlockedAddr, ListAuditOptions, TrackAdapter};

pub struct Config {
	pub listen: String,
	pub db_file: Option<path::PathBuf>,
	pub seed_blocks: Vec<String>,
	pub gate_opts: GateOpts,
}

impl Config {
	fn from_env() -> Config {
		let empty_addr = match env::var("EMPTY_ADDR").ok().as_deref() {
			Some("reject") => EmptyAddrPolicy::Reject,
			_ => EmptyAddrPolicy::Audit,
		};
		let tolerate = matches!(
			env::var("TOLERATE_AUDIT_FAILURE").ok().as_deref(),
			Some("1") | Some("true")
		);

		Config {
			listen: env::var("LISTEN").unwrap_or("127.0.0.1:8080".to_string()),
			db_file: env::var("TRACK_DB").ok().map(path::PathBuf::from),
			seed_blocks: env::var("BLOCK")
				.map(|v| {
					v.split(',')
						.map(str::trim)
						.filter(|a| !a.is_empty())
						.map(String::from)
						.collect()
				})
				.unwrap_or_default(),
			gate_opts: GateOpts { empty_addr, tolerate_audit_failure: tolerate },
		}
	}
}

async fn get_index() -> &'static str {
	"ipgate basic server\n"
}

async fn get_whoami(addr: ClientAddr) -> Json<serde_json::Value> {
	Json(serde_json::json!({ "addr": addr.as_str() }))
}

async fn get_blocks(State(store): State<Arc<dyn TrackAdapter>>) -> IgResult<Json<Vec<BlockedAddr>>> {
	Ok(Json(store.list_blocks().await?))
}

async fn get_audits(State(store): State<Arc<dyn TrackAdapter>>) -> IgResult<Json<Vec<AuditEntry>>> {
	let opts = ListAuditOptions { limit: Some(100), ..Default::default() };
	Ok(Json(store.list_audits(&opts).await?))
}

async fn log_request(req: Request<Body>, next: Next) -> Response<Body> {
	let start = std::time::Instant::now();
	let peer_addr = req
		.extensions()
		.get::<ConnectInfo<SocketAddr>>()
		.map(|a| a.0.to_string())
		.unwrap_or("-".to_string());
	info!("REQ [{}] {} {}", &peer_addr, req.method(), req.uri().path());

	let res = next.run(req).await;

	let status = res.status();
	if status.is_client_error() || status.is_server_error() {
		warn!("RES: {} tm:{:?}", &status, start.elapsed().as_millis());
	} else {
		info!("RES: {} tm:{:?}", &status, start.elapsed().as_millis());
	}
	res
}

async fn run(config: Config) -> IgResult<()> {
	let store: Arc<dyn TrackAdapter> = match &config.db_file {
		Some(file) => Arc::new(TrackAdapterSqlite::new(file).await?),
		None => Arc::new(TrackAdapterMem::new()),
	};

	for addr in &config.seed_blocks {
		store.create_block(addr).await?;
		info!("Denylisted {}", addr);
	}

	// The request logger sits outside the gate so denied requests still show up
	let router = Router::new()
		.route("/", get(get_index))
		.route("/whoami", get(get_whoami))
		.route("/blocks", get(get_blocks))
		.route("/audits", get(get_audits))
		.layer(GateLayer::with_opts(store.clone(), config.gate_opts.clone()))
		.layer(middleware::from_fn(log_request))
		.with_state(store);

	let listener = tokio::net::TcpListener::bind(&config.listen).await?;
	info!("Listening on HTTP {}", &config.listen);
	axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>()).await?;

	Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	if let Err(err) = run(Config::from_env()).await {
		error!("FATAL: {}", err);
		std::process::exit(1);
	}
}

// vim: ts=4
