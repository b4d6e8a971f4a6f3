//! Admission Gate Middleware
//!
//! Tower middleware layer that checks every request against the address
//! denylist and records admitted requests in the audit log before they are
//! forwarded.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use futures::future::BoxFuture;
use hyper::Request;
use tower::{Layer, Service};

use ipgate_types::prelude::*;
use ipgate_types::track_adapter::{AuditEntry, TrackAdapter};

use crate::config::{EmptyAddrPolicy, GateOpts};
use crate::error::GateError;
use crate::resolver::resolve_client_addr;

/// Admission gate middleware layer
#[derive(Clone)]
pub struct GateLayer {
	store: Arc<dyn TrackAdapter>,
	opts: GateOpts,
}

impl GateLayer {
	/// Create a gate layer with default options
	pub fn new(store: Arc<dyn TrackAdapter>) -> Self {
		Self { store, opts: GateOpts::default() }
	}

	/// Create a gate layer with explicit options
	pub fn with_opts(store: Arc<dyn TrackAdapter>, opts: GateOpts) -> Self {
		Self { store, opts }
	}
}

impl<S> Layer<S> for GateLayer {
	type Service = GateService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		GateService { inner, store: self.store.clone(), opts: self.opts.clone() }
	}
}

/// Admission gate middleware service
///
/// Per request: resolve the client address, answer 403 if it is denylisted,
/// otherwise append an audit entry and forward. Denylisted requests are
/// never audited, and the audit write completes before the inner service
/// runs. The resolved address is inserted into the request extensions for
/// downstream extractors.
#[derive(Clone)]
pub struct GateService<S> {
	inner: S,
	store: Arc<dyn TrackAdapter>,
	opts: GateOpts,
}

impl<S> Service<Request<Body>> for GateService<S>
where
	S: Service<Request<Body>, Response = axum::response::Response> + Clone + Send + 'static,
	S::Future: Send + 'static,
{
	type Response = S::Response;
	type Error = S::Error;
	type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, mut req: Request<Body>) -> Self::Future {
		let store = self.store.clone();
		let opts = self.opts.clone();
		let mut inner = self.inner.clone();

		Box::pin(async move {
			let addr = resolve_client_addr(&req);

			if addr.is_empty() && opts.empty_addr == EmptyAddrPolicy::Reject {
				warn!("GATE [-] rejected, no client address: {}", req.uri().path());
				return Ok(GateError::AddrMissing.into_response());
			}

			match store.is_blocked(addr.as_str()).await {
				Ok(true) => {
					warn!("GATE [{}] blocked: {}", addr, req.uri().path());
					return Ok(GateError::Blocked { addr }.into_response());
				}
				Ok(false) => (),
				Err(err) => {
					error!("GATE [{}] denylist lookup failed: {}", addr, err);
					return Ok(GateError::Store(err).into_response());
				}
			}

			// Audit before forwarding; denylisted requests never get this far
			let entry = AuditEntry::new(addr.clone(), req.uri().path());
			if let Err(err) = store.create_audit(&entry).await {
				if opts.tolerate_audit_failure {
					warn!("GATE [{}] audit write failed, forwarding anyway: {}", addr, err);
				} else {
					error!("GATE [{}] audit write failed: {}", addr, err);
					return Ok(GateError::Store(err).into_response());
				}
			}

			debug!("GATE [{}] admitted: {}", addr, req.uri().path());
			req.extensions_mut().insert(addr);
			inner.call(req).await
		})
	}
}

// vim: ts=4
