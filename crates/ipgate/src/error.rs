//! Admission Gate Error Types
//!
//! Error types for requests rejected by the admission gate.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use ipgate_types::error::Error;
use ipgate_types::types::ClientAddr;

/// Response body sent to denylisted clients
pub const BLOCKED_BODY: &str = "Your IP has been blocked.";

/// Gate rejection types
#[derive(Debug)]
pub enum GateError {
	/// Address is on the denylist
	Blocked {
		/// The denylisted address
		addr: ClientAddr,
	},
	/// No client address could be resolved and the gate is configured to reject
	AddrMissing,
	/// The tracking store failed during lookup or audit write
	Store(Error),
}

impl std::fmt::Display for GateError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			GateError::Blocked { addr } => write!(f, "Address {} is denylisted", addr),
			GateError::AddrMissing => write!(f, "No client address could be resolved"),
			GateError::Store(err) => write!(f, "Tracking store failed: {}", err),
		}
	}
}

impl std::error::Error for GateError {}

impl IntoResponse for GateError {
	fn into_response(self) -> Response {
		match self {
			// Plain text body, kept stable for clients that match on it
			GateError::Blocked { .. } => (StatusCode::FORBIDDEN, BLOCKED_BODY).into_response(),
			GateError::AddrMissing => {
				let body = serde_json::json!({
					"error": {
						"code": "E-ADDR-MISSING",
						"message": "No client address could be resolved for this request."
					}
				});
				(StatusCode::BAD_REQUEST, Json(body)).into_response()
			}
			GateError::Store(_) => {
				let body = serde_json::json!({
					"error": {
						"code": "E-TRACK-STORE",
						"message": "Internal tracking store error"
					}
				});
				(StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
			}
		}
	}
}

// vim: ts=4
