use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type IgResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	DbError,
	ValidationError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "Not found"),
			Error::DbError => write!(f, "Database error"),
			Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
			Error::Internal(msg) => write!(f, "Internal error: {}", msg),
			Error::Io(err) => write!(f, "I/O error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		match self {
			Error::NotFound => {
				let body = serde_json::json!({
					"error": {
						"code": "E-NOT-FOUND",
						"message": "Resource not found"
					}
				});
				(StatusCode::NOT_FOUND, Json(body)).into_response()
			}
			Error::ValidationError(msg) => {
				let body = serde_json::json!({
					"error": {
						"code": "E-VALIDATION",
						"message": msg
					}
				});
				(StatusCode::BAD_REQUEST, Json(body)).into_response()
			}
			// Details of internal failures stay in the logs
			_ => {
				let body = serde_json::json!({
					"error": {
						"code": "E-INTERNAL",
						"message": "Internal server error"
					}
				});
				(StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
			}
		}
	}
}

// vim: ts=4
