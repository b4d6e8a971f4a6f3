//! Axum extractor for the resolved client address.
//!
//! Provides a `FromRequestParts` implementation for `ClientAddr` so handlers
//! running behind the gate can take the resolved address as an argument.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::Error;
use crate::types::ClientAddr;

impl<S> FromRequestParts<S> for ClientAddr
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(addr) = parts.extensions.get::<ClientAddr>().cloned() {
			Ok(addr)
		} else {
			// The gate inserts the address; reaching this means it is not installed
			Err(Error::Internal("client address not resolved".to_string()))
		}
	}
}


// vim: ts=4
