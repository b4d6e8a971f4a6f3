//! Core data types shared between the gate and the adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Timestamp //
//***********//
/// Unix timestamp in seconds
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		Timestamp(Utc::now().timestamp())
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Serialize a timestamp as an ISO-8601 string
pub fn serialize_timestamp_iso<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
	S: serde::Serializer,
{
	match DateTime::<Utc>::from_timestamp(ts.0, 0) {
		Some(dt) => {
			serializer.serialize_str(&dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
		}
		None => serializer.serialize_i64(ts.0),
	}
}

// ClientAddr //
//************//
/// Textual client address as resolved from a request.
///
/// Deliberately permissive: whatever the forwarding header carried is kept
/// verbatim, whether or not it parses as an IP address. May be empty when
/// the request had no resolvable source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ClientAddr(pub Box<str>);

impl ClientAddr {
	pub fn new(addr: &str) -> ClientAddr {
		ClientAddr(Box::from(addr))
	}

	pub fn empty() -> ClientAddr {
		ClientAddr(Box::from(""))
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for ClientAddr {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<std::net::IpAddr> for ClientAddr {
	fn from(ip: std::net::IpAddr) -> Self {
		ClientAddr(ip.to_string().into_boxed_str())
	}
}

impl From<&str> for ClientAddr {
	fn from(addr: &str) -> Self {
		ClientAddr(Box::from(addr))
	}
}


// vim: ts=4
