//! Client Address Resolution
//!
//! Resolves the client address of a request from the `X-Forwarded-For`
//! header, with the transport peer address as fallback.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use hyper::Request;

use ipgate_types::types::ClientAddr;

/// Resolve the client address of a request.
///
/// The first (leftmost) element of the `X-Forwarded-For` header wins,
/// trimmed but otherwise verbatim; the header is trusted unconditionally.
/// Without it the transport peer address from `ConnectInfo` is used.
/// Returns an empty address when neither source is available.
pub fn resolve_client_addr<B>(req: &Request<B>) -> ClientAddr {
	if let Some(forwarded) = resolve_from_xff(req) {
		return forwarded;
	}
	match req.extensions().get::<ConnectInfo<SocketAddr>>() {
		Some(ci) => ClientAddr::from(ci.0.ip()),
		None => ClientAddr::empty(),
	}
}

/// Take the first element of the X-Forwarded-For list.
///
/// No IP parsing happens here: the element is kept as-is after trimming,
/// and one that trims down to nothing still counts as resolved. Only a
/// missing, empty or non-ASCII header falls through to the peer address.
fn resolve_from_xff<B>(req: &Request<B>) -> Option<ClientAddr> {
	req.headers()
		.get("x-forwarded-for")
		.and_then(|h| h.to_str().ok())
		.filter(|s| !s.is_empty())
		.and_then(|s| s.split(',').next())
		.map(|addr| ClientAddr::new(addr.trim()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::net::{IpAddr, Ipv4Addr};

	fn peer(ip: [u8; 4], port: u16) -> ConnectInfo<SocketAddr> {
		ConnectInfo(SocketAddr::new(IpAddr::V4(Ipv4Addr::from(ip)), port))
	}

	#[test]
	fn test_xff_first_element_wins() {
		let req = Request::builder()
			.uri("/home")
			.header("x-forwarded-for", "198.51.100.2, 203.0.113.9, 10.0.0.1")
			.body(())
			.unwrap();

		assert_eq!(resolve_client_addr(&req).as_str(), "198.51.100.2");
	}

	#[test]
	fn test_xff_element_is_trimmed() {
		let req = Request::builder()
			.uri("/")
			.header("x-forwarded-for", "  203.0.113.7  , 10.0.0.1")
			.body(())
			.unwrap();

		assert_eq!(resolve_client_addr(&req).as_str(), "203.0.113.7");
	}

	#[test]
	fn test_xff_overrides_peer() {
		let req = Request::builder()
			.uri("/")
			.header("x-forwarded-for", "198.51.100.2")
			.extension(peer([203, 0, 113, 9], 4711))
			.body(())
			.unwrap();

		assert_eq!(resolve_client_addr(&req).as_str(), "198.51.100.2");
	}

	#[test]
	fn test_peer_fallback_drops_port() {
		let req =
			Request::builder().uri("/").extension(peer([10, 0, 0, 5], 443)).body(()).unwrap();

		assert_eq!(resolve_client_addr(&req).as_str(), "10.0.0.5");
	}

	#[test]
	fn test_empty_header_falls_back_to_peer() {
		let req = Request::builder()
			.uri("/")
			.header("x-forwarded-for", "")
			.extension(peer([10, 0, 0, 5], 443))
			.body(())
			.unwrap();

		assert_eq!(resolve_client_addr(&req).as_str(), "10.0.0.5");
	}

	#[test]
	fn test_non_ascii_header_treated_as_absent() {
		let value = axum::http::HeaderValue::from_bytes(b"\xc3\xa9vil, 10.0.0.1").unwrap();
		let mut req =
			Request::builder().uri("/").extension(peer([10, 0, 0, 5], 443)).body(()).unwrap();
		req.headers_mut().insert("x-forwarded-for", value);

		assert_eq!(resolve_client_addr(&req).as_str(), "10.0.0.5");
	}

	#[test]
	fn test_no_source_resolves_empty() {
		let req = Request::builder().uri("/").body(()).unwrap();

		assert!(resolve_client_addr(&req).is_empty());
	}

	#[test]
	fn test_xff_is_not_validated() {
		let req = Request::builder()
			.uri("/")
			.header("x-forwarded-for", "not-an-ip, 10.0.0.1")
			.body(())
			.unwrap();

		assert_eq!(resolve_client_addr(&req).as_str(), "not-an-ip");
	}

	#[test]
	fn test_xff_blank_first_element_resolves_empty() {
		// A non-empty header whose first element trims to nothing still
		// counts as a resolution, it does not fall back to the peer
		let req = Request::builder()
			.uri("/")
			.header("x-forwarded-for", "  , 10.0.0.1")
			.extension(peer([10, 0, 0, 5], 443))
			.body(())
			.unwrap();

		assert!(resolve_client_addr(&req).is_empty());
	}
}

// vim: ts=4
