//! Wire-ready requests produced by the encoder and consumed by transports and auth providers.

// crates.io
use http::{HeaderMap, HeaderName, HeaderValue, Method as HttpMethod};
// self
use crate::_prelude::*;

/// Fully encoded HTTP request.
///
/// Unlike [`RequestDescriptor`](crate::request::RequestDescriptor), a wire request is a plain
/// value that auth providers may rewrite (typically by setting `Authorization`). The coordinator
/// keeps its own copy so a refreshed request can be re-sent without encoding again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireRequest {
	/// HTTP method.
	pub method: HttpMethod,
	/// Absolute target URL, including any encoded query.
	pub url: Url,
	/// Outgoing headers.
	pub headers: HeaderMap,
	/// Encoded body, if any.
	pub body: Option<Vec<u8>>,
}
impl WireRequest {
	/// Creates a body-less request with no headers.
	pub fn new(method: HttpMethod, url: Url) -> Self {
		Self { method, url, headers: HeaderMap::new(), body: None }
	}

	/// Sets (or replaces) a header.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Returns the header value as a string, if present and valid UTF-8.
	pub fn header_str(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}
