//! Immutable request descriptors describing one logical HTTP call.

mod builder;

pub use builder::*;

// crates.io
use http::Method as HttpMethod;
use serde_json::Value;
// self
use crate::_prelude::*;

/// HTTP methods supported by the dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
	/// `GET`; payloads are flattened into the query string.
	Get,
	/// `PUT`; payloads are sent as a JSON body.
	Put,
	/// `POST`; payloads are sent as a JSON body.
	Post,
	/// `DELETE`; payloads are flattened into the query string.
	Delete,
}
impl Method {
	/// Returns the method token as it appears on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Put => "PUT",
			Method::Post => "POST",
			Method::Delete => "DELETE",
		}
	}

	/// Whether a payload travels in the body (as opposed to the query string).
	pub const fn carries_body(self) -> bool {
		matches!(self, Method::Put | Method::Post)
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<Method> for HttpMethod {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => HttpMethod::GET,
			Method::Put => HttpMethod::PUT,
			Method::Post => HttpMethod::POST,
			Method::Delete => HttpMethod::DELETE,
		}
	}
}

/// Body encodings the dispatcher knows how to produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
	/// `application/json`.
	#[default]
	Json,
}
impl ContentType {
	/// Returns the MIME type used for the `Content-Type` header.
	pub const fn as_str(self) -> &'static str {
		match self {
			ContentType::Json => "application/json",
		}
	}
}
impl Display for ContentType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Caching behavior requested for a single call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheDirective {
	/// Bypass any cached response (`Cache-Control: no-cache`).
	#[default]
	ReloadIgnoringLocalCache,
	/// Leave caching to the standard HTTP semantics; no header is added.
	UseProtocolPolicy,
}
impl CacheDirective {
	/// Returns the `Cache-Control` value to send, if any.
	pub const fn cache_control(self) -> Option<&'static str> {
		match self {
			CacheDirective::ReloadIgnoringLocalCache => Some("no-cache"),
			CacheDirective::UseProtocolPolicy => None,
		}
	}
}

/// Payload captured as JSON when the descriptor is built.
///
/// Serialization happens eagerly so the descriptor stays a plain value; a failure keeps the
/// serializer's message, which the encoder logs before reporting [`Error::Serialization`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Payload {
	Json(Value),
	Invalid(String),
}

/// Immutable description of one HTTP call.
///
/// Construct via [`RequestDescriptor::new`] or [`RequestDescriptor::builder`]. Fields are
/// read-only once built; encoding produces a separate [`WireRequest`](crate::wire::WireRequest).
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
	url: String,
	method: Method,
	payload: Option<Payload>,
	headers: BTreeMap<String, String>,
	content_type: ContentType,
	cache: CacheDirective,
}
impl RequestDescriptor {
	/// Creates a payload-less descriptor with default headers and cache directive.
	pub fn new(url: impl Into<String>, method: Method) -> Self {
		RequestDescriptorBuilder::new(url, method).build()
	}

	/// Starts a builder for the provided URL + method pair.
	pub fn builder(url: impl Into<String>, method: Method) -> RequestDescriptorBuilder {
		RequestDescriptorBuilder::new(url, method)
	}

	/// Target URL exactly as supplied.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// HTTP method.
	pub fn method(&self) -> Method {
		self.method
	}

	/// Payload as JSON, if one was supplied and serialized successfully.
	pub fn payload(&self) -> Option<&Value> {
		match self.payload.as_ref()? {
			Payload::Json(value) => Some(value),
			Payload::Invalid(_) => None,
		}
	}

	/// Whether any payload (valid or not) was supplied.
	pub fn has_payload(&self) -> bool {
		self.payload.is_some()
	}

	/// Caller-supplied headers.
	pub fn headers(&self) -> &BTreeMap<String, String> {
		&self.headers
	}

	/// Body encoding.
	pub fn content_type(&self) -> ContentType {
		self.content_type
	}

	/// Cache directive.
	pub fn cache(&self) -> CacheDirective {
		self.cache
	}

	pub(crate) fn raw_payload(&self) -> Option<&Payload> {
		self.payload.as_ref()
	}
}
