//! Pure translation of [`RequestDescriptor`] values into [`WireRequest`]s.
//!
//! Encoding never touches the network or the auth provider. The rules are:
//!
//! - `POST`/`PUT` payloads become a JSON body and set `Content-Type`.
//! - `GET`/`DELETE` payloads must be JSON objects; their scalar entries (integers, floats, strings,
//!   booleans) are appended to the query string in the payload's key order. Other entries are
//!   dropped.
//! - The cache directive may add `Cache-Control`.
//! - Caller headers are applied last and replace any header of the same name.

// crates.io
use http::{
	HeaderName, HeaderValue,
	header::{CACHE_CONTROL, CONTENT_TYPE},
};
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	obs,
	request::{Payload, RequestDescriptor},
	wire::WireRequest,
};

/// Encodes a descriptor into a wire request.
///
/// Fails with [`Error::BadUrl`] when the URL cannot be parsed or is not `http`/`https`, and with
/// [`Error::Serialization`] when the payload or a header cannot be represented on the wire.
pub fn encode(descriptor: &RequestDescriptor) -> Result<WireRequest> {
	let url = parse_url(descriptor.url())?;
	let method = descriptor.method();
	let mut request = WireRequest::new(method.into(), url);

	if let Some(payload) = descriptor.raw_payload() {
		let value = match payload {
			Payload::Json(value) => value,
			Payload::Invalid(reason) => {
				obs::log_payload_rejected(reason);

				return Err(Error::Serialization);
			},
		};

		if method.carries_body() {
			let body = serde_json::to_vec(value).map_err(|_| Error::Serialization)?;

			request.body = Some(body);
			request
				.headers
				.insert(CONTENT_TYPE, HeaderValue::from_static(descriptor.content_type().as_str()));
		} else {
			let object = value.as_object().ok_or(Error::Serialization)?;

			append_query(&mut request.url, object);
		}
	}
	if let Some(directive) = descriptor.cache().cache_control() {
		request.headers.insert(CACHE_CONTROL, HeaderValue::from_static(directive));
	}

	for (name, value) in descriptor.headers() {
		let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::Serialization)?;
		let value = HeaderValue::from_str(value).map_err(|_| Error::Serialization)?;

		request.headers.insert(name, value);
	}

	Ok(request)
}

/// Flattens a JSON scalar into its query-string form.
///
/// Returns `None` for null, arrays, and nested objects, which have no query representation.
pub fn query_value(value: &Value) -> Option<String> {
	match value {
		Value::Bool(flag) => Some(if *flag { "true" } else { "false" }.to_owned()),
		Value::Number(number) => Some(number.to_string()),
		Value::String(text) => Some(text.clone()),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}

fn parse_url(raw: &str) -> Result<Url> {
	let url = Url::parse(raw).map_err(|_| Error::BadUrl)?;

	match url.scheme() {
		"http" | "https" => Ok(url),
		_ => Err(Error::BadUrl),
	}
}

fn append_query(url: &mut Url, object: &Map<String, Value>) {
	let pairs = object
		.iter()
		.filter_map(|(key, value)| query_value(value).map(|value| (key.as_str(), value)))
		.collect::<Vec<_>>();

	if pairs.is_empty() {
		return;
	}

	url.query_pairs_mut().extend_pairs(pairs);
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::Method as HttpMethod;
	use serde_json::json;
	// self
	use super::*;
	use crate::request::{CacheDirective, Method};

	fn query_pairs(request: &WireRequest) -> Vec<(String, String)> {
		request.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()
	}

	#[test]
	fn malformed_urls_are_rejected() {
		for raw in ["", "not a url", "/relative/path", "ftp://files.example.com/a"] {
			let descriptor = RequestDescriptor::new(raw, Method::Get);

			assert_eq!(encode(&descriptor), Err(Error::BadUrl), "URL {raw:?} should be rejected.");
		}
	}

	#[test]
	fn post_payload_round_trips_through_json_body() {
		let payload = json!({
			"name": "widget",
			"tags": ["a", "b"],
			"dimensions": { "w": 1.5, "h": 2 },
			"active": true,
		});
		let descriptor =
			RequestDescriptor::builder("https://api.example.com/items", Method::Post)
				.payload(&payload)
				.build();
		let request = encode(&descriptor).expect("POST payload should encode.");
		let body = request.body.as_deref().expect("POST payload should produce a body.");
		let decoded: Value = serde_json::from_slice(body).expect("Body should be valid JSON.");

		assert_eq!(decoded, payload);
		assert_eq!(request.method, HttpMethod::POST);
		assert_eq!(request.header_str("content-type"), Some("application/json"));
		assert!(request.url.query().is_none());
	}

	#[test]
	fn put_accepts_non_object_payloads() {
		let descriptor = RequestDescriptor::builder("https://api.example.com/batch", Method::Put)
			.payload(&[1, 2, 3])
			.build();
		let request = encode(&descriptor).expect("Array payload should encode as a body.");

		assert_eq!(request.body.as_deref(), Some(b"[1,2,3]".as_slice()));
	}

	#[test]
	fn get_payload_flattens_supported_scalars() {
		let descriptor = RequestDescriptor::builder("https://api.example.com/search", Method::Get)
			.payload(&json!({
				"page": 2,
				"q": "rust lang",
				"exact": false,
				"ratio": 0.25,
				"missing": null,
				"tags": ["x"],
				"nested": { "k": "v" },
			}))
			.build();
		let request = encode(&descriptor).expect("GET payload should encode.");
		let mut pairs = query_pairs(&request);

		pairs.sort();

		assert_eq!(
			pairs,
			vec![
				("exact".to_owned(), "false".to_owned()),
				("page".to_owned(), "2".to_owned()),
				("q".to_owned(), "rust lang".to_owned()),
				("ratio".to_owned(), "0.25".to_owned()),
			],
		);
		assert!(request.body.is_none());
		assert!(request.headers.get(CONTENT_TYPE).is_none());
	}

	#[test]
	fn query_encoding_is_deterministic_and_keeps_existing_query() {
		let descriptor =
			RequestDescriptor::builder("https://api.example.com/items?limit=10", Method::Delete)
				.payload(&json!({ "force": true, "id": 7 }))
				.build();
		let first = encode(&descriptor).expect("DELETE payload should encode.");
		let second = encode(&descriptor).expect("DELETE payload should encode again.");

		assert_eq!(first.url.as_str(), second.url.as_str());
		assert_eq!(first.url.as_str(), "https://api.example.com/items?limit=10&force=true&id=7");
	}

	#[test]
	fn get_payload_must_be_an_object() {
		let descriptor = RequestDescriptor::builder("https://api.example.com/search", Method::Get)
			.payload("just a string")
			.build();

		assert_eq!(encode(&descriptor), Err(Error::Serialization));
	}

	#[test]
	fn unsupported_only_payload_leaves_url_untouched() {
		let descriptor = RequestDescriptor::builder("https://api.example.com/search", Method::Get)
			.payload(&json!({ "filters": [] }))
			.build();
		let request = encode(&descriptor).expect("Payload with dropped entries should encode.");

		assert_eq!(request.url.as_str(), "https://api.example.com/search");
	}

	#[test]
	fn caller_headers_override_defaults() {
		let descriptor = RequestDescriptor::builder("https://api.example.com/items", Method::Post)
			.payload(&json!({ "a": 1 }))
			.header("Content-Type", "application/vnd.api+json")
			.header("X-Request-Id", "abc-123")
			.build();
		let request = encode(&descriptor).expect("Descriptor with headers should encode.");

		assert_eq!(request.header_str("content-type"), Some("application/vnd.api+json"));
		assert_eq!(request.header_str("x-request-id"), Some("abc-123"));
		assert_eq!(request.header_str("cache-control"), Some("no-cache"));
	}

	#[test]
	fn protocol_cache_policy_adds_no_header() {
		let descriptor = RequestDescriptor::builder("https://api.example.com", Method::Get)
			.cache(CacheDirective::UseProtocolPolicy)
			.build();
		let request = encode(&descriptor).expect("Descriptor should encode.");

		assert!(request.headers.get(CACHE_CONTROL).is_none());
	}

	#[test]
	fn unserializable_payload_is_a_serialization_failure() {
		let payload = BTreeMap::from([((1, 2), "tuple keys have no JSON form")]);
		let descriptor = RequestDescriptor::builder("https://api.example.com/items", Method::Post)
			.payload(&payload)
			.build();

		assert_eq!(encode(&descriptor), Err(Error::Serialization));
	}

	#[test]
	fn invalid_header_is_a_serialization_failure() {
		let descriptor = RequestDescriptor::builder("https://api.example.com", Method::Get)
			.header("bad header", "value")
			.build();

		assert_eq!(encode(&descriptor), Err(Error::Serialization));
	}
}
