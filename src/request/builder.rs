// self
use crate::{
	_prelude::*,
	request::{CacheDirective, ContentType, Method, Payload, RequestDescriptor},
};

/// Builder for [`RequestDescriptor`] values.
#[derive(Debug)]
pub struct RequestDescriptorBuilder {
	url: String,
	method: Method,
	payload: Option<Payload>,
	headers: BTreeMap<String, String>,
	content_type: ContentType,
	cache: CacheDirective,
}
impl RequestDescriptorBuilder {
	/// Creates a new builder seeded with the provided URL + method.
	pub fn new(url: impl Into<String>, method: Method) -> Self {
		Self {
			url: url.into(),
			method,
			payload: None,
			headers: BTreeMap::new(),
			content_type: ContentType::default(),
			cache: CacheDirective::default(),
		}
	}

	/// Attaches a payload, serializing it to JSON immediately.
	///
	/// A serialization failure is not reported here; the encoder turns it into
	/// [`Error::Serialization`].
	pub fn payload<T>(mut self, payload: &T) -> Self
	where
		T: ?Sized + Serialize,
	{
		self.payload = Some(match serde_json::to_value(payload) {
			Ok(value) => Payload::Json(value),
			Err(e) => Payload::Invalid(e.to_string()),
		});

		self
	}

	/// Adds a single header. A later call with the same name replaces the earlier value.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.insert(name.into(), value.into());

		self
	}

	/// Adds multiple headers.
	pub fn headers<I, K, V>(mut self, headers: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (name, value) in headers.into_iter() {
			self.headers.insert(name.into(), value.into());
		}

		self
	}

	/// Overrides the body encoding.
	pub fn content_type(mut self, content_type: ContentType) -> Self {
		self.content_type = content_type;

		self
	}

	/// Overrides the cache directive.
	pub fn cache(mut self, cache: CacheDirective) -> Self {
		self.cache = cache;

		self
	}

	/// Consumes the builder.
	pub fn build(self) -> RequestDescriptor {
		RequestDescriptor {
			url: self.url,
			method: self.method,
			payload: self.payload,
			headers: self.headers,
			content_type: self.content_type,
			cache: self.cache,
		}
	}
}
