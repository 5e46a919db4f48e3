//! Transport primitives: one HTTP exchange per call, classified into an [`Outcome`].
//!
//! The module exposes [`HttpTransport`] so downstream crates (and tests) can plug in any HTTP
//! stack, plus [`TransportExecutor`], which wraps a transport and applies [`classify`]. The
//! executor is the only layer that looks at status codes; everything above it reasons about
//! [`Error`] variants.

// self
use crate::{_prelude::*, dispatch::Outcome, error::TransportError, obs, wire::WireRequest};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<RawResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of performing a single exchange.
///
/// Implementations must not retry, follow auth flows, or interpret status codes. They return the
/// status and body as received, or a [`TransportError`] when no response was obtained.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Performs exactly one HTTP exchange.
	fn execute(&self, request: WireRequest) -> TransportFuture<'_>;
}

/// Status line and body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
	/// HTTP status code as reported by the transport.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Creates a response from a status + body pair.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Maps a completed exchange onto the dispatcher's closed outcome set.
///
/// - `200..=299` yields the body unchanged.
/// - `401` and `403` yield [`Error::Unauthenticated`].
/// - Codes outside `100..=599` yield [`Error::BadResponse`].
/// - Anything else yields [`Error::BadStatusCode`].
pub fn classify(response: RawResponse) -> Outcome {
	match response.status {
		200..=299 => Ok(response.body),
		401 | 403 => Err(Error::Unauthenticated),
		code @ 100..=599 => Err(Error::BadStatusCode { code }),
		_ => Err(Error::BadResponse),
	}
}

/// Executes wire requests through an [`HttpTransport`] and classifies the results.
pub struct TransportExecutor<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	debug_logging: bool,
}
impl<T> TransportExecutor<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps a shared transport.
	pub fn new(transport: impl Into<Arc<T>>, debug_logging: bool) -> Self {
		Self { transport: transport.into(), debug_logging }
	}

	/// Returns the shared transport handle.
	pub fn transport(&self) -> &Arc<T> {
		&self.transport
	}

	/// Performs one exchange and classifies the outcome.
	pub async fn execute(&self, request: WireRequest) -> Outcome {
		if self.debug_logging {
			obs::log_request(&request);
		}

		let method = request.method.clone();
		let url = request.url.clone();
		let outcome = match self.transport.execute(request).await {
			Ok(response) => classify(response),
			Err(e) => Err(Error::from(e)),
		};

		if self.debug_logging {
			obs::log_outcome(&method, &url, &outcome);
		}

		outcome
	}
}
impl<T> Clone for TransportExecutor<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { transport: Arc::clone(&self.transport), debug_logging: self.debug_logging }
	}
}
impl<T> Debug for TransportExecutor<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TransportExecutor").field("debug_logging", &self.debug_logging).finish()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The client is built once and reused for every request; its overall request timeout is fixed at
/// construction.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a client with the provided overall request timeout.
	pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: WireRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let WireRequest { method, url, headers, body } = request;
			let mut builder = self.0.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}
