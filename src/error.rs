//! Dispatcher-level error types shared across encoding, transport, and auth recovery.

// self
use crate::_prelude::*;

/// Dispatcher-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Closed set of failures a dispatch can end with.
///
/// Every [`Outcome`](crate::dispatch::Outcome) that is not a success carries exactly one of these
/// variants. Untyped failures never escape the dispatcher: transport errors are flattened into
/// [`Error::Transport`] and foreign provider errors into [`Error::Unknown`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Error {
	/// The target URL could not be parsed or does not use an HTTP scheme.
	#[error("Request URL is invalid.")]
	BadUrl,
	/// The payload or a header could not be serialized onto the wire.
	#[error("Request could not be serialized.")]
	Serialization,
	/// The exchange completed without a usable HTTP response.
	#[error("Server returned an unusable response.")]
	BadResponse,
	/// The server rejected the credential (HTTP 401 or 403).
	#[error("Request was rejected as unauthenticated.")]
	Unauthenticated,
	/// The server answered with a non-success status other than 401/403.
	#[error("Server responded with status code {code}.")]
	BadStatusCode {
		/// HTTP status code, preserved exactly.
		code: u16,
	},
	/// DNS, connection, TLS, or timeout failure.
	#[error("Transport failed: {description}.")]
	Transport {
		/// Human-readable description reported by the transport.
		description: String,
	},
	/// The dispatcher requires an auth provider but none was configured.
	#[error("No auth provider is configured.")]
	NoAuthConfigured,
	/// Failure that does not fit any other variant.
	#[error("Unknown dispatch failure.")]
	Unknown,
}
impl From<TransportError> for Error {
	fn from(e: TransportError) -> Self {
		match e {
			TransportError::Network { source } => Self::Transport { description: source.to_string() },
			TransportError::MalformedResponse { .. } => Self::BadResponse,
		}
	}
}

/// Configuration failures raised while constructing a dispatcher.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures reported by [`HttpTransport`](crate::transport::HttpTransport) implementations.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while executing the request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The exchange finished but the response could not be read as HTTP.
	#[error("Response could not be decoded.")]
	MalformedResponse {
		/// Transport-specific decoding error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a transport-specific response decoding error.
	pub fn malformed(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::MalformedResponse { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_decode() { Self::malformed(e) } else { Self::network(e) }
	}
}

/// Failures reported by [`AuthProvider::refresh_credential`](crate::auth::AuthProvider).
#[derive(Debug, ThisError)]
pub enum RefreshError {
	/// The provider already classified the failure; it is surfaced unchanged.
	#[error(transparent)]
	Dispatch(#[from] Error),
	/// Provider-specific failure; surfaced to callers as [`Error::Unknown`].
	#[error("Auth provider failed to refresh the credential.")]
	Provider {
		/// Provider-specific error.
		#[source]
		source: BoxError,
	},
}
impl RefreshError {
	/// Wraps a provider-specific error.
	pub fn provider(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Provider { source: Box::new(src) }
	}

	/// Collapses the refresh failure into the closed dispatch taxonomy.
	pub fn into_dispatch_error(self) -> Error {
		match self {
			Self::Dispatch(e) => e,
			Self::Provider { .. } => Error::Unknown,
		}
	}
}
