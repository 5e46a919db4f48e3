//! Auth provider contracts and the refresh-and-retry coordinator.

pub mod bearer;
pub mod coordinator;

mod metrics;

pub use bearer::*;
pub use coordinator::*;
pub use metrics::AuthMetrics;

// self
use crate::{_prelude::*, error::RefreshError, wire::WireRequest};

/// Boxed future returned by [`AuthProvider::refresh_credential`].
pub type RefreshFuture<'a> =
	Pin<Box<dyn Future<Output = Result<WireRequest, RefreshError>> + 'a + Send>>;

/// Pluggable source of request credentials.
///
/// The dispatcher calls [`attach_credential`](AuthProvider::attach_credential) before every
/// first attempt, and [`refresh_credential`](AuthProvider::refresh_credential) at most once per
/// dispatch after the server rejected the credential.
///
/// Under [`RefreshPolicy::Coalesce`] the coordinator decides whether a rejected caller must
/// refresh by attaching the credential again and comparing the result with the rejected request.
/// Implementations used with that policy must therefore attach the most recently refreshed
/// credential, and attaching the same credential twice must produce the same request (no nonces or
/// timestamps).
pub trait AuthProvider
where
	Self: Send + Sync,
{
	/// Decorates a request with the current credential. Must not block or perform I/O.
	fn attach_credential(&self, request: WireRequest) -> WireRequest;

	/// Obtains a fresh credential and returns `request` decorated with it.
	///
	/// `request` is the request that was rejected, still carrying the stale credential.
	fn refresh_credential(&self, request: WireRequest) -> RefreshFuture<'_>;
}

/// What to do when no [`AuthProvider`] is configured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthRequirement {
	/// Dispatch without credentials.
	#[default]
	Optional,
	/// Fail every dispatch with [`Error::NoAuthConfigured`].
	Required,
}

/// How concurrent refreshes are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefreshPolicy {
	/// Callers that observed the same stale credential share one refresh; the rest re-attach the
	/// refreshed credential once it is available.
	#[default]
	Coalesce,
	/// Every rejected caller performs its own refresh, one at a time.
	Serialize,
}
