//! Ready-made [`AuthProvider`] that signs requests with `Authorization: Bearer <token>`.

// crates.io
use http::{
	HeaderValue,
	header::{AUTHORIZATION, InvalidHeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::{AuthProvider, RefreshFuture},
	error::RefreshError,
	wire::WireRequest,
};

/// Boxed future returned by [`TokenSource::fetch_token`].
pub type TokenFuture<'a> =
	Pin<Box<dyn Future<Output = Result<BearerToken, RefreshError>> + 'a + Send>>;

/// Supplies replacement bearer tokens to a [`BearerProvider`].
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Obtains a new token to replace `stale`, which the server just rejected.
	fn fetch_token(&self, stale: BearerToken) -> TokenFuture<'_>;
}

/// Bearer token with its pre-validated `Authorization` header value.
///
/// Formatting never reveals the token; use [`expose`](BearerToken::expose) deliberately.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
	secret: String,
	header: HeaderValue,
}
impl BearerToken {
	/// Validates `token` as a header value and wraps it.
	pub fn new(token: impl Into<String>) -> Result<Self, InvalidHeaderValue> {
		let secret = token.into();
		let mut header = HeaderValue::from_str(&format!("Bearer {secret}"))?;

		header.set_sensitive(true);

		Ok(Self { secret, header })
	}

	/// Returns the raw token. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.secret
	}

	/// Returns the `Authorization` header value (`Bearer <token>`).
	pub fn header_value(&self) -> &HeaderValue {
		&self.header
	}
}
impl Debug for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("BearerToken").field(&"<redacted>").finish()
	}
}
impl Display for BearerToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// [`AuthProvider`] holding the current bearer token in memory.
///
/// `attach_credential` always reads the latest token, so the provider is safe to use with
/// [`RefreshPolicy::Coalesce`](crate::auth::RefreshPolicy::Coalesce).
pub struct BearerProvider {
	token: RwLock<BearerToken>,
	source: Arc<dyn TokenSource>,
}
impl BearerProvider {
	/// Creates a provider seeded with `initial`.
	pub fn new(initial: BearerToken, source: Arc<dyn TokenSource>) -> Self {
		Self { token: RwLock::new(initial), source }
	}

	/// Returns a copy of the token currently attached to requests.
	pub fn current(&self) -> BearerToken {
		self.token.read().clone()
	}
}
impl AuthProvider for BearerProvider {
	fn attach_credential(&self, request: WireRequest) -> WireRequest {
		let header = self.token.read().header_value().clone();

		request.with_header(AUTHORIZATION, header)
	}

	fn refresh_credential(&self, request: WireRequest) -> RefreshFuture<'_> {
		Box::pin(async move {
			let stale = self.current();
			let fresh = self.source.fetch_token(stale).await?;
			let header = fresh.header_value().clone();

			*self.token.write() = fresh;

			Ok(request.with_header(AUTHORIZATION, header))
		})
	}
}
impl Debug for BearerProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BearerProvider").field("token", &*self.token.read()).finish()
	}
}
