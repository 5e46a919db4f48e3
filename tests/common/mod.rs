//! Shared doubles for integration tests: a scripted HTTP transport and an instrumented provider.

#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	time::Duration,
};
// crates.io
use parking_lot::Mutex;
use tokio::sync::Barrier;
// self
use http_reauth::{
	auth::{AuthProvider, BearerToken, RefreshFuture, TokenFuture, TokenSource},
	error::{Error, RefreshError, TransportError},
	http::{HeaderValue, header::AUTHORIZATION},
	transport::{HttpTransport, RawResponse, TransportFuture},
	wire::WireRequest,
};

/// How the fake server answers.
pub enum ServerMode {
	/// Always answer with this status + body.
	Fixed(u16, &'static [u8]),
	/// Answer `200 ok` when `Authorization: Bearer <accepted>` is present, `reject` otherwise.
	Token { accepted: String, reject: u16 },
}

/// In-process [`HttpTransport`] that records every request it sees.
pub struct FakeServer {
	mode: ServerMode,
	gate: Option<Arc<Barrier>>,
	requests: Mutex<Vec<WireRequest>>,
}
impl FakeServer {
	pub fn fixed(status: u16, body: &'static [u8]) -> Self {
		Self { mode: ServerMode::Fixed(status, body), gate: None, requests: Mutex::default() }
	}

	pub fn accepting(token: &str) -> Self {
		Self::token(token, 401)
	}

	pub fn token(accepted: &str, reject: u16) -> Self {
		Self {
			mode: ServerMode::Token { accepted: accepted.to_owned(), reject },
			gate: None,
			requests: Mutex::default(),
		}
	}

	/// Holds every rejected request until `parties` rejected requests have arrived.
	pub fn gated(mut self, parties: usize) -> Self {
		self.gate = Some(Arc::new(Barrier::new(parties)));

		self
	}

	pub fn requests(&self) -> Vec<WireRequest> {
		self.requests.lock().clone()
	}

	pub fn calls(&self) -> usize {
		self.requests.lock().len()
	}
}
impl HttpTransport for FakeServer {
	fn execute(&self, request: WireRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let authorization = request.header_str("authorization").map(str::to_owned);

			self.requests.lock().push(request);

			match &self.mode {
				ServerMode::Fixed(status, body) => Ok(RawResponse::new(*status, body.to_vec())),
				ServerMode::Token { accepted, reject } => {
					if authorization.as_deref() == Some(format!("Bearer {accepted}").as_str()) {
						return Ok(RawResponse::new(200, b"ok".to_vec()));
					}
					if let Some(gate) = &self.gate {
						gate.wait().await;
					}

					Ok(RawResponse::new(*reject, Vec::new()))
				},
			}
		})
	}
}

/// Transport whose every exchange fails before a response is received.
pub struct UnreachableServer;
impl HttpTransport for UnreachableServer {
	fn execute(&self, _request: WireRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			Err(TransportError::network(std::io::Error::new(
				std::io::ErrorKind::ConnectionRefused,
				"connection refused",
			)))
		})
	}
}

/// What [`InstrumentedProvider::refresh_credential`] does.
pub enum RefreshBehavior {
	/// Install the configured next token.
	Succeed,
	/// Fail with an error from the closed taxonomy.
	Fail(Error),
	/// Fail with a provider-specific error.
	FailForeign,
	/// Fail the first refresh with this error; later refreshes succeed.
	FailFirst(Error),
}

/// [`AuthProvider`] that counts refreshes and detects overlapping refresh episodes.
pub struct InstrumentedProvider {
	token: Mutex<String>,
	next_token: String,
	behavior: RefreshBehavior,
	delay: Duration,
	refreshes: AtomicUsize,
	in_refresh: AtomicBool,
	overlaps: AtomicUsize,
}
impl InstrumentedProvider {
	pub fn new(initial: &str, next_token: &str) -> Self {
		Self {
			token: Mutex::new(initial.to_owned()),
			next_token: next_token.to_owned(),
			behavior: RefreshBehavior::Succeed,
			delay: Duration::from_millis(10),
			refreshes: AtomicUsize::new(0),
			in_refresh: AtomicBool::new(false),
			overlaps: AtomicUsize::new(0),
		}
	}

	pub fn with_behavior(mut self, behavior: RefreshBehavior) -> Self {
		self.behavior = behavior;

		self
	}

	pub fn refreshes(&self) -> usize {
		self.refreshes.load(Ordering::SeqCst)
	}

	pub fn overlaps(&self) -> usize {
		self.overlaps.load(Ordering::SeqCst)
	}

	fn header(token: &str) -> HeaderValue {
		HeaderValue::from_str(&format!("Bearer {token}")).expect("Test tokens should be header-safe.")
	}
}
impl AuthProvider for InstrumentedProvider {
	fn attach_credential(&self, request: WireRequest) -> WireRequest {
		let token = self.token.lock().clone();

		request.with_header(AUTHORIZATION, Self::header(&token))
	}

	fn refresh_credential(&self, request: WireRequest) -> RefreshFuture<'_> {
		Box::pin(async move {
			if self.in_refresh.swap(true, Ordering::SeqCst) {
				self.overlaps.fetch_add(1, Ordering::SeqCst);
			}

			let attempt = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;

			tokio::time::sleep(self.delay).await;

			let result = match &self.behavior {
				RefreshBehavior::FailFirst(e) if attempt == 1 => Err(RefreshError::from(e.clone())),
				RefreshBehavior::Succeed | RefreshBehavior::FailFirst(_) => {
					*self.token.lock() = self.next_token.clone();

					Ok(request.with_header(AUTHORIZATION, Self::header(&self.next_token)))
				},
				RefreshBehavior::Fail(e) => Err(RefreshError::from(e.clone())),
				RefreshBehavior::FailForeign =>
					Err(RefreshError::provider(std::io::Error::other("credential store locked"))),
			};

			self.in_refresh.store(false, Ordering::SeqCst);

			result
		})
	}
}

/// [`AuthProvider`] that starts with `token-0` and issues `token-1`, `token-2`, ... on successive
/// refreshes.
///
/// Attaching to a request whose path is `held_path` blocks the calling thread until the first
/// refresh has installed its token, so that request is signed with a credential issued after its
/// dispatch started.
pub struct RotatingProvider {
	token: Mutex<String>,
	held_path: &'static str,
	issued: AtomicUsize,
}
impl RotatingProvider {
	pub fn new(held_path: &'static str) -> Self {
		Self { token: Mutex::new("token-0".into()), held_path, issued: AtomicUsize::new(0) }
	}

	pub fn refreshes(&self) -> usize {
		self.issued.load(Ordering::SeqCst)
	}
}
impl AuthProvider for RotatingProvider {
	fn attach_credential(&self, request: WireRequest) -> WireRequest {
		if request.url.path() == self.held_path {
			while self.issued.load(Ordering::SeqCst) == 0 {
				std::thread::yield_now();
			}
		}

		let token = self.token.lock().clone();

		request.with_header(AUTHORIZATION, InstrumentedProvider::header(&token))
	}

	fn refresh_credential(&self, request: WireRequest) -> RefreshFuture<'_> {
		Box::pin(async move {
			let mut token = self.token.lock();
			let next = token
				.strip_prefix("token-")
				.and_then(|n| n.parse::<usize>().ok())
				.map_or(1, |n| n + 1);

			*token = format!("token-{next}");

			let header = InstrumentedProvider::header(&token);

			drop(token);
			self.issued.fetch_add(1, Ordering::SeqCst);

			Ok(request.with_header(AUTHORIZATION, header))
		})
	}
}

/// [`TokenSource`] that always hands out the same replacement token.
pub struct StaticTokenSource {
	token: String,
	calls: AtomicUsize,
}
impl StaticTokenSource {
	pub fn new(token: &str) -> Self {
		Self { token: token.to_owned(), calls: AtomicUsize::new(0) }
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl TokenSource for StaticTokenSource {
	fn fetch_token(&self, _stale: BearerToken) -> TokenFuture<'_> {
		Box::pin(async move {
			self.calls.fetch_add(1, Ordering::SeqCst);

			BearerToken::new(self.token.clone()).map_err(RefreshError::provider)
		})
	}
}
