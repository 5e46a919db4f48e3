//! Dispatcher façade: encode, sign, execute, recover.

// self
use crate::{
	_prelude::*,
	auth::{AuthCoordinator, AuthMetrics, AuthProvider, AuthRequirement, RefreshPolicy},
	encode,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	request::RequestDescriptor,
	transport::{HttpTransport, TransportExecutor},
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, transport::ReqwestTransport};

/// Terminal result of a dispatch: the raw response body or exactly one [`Error`].
pub type Outcome = Result<Vec<u8>>;

/// Boxed future returned by [`Dispatch::make_request`].
pub type DispatchFuture<'a> = Pin<Box<dyn Future<Output = Outcome> + 'a + Send>>;

/// Object-safe dispatch contract so callers can depend on `dyn Dispatch` and swap in doubles.
pub trait Dispatch
where
	Self: Send + Sync,
{
	/// Performs the request described by `descriptor`, recovering once from auth failures.
	fn make_request<'a>(&'a self, descriptor: &'a RequestDescriptor) -> DispatchFuture<'a>;
}

/// Process-start configuration. Immutable once handed to a [`Dispatcher`].
#[derive(Clone)]
pub struct DispatcherConfig {
	/// Emit `debug` events for every outbound request and its classified outcome.
	pub debug_logging: bool,
	/// Auth provider used to sign and refresh requests.
	pub auth_provider: Option<Arc<dyn AuthProvider>>,
	/// Behavior when no auth provider is configured.
	pub auth_requirement: AuthRequirement,
	/// How concurrent refreshes are handled.
	pub refresh_policy: RefreshPolicy,
	/// Overall request timeout applied by the built-in reqwest transport.
	pub timeout: Duration,
}
impl DispatcherConfig {
	/// Overall request timeout used unless overridden (120 seconds).
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

	/// Toggles per-request debug events.
	pub fn with_debug_logging(mut self, enabled: bool) -> Self {
		self.debug_logging = enabled;

		self
	}

	/// Sets the auth provider.
	pub fn with_auth_provider(mut self, provider: Arc<dyn AuthProvider>) -> Self {
		self.auth_provider = Some(provider);

		self
	}

	/// Overrides the behavior when no provider is configured.
	pub fn with_auth_requirement(mut self, requirement: AuthRequirement) -> Self {
		self.auth_requirement = requirement;

		self
	}

	/// Overrides the refresh policy (defaults to [`RefreshPolicy::Coalesce`]).
	pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
		self.refresh_policy = policy;

		self
	}

	/// Overrides the overall request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}
}
impl Default for DispatcherConfig {
	fn default() -> Self {
		Self {
			debug_logging: false,
			auth_provider: None,
			auth_requirement: AuthRequirement::default(),
			refresh_policy: RefreshPolicy::default(),
			timeout: Self::DEFAULT_TIMEOUT,
		}
	}
}
impl Debug for DispatcherConfig {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("DispatcherConfig")
			.field("debug_logging", &self.debug_logging)
			.field("auth_provider_set", &self.auth_provider.is_some())
			.field("auth_requirement", &self.auth_requirement)
			.field("refresh_policy", &self.refresh_policy)
			.field("timeout", &self.timeout)
			.finish()
	}
}

#[cfg(feature = "reqwest")]
/// Dispatcher specialized for the crate's default reqwest transport.
pub type ReqwestDispatcher = Dispatcher<ReqwestTransport>;

/// Entry point that turns descriptors into outcomes.
///
/// The dispatcher owns long-lived handles to the transport executor and the auth coordinator and
/// nothing else; cloning it shares both, including the refresh guard.
pub struct Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	executor: TransportExecutor<T>,
	coordinator: Arc<AuthCoordinator>,
}
impl<T> Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a dispatcher over a caller-provided transport.
	pub fn with_transport(config: DispatcherConfig, transport: impl Into<Arc<T>>) -> Self {
		let DispatcherConfig { debug_logging, auth_provider, auth_requirement, refresh_policy, .. } =
			config;

		Self {
			executor: TransportExecutor::new(transport, debug_logging),
			coordinator: Arc::new(AuthCoordinator::new(
				auth_provider,
				auth_requirement,
				refresh_policy,
			)),
		}
	}

	/// Auth coordinator shared by every request sent through this dispatcher.
	pub fn coordinator(&self) -> &AuthCoordinator {
		&self.coordinator
	}

	/// Recovery counters collected by the coordinator.
	pub fn auth_metrics(&self) -> &AuthMetrics {
		self.coordinator.metrics()
	}

	/// Encodes, signs, and executes `descriptor`, recovering once from an auth failure.
	pub async fn make_request(&self, descriptor: &RequestDescriptor) -> Outcome {
		const KIND: OperationKind = OperationKind::Dispatch;

		let span = OperationSpan::new(KIND, "make_request");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let outcome = span
			.instrument(async move {
				let request = encode::encode(descriptor)?;

				self.coordinator.dispatch_with_auth(&self.executor, request).await
			})
			.await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&outcome));

		outcome
	}
}
#[cfg(feature = "reqwest")]
impl Dispatcher<ReqwestTransport> {
	/// Creates a dispatcher backed by a reqwest client built with `config.timeout`.
	pub fn new(config: DispatcherConfig) -> Result<Self, ConfigError> {
		let transport = ReqwestTransport::new(config.timeout)?;

		Ok(Self::with_transport(config, transport))
	}
}
impl<T> Dispatch for Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	fn make_request<'a>(&'a self, descriptor: &'a RequestDescriptor) -> DispatchFuture<'a> {
		Box::pin(Dispatcher::make_request(self, descriptor))
	}
}
impl<T> Clone for Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { executor: self.executor.clone(), coordinator: Arc::clone(&self.coordinator) }
	}
}
impl<T> Debug for Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("executor", &self.executor)
			.field("coordinator", &self.coordinator)
			.finish()
	}
}
