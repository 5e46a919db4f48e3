//! Authentication-failure recovery with a single-flight refresh guard.
//!
//! [`AuthCoordinator::dispatch_with_auth`] attaches the provider's credential, executes the
//! request once, and on [`Error::Unauthenticated`] enters a refresh episode guarded by an async
//! mutex. The refreshed request is re-executed exactly once and its outcome is final, so a
//! provider that keeps handing out rejected credentials cannot cause a retry loop.
//!
//! Under [`RefreshPolicy::Coalesce`] a caller that acquires the guard re-attaches the provider's
//! current credential and compares it with the rejected request. If they differ, another caller
//! already refreshed and the new credential is reused; if they match, the rejected credential is
//! still current and this caller refreshes it.

// self
use crate::{
	_prelude::*,
	auth::{AuthMetrics, AuthProvider, AuthRequirement, RefreshPolicy},
	dispatch::Outcome,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	transport::{HttpTransport, TransportExecutor},
	wire::WireRequest,
};

/// Owns the auth provider and the refresh-and-retry protocol.
pub struct AuthCoordinator {
	provider: Option<Arc<dyn AuthProvider>>,
	requirement: AuthRequirement,
	policy: RefreshPolicy,
	refresh_guard: AsyncMutex<()>,
	metrics: Arc<AuthMetrics>,
}
impl AuthCoordinator {
	/// Creates a coordinator. The provider cannot be replaced afterwards.
	pub fn new(
		provider: Option<Arc<dyn AuthProvider>>,
		requirement: AuthRequirement,
		policy: RefreshPolicy,
	) -> Self {
		Self {
			provider,
			requirement,
			policy,
			refresh_guard: AsyncMutex::new(()),
			metrics: Default::default(),
		}
	}

	/// Whether an auth provider is configured.
	pub fn has_provider(&self) -> bool {
		self.provider.is_some()
	}

	/// Refresh policy in effect.
	pub fn policy(&self) -> RefreshPolicy {
		self.policy
	}

	/// Shared recovery counters.
	pub fn metrics(&self) -> &Arc<AuthMetrics> {
		&self.metrics
	}

	/// Executes `request` with credentials, recovering once from an authentication failure.
	pub async fn dispatch_with_auth<T>(
		&self,
		executor: &TransportExecutor<T>,
		request: WireRequest,
	) -> Outcome
	where
		T: ?Sized + HttpTransport,
	{
		let Some(provider) = self.provider.as_deref() else {
			return match self.requirement {
				AuthRequirement::Optional => executor.execute(request).await,
				AuthRequirement::Required => Err(Error::NoAuthConfigured),
			};
		};
		let signed = provider.attach_credential(request.clone());

		match executor.execute(signed.clone()).await {
			Err(Error::Unauthenticated) => {},
			outcome => return outcome,
		}

		let retry = self.recover(provider, request, signed).await?;

		self.metrics.record_retry();

		executor.execute(retry).await
	}

	/// Runs one refresh episode and returns the request to re-send.
	///
	/// The guard is released before this returns, so the retry itself runs unguarded.
	async fn recover(
		&self,
		provider: &dyn AuthProvider,
		unsigned: WireRequest,
		rejected: WireRequest,
	) -> Result<WireRequest> {
		const KIND: OperationKind = OperationKind::Refresh;

		let _episode = self.refresh_guard.lock().await;

		if self.policy == RefreshPolicy::Coalesce {
			let current = provider.attach_credential(unsigned);

			if current != rejected {
				self.metrics.record_coalesced();

				return Ok(current);
			}
		}

		let span = OperationSpan::new(KIND, "refresh_credential");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span.instrument(provider.refresh_credential(rejected)).await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		match result {
			Ok(refreshed) => {
				self.metrics.record_success();

				Ok(refreshed)
			},
			Err(e) => {
				self.metrics.record_failure();
				obs::log_refresh_failure(&e);

				Err(e.into_dispatch_error())
			},
		}
	}
}
impl Debug for AuthCoordinator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthCoordinator")
			.field("provider_set", &self.provider.is_some())
			.field("requirement", &self.requirement)
			.field("policy", &self.policy)
			.finish()
	}
}
