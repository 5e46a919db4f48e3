//! Optional observability helpers for dispatch and refresh operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit structured spans named `http_reauth.operation` with
//!   the `operation` and `stage` fields, plus per-exchange `debug` events when
//!   [`DispatcherConfig::debug_logging`](crate::dispatch::DispatcherConfig) is set.
//! - Enable `metrics` to increment the `http_reauth_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// The two units of work the dispatcher reports on: whole dispatches and credential refreshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// One `make_request` call, from encoding through the final classified outcome, including a
	/// refresh-and-retry if the first attempt was rejected.
	Dispatch,
	/// One `refresh_credential` call made while the coordinator holds the refresh guard. Coalesced
	/// callers that reuse another caller's credential do not produce this operation.
	Refresh,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Dispatch => "dispatch",
			OperationKind::Refresh => "refresh",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome label attached to the `http_reauth_operation_total` counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Recorded when a dispatch starts or a refresh is about to call the provider.
	Attempt,
	/// The dispatch returned a body, or the refresh produced a re-signed request.
	Success,
	/// The dispatch ended with an [`Error`], or the provider failed to refresh.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Labels a finished dispatch or refresh by whether it produced a value.
	pub fn of<T, E>(result: &Result<T, E>) -> Self {
		if result.is_ok() { OperationOutcome::Success } else { OperationOutcome::Failure }
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
