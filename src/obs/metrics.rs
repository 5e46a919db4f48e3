// self
use crate::obs::{OperationKind, OperationOutcome};

/// Increments `http_reauth_operation_total{operation, outcome}` on the global `metrics` recorder.
///
/// Without the `metrics` feature this is a no-op; with it but no installed recorder, the counter
/// is discarded by the `metrics` facade.
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"http_reauth_operation_total",
			"operation" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
