// crates.io
use http::Method as HttpMethod;
// self
use crate::{_prelude::*, dispatch::Outcome, obs::OperationKind, wire::WireRequest};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by dispatch and refresh operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OperationKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("http_reauth.operation", operation = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a `debug` event describing an outbound request.
///
/// Header values are not logged; only header names are, so credentials stay out of logs.
pub fn log_request(request: &WireRequest) {
	#[cfg(feature = "tracing")]
	{
		let headers = request.headers.keys().map(|name| name.as_str()).collect::<Vec<_>>();

		tracing::debug!(
			method = %request.method,
			url = %request.url,
			?headers,
			body_len = request.body.as_ref().map_or(0, Vec::len),
			"sending request"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = request;
	}
}

/// Emits a `debug` event describing the classified outcome of an exchange.
pub fn log_outcome(method: &HttpMethod, url: &Url, outcome: &Outcome) {
	#[cfg(feature = "tracing")]
	{
		match outcome {
			Ok(body) =>
				tracing::debug!(%method, %url, body_len = body.len(), "request succeeded"),
			Err(e) => tracing::debug!(%method, %url, error = %e, "request failed"),
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, url, outcome);
	}
}

/// Emits a `debug` event when a descriptor's payload could not be serialized to JSON.
pub fn log_payload_rejected(reason: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(reason, "payload could not be serialized");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = reason;
	}
}

/// Emits a `warn` event for a refresh failure that is about to be surfaced to the caller.
pub fn log_refresh_failure(error: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %error, "credential refresh failed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
