//! Demonstrates wiring a [`BearerProvider`] into a reqwest-backed [`Dispatcher`].
//!
//! 1. Implement [`TokenSource`] so the provider can obtain a replacement token after a 401/403.
//! 2. Wrap the provider in `Arc` and hand it to [`DispatcherConfig::with_auth_provider`].
//! 3. Call [`Dispatcher::make_request`]; an auth failure triggers one refresh and one retry.

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicU32, Ordering},
	},
	time::Duration,
};
// crates.io
use color_eyre::Result;
// self
use http_reauth::{
	auth::{BearerProvider, BearerToken, TokenFuture, TokenSource},
	dispatch::{Dispatcher, DispatcherConfig},
	error::{Error, RefreshError},
	request::{Method, RequestDescriptor},
};

/// Issues sequential tokens, standing in for a real identity provider.
#[derive(Default)]
struct SequentialTokens(AtomicU32);
impl TokenSource for SequentialTokens {
	fn fetch_token(&self, _stale: BearerToken) -> TokenFuture<'_> {
		Box::pin(async move {
			let next = self.0.fetch_add(1, Ordering::Relaxed) + 1;

			BearerToken::new(format!("demo-token-{next}")).map_err(RefreshError::provider)
		})
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let provider = Arc::new(BearerProvider::new(
		BearerToken::new("demo-token-0")?,
		Arc::new(SequentialTokens::default()),
	));
	let config = DispatcherConfig::default()
		.with_debug_logging(true)
		.with_timeout(Duration::from_secs(30))
		.with_auth_provider(provider.clone());
	let dispatcher = Dispatcher::new(config)?;
	let descriptor = RequestDescriptor::builder("https://httpbin.org/bearer", Method::Get)
		.header("Accept", "application/json")
		.build();

	match dispatcher.make_request(&descriptor).await {
		Ok(body) => println!("Received {} bytes: {}.", body.len(), String::from_utf8_lossy(&body)),
		Err(Error::Unauthenticated) => {
			println!("Server rejected both the initial and the refreshed token.")
		},
		Err(e) => println!("Request failed: {e}."),
	}

	println!(
		"Refresh attempts: {}, token in use: {}.",
		dispatcher.auth_metrics().refresh_attempts(),
		provider.current(),
	);

	Ok(())
}
