//! Transport primitives for backend calls.
//!
//! The module exposes [`HttpTransport`] so downstream crates can integrate custom HTTP stacks
//! (or in-process fakes) without losing the pipeline's interception. Transports only move bytes:
//! they never inspect the envelope, and they report non-2xx HTTP statuses as ordinary responses
//! so the pipeline can classify them in one place.

// std
use std::ops::Deref;
// self
use crate::{_prelude::*, error::TransportError};

/// Outbound request handed to a transport.
pub type HttpRequest = http::Request<Vec<u8>>;
/// Inbound response produced by a transport.
pub type HttpResponse = http::Response<Vec<u8>>;

/// Boxed future returned by [`HttpTransport::call`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing one request.
///
/// Implementations must be `Send + Sync + 'static` so a pipeline can be shared across tasks,
/// and the returned future must be `Send` so callers can spawn pipeline calls freely.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes `request`, resolving once the full response body is available.
	///
	/// Return `Err` only when no response was obtained (connect, DNS, TLS, timeout, body read).
	fn call(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a client whose connect and overall request timeouts both equal `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, crate::error::ConfigError> {
		let timeout = timeout.unsigned_abs();
		let client = ReqwestClient::builder().timeout(timeout).connect_timeout(timeout).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn call(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client.execute(request.try_into()?).await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();
			let mut response_new = HttpResponse::new(body);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	// self
	use super::*;

	#[tokio::test]
	async fn reqwest_transport_passes_non_success_statuses_through() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(GET).path("/teapot");
				then.status(418).body("short and stout");
			})
			.await;
		let transport = ReqwestTransport::with_timeout(Duration::seconds(5))
			.expect("Reqwest transport should build.");
		let request = http::Request::builder()
			.method(http::Method::GET)
			.uri(server.url("/teapot"))
			.body(Vec::new())
			.expect("Request fixture should build.");
		let response = transport.call(request).await.expect("Transport should return a response.");

		assert_eq!(response.status().as_u16(), 418);
		assert_eq!(response.body().as_slice(), b"short and stout");

		mock.assert_async().await;
	}

	#[tokio::test]
	async fn reqwest_transport_reports_unreachable_hosts_as_network_errors() {
		let transport = ReqwestTransport::with_timeout(Duration::seconds(5))
			.expect("Reqwest transport should build.");
		let request = http::Request::builder()
			.uri("http://127.0.0.1:1/unreachable")
			.body(Vec::new())
			.expect("Request fixture should build.");
		let err = transport.call(request).await.expect_err("Closed port should fail to connect.");

		assert!(matches!(err, TransportError::Network { .. }));
	}
}
