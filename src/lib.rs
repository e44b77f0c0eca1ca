//! Typed admin client for OAuth 2.0 application registries, built around one result pipeline that
//! attaches credentials, classifies envelopes, handles session expiry, and notifies the user.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod application;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod navigate;
pub mod notify;
pub mod obs;
pub mod pipeline;
pub mod session;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;
	pub use crate::{
		navigate::RecordingNavigator, notify::RecordingNotifier, session::MemorySessionStore,
	};

	// crates.io
	use serde_json::Value;
	// self
	use crate::{
		config::ClientConfig,
		error::TransportError,
		http::{HttpRequest, HttpResponse, HttpTransport, TransportFuture},
		pipeline::Pipeline,
	};

	type Responder = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

	/// Base URL used by [`build_test_pipeline`].
	pub const TEST_BASE_URL: &str = "http://authhub.test";

	/// In-process transport that answers through a closure and records every request.
	#[derive(Clone)]
	pub struct ScriptedTransport {
		responder: Arc<Responder>,
		requests: Arc<Mutex<Vec<HttpRequest>>>,
	}
	impl ScriptedTransport {
		/// Answers every request with `responder`.
		pub fn respond<F>(responder: F) -> Self
		where
			F: 'static + Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync,
		{
			Self { responder: Arc::new(responder), requests: Default::default() }
		}

		/// Answers every request with HTTP 200 and the provided envelope.
		pub fn envelope(envelope: Value) -> Self {
			Self::respond(move |_| Ok(json_response(200, &envelope)))
		}

		/// Fails every request with a network error carrying `message`.
		pub fn unreachable(message: &'static str) -> Self {
			Self::respond(move |_| {
				Err(TransportError::network(std::io::Error::new(
					std::io::ErrorKind::ConnectionRefused,
					message,
				)))
			})
		}

		/// Removes and returns the requests received so far.
		pub fn take_requests(&self) -> Vec<HttpRequest> {
			std::mem::take(&mut *self.requests.lock())
		}
	}
	impl HttpTransport for ScriptedTransport {
		fn call(&self, request: HttpRequest) -> TransportFuture<'_> {
			let outcome = (self.responder)(&request);

			self.requests.lock().push(request);

			Box::pin(async move { outcome })
		}
	}

	/// Builds a JSON response with the provided HTTP status.
	pub fn json_response(status: u16, body: &Value) -> HttpResponse {
		let mut response = HttpResponse::new(body.to_string().into_bytes());

		*response.status_mut() =
			::http::StatusCode::from_u16(status).expect("Test status code should be valid.");

		response
	}

	/// Pipeline wired to recording collaborators.
	pub struct TestHarness<T>
	where
		T: HttpTransport,
	{
		/// Pipeline under test.
		pub pipeline: Pipeline<T>,
		/// Session store read by the pipeline.
		pub session: MemorySessionStore,
		/// Notifications emitted by the pipeline.
		pub notifier: RecordingNotifier,
		/// Navigations requested by the pipeline.
		pub navigator: RecordingNavigator,
	}

	/// Builds a pipeline against [`TEST_BASE_URL`] with default policy and recording collaborators.
	pub fn build_test_pipeline<T>(transport: T) -> TestHarness<T>
	where
		T: HttpTransport,
	{
		let config = ClientConfig::builder(TEST_BASE_URL)
			.build()
			.expect("Test configuration should be valid.");
		let session = MemorySessionStore::default();
		let notifier = RecordingNotifier::default();
		let navigator = RecordingNavigator::default();
		let pipeline = Pipeline::with_transport(
			config,
			transport,
			Arc::new(session.clone()),
			Arc::new(notifier.clone()),
			Arc::new(navigator.clone()),
		);

		TestHarness { pipeline, session, notifier, navigator }
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
