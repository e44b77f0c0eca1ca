//! Result pipeline: the single chokepoint every backend call goes through.
//!
//! Each call settles as exactly one of `Ok(data)` or `Err(Error)`. On the way out the pipeline
//! forces a JSON content type and attaches the session credential; on the way back it classifies
//! the HTTP status and the envelope business code, notifies the user about every failure, and
//! schedules the forced re-login navigation when the backend reports session expiry.
//!
//! Nothing here retries. Notifications and the navigation are fire-and-forget: the failing call
//! returns as soon as it is classified.

// crates.io
use http::{
	HeaderValue, Method,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	envelope::{CodeClass, Envelope},
	error::{BusinessFailure, ConfigError, TransportError},
	http::{HttpRequest, HttpResponse, HttpTransport},
	navigate::Navigator,
	notify::{Notification, Notifier},
	obs::{self, CallOutcome, CallSpan},
	session::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Content type forced onto every outbound request.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";
/// Notification title used for session expiry.
pub const AUTH_EXPIRED_TITLE: &str = "Authentication failed";
/// Notification title used for transport failures.
pub const NETWORK_ERROR_TITLE: &str = "Network error";
/// Notification title used when no envelope label is available.
pub const REQUEST_FAILED_TITLE: &str = "Request failed";

#[cfg(feature = "reqwest")]
/// Pipeline specialized for the crate's default reqwest transport.
pub type ReqwestPipeline = Pipeline<ReqwestTransport>;

/// Per-call transport options.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// Query pairs appended to the request URL, in order.
	pub query: Vec<(String, String)>,
	/// Extra headers. `Content-Type` and `Authorization` are always overwritten.
	pub headers: Vec<(String, String)>,
}
impl RequestOptions {
	/// Appends a query pair.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Appends an extra header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}
}

/// Executes backend calls and normalizes every outcome into [`Result`].
///
/// The pipeline owns the transport, the read-only session store, and the two presentation
/// collaborators (notification sink and navigation target). Clones share all of them.
pub struct Pipeline<T>
where
	T: ?Sized + HttpTransport,
{
	config: Arc<ClientConfig>,
	transport: Arc<T>,
	session: Arc<dyn SessionStore>,
	notifier: Arc<dyn Notifier>,
	navigator: Arc<dyn Navigator>,
}
impl<T> Pipeline<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a pipeline around a caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		transport: impl Into<Arc<T>>,
		session: Arc<dyn SessionStore>,
		notifier: Arc<dyn Notifier>,
		navigator: Arc<dyn Navigator>,
	) -> Self {
		Self { config: Arc::new(config), transport: transport.into(), session, notifier, navigator }
	}

	/// Configuration the pipeline was built with.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Issues a `GET` and unwraps the envelope `data`.
	pub async fn get<R>(&self, path: &str, options: RequestOptions) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.call(Method::GET, path, Ok(None), options).await
	}

	/// Issues a `POST` with an optional JSON body and unwraps the envelope `data`.
	pub async fn post<B, R>(&self, path: &str, body: Option<&B>, options: RequestOptions) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.call(Method::POST, path, encode(body), options).await
	}

	/// Issues a `PUT` with an optional JSON body and unwraps the envelope `data`.
	pub async fn put<B, R>(&self, path: &str, body: Option<&B>, options: RequestOptions) -> Result<R>
	where
		B: ?Sized + Serialize,
		R: DeserializeOwned,
	{
		self.call(Method::PUT, path, encode(body), options).await
	}

	/// Issues a `DELETE` and unwraps the envelope `data`.
	pub async fn delete<R>(&self, path: &str, options: RequestOptions) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.call(Method::DELETE, path, Ok(None), options).await
	}

	async fn call<R>(
		&self,
		method: Method,
		path: &str,
		payload: Result<Option<Vec<u8>>>,
		options: RequestOptions,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let span = CallSpan::new(&method, path);

		obs::record_call_outcome(&method, CallOutcome::Attempt);

		span.instrument(async move {
			let result = self.dispatch(&method, path, payload, &options).await;

			match &result {
				Ok(_) => obs::record_call_outcome(&method, CallOutcome::Success),
				Err(e) => {
					obs::record_call_outcome(&method, CallOutcome::of_error(e));
					self.intercept_failure(e);
				},
			}

			result
		})
		.await
	}

	async fn dispatch<R>(
		&self,
		method: &Method,
		path: &str,
		payload: Result<Option<Vec<u8>>>,
		options: &RequestOptions,
	) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let request = self.build_request(method, path, payload?, options)?;
		let response = self.transport.call(request).await?;

		classify(response)
	}

	fn build_request(
		&self,
		method: &Method,
		path: &str,
		payload: Option<Vec<u8>>,
		options: &RequestOptions,
	) -> Result<HttpRequest, ConfigError> {
		let mut url = self.config.endpoint(path)?;

		if !options.query.is_empty() {
			url.query_pairs_mut().extend_pairs(options.query.iter());
		}

		let mut builder = http::Request::builder().method(method.clone()).uri(url.as_str());

		for (name, value) in &options.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}

		let mut request = builder.body(payload.unwrap_or_default())?;
		// Absent credentials still produce the header; the backend reports them as expired.
		let credential = self.session.get(&self.config.credential_key).unwrap_or_default();
		let mut authorization = HeaderValue::from_str(&credential)
			.map_err(|_| ConfigError::InvalidHeader { name: AUTHORIZATION.as_str().into() })?;

		authorization.set_sensitive(true);

		let headers = request.headers_mut();

		headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
		headers.insert(AUTHORIZATION, authorization);

		Ok(request)
	}

	fn intercept_failure(&self, error: &Error) {
		let notification = match error {
			Error::AuthExpired(failure) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(code = failure.code, "session expired");

				Notification::error(AUTH_EXPIRED_TITLE, failure.message.clone().unwrap_or_default())
			},
			Error::Business(failure) => {
				#[cfg(feature = "tracing")]
				tracing::info!(code = failure.code, label = ?failure.label, "request rejected");

				Notification::error(
					failure.label.clone().unwrap_or_else(|| REQUEST_FAILED_TITLE.into()),
					failure.message.clone().unwrap_or_default(),
				)
			},
			Error::Transport(e) => {
				#[cfg(feature = "tracing")]
				tracing::warn!(error = %e, "transport failure");

				Notification::error(NETWORK_ERROR_TITLE, e.to_string())
			},
			other => {
				#[cfg(feature = "tracing")]
				tracing::error!(error = %other, "request could not be completed");

				Notification::error(REQUEST_FAILED_TITLE, other.to_string())
			},
		};

		self.notifier.notify(notification);

		if error.is_auth_expired() {
			self.schedule_login_redirect();
		}
	}

	/// Hands control to the login entry point once the redirect delay elapses.
	///
	/// The navigation runs detached from the failing call and cannot be cancelled.
	fn schedule_login_redirect(&self) {
		let navigator = Arc::clone(&self.navigator);
		let path = self.config.login_path.clone();
		let delay = self.config.redirect_delay.unsigned_abs();

		match tokio::runtime::Handle::try_current() {
			Ok(handle) => {
				let deadline = tokio::time::Instant::now() + delay;

				handle.spawn(async move {
					tokio::time::sleep_until(deadline).await;
					navigator.navigate(&path);
				});
			},
			Err(_) => {
				std::thread::spawn(move || {
					std::thread::sleep(delay);
					navigator.navigate(&path);
				});
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl Pipeline<ReqwestTransport> {
	/// Creates a pipeline backed by a reqwest transport honoring `config.timeout`.
	pub fn new(
		config: ClientConfig,
		session: Arc<dyn SessionStore>,
		notifier: Arc<dyn Notifier>,
		navigator: Arc<dyn Navigator>,
	) -> Result<Self, ConfigError> {
		let transport = ReqwestTransport::with_timeout(config.timeout)?;

		Ok(Self::with_transport(config, transport, session, notifier, navigator))
	}
}
impl<T> Clone for Pipeline<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: Arc::clone(&self.config),
			transport: Arc::clone(&self.transport),
			session: Arc::clone(&self.session),
			notifier: Arc::clone(&self.notifier),
			navigator: Arc::clone(&self.navigator),
		}
	}
}
impl<T> Debug for Pipeline<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Pipeline")
			.field("base_url", &self.config.base_url.as_str())
			.field("login_path", &self.config.login_path)
			.finish()
	}
}

fn encode<B>(body: Option<&B>) -> Result<Option<Vec<u8>>>
where
	B: ?Sized + Serialize,
{
	body.map(serde_json::to_vec).transpose().map_err(Error::Encode)
}

fn classify<R>(response: HttpResponse) -> Result<R>
where
	R: DeserializeOwned,
{
	let status = response.status();
	let body = response.into_body();

	if !status.is_success() {
		return Err(TransportError::Status {
			status: status.as_u16(),
			body: String::from_utf8_lossy(&body).into_owned(),
		}
		.into());
	}

	let status = status.as_u16();
	let (envelope, raw) =
		Envelope::from_slice(&body).map_err(|source| Error::Decode { source, status })?;

	match envelope.code.class() {
		CodeClass::Success => envelope.into_data().map_err(|source| Error::Decode { source, status }),
		class => {
			let failure = BusinessFailure {
				status,
				code: envelope.code.0,
				message: envelope.message,
				label: envelope.label,
				body: raw,
			};

			if class == CodeClass::AuthExpired {
				Err(Error::AuthExpired(failure))
			} else {
				Err(Error::Business(failure))
			}
		},
	}
}
