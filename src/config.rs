//! Pipeline configuration: backend location, timeouts, and re-authentication policy.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Default transport timeout applied to connect and overall request time.
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(60);
/// Default login entry point navigated to after session expiry.
pub const DEFAULT_LOGIN_PATH: &str = "/oauth/authorize/login";
/// Default grace period between the expiry notification and the forced navigation.
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::seconds(1);
/// Default session store key holding the credential.
pub const DEFAULT_CREDENTIAL_KEY: &str = "oauth2_token";

const ENV_BASE_URL: &str = "AUTHHUB_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "AUTHHUB_TIMEOUT_SECS";
const ENV_LOGIN_PATH: &str = "AUTHHUB_LOGIN_PATH";
const ENV_REDIRECT_DELAY_MS: &str = "AUTHHUB_REDIRECT_DELAY_MS";
const ENV_CREDENTIAL_KEY: &str = "AUTHHUB_CREDENTIAL_KEY";

/// Validated configuration consumed by [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Backend origin (and optional path prefix) every request path is joined onto.
	pub base_url: Url,
	/// Connect + overall request timeout.
	pub timeout: Duration,
	/// Login path navigated to on session expiry.
	pub login_path: String,
	/// Delay before the forced navigation.
	pub redirect_delay: Duration,
	/// Session store key holding the credential.
	pub credential_key: String,
}
impl ClientConfig {
	/// Starts a builder for the provided backend base URL.
	pub fn builder(base_url: impl AsRef<str>) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url.as_ref())
	}

	/// Loads configuration from `AUTHHUB_*` environment variables.
	///
	/// `AUTHHUB_BASE_URL` is required; `AUTHHUB_TIMEOUT_SECS`, `AUTHHUB_LOGIN_PATH`,
	/// `AUTHHUB_REDIRECT_DELAY_MS`, and `AUTHHUB_CREDENTIAL_KEY` override the defaults.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&'static str) -> Option<String>,
	{
		let base_url = lookup(ENV_BASE_URL).ok_or(ConfigError::MissingEnv { name: ENV_BASE_URL })?;
		let mut builder = Self::builder(base_url);

		if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
			builder = builder.timeout(Duration::seconds(parse_env(ENV_TIMEOUT_SECS, raw)?));
		}
		if let Some(raw) = lookup(ENV_LOGIN_PATH) {
			builder = builder.login_path(raw);
		}
		if let Some(raw) = lookup(ENV_REDIRECT_DELAY_MS) {
			builder =
				builder.redirect_delay(Duration::milliseconds(parse_env(ENV_REDIRECT_DELAY_MS, raw)?));
		}
		if let Some(raw) = lookup(ENV_CREDENTIAL_KEY) {
			builder = builder.credential_key(raw);
		}

		builder.build()
	}

	/// Joins a request path onto the base URL, keeping any base path prefix.
	///
	/// Empty and dot segments (literal or percent-encoded) are rejected so the joined URL always
	/// addresses exactly the segments the caller wrote.
	pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		let relative = path.trim_start_matches('/');
		let segments = relative.split(['?', '#']).next().unwrap_or_default();

		if !segments.is_empty() && segments.split('/').any(is_unsafe_segment) {
			return Err(ConfigError::UnsafePath { path: path.to_owned() });
		}

		self.base_url
			.join(relative)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })
	}
}

/// Builder for [`ClientConfig`].
#[derive(Clone, Debug)]
pub struct ClientConfigBuilder {
	base_url: String,
	timeout: Duration,
	login_path: String,
	redirect_delay: Duration,
	credential_key: String,
}
impl ClientConfigBuilder {
	fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.to_owned(),
			timeout: DEFAULT_TIMEOUT,
			login_path: DEFAULT_LOGIN_PATH.into(),
			redirect_delay: DEFAULT_REDIRECT_DELAY,
			credential_key: DEFAULT_CREDENTIAL_KEY.into(),
		}
	}

	/// Overrides the transport timeout (defaults to 60 seconds).
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Overrides the login path (defaults to `/oauth/authorize/login`).
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Overrides the redirect delay (defaults to one second).
	pub fn redirect_delay(mut self, delay: Duration) -> Self {
		self.redirect_delay = delay;

		self
	}

	/// Overrides the session store key (defaults to `oauth2_token`).
	pub fn credential_key(mut self, key: impl Into<String>) -> Self {
		self.credential_key = key.into();

		self
	}

	/// Validates the collected values.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let mut base_url =
			Url::parse(&self.base_url).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
			return Err(ConfigError::UnsupportedBaseUrl { url: self.base_url });
		}
		// Relative joins replace the last segment unless the base path ends with `/`.
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}
		if !self.timeout.is_positive() {
			return Err(ConfigError::NonPositiveTimeout);
		}
		if self.redirect_delay.is_negative() {
			return Err(ConfigError::NegativeRedirectDelay);
		}
		if !self.login_path.starts_with('/') {
			return Err(ConfigError::InvalidLoginPath { path: self.login_path });
		}
		if self.credential_key.is_empty() {
			return Err(ConfigError::EmptyCredentialKey);
		}

		Ok(ClientConfig {
			base_url,
			timeout: self.timeout,
			login_path: self.login_path,
			redirect_delay: self.redirect_delay,
			credential_key: self.credential_key,
		})
	}
}

fn is_unsafe_segment(segment: &str) -> bool {
	let decoded = segment.to_ascii_lowercase().replace("%2e", ".");

	decoded.is_empty() || decoded == "." || decoded == ".."
}

fn parse_env(name: &'static str, raw: String) -> Result<i64, ConfigError> {
	raw.trim().parse().map_err(|_| ConfigError::InvalidEnv { name, value: raw })
}
