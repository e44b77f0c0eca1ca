//! Client-level error types shared by the pipeline, transports, and resource clients.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every pipeline call settles as exactly one of `Ok(value)` or `Err(Error)`; transport
/// exceptions never escape in any other shape.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// No usable HTTP response was obtained.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Backend answered with a non-2xx business code.
	#[error("Backend rejected the request with business code {}.", .0.code)]
	Business(BusinessFailure),
	/// Backend reported that the session credential expired (business code `1201`).
	#[error("Session credential expired; re-authentication is required.")]
	AuthExpired(BusinessFailure),
	/// Response body could not be decoded as an envelope or into the requested shape.
	#[error("Backend returned a malformed response.")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status of the offending response.
		status: u16,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	Encode(#[source] serde_json::Error),
}
impl Error {
	/// Returns the classified envelope for business and auth-expiry failures.
	pub fn business_failure(&self) -> Option<&BusinessFailure> {
		match self {
			Self::Business(failure) | Self::AuthExpired(failure) => Some(failure),
			_ => None,
		}
	}

	/// Returns true when the backend reported session expiry.
	pub fn is_auth_expired(&self) -> bool {
		matches!(self, Self::AuthExpired(_))
	}
}

/// Full detail of a response whose envelope carried a non-2xx business code.
#[derive(Clone, Debug, PartialEq)]
pub struct BusinessFailure {
	/// HTTP status of the response.
	pub status: u16,
	/// Envelope business code.
	pub code: i64,
	/// Envelope message, if supplied.
	pub message: Option<String>,
	/// Envelope label, if supplied.
	pub label: Option<String>,
	/// Raw envelope body as received.
	pub body: serde_json::Value,
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http or https, or cannot carry paths.
	#[error("Base URL `{url}` must be an http(s) URL that can carry paths.")]
	UnsupportedBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Request path cannot be joined onto the base URL.
	#[error("Request path `{path}` is invalid.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request path carries an empty or dot segment that would be resolved away.
	#[error("Request path `{path}` must not contain empty, `.`, or `..` segments.")]
	UnsafePath {
		/// Offending path.
		path: String,
	},
	/// Credential or caller header cannot be represented as an HTTP header value.
	#[error("Header `{name}` carries a value that is not a valid HTTP header.")]
	InvalidHeader {
		/// Header name.
		name: String,
	},
	/// Login path must be absolute.
	#[error("Login path `{path}` must start with `/`.")]
	InvalidLoginPath {
		/// Offending path.
		path: String,
	},
	/// Transport timeout must be positive.
	#[error("Transport timeout must be positive.")]
	NonPositiveTimeout,
	/// Redirect delay cannot be negative.
	#[error("Redirect delay cannot be negative.")]
	NegativeRedirectDelay,
	/// Credential key cannot be empty.
	#[error("Credential key cannot be empty.")]
	EmptyCredentialKey,
	/// Required environment variable is absent.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// Environment variable holds an unparsable value.
	#[error("Environment variable `{name}` holds an invalid value `{value}`.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Raw value.
		value: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures; no envelope was classified.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure (connect, DNS, TLS, timeout).
	#[error("{source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Server answered with an HTTP status outside 2xx.
	#[error("Request failed with status code {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body, decoded lossily.
		body: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
