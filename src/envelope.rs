//! Response envelope wrapping every backend payload.
//!
//! The backend answers with `{ code, data, message?, label? }`. The envelope `code` is a
//! business code distinct from the HTTP status: a code whose decimal form matches `^2\d{2}$`
//! means success, [`AUTH_EXPIRED_CODE`] means the session credential expired, and everything
//! else is a rejection.

// crates.io
use serde::{Deserializer, de::DeserializeOwned};
use serde_json::Value;
use serde_path_to_error::Track;
// self
use crate::_prelude::*;

/// Business code signalling that the session credential expired.
pub const AUTH_EXPIRED_CODE: i64 = 1201;

type PathError = serde_path_to_error::Error<serde_json::Error>;

/// Outcome class of an envelope business code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CodeClass {
	/// `2xx` business code.
	Success,
	/// Session expiry.
	AuthExpired,
	/// Any other business code.
	Rejected,
}

/// Envelope business code.
///
/// Backends emit the code as a JSON number; strings holding the canonical decimal
/// form (no padding, sign, or leading zeros) are accepted as well.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BusinessCode(pub i64);
impl BusinessCode {
	/// Returns true when the decimal form of the code matches `^2\d{2}$`.
	pub fn is_success(self) -> bool {
		(200..300).contains(&self.0)
	}

	/// Classifies the code.
	pub fn class(self) -> CodeClass {
		if self.is_success() {
			CodeClass::Success
		} else if self.0 == AUTH_EXPIRED_CODE {
			CodeClass::AuthExpired
		} else {
			CodeClass::Rejected
		}
	}
}
impl Display for BusinessCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}
impl<'de> Deserialize<'de> for BusinessCode {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum RawCode {
			Number(i64),
			Text(String),
		}

		match RawCode::deserialize(deserializer)? {
			RawCode::Number(code) => Ok(Self(code)),
			RawCode::Text(text) => text
				.parse::<i64>()
				.ok()
				.filter(|code| code.to_string() == text)
				.map(Self)
				.ok_or_else(|| {
					serde::de::Error::custom(format!("business code `{text}` is not a decimal integer"))
				}),
		}
	}
}

/// Uniform wrapper carried by every backend response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
	/// Business code.
	pub code: BusinessCode,
	/// Payload; absent for acknowledgement-only responses.
	#[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	/// Human-readable message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Short label suited for a notification title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
}
impl Envelope {
	/// Decodes an untyped envelope from raw response bytes.
	///
	/// Returns the raw JSON body alongside the envelope so failures can carry the full response.
	pub fn from_slice(bytes: &[u8]) -> Result<(Self, Value), PathError> {
		let mut deserializer = serde_json::Deserializer::from_slice(bytes);
		let mut track = Track::new();
		let raw = Value::deserialize(serde_path_to_error::Deserializer::new(
			&mut deserializer,
			&mut track,
		))
		.map_err(|e| PathError::new(track.path(), e))?;

		deserializer.end().map_err(|e| PathError::new(Track::new().path(), e))?;

		let envelope = serde_path_to_error::deserialize(&raw)?;

		Ok((envelope, raw))
	}

	/// Decodes `data` into the caller's shape; an absent payload decodes from `null`.
	pub fn into_data<T>(self) -> Result<T, PathError>
	where
		T: DeserializeOwned,
	{
		serde_path_to_error::deserialize(self.data.unwrap_or(Value::Null))
	}
}
