//! Optional observability helpers for pipeline calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `authhub_client.call` with the `method` and
//!   `path` fields, plus classification events inside them.
//! - Enable `metrics` to increment the `authhub_client_call_total` counter for every
//!   attempt/outcome, labeled by `method` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, error::Error};

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a pipeline call.
	Attempt,
	/// 2xx business code.
	Success,
	/// Non-2xx business code other than session expiry.
	BusinessFailure,
	/// Session expiry business code.
	AuthExpired,
	/// No usable HTTP response.
	TransportFailure,
	/// Request construction, serialization, or decoding failure.
	LocalFailure,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::BusinessFailure => "business_failure",
			CallOutcome::AuthExpired => "auth_expired",
			CallOutcome::TransportFailure => "transport_failure",
			CallOutcome::LocalFailure => "local_failure",
		}
	}

	/// Maps a settled failure onto its outcome label.
	pub fn of_error(error: &Error) -> Self {
		match error {
			Error::Business(_) => CallOutcome::BusinessFailure,
			Error::AuthExpired(_) => CallOutcome::AuthExpired,
			Error::Transport(_) => CallOutcome::TransportFailure,
			Error::Config(_) | Error::Decode { .. } | Error::Encode(_) => CallOutcome::LocalFailure,
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
