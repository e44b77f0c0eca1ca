//! Session credential stores consulted before every outbound call.
//!
//! The pipeline only ever reads from a [`SessionStore`]; writing the credential (after a login,
//! or clearing it on logout) is the embedding application's business.

pub mod file;
pub mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

// self
use crate::_prelude::*;

/// Process-wide key-value store holding the session credential.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if any.
	fn get(&self, key: &str) -> Option<String>;
}
impl<S> SessionStore for Arc<S>
where
	S: ?Sized + SessionStore,
{
	fn get(&self, key: &str) -> Option<String> {
		S::get(self, key)
	}
}

/// Error type produced by writable [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SessionError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
