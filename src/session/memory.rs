//! Thread-safe in-memory [`SessionStore`] for embedded use and tests.

// self
use crate::{_prelude::*, session::SessionStore};

/// Process-local session store backed by a shared map.
///
/// Clones share the same map, so a login flow holding one clone is observed by every pipeline
/// holding another.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore(Arc<RwLock<HashMap<String, String>>>);
impl MemorySessionStore {
	/// Builds a store pre-populated with a single entry.
	pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
		let store = Self::default();

		store.set(key, value);

		store
	}

	/// Stores `value` under `key`, returning the previous value.
	pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.0.write().insert(key.into(), value.into())
	}

	/// Removes the entry under `key`, returning it.
	pub fn remove(&self, key: &str) -> Option<String> {
		self.0.write().remove(key)
	}
}
impl SessionStore for MemorySessionStore {
	fn get(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}
}
