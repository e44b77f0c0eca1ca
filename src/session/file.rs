//! File-backed [`SessionStore`] so a credential survives process restarts.

// std
use std::{
	fs::{self, File},
	io::{self, Write},
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	session::{SessionError, SessionStore},
};

/// Persists session entries as a JSON object after each mutation.
#[derive(Clone, Debug)]
pub struct FileSessionStore {
	path: PathBuf,
	inner: Arc<RwLock<BTreeMap<String, String>>>,
}
impl FileSessionStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing entries.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Stores `value` under `key` and persists the snapshot.
	pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Result<(), SessionError> {
		let mut guard = self.inner.write();

		guard.insert(key.into(), value.into());

		self.persist_locked(&guard)
	}

	/// Removes the entry under `key` and persists the snapshot when something changed.
	pub fn remove(&self, key: &str) -> Result<Option<String>, SessionError> {
		let mut guard = self.inner.write();
		let removed = guard.remove(key);

		if removed.is_some() {
			self.persist_locked(&guard)?;
		}

		Ok(removed)
	}

	/// Path of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<BTreeMap<String, String>, SessionError> {
		if !path.exists() {
			return Ok(BTreeMap::new());
		}

		let bytes = fs::read(path).map_err(|e| SessionError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(BTreeMap::new());
		}

		serde_json::from_slice(&bytes).map_err(|e| SessionError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), SessionError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| SessionError::Backend {
				message: format!("Failed to create session directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &BTreeMap<String, String>) -> Result<(), SessionError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| SessionError::Serialization {
				message: format!("Failed to serialize session snapshot: {e}"),
			})?;

		write_atomically(&self.path, &serialized).map_err(|e| SessionError::Backend {
			message: format!("Failed to persist {}: {e}", self.path.display()),
		})
	}
}
impl SessionStore for FileSessionStore {
	fn get(&self, key: &str) -> Option<String> {
		self.inner.read().get(key).cloned()
	}
}

/// Replaces `path` with `bytes` through a synced sibling file so readers never see a torn write.
fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
	let staging = path.with_extension("tmp");
	let mut file = File::create(&staging)?;

	file.write_all(bytes)?;
	file.sync_all()?;
	drop(file);

	fs::rename(&staging, path)
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;

	fn temp_path(tag: &str) -> PathBuf {
		let unique = format!(
			"authhub_client_session_{tag}_{}_{}.json",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	#[test]
	fn set_and_reload_round_trip() {
		let path = temp_path("reload");
		let store = FileSessionStore::open(&path).expect("Failed to open session store.");

		store.set("oauth2_token", "persisted-token").expect("Failed to persist credential.");
		drop(store);

		let reopened = FileSessionStore::open(&path).expect("Failed to reopen session store.");

		assert_eq!(reopened.get("oauth2_token").as_deref(), Some("persisted-token"));
		assert_eq!(
			reopened.remove("oauth2_token").expect("Failed to remove credential.").as_deref(),
			Some("persisted-token"),
		);
		assert!(FileSessionStore::open(&path).expect("Reopen").get("oauth2_token").is_none());

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary session snapshot {}: {e}", path.display())
		});
	}

	#[test]
	fn corrupt_snapshot_is_reported() {
		let path = temp_path("corrupt");

		fs::write(&path, b"not json").expect("Failed to write corrupt fixture.");

		let err = FileSessionStore::open(&path).expect_err("Corrupt snapshot should be rejected.");

		assert!(matches!(err, SessionError::Serialization { .. }));

		fs::remove_file(&path).unwrap_or_else(|e| {
			panic!("Failed to remove temporary session snapshot {}: {e}", path.display())
		});
	}
}
