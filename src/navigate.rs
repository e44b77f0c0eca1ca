//! Navigation target used to hand control to the re-authentication flow.

// crates.io
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
// self
use crate::_prelude::*;

/// Presentation-layer collaborator that performs a forced navigation.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Navigates to `path` (an absolute path on the backend's origin).
	fn navigate(&self, path: &str);
}

/// Navigator that forwards every requested path over an unbounded channel.
///
/// A UI event loop owns the receiver and performs the actual navigation. Requests are dropped
/// once the receiver is gone.
#[derive(Clone, Debug)]
pub struct ChannelNavigator(UnboundedSender<String>);
impl ChannelNavigator {
	/// Creates the navigator and the receiving half.
	pub fn new() -> (Self, UnboundedReceiver<String>) {
		let (tx, rx) = mpsc::unbounded_channel();

		(Self(tx), rx)
	}
}
impl Navigator for ChannelNavigator {
	fn navigate(&self, path: &str) {
		if self.0.send(path.to_owned()).is_err() {
			#[cfg(feature = "tracing")]
			tracing::warn!(path, "navigation receiver dropped");
		}
	}
}

/// Navigator that keeps every requested path in memory, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator(Arc<Mutex<Vec<String>>>);
impl RecordingNavigator {
	/// Returns a snapshot of the navigations requested so far.
	pub fn paths(&self) -> Vec<String> {
		self.0.lock().clone()
	}
}
impl Navigator for RecordingNavigator {
	fn navigate(&self, path: &str) {
		self.0.lock().push(path.to_owned());
	}
}
