//! User-facing notification sink driven by the pipeline's failure paths.

// self
use crate::_prelude::*;

/// Severity attached to a [`Notification`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
	/// Informational message.
	Info,
	/// Successful outcome.
	Success,
	/// Recoverable problem.
	Warning,
	/// Failed call.
	Error,
}
impl Severity {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Severity::Info => "info",
			Severity::Success => "success",
			Severity::Warning => "warning",
			Severity::Error => "error",
		}
	}
}
impl Display for Severity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Message handed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
	/// Short title.
	pub title: String,
	/// Body text; may be empty.
	pub message: String,
	/// Severity.
	pub severity: Severity,
}
impl Notification {
	/// Builds an error-severity notification.
	pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
		Self { title: title.into(), message: message.into(), severity: Severity::Error }
	}
}

/// Presentation-layer collaborator that surfaces notifications to the user.
///
/// Called inline from the pipeline; implementations must return quickly and never block on
/// user interaction.
pub trait Notifier
where
	Self: Send + Sync,
{
	/// Surfaces `notification`.
	fn notify(&self, notification: Notification);
}

/// Notifier that writes every notification to the `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;
impl Notifier for TracingNotifier {
	fn notify(&self, notification: Notification) {
		#[cfg(feature = "tracing")]
		{
			let Notification { title, message, severity } = &notification;

			match severity {
				Severity::Error => tracing::error!(%title, %message, "notification"),
				Severity::Warning => tracing::warn!(%title, %message, "notification"),
				Severity::Info | Severity::Success =>
					tracing::info!(%title, %message, %severity, "notification"),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = notification;
		}
	}
}

/// Notifier that keeps every notification in memory, in arrival order.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier(Arc<Mutex<Vec<Notification>>>);
impl RecordingNotifier {
	/// Returns a snapshot of the notifications received so far.
	pub fn notifications(&self) -> Vec<Notification> {
		self.0.lock().clone()
	}

	/// Removes and returns the notifications received so far.
	pub fn drain(&self) -> Vec<Notification> {
		std::mem::take(&mut *self.0.lock())
	}
}
impl Notifier for RecordingNotifier {
	fn notify(&self, notification: Notification) {
		self.0.lock().push(notification);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_notifier_keeps_order_and_drains() {
		let notifier = RecordingNotifier::default();
		let shared = notifier.clone();

		notifier.notify(Notification::error("Conflict", "duplicate"));
		notifier.notify(Notification::error("Network error", "connection refused"));

		let seen = shared.drain();

		assert_eq!(seen.len(), 2);
		assert_eq!(seen[0].title, "Conflict");
		assert_eq!(seen[1].severity, Severity::Error);
		assert!(notifier.notifications().is_empty());
	}

	#[test]
	fn tracing_notifier_accepts_every_severity() {
		for severity in [Severity::Info, Severity::Success, Severity::Warning, Severity::Error] {
			TracingNotifier.notify(Notification {
				title: "title".into(),
				message: severity.to_string(),
				severity,
			});
		}
	}
}
