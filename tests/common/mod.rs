#![allow(dead_code)]

// std
use std::{sync::Arc, time::Duration};
// self
use authhub_client::{
	application::ApplicationClient,
	config::ClientConfig,
	http::ReqwestTransport,
	navigate::RecordingNavigator,
	notify::RecordingNotifier,
	pipeline::ReqwestPipeline,
	session::MemorySessionStore,
};

pub const TOKEN_KEY: &str = "oauth2_token";
pub const TOKEN: &str = "admin-session-token";

pub struct Harness {
	pub client: ApplicationClient<ReqwestTransport>,
	pub session: MemorySessionStore,
	pub notifier: RecordingNotifier,
	pub navigator: RecordingNavigator,
}

pub fn build_harness(base_url: &str) -> Harness {
	let config = ClientConfig::builder(base_url)
		.timeout(time::Duration::seconds(5))
		.redirect_delay(time::Duration::milliseconds(50))
		.build()
		.expect("Integration config should build.");
	let session = MemorySessionStore::with_entry(TOKEN_KEY, TOKEN);
	let notifier = RecordingNotifier::default();
	let navigator = RecordingNavigator::default();
	let pipeline = ReqwestPipeline::new(
		config,
		Arc::new(session.clone()),
		Arc::new(notifier.clone()),
		Arc::new(navigator.clone()),
	)
	.expect("Reqwest pipeline should build.");

	Harness { client: ApplicationClient::new(pipeline), session, notifier, navigator }
}

/// Polls the recording navigator until it sees a path or a generous deadline passes.
pub async fn wait_for_navigation(navigator: &RecordingNavigator) -> Vec<String> {
	for _ in 0..100 {
		let paths = navigator.paths();

		if !paths.is_empty() {
			return paths;
		}

		tokio::time::sleep(Duration::from_millis(20)).await;
	}

	navigator.paths()
}
