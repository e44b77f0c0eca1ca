//! Application registry client: typed list/create/read/update/delete over the pipeline.
//!
//! Every operation is one HTTP call with a fixed resource path. Field contents (scope legality,
//! URI shape) are validated by the backend only, and nothing is cached or retried here.

pub mod model;

pub use model::*;

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	http::HttpTransport,
	pipeline::{Pipeline, RequestOptions},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Collection endpoint of the application registry.
pub const APPLICATIONS_PATH: &str = "/oauth2/applications";
/// Registration endpoint of the application registry.
pub const REGISTER_PATH: &str = "/oauth2/applications/register";

#[cfg(feature = "reqwest")]
/// Application client specialized for the crate's default reqwest transport.
pub type ReqwestApplicationClient = ApplicationClient<ReqwestTransport>;

/// Typed client for the application registry.
pub struct ApplicationClient<T>
where
	T: ?Sized + HttpTransport,
{
	pipeline: Pipeline<T>,
}
impl<T> ApplicationClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps a pipeline.
	pub fn new(pipeline: Pipeline<T>) -> Self {
		Self { pipeline }
	}

	/// Pipeline the client issues calls through.
	pub fn pipeline(&self) -> &Pipeline<T> {
		&self.pipeline
	}

	/// Lists the applications owned by the current account.
	pub async fn list(&self) -> Result<ApplicationList> {
		self.pipeline.get(APPLICATIONS_PATH, RequestOptions::default()).await
	}

	/// Registers a new application; the backend acknowledgement is returned untyped.
	pub async fn create(&self, params: &ApplicationReqParams) -> Result<Value> {
		self.pipeline.post(REGISTER_PATH, Some(params), RequestOptions::default()).await
	}

	/// Fetches one application.
	pub async fn read(&self, client_id: &ClientId) -> Result<Application> {
		self.pipeline.get(&resource_path(client_id), RequestOptions::default()).await
	}

	/// Replaces the metadata of one application.
	pub async fn update(&self, client_id: &ClientId, params: &ApplicationReqParams) -> Result<Value> {
		self.pipeline.put(&resource_path(client_id), Some(params), RequestOptions::default()).await
	}

	/// Deletes one application.
	pub async fn delete(&self, client_id: &ClientId) -> Result<Value> {
		self.pipeline.delete(&resource_path(client_id), RequestOptions::default()).await
	}
}
impl<T> Clone for ApplicationClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { pipeline: self.pipeline.clone() }
	}
}
impl<T> Debug for ApplicationClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApplicationClient").field("pipeline", &self.pipeline).finish()
	}
}

/// Single-resource path with the identifier encoded as exactly one path segment.
///
/// Identifiers that encode to an empty or dot segment are rejected by the pipeline before dispatch.
fn resource_path(client_id: &ClientId) -> String {
	format!("{APPLICATIONS_PATH}/{}", urlencoding::encode(client_id))
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::Method;
	use serde_json::json;
	// self
	use super::*;
	use crate::{_preludet::*, error::ConfigError};

	fn application(client_id: &str) -> Value {
		json!({
			"client_info": {
				"client_id": client_id,
				"client_id_issued_at": 1_700_000_000,
				"client_secret": "secret",
				"client_secret_expires_at": 0
			},
			"client_metadata": {
				"client_name": client_id,
				"client_uri": "https://app.example.com",
				"redirect_uris": [],
				"register_callback_uris": [],
				"logout_callback_uris": [],
				"scope": ["openid"],
				"grant_types": ["authorization_code"],
				"response_types": ["code"],
				"token_endpoint_auth_method": "client_secret_basic",
				"skip_authorization": false
			}
		})
	}

	#[tokio::test]
	async fn identifiers_stay_within_one_resource_segment() {
		let transport = ScriptedTransport::envelope(json!({ "code": 200, "data": {} }));
		let client = ApplicationClient::new(build_test_pipeline(transport.clone()).pipeline);

		for id in ["a/b", "a b", "%2E%2E", "a?b#c"] {
			client.delete(&ClientId::from(id)).await.expect("Encodable identifiers should dispatch.");
		}

		let paths: Vec<String> =
			transport.take_requests().iter().map(|request| request.uri().path().to_owned()).collect();

		assert_eq!(
			paths,
			[
				"/oauth2/applications/a%2Fb",
				"/oauth2/applications/a%20b",
				"/oauth2/applications/%252E%252E",
				"/oauth2/applications/a%3Fb%23c",
			]
		);
	}

	#[tokio::test]
	async fn empty_and_dot_identifiers_are_rejected_before_dispatch() {
		let transport = ScriptedTransport::envelope(json!({ "code": 200, "data": {} }));
		let harness = build_test_pipeline(transport.clone());
		let client = ApplicationClient::new(harness.pipeline.clone());
		let params = ApplicationReqParams::new("demo", "https://demo.example.com");

		for id in ["..", ".", ""] {
			let id = ClientId::from(id);
			let errors = [
				client.read(&id).await.map(|_| ()).expect_err("Read should be rejected."),
				client.update(&id, &params).await.map(|_| ()).expect_err("Update should be rejected."),
				client.delete(&id).await.map(|_| ()).expect_err("Delete should be rejected."),
			];

			for err in errors {
				assert!(matches!(err, Error::Config(ConfigError::UnsafePath { .. })), "{err:?}");
			}
		}

		assert!(transport.take_requests().is_empty());
		assert_eq!(harness.notifier.notifications().len(), 9);
	}

	#[tokio::test]
	async fn operations_use_fixed_paths_and_verbs() {
		let transport = ScriptedTransport::envelope(json!({ "code": 200, "data": {} }));
		let client = ApplicationClient::new(build_test_pipeline(transport.clone()).pipeline);
		let id = ClientId::from("abc");
		let params = ApplicationReqParams::new("demo", "https://demo.example.com");

		client.create(&params).await.expect("Create should succeed.");
		client.update(&id, &params).await.expect("Update should succeed.");
		client.delete(&id).await.expect("Delete should succeed.");

		let seen: Vec<(Method, String)> = transport
			.take_requests()
			.iter()
			.map(|request| (request.method().clone(), request.uri().path().to_owned()))
			.collect();

		assert_eq!(
			seen,
			[
				(Method::POST, "/oauth2/applications/register".to_owned()),
				(Method::PUT, "/oauth2/applications/abc".to_owned()),
				(Method::DELETE, "/oauth2/applications/abc".to_owned()),
			]
		);
	}

	#[tokio::test]
	async fn list_and_read_decode_typed_payloads() {
		let transport = ScriptedTransport::respond(|request| {
			let data = if request.uri().path() == APPLICATIONS_PATH {
				json!({ "applications": [application("a"), application("b")], "number": 2 })
			} else {
				application("a")
			};

			Ok(json_response(200, &json!({ "code": 200, "data": data })))
		});
		let client = ApplicationClient::new(build_test_pipeline(transport).pipeline);
		let list = client.list().await.expect("List should succeed.");
		let app = client.read(&ClientId::from("a")).await.expect("Read should succeed.");

		assert_eq!(list.number, 2);
		assert_eq!(list.applications.len(), 2);
		assert_eq!(list.applications[1].client_id().as_ref(), "b");
		assert_eq!(app.client_id().as_ref(), "a");
	}
}
