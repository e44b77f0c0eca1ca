mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use authhub_client::{
	application::{ApplicationReqParams, ClientId, Scope},
	error::{Error, TransportError},
	notify::Notification,
	pipeline::{AUTH_EXPIRED_TITLE, JSON_CONTENT_TYPE, NETWORK_ERROR_TITLE},
};
use common::*;

fn application(client_id: &str, name: &str) -> Value {
	json!({
		"client_info": {
			"client_id": client_id,
			"client_id_issued_at": 1_700_000_000,
			"client_secret": "s3cr3t",
			"client_secret_expires_at": 0
		},
		"client_metadata": {
			"client_name": name,
			"client_uri": "https://app.example.com",
			"redirect_uris": ["https://app.example.com/callback"],
			"register_callback_uris": null,
			"logout_callback_uris": [],
			"scope": ["openid", "email"],
			"grant_types": ["authorization_code"],
			"response_types": ["code"],
			"token_endpoint_auth_method": "client_secret_basic",
			"skip_authorization": false
		}
	})
}

#[tokio::test]
async fn list_decodes_applications_and_sends_interception_headers() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/oauth2/applications")
				.header("content-type", JSON_CONTENT_TYPE)
				.header("authorization", TOKEN);
			then.status(200).json_body(json!({
				"code": 200,
				"data": {
					"applications": [application("a1", "first"), application("a2", "second")],
					"number": 2
				}
			}));
		})
		.await;
	let harness = build_harness(&server.base_url());
	let list = harness.client.list().await?;

	mock.assert_async().await;

	assert_eq!(list.number, 2);
	assert_eq!(list.applications[0].client_id().as_ref(), "a1");
	assert_eq!(list.applications[1].client_metadata.client_name, "second");
	assert!(list.applications[0].client_metadata.register_callback_uris.is_empty());
	assert!(list.applications[0].client_info.secret_expires_at().is_none());
	assert!(harness.notifier.notifications().is_empty());

	Ok(())
}

#[tokio::test]
async fn create_posts_params_and_surfaces_business_rejection() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/oauth2/applications/register")
				.header("authorization", TOKEN)
				.json_body(json!({
					"client_name": "demo",
					"client_uri": "https://demo.example.com",
					"redirect_uris": [],
					"skip_authorization": false,
					"scope": ["openid"],
					"grant_types": ["authorization_code"],
					"response_types": ["code"],
					"token_endpoint_auth_method": "client_secret_basic"
				}));
			then.status(200).json_body(json!({
				"code": 409,
				"message": "application name already taken",
				"label": "Conflict"
			}));
		})
		.await;
	let harness = build_harness(&server.base_url());
	let params =
		ApplicationReqParams::new("demo", "https://demo.example.com").with_scope([Scope::Openid]);
	let err = harness.client.create(&params).await.expect_err("Code 409 should fail the call.");

	mock.assert_async().await;

	let failure = err.business_failure().expect("Rejection should carry the envelope.");

	assert_eq!(failure.code, 409);
	assert_eq!(failure.label.as_deref(), Some("Conflict"));
	assert_eq!(
		harness.notifier.notifications(),
		[Notification::error("Conflict", "application name already taken")]
	);
	assert!(harness.navigator.paths().is_empty());
}

#[tokio::test]
async fn read_with_expired_session_schedules_login_navigation() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/oauth2/applications/a1");
			then.status(200).json_body(json!({ "code": 1201, "message": "token expired" }));
		})
		.await;
	let harness = build_harness(&server.base_url());

	harness.session.remove(TOKEN_KEY);

	let err = harness
		.client
		.read(&ClientId::from("a1"))
		.await
		.expect_err("Code 1201 should fail the call.");

	mock.assert_async().await;

	assert!(matches!(err, Error::AuthExpired(_)));
	assert_eq!(
		harness.notifier.notifications(),
		[Notification::error(AUTH_EXPIRED_TITLE, "token expired")]
	);
	assert_eq!(wait_for_navigation(&harness.navigator).await, ["/oauth/authorize/login"]);
}

#[tokio::test]
async fn update_and_delete_target_the_resource_path() -> color_eyre::Result<()> {
	let server = MockServer::start_async().await;
	let update = server
		.mock_async(|when, then| {
			when.method(PUT).path("/oauth2/applications/a1");
			then.status(200).json_body(json!({ "code": 200, "data": { "updated": true } }));
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/oauth2/applications/a1");
			then.status(200).json_body(json!({ "code": 204 }));
		})
		.await;
	let harness = build_harness(&server.base_url());
	let id = ClientId::from("a1");
	let metadata: authhub_client::application::Application =
		serde_json::from_value(application("a1", "first"))?;
	let params = ApplicationReqParams::from(&metadata.client_metadata);
	let updated = harness.client.update(&id, &params).await?;
	let deleted = harness.client.delete(&id).await?;

	update.assert_async().await;
	delete.assert_async().await;

	assert_eq!(updated, json!({ "updated": true }));
	assert_eq!(deleted, Value::Null);
	assert!(harness.notifier.notifications().is_empty());

	Ok(())
}

#[tokio::test]
async fn unreachable_backend_reports_network_error() {
	let harness = build_harness("http://127.0.0.1:1");
	let err = harness
		.client
		.delete(&ClientId::from("a1"))
		.await
		.expect_err("Closed ports should fail the call.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })));

	let seen = harness.notifier.notifications();

	assert_eq!(seen.len(), 1);
	assert_eq!(seen[0].title, NETWORK_ERROR_TITLE);
	assert!(harness.navigator.paths().is_empty());
}
