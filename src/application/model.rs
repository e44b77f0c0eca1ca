//! Wire models of the application registry.

// std
use std::{borrow::Borrow, ops::Deref};
// crates.io
use serde::{Deserializer, de::DeserializeOwned};
// self
use crate::_prelude::*;

macro_rules! def_wire_enum {
	($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
		$(#[$meta])*
		#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		pub enum $name {
			$(
				$(#[$vmeta])*
				#[serde(rename = $wire)]
				$variant,
			)+
		}
		impl $name {
			/// Every variant, in declaration order.
			pub const ALL: &'static [Self] = &[$(Self::$variant),+];

			/// Returns the wire identifier.
			pub const fn as_str(self) -> &'static str {
				match self {
					$(Self::$variant => $wire,)+
				}
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self.as_str())
			}
		}
	};
}

def_wire_enum! {
	/// Scope an application may request.
	Scope {
		/// OpenID Connect authentication.
		Openid => "openid",
		/// Account username.
		Username => "username",
		/// Account email address.
		Email => "email",
		/// Account phone number.
		Phone => "phone",
		/// Refresh tokens.
		OfflineAccess => "offline_access",
	}
}
def_wire_enum! {
	/// OAuth 2.0 grant an application may use.
	GrantType {
		/// Authorization Code grant.
		AuthorizationCode => "authorization_code",
		/// Client Credentials grant.
		ClientCredentials => "client_credentials",
	}
}
def_wire_enum! {
	/// Authorization endpoint response type.
	ResponseType {
		/// Authorization code.
		Code => "code",
		/// Implicit access token.
		Token => "token",
	}
}
def_wire_enum! {
	/// Client authentication method at the token endpoint.
	TokenEndpointAuthMethod {
		/// Credentials in the form body.
		ClientSecretPost => "client_secret_post",
		/// HTTP Basic credentials.
		ClientSecretBasic => "client_secret_basic",
		/// Public client.
		None => "none",
	}
}

/// Server-issued client identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);
impl ClientId {
	/// Wraps an identifier; contents are validated by the backend only.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}
}
impl Deref for ClientId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ClientId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ClientId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<String> for ClientId {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl From<&str> for ClientId {
	fn from(value: &str) -> Self {
		Self(value.to_owned())
	}
}
impl Debug for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ClientId({})", self.0)
	}
}
impl Display for ClientId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Redacted client secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);
impl ClientSecret {
	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ClientSecret").field(&"<redacted>").finish()
	}
}
impl Display for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Server-issued identity of an application. Never constructed client-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
	/// Client identifier.
	pub client_id: ClientId,
	/// Issue instant of the identifier.
	#[serde(with = "time::serde::timestamp")]
	pub client_id_issued_at: OffsetDateTime,
	/// Client secret.
	pub client_secret: ClientSecret,
	/// Expiry instant of the secret; the Unix epoch means it never expires.
	#[serde(with = "time::serde::timestamp")]
	pub client_secret_expires_at: OffsetDateTime,
}
impl ClientInfo {
	/// Expiry instant of the secret, or `None` when it never expires.
	pub fn secret_expires_at(&self) -> Option<OffsetDateTime> {
		(self.client_secret_expires_at != OffsetDateTime::UNIX_EPOCH)
			.then_some(self.client_secret_expires_at)
	}

	/// Returns true when the secret carries an expiry that has passed at `now`.
	pub fn is_secret_expired_at(&self, now: OffsetDateTime) -> bool {
		self.secret_expires_at().is_some_and(|expires_at| expires_at <= now)
	}
}

/// User-editable registration fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMetadata {
	/// Display name.
	pub client_name: String,
	/// Client home page.
	pub client_uri: String,
	/// Allowed redirect URIs, in order.
	#[serde(default, deserialize_with = "null_as_default")]
	pub redirect_uris: Vec<String>,
	/// Callbacks invoked after account registration, in order.
	#[serde(default, deserialize_with = "null_as_default")]
	pub register_callback_uris: Vec<String>,
	/// Callbacks invoked after logout, in order.
	#[serde(default, deserialize_with = "null_as_default")]
	pub logout_callback_uris: Vec<String>,
	/// Requested scopes.
	#[serde(default, deserialize_with = "null_as_default")]
	pub scope: Vec<Scope>,
	/// Allowed grants.
	#[serde(default, deserialize_with = "null_as_default")]
	pub grant_types: Vec<GrantType>,
	/// Allowed response types.
	#[serde(default, deserialize_with = "null_as_default")]
	pub response_types: Vec<ResponseType>,
	/// Token endpoint authentication method.
	pub token_endpoint_auth_method: TokenEndpointAuthMethod,
	/// Skips the consent screen when true.
	#[serde(default, deserialize_with = "null_as_default")]
	pub skip_authorization: bool,
}

/// A registered OAuth 2.0 client, identified by its [`ClientId`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
	/// Server-issued identity.
	pub client_info: ClientInfo,
	/// Registration fields.
	pub client_metadata: ClientMetadata,
}
impl Application {
	/// Identity of the application.
	pub fn client_id(&self) -> &ClientId {
		&self.client_info.client_id
	}
}

/// Registry listing returned by the collection endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationList {
	/// Applications owned by the current account.
	#[serde(default, deserialize_with = "null_as_default")]
	pub applications: Vec<Application>,
	/// Count reported by the backend.
	pub number: u64,
}

/// Payload for registering an application or replacing its metadata.
///
/// Optional fields are omitted from the JSON body when unset. Updates replace the metadata as a
/// whole; build them with [`From<&ClientMetadata>`] to start from the stored values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationReqParams {
	/// Display name; registration only.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub client_name: Option<String>,
	/// Client home page.
	pub client_uri: String,
	/// Allowed redirect URIs.
	pub redirect_uris: Vec<String>,
	/// Skips the consent screen when true.
	pub skip_authorization: bool,
	/// Callbacks invoked after account registration.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub register_callback_uris: Option<Vec<String>>,
	/// Callbacks invoked after logout.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub logout_callback_uris: Option<Vec<String>>,
	/// Requested scopes.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub scope: Option<Vec<Scope>>,
	/// Allowed grants.
	pub grant_types: Vec<GrantType>,
	/// Allowed response types.
	pub response_types: Vec<ResponseType>,
	/// Token endpoint authentication method.
	pub token_endpoint_auth_method: TokenEndpointAuthMethod,
}
impl ApplicationReqParams {
	/// Starts a registration payload for an authorization-code client using HTTP Basic auth.
	pub fn new(client_name: impl Into<String>, client_uri: impl Into<String>) -> Self {
		Self {
			client_name: Some(client_name.into()),
			client_uri: client_uri.into(),
			redirect_uris: Vec::new(),
			skip_authorization: false,
			register_callback_uris: None,
			logout_callback_uris: None,
			scope: None,
			grant_types: vec![GrantType::AuthorizationCode],
			response_types: vec![ResponseType::Code],
			token_endpoint_auth_method: TokenEndpointAuthMethod::ClientSecretBasic,
		}
	}

	/// Replaces the redirect URIs.
	pub fn with_redirect_uris<I, S>(mut self, uris: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.redirect_uris = uris.into_iter().map(Into::into).collect();

		self
	}

	/// Replaces the register and logout callback URIs.
	pub fn with_callback_uris<I, J, S>(mut self, register: I, logout: J) -> Self
	where
		I: IntoIterator<Item = S>,
		J: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.register_callback_uris = Some(register.into_iter().map(Into::into).collect());
		self.logout_callback_uris = Some(logout.into_iter().map(Into::into).collect());

		self
	}

	/// Replaces the requested scopes.
	pub fn with_scope(mut self, scope: impl IntoIterator<Item = Scope>) -> Self {
		self.scope = Some(scope.into_iter().collect());

		self
	}

	/// Replaces the allowed grants and response types.
	pub fn with_flows(
		mut self,
		grant_types: impl IntoIterator<Item = GrantType>,
		response_types: impl IntoIterator<Item = ResponseType>,
	) -> Self {
		self.grant_types = grant_types.into_iter().collect();
		self.response_types = response_types.into_iter().collect();

		self
	}

	/// Overrides the token endpoint authentication method.
	pub fn with_auth_method(mut self, method: TokenEndpointAuthMethod) -> Self {
		self.token_endpoint_auth_method = method;

		self
	}

	/// Overrides the consent-skipping flag.
	pub fn with_skip_authorization(mut self, skip: bool) -> Self {
		self.skip_authorization = skip;

		self
	}
}
impl From<&ClientMetadata> for ApplicationReqParams {
	/// Builds a full-replace update payload; the display name is fixed at registration.
	fn from(metadata: &ClientMetadata) -> Self {
		Self {
			client_name: None,
			client_uri: metadata.client_uri.clone(),
			redirect_uris: metadata.redirect_uris.clone(),
			skip_authorization: metadata.skip_authorization,
			register_callback_uris: Some(metadata.register_callback_uris.clone()),
			logout_callback_uris: Some(metadata.logout_callback_uris.clone()),
			scope: Some(metadata.scope.clone()),
			grant_types: metadata.grant_types.clone(),
			response_types: metadata.response_types.clone(),
			token_endpoint_auth_method: metadata.token_endpoint_auth_method,
		}
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + DeserializeOwned,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
