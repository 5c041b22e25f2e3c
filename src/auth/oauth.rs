//! OAuth 2.0 client-credentials provider backed by the `oauth2` crate.
//!
//! The provider is cheap to construct: no token is requested until the dispatcher first calls
//! [`AuthProvider::validate_auth`]. Token exchanges go through the session's own transport via
//! [`SyncTransport`], authenticate with HTTP Basic, and are serialized by the token mutex so
//! concurrent callers wait for a single refresh instead of stampeding the token endpoint.

// crates.io
use oauth2::{
	ClientId, ClientSecret, RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError, BasicTokenType},
	http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, AuthProvider, Secret},
	error::{AuthError, ConfigError, ProtocolError, TransportError},
	http::{ApiHttpClient, SyncTransport},
	obs::{self, Operation},
};

/// Auth host used when a caller configures credentials without one.
pub const DEFAULT_AUTH_URLBASE: &str = "https://auth.wattsight.com/";

const TOKEN_PATH: &str = "/oauth2/token";

/// Client-credentials provider producing `Authorization` headers.
pub struct OAuth {
	client_id: String,
	client_secret: Secret,
	auth_urlbase: Url,
	token_url: Url,
	token: Mutex<Option<AccessToken>>,
}
impl OAuth {
	/// Creates a provider for the given client, defaulting the auth host to
	/// [`DEFAULT_AUTH_URLBASE`].
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		auth_urlbase: Option<&str>,
	) -> Result<Self> {
		let raw = auth_urlbase.unwrap_or(DEFAULT_AUTH_URLBASE);
		let auth_urlbase = Url::parse(raw).map_err(|e| ConfigError::invalid_url(raw, e))?;
		let token_url =
			auth_urlbase.join(TOKEN_PATH).map_err(|e| ConfigError::invalid_url(raw, e))?;

		Ok(Self {
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
			auth_urlbase,
			token_url,
			token: Mutex::new(None),
		})
	}

	/// OAuth client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Auth host the token endpoint is resolved against.
	pub fn auth_urlbase(&self) -> &Url {
		&self.auth_urlbase
	}

	/// Fully resolved token endpoint.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}

	/// Snapshot of the currently held token, if any.
	pub fn token(&self) -> Option<AccessToken> {
		self.token.lock().clone()
	}

	fn request_token(&self, http: &dyn ApiHttpClient) -> Result<AccessToken> {
		let client = BasicClient::new(ClientId::new(self.client_id.clone()))
			.set_client_secret(ClientSecret::new(self.client_secret.expose().to_owned()))
			.set_token_uri(TokenUrl::from_url(self.token_url.clone()));
		let response = client
			.exchange_client_credentials()
			.request(&SyncTransport(http))
			.map_err(map_request_error)?;
		let expires_in = response.expires_in().ok_or(AuthError::MissingExpiresIn)?.as_secs();
		let expires_in = i64::try_from(expires_in).map_err(|_| AuthError::ExpiresInOutOfRange)?;
		let token_type = match response.token_type() {
			BasicTokenType::Bearer => "Bearer".to_owned(),
			other => other.as_ref().to_owned(),
		};

		Ok(AccessToken::new(
			token_type,
			response.access_token().secret().to_owned(),
			OffsetDateTime::now_utc(),
			Duration::seconds(expires_in),
		))
	}
}
impl AuthProvider for OAuth {
	fn validate_auth(&self, http: &dyn ApiHttpClient) -> Result<()> {
		let mut token = self.token.lock();

		if token.as_ref().is_some_and(|t| !t.is_expired_at(OffsetDateTime::now_utc())) {
			return Ok(());
		}

		let fresh =
			obs::observe(Operation::TokenRefresh, "validate_auth", || self.request_token(http))?;

		obs::trace_token_refresh(fresh.valid_until);

		*token = Some(fresh);

		Ok(())
	}

	fn headers(&self, _body: Option<&[u8]>) -> Result<HeaderMap> {
		let token = self.token.lock();
		let token = token.as_ref().ok_or(AuthError::MissingToken)?;
		let mut value = HeaderValue::from_str(&token.authorization())
			.map_err(|_| AuthError::InvalidHeaderValue)?;

		value.set_sensitive(true);

		let mut headers = HeaderMap::new();

		headers.insert(AUTHORIZATION, value);

		Ok(headers)
	}
}
impl Debug for OAuth {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth")
			.field("client_id", &self.client_id)
			.field("auth_urlbase", &self.auth_urlbase.as_str())
			.field("token_set", &self.token.lock().is_some())
			.finish()
	}
}

fn map_request_error(err: BasicRequestTokenError<TransportError>) -> Error {
	match err {
		RequestTokenError::ServerResponse(response) => {
			let reason = match response.error_description() {
				Some(description) => format!("{}: {description}", response.error().as_ref()),
				None => response.error().as_ref().to_owned(),
			};

			AuthError::Rejected { reason }.into()
		},
		RequestTokenError::Request(error) => error.into(),
		RequestTokenError::Parse(source, _body) => ProtocolError::TokenResponse { source }.into(),
		RequestTokenError::Other(message) => AuthError::Rejected { reason: message }.into(),
	}
}
