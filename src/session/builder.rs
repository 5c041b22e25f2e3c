//! Session builder. Configuration applies in a fixed order: config file, else explicit
//! credentials, then the urlbase override.

// self
use crate::{
	_prelude::*,
	Session,
	auth::Secret,
	config::ConfigSource,
	error::ConfigError,
	http::{ApiHttpClient, DEFAULT_TIMEOUT},
	session::RetryPolicy,
};

struct Credentials {
	client_id: String,
	client_secret: Secret,
	auth_urlbase: Option<String>,
}

/// Assembles a [`Session`] and applies its one-time configuration.
pub struct SessionBuilder {
	urlbase: Option<String>,
	config: Option<ConfigSource>,
	credentials: Option<Credentials>,
	http_client: Option<Arc<dyn ApiHttpClient>>,
	retry_policy: RetryPolicy,
	timeout: StdDuration,
}
impl SessionBuilder {
	/// Overrides the API host after any configuration file has been applied.
	pub fn urlbase(mut self, urlbase: impl Into<String>) -> Self {
		self.urlbase = Some(urlbase.into());

		self
	}

	/// Reads auth (and possibly the urlbase) from a configuration source.
	///
	/// Takes precedence over [`credentials`](Self::credentials).
	pub fn config_file(mut self, source: impl Into<ConfigSource>) -> Self {
		self.config = Some(source.into());

		self
	}

	/// Shorthand for [`config_file`](Self::config_file) with in-memory INI text.
	pub fn config_str(self, text: impl Into<String>) -> Self {
		self.config_file(ConfigSource::text(text))
	}

	/// Configures OAuth client credentials directly.
	pub fn credentials(
		mut self,
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		auth_urlbase: Option<&str>,
	) -> Self {
		self.credentials = Some(Credentials {
			client_id: client_id.into(),
			client_secret: Secret::new(client_secret),
			auth_urlbase: auth_urlbase.map(str::to_owned),
		});

		self
	}

	/// Replaces the default reqwest transport.
	pub fn http_client(mut self, http_client: impl ApiHttpClient) -> Self {
		self.http_client = Some(Arc::new(http_client));

		self
	}

	/// Overrides the retry budget and delay.
	pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
		self.retry_policy = retry_policy;

		self
	}

	/// Per-call timeout for the default transport (60 seconds unless overridden).
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Builds the session and applies its configuration.
	pub fn build(self) -> Result<Session> {
		let http_client = match self.http_client {
			Some(http_client) => http_client,
			None => default_http_client(self.timeout)?,
		};
		let session = Session::from_parts(http_client, self.retry_policy);

		if let Some(source) = self.config {
			session.read_config_file(source)?;
		} else if let Some(credentials) = self.credentials {
			session.configure(
				credentials.client_id,
				credentials.client_secret.expose(),
				credentials.auth_urlbase.as_deref(),
			)?;
		}
		if let Some(urlbase) = self.urlbase {
			session.set_urlbase(&urlbase)?;
		}

		Ok(session)
	}
}
impl Default for SessionBuilder {
	fn default() -> Self {
		Self {
			urlbase: None,
			config: None,
			credentials: None,
			http_client: None,
			retry_policy: RetryPolicy::default(),
			timeout: DEFAULT_TIMEOUT,
		}
	}
}
impl Debug for SessionBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionBuilder")
			.field("urlbase", &self.urlbase)
			.field("config", &self.config)
			.field("credentials_set", &self.credentials.is_some())
			.field("http_client_set", &self.http_client.is_some())
			.field("retry_policy", &self.retry_policy)
			.field("timeout", &self.timeout)
			.finish()
	}
}

#[cfg(feature = "reqwest")]
fn default_http_client(timeout: StdDuration) -> Result<Arc<dyn ApiHttpClient>, ConfigError> {
	Ok(Arc::new(crate::http::ReqwestHttpClient::with_timeout(timeout)?))
}

#[cfg(not(feature = "reqwest"))]
fn default_http_client(_timeout: StdDuration) -> Result<Arc<dyn ApiHttpClient>, ConfigError> {
	Err(ConfigError::MissingHttpClient)
}
