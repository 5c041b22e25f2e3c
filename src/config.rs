//! Session configuration files.
//!
//! Files use INI syntax with a `common` section and, when `auth_type = OAuth`, an `OAuth`
//! section carrying the client credentials:
//!
//! ```ini
//! [common]
//! urlbase = https://api.wattsight.com
//! auth_type = OAuth
//!
//! [OAuth]
//! id = my-client
//! secret = my-secret
//! auth_urlbase = https://auth.wattsight.com
//! ```

// std
use std::{
	io::Read,
	path::{Path, PathBuf},
};
// crates.io
use ini::{Ini, ParseOption, Properties};
// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

const COMMON_SECTION: &str = "common";
const OAUTH_AUTH_TYPE: &str = "OAuth";

/// Where a configuration file is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
	/// File on disk.
	Path(PathBuf),
	/// In-memory INI text.
	Text(String),
}
impl ConfigSource {
	/// Wraps in-memory INI text.
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(value.into())
	}

	/// Drains `reader` into an in-memory source.
	pub fn from_reader(mut reader: impl Read) -> Result<Self, ConfigError> {
		let mut buf = String::new();

		reader.read_to_string(&mut buf).map_err(ConfigError::config_file)?;

		Ok(Self::Text(buf))
	}

	/// Parses the source into the fields a session consumes.
	pub fn load(&self) -> Result<SessionConfig, ConfigError> {
		let ini = match self {
			Self::Path(path) =>
				Ini::load_from_file_opt(path, verbatim()).map_err(ConfigError::config_file)?,
			Self::Text(text) =>
				Ini::load_from_str_opt(text, verbatim()).map_err(ConfigError::config_file)?,
		};

		SessionConfig::from_ini(&ini)
	}
}
impl From<PathBuf> for ConfigSource {
	fn from(path: PathBuf) -> Self {
		Self::Path(path)
	}
}
impl From<&Path> for ConfigSource {
	fn from(path: &Path) -> Self {
		Self::Path(path.to_owned())
	}
}

/// Fields read from a configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
	/// Replacement API host, when the file names one.
	pub urlbase: Option<String>,
	/// OAuth credentials, present only when `auth_type = OAuth`.
	pub oauth: Option<OAuthConfig>,
}
impl SessionConfig {
	fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
		let Some(common) = ini.section(Some(COMMON_SECTION)) else {
			return Ok(Self::default());
		};
		let urlbase = common.get("urlbase").map(str::to_owned);
		let oauth = match common.get("auth_type") {
			Some(OAUTH_AUTH_TYPE) => {
				let section = ini.section(Some(OAUTH_AUTH_TYPE)).ok_or_else(|| {
					ConfigError::MissingKey { section: OAUTH_AUTH_TYPE.into(), key: "id" }
				})?;

				Some(OAuthConfig {
					client_id: required(section, "id")?.to_owned(),
					client_secret: Secret::new(required(section, "secret")?),
					auth_urlbase: required(section, "auth_urlbase")?.to_owned(),
				})
			},
			_ => None,
		};

		Ok(Self { urlbase, oauth })
	}
}

/// OAuth credentials read from the `OAuth` section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthConfig {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: Secret,
	/// Auth host the token endpoint is resolved against.
	pub auth_urlbase: String,
}

// Values such as secrets are taken byte for byte: no escape processing, no quote stripping.
fn verbatim() -> ParseOption {
	ParseOption { enabled_escape: false, enabled_quote: false, ..Default::default() }
}

fn required<'a>(section: &'a Properties, key: &'static str) -> Result<&'a str, ConfigError> {
	section
		.get(key)
		.ok_or_else(|| ConfigError::MissingKey { section: OAUTH_AUTH_TYPE.into(), key })
}
