//! Session-level error types shared across configuration, dispatch, and curve construction.

// self
use crate::_prelude::*;

/// Session-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical session error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem or misuse of the write-once auth slot.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// API-level semantic failure (bad lookup parameters, failed responses, bad metadata).
	#[error(transparent)]
	Metadata(#[from] MetadataError),
	/// Curve-type tag outside the closed registry.
	#[error(transparent)]
	Curve(#[from] CurveError),
	/// Token acquisition or header production failed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Response body could not be interpreted.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration failures raised while setting up a session.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Authentication has already been configured for this session.
	#[error("Session configuration is already done.")]
	AlreadyConfigured,
	/// A configured base URL cannot be parsed.
	#[error("URL `{value}` is invalid.")]
	InvalidUrl {
		/// Raw value supplied by the caller or configuration file.
		value: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Configuration file could not be read or parsed.
	#[error("Configuration file could not be loaded.")]
	ConfigFile {
		/// Underlying read or parse failure.
		#[source]
		source: BoxError,
	},
	/// A mandatory configuration key is absent.
	#[error("Configuration section `{section}` is missing the `{key}` key.")]
	MissingKey {
		/// Section that was expected to carry the key.
		section: String,
		/// Missing key name.
		key: &'static str,
	},
	/// No transport was supplied and the default one is compiled out.
	#[error("No HTTP client is available; supply one or enable the `reqwest` feature.")]
	MissingHttpClient,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a configuration read or parse failure inside [`ConfigError`].
	pub fn config_file(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::ConfigFile { source: Box::new(src) }
	}

	pub(crate) fn invalid_url(value: impl Into<String>, source: url::ParseError) -> Self {
		Self::InvalidUrl { value: value.into(), source }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// API-level failures: invalid lookups, rejected responses, and incomplete metadata.
#[derive(Debug, ThisError)]
pub enum MetadataError {
	/// Curve lookup was attempted without an id or a name.
	#[error("No curve specified.")]
	NoCurveSpecified,
	/// Search criterion outside the allowed key set.
	#[error("Illegal search parameter `{key}`.")]
	InvalidSearchKey {
		/// Offending criterion key.
		key: String,
	},
	/// Attribute name outside the allowed attribute set.
	#[error("Attribute `{name}` is not valid.")]
	InvalidAttribute {
		/// Offending attribute name.
		name: String,
	},
	/// A mandatory metadata key is absent from a curve record.
	#[error("Mandatory key `{key}` not found in metadata.")]
	MissingKey {
		/// Missing key name.
		key: &'static str,
	},
	/// The curve id cannot be converted to an integer.
	#[error("Curve id `{value}` is not a valid integer.")]
	InvalidId {
		/// Raw id value rendered as text.
		value: String,
	},
	/// The API answered a curve or attribute request with a non-success status.
	#[error("{operation} failed with status {status}: {body}")]
	RequestFailed {
		/// Human-readable operation label.
		operation: String,
		/// HTTP status code returned by the API.
		status: u16,
		/// Decoded response body.
		body: String,
	},
}

/// Curve construction failures.
#[derive(Debug, ThisError)]
pub enum CurveError {
	/// The curve-type tag is not part of the registry.
	#[error("Unknown curve type `{tag}`.")]
	UnknownType {
		/// Offending tag.
		tag: String,
	},
}

/// Authentication failures raised by auth providers.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint refused to issue a token.
	#[error("Token endpoint rejected the client: {reason}.")]
	Rejected {
		/// Provider-supplied reason string.
		reason: String,
	},
	/// Headers were requested before a token was obtained.
	#[error("No access token is available; validate the provider first.")]
	MissingToken,
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// The issued token cannot be encoded as a header value.
	#[error("Access token contains characters that are not valid in a header.")]
	InvalidHeaderValue,
}

/// Response bodies that cannot be interpreted.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Body was expected to be JSON of a given shape but was not.
	#[error("Response with status {status} carried malformed JSON.")]
	MalformedJson {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Token endpoint responded with a body that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
