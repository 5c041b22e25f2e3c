//! Transport primitives for curve API calls.
//!
//! The module exposes [`ApiHttpClient`], the session's only dependency on an HTTP stack, and
//! [`ApiResponse`], the raw status/headers/body triple the dispatcher hands back to callers.
//! The same transport serves token requests: [`SyncTransport`] adapts any
//! [`ApiHttpClient`] to the `oauth2` crate's [`SyncHttpClient`] contract so the OAuth provider
//! never opens a second connection pool.

// crates.io
use oauth2::{HttpRequest, HttpResponse, SyncHttpClient, http::HeaderMap};
// self
use crate::{_prelude::*, error::ProtocolError, error::TransportError};

/// Default upper bound for a single HTTP round trip.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(60);

/// Abstraction over blocking HTTP transports.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// clone of a session and by the curves that point back to it. A call returns once the full
/// response body has been read; any HTTP status, including 4xx and 5xx, is a successful call
/// at this layer.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and returns the complete response.
	fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Raw API response returned by the dispatcher.
#[derive(Clone, Debug)]
pub struct ApiResponse(HttpResponse);
impl ApiResponse {
	/// HTTP status code.
	pub fn status(&self) -> u16 {
		self.0.status().as_u16()
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		self.0.headers()
	}

	/// Raw body bytes.
	pub fn body(&self) -> &[u8] {
		self.0.body()
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(self.body()).into_owned()
	}

	/// Whether the status lies in the 2xx range.
	pub fn is_success(&self) -> bool {
		self.0.status().is_success()
	}

	/// Whether the status is one the dispatcher retries (5xx or 408).
	pub fn is_transient(&self) -> bool {
		let status = self.status();

		(500..600).contains(&status) || status == 408
	}

	/// Parses the body as JSON into `T`.
	///
	/// Malformed or mis-shaped bodies surface as [`ProtocolError::MalformedJson`] carrying the
	/// JSON path where decoding stopped.
	pub fn json<T>(&self) -> Result<T, ProtocolError>
	where
		T: for<'de> Deserialize<'de>,
	{
		let mut de = serde_json::Deserializer::from_slice(self.body());

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ProtocolError::MalformedJson { source, status: self.status() })
	}

	/// Consumes the wrapper and returns the underlying response.
	pub fn into_inner(self) -> HttpResponse {
		self.0
	}
}
impl From<HttpResponse> for ApiResponse {
	fn from(response: HttpResponse) -> Self {
		Self(response)
	}
}

/// Borrowing adapter that lets the `oauth2` crate drive an [`ApiHttpClient`].
pub struct SyncTransport<'a>(pub &'a dyn ApiHttpClient);
impl SyncHttpClient for SyncTransport<'_> {
	type Error = TransportError;

	fn call(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
		self.0.execute(request)
	}
}
impl Debug for SyncTransport<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("SyncTransport(..)")
	}
}

/// Thin wrapper around the blocking [`ReqwestBlockingClient`] so shared HTTP behavior lives in
/// one place.
///
/// The blocking client owns its own runtime; construct it outside of any async executor.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestBlockingClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a client whose calls are bounded by `timeout`.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestBlockingClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing blocking reqwest client.
	pub fn with_client(client: ReqwestBlockingClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestBlockingClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestBlockingClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
		let request = reqwest::blocking::Request::try_from(request)?;
		let response = self.0.execute(request)?;
		let status = response.status();
		let headers = response.headers().to_owned();
		let mut response_new = HttpResponse::new(response.bytes()?.to_vec());

		*response_new.status_mut() = status;
		*response_new.headers_mut() = headers;

		Ok(response_new)
	}
}
