//! Request dispatch with bounded retry.
//!
//! [`Session::data_request`] resolves the target URL, encodes the body, signs the request
//! through the configured [`AuthProvider`](crate::auth::AuthProvider), and sends it over the
//! session's shared transport. Responses with status 5xx or 408 are re-sent after a fixed
//! delay until the retry budget is spent; every other response, and the last transient one,
//! is returned untouched. HTTP status never turns into an error at this layer.

// std
use std::thread;
// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use oauth2::{
	HttpRequest,
	http::{
		HeaderMap, HeaderValue, Method, Uri,
		header::{AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	Session,
	auth::Secret,
	error::{AuthError, ConfigError},
	http::ApiResponse,
	obs::{self, Operation},
};

/// Number of re-sends allowed after the first attempt.
pub const DEFAULT_RETRIES: u32 = 4;
/// Fixed pause between attempts.
pub const DEFAULT_RETRY_DELAY: StdDuration = StdDuration::from_millis(500);

/// Retry budget and delay applied to transient responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
	/// Additional attempts permitted after the first one.
	pub retries: u32,
	/// Pause before each additional attempt; never grows.
	pub delay: StdDuration,
}
impl RetryPolicy {
	/// Policy that never re-sends.
	pub const NONE: Self = Self { retries: 0, delay: StdDuration::ZERO };

	/// Overrides the retry budget.
	pub fn with_retries(mut self, retries: u32) -> Self {
		self.retries = retries;

		self
	}

	/// Overrides the delay between attempts.
	pub fn with_delay(mut self, delay: StdDuration) -> Self {
		self.delay = delay;

		self
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self { retries: DEFAULT_RETRIES, delay: DEFAULT_RETRY_DELAY }
	}
}

/// Outgoing structured payload.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestData {
	/// Value serialized to JSON.
	Json(JsonValue),
	/// Pre-serialized JSON text, sent verbatim.
	Text(String),
}

/// Explicit HTTP Basic credentials that replace any provider-supplied `Authorization` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicAuth {
	/// User name.
	pub username: String,
	/// Optional password.
	pub password: Option<Secret>,
}
impl BasicAuth {
	fn header_value(&self) -> Result<HeaderValue, AuthError> {
		let password = self.password.as_ref().map(Secret::expose).unwrap_or_default();
		let encoded = STANDARD.encode(format!("{}:{password}", self.username));
		let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
			.map_err(|_| AuthError::InvalidHeaderValue)?;

		value.set_sensitive(true);

		Ok(value)
	}
}

/// Parameters of a single API call.
#[derive(Clone, Debug)]
pub struct DataRequest {
	/// HTTP method.
	pub method: Method,
	/// Base URL override; the session's urlbase is used when absent.
	pub urlbase: Option<String>,
	/// Path (optionally with a query string) joined onto the base URL.
	pub path: String,
	/// Structured payload; takes precedence over `raw`.
	pub data: Option<RequestData>,
	/// Raw payload used only when `data` is absent.
	pub raw: Option<Vec<u8>>,
	/// Explicit Basic credentials.
	pub basic_auth: Option<BasicAuth>,
	/// Retry budget override; the session policy applies when absent.
	pub retries: Option<u32>,
}
impl DataRequest {
	/// Creates a request for `method` and `path` with no body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			urlbase: None,
			path: path.into(),
			data: None,
			raw: None,
			basic_auth: None,
			retries: None,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Resolves the path against `urlbase` instead of the session's.
	pub fn with_urlbase(mut self, urlbase: impl Into<String>) -> Self {
		self.urlbase = Some(urlbase.into());

		self
	}

	/// Sends `value` serialized as JSON.
	pub fn with_json(mut self, value: JsonValue) -> Self {
		self.data = Some(RequestData::Json(value));

		self
	}

	/// Sends already-serialized JSON text.
	pub fn with_text(mut self, text: impl Into<String>) -> Self {
		self.data = Some(RequestData::Text(text.into()));

		self
	}

	/// Sends raw bytes.
	pub fn with_raw(mut self, raw: impl Into<Vec<u8>>) -> Self {
		self.raw = Some(raw.into());

		self
	}

	/// Signs the request with explicit Basic credentials.
	pub fn with_basic_auth(
		mut self,
		username: impl Into<String>,
		password: Option<impl Into<String>>,
	) -> Self {
		self.basic_auth =
			Some(BasicAuth { username: username.into(), password: password.map(Secret::new) });

		self
	}

	/// Overrides the retry budget for this call.
	pub fn with_retries(mut self, retries: u32) -> Self {
		self.retries = Some(retries);

		self
	}

	/// Encoded body and its content type.
	fn body(&self) -> Option<(Vec<u8>, &'static str)> {
		match (&self.data, &self.raw) {
			(Some(RequestData::Json(value)), _) =>
				Some((value.to_string().into_bytes(), "application/json")),
			(Some(RequestData::Text(text)), _) =>
				Some((text.clone().into_bytes(), "application/json")),
			(None, Some(raw)) => Some((raw.clone(), "application/octet-stream")),
			(None, None) => None,
		}
	}
}

impl Session {
	/// Runs an API call, re-sending it while the response is transient and budget remains.
	///
	/// Auth is validated afresh before every attempt. The returned response may still carry an
	/// error status; only URL, auth, and transport failures are reported as `Err`.
	pub fn data_request(&self, request: &DataRequest) -> Result<ApiResponse> {
		obs::observe(Operation::DataRequest, "data_request", || {
			let url = self.resolve_url(request)?;
			let body = request.body();
			let delay = self.0.retry_policy.delay;
			let mut remaining = request.retries.unwrap_or(self.0.retry_policy.retries);

			loop {
				let response = self.send_once(request, &url, body.as_ref())?;

				if !response.is_transient() || remaining == 0 {
					return Ok(response);
				}

				remaining -= 1;

				obs::record_retry(response.status());
				obs::trace_retry(response.status(), remaining, delay);

				if !delay.is_zero() {
					thread::sleep(delay);
				}
			}
		})
	}

	fn resolve_url(&self, request: &DataRequest) -> Result<Url> {
		let base = match &request.urlbase {
			Some(raw) => Url::parse(raw).map_err(|e| ConfigError::invalid_url(raw.as_str(), e))?,
			None => self.urlbase(),
		};

		base.join(&request.path)
			.map_err(|e| ConfigError::invalid_url(request.path.as_str(), e).into())
	}

	fn send_once(
		&self,
		request: &DataRequest,
		url: &Url,
		body: Option<&(Vec<u8>, &'static str)>,
	) -> Result<ApiResponse> {
		let bytes = body.map(|(bytes, _)| bytes.as_slice());
		let mut headers = HeaderMap::new();

		if let Some((_, content_type)) = body {
			headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
		}
		if let Some(auth) = self.auth() {
			auth.validate_auth(self.0.http_client.as_ref())?;
			headers.extend(auth.headers(bytes)?);
		}
		if let Some(basic) = &request.basic_auth {
			headers.insert(AUTHORIZATION, basic.header_value()?);
		}

		let mut http_request = HttpRequest::new(bytes.map(<[u8]>::to_vec).unwrap_or_default());

		*http_request.method_mut() = request.method.clone();
		*http_request.uri_mut() = Uri::try_from(url.as_str())
			.map_err(|e| ConfigError::from(oauth2::http::Error::from(e)))?;
		*http_request.headers_mut() = headers;

		Ok(self.0.http_client.execute(http_request)?.into())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn structured_data_wins_over_raw() {
		let request = DataRequest::post("/x")
			.with_raw(b"raw".to_vec())
			.with_json(serde_json::json!({ "a": 1 }));

		assert_eq!(request.body(), Some((b"{\"a\":1}".to_vec(), "application/json")));

		let request = DataRequest::post("/x").with_text("[1]").with_raw(b"raw".to_vec());

		assert_eq!(request.body(), Some((b"[1]".to_vec(), "application/json")));
	}

	#[test]
	fn raw_body_is_verbatim_and_empty_is_none() {
		let request = DataRequest::post("/x").with_raw(b"grant_type=client_credentials".to_vec());

		assert_eq!(
			request.body(),
			Some((b"grant_type=client_credentials".to_vec(), "application/octet-stream"))
		);
		assert_eq!(DataRequest::get("/x").body(), None);
	}

	#[test]
	fn basic_auth_header_is_encoded() {
		let auth = BasicAuth { username: "user".into(), password: Some(Secret::new("pass")) };
		let value = auth.header_value().expect("Basic header should encode.");

		assert_eq!(value.to_str().ok(), Some("Basic dXNlcjpwYXNz"));
		assert!(value.is_sensitive());
	}

	#[test]
	fn default_policy_matches_constants() {
		let policy = RetryPolicy::default();

		assert_eq!(policy.retries, 4);
		assert_eq!(policy.delay, StdDuration::from_millis(500));
		assert_eq!(policy.with_retries(0).with_delay(StdDuration::ZERO), RetryPolicy::NONE);
	}
}
