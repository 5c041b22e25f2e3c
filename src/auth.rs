//! Authentication contract consumed by the session dispatcher and the built-in OAuth provider.

pub mod oauth;
pub mod token;

pub use oauth::*;
pub use token::*;

// crates.io
use oauth2::http::HeaderMap;
// self
use crate::{_prelude::*, http::ApiHttpClient};

/// Owner of credentials and a refreshable token that signs outbound API requests.
///
/// The dispatcher calls [`validate_auth`](AuthProvider::validate_auth) before every attempt,
/// retries included, and then merges the headers returned by
/// [`headers`](AuthProvider::headers) into the request. Implementations hold their token
/// state behind interior mutability so one provider can serve concurrent callers.
pub trait AuthProvider
where
	Self: Debug + Send + Sync,
{
	/// Ensures a usable token is held, refreshing it over `http` when it has expired.
	///
	/// Failing here aborts the whole API call.
	fn validate_auth(&self, http: &dyn ApiHttpClient) -> Result<()>;

	/// Produces the signing headers for a request carrying `body`.
	fn headers(&self, body: Option<&[u8]>) -> Result<HeaderMap>;
}
