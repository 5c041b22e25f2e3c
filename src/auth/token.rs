//! Access-token state held by auth providers.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping client secrets and access tokens out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);
impl Secret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Secret").field(&"<redacted>").finish()
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Access token issued by the token endpoint, with the instant it stops being trusted.
#[derive(Clone, Debug)]
pub struct AccessToken {
	/// Scheme used in the `Authorization` header (for example `Bearer`).
	pub token_type: String,
	/// Token value.
	pub secret: Secret,
	/// Instant after which the token must be refreshed.
	pub valid_until: OffsetDateTime,
}
impl AccessToken {
	/// Safety margin subtracted from `expires_in` so a token is never sent right as it lapses.
	pub const EXPIRY_MARGIN: Duration = Duration::seconds(5);

	/// Builds a token that was issued at `issued_at` and expires after `expires_in`.
	pub fn new(
		token_type: impl Into<String>,
		secret: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Self {
		Self {
			token_type: token_type.into(),
			secret: Secret::new(secret),
			valid_until: issued_at + expires_in - Self::EXPIRY_MARGIN,
		}
	}

	/// Returns `true` once `now` has reached the token's trusted lifetime.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.valid_until
	}

	/// Renders the `Authorization` header value.
	pub fn authorization(&self) -> String {
		format!("{} {}", self.token_type, self.secret.expose())
	}
}
