//! Blocking client session for the Wattsight curve API: configure OAuth once, dispatch requests
//! with bounded retry, and resolve typed curve variants through per-session id/name caches.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod curve;
pub mod error;
pub mod http;
pub mod obs;
pub mod session;

pub use session::{Session, SessionBuilder};
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{http::ReqwestHttpClient, session::RetryPolicy};

	/// Builds a blocking reqwest HTTP client that accepts the self-signed certificates produced
	/// by `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestBlockingClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.timeout(StdDuration::from_secs(10))
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs an unconfigured [`Session`](crate::Session) pointed at `urlbase`, backed by
	/// the test reqwest transport and a retry policy without delay.
	pub fn build_test_session(urlbase: &str) -> crate::Session {
		crate::Session::builder()
			.urlbase(urlbase)
			.http_client(test_reqwest_http_client())
			.retry_policy(RetryPolicy::default().with_delay(StdDuration::ZERO))
			.build()
			.expect("Failed to build test session.")
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::{Arc, Weak},
		time::Duration as StdDuration,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Error as ReqwestError, blocking::Client as ReqwestBlockingClient};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use oauth2;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
