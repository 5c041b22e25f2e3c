// std
use std::{io::Write, time::Duration};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use wapi::{
	Session,
	config::ConfigSource,
	error::{AuthError, ConfigError, Error},
	http::ReqwestHttpClient,
	session::RetryPolicy,
};

const TOKEN_BODY: &str =
	"{\"access_token\":\"api-token\",\"token_type\":\"bearer\",\"expires_in\":3600}";

fn builder() -> wapi::SessionBuilder {
	let client = ReqwestHttpClient::with_timeout(Duration::from_secs(10))
		.expect("Reqwest client should build for tests.");

	Session::builder().http_client(client).retry_policy(RetryPolicy::NONE)
}

fn mock_curve(server: &MockServer) -> httpmock::Mock<'_> {
	server.mock(|when, then| {
		when.method(GET)
			.path("/api/curves/get")
			.query_param("id", "11")
			.header("authorization", "Bearer api-token");
		then.status(200).header("content-type", "application/json").json_body(json!({
			"id": 11,
			"name": "de wind",
			"frequency": "H",
			"time_zone": "CET",
			"curve_type": "TIME_SERIES",
		}));
	})
}

#[test]
fn credentials_sign_requests_with_a_single_token_fetch() {
	let server = MockServer::start();
	let token = server.mock(|when, then| {
		when.method(POST)
			.path("/oauth2/token")
			.header_exists("authorization")
			.body_includes("grant_type=client_credentials");
		then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
	});
	let curve = mock_curve(&server);
	let session = builder()
		.urlbase(server.base_url())
		.credentials("client", "secret", Some(&server.base_url()))
		.build()
		.expect("Configured session should build.");

	assert!(session.is_configured());

	session.get_curve_by_id(11).expect("Signed lookup should succeed.");
	session
		.data_request(&wapi::session::DataRequest::get("/api/curves/get?id=11"))
		.expect("Second signed request should succeed.");

	token.assert_calls(1);
	curve.assert_calls(2);
}

#[test]
fn rejected_credentials_abort_the_call() {
	let server = MockServer::start();
	let token = server.mock(|when, then| {
		when.method(POST).path("/oauth2/token");
		then.status(401)
			.header("content-type", "application/json")
			.body("{\"error\":\"invalid_client\",\"error_description\":\"bad secret\"}");
	});
	let curve = mock_curve(&server);
	let session = builder()
		.urlbase(server.base_url())
		.credentials("client", "wrong", Some(&server.base_url()))
		.build()
		.expect("Configuring does not contact the token endpoint.");

	token.assert_calls(0);

	let err = session.get_curve_by_id(11).expect_err("Rejected credentials must fail.");

	assert!(matches!(err, Error::Auth(AuthError::Rejected { .. })));

	token.assert_calls(1);
	curve.assert_calls(0);
}

#[test]
fn config_file_sets_urlbase_and_auth() {
	let server = MockServer::start();
	let token = server.mock(|when, then| {
		when.method(POST).path("/oauth2/token");
		then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
	});
	let curve = mock_curve(&server);
	let mut file = tempfile();

	write!(
		file.1,
		"[common]\nurlbase = {base}\nauth_type = OAuth\n\n[OAuth]\nid = client\nsecret = secret\nauth_urlbase = {base}\n",
		base = server.base_url()
	)
	.expect("Config file should be writable.");

	let session =
		builder().config_file(file.0.as_path()).build().expect("Config file should apply.");

	assert_eq!(session.urlbase().as_str().trim_end_matches('/'), server.base_url());

	session.get_curve_by_id(11).expect("Configured lookup should succeed.");

	token.assert_calls(1);
	curve.assert_calls(1);

	let err = session
		.configure("client", "secret", None)
		.expect_err("Configuring twice must fail.");

	assert!(matches!(err, Error::Config(ConfigError::AlreadyConfigured)));

	std::fs::remove_file(&file.0).expect("Temporary config file should be removable.");
}

#[test]
fn config_file_errors_leave_the_session_untouched() {
	let session = builder().build().expect("Unconfigured session should build.");
	let err = session
		.read_config_file(ConfigSource::text(
			"[common]\nurlbase = https://changed.example.com\nauth_type = OAuth\n[OAuth]\nid = a\n",
		))
		.expect_err("Incomplete OAuth sections must fail.");

	assert!(matches!(err, Error::Config(ConfigError::MissingKey { key: "secret", .. })));
	assert_eq!(session.urlbase().as_str(), "https://api.wattsight.com/");
	assert!(!session.is_configured());

	let err = session
		.read_config_file(std::path::Path::new("/nonexistent/wapi.ini"))
		.expect_err("Missing files must fail.");

	assert!(matches!(err, Error::Config(ConfigError::ConfigFile { .. })));

	session
		.read_config_file(ConfigSource::text(
			"[common]\nurlbase = https://changed.example.com\nauth_type = None\n",
		))
		.expect("Non-OAuth files only move the urlbase.");

	assert_eq!(session.urlbase().as_str(), "https://changed.example.com/");
	assert!(!session.is_configured());

	session.configure("id", "secret", None).expect("Auth is still configurable.");
}

fn tempfile() -> (std::path::PathBuf, std::fs::File) {
	let path = std::env::temp_dir().join(format!(
		"wapi-config-{}-{:?}.ini",
		std::process::id(),
		std::thread::current().id()
	));
	let file = std::fs::File::create(&path).expect("Temporary config file should be creatable.");

	(path, file)
}
