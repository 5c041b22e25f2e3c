// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use wapi::{
	Session,
	curve::CurveType,
	error::{Error, MetadataError, ProtocolError},
	http::ReqwestHttpClient,
	session::{AttributeValues, RetryPolicy, SearchQuery},
};

fn build_session(server: &MockServer) -> Session {
	let client = ReqwestHttpClient::with_timeout(Duration::from_secs(10))
		.expect("Reqwest client should build for tests.");

	Session::builder()
		.urlbase(server.base_url())
		.http_client(client)
		.retry_policy(RetryPolicy::default().with_delay(Duration::ZERO))
		.build()
		.expect("Session pointed at the mock server should build.")
}

fn curve_record(id: u64, name: &str, curve_type: &str) -> serde_json::Value {
	json!({
		"id": id,
		"name": name,
		"frequency": "H",
		"time_zone": "CET",
		"curve_type": curve_type,
		"unit": "MW",
	})
}

#[test]
fn get_curve_caches_by_id_and_name() {
	let server = MockServer::start();
	let session = build_session(&server);
	let mock = server.mock(|when, then| {
		when.method(GET).path("/api/curves/get").query_param("id", "42");
		then.status(200)
			.header("content-type", "application/json")
			.json_body(curve_record(42, "pro no spot ec00 mw/h", "INSTANCES"));
	});
	let first = session.get_curve(Some(42), None).expect("Lookup by id should succeed.");
	let second = session.get_curve_by_id(42).expect("Cached lookup by id should succeed.");
	let by_name = session
		.get_curve_by_name("pro no spot ec00 mw/h")
		.expect("Cached lookup by name should succeed.");

	mock.assert_calls(1);

	assert!(Arc::ptr_eq(&first, &second));
	assert!(Arc::ptr_eq(&first, &by_name));
	assert_eq!(first.curve_type(), CurveType::Instances);
	assert!(first.as_instance().is_some());
	assert_eq!(first.attribute("unit"), Some(&json!("MW")));
}

#[test]
fn get_curve_by_name_queries_the_name_once() {
	let server = MockServer::start();
	let session = build_session(&server);
	let mock = server.mock(|when, then| {
		when.method(GET).path("/api/curves/get").query_param("name", "Oslo Temp");
		then.status(200)
			.header("content-type", "application/json")
			.json_body(curve_record(7, "Oslo Temp", "TIME_SERIES"));
	});
	let curve = session.get_curve_by_name("Oslo Temp").expect("Lookup by name should succeed.");

	session.get_curve_by_name("Oslo Temp").expect("Cached lookup by name should succeed.");

	mock.assert_calls(1);

	assert_eq!(curve.id(), 7);
	assert_eq!(session.cached_curve_id("Oslo Temp"), Some(7));
}

#[test]
fn get_curve_reports_failed_lookup() {
	let server = MockServer::start();
	let session = build_session(&server);
	let mock = server.mock(|when, then| {
		when.method(GET).path("/api/curves/get");
		then.status(404).body("curve not found");
	});
	let err = session.get_curve_by_id(1).expect_err("Unknown curves must fail.");

	mock.assert_calls(1);

	match err {
		Error::Metadata(MetadataError::RequestFailed { status, body, .. }) => {
			assert_eq!(status, 404);
			assert_eq!(body, "curve not found");
		},
		other => panic!("Unexpected error: {other:?}."),
	}
	assert_eq!(session.cached_curve_count(), 0);
}

#[test]
fn get_curve_rejects_incomplete_and_malformed_metadata() {
	let server = MockServer::start();
	let session = build_session(&server);

	server.mock(|when, then| {
		when.method(GET).path("/api/curves/get").query_param("id", "1");
		then.status(200).header("content-type", "application/json").json_body(json!({
			"id": 1,
			"name": "No Zone",
			"frequency": "H",
			"curve_type": "TIME_SERIES",
		}));
	});
	server.mock(|when, then| {
		when.method(GET).path("/api/curves/get").query_param("id", "2");
		then.status(200).header("content-type", "application/json").body("{not json");
	});

	let err = session.get_curve_by_id(1).expect_err("Incomplete metadata must fail.");

	assert!(matches!(err, Error::Metadata(MetadataError::MissingKey { key: "time_zone" })));

	let err = session.get_curve_by_id(2).expect_err("Malformed JSON must fail.");

	assert!(matches!(err, Error::Protocol(ProtocolError::MalformedJson { status: 200, .. })));
	assert_eq!(session.cached_curve_count(), 0);
}

#[test]
fn search_expands_lists_and_caches_results() {
	let server = MockServer::start();
	let session = build_session(&server);
	let mock = server.mock(|when, then| {
		when.method(GET)
			.path("/api/curves")
			.query_param("area", "NO")
			.query_param("area", "SE")
			.query_param("data_type", "F");
		then.status(200).header("content-type", "application/json").json_body(json!([
			curve_record(1, "a", "TIME_SERIES"),
			curve_record(2, "b", "TAGGED"),
			curve_record(3, "c", "TAGGED_INSTANCES"),
		]));
	});
	let curves = session
		.search(&SearchQuery::new().with("area", ["NO", "SE"]).with("data_type", "F"))
		.expect("Search should succeed.");

	mock.assert_calls(1);

	assert_eq!(curves.iter().map(|curve| curve.id()).collect::<Vec<_>>(), [1, 2, 3]);
	assert!(curves[1].as_tagged().is_some());
	assert!(curves[2].as_tagged_instance().is_some());

	let cached = session.get_curve_by_name("b").expect("Searched curves should be cached.");

	assert!(Arc::ptr_eq(&cached, &curves[1]));

	mock.assert_calls(1);
}

#[test]
fn search_with_no_matches_returns_empty() {
	let server = MockServer::start();
	let session = build_session(&server);
	let mock = server.mock(|when, then| {
		when.method(GET).path("/api/curves");
		then.status(200).header("content-type", "application/json").body("[]");
	});
	let curves = session.search(&SearchQuery::new()).expect("Empty search should succeed.");

	mock.assert_calls(1);

	assert!(curves.is_empty());
}

#[test]
fn attributes_follow_response_status() {
	let server = MockServer::start();
	let session = build_session(&server);

	server.mock(|when, then| {
		when.method(GET).path("/api/areas");
		then.status(200).header("content-type", "application/json").json_body(json!([
			{ "key": "NO1", "name": "Norway 1" },
		]));
	});
	server.mock(|when, then| {
		when.method(GET).path("/api/versions");
		then.status(204);
	});
	server.mock(|when, then| {
		when.method(GET).path("/api/units");
		then.status(403).body("forbidden");
	});

	assert_eq!(
		session.get_attribute("areas").expect("Areas should load."),
		AttributeValues::Values(json!([{ "key": "NO1", "name": "Norway 1" }]))
	);
	assert_eq!(
		session.get_attribute("versions").expect("Empty attributes should load."),
		AttributeValues::NoContent
	);

	let err = session.get_attribute("units").expect_err("Forbidden attributes must fail.");

	assert!(matches!(err, Error::Metadata(MetadataError::RequestFailed { status: 403, .. })));
}

#[test]
fn server_errors_are_retried_before_reporting() {
	let server = MockServer::start();
	let session = build_session(&server);
	let mock = server.mock(|when, then| {
		when.method(GET).path("/api/curves/get");
		then.status(503).body("unavailable");
	});
	let err = session.get_curve_by_id(5).expect_err("Persistent 503s must fail.");

	mock.assert_calls(5);

	assert!(matches!(err, Error::Metadata(MetadataError::RequestFailed { status: 503, .. })));
}
