//! Demonstrates configuring a session with OAuth client credentials, looking a curve up, and
//! searching, all against a local mock of the curve API.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use wapi::{
	Session,
	session::{RetryPolicy, SearchQuery},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start();

	server.mock(|when, then| {
		when.method(POST).path("/oauth2/token");
		then.status(200).header("content-type", "application/json").body(
			"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900}",
		);
	});
	server.mock(|when, then| {
		when.method(GET).path("/api/curves/get").query_param("name", "pri de spot €/mwh cet h a");
		then.status(200).header("content-type", "application/json").json_body(json!({
			"id": 1001,
			"name": "pri de spot €/mwh cet h a",
			"frequency": "H",
			"time_zone": "CET",
			"curve_type": "TIME_SERIES",
			"unit": "€/MWh",
		}));
	});
	server.mock(|when, then| {
		when.method(GET).path("/api/curves").query_param("area", "DE");
		then.status(200).header("content-type", "application/json").json_body(json!([{
			"id": 2002,
			"name": "pro de wnd ec00 mwh/h cet min15 f",
			"frequency": "MIN15",
			"time_zone": "CET",
			"curve_type": "INSTANCES",
		}]));
	});

	let session = Session::builder()
		.urlbase(server.base_url())
		.credentials("demo-client", "demo-secret", Some(&server.base_url()))
		.retry_policy(RetryPolicy::default().with_delay(Duration::from_millis(100)))
		.build()?;
	let curve = session.get_curve_by_name("pri de spot €/mwh cet h a")?;

	println!(
		"Looked up curve {} ({}) of type {}.",
		curve.id(),
		curve.frequency().unwrap_or("?"),
		curve.curve_type()
	);

	for curve in session.search(&SearchQuery::new().with("area", "DE"))? {
		println!("Search hit: {} -> {:?}.", curve.id(), curve.name());
	}

	println!("Curves cached by the session: {}.", session.cached_curve_count());

	Ok(())
}
