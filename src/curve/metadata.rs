//! Validation of curve metadata records returned by lookup and search endpoints.

// self
use crate::{
	_prelude::*,
	curve::{CurveId, CurveType},
	error::MetadataError,
};

/// Keys every metadata record must carry, checked in this order.
pub const MANDATORY_KEYS: [&str; 5] = ["id", "name", "frequency", "time_zone", "curve_type"];

/// Validated identity of a curve plus the full record it was read from.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveMetadata {
	id: CurveId,
	name: String,
	frequency: String,
	time_zone: String,
	curve_type: CurveType,
	record: JsonMap<String, JsonValue>,
}
impl CurveMetadata {
	/// Validates a raw record.
	///
	/// All mandatory keys are checked before anything is interpreted, so a record missing
	/// several keys reports the first one in [`MANDATORY_KEYS`] order. A key holding `null`
	/// counts as missing. The id may be a JSON integer, a whole non-negative float, or a string of
	/// digits.
	pub fn from_record(record: JsonMap<String, JsonValue>) -> Result<Self> {
		for key in MANDATORY_KEYS {
			if record.get(key).is_none_or(JsonValue::is_null) {
				return Err(MetadataError::MissingKey { key }.into());
			}
		}

		let id = coerce_id(&record["id"])?;
		let curve_type = match &record["curve_type"] {
			JsonValue::String(tag) => CurveType::from_tag(tag)?,
			other => CurveType::from_tag(&other.to_string())?,
		};

		Ok(Self {
			id,
			name: render(&record["name"]),
			frequency: render(&record["frequency"]),
			time_zone: render(&record["time_zone"]),
			curve_type,
			record,
		})
	}

	/// Curve id.
	pub fn id(&self) -> CurveId {
		self.id
	}

	/// Curve name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Frequency tag, kept opaque.
	pub fn frequency(&self) -> &str {
		&self.frequency
	}

	/// Time-zone tag, kept opaque.
	pub fn time_zone(&self) -> &str {
		&self.time_zone
	}

	/// Registered curve type.
	pub fn curve_type(&self) -> CurveType {
		self.curve_type
	}

	/// Any field of the original record (`area`, `unit`, `commodity`, ...).
	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		self.record.get(key)
	}

	/// The full original record.
	pub fn record(&self) -> &JsonMap<String, JsonValue> {
		&self.record
	}
}

fn coerce_id(value: &JsonValue) -> Result<CurveId, MetadataError> {
	let parsed = match value {
		JsonValue::Number(number) => number.as_u64().or_else(|| {
			number
				.as_f64()
				.filter(|float| float.is_finite() && float.fract() == 0.0 && *float >= 0.0)
				.filter(|float| *float < CurveId::MAX as f64)
				.map(|float| float as CurveId)
		}),
		JsonValue::String(text) => text.trim().parse().ok(),
		_ => None,
	};

	parsed.ok_or_else(|| MetadataError::InvalidId { value: render(value) })
}

fn render(value: &JsonValue) -> String {
	match value {
		JsonValue::String(text) => text.clone(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::CurveError;

	fn record(value: JsonValue) -> JsonMap<String, JsonValue> {
		match value {
			JsonValue::Object(map) => map,
			_ => panic!("Fixture must be a JSON object."),
		}
	}

	#[test]
	fn string_ids_are_coerced() {
		let metadata = CurveMetadata::from_record(record(serde_json::json!({
			"id": "42",
			"name": "Oslo Temp",
			"frequency": "H",
			"time_zone": "CET",
			"curve_type": "TIME_SERIES",
			"area": "NO1",
		})))
		.expect("Valid metadata should build.");

		assert_eq!(metadata.id(), 42);
		assert_eq!(metadata.name(), "Oslo Temp");
		assert_eq!(metadata.frequency(), "H");
		assert_eq!(metadata.time_zone(), "CET");
		assert_eq!(metadata.curve_type(), CurveType::TimeSeries);
		assert_eq!(metadata.get("area"), Some(&JsonValue::from("NO1")));
	}

	#[test]
	fn missing_keys_are_named_in_order() {
		let err = CurveMetadata::from_record(record(serde_json::json!({
			"id": 1,
			"name": "x",
			"frequency": "D",
			"time_zone": "CET",
		})))
		.expect_err("curve_type is mandatory.");

		assert!(matches!(err, Error::Metadata(MetadataError::MissingKey { key: "curve_type" })));

		let err = CurveMetadata::from_record(record(serde_json::json!({ "id": null })))
			.expect_err("Null ids count as missing.");

		assert!(matches!(err, Error::Metadata(MetadataError::MissingKey { key: "id" })));
	}

	#[test]
	fn unknown_type_is_a_curve_error() {
		let err = CurveMetadata::from_record(record(serde_json::json!({
			"id": 1,
			"name": "x",
			"frequency": "D",
			"time_zone": "CET",
			"curve_type": "MATRIX",
		})))
		.expect_err("Unknown curve types must fail.");

		assert!(matches!(err, Error::Curve(CurveError::UnknownType { ref tag }) if tag == "MATRIX"));
	}

	#[test]
	fn non_numeric_ids_are_rejected() {
		let err = CurveMetadata::from_record(record(serde_json::json!({
			"id": "abc",
			"name": "x",
			"frequency": "D",
			"time_zone": "CET",
			"curve_type": "TAGGED",
		})))
		.expect_err("Non-numeric ids must fail.");

		assert!(matches!(err, Error::Metadata(MetadataError::InvalidId { ref value }) if value == "abc"));
	}

	#[test]
	fn whole_float_ids_are_accepted() {
		let fixture = |id: JsonValue| {
			record(serde_json::json!({
				"id": id,
				"name": "x",
				"frequency": "D",
				"time_zone": "CET",
				"curve_type": "TAGGED",
			}))
		};
		let metadata = CurveMetadata::from_record(fixture(serde_json::json!(42.0)))
			.expect("Whole float ids should be accepted.");

		assert_eq!(metadata.id(), 42);

		for id in [serde_json::json!(42.5), serde_json::json!(-1.0), serde_json::json!(-3)] {
			let err = CurveMetadata::from_record(fixture(id))
				.expect_err("Fractional and negative ids must fail.");

			assert!(matches!(err, Error::Metadata(MetadataError::InvalidId { .. })));
		}
	}
}
