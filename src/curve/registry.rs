//! Closed registry mapping curve-type tags to variant constructors.

// self
use crate::{
	_prelude::*,
	curve::{Curve, CurveCore, InstanceCurve, TaggedCurve, TaggedInstanceCurve, TimeSeriesCurve},
	error::CurveError,
};

type Constructor = fn(CurveCore) -> Curve;

/// Tag and constructor per [`CurveType`], indexed by discriminant.
const REGISTRY: [(&str, Constructor); 4] = [
	("TIME_SERIES", |core| TimeSeriesCurve::new(core).into()),
	("TAGGED", |core| TaggedCurve::new(core).into()),
	("INSTANCES", |core| InstanceCurve::new(core).into()),
	("TAGGED_INSTANCES", |core| TaggedInstanceCurve::new(core).into()),
];

/// Structural curve variants known to the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurveType {
	/// Plain time series.
	TimeSeries = 0,
	/// Time series split by tag.
	Tagged = 1,
	/// Forecast-style series identified by issue date.
	Instances = 2,
	/// Instances split by tag.
	TaggedInstances = 3,
}
impl CurveType {
	/// Every registered type, in registry order.
	pub const ALL: [CurveType; 4] =
		[CurveType::TimeSeries, CurveType::Tagged, CurveType::Instances, CurveType::TaggedInstances];

	/// Returns the API tag for this type.
	pub const fn as_str(self) -> &'static str {
		REGISTRY[self as usize].0
	}

	/// Resolves an API tag, rejecting anything outside the registry.
	pub fn from_tag(tag: &str) -> Result<Self, CurveError> {
		Self::ALL
			.into_iter()
			.find(|curve_type| curve_type.as_str() == tag)
			.ok_or_else(|| CurveError::UnknownType { tag: tag.to_owned() })
	}

	pub(crate) fn construct(self, core: CurveCore) -> Curve {
		(REGISTRY[self as usize].1)(core)
	}
}
impl Display for CurveType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for CurveType {
	type Err = CurveError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_tag(s)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn tags_round_trip_through_registry() {
		for curve_type in CurveType::ALL {
			assert_eq!(CurveType::from_tag(curve_type.as_str()).ok(), Some(curve_type));
		}

		assert_eq!(CurveType::TaggedInstances.to_string(), "TAGGED_INSTANCES");
	}

	#[test]
	fn serde_uses_api_tags() {
		for curve_type in CurveType::ALL {
			let payload =
				serde_json::to_string(&curve_type).expect("Curve type should serialize.");

			assert_eq!(payload, format!("\"{curve_type}\""));
		}
	}

	#[test]
	fn unknown_tags_are_rejected() {
		let err = "SPREADSHEET".parse::<CurveType>().expect_err("Unknown tag must fail.");

		assert!(matches!(err, CurveError::UnknownType { ref tag } if tag == "SPREADSHEET"));
		assert!(CurveType::from_tag("time_series").is_err());
	}

	#[test]
	fn constructors_produce_matching_variants() {
		for curve_type in CurveType::ALL {
			let curve = curve_type.construct(CurveCore::uninitialized(7, curve_type, Weak::new()));

			assert_eq!(curve.curve_type(), curve_type);
			assert_eq!(curve.id(), 7);
		}
	}
}
