//! Curve search criteria.

// crates.io
use url::form_urlencoded;
// self
use crate::{_prelude::*, error::MetadataError};

/// Criterion keys accepted by the search endpoint.
pub const SEARCH_TERMS: [&str; 15] = [
	"query",
	"id",
	"name",
	"commodity",
	"category",
	"area",
	"station",
	"source",
	"scenario",
	"unit",
	"time_zone",
	"version",
	"frequency",
	"data_type",
	"curve_state",
];

/// Value of one search criterion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchValue {
	/// Single `key=value` pair.
	One(String),
	/// One `key=value` pair per element, in order.
	Many(Vec<String>),
}
impl From<&str> for SearchValue {
	fn from(value: &str) -> Self {
		Self::One(value.to_owned())
	}
}
impl From<String> for SearchValue {
	fn from(value: String) -> Self {
		Self::One(value)
	}
}
impl From<u64> for SearchValue {
	fn from(value: u64) -> Self {
		Self::One(value.to_string())
	}
}
impl From<Vec<String>> for SearchValue {
	fn from(values: Vec<String>) -> Self {
		Self::Many(values)
	}
}
impl From<Vec<&str>> for SearchValue {
	fn from(values: Vec<&str>) -> Self {
		Self::Many(values.into_iter().map(str::to_owned).collect())
	}
}
impl From<&[&str]> for SearchValue {
	fn from(values: &[&str]) -> Self {
		Self::Many(values.iter().map(|value| (*value).to_owned()).collect())
	}
}
impl<const N: usize> From<[&str; N]> for SearchValue {
	fn from(values: [&str; N]) -> Self {
		Self::Many(values.into_iter().map(str::to_owned).collect())
	}
}

/// Ordered set of search criteria, validated against [`SEARCH_TERMS`] when encoded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
	criteria: Vec<(String, SearchValue)>,
}
impl SearchQuery {
	/// Creates an empty query, matching every curve.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a criterion.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<SearchValue>) -> Self {
		self.criteria.push((key.into(), value.into()));

		self
	}

	/// Criteria in insertion order.
	pub fn criteria(&self) -> &[(String, SearchValue)] {
		&self.criteria
	}

	/// Rejects the first key outside [`SEARCH_TERMS`].
	pub fn validate(&self) -> Result<(), MetadataError> {
		match self.criteria.iter().find(|(key, _)| !SEARCH_TERMS.contains(&key.as_str())) {
			Some((key, _)) => Err(MetadataError::InvalidSearchKey { key: key.clone() }),
			None => Ok(()),
		}
	}

	/// Encodes the criteria as an `&`-joined, form-encoded query string (without `?`).
	pub fn to_query_string(&self) -> Result<String, MetadataError> {
		self.validate()?;

		let mut serializer = form_urlencoded::Serializer::new(String::new());

		for (key, value) in &self.criteria {
			match value {
				SearchValue::One(value) => {
					serializer.append_pair(key, value);
				},
				SearchValue::Many(values) =>
					for value in values {
						serializer.append_pair(key, value);
					},
			}
		}

		Ok(serializer.finish())
	}
}
