//! Optional observability helpers for session operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `wapi.session` with the `operation` and
//!   `stage` (call site) fields, plus events for retries and token refreshes.
//! - Enable `metrics` to increment the `wapi_session_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`, and the
//!   `wapi_session_retry_total` counter labeled by the retried `status`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Session operations observed by the instrumentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Raw dispatch through the retry loop.
	DataRequest,
	/// Single curve lookup by id or name.
	GetCurve,
	/// Curve search.
	Search,
	/// Attribute value listing.
	GetAttribute,
	/// OAuth token acquisition.
	TokenRefresh,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::DataRequest => "data_request",
			Operation::GetCurve => "get_curve",
			Operation::Search => "search",
			Operation::GetAttribute => "get_attribute",
			Operation::TokenRefresh => "token_refresh",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to a session operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Runs `f` inside an operation span, recording attempt and success/failure outcomes.
pub(crate) fn observe<T>(
	operation: Operation,
	stage: &'static str,
	f: impl FnOnce() -> Result<T>,
) -> Result<T> {
	let _guard = OperationSpan::new(operation, stage).entered();

	record_outcome(operation, Outcome::Attempt);

	let result = f();

	match &result {
		Ok(_) => record_outcome(operation, Outcome::Success),
		Err(_) => record_outcome(operation, Outcome::Failure),
	}

	result
}
