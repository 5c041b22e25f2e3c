// self
use crate::obs::{Operation, Outcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_outcome(operation: Operation, outcome: Outcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"wapi_session_operation_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Records a transient response that triggered a retry.
pub fn record_retry(status: u16) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("wapi_session_retry_total", "status" => status.to_string()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = status;
	}
}
