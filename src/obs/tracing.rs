//! Span and event helpers for the blocking session.
//!
//! Session calls never cross an `.await`, so a span is entered once at the top of an operation
//! and its guard is dropped when the operation returns; retries and token refreshes inside it
//! are recorded as events on that span rather than as child spans.

// self
use crate::{_prelude::*, obs::Operation};

/// A span builder used by session operations.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(operation: Operation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("wapi.session", operation = operation.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Enters the span for the remainder of the current blocking call.
	pub fn entered(self) -> OperationSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OperationSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			OperationSpanGuard {}
		}
	}
}

/// RAII guard returned by [`OperationSpan::entered`].
pub struct OperationSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for OperationSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OperationSpanGuard(..)")
	}
}

/// Emits a warning before the dispatcher sleeps and re-sends a request.
pub fn trace_retry(status: u16, remaining: u32, delay: StdDuration) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(status, remaining, delay_ms = delay.as_millis() as u64, "retrying request");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (status, remaining, delay);
	}
}

/// Emits a debug event once a fresh access token has been stored.
pub fn trace_token_refresh(valid_until: OffsetDateTime) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(%valid_until, "access token refreshed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = valid_until;
	}
}
