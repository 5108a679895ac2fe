//! Optional observability helpers for connector flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `connector_auth.flow` with the
//!   `flow` and `stage` fields, plus events for rejected callbacks. Events never carry the
//!   authorization code or the state token.
//! - Enable `metrics` to increment the `connector_auth_flow_total` counter for every
//!   attempt and terminal outcome, labeled by `flow` + `outcome`.

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the connector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Authorization-request construction.
	Authorization,
	/// Callback classification.
	Callback,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::Authorization => "authorization",
			FlowKind::Callback => "callback",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a connector helper.
	Attempt,
	/// Successful completion (URL built, code granted).
	Success,
	/// Configuration failure propagated back to the caller.
	Failure,
	/// Provider reported an error on the callback.
	Denied,
	/// Callback violated the redirect contract.
	Rejected,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
			FlowOutcome::Denied => "denied",
			FlowOutcome::Rejected => "rejected",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
