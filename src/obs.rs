//! Optional observability helpers for substrate operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `plinth.op` with the `op` (operation) and
//!   `stage` (call site) fields, plus warn-level records for failures the loaders absorb.
//! - Enable `metrics` to increment the `plinth_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Substrate operations observed by this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Configuration cache load (cache check plus loader chain).
	ConfigLoad,
	/// Bearer token resolution through the dynamic provider.
	Token,
	/// Outbound authenticated HTTP request.
	Request,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::ConfigLoad => "config_load",
			OpKind::Token => "token",
			OpKind::Request => "request",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a substrate operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
