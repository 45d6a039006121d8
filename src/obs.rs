//! Optional observability helpers for the login flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oidc_login.flow` with the `flow` and
//!   `stage` (call site) fields.
//! - Enable `metrics` to increment the `oidc_login_flow_total` counter for every
//!   attempt/success/rejection/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Login flows observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Biometric capture + authenticate.
	BiometricLogin,
	/// OTP delivery request.
	OtpRequest,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::BiometricLogin => "biometric_login",
			FlowKind::OtpRequest => "otp_request",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// A submission reached the backend call.
	Attempt,
	/// The backend accepted the submission.
	Success,
	/// The backend answered with structured errors.
	Rejected,
	/// The call failed in transport.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Rejected => "rejected",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
