//! State shared by the login flows (submission status, error banner, OIDC context).

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, auth::TransactionId};

/// Loading state that drives which indicator the form shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
	/// Nothing in flight.
	#[default]
	Idle,
	/// A backend call is in flight.
	Submitting {
		/// Translation key for the loading indicator.
		message: &'static str,
	},
	/// The last call failed in transport.
	Error,
}
impl SubmissionStatus {
	/// Returns true while a backend call is in flight.
	pub fn is_submitting(&self) -> bool {
		matches!(self, SubmissionStatus::Submitting { .. })
	}
}

/// Dismissible error banner. At most one is shown at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorBanner {
	/// Translation key under the `errors` namespace.
	pub code: String,
	/// Whether the banner is currently displayed.
	pub visible: bool,
}
impl ErrorBanner {
	/// Creates a visible banner for `code`.
	pub fn show(code: impl Into<String>) -> Self {
		Self { code: code.into(), visible: true }
	}
}

/// OAuth/OIDC request context the flows were started with.
#[derive(Clone, Debug, PartialEq)]
pub struct OidcContext {
	/// Login transaction issued by the backend.
	pub transaction_id: TransactionId,
	/// OIDC nonce from the authorization request.
	pub nonce: Option<String>,
	/// OAuth state from the authorization request.
	pub state: Option<String>,
	/// OAuth details returned when the transaction was created.
	pub oauth_details: Value,
}
impl OidcContext {
	/// Creates a context with no nonce, state, or OAuth details.
	pub fn new(transaction_id: TransactionId) -> Self {
		Self { transaction_id, nonce: None, state: None, oauth_details: Value::Null }
	}

	/// Sets the nonce.
	pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
		self.nonce = Some(nonce.into());

		self
	}

	/// Sets the OAuth state.
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = Some(state.into());

		self
	}

	/// Sets the OAuth details.
	pub fn with_oauth_details(mut self, details: Value) -> Self {
		self.oauth_details = details;

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_and_banner_helpers() {
		assert_eq!(SubmissionStatus::default(), SubmissionStatus::Idle);
		assert!(SubmissionStatus::Submitting { message: "authenticating_msg" }.is_submitting());
		assert!(!SubmissionStatus::Error.is_submitting());

		let banner = ErrorBanner::show("otp.send_otp_failed_msg");

		assert!(banner.visible);
		assert_eq!(banner.code, "otp.send_otp_failed_msg");
	}
}
