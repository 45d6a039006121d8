//! Navigation target reached after a successful authentication.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use url::form_urlencoded::Serializer;
// self
use crate::{_prelude::*, flows::OidcContext};

/// Request to navigate to the consent step, replacing the current history entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsentRedirect {
	/// Path, query, and fragment to navigate to.
	pub location: String,
	/// Whether the navigation replaces the current history entry.
	pub replace: bool,
}
impl ConsentRedirect {
	/// Route segment of the consent step.
	pub const CONSENT_ROUTE: &'static str = "/consent";

	/// Builds `<public_path>/consent?nonce=…&state=…&consentAction=…#<base64 OAuth details>`.
	///
	/// Absent parameters are omitted, and so is the `?` when none is present.
	pub fn build(public_path: &str, context: &OidcContext, consent_action: Option<&str>) -> Self {
		let mut query = Serializer::new(String::new());

		for (key, value) in [
			("nonce", context.nonce.as_deref()),
			("state", context.state.as_deref()),
			("consentAction", consent_action),
		] {
			if let Some(value) = value {
				query.append_pair(key, value);
			}
		}

		let query = query.finish();
		let fragment = STANDARD.encode(context.oauth_details.to_string());
		let mut location = format!("{}{}", public_path.trim_end_matches('/'), Self::CONSENT_ROUTE);

		if !query.is_empty() {
			location.push('?');
			location.push_str(&query);
		}

		location.push('#');
		location.push_str(&fragment);

		Self { location, replace: true }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::TransactionId;

	fn context() -> OidcContext {
		OidcContext::new(TransactionId::new("txn-1").expect("Transaction fixture should be valid."))
	}

	#[test]
	fn redirect_carries_params_and_details() {
		let ctx = context()
			.with_nonce("n 1")
			.with_state("s1")
			.with_oauth_details(serde_json::json!({ "clientName": "Portal" }));
		let redirect = ConsentRedirect::build("/idp/", &ctx, Some("CAPTURE"));
		let expected_fragment = STANDARD.encode(r#"{"clientName":"Portal"}"#);

		assert_eq!(
			redirect.location,
			format!("/idp/consent?nonce=n+1&state=s1&consentAction=CAPTURE#{expected_fragment}")
		);
		assert!(redirect.replace);
	}

	#[test]
	fn redirect_without_params_has_no_query() {
		let redirect = ConsentRedirect::build("", &context(), None);

		assert_eq!(redirect.location, format!("/consent#{}", STANDARD.encode("null")));
	}
}
