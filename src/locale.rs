//! Error-code localization.
//!
//! Backend errors are shown through translation keys under the `errors` namespace. A
//! domain-specific key (`biometrics.<code>` or `otp.<code>`) is preferred when the loaded
//! bundle defines it; otherwise the raw code is used as the key.

// crates.io
use serde_json::Value;
// self
use crate::_prelude::*;

/// Banner key shown when the biometric authenticate call fails in transport.
pub const AUTHENTICATION_FAILED_KEY: &str = "authentication_failed_msg";
/// Banner key shown when the OTP send call fails in transport.
pub const SEND_OTP_FAILED_KEY: &str = "otp.send_otp_failed_msg";
/// Status message key while the biometric challenge is being verified.
pub const AUTHENTICATING_MSG_KEY: &str = "authenticating_msg";
/// Status message key while the OTP is being sent.
pub const SENDING_OTP_MSG_KEY: &str = "sending_otp_msg";

const ERRORS_NAMESPACE: &str = "errors";

/// Error namespace a flow localizes its backend errors under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorDomain {
	/// Biometric login errors.
	Biometrics,
	/// OTP request errors.
	Otp,
}
impl ErrorDomain {
	/// Key prefix inside the `errors` namespace.
	pub const fn prefix(self) -> &'static str {
		match self {
			ErrorDomain::Biometrics => "biometrics",
			ErrorDomain::Otp => "otp",
		}
	}
}
impl Display for ErrorDomain {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.prefix())
	}
}

/// Read access to the loaded translation bundle.
pub trait LocaleCatalog
where
	Self: Send + Sync,
{
	/// Returns true when `errors.<domain>.<code>` is defined.
	fn has_error_key(&self, domain: ErrorDomain, code: &str) -> bool;

	/// Resolves `errors.<key>` to its message, if defined.
	fn message(&self, key: &str) -> Option<String>;
}

/// Errors raised while loading a [`LocaleBundle`].
#[derive(Debug, ThisError)]
pub enum LocaleError {
	/// The bundle is not valid JSON.
	#[error("Locale bundle is not valid JSON.")]
	Parse(#[from] serde_json::Error),
	/// The bundle root is not a JSON object.
	#[error("Locale bundle root must be a JSON object.")]
	NotAnObject,
}

/// JSON translation bundle (the shape served for each language).
#[derive(Clone, Debug, PartialEq)]
pub struct LocaleBundle(Value);
impl LocaleBundle {
	/// Wraps an already parsed bundle.
	pub fn from_value(value: Value) -> Result<Self, LocaleError> {
		if value.is_object() { Ok(Self(value)) } else { Err(LocaleError::NotAnObject) }
	}

	/// Resolves a dotted key path from the bundle root. `null` entries count as absent.
	pub fn lookup(&self, path: &str) -> Option<&Value> {
		path.split('.')
			.try_fold(&self.0, |node, segment| node.get(segment))
			.filter(|value| !value.is_null())
	}
}
impl FromStr for LocaleBundle {
	type Err = LocaleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_value(serde_json::from_str(s)?)
	}
}
impl LocaleCatalog for LocaleBundle {
	fn has_error_key(&self, domain: ErrorDomain, code: &str) -> bool {
		self.0
			.get(ERRORS_NAMESPACE)
			.and_then(|errors| errors.get(domain.prefix()))
			.and_then(|entries| entries.get(code))
			.is_some_and(|value| !value.is_null())
	}

	fn message(&self, key: &str) -> Option<String> {
		self.lookup(&format!("{ERRORS_NAMESPACE}.{key}"))
			.and_then(Value::as_str)
			.map(ToOwned::to_owned)
	}
}

/// Picks the banner key for a backend error code.
pub fn banner_key<L>(catalog: &L, domain: ErrorDomain, code: &str) -> String
where
	L: ?Sized + LocaleCatalog,
{
	if catalog.has_error_key(domain, code) { format!("{domain}.{code}") } else { code.to_owned() }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn bundle() -> LocaleBundle {
		LocaleBundle::from_str(
			r#"{
				"errors": {
					"invalid_transaction": "Invalid transaction.",
					"biometrics": { "xyz": "Biometric mismatch.", "nulled": null },
					"otp": { "send_otp_failed_msg": "Failed to send OTP." }
				}
			}"#,
		)
		.expect("Bundle fixture should parse.")
	}

	#[test]
	fn known_codes_use_domain_prefix() {
		let bundle = bundle();

		assert_eq!(banner_key(&bundle, ErrorDomain::Biometrics, "xyz"), "biometrics.xyz");
		assert_eq!(banner_key(&bundle, ErrorDomain::Otp, "xyz"), "xyz");
		assert_eq!(banner_key(&bundle, ErrorDomain::Biometrics, "nulled"), "nulled");
		assert_eq!(banner_key(&bundle, ErrorDomain::Otp, "unknown_code"), "unknown_code");
	}

	#[test]
	fn messages_resolve_under_errors_namespace() {
		let bundle = bundle();

		assert_eq!(bundle.message("biometrics.xyz").as_deref(), Some("Biometric mismatch."));
		assert_eq!(bundle.message(SEND_OTP_FAILED_KEY).as_deref(), Some("Failed to send OTP."));
		assert_eq!(bundle.message("invalid_transaction").as_deref(), Some("Invalid transaction."));
		assert_eq!(bundle.message("biometrics"), None, "Namespaces are not messages.");
		assert_eq!(bundle.message("missing"), None);
	}

	#[test]
	fn non_object_bundles_are_rejected() {
		assert!(matches!(LocaleBundle::from_str("[]"), Err(LocaleError::NotAnObject)));
		assert!(matches!(LocaleBundle::from_str("{"), Err(LocaleError::Parse(_))));
	}
}
