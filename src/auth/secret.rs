//! Captcha completion token wrapper that redacts the value in logs.

// self
use crate::_prelude::*;

/// Redacted captcha token returned by the captcha widget once the user solves the challenge.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptchaToken(String);
impl CaptchaToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for CaptchaToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for CaptchaToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CaptchaToken").field(&"<redacted>").finish()
	}
}
impl Display for CaptchaToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
