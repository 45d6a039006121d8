//! Authentication factor payloads submitted alongside the identifier.

// std
use std::slice::Iter;
// self
use crate::_prelude::*;

/// Authentication factor carried by a [`Challenge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthFactorType {
	/// Biometric sample captured by the capture widget.
	#[serde(rename = "BIO")]
	Biometric,
	/// One-time password delivered over a configured channel.
	#[serde(rename = "OTP")]
	Otp,
}
impl AuthFactorType {
	/// Returns the wire label used by the backend.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthFactorType::Biometric => "BIO",
			AuthFactorType::Otp => "OTP",
		}
	}

	/// Returns the challenge encoding the backend expects for this factor.
	pub const fn default_format(self) -> &'static str {
		match self {
			AuthFactorType::Biometric => "encoded-json",
			AuthFactorType::Otp => "alpha-numeric",
		}
	}
}
impl Display for AuthFactorType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Single `{type, value, format}` triple sent to the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
	/// Factor type.
	pub auth_factor_type: AuthFactorType,
	/// Encoded factor value.
	pub challenge: String,
	/// Encoding of [`challenge`](Self::challenge).
	pub format: String,
}
impl Challenge {
	/// Builds a biometric challenge from an already encoded sample payload.
	pub fn biometric(encoded: impl Into<String>) -> Self {
		Self::new(AuthFactorType::Biometric, encoded)
	}

	/// Builds a challenge using the factor's default format.
	pub fn new(auth_factor_type: AuthFactorType, challenge: impl Into<String>) -> Self {
		Self {
			auth_factor_type,
			challenge: challenge.into(),
			format: auth_factor_type.default_format().into(),
		}
	}
}

/// Ordered list of challenges submitted in one authenticate call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeList(Vec<Challenge>);
impl ChallengeList {
	/// Creates a list holding a single challenge.
	pub fn single(challenge: Challenge) -> Self {
		Self(vec![challenge])
	}

	/// Number of challenges.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no challenge is present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over challenges in submission order.
	pub fn iter(&self) -> Iter<'_, Challenge> {
		self.0.iter()
	}

	/// Appends a challenge, keeping submission order.
	pub fn push(&mut self, challenge: Challenge) {
		self.0.push(challenge);
	}
}
impl FromIterator<Challenge> for ChallengeList {
	fn from_iter<I: IntoIterator<Item = Challenge>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}
impl<'a> IntoIterator for &'a ChallengeList {
	type IntoIter = Iter<'a, Challenge>;
	type Item = &'a Challenge;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn biometric_challenge_serializes_camel_case() {
		let list = ChallengeList::single(Challenge::biometric("eyJ9"));
		let json = serde_json::to_value(&list).expect("Challenge list should serialize.");

		assert_eq!(
			json,
			serde_json::json!([{
				"authFactorType": "BIO",
				"challenge": "eyJ9",
				"format": "encoded-json"
			}])
		);
	}

	#[test]
	fn list_keeps_order() {
		let mut list = ChallengeList::default();

		assert!(list.is_empty());

		list.push(Challenge::new(AuthFactorType::Otp, "111111"));
		list.push(Challenge::biometric("eyJ9"));

		let kinds = list.iter().map(|c| c.auth_factor_type).collect::<Vec<_>>();

		assert_eq!(kinds, vec![AuthFactorType::Otp, AuthFactorType::Biometric]);
		assert_eq!(list.len(), 2);
	}
}
