//! Login transaction identifier issued by the authentication backend.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const TRANSACTION_ID_MAX_LEN: usize = 128;

/// Error returned when transaction identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("Transaction identifier cannot be empty.")]
	Empty,
	/// The identifier contains whitespace characters.
	#[error("Transaction identifier contains whitespace.")]
	ContainsWhitespace,
	/// The identifier exceeded the allowed length in bytes.
	#[error("Transaction identifier exceeds {max} bytes.")]
	TooLong {
		/// Maximum permitted length.
		max: usize,
	},
}

/// Opaque login transaction issued by the authentication backend.
///
/// Read-only for the lifetime of a flow; the capture widget token and every backend call are
/// derived from it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId(String);
impl TransactionId {
	/// Creates a transaction identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for TransactionId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for TransactionId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for TransactionId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<TransactionId> for String {
	fn from(value: TransactionId) -> Self {
		value.0
	}
}
impl TryFrom<String> for TransactionId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate(&value)?;

		Ok(Self(value))
	}
}
impl FromStr for TransactionId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for TransactionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TransactionId({})", self.0)
	}
}
impl Display for TransactionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

fn validate(view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace);
	}
	if view.len() > TRANSACTION_ID_MAX_LEN {
		return Err(IdentifierError::TooLong { max: TRANSACTION_ID_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn transaction_ids_validate() {
		assert_eq!(TransactionId::new(""), Err(IdentifierError::Empty));
		assert_eq!(
			TransactionId::new(" txn"),
			Err(IdentifierError::ContainsWhitespace),
			"Leading whitespace must be rejected."
		);
		assert_eq!(
			TransactionId::new("a".repeat(TRANSACTION_ID_MAX_LEN + 1)),
			Err(IdentifierError::TooLong { max: TRANSACTION_ID_MAX_LEN })
		);

		let id = TransactionId::new("a1b2-c3_d4").expect("Hyphenated transaction should be valid.");

		assert_eq!(id.as_ref(), "a1b2-c3_d4");
		assert_eq!(format!("{id:?}"), "TransactionId(a1b2-c3_d4)");
		assert_eq!(id, "a1b2-c3_d4".parse().expect("Parsing should match construction."));
	}

	#[test]
	fn serde_enforces_validation() {
		let id: TransactionId = serde_json::from_str("\"txn-42\"")
			.expect("Transaction should deserialize successfully.");

		assert_eq!(&*id, "txn-42");
		assert!(serde_json::from_str::<TransactionId>("\"with space\"").is_err());
	}
}
