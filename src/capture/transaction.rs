//! Capture-widget transaction token derivation.

// self
use crate::{_prelude::*, auth::TransactionId, error::ConfigError};

/// Converts the login transaction into the fixed-length token the capture widget expects.
///
/// Hyphens and underscores are removed, then the remaining characters are read backwards
/// starting one past the last index (that read contributes nothing) and wrapping back to
/// one-past-the-end whenever the pointer drops below zero, until `len` characters are
/// collected. The empty reads mean the output is the reversed stripped string repeated and
/// truncated to `len`. Characters repeat when `len` exceeds the stripped length.
pub fn derive_capture_transaction_id(transaction: &TransactionId, len: usize) -> Result<String> {
	let stripped = transaction.chars().filter(|c| !matches!(c, '-' | '_')).collect::<Vec<_>>();

	if len == 0 {
		return Ok(String::new());
	}
	if stripped.is_empty() {
		return Err(ConfigError::EmptyCaptureTransaction.into());
	}

	Ok(stripped.iter().rev().cycle().take(len).collect())
}
