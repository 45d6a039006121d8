//! Identifier input masking.
//!
//! The login forms accept a numeric identifier that is displayed in grouped blocks
//! (`NNNNNN/NN/NN`). [`IdentifierMask`] reformats every keystroke-modified value and keeps
//! the caret next to the digit the user just typed, while [`IdentifierField`] holds the
//! per-form display state and the caret that the rendering layer restores after the new
//! value commits.

/// Formatting rule for grouped numeric identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdentifierMask {
	/// Maximum number of raw digits accepted; longer edits are rejected.
	pub max_digits: usize,
	/// Character inserted between groups.
	pub separator: char,
	/// Digit counts after which a separator is inserted.
	pub breaks: [usize; 2],
}
impl IdentifierMask {
	/// Default maximum raw digit count.
	pub const DEFAULT_MAX_DIGITS: usize = 10;
	/// Default group separator.
	pub const DEFAULT_SEPARATOR: char = '/';

	/// Overrides the maximum raw digit count.
	pub fn with_max_digits(mut self, max_digits: usize) -> Self {
		self.max_digits = max_digits;

		self
	}

	/// Overrides the group separator.
	pub fn with_separator(mut self, separator: char) -> Self {
		self.separator = separator;

		self
	}

	/// Strips non-digits and inserts separators. Applying it twice equals applying it once.
	pub fn format(&self, raw: &str) -> String {
		let digits = raw.chars().filter(char::is_ascii_digit).collect::<Vec<_>>();
		let mut out = String::with_capacity(digits.len() + self.breaks.len());

		for (idx, digit) in digits.iter().enumerate() {
			if idx > 0 && self.breaks.contains(&idx) {
				out.push(self.separator);
			}

			out.push(*digit);
		}

		out
	}

	/// Reformats an edited value and repositions the caret.
	///
	/// `caret` is the char index reported by the input after the edit. Returns [`None`] when the
	/// edit would exceed [`max_digits`](Self::max_digits); the caller keeps its previous state.
	pub fn apply_edit(&self, raw: &str, caret: usize) -> Option<MaskedEdit> {
		if raw.chars().filter(char::is_ascii_digit).count() > self.max_digits {
			return None;
		}

		let digits_before_caret =
			raw.chars().take(caret).filter(char::is_ascii_digit).count();
		let separators_before_caret =
			self.breaks.iter().filter(|&&at| at < digits_before_caret).count();

		Some(MaskedEdit {
			value: self.format(raw),
			caret: digits_before_caret + separators_before_caret,
		})
	}
}
impl Default for IdentifierMask {
	fn default() -> Self {
		Self {
			max_digits: Self::DEFAULT_MAX_DIGITS,
			separator: Self::DEFAULT_SEPARATOR,
			breaks: [6, 8],
		}
	}
}

/// Result of an accepted edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskedEdit {
	/// Re-formatted display value.
	pub value: String,
	/// Caret char index within [`value`](Self::value).
	pub caret: usize,
}

/// Display state for a masked identifier input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentifierField {
	mask: IdentifierMask,
	value: String,
	pending_caret: Option<usize>,
}
impl IdentifierField {
	/// Creates an empty field governed by `mask`.
	pub fn new(mask: IdentifierMask) -> Self {
		Self { mask, value: String::new(), pending_caret: None }
	}

	/// Applies a keystroke-modified value; returns `false` when the edit was rejected.
	pub fn edit(&mut self, raw: &str, caret: usize) -> bool {
		let Some(edit) = self.mask.apply_edit(raw, caret) else {
			return false;
		};

		self.value = edit.value;
		self.pending_caret = Some(edit.caret);

		true
	}

	/// Current display value.
	pub fn value(&self) -> &str {
		&self.value
	}

	/// Returns true when the value is empty or whitespace-only.
	pub fn is_blank(&self) -> bool {
		self.value.trim().is_empty()
	}

	/// Takes the caret position to restore once the new value has been rendered.
	///
	/// Repositioning must wait until after the render commits, so the value is handed out once.
	pub fn take_pending_caret(&mut self) -> Option<usize> {
		self.pending_caret.take()
	}

	/// Mask applied to edits.
	pub fn mask(&self) -> &IdentifierMask {
		&self.mask
	}
}
