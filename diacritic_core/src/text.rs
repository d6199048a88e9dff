use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::DiacriticError;
use crate::DiacriticResult;

static UNICODE_ESCAPE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\\u([0-9A-Fa-f]{4})").unwrap());

/// First code point of the plain range. Everything from here up to and
/// including [`PLAIN_RANGE_END`] is ordinary printable text.
pub const PLAIN_RANGE_START: char = '\u{0020}';
/// Last code point of the plain range.
pub const PLAIN_RANGE_END: char = '\u{00A0}';

/// Returns true when `ch` falls outside the plain printable range.
pub fn is_diacritic_char(ch: char) -> bool {
	!(PLAIN_RANGE_START..=PLAIN_RANGE_END).contains(&ch)
}

/// Returns true when any code point in `unit` is a diacritic. A base letter
/// followed by a combining mark therefore counts as one diacritic.
pub fn is_diacritic(unit: &str) -> bool {
	unit.chars().any(is_diacritic_char)
}

/// Split `text` into user-perceived characters so that a base letter and its
/// combining marks stay together.
pub fn characters(text: &str) -> Vec<&str> {
	text.graphemes(true).collect()
}

/// The distinct diacritic code points of `text`, in order of first
/// appearance.
pub fn find_diacritics(text: &str) -> Vec<char> {
	let mut seen = HashSet::new();
	text.chars()
		.filter(|ch| is_diacritic_char(*ch) && seen.insert(*ch))
		.collect()
}

/// Compatibility-compose `text`, matching the form record keys are stored in.
pub fn normalize(text: &str) -> String {
	text.nfkc().collect()
}

/// Escape `text` for literal use inside a pattern.
pub fn escape(text: &str) -> String {
	regex::escape(text)
}

/// Turn every `\uHHHH` escape in `text` into the character it names. The
/// `unicode` field of the records is stored in this form. Escapes that name
/// no character, such as lone surrogates, are kept as written.
pub fn format_unicode(text: &str) -> String {
	UNICODE_ESCAPE
		.replace_all(text, |captures: &Captures<'_>| {
			u32::from_str_radix(&captures[1], 16)
				.ok()
				.and_then(char::from_u32)
				.map_or_else(|| captures[0].to_string(), String::from)
		})
		.into_owned()
}

/// Remove duplicates while keeping the first occurrence of each value.
pub fn dedupe<T>(values: Vec<T>) -> Vec<T>
where
	T: Eq + std::hash::Hash + Clone,
{
	let mut seen = HashSet::new();
	values
		.into_iter()
		.filter(|value| seen.insert(value.clone()))
		.collect()
}

/// Interpret raw bytes as input text.
pub fn input_text(bytes: &[u8]) -> DiacriticResult<&str> {
	std::str::from_utf8(bytes).map_err(|e| DiacriticError::InvalidInput(e.to_string()))
}
