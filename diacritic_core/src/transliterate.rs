use std::fmt;
use std::str::FromStr;

use crate::DiacriticError;
use crate::record::DiacriticEntry;
use crate::record::VariantSet;
use crate::store::DiacriticStore;
use crate::store::lookup_diacritics;
use crate::text;

/// Which mapping a diacritic is replaced with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MappingKind {
	/// The plain letter, falling back to the decomposed form.
	#[default]
	Base,
	/// The decomposed form, falling back to the plain letter.
	Decompose,
}

impl MappingKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Base => "base",
			Self::Decompose => "decompose",
		}
	}

	fn pick(self, entry: &DiacriticEntry) -> Option<&str> {
		let mapping = &entry.mapping;
		let (first, second) = match self {
			Self::Base => (&mapping.base, &mapping.decompose),
			Self::Decompose => (&mapping.decompose, &mapping.base),
		};

		first
			.as_deref()
			.filter(|value| !value.is_empty())
			.or_else(|| second.as_deref().filter(|value| !value.is_empty()))
	}
}

impl fmt::Display for MappingKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for MappingKind {
	type Err = DiacriticError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_lowercase().as_str() {
			"base" => Ok(Self::Base),
			"decompose" => Ok(Self::Decompose),
			_ => Err(DiacriticError::InvalidMappingKind(value.to_string())),
		}
	}
}

/// Replace every diacritic in `text` with its mapping.
///
/// With a `variant`, only that variant's mappings are used and diacritics it
/// does not define are kept. Without one, the first variant defining a
/// diacritic wins.
pub fn transliterate(
	text: &str,
	store: &impl DiacriticStore,
	kind: MappingKind,
	variant: Option<&str>,
) -> String {
	let normalized = text::normalize(text);
	let lookup = lookup_diacritics(store, &normalized);
	let Some(data) = lookup.found() else {
		return normalized;
	};

	let mut output = String::with_capacity(normalized.len());
	for ch in normalized.chars() {
		match replacement(ch, data, kind, variant) {
			Some(value) => output.push_str(value),
			None => output.push(ch),
		}
	}

	output
}

fn replacement<'d>(
	ch: char,
	data: &'d VariantSet,
	kind: MappingKind,
	variant: Option<&str>,
) -> Option<&'d str> {
	if !text::is_diacritic_char(ch) {
		return None;
	}

	let mut buf = [0; 4];
	let key: &str = ch.encode_utf8(&mut buf);

	data.iter()
		.filter(|item| variant.is_none_or(|name| item.name == name))
		.find_map(|item| item.data.get(key))
		.and_then(|entry| kind.pick(entry))
}
