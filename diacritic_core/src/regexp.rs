use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use regex::Regex;
use regex::RegexBuilder;

use crate::DiacriticError;
use crate::DiacriticResult;
use crate::record::VariantSet;
use crate::store::DiacriticStore;
use crate::store::Lookup;
use crate::store::lookup_diacritics;
use crate::text;

pub const DEFAULT_FLAGS: &str = "gu";
pub const DEFAULT_REPLACE_DIACRITIC: &str = r"\S";

/// Optional zero-width characters allowed between fragments when joiners
/// are ignored: soft hyphen, zero width space, zero width non-joiner and
/// zero width joiner.
pub const JOINER_CLASS: &str = "[\u{00ad}\u{200b}\u{200c}\u{200d}]?";

bitflags! {
	/// Flags accepted in [`RegexOptions::flags`]. `g`, `u` and `y` are
	/// accepted for compatibility and have no effect on matching.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct RegexFlags: u8 {
		const GLOBAL = 1;
		const IGNORE_CASE = 1 << 1;
		const MULTI_LINE = 1 << 2;
		const DOT_ALL = 1 << 3;
		const UNICODE = 1 << 4;
		const STICKY = 1 << 5;
		const EXTENDED = 1 << 6;
	}
}

impl FromStr for RegexFlags {
	type Err = DiacriticError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		value.chars().try_fold(Self::empty(), |flags, ch| {
			let flag = match ch {
				'g' => Self::GLOBAL,
				'i' => Self::IGNORE_CASE,
				'm' => Self::MULTI_LINE,
				's' => Self::DOT_ALL,
				'u' => Self::UNICODE,
				'y' => Self::STICKY,
				'x' => Self::EXTENDED,
				other => return Err(DiacriticError::InvalidFlag(other)),
			};
			Ok(flags | flag)
		})
	}
}

impl RegexFlags {
	fn apply(self, builder: &mut RegexBuilder) {
		builder
			.unicode(true)
			.case_insensitive(self.contains(Self::IGNORE_CASE))
			.multi_line(self.contains(Self::MULTI_LINE))
			.dot_matches_new_line(self.contains(Self::DOT_ALL))
			.ignore_whitespace(self.contains(Self::EXTENDED));
	}
}

/// What an `each` callback sees for one character of the input.
#[derive(Debug, Clone, Copy)]
pub struct Fragment<'a> {
	/// The user-perceived character from the input.
	pub character: &'a str,
	/// The pattern built for it. Empty when the character was dropped.
	pub pattern: &'a str,
	/// Records for every diacritic in the input.
	pub data: &'a VariantSet,
	/// Position of the character in the input.
	pub index: usize,
}

pub type EachFragment<'a> = dyn Fn(&Fragment<'_>) -> Option<String> + 'a;
pub type DoneFragments<'a> = dyn Fn(&[String], &str) -> String + 'a;

/// Options for [`create_regexp`].
pub struct RegexOptions<'a> {
	/// Include diacritics and their equivalents. When false each diacritic is
	/// replaced with [`RegexOptions::replace_diacritic`].
	pub diacritics: bool,
	/// Include the characters that are not diacritics.
	pub non_diacritics: bool,
	/// Use every known equivalent of a diacritic rather than the diacritic
	/// alone.
	pub include_equivalents: bool,
	/// When false the upper and lower case equivalents are both included.
	pub case_sensitive: bool,
	/// Allow zero-width joiners between characters.
	pub ignore_joiners: bool,
	pub replace_diacritic: String,
	pub flags: String,
	pub each: Option<Box<EachFragment<'a>>>,
	pub done: Option<Box<DoneFragments<'a>>>,
}

impl Default for RegexOptions<'_> {
	fn default() -> Self {
		Self {
			diacritics: true,
			non_diacritics: true,
			include_equivalents: true,
			case_sensitive: true,
			ignore_joiners: false,
			replace_diacritic: DEFAULT_REPLACE_DIACRITIC.to_string(),
			flags: DEFAULT_FLAGS.to_string(),
			each: None,
			done: None,
		}
	}
}

impl fmt::Debug for RegexOptions<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RegexOptions")
			.field("diacritics", &self.diacritics)
			.field("non_diacritics", &self.non_diacritics)
			.field("include_equivalents", &self.include_equivalents)
			.field("case_sensitive", &self.case_sensitive)
			.field("ignore_joiners", &self.ignore_joiners)
			.field("replace_diacritic", &self.replace_diacritic)
			.field("flags", &self.flags)
			.field("each", &self.each.is_some())
			.field("done", &self.done.is_some())
			.finish()
	}
}

impl<'a> RegexOptions<'a> {
	#[must_use]
	pub fn with_each(mut self, each: impl Fn(&Fragment<'_>) -> Option<String> + 'a) -> Self {
		self.each = Some(Box::new(each));
		self
	}

	#[must_use]
	pub fn with_done(mut self, done: impl Fn(&[String], &str) -> String + 'a) -> Self {
		self.done = Some(Box::new(done));
		self
	}

	/// Only diacritics are matched, so every fragment joins one alternation.
	fn diacritics_only(&self) -> bool {
		self.diacritics && !self.non_diacritics
	}
}

/// Build a pattern matching `text` and any diacritic equivalent spelling of
/// it.
pub fn create_regexp(
	text: &str,
	store: &impl DiacriticStore,
	options: &RegexOptions<'_>,
) -> DiacriticResult<Regex> {
	let flags: RegexFlags = options.flags.parse()?;
	let pattern = create_pattern(text, store, options);
	tracing::debug!(%pattern, flags = %options.flags, "synthesized pattern");

	let mut builder = RegexBuilder::new(&pattern);
	flags.apply(&mut builder);
	Ok(builder.build()?)
}

/// Build the pattern source without compiling it.
pub fn create_pattern(text: &str, store: &impl DiacriticStore, options: &RegexOptions<'_>) -> String {
	let lookup_text = if options.case_sensitive {
		text.to_string()
	} else {
		format!("{}{}", text.to_lowercase(), text.to_uppercase())
	};

	let data = match lookup_diacritics(store, &lookup_text) {
		Lookup::Found(set) => set,
		Lookup::NotFound { .. } => Default::default(),
	};

	let mut fragments = Vec::new();
	for (index, character) in text::characters(text).into_iter().enumerate() {
		let pattern = character_pattern(character, &data, options);
		let pattern = match &options.each {
			Some(each) => {
				each(&Fragment {
					character,
					pattern: &pattern,
					data: &data,
					index,
				})
			}
			None => Some(pattern),
		};

		if let Some(pattern) = pattern.filter(|pattern| !pattern.is_empty()) {
			fragments.push(pattern);
		}
	}

	finalize(fragments, options)
}

fn character_pattern(character: &str, data: &VariantSet, options: &RegexOptions<'_>) -> String {
	if !text::is_diacritic(character) {
		return if options.non_diacritics {
			text::escape(character)
		} else {
			String::new()
		};
	}

	let equivalents = if options.include_equivalents {
		equivalents(character, data, options.case_sensitive)
	} else {
		vec![character.to_string()]
	};

	if options.diacritics {
		let escaped: Vec<String> = equivalents.iter().map(|item| text::escape(item)).collect();
		return match (escaped.len(), options.non_diacritics) {
			(1, _) => escaped.join(""),
			(_, true) => format!("({})", escaped.join("|")),
			(_, false) => format!("{}|", escaped.join("|")),
		};
	}

	if !options.non_diacritics {
		return String::new();
	}

	if options.replace_diacritic != DEFAULT_REPLACE_DIACRITIC {
		return options.replace_diacritic.clone();
	}

	let longest = if options.include_equivalents {
		equivalents
			.iter()
			.map(|item| item.chars().count())
			.max()
			.unwrap_or(1)
	} else {
		character.chars().count()
	};

	if longest > 1 {
		format!("{DEFAULT_REPLACE_DIACRITIC}{{1,{longest}}}")
	} else {
		DEFAULT_REPLACE_DIACRITIC.to_string()
	}
}

/// The raw equivalents recorded for `character`, in document order. Falls
/// back to the character itself when the records know nothing about it.
fn equivalents(character: &str, data: &VariantSet, case_sensitive: bool) -> Vec<String> {
	let key = text::normalize(character);
	let keys = if case_sensitive {
		vec![key.clone()]
	} else {
		text::dedupe(vec![key.to_lowercase(), key.to_uppercase()])
	};

	let mut result = Vec::new();
	for variant in data.iter() {
		if !variant.data.contains_key(&key) {
			continue;
		}
		for item in &keys {
			if let Some(entry) = variant.data.get(item) {
				result.extend(entry.equivalents.iter().map(|equivalent| equivalent.raw.clone()));
			}
		}
	}

	let result = text::dedupe(result);
	if result.is_empty() {
		vec![character.to_string()]
	} else {
		result
	}
}

fn finalize(mut fragments: Vec<String>, options: &RegexOptions<'_>) -> String {
	let joiner = if options.ignore_joiners && !fragments.is_empty() {
		JOINER_CLASS
	} else {
		""
	};

	if options.diacritics_only() {
		match fragments.as_mut_slice() {
			[] => fragments.push("()".to_string()),
			[first, .., last] => {
				first.insert(0, '(');
				strip_trailing_alternation(last);
				last.push(')');
			}
			[only] => {
				strip_trailing_alternation(only);
				only.insert(0, '(');
				only.push(')');
			}
		}
	}

	match &options.done {
		Some(done) => done(&fragments, joiner),
		None => fragments.join(joiner),
	}
}

fn strip_trailing_alternation(fragment: &mut String) {
	if fragment.ends_with('|') {
		fragment.pop();
	}
}
