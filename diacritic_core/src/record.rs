use derive_more::Deref;
use derive_more::DerefMut;
use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

/// Descriptive information about a language variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
	#[serde(default)]
	pub alphabet: String,
	/// Some records store a single continent code, others an ordered list.
	#[serde(default)]
	pub continent: TextOrList,
	#[serde(default)]
	pub language: String,
	/// The language name written in the language itself.
	#[serde(default)]
	pub native: String,
	#[serde(default)]
	pub countries: Vec<String>,
	#[serde(default)]
	pub sources: Vec<String>,
}

impl Metadata {
	/// Look up a metadata field by its path name.
	pub fn field(&self, name: &str) -> Option<FieldValue<'_>> {
		let value = match name {
			"alphabet" => FieldValue::Text(&self.alphabet),
			"continent" => {
				match &self.continent {
					TextOrList::Text(text) => FieldValue::Text(text),
					TextOrList::List(list) => FieldValue::List(list),
				}
			}
			"language" => FieldValue::Text(&self.language),
			"native" => FieldValue::Text(&self.native),
			"countries" => FieldValue::List(&self.countries),
			"sources" => FieldValue::List(&self.sources),
			_ => return None,
		};

		Some(value)
	}
}

/// A metadata value that may be either a single string or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
	Text(String),
	List(Vec<String>),
}

impl Default for TextOrList {
	fn default() -> Self {
		Self::Text(String::new())
	}
}

impl TextOrList {
	/// Returns true when any entry equals `code`, ignoring ASCII case.
	pub fn contains_ignore_case(&self, code: &str) -> bool {
		match self {
			Self::Text(text) => text.eq_ignore_ascii_case(code),
			Self::List(list) => list.iter().any(|item| item.eq_ignore_ascii_case(code)),
		}
	}
}

/// A borrowed view of a single record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
	Text(&'a str),
	List(&'a [String]),
}

impl FieldValue<'_> {
	/// Render the whole field as one string, joining list entries.
	pub fn joined(&self, joiner: &str) -> String {
		match self {
			Self::Text(text) => (*text).to_string(),
			Self::List(list) => list.join(joiner),
		}
	}

	/// Select one entry by index. A plain text value has no entries, so
	/// every index selects the text itself.
	pub fn at(&self, index: usize) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			Self::List(list) => list.get(index).map(String::as_str),
		}
	}
}

/// The plain-letter and expanded substitutions for a diacritic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub decompose: Option<String>,
}

impl Mapping {
	pub fn field(&self, name: &str) -> Option<&str> {
		match name {
			"base" => self.base.as_deref(),
			"decompose" => self.decompose.as_deref(),
			_ => None,
		}
	}
}

/// One textual encoding of a diacritic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equivalent {
	#[serde(default)]
	pub raw: String,
	#[serde(default)]
	pub unicode: String,
	#[serde(default)]
	pub html_decimal: String,
	#[serde(default)]
	pub html_hex: String,
	#[serde(default)]
	pub encoded_uri: String,
	#[serde(default)]
	pub html_entity: String,
}

impl Equivalent {
	pub fn field(&self, name: &str) -> Option<&str> {
		let value = match name {
			"raw" => &self.raw,
			"unicode" => &self.unicode,
			"html_decimal" => &self.html_decimal,
			"html_hex" => &self.html_hex,
			"encoded_uri" => &self.encoded_uri,
			"html_entity" => &self.html_entity,
			_ => return None,
		};

		Some(value.as_str())
	}
}

/// Everything known about a single diacritic character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiacriticEntry {
	#[serde(default)]
	pub mapping: Mapping,
	#[serde(default)]
	pub equivalents: Vec<Equivalent>,
}

/// A language variant and the diacritics it defines, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
	/// Variant key, e.g. `de` or `de_at`.
	#[serde(skip)]
	pub name: String,
	/// Key of the language this variant belongs to.
	#[serde(skip)]
	pub language: String,
	#[serde(default)]
	pub metadata: Metadata,
	#[serde(default)]
	pub data: IndexMap<String, DiacriticEntry>,
}

impl Variant {
	/// A copy of this variant whose data only contains the diacritics
	/// accepted by `keep`. Returns `None` when nothing is kept.
	pub fn restricted(&self, mut keep: impl FnMut(&str, &DiacriticEntry) -> bool) -> Option<Self> {
		let data: IndexMap<String, DiacriticEntry> = self
			.data
			.iter()
			.filter(|(key, entry)| keep(key.as_str(), entry))
			.map(|(key, entry)| (key.clone(), entry.clone()))
			.collect();

		if data.is_empty() {
			return None;
		}

		Some(Self {
			name: self.name.clone(),
			language: self.language.clone(),
			metadata: self.metadata.clone(),
			data,
		})
	}
}

/// An ordered collection of variants as returned by a store query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct VariantSet(
	#[deref]
	#[deref_mut]
	Vec<Variant>,
);

impl VariantSet {
	/// Add `variant` to the set. When a variant with the same name is already
	/// present, its data is extended with any diacritics it does not yet hold.
	pub fn merge(&mut self, variant: Variant) {
		match self.0.iter_mut().find(|existing| existing.name == variant.name) {
			Some(existing) => {
				for (key, entry) in variant.data {
					existing.data.entry(key).or_insert(entry);
				}
			}
			None => self.0.push(variant),
		}
	}

	/// Iterate every `(variant, diacritic, entry)` triple in document order.
	pub fn entries(&self) -> impl Iterator<Item = (&Variant, &str, &DiacriticEntry)> {
		self.0.iter().flat_map(|variant| {
			variant
				.data
				.iter()
				.map(move |(key, entry)| (variant, key.as_str(), entry))
		})
	}
}

impl FromIterator<Variant> for VariantSet {
	fn from_iter<I: IntoIterator<Item = Variant>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl Serialize for VariantSet {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		use serde::ser::SerializeMap;

		let mut map = serializer.serialize_map(Some(self.0.len()))?;
		for variant in &self.0 {
			map.serialize_entry(&variant.name, variant)?;
		}
		map.end()
	}
}

/// The on-disk shape of a record file: `{language: {variant: {...}}}`.
pub(crate) type RecordDocument = IndexMap<String, IndexMap<String, Variant>>;
