use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::RwLock;

use crate::DiacriticError;
use crate::DiacriticResult;
use crate::record::RecordDocument;
use crate::record::Variant;
use crate::record::VariantSet;
use crate::text;

/// The fields a store can be queried by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
	Alphabet,
	Continent,
	Country,
	Language,
	Variant,
	Base,
	Decompose,
	Diacritic,
}

impl Filter {
	pub const ALL: [Filter; 8] = [
		Filter::Alphabet,
		Filter::Continent,
		Filter::Country,
		Filter::Language,
		Filter::Variant,
		Filter::Base,
		Filter::Decompose,
		Filter::Diacritic,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Alphabet => "alphabet",
			Self::Continent => "continent",
			Self::Country => "country",
			Self::Language => "language",
			Self::Variant => "variant",
			Self::Base => "base",
			Self::Decompose => "decompose",
			Self::Diacritic => "diacritic",
		}
	}

	/// Metadata filters match case-insensitively; data filters compare the
	/// code exactly.
	pub fn is_metadata(self) -> bool {
		matches!(
			self,
			Self::Alphabet | Self::Continent | Self::Country | Self::Language | Self::Variant
		)
	}

	/// The form of `code` used for lookups and cache keys.
	pub fn normalize_code(self, code: &str) -> String {
		let code = code.trim();
		if self.is_metadata() {
			code.to_lowercase()
		} else {
			text::normalize(code)
		}
	}
}

impl Display for Filter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for Filter {
	type Err = DiacriticError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		let lowered = value.trim().to_lowercase();
		Self::ALL
			.into_iter()
			.find(|filter| filter.as_str() == lowered)
			.ok_or_else(|| DiacriticError::InvalidFilter(value.to_string()))
	}
}

/// The outcome of a store query. A missing record is an ordinary value, not
/// an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
	Found(Arc<VariantSet>),
	NotFound { message: String },
}

impl Lookup {
	pub fn not_found(message: impl Into<String>) -> Self {
		Self::NotFound {
			message: message.into(),
		}
	}

	pub fn found(&self) -> Option<&VariantSet> {
		match self {
			Self::Found(set) => Some(set),
			Self::NotFound { .. } => None,
		}
	}

	pub fn is_found(&self) -> bool {
		matches!(self, Self::Found(_))
	}
}

/// Read-only access to diacritic records.
pub trait DiacriticStore {
	/// All variants matching `filter=code`.
	fn get_by_filter(&self, filter: Filter, code: &str) -> Lookup;

	/// All variants defining `character`, each restricted to that character.
	fn get_diacritic(&self, character: &str) -> Lookup {
		self.get_by_filter(Filter::Diacritic, character)
	}
}

impl<S: DiacriticStore + ?Sized> DiacriticStore for &S {
	fn get_by_filter(&self, filter: Filter, code: &str) -> Lookup {
		(**self).get_by_filter(filter, code)
	}

	fn get_diacritic(&self, character: &str) -> Lookup {
		(**self).get_diacritic(character)
	}
}

/// Query the store once per diacritic found in `text` and merge the results
/// into one set. Variants that appear for several diacritics are combined.
pub fn lookup_diacritics(store: &impl DiacriticStore, text: &str) -> Lookup {
	let normalized = text::normalize(text);
	let mut merged = VariantSet::default();

	for diacritic in text::find_diacritics(&normalized) {
		let mut buf = [0; 4];
		let character: &str = diacritic.encode_utf8(&mut buf);
		if let Lookup::Found(set) = store.get_diacritic(character) {
			for variant in set.iter() {
				merged.merge(variant.clone());
			}
		}
	}

	if merged.is_empty() {
		return Lookup::not_found("No diacritics found");
	}

	Lookup::Found(Arc::new(merged))
}

/// A store holding every record in memory, in document order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
	variants: Vec<Variant>,
}

impl MemoryStore {
	pub fn new(variants: Vec<Variant>) -> Self {
		Self { variants }
	}

	/// Parse a record document shaped `{language: {variant: {metadata, data}}}`.
	pub fn from_json(content: &str) -> DiacriticResult<Self> {
		Self::from_json_named(content, "<inline>")
	}

	/// Load a record document from disk.
	pub fn load(path: &Path) -> DiacriticResult<Self> {
		let display = path.display().to_string();
		let content = std::fs::read_to_string(path).map_err(|e| {
			DiacriticError::DataFile {
				path: display.clone(),
				reason: e.to_string(),
			}
		})?;
		Self::from_json_named(&content, &display)
	}

	fn from_json_named(content: &str, name: &str) -> DiacriticResult<Self> {
		let document: RecordDocument =
			serde_json::from_str(content).map_err(|e| DiacriticError::DataFile {
				path: name.to_string(),
				reason: e.to_string(),
			})?;

		let mut variants = Vec::new();
		for (language, entries) in document {
			for (name, mut variant) in entries {
				variant.name = name;
				variant.language.clone_from(&language);
				variants.push(variant);
			}
		}

		tracing::debug!(variants = variants.len(), source = name, "loaded diacritic records");
		Ok(Self { variants })
	}

	pub fn variants(&self) -> &[Variant] {
		&self.variants
	}

	fn matches_metadata(variant: &Variant, filter: Filter, code: &str) -> bool {
		let metadata = &variant.metadata;
		match filter {
			Filter::Alphabet => metadata.alphabet.eq_ignore_ascii_case(code),
			Filter::Continent => metadata.continent.contains_ignore_case(code),
			Filter::Country => {
				metadata
					.countries
					.iter()
					.any(|country| country.eq_ignore_ascii_case(code))
			}
			Filter::Language => {
				variant.language.eq_ignore_ascii_case(code)
					|| metadata.language.to_lowercase() == code
			}
			Filter::Variant => variant.name.eq_ignore_ascii_case(code),
			Filter::Base | Filter::Decompose | Filter::Diacritic => false,
		}
	}

	fn restrict(&self, filter: Filter, code: &str) -> VariantSet {
		let wanted: Vec<String> = match filter {
			Filter::Diacritic => {
				text::find_diacritics(code)
					.into_iter()
					.map(String::from)
					.collect()
			}
			_ => Vec::new(),
		};

		self.variants
			.iter()
			.filter_map(|variant| {
				variant.restricted(|key, entry| {
					match filter {
						Filter::Base => entry.mapping.base.as_deref() == Some(code),
						Filter::Decompose => entry.mapping.decompose.as_deref() == Some(code),
						_ => wanted.iter().any(|diacritic| diacritic == key),
					}
				})
			})
			.collect()
	}
}

impl DiacriticStore for MemoryStore {
	fn get_by_filter(&self, filter: Filter, code: &str) -> Lookup {
		let code = filter.normalize_code(code);
		let set: VariantSet = if filter.is_metadata() {
			self.variants
				.iter()
				.filter(|variant| Self::matches_metadata(variant, filter, &code))
				.cloned()
				.collect()
		} else {
			self.restrict(filter, &code)
		};

		if set.is_empty() {
			let message = match filter {
				Filter::Base => "No matching bases found".to_string(),
				Filter::Decompose => "No matching decomposes found".to_string(),
				Filter::Diacritic => "No diacritics found".to_string(),
				_ => {
					let label = filter.as_str();
					let mut chars = label.chars();
					let label = chars
						.next()
						.map(|first| first.to_uppercase().collect::<String>() + chars.as_str())
						.unwrap_or_default();
					format!("{label} '{code}' was not found")
				}
			};
			tracing::debug!(%filter, %code, "{message}");
			return Lookup::not_found(message);
		}

		Lookup::Found(Arc::new(set))
	}
}

/// Storage behind a [`CachedStore`]. Entries are written once and never
/// evicted.
pub trait StoreCache {
	fn get(&self, key: &str) -> Option<Arc<VariantSet>>;
	fn insert(&self, key: String, value: Arc<VariantSet>);
}

/// The default in-process cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
	entries: RwLock<HashMap<String, Arc<VariantSet>>>,
}

impl MemoryCache {
	pub fn len(&self) -> usize {
		self.entries.read().map_or(0, |entries| entries.len())
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl StoreCache for MemoryCache {
	fn get(&self, key: &str) -> Option<Arc<VariantSet>> {
		self.entries.read().ok()?.get(key).cloned()
	}

	fn insert(&self, key: String, value: Arc<VariantSet>) {
		if let Ok(mut entries) = self.entries.write() {
			entries.entry(key).or_insert(value);
		}
	}
}

/// Memoizes successful lookups of an inner store, keyed by filter and
/// normalized code.
#[derive(Debug, Default)]
pub struct CachedStore<S, C = MemoryCache> {
	inner: S,
	cache: C,
}

impl<S: DiacriticStore> CachedStore<S> {
	pub fn new(inner: S) -> Self {
		Self::with_cache(inner, MemoryCache::default())
	}
}

impl<S: DiacriticStore, C: StoreCache> CachedStore<S, C> {
	pub fn with_cache(inner: S, cache: C) -> Self {
		Self { inner, cache }
	}

	pub fn cache(&self) -> &C {
		&self.cache
	}

	pub fn inner(&self) -> &S {
		&self.inner
	}

	fn cache_key(filter: Filter, code: &str) -> String {
		format!("{filter}={}", filter.normalize_code(code))
	}
}

impl<S: DiacriticStore, C: StoreCache> DiacriticStore for CachedStore<S, C> {
	fn get_by_filter(&self, filter: Filter, code: &str) -> Lookup {
		let key = Self::cache_key(filter, code);
		if let Some(set) = self.cache.get(&key) {
			tracing::debug!(%key, "loaded from cache");
			return Lookup::Found(set);
		}

		let lookup = self.inner.get_by_filter(filter, code);
		if let Lookup::Found(set) = &lookup {
			self.cache.insert(key, Arc::clone(set));
		}
		lookup
	}
}
