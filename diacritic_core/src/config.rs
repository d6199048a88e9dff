use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DiacriticError;
use crate::DiacriticResult;
use crate::placeholder::DEFAULT_JOINER;
use crate::placeholder::DEFAULT_TEMPLATE;
use crate::placeholder::PlaceholderOptions;
use crate::regexp::DEFAULT_FLAGS;
use crate::regexp::DEFAULT_REPLACE_DIACRITIC;
use crate::regexp::RegexOptions;
use crate::store::MemoryStore;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["diacritic.toml", ".diacritic.toml", ".config/diacritic.toml"];

/// Configuration loaded from a `diacritic.toml` file.
///
/// ```toml
/// data = "data/diacritics.json"
///
/// [placeholder]
/// template = "<% diacritics: {data} %>"
/// exclude = ["de_at"]
/// joiner = ", "
///
/// [regexp]
/// flags = "gu"
/// case_sensitive = false
/// ignore_joiners = true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiacriticConfig {
	/// Record file backing the store, relative to the config root.
	#[serde(default)]
	pub data: Option<PathBuf>,
	#[serde(default)]
	pub placeholder: PlaceholderConfig,
	#[serde(default)]
	pub regexp: RegexpConfig,
}

/// Defaults for placeholder replacement.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
	pub template: String,
	pub exclude: Vec<String>,
	pub joiner: String,
}

impl Default for PlaceholderConfig {
	fn default() -> Self {
		Self {
			template: DEFAULT_TEMPLATE.to_string(),
			exclude: Vec::new(),
			joiner: DEFAULT_JOINER.to_string(),
		}
	}
}

impl PlaceholderConfig {
	pub fn options<'a>(&self) -> PlaceholderOptions<'a> {
		PlaceholderOptions::default()
			.with_template(&self.template)
			.with_exclude(self.exclude.iter().cloned())
			.with_joiner(&self.joiner)
	}
}

/// Defaults for regular expression synthesis.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct RegexpConfig {
	pub flags: String,
	pub diacritics: bool,
	pub non_diacritics: bool,
	pub include_equivalents: bool,
	pub case_sensitive: bool,
	pub ignore_joiners: bool,
	pub replace_diacritic: String,
}

impl Default for RegexpConfig {
	fn default() -> Self {
		Self {
			flags: DEFAULT_FLAGS.to_string(),
			diacritics: true,
			non_diacritics: true,
			include_equivalents: true,
			case_sensitive: true,
			ignore_joiners: false,
			replace_diacritic: DEFAULT_REPLACE_DIACRITIC.to_string(),
		}
	}
}

impl RegexpConfig {
	pub fn options<'a>(&self) -> RegexOptions<'a> {
		RegexOptions {
			diacritics: self.diacritics,
			non_diacritics: self.non_diacritics,
			include_equivalents: self.include_equivalents,
			case_sensitive: self.case_sensitive,
			ignore_joiners: self.ignore_joiners,
			replace_diacritic: self.replace_diacritic.clone(),
			flags: self.flags.clone(),
			..RegexOptions::default()
		}
	}
}

impl DiacriticConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> DiacriticResult<Option<DiacriticConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> DiacriticResult<DiacriticConfig> {
		toml::from_str(content).map_err(|e| DiacriticError::ConfigParse(e.to_string()))
	}

	/// The record file path resolved against `root`.
	pub fn data_path(&self, root: &Path) -> Option<PathBuf> {
		self.data.as_ref().map(|path| root.join(path))
	}

	/// Load the configured record file. Returns `None` when no file is
	/// configured.
	pub fn load_store(&self, root: &Path) -> DiacriticResult<Option<MemoryStore>> {
		self.data_path(root)
			.map(|path| MemoryStore::load(&path))
			.transpose()
	}
}
