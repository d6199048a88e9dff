use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum DiacriticError {
	#[error(transparent)]
	#[diagnostic(code(diacritic::io_error))]
	Io(#[from] std::io::Error),

	#[error("invalid input: {0}")]
	#[diagnostic(
		code(diacritic::invalid_input),
		help("the input must be valid UTF-8 text")
	)]
	InvalidInput(String),

	#[error("invalid placeholder `{placeholder}`: {reason}")]
	#[diagnostic(
		code(diacritic::invalid_placeholder),
		help("placeholders take the form `filter=code;path`, e.g. `base=u;equivalents.raw`")
	)]
	InvalidPlaceholder { placeholder: String, reason: String },

	#[error("invalid path `{path}`: {reason}")]
	#[diagnostic(
		code(diacritic::invalid_path),
		help(
			"valid path names: variant, metadata, alphabet, continent, language, native, \
			 countries, sources, data, diacritic, mapping, base, decompose, equivalents, raw, \
			 unicode, html_decimal, html_hex, encoded_uri, html_entity"
		)
	)]
	InvalidPath { path: String, reason: String },

	#[error("unknown filter: `{0}`")]
	#[diagnostic(
		code(diacritic::invalid_filter),
		help(
			"available filters: alphabet, continent, country, language, variant, base, \
			 decompose, diacritic"
		)
	)]
	InvalidFilter(String),

	#[error("unknown regular expression flag: `{0}`")]
	#[diagnostic(
		code(diacritic::invalid_flag),
		help("supported flags: g, i, m, s, u, x, y")
	)]
	InvalidFlag(char),

	#[error("synthesized pattern does not compile: {0}")]
	#[diagnostic(code(diacritic::invalid_pattern))]
	InvalidPattern(#[from] regex::Error),

	#[error("invalid mapping kind: `{0}`")]
	#[diagnostic(
		code(diacritic::invalid_mapping_kind),
		help("use `base` or `decompose`")
	)]
	InvalidMappingKind(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(diacritic::config_parse),
		help("check that diacritic.toml is valid TOML with [placeholder] and/or [regexp] sections")
	)]
	ConfigParse(String),

	#[error("failed to load data file `{path}`: {reason}")]
	#[diagnostic(code(diacritic::data_file))]
	DataFile { path: String, reason: String },
}

pub type DiacriticResult<T> = Result<T, DiacriticError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
