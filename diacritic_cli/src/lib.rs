use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use diacritic_core::MappingKind;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Diacritic-aware regular expressions, placeholders and transliteration.",
	long_about = "diacritic builds regular expressions that match every equivalent spelling of a \
	              diacritic, fills `<% diacritics: filter=code;path %>` placeholders with values \
	              from a diacritic record file, and transliterates text to plain letters.\n\nThe \
	              record file is read from `--data` or from the `data` key of \
	              `diacritic.toml`.\n\nQuick start:\n  diacritic regexp \"Tést\"          Print a \
	              pattern\n  diacritic replace readme.md       Fill placeholders\n  diacritic \
	              transliterate \"Straße\"  Replace diacritics\n  diacritic lookup language de      \
	              Show matching records\n  diacritic format-unicode \"\\u00FC\"  Decode \
	              escapes"
)]
pub struct DiacriticCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory, where `diacritic.toml` is
	/// discovered.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Record file to load. Overrides the `data` key of the config file.
	#[arg(long, short, global = true)]
	pub data: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Print a regular expression matching the text and every equivalent
	/// spelling of its diacritics.
	///
	/// Flags given here override the `[regexp]` section of `diacritic.toml`.
	Regexp(RegexpArgs),
	/// Replace every placeholder in a file, or in stdin when no file is
	/// given.
	///
	/// Invalid placeholders and placeholders that select no values are left
	/// in place and reported on stderr. Use `--check` in CI pipelines to fail
	/// when a file is not up to date.
	Replace(ReplaceArgs),
	/// Replace every diacritic in the text with its base or decomposed
	/// mapping.
	Transliterate {
		/// The text to transliterate. Reads stdin when omitted.
		text: Option<String>,

		/// Which mapping replaces each diacritic.
		#[arg(long, value_enum, default_value_t = MappingArg::Base)]
		kind: MappingArg,

		/// Only use the mappings of this variant.
		#[arg(long)]
		variant: Option<String>,
	},
	/// Print the records matching `filter=code` as JSON.
	Lookup {
		/// One of `alphabet`, `continent`, `country`, `language`, `variant`,
		/// `base`, `decompose` or `diacritic`.
		filter: String,

		/// The value to match.
		code: String,
	},
	/// Replace `\uHHHH` escapes with the characters they name, as stored in
	/// the `unicode` field of the records.
	FormatUnicode {
		/// The text to decode. Reads stdin when omitted.
		text: Option<String>,
	},
}

#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct RegexpArgs {
	/// The text to build a pattern for.
	pub text: String,

	/// Regular expression flags, any of `gimsuyx`.
	#[arg(long)]
	pub flags: Option<String>,

	/// Replace diacritics with a catch-all pattern instead of their
	/// equivalents.
	#[arg(long, default_value_t = false)]
	pub no_diacritics: bool,

	/// Leave out the characters that are not diacritics.
	#[arg(long, default_value_t = false)]
	pub only_diacritics: bool,

	/// Use each diacritic as written rather than every known equivalent.
	#[arg(long, default_value_t = false)]
	pub no_equivalents: bool,

	/// Include the upper and lower case equivalents of every diacritic.
	#[arg(long, default_value_t = false)]
	pub ignore_case: bool,

	/// Allow zero-width joiners between characters.
	#[arg(long, default_value_t = false)]
	pub ignore_joiners: bool,

	/// Pattern used for diacritics when `--no-diacritics` is set.
	#[arg(long)]
	pub replace_diacritic: Option<String>,

	/// Test the pattern against this input. May be repeated. Exits with a
	/// non-zero status code when any input does not match.
	#[arg(long = "test")]
	pub tests: Vec<String>,
}

#[derive(Args)]
pub struct ReplaceArgs {
	/// The file to read. Reads stdin when omitted.
	pub file: Option<PathBuf>,

	/// Write the result back to the file instead of printing it.
	#[arg(long, default_value_t = false, conflicts_with = "check", requires = "file")]
	pub write: bool,

	/// Exit with a non-zero status code when placeholders would change the
	/// input, and print a diff of the changes.
	#[arg(long, default_value_t = false)]
	pub check: bool,

	/// The placeholder template. `{data}` marks where the query goes.
	#[arg(long)]
	pub template: Option<String>,

	/// Separator placed between the values of a placeholder.
	#[arg(long)]
	pub joiner: Option<String>,

	/// Variant names or diacritics to leave out. May be repeated or comma
	/// separated.
	#[arg(long, value_delimiter = ',')]
	pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MappingArg {
	/// The plain letter, e.g. `u` for `ü`.
	Base,
	/// The decomposed form, e.g. `ue` for `ü`.
	Decompose,
}

impl From<MappingArg> for MappingKind {
	fn from(value: MappingArg) -> Self {
		match value {
			MappingArg::Base => MappingKind::Base,
			MappingArg::Decompose => MappingKind::Decompose,
		}
	}
}
