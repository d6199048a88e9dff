use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use diacritic_cli::Commands;
use diacritic_cli::DiacriticCli;
use diacritic_cli::MappingArg;
use diacritic_cli::RegexpArgs;
use diacritic_cli::ReplaceArgs;
use diacritic_core::AnyEmptyResult;
use diacritic_core::AnyResult;
use diacritic_core::CachedStore;
use diacritic_core::DiacriticConfig;
use diacritic_core::DiacriticStore;
use diacritic_core::DiagnosticKind;
use diacritic_core::Filter;
use diacritic_core::Lookup;
use diacritic_core::MemoryStore;
use diacritic_core::PlaceholderDiagnostic;
use diacritic_core::create_regexp;
use diacritic_core::replace_placeholder_with_diagnostics;
use diacritic_core::text;
use diacritic_core::transliterate;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DiacriticCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Regexp(regexp)) => run_regexp(&args, regexp),
		Some(Commands::Replace(replace)) => run_replace(&args, replace),
		Some(Commands::Transliterate {
			text,
			kind,
			variant,
		}) => run_transliterate(&args, text.as_deref(), *kind, variant.as_deref()),
		Some(Commands::Lookup { filter, code }) => run_lookup(&args, filter, code),
		Some(Commands::FormatUnicode { text }) => run_format_unicode(text.as_deref()),
		None => {
			eprintln!("No subcommand specified. Run `diacritic --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<diacritic_core::DiacriticError>() {
			Ok(diacritic_err) => {
				let report: miette::Report = (*diacritic_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "error" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.init();
}

struct Project {
	root: PathBuf,
	config: DiacriticConfig,
}

fn load_project(args: &DiacriticCli) -> AnyResult<Project> {
	let root = args
		.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
	let config = DiacriticConfig::load(&root)?.unwrap_or_default();

	Ok(Project { root, config })
}

fn load_store(args: &DiacriticCli, project: &Project) -> AnyResult<CachedStore<MemoryStore>> {
	let store = match &args.data {
		Some(path) => {
			tracing::debug!(path = %path.display(), "loading records from --data");
			MemoryStore::load(path)?
		}
		None => {
			project.config.load_store(&project.root)?.ok_or(
				"no record file to load; pass `--data` or set `data` in diacritic.toml",
			)?
		}
	};

	Ok(CachedStore::new(store))
}

fn read_stdin() -> std::io::Result<Vec<u8>> {
	let mut bytes = Vec::new();
	std::io::stdin().read_to_end(&mut bytes)?;
	Ok(bytes)
}

fn run_regexp(args: &DiacriticCli, regexp: &RegexpArgs) -> AnyEmptyResult {
	let project = load_project(args)?;
	let store = load_store(args, &project)?;

	let mut options = project.config.regexp.options();
	if let Some(flags) = &regexp.flags {
		options.flags.clone_from(flags);
	}
	if let Some(replace_diacritic) = &regexp.replace_diacritic {
		options.replace_diacritic.clone_from(replace_diacritic);
	}
	options.diacritics &= !regexp.no_diacritics;
	options.non_diacritics &= !regexp.only_diacritics;
	options.include_equivalents &= !regexp.no_equivalents;
	options.case_sensitive &= !regexp.ignore_case;
	options.ignore_joiners |= regexp.ignore_joiners;

	let pattern = create_regexp(&regexp.text, &store, &options)?;
	println!("{}", pattern.as_str());

	let mut failed = false;
	for input in &regexp.tests {
		if pattern.is_match(input) {
			println!("{} {input}", colored!("match:", green));
		} else {
			failed = true;
			println!("{} {input}", colored!("no match:", red));
		}
	}

	if failed {
		process::exit(1);
	}

	Ok(())
}

fn run_replace(args: &DiacriticCli, replace: &ReplaceArgs) -> AnyEmptyResult {
	let project = load_project(args)?;
	let store = load_store(args, &project)?;

	let mut placeholder = project.config.placeholder.clone();
	if let Some(template) = &replace.template {
		placeholder.template.clone_from(template);
	}
	if let Some(joiner) = &replace.joiner {
		placeholder.joiner.clone_from(joiner);
	}
	if !replace.exclude.is_empty() {
		placeholder.exclude.clone_from(&replace.exclude);
	}
	let options = placeholder.options();

	let bytes = match &replace.file {
		Some(file) => std::fs::read(file)?,
		None => read_stdin()?,
	};
	let input = text::input_text(&bytes)?;
	let (output, diagnostics) = replace_placeholder_with_diagnostics(input, &store, &options)?;

	for diagnostic in &diagnostics {
		print_diagnostic(diagnostic);
	}

	let name = replace
		.file
		.as_ref()
		.map_or_else(|| "<stdin>".to_string(), |file| file.display().to_string());

	if replace.check {
		if output == input {
			println!("Check passed: {name} is up to date.");
			return Ok(());
		}

		eprintln!(
			"{} {name} has placeholders to replace.",
			colored!("Check failed:", red)
		);
		print_diff(input, &output);
		process::exit(1);
	}

	if replace.write {
		if output == input {
			println!("{name} is up to date.");
		} else if let Some(file) = &replace.file {
			std::fs::write(file, &output)?;
			println!("Updated {name}");
		}
		return Ok(());
	}

	print!("{output}");
	Ok(())
}

fn run_transliterate(
	args: &DiacriticCli,
	value: Option<&str>,
	kind: MappingArg,
	variant: Option<&str>,
) -> AnyEmptyResult {
	let project = load_project(args)?;
	let store = load_store(args, &project)?;

	let input = read_value(value)?;
	print_text(&transliterate(&input, &store, kind.into(), variant));

	Ok(())
}

fn run_format_unicode(value: Option<&str>) -> AnyEmptyResult {
	let input = read_value(value)?;
	print_text(&text::format_unicode(&input));

	Ok(())
}

/// The positional text argument, or stdin when it is absent.
fn read_value(value: Option<&str>) -> AnyResult<String> {
	match value {
		Some(value) => Ok(value.to_string()),
		None => {
			let bytes = read_stdin()?;
			Ok(text::input_text(&bytes)?.to_string())
		}
	}
}

fn print_text(output: &str) {
	if output.ends_with('\n') {
		print!("{output}");
	} else {
		println!("{output}");
	}
}

fn run_lookup(args: &DiacriticCli, filter: &str, code: &str) -> AnyEmptyResult {
	let filter: Filter = filter.parse()?;
	let project = load_project(args)?;
	let store = load_store(args, &project)?;

	match store.get_by_filter(filter, code) {
		Lookup::Found(set) => {
			println!("{}", serde_json::to_string_pretty(&*set)?);
		}
		Lookup::NotFound { message } => {
			eprintln!("{} {message}", colored!("error:", red));
			process::exit(1);
		}
	}

	Ok(())
}

fn print_diagnostic(diagnostic: &PlaceholderDiagnostic) {
	let label = match diagnostic.kind {
		DiagnosticKind::Invalid => "invalid placeholder",
		DiagnosticKind::NotFound => "no records",
		DiagnosticKind::Empty => "no values",
	};
	eprintln!("{} {label}: {diagnostic}", colored!("warning:", yellow));
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}
