use std::fmt;
use std::sync::LazyLock;

use regex::NoExpand;
use regex::Regex;
use regex::RegexBuilder;

use crate::DiacriticError;
use crate::DiacriticResult;
use crate::path::PathExpression;
use crate::path::Selection;
use crate::record::Variant;
use crate::record::VariantSet;
use crate::store::DiacriticStore;
use crate::store::Filter;
use crate::store::Lookup;
use crate::store::lookup_diacritics;
use crate::text;

pub const DEFAULT_TEMPLATE: &str = "<% diacritics: {data} %>";
pub const DEFAULT_JOINER: &str = ", ";

static DATA_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\{\s*data\s*\}").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static LEGACY_ROUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/v\d+/\?").unwrap());

/// A single value about to be added to the placeholder results.
#[derive(Debug, Clone, Copy)]
pub struct ValueContext<'a> {
	pub variant: &'a Variant,
	/// The diacritic being visited. `None` while reading metadata.
	pub diacritic: Option<&'a str>,
	/// The field the value was read from, e.g. `decompose` or `raw`.
	pub target: &'a str,
	pub value: &'a str,
}

pub type EachValue<'a> = dyn Fn(&ValueContext<'_>) -> Option<String> + 'a;
pub type DoneValues<'a> = dyn Fn(&[String], &str) -> String + 'a;

/// Options for [`replace_placeholder`].
pub struct PlaceholderOptions<'a> {
	/// The placeholder template; `{data}` marks where the query goes.
	pub template: String,
	/// Variant names or diacritics to leave out of the results.
	pub exclude: Vec<String>,
	pub joiner: String,
	/// Rewrites each value before it is collected. Returning `None` or an
	/// empty string drops the value.
	pub each: Option<Box<EachValue<'a>>>,
	/// Replaces the default join of the final results.
	pub done: Option<Box<DoneValues<'a>>>,
}

impl Default for PlaceholderOptions<'_> {
	fn default() -> Self {
		Self {
			template: DEFAULT_TEMPLATE.to_string(),
			exclude: Vec::new(),
			joiner: DEFAULT_JOINER.to_string(),
			each: None,
			done: None,
		}
	}
}

impl fmt::Debug for PlaceholderOptions<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PlaceholderOptions")
			.field("template", &self.template)
			.field("exclude", &self.exclude)
			.field("joiner", &self.joiner)
			.field("each", &self.each.is_some())
			.field("done", &self.done.is_some())
			.finish()
	}
}

impl<'a> PlaceholderOptions<'a> {
	#[must_use]
	pub fn with_template(mut self, template: impl Into<String>) -> Self {
		self.template = template.into();
		self
	}

	#[must_use]
	pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.exclude = exclude.into_iter().map(Into::into).collect();
		self
	}

	#[must_use]
	pub fn with_joiner(mut self, joiner: impl Into<String>) -> Self {
		self.joiner = joiner.into();
		self
	}

	#[must_use]
	pub fn with_each(mut self, each: impl Fn(&ValueContext<'_>) -> Option<String> + 'a) -> Self {
		self.each = Some(Box::new(each));
		self
	}

	#[must_use]
	pub fn with_done(mut self, done: impl Fn(&[String], &str) -> String + 'a) -> Self {
		self.done = Some(Box::new(done));
		self
	}

	fn is_excluded(&self, name: &str) -> bool {
		self.exclude.iter().any(|item| item == name)
	}
}

/// A parsed `filter=code;path` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
	/// The placeholder exactly as it appeared in the text.
	pub raw: String,
	pub filter: Filter,
	pub code: String,
	pub expression: PathExpression,
}

/// One template match in the text and the outcome of parsing it.
#[derive(Debug)]
pub struct PlaceholderMatch {
	pub raw: String,
	pub placeholder: DiacriticResult<Placeholder>,
}

/// Why a placeholder was left in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
	/// The placeholder content could not be parsed.
	Invalid,
	/// The store has no records for the query.
	NotFound,
	/// The query matched records but the path selected no values.
	Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderDiagnostic {
	pub placeholder: String,
	pub kind: DiagnosticKind,
	pub message: String,
}

impl fmt::Display for PlaceholderDiagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.placeholder, self.message)
	}
}

/// The values a placeholder resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	Values(Vec<String>),
	NotFound(String),
}

/// Build the pattern that finds every placeholder written with `template`.
fn template_pattern(template: &str) -> DiacriticResult<Regex> {
	let parts: Vec<String> = DATA_MARKER
		.split(template)
		.map(|part| whitespace_tolerant(&text::escape(part)))
		.collect();

	Ok(RegexBuilder::new(&parts.join("(.+?)"))
		.case_insensitive(true)
		.multi_line(true)
		.build()?)
}

fn whitespace_tolerant(escaped: &str) -> String {
	WHITESPACE.replace_all(escaped, r"\s*").into_owned()
}

/// Find every placeholder in `text` and parse its content.
pub fn extract_placeholders(text: &str, template: &str) -> DiacriticResult<Vec<PlaceholderMatch>> {
	let pattern = template_pattern(template)?;

	let matches = pattern
		.captures_iter(text)
		.filter_map(|captures| {
			let raw = captures.get(0)?.as_str().to_string();
			let placeholder = match captures.get(1) {
				Some(inner) => parse_placeholder(&raw, inner.as_str()),
				None => {
					Err(DiacriticError::InvalidPlaceholder {
						placeholder: raw.clone(),
						reason: "the template has no `{data}` marker".to_string(),
					})
				}
			};
			Some(PlaceholderMatch { raw, placeholder })
		})
		.collect();

	Ok(matches)
}

/// Parse the content captured by the template, e.g. `base=u;equivalents.raw`.
pub fn parse_placeholder(raw: &str, inner: &str) -> DiacriticResult<Placeholder> {
	let invalid = |reason: &str| {
		DiacriticError::InvalidPlaceholder {
			placeholder: raw.to_string(),
			reason: reason.to_string(),
		}
	};

	let compact: String = inner.chars().filter(|ch| !ch.is_whitespace()).collect();
	let mut items = compact.split(';');

	let query = items.next().unwrap_or_default();
	let Some((filter, code)) = query.split_once('=') else {
		return Err(invalid("expected `filter=code` before the first `;`"));
	};

	let filter: Filter = LEGACY_ROUTE.replace(filter, "").parse()?;
	if code.is_empty() {
		return Err(invalid("the filter code is empty"));
	}

	let mut expression = None;
	for item in items.filter(|item| !item.is_empty()) {
		expression = Some(PathExpression::parse(item)?);
	}

	let Some(expression) = expression else {
		return Err(invalid("no path was given after the filter"));
	};

	Ok(Placeholder {
		raw: raw.to_string(),
		filter,
		code: code.to_string(),
		expression,
	})
}

impl Placeholder {
	/// Query the store for this placeholder's filter.
	pub fn fetch(&self, store: &impl DiacriticStore) -> Lookup {
		match self.filter {
			Filter::Diacritic => lookup_diacritics(store, &self.code),
			filter => store.get_by_filter(filter, &self.code),
		}
	}

	/// Fetch the records and walk them along the path.
	pub fn resolve(&self, store: &impl DiacriticStore, options: &PlaceholderOptions<'_>) -> Resolution {
		match self.fetch(store) {
			Lookup::Found(set) => Resolution::Values(self.collect(&set, options)),
			Lookup::NotFound { message } => Resolution::NotFound(message),
		}
	}

	/// Collect the values the path selects from `set`, in document order.
	pub fn collect(&self, set: &VariantSet, options: &PlaceholderOptions<'_>) -> Vec<String> {
		let mut collector = Collector {
			options,
			results: Vec::new(),
		};

		if self.expression.contains("metadata") {
			self.collect_metadata(set, &mut collector);
		} else {
			self.collect_data(set, &mut collector);
		}

		collector.results
	}

	fn collect_metadata(&self, set: &VariantSet, collector: &mut Collector<'_, '_>) {
		let expression = &self.expression;
		let variants = expression.selection("variant");
		let options = collector.options;
		let joiner = options.joiner.as_str();

		for variant in set.iter() {
			if !includes(variants, &variant.name, options) {
				continue;
			}

			let metadata = &variant.metadata;
			for name in expression.selection("metadata").names() {
				if let Some(value) = metadata.field(name) {
					collector.push(variant, None, name, &value.joined(joiner));
				}
			}

			let Some(field) = expression.next("metadata") else {
				continue;
			};
			let Some(value) = metadata.field(field) else {
				continue;
			};

			match expression.selection(field) {
				Selection::Node => collector.push(variant, None, field, &value.joined(joiner)),
				selection => {
					for index in selection.indices() {
						if let Some(item) = value.at(index) {
							collector.push(variant, None, field, item);
						}
					}
				}
			}
		}
	}

	fn collect_data(&self, set: &VariantSet, collector: &mut Collector<'_, '_>) {
		let expression = &self.expression;
		let variants = expression.selection("variant");
		let diacritics = expression.selection("diacritic");
		let Some(branch) = expression.next("diacritic") else {
			return;
		};
		let target = expression.next(branch);

		for (variant, diacritic, entry) in set.entries() {
			if !includes(variants, &variant.name, collector.options)
				|| !includes(diacritics, diacritic, collector.options)
			{
				continue;
			}

			let selection = expression.selection(branch);
			if branch == "mapping" {
				let fields: Vec<&str> = match selection {
					Selection::Items(_) => selection.names().collect(),
					Selection::Node => target.into_iter().collect(),
				};
				for field in fields {
					if let Some(value) = entry.mapping.field(field) {
						collector.push(variant, Some(diacritic), field, value);
					}
				}
				continue;
			}

			let indices = selection.indices();
			for (index, equivalent) in entry.equivalents.iter().enumerate() {
				if !indices.is_empty() && !indices.contains(&index) {
					continue;
				}
				for field in selection.names().chain(target) {
					if let Some(value) = equivalent.field(field) {
						collector.push(variant, Some(diacritic), field, value);
					}
				}
			}
		}
	}

	/// Deduplicate, apply the post-filter and join the results.
	pub fn finalize(&self, results: Vec<String>, options: &PlaceholderOptions<'_>) -> Option<String> {
		let mut results = text::dedupe(results);
		let filters = &self.expression.post_filters;
		if !filters.is_empty() {
			results = results
				.into_iter()
				.enumerate()
				.filter(|(index, _)| filters.contains(index))
				.map(|(_, value)| value)
				.collect();
		}

		if results.is_empty() {
			return None;
		}

		Some(match &options.done {
			Some(done) => done(&results, &options.joiner),
			None => results.join(&options.joiner),
		})
	}
}

/// An explicit selector list wins over the exclude list.
fn includes(selection: &Selection, name: &str, options: &PlaceholderOptions<'_>) -> bool {
	match selection {
		Selection::Items(_) => selection.contains_name(name),
		Selection::Node => !options.is_excluded(name),
	}
}

struct Collector<'o, 'a> {
	options: &'o PlaceholderOptions<'a>,
	results: Vec<String>,
}

impl Collector<'_, '_> {
	fn push(&mut self, variant: &Variant, diacritic: Option<&str>, target: &str, value: &str) {
		let value = match &self.options.each {
			Some(each) => {
				each(&ValueContext {
					variant,
					diacritic,
					target,
					value,
				})
			}
			None => Some(value.to_string()),
		};

		if let Some(value) = value.filter(|value| !value.is_empty()) {
			self.results.push(value);
		}
	}
}

/// Replace every placeholder in `text` with the values it selects from
/// `store`. Placeholders that are invalid or select nothing stay as they
/// are.
pub fn replace_placeholder(
	text: &str,
	store: &impl DiacriticStore,
	options: &PlaceholderOptions<'_>,
) -> DiacriticResult<String> {
	replace_placeholder_with_diagnostics(text, store, options).map(|(text, _)| text)
}

/// Like [`replace_placeholder`], also returning a diagnostic for every
/// placeholder that was left in place.
pub fn replace_placeholder_with_diagnostics(
	text: &str,
	store: &impl DiacriticStore,
	options: &PlaceholderOptions<'_>,
) -> DiacriticResult<(String, Vec<PlaceholderDiagnostic>)> {
	let mut output = text.to_string();
	let mut diagnostics = Vec::new();

	for found in extract_placeholders(text, &options.template)? {
		let diagnostic = |kind, message: String| {
			PlaceholderDiagnostic {
				placeholder: found.raw.clone(),
				kind,
				message,
			}
		};

		let placeholder = match &found.placeholder {
			Ok(placeholder) => placeholder,
			Err(error) => {
				tracing::warn!(placeholder = %found.raw, "invalid placeholder: {error}");
				diagnostics.push(diagnostic(DiagnosticKind::Invalid, error.to_string()));
				continue;
			}
		};

		let results = match placeholder.resolve(store, options) {
			Resolution::Values(results) => results,
			Resolution::NotFound(message) => {
				tracing::debug!(placeholder = %found.raw, "{message}");
				diagnostics.push(diagnostic(DiagnosticKind::NotFound, message));
				continue;
			}
		};

		let Some(value) = placeholder.finalize(results, options) else {
			tracing::debug!(placeholder = %found.raw, "placeholder selected no values");
			diagnostics.push(diagnostic(
				DiagnosticKind::Empty,
				"the path selected no values".to_string(),
			));
			continue;
		};

		// Case matters here: `diacritic=ü` and `diacritic=Ü` are different keys.
		let pattern = Regex::new(&whitespace_tolerant(&text::escape(&found.raw)))?;
		output = pattern.replace_all(&output, NoExpand(&value)).into_owned();
	}

	Ok((output, diagnostics))
}
