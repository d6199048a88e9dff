use indexmap::IndexMap;

use crate::DiacriticError;
use crate::DiacriticResult;
use crate::schema::NodeKind;
use crate::schema::PathSchema;
use crate::text;

/// One entry of a bracketed selector list, e.g. `raw` or `0` in
/// `equivalents[raw,0]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
	Name(String),
	Index(usize),
}

impl Selector {
	fn parse(item: &str, preserve_case: bool) -> Self {
		if !item.is_empty() && item.bytes().all(|byte| byte.is_ascii_digit()) {
			if let Ok(index) = item.parse() {
				return Self::Index(index);
			}
		}

		if preserve_case {
			Self::Name(item.to_string())
		} else {
			Self::Name(item.to_lowercase())
		}
	}

	pub fn as_name(&self) -> Option<&str> {
		match self {
			Self::Name(name) => Some(name),
			Self::Index(_) => None,
		}
	}

	pub fn as_index(&self) -> Option<usize> {
		match self {
			Self::Name(_) => None,
			Self::Index(index) => Some(*index),
		}
	}
}

/// How a path node was addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
	/// The node itself, with no narrowing.
	Node,
	/// The node narrowed to the listed selectors.
	Items(Vec<Selector>),
}

impl Selection {
	pub fn items(&self) -> Option<&[Selector]> {
		match self {
			Self::Node => None,
			Self::Items(items) => Some(items),
		}
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.items()
			.unwrap_or_default()
			.iter()
			.filter_map(Selector::as_name)
	}

	pub fn indices(&self) -> Vec<usize> {
		self.items()
			.unwrap_or_default()
			.iter()
			.filter_map(Selector::as_index)
			.collect()
	}

	pub fn contains_name(&self, name: &str) -> bool {
		self.names().any(|item| item == name)
	}
}

/// A validated path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
	/// Canonical node names from the schema root to the target.
	pub path: Vec<&'static str>,
	/// The selection recorded for every node on the path.
	pub cross_ref: IndexMap<&'static str, Selection>,
	/// Indices into the final deduplicated results.
	pub post_filters: Vec<usize>,
}

struct Segment {
	name: String,
	selectors: Vec<Selector>,
}

impl PathExpression {
	/// Validate a dotted expression such as `equivalents[raw,unicode].[0,2]`
	/// against the path schema.
	///
	/// Any suffix of the canonical path may be given, so `alphabet`,
	/// `metadata.alphabet` and `variant.metadata.alphabet` are equivalent.
	pub fn parse(expression: &str) -> DiacriticResult<Self> {
		let invalid = |reason: &str| {
			DiacriticError::InvalidPath {
				path: expression.to_string(),
				reason: reason.to_string(),
			}
		};

		let expression_trimmed = expression.trim();
		if expression_trimmed.is_empty() {
			return Err(invalid("cannot process an empty path"));
		}

		let mut parts: Vec<&str> = expression_trimmed.split('.').map(str::trim).rev().collect();

		let mut post_filters = Vec::new();
		let leaf_is_filter = parts
			.first()
			.is_some_and(|first| first.len() > 2 && first.starts_with('[') && first.ends_with(']'));
		if leaf_is_filter {
			for item in bracket_items(parts[0]) {
				match Selector::parse(item, false) {
					Selector::Index(index) => post_filters.push(index),
					Selector::Name(name) => {
						return Err(invalid(&format!("post-filter entry `{name}` is not an index")));
					}
				}
			}
			parts.remove(0);
		}

		if parts.is_empty() {
			return Err(invalid("a path needs at least one named segment"));
		}

		parts.reverse();
		let schema = PathSchema::global();
		let segments = parts
			.iter()
			.map(|part| parse_segment(part, schema).map_err(|reason| invalid(&reason)))
			.collect::<DiacriticResult<Vec<_>>>()?;

		let Some(leaf) = segments.last() else {
			return Err(invalid("a path needs at least one named segment"));
		};
		let Some(path) = schema.ancestors(&leaf.name) else {
			return Err(invalid(&format!("`{}` does not reach the schema root", leaf.name)));
		};

		let mut cross_ref: IndexMap<&'static str, Selection> =
			path.iter().map(|node| (*node, Selection::Node)).collect();

		for segment in &segments {
			let Some(selection) = cross_ref.get_mut(segment.name.as_str()) else {
				return Err(invalid(&format!(
					"`{}` is not on the path to `{}`",
					segment.name, leaf.name
				)));
			};
			if !segment.selectors.is_empty() {
				*selection = Selection::Items(segment.selectors.clone());
			}
		}

		let target = path[path.len() - 1];
		let Some(node) = schema.get(target) else {
			return Err(invalid(&format!("`{target}` is not a valid path")));
		};

		if !node.is_terminal() {
			let kept = match cross_ref.get(target) {
				Some(Selection::Items(items)) => filter_children(target, items, schema),
				_ => Vec::new(),
			};
			if kept.is_empty() {
				return Err(invalid(&format!(
					"`{target}` cannot end a path without selecting one of its values"
				)));
			}
			cross_ref.insert(target, Selection::Items(kept));
		}

		Ok(Self {
			path,
			cross_ref,
			post_filters,
		})
	}

	/// The last node of the canonical path.
	pub fn target(&self) -> &'static str {
		self.path.last().copied().unwrap_or("variant")
	}

	pub fn contains(&self, node: &str) -> bool {
		self.path.iter().any(|item| *item == node)
	}

	pub fn selection(&self, node: &str) -> &Selection {
		self.cross_ref.get(node).unwrap_or(&Selection::Node)
	}

	/// The node following `node` on the path.
	pub fn next(&self, node: &str) -> Option<&'static str> {
		let index = self.path.iter().position(|item| *item == node)?;
		self.path.get(index + 1).copied()
	}
}

fn bracket_items(list: &str) -> impl Iterator<Item = &str> {
	list.trim_start_matches('[')
		.trim_end_matches(']')
		.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
}

fn parse_segment(part: &str, schema: &PathSchema) -> Result<Segment, String> {
	let (name, list) = match part.find('[') {
		Some(start) => (&part[..start], Some(&part[start..])),
		None => (part, None),
	};
	let name = name.trim().to_lowercase();

	if name.is_empty() || !schema.contains(&name) {
		return Err(format!("`{part}` ({name}) is not a valid path"));
	}

	let Some(list) = list else {
		return Ok(Segment {
			name,
			selectors: Vec::new(),
		});
	};

	if !list.ends_with(']') {
		return Err(format!("`{part}` has an unterminated selector list"));
	}

	if list == "[*]" {
		return Ok(Segment {
			name,
			selectors: Vec::new(),
		});
	}

	// Diacritic keys are data, so their selectors keep their case.
	let preserve_case = name == "diacritic";
	let selectors = text::dedupe(
		bracket_items(list)
			.map(|item| Selector::parse(item, preserve_case))
			.collect(),
	);

	Ok(Segment { name, selectors })
}

/// Keep the selectors that can address a value below `target`: any index,
/// and names of non-object children of `target`.
fn filter_children(target: &str, items: &[Selector], schema: &PathSchema) -> Vec<Selector> {
	let kept = items
		.iter()
		.filter(|item| {
			match item {
				Selector::Index(_) => true,
				Selector::Name(name) => {
					schema.get(name).is_some_and(|child| {
						child.parent == Some(target)
							&& child.kind != NodeKind::Object
							&& (child.kind != NodeKind::Array || child.valid_end)
					})
				}
			}
		})
		.cloned()
		.collect();

	text::dedupe(kept)
}
