use std::sync::LazyLock;

use indexmap::IndexMap;

/// Upper bound on parent hops when walking from a node to the schema root.
/// The table below never nests this deep; the bound only stops a malformed
/// table from looping.
pub const MAX_ANCESTOR_HOPS: usize = 50;

/// The shape of the value stored at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
	Object,
	String,
	Array,
}

/// One named location in a diacritic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathNode {
	pub name: &'static str,
	/// `None` for nodes that hang directly off the schema root.
	pub parent: Option<&'static str>,
	pub kind: NodeKind,
	/// Array nodes whose entries may be joined into one composite string.
	pub valid_end: bool,
}

impl PathNode {
	const fn new(name: &'static str, parent: Option<&'static str>, kind: NodeKind) -> Self {
		Self {
			name,
			parent,
			kind,
			valid_end: false,
		}
	}

	const fn joinable(name: &'static str, parent: &'static str) -> Self {
		Self {
			name,
			parent: Some(parent),
			kind: NodeKind::Array,
			valid_end: true,
		}
	}

	/// A path may stop at this node without naming anything below it.
	pub fn is_terminal(&self) -> bool {
		match self.kind {
			NodeKind::String => true,
			NodeKind::Array => self.valid_end,
			NodeKind::Object => false,
		}
	}
}

const NODES: [PathNode; 20] = [
	PathNode::new("variant", None, NodeKind::Object),
	PathNode::new("metadata", Some("variant"), NodeKind::Object),
	PathNode::new("alphabet", Some("metadata"), NodeKind::String),
	PathNode::new("continent", Some("metadata"), NodeKind::String),
	PathNode::new("language", Some("metadata"), NodeKind::String),
	PathNode::new("native", Some("metadata"), NodeKind::String),
	PathNode::joinable("countries", "metadata"),
	PathNode::joinable("sources", "metadata"),
	PathNode::new("data", Some("variant"), NodeKind::Object),
	PathNode::new("diacritic", Some("data"), NodeKind::Object),
	PathNode::new("mapping", Some("diacritic"), NodeKind::Object),
	PathNode::new("base", Some("mapping"), NodeKind::String),
	PathNode::new("decompose", Some("mapping"), NodeKind::String),
	PathNode::new("equivalents", Some("diacritic"), NodeKind::Array),
	PathNode::new("raw", Some("equivalents"), NodeKind::String),
	PathNode::new("unicode", Some("equivalents"), NodeKind::String),
	PathNode::new("html_decimal", Some("equivalents"), NodeKind::String),
	PathNode::new("html_hex", Some("equivalents"), NodeKind::String),
	PathNode::new("encoded_uri", Some("equivalents"), NodeKind::String),
	PathNode::new("html_entity", Some("equivalents"), NodeKind::String),
];

/// The immutable node table, keyed by node name.
pub struct PathSchema {
	nodes: IndexMap<&'static str, PathNode>,
	max_depth: usize,
}

static SCHEMA: LazyLock<PathSchema> = LazyLock::new(|| PathSchema::build(&NODES));

impl PathSchema {
	/// The schema shared by every resolver.
	pub fn global() -> &'static PathSchema {
		&SCHEMA
	}

	fn build(nodes: &[PathNode]) -> Self {
		let mut schema = Self {
			nodes: nodes.iter().map(|node| (node.name, *node)).collect(),
			max_depth: 0,
		};

		schema.max_depth = schema
			.nodes
			.keys()
			.filter_map(|name| schema.ancestors(name).map(|chain| chain.len()))
			.max()
			.unwrap_or(0);
		debug_assert!(
			schema.max_depth <= MAX_ANCESTOR_HOPS,
			"schema depth {} exceeds the ancestor hop limit",
			schema.max_depth
		);

		schema
	}

	pub fn get(&self, name: &str) -> Option<&PathNode> {
		self.nodes.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.nodes.contains_key(name)
	}

	/// The deepest root-to-leaf chain in the table.
	pub fn max_depth(&self) -> usize {
		self.max_depth
	}

	pub fn children<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a PathNode> + 'a {
		self.nodes
			.values()
			.filter(move |node| node.parent == Some(parent))
	}

	/// The canonical root-to-leaf chain ending at `leaf`. Returns `None` for
	/// unknown names, dangling parents, or chains longer than
	/// [`MAX_ANCESTOR_HOPS`].
	pub fn ancestors(&self, leaf: &str) -> Option<Vec<&'static str>> {
		let mut node = self.nodes.get(leaf)?;
		let mut chain = vec![node.name];

		for _ in 0..MAX_ANCESTOR_HOPS {
			let Some(parent) = node.parent else {
				chain.reverse();
				return Some(chain);
			};
			node = self.nodes.get(parent)?;
			chain.push(node.name);
		}

		None
	}
}

impl std::fmt::Debug for PathSchema {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PathSchema")
			.field("nodes", &self.nodes.keys().collect::<Vec<_>>())
			.field("max_depth", &self.max_depth)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_node_reaches_the_root() {
		let schema = PathSchema::global();
		for node in &NODES {
			let chain = schema.ancestors(node.name).unwrap_or_default();
			assert_eq!(chain.first(), Some(&"variant"), "{}", node.name);
			assert_eq!(chain.last(), Some(&node.name));
		}
	}

	#[test]
	fn depth_stays_within_hop_limit() {
		assert_eq!(PathSchema::global().max_depth(), 5);
	}

	#[test]
	fn cyclic_table_is_rejected() {
		let schema = PathSchema::build(&[
			PathNode::new("a", Some("b"), NodeKind::Object),
			PathNode::new("b", Some("a"), NodeKind::Object),
		]);
		assert_eq!(schema.ancestors("a"), None);
	}
}
