//! Tree flattening into renderable graph nodes and containment edges.

use super::catalog::EntityId;
use super::tree::{ROOT_NAME, TreeNode};

/// What a graph node stands for. Each variant carries only its own fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
	/// A directory, including an owner's tree root.
	Directory {
		/// Direct children.
		child_count: usize,
	},
	/// A changed file.
	File,
	/// A whole related pull request collapsed into one node.
	EntityHub {
		/// Pull request title.
		title: String,
		/// Pull request number.
		number: u64,
		/// Number of changed files.
		file_count: usize,
	},
}

/// A node of the composed file graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphNode {
	/// Unique within one composed graph. Related entities use a `rel:<id>:` prefix.
	pub id: String,
	/// Last path segment, or the title for hubs.
	pub name: String,
	/// Rolled-up added lines.
	pub additions: u64,
	/// Rolled-up deleted lines.
	pub deletions: u64,
	/// Distance from the owner's hub or, for the primary, from its root.
	pub depth: usize,
	/// Pull request this node belongs to.
	pub owner: EntityId,
	/// Whether the owner is the pull request the graph was built around.
	pub is_primary_owner: bool,
	/// Directory, file, or hub.
	pub kind: NodeKind,
}

impl GraphNode {
	/// Whether this is a changed file.
	pub fn is_file(&self) -> bool {
		matches!(self.kind, NodeKind::File)
	}

	/// Whether this is a related entity's hub.
	pub fn is_hub(&self) -> bool {
		matches!(self.kind, NodeKind::EntityHub { .. })
	}

	/// True for the root directory of an owner's tree.
	pub fn is_tree_root(&self) -> bool {
		matches!(self.kind, NodeKind::Directory { .. }) && self.relative_path() == ROOT_NAME
	}

	/// Total changed lines.
	pub fn changes(&self) -> u64 {
		self.additions + self.deletions
	}

	/// Path relative to the repository root, with any owner prefix removed.
	pub fn relative_path(&self) -> &str {
		match self.id.strip_prefix("rel:") {
			Some(rest) => rest.split_once(':').map_or(rest, |(_, path)| path),
			None => &self.id,
		}
	}
}

/// Meaning of a graph edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeKind {
	/// Parent directory to child, or hub to the root of its tree.
	Containment,
	/// Shared directory of the primary tree to a related hub.
	Relationship,
}

/// A directed edge between two node ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphEdge {
	/// Parent or shared-directory node id.
	pub source: String,
	/// Child or hub node id.
	pub target: String,
	/// Containment or relationship.
	pub kind: EdgeKind,
}

impl GraphEdge {
	/// Parent-to-child edge.
	pub fn containment(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind: EdgeKind::Containment,
		}
	}

	/// Shared-directory-to-hub edge.
	pub fn relationship(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind: EdgeKind::Relationship,
		}
	}

	/// Whether this edge links two pull requests.
	pub fn is_relationship(&self) -> bool {
		self.kind == EdgeKind::Relationship
	}
}

/// Where and for whom a tree is flattened.
#[derive(Clone, Copy, Debug)]
pub struct FlattenScope<'a> {
	/// Pull request that owns the nodes.
	pub owner: EntityId,
	/// Whether the owner is the graph's primary.
	pub is_primary: bool,
	/// Empty for the primary entity.
	pub prefix: &'a str,
	/// Depth assigned to the tree root.
	pub depth: usize,
	/// Node the tree root hangs off, if any.
	pub parent: Option<&'a str>,
}

impl<'a> FlattenScope<'a> {
	/// Scope of the primary tree: no prefix, no parent.
	pub fn primary(owner: EntityId) -> Self {
		Self {
			owner,
			is_primary: true,
			prefix: "",
			depth: 0,
			parent: None,
		}
	}
}

/// Id of a tree node under a prefix.
pub fn node_id(prefix: &str, path: &str) -> String {
	if path.is_empty() {
		format!("{prefix}{ROOT_NAME}")
	} else {
		format!("{prefix}{path}")
	}
}

/// Appends the pre-order flattening of `tree` to `nodes` and `edges`.
///
/// Children are visited in insertion order, so identical input always yields
/// identical output order.
pub fn flatten_tree(
	tree: &TreeNode,
	scope: FlattenScope<'_>,
	nodes: &mut Vec<GraphNode>,
	edges: &mut Vec<GraphEdge>,
) {
	let id = node_id(scope.prefix, &tree.path);
	let kind = if tree.is_leaf {
		NodeKind::File
	} else {
		NodeKind::Directory {
			child_count: tree.children.len(),
		}
	};
	nodes.push(GraphNode {
		id: id.clone(),
		name: tree.name.clone(),
		additions: tree.additions,
		deletions: tree.deletions,
		depth: scope.depth,
		owner: scope.owner,
		is_primary_owner: scope.is_primary,
		kind,
	});
	if let Some(parent) = scope.parent {
		edges.push(GraphEdge::containment(parent, id.as_str()));
	}
	for child in &tree.children {
		flatten_tree(
			child,
			FlattenScope {
				depth: scope.depth + 1,
				parent: Some(id.as_str()),
				..scope
			},
			nodes,
			edges,
		);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::catalog::FileChangeRecord;
	use crate::model::tree::build_tree;

	fn scenario() -> TreeNode {
		build_tree(&[
			FileChangeRecord::new("src/api/handler.ts", 10, 2),
			FileChangeRecord::new("src/api/types.ts", 4, 1),
			FileChangeRecord::new("README.md", 1, 0),
		])
	}

	#[test]
	fn scenario_flattens_in_pre_order() {
		let (mut nodes, mut edges) = (Vec::new(), Vec::new());
		flatten_tree(&scenario(), FlattenScope::primary(7), &mut nodes, &mut edges);

		let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(
			ids,
			vec![
				"root",
				"src",
				"src/api",
				"src/api/handler.ts",
				"src/api/types.ts",
				"README.md"
			]
		);
		assert_eq!(edges.len(), nodes.len() - 1);
		assert!(edges.iter().all(|e| e.kind == EdgeKind::Containment));
		assert_eq!(nodes[0].kind, NodeKind::Directory { child_count: 2 });
		assert_eq!(nodes[3].kind, NodeKind::File);
		assert_eq!(nodes[3].depth, 3);
		assert!(nodes.iter().all(|n| n.owner == 7 && n.is_primary_owner));
	}

	#[test]
	fn every_non_root_has_one_parent() {
		let (mut nodes, mut edges) = (Vec::new(), Vec::new());
		flatten_tree(&scenario(), FlattenScope::primary(1), &mut nodes, &mut edges);
		for node in nodes.iter().skip(1) {
			let incoming = edges.iter().filter(|e| e.target == node.id).count();
			assert_eq!(incoming, 1, "{}", node.id);
		}
		assert!(!edges.iter().any(|e| e.target == "root"));
	}

	#[test]
	fn prefixed_scope_attaches_to_parent() {
		let (mut nodes, mut edges) = (Vec::new(), Vec::new());
		let scope = FlattenScope {
			owner: 3,
			is_primary: false,
			prefix: "rel:3:",
			depth: 1,
			parent: Some("rel:3:hub"),
		};
		flatten_tree(&scenario(), scope, &mut nodes, &mut edges);
		assert_eq!(nodes[0].id, "rel:3:root");
		assert_eq!(nodes[0].depth, 1);
		assert_eq!(edges[0], GraphEdge::containment("rel:3:hub", "rel:3:root"));
		assert_eq!(nodes[3].relative_path(), "src/api/handler.ts");
		assert!(nodes.iter().all(|n| !n.is_primary_owner));
	}

	#[test]
	fn flattening_is_deterministic() {
		let tree = scenario();
		let run = || {
			let (mut nodes, mut edges) = (Vec::new(), Vec::new());
			flatten_tree(&tree, FlattenScope::primary(1), &mut nodes, &mut edges);
			(nodes, edges)
		};
		assert_eq!(run(), run());
	}
}
