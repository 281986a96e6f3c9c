//! Path-to-tree conversion with additive aggregation.
//!
//! Records are inserted into an arena first, with a name index per directory so
//! that finding an existing child is a hash lookup rather than a scan. A single
//! post-order pass then turns the arena into an owned [`TreeNode`] tree while
//! rolling up stats.

use std::collections::HashMap;

use super::catalog::FileChangeRecord;

/// Name of the synthetic root node.
pub const ROOT_NAME: &str = "root";

/// A directory or file in a changed-file tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
	/// Last path segment, or [`ROOT_NAME`] for the root.
	pub name: String,
	/// Full slash-joined path from the root. Empty for the root itself.
	pub path: String,
	/// Rolled-up additions over all descendant files.
	pub additions: u64,
	/// Rolled-up deletions over all descendant files.
	pub deletions: u64,
	/// Children in the order they were first seen.
	pub children: Vec<TreeNode>,
	/// Whether this node is a changed file.
	pub is_leaf: bool,
}

impl TreeNode {
	/// Whether this is the synthetic root.
	pub fn is_root(&self) -> bool {
		self.path.is_empty()
	}

	/// Total changed lines, the size of this node in partition views.
	pub fn value(&self) -> u64 {
		self.additions + self.deletions
	}

	/// Leaf descendants in pre-order. A leaf yields itself.
	pub fn leaves(&self) -> Vec<&TreeNode> {
		let mut out = Vec::new();
		self.collect_leaves(&mut out);
		out
	}

	fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a TreeNode>) {
		if self.is_leaf {
			out.push(self);
		}
		for child in &self.children {
			child.collect_leaves(out);
		}
	}

	/// Finds the node with the given full path. The empty path is the root.
	pub fn find(&self, path: &str) -> Option<&TreeNode> {
		let mut current = self;
		for segment in path.split('/').filter(|s| !s.is_empty()) {
			current = current.children.iter().find(|c| c.name == segment)?;
		}
		Some(current)
	}

	/// Number of nodes in this subtree, including itself.
	pub fn node_count(&self) -> usize {
		1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
	}
}

#[derive(Default)]
struct Slot {
	name: String,
	path: String,
	additions: u64,
	deletions: u64,
	is_file: bool,
	children: Vec<usize>,
	by_name: HashMap<String, usize>,
}

struct Arena {
	slots: Vec<Slot>,
}

impl Arena {
	fn new() -> Self {
		Self {
			slots: vec![Slot {
				name: ROOT_NAME.to_string(),
				..Slot::default()
			}],
		}
	}

	fn child(&mut self, parent: usize, name: &str) -> usize {
		if let Some(&idx) = self.slots[parent].by_name.get(name) {
			return idx;
		}
		let path = if self.slots[parent].path.is_empty() {
			name.to_string()
		} else {
			format!("{}/{}", self.slots[parent].path, name)
		};
		let idx = self.slots.len();
		self.slots.push(Slot {
			name: name.to_string(),
			path,
			..Slot::default()
		});
		let slot = &mut self.slots[parent];
		slot.children.push(idx);
		slot.by_name.insert(name.to_string(), idx);
		idx
	}

	fn insert(&mut self, record: &FileChangeRecord) {
		let mut current = 0;
		let mut inserted = false;
		for segment in record.segments() {
			current = self.child(current, segment);
			inserted = true;
		}
		if !inserted {
			return;
		}
		let leaf = &mut self.slots[current];
		leaf.is_file = true;
		leaf.additions += u64::from(record.additions);
		leaf.deletions += u64::from(record.deletions);
	}

	fn into_tree(mut self) -> TreeNode {
		self.take(0)
	}

	fn take(&mut self, idx: usize) -> TreeNode {
		let slot = std::mem::take(&mut self.slots[idx]);
		let children: Vec<TreeNode> = slot.children.iter().map(|&c| self.take(c)).collect();
		// A path used both as a file and as a directory is a directory; stats
		// recorded on it directly are dropped so totals equal the leaf sums.
		let (additions, deletions) = if children.is_empty() {
			(slot.additions, slot.deletions)
		} else {
			(
				children.iter().map(|c| c.additions).sum::<u64>(),
				children.iter().map(|c| c.deletions).sum::<u64>(),
			)
		};
		TreeNode {
			is_leaf: slot.is_file && children.is_empty(),
			name: slot.name,
			path: slot.path,
			additions,
			deletions,
			children,
		}
	}
}

/// Builds a directory/file tree from flat change records.
///
/// Records with an identical path aggregate into one leaf. Empty path segments
/// are ignored, and a record with no segments at all is skipped.
pub fn build_tree<'a, I>(records: I) -> TreeNode
where
	I: IntoIterator<Item = &'a FileChangeRecord>,
{
	let mut arena = Arena::new();
	for record in records {
		arena.insert(record);
	}
	arena.into_tree()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn records(files: &[(&str, u32, u32)]) -> Vec<FileChangeRecord> {
		files
			.iter()
			.map(|(p, a, d)| FileChangeRecord::new(*p, *a, *d))
			.collect()
	}

	fn assert_rollup(node: &TreeNode) {
		if node.is_leaf {
			return;
		}
		let leaves = node.leaves();
		assert_eq!(node.additions, leaves.iter().map(|l| l.additions).sum::<u64>());
		assert_eq!(node.deletions, leaves.iter().map(|l| l.deletions).sum::<u64>());
		node.children.iter().for_each(assert_rollup);
	}

	#[test]
	fn directories_roll_up_leaf_stats() {
		let tree = build_tree(&records(&[("a/b.ts", 3, 1), ("a/c.ts", 2, 0)]));
		let a = tree.find("a").unwrap();
		assert_eq!((a.additions, a.deletions), (5, 1));
		assert!(!a.is_leaf);
		assert_rollup(&tree);
	}

	#[test]
	fn duplicate_paths_aggregate_into_one_leaf() {
		let tree = build_tree(&records(&[("x.ts", 3, 1), ("x.ts", 2, 4)]));
		assert_eq!(tree.children.len(), 1);
		let x = &tree.children[0];
		assert!(x.is_leaf);
		assert_eq!((x.additions, x.deletions), (5, 5));
	}

	#[test]
	fn scenario_tree_shape() {
		let tree = build_tree(&records(&[
			("src/api/handler.ts", 10, 2),
			("src/api/types.ts", 4, 1),
			("README.md", 1, 0),
		]));
		assert_eq!(tree.name, ROOT_NAME);
		assert_eq!(tree.path, "");
		assert_eq!((tree.additions, tree.deletions), (15, 3));
		let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, vec!["src", "README.md"]);

		let api = tree.find("src/api").unwrap();
		assert_eq!(api.path, "src/api");
		assert_eq!(api.children.len(), 2);
		let handler = tree.find("src/api/handler.ts").unwrap();
		assert!(handler.is_leaf);
		assert_eq!((handler.additions, handler.deletions), (10, 2));
		assert_eq!(tree.node_count(), 6);
	}

	#[test]
	fn empty_input_gives_bare_root() {
		let tree = build_tree(&Vec::<FileChangeRecord>::new());
		assert!(tree.children.is_empty());
		assert_eq!(tree.value(), 0);
		assert!(!tree.is_leaf);
	}

	#[test]
	fn top_level_file_is_direct_child() {
		let tree = build_tree(&records(&[("Cargo.toml", 2, 2)]));
		assert_eq!(tree.children.len(), 1);
		assert!(tree.children[0].is_leaf);
		assert_eq!(tree.children[0].path, "Cargo.toml");
	}

	#[test]
	fn empty_segments_never_become_nodes() {
		let tree = build_tree(&records(&[("/src//lib.rs/", 1, 1), ("", 5, 5), ("///", 5, 5)]));
		assert_eq!(tree.value(), 2);
		let src = tree.find("src").unwrap();
		assert_eq!(src.children[0].path, "src/lib.rs");
		fn no_empty(node: &TreeNode) {
			assert!(!node.name.is_empty());
			node.children.iter().for_each(no_empty);
		}
		no_empty(&tree);
	}

	#[test]
	fn same_name_at_different_depths_is_distinct() {
		let tree = build_tree(&records(&[("src/src/a.rs", 1, 0), ("src/b.rs", 1, 0)]));
		let outer = tree.find("src").unwrap();
		assert_eq!(outer.children.len(), 2);
		assert_eq!(tree.find("src/src").unwrap().children.len(), 1);
	}

	#[test]
	fn path_used_as_file_and_directory_rolls_up_leaves_only() {
		let tree = build_tree(&records(&[("docs", 2, 0), ("docs/guide.md", 3, 1)]));
		let docs = tree.find("docs").unwrap();
		assert!(!docs.is_leaf);
		assert_eq!((docs.additions, docs.deletions), (3, 1));
		assert_eq!(tree.value(), 4);
		assert_rollup(&tree);
	}
}
