//! Data for the node detail panel.

use super::catalog::{Catalog, PullRequest};
use super::compose::ComposedGraph;
use super::flatten::{EdgeKind, GraphNode, NodeKind};

/// Name and stats of one row in a detail list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatRow {
	/// Graph node id.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Rolled-up added lines.
	pub additions: u64,
	/// Rolled-up deleted lines.
	pub deletions: u64,
}

impl StatRow {
	fn of(node: &GraphNode) -> Self {
		Self {
			id: node.id.clone(),
			name: node.name.clone(),
			additions: node.additions,
			deletions: node.deletions,
		}
	}
}

/// Addition/deletion split of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeSummary {
	/// Added lines.
	pub additions: u64,
	/// Deleted lines.
	pub deletions: u64,
}

impl ChangeSummary {
	/// Changed lines.
	pub fn total(&self) -> u64 {
		self.additions + self.deletions
	}

	/// Additions minus deletions.
	pub fn net(&self) -> i64 {
		self.additions as i64 - self.deletions as i64
	}

	/// Net change as shown in the panel, e.g. `+12 lines` or `-3 lines`.
	pub fn net_label(&self) -> String {
		let net = self.net();
		if net >= 0 {
			format!("+{net} lines")
		} else {
			format!("{net} lines")
		}
	}

	/// Rounded share of additions and the remainder, in percent. `(0, 100)`
	/// when nothing changed.
	pub fn split_pct(&self) -> (u8, u8) {
		let total = self.total();
		if total == 0 {
			return (0, 100);
		}
		let add = ((self.additions as f64 / total as f64) * 100.0).round() as u8;
		(add, 100 - add)
	}
}

/// Everything the detail panel shows for one node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeDetail<'a> {
	/// A related pull request's hub.
	Hub {
		/// The pull request behind the hub.
		pr: &'a PullRequest,
	},
	/// A changed file.
	File {
		/// File name.
		name: String,
		/// Full path within the pull request.
		path: String,
		/// Language guessed from the extension.
		language: String,
		/// Line counts of the file.
		summary: ChangeSummary,
		/// Owning pull request.
		pr: &'a PullRequest,
	},
	/// A directory, including a tree root.
	Directory {
		/// Directory name.
		name: String,
		/// Child directories.
		subdirectories: Vec<StatRow>,
		/// Child files.
		files: Vec<StatRow>,
		/// Rolled-up line counts.
		summary: ChangeSummary,
		/// Owning pull request.
		pr: &'a PullRequest,
	},
}

/// Human-readable language of a file extension.
pub fn language_of(file_name: &str) -> String {
	let ext = file_name.rsplit_once('.').map_or("", |(_, ext)| ext);
	match ext {
		"ts" => "TypeScript".to_string(),
		"tsx" => "TypeScript (JSX)".to_string(),
		"js" => "JavaScript".to_string(),
		"css" => "CSS".to_string(),
		"md" => "Markdown".to_string(),
		"json" => "JSON".to_string(),
		"rs" => "Rust".to_string(),
		other => other.to_uppercase(),
	}
}

fn children<'g>(graph: &'g ComposedGraph, id: &'g str) -> impl Iterator<Item = &'g GraphNode> + 'g {
	graph
		.edges
		.iter()
		.filter(move |e| e.kind == EdgeKind::Containment && e.source == id)
		.filter_map(|e| graph.node(&e.target))
}

fn descendant_files<'g>(graph: &'g ComposedGraph, id: &'g str, out: &mut Vec<&'g GraphNode>) {
	for child in children(graph, id) {
		if child.is_file() {
			out.push(child);
		} else {
			descendant_files(graph, &child.id, out);
		}
	}
}

/// Resolves what the detail panel shows for `node_id`.
///
/// Returns `None` when the node or its owning pull request is unknown.
pub fn node_detail<'a>(graph: &ComposedGraph, catalog: &'a Catalog, node_id: &str) -> Option<NodeDetail<'a>> {
	let node = graph.node(node_id)?;
	let pr = catalog.get(node.owner)?;
	let summary = ChangeSummary {
		additions: node.additions,
		deletions: node.deletions,
	};

	let detail = match node.kind {
		NodeKind::EntityHub { .. } => NodeDetail::Hub { pr },
		NodeKind::File => NodeDetail::File {
			name: node.name.clone(),
			path: node.relative_path().to_string(),
			language: language_of(&node.name),
			summary,
			pr,
		},
		NodeKind::Directory { .. } => {
			let subdirectories = children(graph, &node.id)
				.filter(|c| !c.is_file())
				.map(StatRow::of)
				.collect();
			let mut files = Vec::new();
			descendant_files(graph, &node.id, &mut files);
			NodeDetail::Directory {
				name: if node.is_tree_root() {
					pr.repo_name().to_string()
				} else {
					node.name.clone()
				},
				subdirectories,
				files: files.into_iter().map(StatRow::of).collect(),
				summary,
				pr,
			}
		}
	};
	Some(detail)
}
