//! Restyle instructions for a composed graph.
//!
//! A focus swap never touches graph structure. It recomputes a [`RestyleSet`]
//! from the existing snapshot and the highlighted entity, and the renderer
//! applies it as-is.

use std::collections::HashMap;

use super::catalog::EntityId;
use super::compose::ComposedGraph;
use super::flatten::{GraphEdge, GraphNode, NodeKind};

/// Smallest and largest half-extent of a file square, in world units.
pub const FILE_SIZE_RANGE: (f64, f64) = (4.0, 28.0);

/// Half-extent of directory squares when focused and when dimmed.
pub const DIRECTORY_HALF: (f64, f64) = (4.0, 3.0);

/// Dimmed files shrink to this fraction of their focused size.
pub const DIMMED_FILE_FACTOR: f64 = 0.7;

/// Square-root scale from change counts to node size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeScale {
	max_changes: f64,
	min: f64,
	max: f64,
}

impl SizeScale {
	/// Maps `0..=max_changes` onto `min..=max`.
	pub fn new(max_changes: u64, (min, max): (f64, f64)) -> Self {
		Self {
			max_changes: max_changes.max(1) as f64,
			min,
			max,
		}
	}

	/// File size scale of `graph`.
	pub fn for_graph(graph: &ComposedGraph) -> Self {
		Self::new(graph.max_changes(), FILE_SIZE_RANGE)
	}

	/// Size for a node with `changes` changed lines.
	pub fn apply(&self, changes: u64) -> f64 {
		let t = (changes as f64 / self.max_changes).clamp(0.0, 1.0).sqrt();
		self.min + (self.max - self.min) * t
	}
}

/// Node emphasis relative to the highlighted entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
	/// Owned by the highlighted entity.
	Focused,
	/// Owned by any other entity.
	Dimmed,
}

impl Emphasis {
	/// Emphasis of `node` when `highlighted` is emphasized.
	pub fn of(node: &GraphNode, highlighted: Option<EntityId>) -> Self {
		if highlighted == Some(node.owner) {
			Emphasis::Focused
		} else {
			Emphasis::Dimmed
		}
	}

	/// Whether this is [`Emphasis::Focused`].
	pub fn is_focused(self) -> bool {
		self == Emphasis::Focused
	}
}

/// Edge emphasis relative to the highlighted entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeEmphasis {
	/// Directory-overlap edge, always drawn dashed and visible.
	Relationship,
	/// Both ends belong to the highlighted entity.
	Focused,
	/// Any other containment edge.
	Dimmed,
}

/// How one node should look.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	/// Focused or dimmed.
	pub emphasis: Emphasis,
	/// Half the side of the node square. Hubs use [`HubBox`] instead.
	pub half_size: f64,
	/// Text next to the node, if any.
	pub label: Option<String>,
	/// Label font size in pixels.
	pub label_px: f64,
	/// Bold label, used for tree roots.
	pub bold: bool,
	/// Whether the `+a -d` line under a file label is shown.
	pub show_stats: bool,
	/// Share of additions in all changes, for fill colour. `None` when unchanged.
	pub add_ratio: Option<f64>,
}

/// Fixed hub rectangle.
pub struct HubBox;

impl HubBox {
	/// Box width in world units.
	pub const WIDTH: f64 = 120.0;
	/// Box height in world units.
	pub const HEIGHT: f64 = 32.0;
	/// Subtitle characters before truncation.
	pub const TITLE_CHARS: usize = 22;

	/// Hub subtitle, truncated with an ellipsis.
	pub fn subtitle(title: &str) -> String {
		if title.chars().count() > Self::TITLE_CHARS {
			let cut: String = title.chars().take(Self::TITLE_CHARS).collect();
			format!("{cut}…")
		} else {
			title.to_string()
		}
	}
}

/// Complete restyle instruction set for one graph and focus.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestyleSet {
	/// Entity the styles were computed for.
	pub highlighted: Option<EntityId>,
	/// Style per node id.
	pub nodes: HashMap<String, NodeStyle>,
	/// Parallel to `ComposedGraph::edges`.
	pub edges: Vec<EdgeEmphasis>,
}

impl RestyleSet {
	/// Computes styles for every node and edge of `graph`.
	///
	/// `root_label` names the tree root of the highlighted entity (usually the
	/// repository name).
	pub fn compute(graph: &ComposedGraph, highlighted: Option<EntityId>, root_label: &str) -> Self {
		let scale = SizeScale::for_graph(graph);
		let nodes = graph
			.nodes
			.iter()
			.map(|n| (n.id.clone(), node_style(n, highlighted, &scale, root_label)))
			.collect();
		let edges = graph
			.edges
			.iter()
			.map(|e| edge_emphasis(graph, e, highlighted))
			.collect();
		Self {
			highlighted,
			nodes,
			edges,
		}
	}

	/// Style of node `id`.
	pub fn node(&self, id: &str) -> Option<&NodeStyle> {
		self.nodes.get(id)
	}
}

fn add_ratio(node: &GraphNode) -> Option<f64> {
	let total = node.changes();
	(total > 0).then(|| node.additions as f64 / total as f64)
}

fn node_style(
	node: &GraphNode,
	highlighted: Option<EntityId>,
	scale: &SizeScale,
	root_label: &str,
) -> NodeStyle {
	let emphasis = Emphasis::of(node, highlighted);
	let focused = emphasis.is_focused();
	let is_root = node.is_tree_root();

	match &node.kind {
		NodeKind::EntityHub { number, .. } => NodeStyle {
			emphasis,
			half_size: HubBox::WIDTH / 2.0,
			label: Some(format!("PR #{number}")),
			label_px: 10.0,
			bold: true,
			show_stats: false,
			add_ratio: add_ratio(node),
		},
		NodeKind::File => {
			let size = scale.apply(node.changes());
			NodeStyle {
				emphasis,
				half_size: if focused { size } else { size * DIMMED_FILE_FACTOR },
				label: Some(node.name.clone()),
				label_px: if focused { 10.0 } else { 9.0 },
				bold: false,
				show_stats: focused,
				add_ratio: add_ratio(node),
			}
		}
		NodeKind::Directory { .. } => {
			let label = match (is_root, focused) {
				(true, true) => Some(root_label.to_string()),
				(true, false) => None,
				(false, _) => Some(node.name.clone()),
			};
			NodeStyle {
				emphasis,
				half_size: if focused {
					DIRECTORY_HALF.0
				} else {
					DIRECTORY_HALF.1
				},
				label,
				label_px: match (is_root, focused) {
					(true, true) => 12.0,
					(_, true) => 10.0,
					_ => 9.0,
				},
				bold: is_root && focused,
				show_stats: false,
				add_ratio: add_ratio(node),
			}
		}
	}
}

fn edge_emphasis(graph: &ComposedGraph, edge: &GraphEdge, highlighted: Option<EntityId>) -> EdgeEmphasis {
	if edge.is_relationship() {
		return EdgeEmphasis::Relationship;
	}
	let owner = |id: &str| graph.node(id).map(|n| n.owner);
	match (owner(&edge.source), owner(&edge.target), highlighted) {
		(Some(s), Some(t), Some(h)) if s == h && t == h => EdgeEmphasis::Focused,
		_ => EdgeEmphasis::Dimmed,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::catalog::Catalog;
	use crate::model::catalog::tests::pr;
	use crate::model::compose::build_for;

	fn graph() -> ComposedGraph {
		let cat = Catalog::new(vec![
			pr(1, "acme/api", &[("src/api/a.ts", 30, 10), ("src/api/b.ts", 0, 0)]),
			pr(2, "acme/api", &[("src/api/c.ts", 2, 0)]),
		])
		.unwrap();
		build_for(1, &cat).unwrap()
	}

	#[test]
	fn highlighted_owner_is_focused() {
		let g = graph();
		let styles = RestyleSet::compute(&g, Some(1), "api");
		for node in &g.nodes {
			let style = styles.node(&node.id).unwrap();
			assert_eq!(style.emphasis.is_focused(), node.owner == 1, "{}", node.id);
		}
		assert_eq!(styles.node("root").unwrap().label.as_deref(), Some("api"));
		assert!(styles.node("root").unwrap().bold);
	}

	#[test]
	fn swapping_focus_flips_emphasis_only() {
		let g = graph();
		let a = RestyleSet::compute(&g, Some(1), "api");
		let b = RestyleSet::compute(&g, Some(2), "api");
		assert_eq!(a.nodes.len(), b.nodes.len());
		assert_eq!(a.edges.len(), b.edges.len());
		assert_eq!(b.node("rel:2:hub").unwrap().emphasis, Emphasis::Focused);
		assert_eq!(b.node("src/api/a.ts").unwrap().emphasis, Emphasis::Dimmed);
		assert_eq!(b.node("root").unwrap().label, None);
		assert!(!b.node("src/api/a.ts").unwrap().show_stats);
	}

	#[test]
	fn edges_classify_by_kind_and_owner() {
		let g = graph();
		let styles = RestyleSet::compute(&g, Some(1), "api");
		for (edge, emphasis) in g.edges.iter().zip(&styles.edges) {
			let expected = if edge.is_relationship() {
				EdgeEmphasis::Relationship
			} else if g.node(&edge.target).unwrap().owner == 1 {
				EdgeEmphasis::Focused
			} else {
				EdgeEmphasis::Dimmed
			};
			assert_eq!(*emphasis, expected);
		}
		assert!(styles.edges.contains(&EdgeEmphasis::Relationship));
	}

	#[test]
	fn file_sizes_follow_sqrt_scale() {
		let g = graph();
		let styles = RestyleSet::compute(&g, Some(1), "api");
		let big = styles.node("src/api/a.ts").unwrap();
		let empty = styles.node("src/api/b.ts").unwrap();
		assert_eq!(empty.half_size, FILE_SIZE_RANGE.0);
		assert!(big.half_size > empty.half_size);
		assert_eq!(empty.add_ratio, None);
		assert_eq!(big.add_ratio, Some(0.75));

		let scale = SizeScale::new(100, (4.0, 28.0));
		assert_eq!(scale.apply(0), 4.0);
		assert_eq!(scale.apply(100), 28.0);
		assert_eq!(scale.apply(25), 16.0);
	}

	#[test]
	fn hub_subtitles_truncate() {
		assert_eq!(HubBox::subtitle("short"), "short");
		let long = "Add streaming support for the queue worker";
		let cut = HubBox::subtitle(long);
		assert!(cut.ends_with('…'));
		assert_eq!(cut.chars().count(), HubBox::TITLE_CHARS + 1);
	}
}
