//! Zoom and breadcrumb navigation over a partitioned hierarchy.
//!
//! The hierarchy itself never changes. Zooming only moves the effective root,
//! and the partition layout is recomputed from there, so un-zooming is just
//! clearing the focus.

use std::f64::consts::PI;

use super::layers::LayerNode;
use super::tree::TreeNode;

/// Index of a node inside a [`Hierarchy`]. The root is always `0`.
pub type HierarchyId = usize;

/// One node of a [`Hierarchy`].
#[derive(Clone, Debug, PartialEq)]
pub struct HierarchyNode {
	/// Display name.
	pub name: String,
	/// Full path for file trees, `None` for abstract layers.
	pub path: Option<String>,
	/// Summed value of the subtree.
	pub value: u64,
	/// Rolled-up added lines, zero for layers.
	pub additions: u64,
	/// Rolled-up deleted lines, zero for layers.
	pub deletions: u64,
	/// `None` for the root.
	pub parent: Option<HierarchyId>,
	/// Child ids in display order.
	pub children: Vec<HierarchyId>,
	/// Distance from the root.
	pub depth: usize,
	/// Longest distance to a leaf below this node.
	pub height: usize,
}

impl HierarchyNode {
	/// Whether the node has no children.
	pub fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	/// Share of additions in the subtree's changed lines, `None` when unchanged.
	pub fn add_ratio(&self) -> Option<f64> {
		let total = self.additions + self.deletions;
		(total > 0).then(|| self.additions as f64 / total as f64)
	}
}

/// Arena-backed hierarchy with summed values.
#[derive(Clone, Debug, PartialEq)]
pub struct Hierarchy {
	nodes: Vec<HierarchyNode>,
}

impl Hierarchy {
	/// Id of the root node.
	pub const ROOT: HierarchyId = 0;

	/// File tree hierarchy. Leaf value is `additions + deletions`.
	pub fn from_tree(tree: &TreeNode) -> Self {
		let mut nodes = Vec::new();
		push_tree(&mut nodes, tree, None, 0);
		let mut h = Self { nodes };
		h.finish();
		h
	}

	/// Abstract layer hierarchy. Only leaves carry values.
	pub fn from_layers(layers: &LayerNode) -> Self {
		let mut nodes = Vec::new();
		push_layer(&mut nodes, layers, None, 0);
		let mut h = Self { nodes };
		h.finish();
		h
	}

	/// Orders every child list by descending value. Ties keep insertion order.
	pub fn sorted_by_value(mut self) -> Self {
		for i in 0..self.nodes.len() {
			let mut children = std::mem::take(&mut self.nodes[i].children);
			children.sort_by(|a, b| self.nodes[*b].value.cmp(&self.nodes[*a].value));
			self.nodes[i].children = children;
		}
		self
	}

	fn finish(&mut self) {
		// Arena is in pre-order, so a reverse sweep sees children before parents.
		for i in (0..self.nodes.len()).rev() {
			let children = self.nodes[i].children.clone();
			if children.is_empty() {
				continue;
			}
			let value: u64 = children.iter().map(|&c| self.nodes[c].value).sum();
			let height = children.iter().map(|&c| self.nodes[c].height).max().unwrap_or(0) + 1;
			let node = &mut self.nodes[i];
			node.value += value;
			node.height = height;
		}
	}

	/// Node with `id`.
	pub fn get(&self, id: HierarchyId) -> Option<&HierarchyNode> {
		self.nodes.get(id)
	}

	/// The root node.
	pub fn root(&self) -> &HierarchyNode {
		&self.nodes[Self::ROOT]
	}

	/// Number of nodes, root included.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	/// Always false for a built hierarchy, which has at least a root.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Path from the root to `id`, both included. Empty for an unknown id.
	pub fn ancestors(&self, id: HierarchyId) -> Vec<HierarchyId> {
		let mut chain = Vec::new();
		let mut current = self.get(id).map(|_| id);
		while let Some(i) = current {
			chain.push(i);
			current = self.nodes[i].parent;
		}
		chain.reverse();
		chain
	}

	/// Looks a node up by its file path.
	pub fn find_path(&self, path: &str) -> Option<HierarchyId> {
		self.nodes.iter().position(|n| n.path.as_deref() == Some(path))
	}
}

fn push_tree(nodes: &mut Vec<HierarchyNode>, tree: &TreeNode, parent: Option<HierarchyId>, depth: usize) {
	let id = nodes.len();
	let leaf = tree.children.is_empty();
	nodes.push(HierarchyNode {
		name: tree.name.clone(),
		path: Some(tree.path.clone()),
		value: if leaf { tree.value() } else { 0 },
		additions: tree.additions,
		deletions: tree.deletions,
		parent,
		children: Vec::new(),
		depth,
		height: 0,
	});
	for child in &tree.children {
		let child_id = nodes.len();
		nodes[id].children.push(child_id);
		push_tree(nodes, child, Some(id), depth + 1);
	}
}

fn push_layer(nodes: &mut Vec<HierarchyNode>, layer: &LayerNode, parent: Option<HierarchyId>, depth: usize) {
	let id = nodes.len();
	nodes.push(HierarchyNode {
		name: layer.name.clone(),
		path: None,
		value: layer.value.unwrap_or(0),
		additions: 0,
		deletions: 0,
		parent,
		children: Vec::new(),
		depth,
		height: 0,
	});
	for child in &layer.children {
		let child_id = nodes.len();
		nodes[id].children.push(child_id);
		push_layer(nodes, child, Some(id), depth + 1);
	}
}

/// Fixed drawing area for the partition layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
	/// Horizontal extent, or the full angle for the sunburst.
	pub width: f64,
	/// Vertical extent, or the radius for the sunburst.
	pub height: f64,
}

/// One laid-out cell. For the sunburst `x` is an angle and `y` a radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartitionRect {
	/// Node this cell draws.
	pub id: HierarchyId,
	/// Left edge or start angle.
	pub x0: f64,
	/// Right edge or end angle.
	pub x1: f64,
	/// Top edge or inner radius.
	pub y0: f64,
	/// Bottom edge or outer radius.
	pub y1: f64,
	/// Depth below the effective root.
	pub depth: usize,
}

impl PartitionRect {
	/// Horizontal extent.
	pub fn width(&self) -> f64 {
		self.x1 - self.x0
	}

	/// Vertical extent.
	pub fn height(&self) -> f64 {
		self.y1 - self.y0
	}

	/// SVG path of the annular sector `x0..x1` (radians) by `y0..y1` (radius).
	/// Angles start at twelve o'clock and run clockwise.
	pub fn arc_path(&self, pad_angle: f64, max_radius: f64) -> String {
		let outer = self.y1.min(max_radius);
		let inner = self.y0.max(0.0);
		let pad = (pad_angle / 2.0).min(self.width() / 2.0);
		let (a0, a1) = (self.x0 + pad, self.x1 - pad);
		let point = |r: f64, a: f64| (r * (a - PI / 2.0).cos(), r * (a - PI / 2.0).sin());
		let large = if a1 - a0 > PI { 1 } else { 0 };

		let (ox0, oy0) = point(outer, a0);
		let (ox1, oy1) = point(outer, a1);
		let (ix1, iy1) = point(inner, a1);
		let (ix0, iy0) = point(inner, a0);
		if inner <= 0.0 {
			format!("M{ox0:.3},{oy0:.3}A{outer:.3},{outer:.3},0,{large},1,{ox1:.3},{oy1:.3}L0,0Z")
		} else {
			format!(
				"M{ox0:.3},{oy0:.3}A{outer:.3},{outer:.3},0,{large},1,{ox1:.3},{oy1:.3}L{ix1:.3},{iy1:.3}A{inner:.3},{inner:.3},0,{large},0,{ix0:.3},{iy0:.3}Z"
			)
		}
	}
}

/// Opacity of cells outside the hovered ancestor path.
pub const FADED_OPACITY: f64 = 0.2;

/// Breadcrumb and zoom controller shared by the icicle and the sunburst.
#[derive(Clone, Debug, PartialEq)]
pub struct ZoomableHierarchyView {
	hierarchy: Hierarchy,
	size: Size,
	padding: f64,
	focused: Option<HierarchyId>,
	hovered: Option<HierarchyId>,
}

impl ZoomableHierarchyView {
	/// Unzoomed view of `hierarchy` laid out in `size` with `padding` between cells.
	pub fn new(hierarchy: Hierarchy, size: Size, padding: f64) -> Self {
		Self {
			hierarchy,
			size,
			padding,
			focused: None,
			hovered: None,
		}
	}

	/// The underlying hierarchy.
	pub fn hierarchy(&self) -> &Hierarchy {
		&self.hierarchy
	}

	/// Layout area.
	pub fn size(&self) -> Size {
		self.size
	}

	/// Zoomed-in node.
	pub fn focused(&self) -> Option<HierarchyId> {
		self.focused
	}

	/// Node under the pointer.
	pub fn hovered(&self) -> Option<HierarchyId> {
		self.hovered
	}

	/// Re-roots the view at `id`. Unknown ids are ignored.
	pub fn zoom_to(&mut self, id: HierarchyId) {
		if self.hierarchy.get(id).is_some() {
			self.focused = Some(id);
		}
	}

	/// Zooms back out to the root.
	pub fn reset(&mut self) {
		self.focused = None;
	}

	/// Marks `id` as hovered. Unknown ids are ignored.
	pub fn hover_enter(&mut self, id: HierarchyId) {
		if self.hierarchy.get(id).is_some() {
			self.hovered = Some(id);
		}
	}

	/// Clears the hover.
	pub fn hover_leave(&mut self) {
		self.hovered = None;
	}

	/// Focused node, or the root when not zoomed.
	pub fn effective_root(&self) -> HierarchyId {
		self.focused.unwrap_or(Hierarchy::ROOT)
	}

	/// The node the breadcrumb and caption describe: hover first, then focus.
	/// Its percentage is always taken against the effective root.
	pub fn active(&self) -> Option<HierarchyId> {
		self.hovered.or(self.focused)
	}

	/// Share of the effective root's value, in percent, within `0..=100`.
	pub fn percentage(&self, id: HierarchyId) -> f64 {
		let total = self
			.hierarchy
			.get(self.effective_root())
			.map_or(0, |n| n.value);
		let value = self.hierarchy.get(id).map_or(0, |n| n.value);
		if total == 0 {
			return 0.0;
		}
		(100.0 * value as f64 / total as f64).clamp(0.0, 100.0)
	}

	/// Percentage with one decimal, e.g. `"42.5%"`.
	pub fn percentage_label(&self, id: HierarchyId) -> String {
		format!("{:.1}%", self.percentage(id))
	}

	/// Ancestors of the active node from the top down, root excluded.
	pub fn breadcrumb(&self) -> Vec<HierarchyId> {
		match self.active() {
			Some(id) => self.hierarchy.ancestors(id).into_iter().skip(1).collect(),
			None => Vec::new(),
		}
	}

	/// Caption under the chart, `None` when nothing is focused or hovered.
	pub fn caption(&self) -> Option<String> {
		let id = self.active()?;
		let node = self.hierarchy.get(id)?;
		let action = if node.is_leaf() {
			" in this file"
		} else {
			" · click to zoom"
		};
		Some(format!("{} of changes{action}", self.percentage_label(id)))
	}

	/// Fill opacity of a cell given the current hover.
	pub fn opacity(&self, id: HierarchyId) -> f64 {
		if let Some(hovered) = self.hovered {
			let path = self.hierarchy.ancestors(hovered);
			return if path.iter().skip(1).any(|&a| a == id) {
				1.0
			} else {
				FADED_OPACITY
			};
		}
		match self.hierarchy.get(id) {
			Some(n) if !n.is_leaf() => 0.85,
			_ => 0.7,
		}
	}

	/// Partition layout of the effective root's subtree.
	///
	/// The true root is never emitted. When zoomed, the focused node fills the
	/// first row.
	pub fn layout(&self) -> Vec<PartitionRect> {
		let root = self.effective_root();
		let Some(root_node) = self.hierarchy.get(root) else {
			return Vec::new();
		};
		let rows = (root_node.height + 1) as f64;
		let row = self.size.height / rows;
		let pad = self.padding;

		// Unpadded extents: children divide their parent's span before the parent
		// shrinks by its own padding.
		let mut raw: Vec<(HierarchyId, f64, f64, f64, f64, usize)> =
			vec![(root, pad, self.size.width, pad, row, 0)];
		let mut out = Vec::new();

		while let Some((id, x0, x1, y0, y1, depth)) = raw.pop() {
			let node = &self.hierarchy.nodes[id];
			if !node.is_leaf() {
				let k = if node.value > 0 {
					(x1 - x0) / node.value as f64
				} else {
					0.0
				};
				let (cy0, cy1) = (row * (depth + 1) as f64, row * (depth + 2) as f64);
				let mut cx = x0;
				let mut children = Vec::with_capacity(node.children.len());
				for &c in &node.children {
					let w = self.hierarchy.nodes[c].value as f64 * k;
					children.push((c, cx, cx + w, cy0, cy1, depth + 1));
					cx += w;
				}
				raw.extend(children.into_iter().rev());
			}

			let (mut px0, mut px1) = (x0, x1 - pad);
			let (mut py0, mut py1) = (y0, y1 - pad);
			if px1 < px0 {
				px0 = (px0 + px1) / 2.0;
				px1 = px0;
			}
			if py1 < py0 {
				py0 = (py0 + py1) / 2.0;
				py1 = py0;
			}
			if id != Hierarchy::ROOT {
				out.push(PartitionRect {
					id,
					x0: px0,
					x1: px1,
					y0: py0,
					y1: py1,
					depth,
				});
			}
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::catalog::FileChangeRecord;
	use crate::model::layers::review_layers;
	use crate::model::tree::build_tree;

	fn view() -> ZoomableHierarchyView {
		let tree = build_tree(&[
			FileChangeRecord::new("src/api/handler.ts", 10, 2),
			FileChangeRecord::new("src/api/types.ts", 4, 1),
			FileChangeRecord::new("README.md", 1, 0),
			FileChangeRecord::new("docs/empty.md", 0, 0),
		]);
		ZoomableHierarchyView::new(
			Hierarchy::from_tree(&tree).sorted_by_value(),
			Size {
				width: 560.0,
				height: 400.0,
			},
			2.0,
		)
	}

	fn id(v: &ZoomableHierarchyView, path: &str) -> HierarchyId {
		v.hierarchy().find_path(path).unwrap()
	}

	#[test]
	fn values_sum_over_leaves() {
		let v = view();
		let h = v.hierarchy();
		assert_eq!(h.root().value, 18);
		assert_eq!(h.get(id(&v, "src")).unwrap().value, 17);
		assert_eq!(h.get(id(&v, "README.md")).unwrap().add_ratio(), Some(1.0));
		assert_eq!(h.get(id(&v, "docs/empty.md")).unwrap().add_ratio(), None);
		assert_eq!(h.root().height, 3);
		let names: Vec<&str> = h.root().children.iter().map(|&c| h.get(c).unwrap().name.as_str()).collect();
		assert_eq!(names, vec!["src", "README.md", "docs"]);
	}

	#[test]
	fn percentage_is_bounded_and_one_decimal() {
		let mut v = view();
		let handler = id(&v, "src/api/handler.ts");
		assert_eq!(v.percentage_label(handler), "66.7%");
		v.zoom_to(id(&v, "src/api"));
		assert_eq!(v.percentage_label(handler), "70.6%");
		for i in 0..v.hierarchy().len() {
			let p = v.percentage(i);
			assert!((0.0..=100.0).contains(&p));
		}
	}

	#[test]
	fn tree_hierarchy_matches_tree_totals() {
		let tree = build_tree(&[
			FileChangeRecord::new("docs", 2, 0),
			FileChangeRecord::new("docs/guide.md", 3, 1),
		]);
		let h = Hierarchy::from_tree(&tree);
		assert_eq!(h.root().value, tree.value());
		let docs = h.get(h.find_path("docs").unwrap()).unwrap();
		assert_eq!((docs.value, docs.additions, docs.deletions), (4, 3, 1));
	}

	#[test]
	fn zero_valued_root_gives_zero_percent() {
		let tree = build_tree(&[FileChangeRecord::new("a/b.ts", 0, 0)]);
		let v = ZoomableHierarchyView::new(
			Hierarchy::from_tree(&tree),
			Size {
				width: 10.0,
				height: 10.0,
			},
			0.0,
		);
		assert_eq!(v.percentage(1), 0.0);
		assert_eq!(v.percentage_label(Hierarchy::ROOT), "0.0%");
		assert!(v.layout().iter().all(|r| r.x0.is_finite() && r.x1.is_finite()));
	}

	#[test]
	fn breadcrumb_excludes_root() {
		let mut v = view();
		assert!(v.breadcrumb().is_empty());
		v.hover_enter(id(&v, "src/api/types.ts"));
		let crumbs: Vec<&str> = v
			.breadcrumb()
			.iter()
			.map(|&i| v.hierarchy().get(i).unwrap().name.as_str())
			.collect();
		assert_eq!(crumbs, vec!["src", "api", "types.ts"]);
		v.hover_leave();
		assert!(v.breadcrumb().is_empty());
	}

	#[test]
	fn zoom_then_reset_round_trips() {
		let mut v = view();
		let before = (v.effective_root(), v.breadcrumb(), v.layout());
		v.zoom_to(id(&v, "src/api"));
		assert_eq!(v.effective_root(), id(&v, "src/api"));
		assert_eq!(v.breadcrumb().len(), 2);
		v.reset();
		assert_eq!((v.effective_root(), v.breadcrumb(), v.layout()), before);
	}

	#[test]
	fn hover_drives_readout_while_zoomed() {
		let mut v = view();
		let src = id(&v, "src");
		v.zoom_to(src);
		v.hover_enter(id(&v, "src/api/handler.ts"));
		assert_eq!(v.active(), Some(id(&v, "src/api/handler.ts")));
		assert_eq!(v.caption().unwrap(), "70.6% of changes in this file");
		assert_eq!(v.breadcrumb().len(), 3);
		v.hover_leave();
		assert_eq!(v.active(), Some(src));
		assert_eq!(v.caption().unwrap(), "100.0% of changes · click to zoom");
	}

	#[test]
	fn caption_names_leaf_action() {
		let mut v = view();
		v.hover_enter(id(&v, "README.md"));
		assert_eq!(v.caption().unwrap(), "5.6% of changes in this file");
		v.hover_leave();
		assert_eq!(v.caption(), None);
	}

	#[test]
	fn hover_emphasizes_ancestor_path() {
		let mut v = view();
		let api = id(&v, "src/api");
		assert_eq!(v.opacity(api), 0.85);
		assert_eq!(v.opacity(id(&v, "README.md")), 0.7);
		v.hover_enter(id(&v, "src/api/handler.ts"));
		assert_eq!(v.opacity(api), 1.0);
		assert_eq!(v.opacity(id(&v, "README.md")), FADED_OPACITY);
	}

	#[test]
	fn layout_nests_children_inside_parents() {
		let v = view();
		let rects = v.layout();
		assert_eq!(rects.len(), v.hierarchy().len() - 1);
		let find = |i: HierarchyId| rects.iter().find(|r| r.id == i).copied().unwrap();
		let src = find(id(&v, "src"));
		let api = find(id(&v, "src/api"));
		assert!(api.x0 >= src.x0 - 1e-9 && api.x1 <= src.x1 + 2.0 + 1e-9);
		assert!(api.y0 >= src.y1);
		assert_eq!(src.depth, 1);
		assert!(rects.iter().all(|r| r.x1 <= 560.0 && r.y1 <= 400.0));
		let empty = find(id(&v, "docs/empty.md"));
		assert_eq!(empty.width(), 0.0);
	}

	#[test]
	fn zoomed_layout_starts_at_focus() {
		let mut v = view();
		let api = id(&v, "src/api");
		v.zoom_to(api);
		let rects = v.layout();
		assert_eq!(rects.len(), 3);
		assert_eq!(rects[0].id, api);
		assert_eq!(rects[0].depth, 0);
		assert_eq!(rects[0].x0, 2.0);
		assert_eq!(rects[0].x1, 558.0);
		assert!(rects[1..].iter().all(|r| r.depth == 1 && r.y1 <= 400.0));
	}

	#[test]
	fn layer_hierarchy_and_arcs() {
		let mut v = ZoomableHierarchyView::new(
			Hierarchy::from_layers(&review_layers()),
			Size {
				width: 2.0 * PI,
				height: 120.0,
			},
			0.0,
		);
		assert_eq!(v.hierarchy().root().value, 234);
		let rects = v.layout();
		let total: f64 = rects.iter().filter(|r| r.depth == 1).map(PartitionRect::width).sum();
		assert!((total - 2.0 * PI).abs() < 1e-9);
		let path = rects[0].arc_path(2.0 / 120.0, 120.0);
		assert!(path.starts_with('M') && path.ends_with('Z'));
		v.zoom_to(usize::MAX);
		assert_eq!(v.focused(), None);
	}
}
