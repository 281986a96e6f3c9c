//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node metadata built from
//! a [`ComposedGraph`], the pan/zoom transform, pointer gestures, and hover
//! intensities. Focus changes only swap [`NodeStyle`]s in place; positions and
//! the simulation survive until the next rebuild.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::scale::{ScaleConfig, ScaledValues};
use crate::model::restyle::{EdgeEmphasis, Emphasis, HubBox, NodeStyle};
use crate::model::{ComposedGraph, EdgeKind, EntityId, GraphNode, NodeKind, RestyleSet};

/// Preferred link lengths in world units.
#[derive(Clone, Debug)]
pub struct LinkDistances {
	pub relationship: f64,
	/// Links touching a hub.
	pub hub: f64,
	/// Links ending at a file.
	pub file: f64,
	pub other: f64,
}

/// Repulsion per node kind, expressed as simulation mass.
#[derive(Clone, Debug)]
pub struct ChargeMasses {
	pub hub: f32,
	pub primary: f32,
	pub other: f32,
}

/// Collision radii. Files use their half size plus padding.
#[derive(Clone, Debug)]
pub struct CollisionRadii {
	pub hub: f64,
	pub file_padding: f64,
	pub other: f64,
}

/// Physics tuning for the change graph.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
	pub force_charge: f32,
	pub force_spring: f32,
	pub force_max: f32,
	pub node_speed: f32,
	pub damping_factor: f32,
	pub link_distance: LinkDistances,
	pub charge: ChargeMasses,
	pub collision: CollisionRadii,
	/// Share of the link length error corrected per tick.
	pub link_strength: f64,
	/// Distance of related clusters from the center at start.
	pub cluster_ring: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			force_charge: 100.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
			link_distance: LinkDistances {
				relationship: 180.0,
				hub: 120.0,
				file: 80.0,
				other: 60.0,
			},
			charge: ChargeMasses {
				hub: 4.0,
				primary: 2.0,
				other: 1.2,
			},
			collision: CollisionRadii {
				hub: 30.0,
				file_padding: 6.0,
				other: 12.0,
			},
			link_strength: 0.1,
			cluster_ring: 260.0,
		}
	}
}

impl SimulationConfig {
	fn parameters(&self) -> SimulationParameters {
		SimulationParameters {
			force_charge: self.force_charge,
			force_spring: self.force_spring,
			force_max: self.force_max,
			node_speed: self.node_speed,
			damping_factor: self.damping_factor,
		}
	}

	pub fn mass(&self, node: &GraphNode) -> f32 {
		if node.is_hub() {
			self.charge.hub
		} else if node.is_primary_owner {
			self.charge.primary
		} else {
			self.charge.other
		}
	}

	/// Preferred length of a link of `kind` from `source` to `target`.
	pub fn distance(&self, kind: EdgeKind, source: &GraphNode, target: &GraphNode) -> f64 {
		match kind {
			EdgeKind::Relationship => self.link_distance.relationship,
			_ if source.is_hub() || target.is_hub() => self.link_distance.hub,
			_ if target.is_file() => self.link_distance.file,
			_ => self.link_distance.other,
		}
	}

	pub fn collision_radius(&self, info: &NodeInfo) -> f64 {
		match info.shape {
			NodeShape::Hub { .. } => self.collision.hub,
			NodeShape::Square if info.is_file => info.style.half_size + self.collision.file_padding,
			NodeShape::Square => self.collision.other,
		}
	}
}

/// How a node is drawn.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeShape {
	Square,
	Hub { subtitle: String },
}

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub owner: EntityId,
	pub is_file: bool,
	pub additions: u64,
	pub deletions: u64,
	pub shape: NodeShape,
	pub style: NodeStyle,
}

impl NodeInfo {
	fn new(node: &GraphNode, style: NodeStyle) -> Self {
		let shape = match &node.kind {
			NodeKind::EntityHub { title, .. } => NodeShape::Hub {
				subtitle: HubBox::subtitle(title),
			},
			_ => NodeShape::Square,
		};
		Self {
			id: node.id.clone(),
			owner: node.owner,
			is_file: node.is_file(),
			additions: node.additions,
			deletions: node.deletions,
			shape,
			style,
		}
	}

	/// Half extents of the drawn shape in world units.
	pub fn half_extents(&self) -> (f64, f64) {
		match self.shape {
			NodeShape::Hub { .. } => (HubBox::WIDTH / 2.0, HubBox::HEIGHT / 2.0),
			NodeShape::Square => (self.style.half_size, self.style.half_size),
		}
	}
}

/// Style for a node the restyle set does not know about.
fn unstyled(node: &GraphNode) -> NodeStyle {
	NodeStyle {
		emphasis: Emphasis::Dimmed,
		half_size: 4.0,
		label: (!node.is_tree_root()).then(|| node.name.clone()),
		label_px: 9.0,
		bold: false,
		show_stats: false,
		add_ratio: None,
	}
}

/// One simulated link plus its index in [`ComposedGraph::edges`].
#[derive(Clone, Debug)]
pub struct Link {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub kind: EdgeKind,
	pub emphasis: EdgeEmphasis,
	pub distance: f64,
	edge_index: usize,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor, clamped to [`ScaleConfig::zoom_extent`].
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Pointer travel in screen pixels below which a press counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Result of a press that did not turn into a drag or pan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Click {
	Node { id: String, owner: EntityId },
	Canvas,
}

/// Pointer press bookkeeping for telling clicks from drags.
#[derive(Clone, Debug, Default)]
pub struct PressState {
	origin: Option<(f64, f64)>,
	moved: bool,
}

impl PressState {
	pub fn begin(&mut self, x: f64, y: f64) {
		self.origin = Some((x, y));
		self.moved = false;
	}

	pub fn track(&mut self, x: f64, y: f64) {
		if let Some((ox, oy)) = self.origin {
			if (x - ox).hypot(y - oy) > CLICK_SLOP {
				self.moved = true;
			}
		}
	}

	/// Whether the current press has moved past [`CLICK_SLOP`].
	pub fn is_drag(&self) -> bool {
		self.moved
	}

	/// Ends the press. `true` when it stayed within [`CLICK_SLOP`].
	pub fn end(&mut self) -> bool {
		let clicked = self.origin.is_some() && !self.moved;
		self.origin = None;
		self.moved = false;
		clicked
	}
}

/// Smoothed hover emphasis for the hovered node and its direct neighbors.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub hovered: Option<DefaultNodeIdx>,
	targets: HashSet<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
}

impl HoverState {
	const FADE_IN_SPEED: f64 = 6.0;
	const FADE_OUT_SPEED: f64 = 4.0;

	pub fn set(&mut self, node: Option<DefaultNodeIdx>, links: &[Link]) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.targets.clear();
		if let Some(idx) = node {
			self.targets.insert(idx);
			for link in links {
				if link.source == idx {
					self.targets.insert(link.target);
				} else if link.target == idx {
					self.targets.insert(link.source);
				}
			}
		}
	}

	/// Moves every intensity towards its target with exponential smoothing.
	pub fn tick(&mut self, dt: f64) {
		let fade_in = 1.0 - (-Self::FADE_IN_SPEED * dt).exp();
		let fade_out = (-Self::FADE_OUT_SPEED * dt).exp();

		for &idx in &self.targets {
			let value = self.intensity.entry(idx).or_insert(0.0);
			*value += (1.0 - *value) * fade_in;
		}
		let targets = &self.targets;
		self.intensity.retain(|idx, value| {
			if !targets.contains(idx) {
				*value *= fade_out;
			}
			*value > 0.005
		});
	}

	pub fn node(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	pub fn link(&self, link: &Link) -> f64 {
		(self.node(link.source) * self.node(link.target)).sqrt()
	}
}

/// Position corrections that pull links towards their preferred length and
/// push overlapping nodes apart.
///
/// `links` holds `(source, target, distance)` as indices into `positions`.
pub fn constraint_deltas(
	positions: &[(f64, f64)],
	radii: &[f64],
	links: &[(usize, usize, f64)],
	strength: f64,
) -> Vec<(f64, f64)> {
	let mut delta = vec![(0.0, 0.0); positions.len()];

	for &(s, t, distance) in links {
		let (dx, dy) = (positions[t].0 - positions[s].0, positions[t].1 - positions[s].1);
		let len = dx.hypot(dy);
		if len < 1e-6 {
			continue;
		}
		let f = (len - distance) / len * strength * 0.5;
		delta[s].0 += dx * f;
		delta[s].1 += dy * f;
		delta[t].0 -= dx * f;
		delta[t].1 -= dy * f;
	}

	for i in 0..positions.len() {
		for j in (i + 1)..positions.len() {
			let (dx, dy) = (positions[j].0 - positions[i].0, positions[j].1 - positions[i].1);
			let len = dx.hypot(dy);
			let min = radii[i] + radii[j];
			if len >= min || len < 1e-6 {
				continue;
			}
			let f = (min - len) / len * 0.5;
			delta[i].0 -= dx * f;
			delta[i].1 -= dy * f;
			delta[j].0 += dx * f;
			delta[j].1 += dy * f;
		}
	}
	delta
}

/// Start position of a node: owners sit on a ring, their nodes spiral out.
fn seed_position(center: (f64, f64), slot: usize, slots: usize, rank: usize, ring: f64) -> (f32, f32) {
	let (cx, cy) = if slot == 0 {
		center
	} else {
		let angle = (slot - 1) as f64 * 2.0 * PI / (slots - 1).max(1) as f64;
		(center.0 + ring * angle.cos(), center.1 + ring * angle.sin())
	};
	let golden = PI * (3.0 - 5f64.sqrt());
	let r = 14.0 * (rank as f64).sqrt();
	let a = rank as f64 * golden;
	((cx + r * a.cos()) as f32, (cy + r * a.sin()) as f32)
}

/// Core graph state combining physics simulation with interaction and hover tracking.
///
/// Rebuilt whenever a new [`ComposedGraph`] arrives and mutated each frame by
/// the animation loop.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub press: PressState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub flow_time: f64,
	pub links: Vec<Link>,
	ids: HashMap<String, DefaultNodeIdx>,
	config: SimulationConfig,
}

impl ForceGraphState {
	pub fn new(
		data: &ComposedGraph,
		styles: &RestyleSet,
		width: f64,
		height: f64,
		config: SimulationConfig,
	) -> Self {
		let mut graph = ForceGraph::new(config.parameters());
		let mut ids = HashMap::new();

		let mut slots: Vec<EntityId> = data.primary.into_iter().collect();
		slots.extend(&data.related);
		let mut ranks: HashMap<EntityId, usize> = HashMap::new();

		for node in &data.nodes {
			let slot = slots.iter().position(|&o| o == node.owner).unwrap_or(0);
			let rank = ranks.entry(node.owner).or_insert(0);
			let (x, y) = seed_position((0.0, 0.0), slot, slots.len(), *rank, config.cluster_ring);
			*rank += 1;

			let style = styles
				.node(&node.id)
				.cloned()
				.unwrap_or_else(|| unstyled(node));
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: config.mass(node),
				is_anchor: false,
				user_data: NodeInfo::new(node, style),
			});
			ids.insert(node.id.clone(), idx);
		}

		let mut links = Vec::with_capacity(data.edges.len());
		for (edge_index, edge) in data.edges.iter().enumerate() {
			let (Some(&source), Some(&target), Some(s), Some(t)) = (
				ids.get(&edge.source),
				ids.get(&edge.target),
				data.node(&edge.source),
				data.node(&edge.target),
			) else {
				continue;
			};
			graph.add_edge(source, target, EdgeData::default());
			links.push(Link {
				source,
				target,
				kind: edge.kind,
				emphasis: styles
					.edges
					.get(edge_index)
					.copied()
					.unwrap_or(EdgeEmphasis::Dimmed),
				distance: config.distance(edge.kind, s, t),
				edge_index,
			});
		}

		Self {
			graph,
			links,
			ids,
			config,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			press: PressState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
		}
	}

	pub fn node_count(&self) -> usize {
		self.ids.len()
	}

	pub fn index_of(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.ids.get(id).copied()
	}

	/// Swaps styles in place. Positions, links, and the simulation are untouched.
	pub fn apply_restyle(&mut self, styles: &RestyleSet) {
		self.graph.visit_nodes_mut(|node| {
			if let Some(style) = styles.node(&node.data.user_data.id) {
				node.data.user_data.style = style.clone();
			}
		});
		for link in &mut self.links {
			if let Some(&emphasis) = styles.edges.get(link.edge_index) {
				link.emphasis = emphasis;
			}
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen position.
	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let slop = ScaledValues::new(config, self.transform.k).hit_slop;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (hw, hh) = node.data.user_data.half_extents();
			let (dx, dy) = ((node.x() as f64 - gx).abs(), (node.y() as f64 - gy).abs());
			if dx <= hw + slop && dy <= hh + slop {
				found = Some(node.index());
			}
		});
		found
	}

	/// The click a finished press resolves to, if it was not a drag.
	pub fn click_at(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Click {
		let Some(idx) = self.node_at_position(sx, sy, config) else {
			return Click::Canvas;
		};
		let mut click = Click::Canvas;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				click = Click::Node {
					id: node.data.user_data.id.clone(),
					owner: node.data.user_data.owner,
				};
			}
		});
		click
	}

	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		self.hover.set(node, &self.links);
	}

	/// Current position of every node.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut out = HashMap::with_capacity(self.ids.len());
		self.graph.visit_nodes(|node| {
			out.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		out
	}

	fn apply_constraints(&mut self) {
		let mut order = Vec::with_capacity(self.ids.len());
		let mut positions = Vec::with_capacity(self.ids.len());
		let mut radii = Vec::with_capacity(self.ids.len());
		let config = &self.config;
		self.graph.visit_nodes(|node| {
			order.push(node.index());
			positions.push((node.x() as f64, node.y() as f64));
			radii.push(config.collision_radius(&node.data.user_data));
		});
		let slot: HashMap<DefaultNodeIdx, usize> =
			order.iter().enumerate().map(|(i, &idx)| (idx, i)).collect();
		let links: Vec<(usize, usize, f64)> = self
			.links
			.iter()
			.filter_map(|l| Some((*slot.get(&l.source)?, *slot.get(&l.target)?, l.distance)))
			.collect();

		let delta = constraint_deltas(&positions, &radii, &links, self.config.link_strength);
		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			if let Some(&(dx, dy)) = slot.get(&node.index()).and_then(|&i| delta.get(i)) {
				node.data.x += dx as f32;
				node.data.y += dy as f32;
			}
		});
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.apply_constraints();
		self.flow_time += dt as f64;
		self.hover.tick(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::Catalog;
	use crate::model::catalog::tests::pr;
	use crate::model::compose::build_for;

	fn fixture() -> (ComposedGraph, RestyleSet) {
		let cat = Catalog::new(vec![
			pr(1, "acme/api", &[("src/api/a.ts", 30, 10), ("README.md", 1, 0)]),
			pr(2, "acme/api", &[("src/api/b.ts", 2, 0)]),
		])
		.unwrap();
		let graph = build_for(1, &cat).unwrap();
		let styles = RestyleSet::compute(&graph, Some(1), "api");
		(graph, styles)
	}

	#[test]
	fn state_mirrors_the_composed_graph() {
		let (graph, styles) = fixture();
		let state = ForceGraphState::new(&graph, &styles, 800.0, 600.0, SimulationConfig::default());
		assert_eq!(state.node_count(), graph.nodes.len());
		assert_eq!(state.links.len(), graph.edges.len());

		let rel = state
			.links
			.iter()
			.find(|l| l.kind == EdgeKind::Relationship)
			.unwrap();
		assert_eq!(rel.distance, 180.0);
		assert_eq!(rel.emphasis, EdgeEmphasis::Relationship);
		let hub_link = state
			.links
			.iter()
			.find(|l| Some(l.source) == state.index_of("rel:2:hub"))
			.unwrap();
		assert_eq!(hub_link.distance, 120.0);
	}

	#[test]
	fn restyle_keeps_positions() {
		let (graph, styles) = fixture();
		let mut state = ForceGraphState::new(&graph, &styles, 800.0, 600.0, SimulationConfig::default());
		let before = state.positions();

		let swapped = RestyleSet::compute(&graph, Some(2), "api");
		state.apply_restyle(&swapped);

		assert_eq!(state.positions(), before);
		let idx = state.index_of("rel:2:hub").unwrap();
		let mut emphasis = None;
		state.graph.visit_nodes(|n| {
			if n.index() == idx {
				emphasis = Some(n.data.user_data.style.emphasis);
			}
		});
		assert_eq!(emphasis, Some(Emphasis::Focused));
		assert!(state
			.links
			.iter()
			.filter(|l| l.kind == EdgeKind::Containment)
			.any(|l| l.emphasis == EdgeEmphasis::Focused));
	}

	#[test]
	fn clicks_resolve_to_nodes_or_canvas() {
		let (graph, styles) = fixture();
		let state = ForceGraphState::new(&graph, &styles, 800.0, 600.0, SimulationConfig::default());
		let config = ScaleConfig::default();
		let (hx, hy) = state.positions()[&state.index_of("rel:2:hub").unwrap()];
		// Graph origin sits at the canvas center.
		let click = state.click_at(hx + 400.0, hy + 300.0, &config);
		assert_eq!(
			click,
			Click::Node {
				id: "rel:2:hub".to_string(),
				owner: 2
			}
		);
		assert_eq!(state.click_at(-5000.0, -5000.0, &config), Click::Canvas);
	}

	#[test]
	fn presses_within_slop_are_clicks() {
		let mut press = PressState::default();
		press.begin(10.0, 10.0);
		press.track(12.0, 11.0);
		assert!(press.end());

		press.begin(10.0, 10.0);
		press.track(30.0, 10.0);
		press.track(10.0, 10.0);
		assert!(!press.end());
		assert!(!press.end());
	}

	#[test]
	fn constraints_relax_links_and_separate_overlaps() {
		let positions = [(0.0, 0.0), (200.0, 0.0)];
		let delta = constraint_deltas(&positions, &[1.0, 1.0], &[(0, 1, 100.0)], 1.0);
		assert_eq!(delta[0], (50.0, 0.0));
		assert_eq!(delta[1], (-50.0, 0.0));

		let overlapping = [(0.0, 0.0), (10.0, 0.0)];
		let delta = constraint_deltas(&overlapping, &[10.0, 10.0], &[], 1.0);
		assert_eq!(delta[0], (-5.0, 0.0));
		assert_eq!(delta[1], (5.0, 0.0));
	}

	#[test]
	fn hover_fades_in_and_out() {
		let (graph, styles) = fixture();
		let mut state = ForceGraphState::new(&graph, &styles, 800.0, 600.0, SimulationConfig::default());
		let root = state.index_of("root").unwrap();
		let readme = state.index_of("README.md").unwrap();
		state.set_hover(Some(root));
		state.hover.tick(0.1);
		assert!(state.hover.node(root) > 0.4);
		assert!(state.hover.node(readme) > 0.4);

		state.set_hover(None);
		for _ in 0..200 {
			state.hover.tick(0.05);
		}
		assert_eq!(state.hover.node(root), 0.0);
	}
}
