//! Composition of the primary tree, related hubs, and relationship edges into
//! one graph snapshot.

use std::collections::{HashMap, HashSet};

use log::debug;

use super::catalog::{Catalog, EntityId, PullRequest};
use super::flatten::{FlattenScope, GraphEdge, GraphNode, NodeKind, flatten_tree};
use super::related::{RelatedEntity, find_related};
use super::tree::build_tree;

/// Suffix appended to an entity prefix to form its hub id.
pub const HUB_SUFFIX: &str = "hub";

/// Id prefix for nodes owned by a related entity.
pub fn entity_prefix(id: EntityId) -> String {
	format!("rel:{id}:")
}

/// Id of the hub node of a related entity.
pub fn hub_id(id: EntityId) -> String {
	format!("{}{HUB_SUFFIX}", entity_prefix(id))
}

/// Immutable graph snapshot handed to the renderer on every rebuild.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComposedGraph {
	/// The pull request the graph was built around.
	pub primary: Option<EntityId>,
	/// Related pull requests that contributed a hub, in composition order.
	pub related: Vec<EntityId>,
	/// Nodes in pre-order per owner, primary tree first.
	pub nodes: Vec<GraphNode>,
	/// Containment edges followed by relationship edges.
	pub edges: Vec<GraphEdge>,
	index: HashMap<String, usize>,
}

impl ComposedGraph {
	/// Node with `id`.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	/// Whether a node with `id` exists.
	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	/// Whether the graph has no nodes, as before any selection.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Nodes owned by one entity, hubs included.
	pub fn owned_by(&self, owner: EntityId) -> impl Iterator<Item = &GraphNode> {
		self.nodes.iter().filter(move |n| n.owner == owner)
	}

	/// Largest change count over non-hub nodes, at least 1.
	pub fn max_changes(&self) -> u64 {
		self.nodes
			.iter()
			.filter(|n| !n.is_hub())
			.map(GraphNode::changes)
			.max()
			.unwrap_or(0)
			.max(1)
	}

	fn push_nodes(&mut self, from: usize) {
		for (i, node) in self.nodes.iter().enumerate().skip(from) {
			self.index.insert(node.id.clone(), i);
		}
	}
}

/// Builds the combined graph for `primary` and its related entities.
///
/// Shared directories whose id is not in the composed graph are skipped.
pub fn compose_graph(primary: &PullRequest, related: &[RelatedEntity<'_>]) -> ComposedGraph {
	let mut graph = ComposedGraph {
		primary: Some(primary.id),
		..ComposedGraph::default()
	};

	let primary_tree = build_tree(&primary.files);
	flatten_tree(
		&primary_tree,
		FlattenScope::primary(primary.id),
		&mut graph.nodes,
		&mut graph.edges,
	);
	graph.push_nodes(0);

	for rel in related {
		let pr = rel.entity;
		let prefix = entity_prefix(pr.id);
		let hub = hub_id(pr.id);
		let start = graph.nodes.len();

		graph.nodes.push(GraphNode {
			id: hub.clone(),
			name: format!("#{}", pr.number),
			additions: u64::from(pr.additions),
			deletions: u64::from(pr.deletions),
			depth: 0,
			owner: pr.id,
			is_primary_owner: false,
			kind: NodeKind::EntityHub {
				title: pr.title.clone(),
				number: pr.number,
				file_count: pr.files.len(),
			},
		});

		let tree = build_tree(&pr.files);
		flatten_tree(
			&tree,
			FlattenScope {
				owner: pr.id,
				is_primary: false,
				prefix: &prefix,
				depth: 1,
				parent: Some(&hub),
			},
			&mut graph.nodes,
			&mut graph.edges,
		);
		graph.push_nodes(start);
		graph.related.push(pr.id);

		let mut wired = HashSet::new();
		for dir in &rel.shared_directories {
			if graph.contains(dir) && wired.insert(dir.as_str()) {
				graph.edges.push(GraphEdge::relationship(dir.as_str(), hub.as_str()));
			}
		}
	}

	debug!(
		"pr-graph: composed #{} with {} nodes, {} edges, {} hubs",
		primary.number,
		graph.nodes.len(),
		graph.edges.len(),
		graph.related.len()
	);
	graph
}

/// Runs the full pipeline for one catalog entry. Unknown ids give `None`.
pub fn build_for(id: EntityId, catalog: &Catalog) -> Option<ComposedGraph> {
	let primary = catalog.get(id)?;
	let related = find_related(primary, catalog);
	Some(compose_graph(primary, &related))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::catalog::tests::pr;
	use crate::model::flatten::EdgeKind;

	fn catalog() -> Catalog {
		Catalog::new(vec![
			pr(
				1,
				"acme/api",
				&[
					("src/api/handler.ts", 10, 2),
					("src/api/types.ts", 4, 1),
					("README.md", 1, 0),
				],
			),
			pr(2, "acme/api", &[("src/api/handler.ts", 3, 3), ("src/api/v2/new.ts", 8, 0)]),
			pr(3, "acme/api", &[("src/api/types.ts", 1, 1), ("README.md", 2, 0)]),
			pr(4, "acme/api", &[("docs/readme.md", 1, 0)]),
		])
		.unwrap()
	}

	#[test]
	fn ids_stay_unique_when_paths_collide() {
		let graph = build_for(1, &catalog()).unwrap();
		let ids: HashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids.len(), graph.nodes.len());
		assert!(graph.contains("src/api/handler.ts"));
		assert!(graph.contains("rel:2:src/api/handler.ts"));
		assert!(graph.contains("rel:3:src/api/types.ts"));
	}

	#[test]
	fn hubs_carry_entity_totals_and_own_their_tree() {
		let cat = catalog();
		let graph = build_for(1, &cat).unwrap();
		assert_eq!(graph.related, vec![2, 3]);

		let hub = graph.node("rel:2:hub").unwrap();
		assert_eq!((hub.additions, hub.deletions), (11, 3));
		assert_eq!(hub.depth, 0);
		assert_eq!(
			hub.kind,
			NodeKind::EntityHub {
				title: "Change 2".to_string(),
				number: 102,
				file_count: 2
			}
		);
		assert!(graph.edges.contains(&GraphEdge::containment("rel:2:hub", "rel:2:root")));
		assert_eq!(graph.node("rel:2:root").unwrap().depth, 1);
		assert!(graph.owned_by(2).all(|n| !n.is_primary_owner));
		assert!(graph.owned_by(1).all(|n| n.is_primary_owner));
	}

	#[test]
	fn relationship_edges_link_shared_dirs_to_hubs() {
		let graph = build_for(1, &catalog()).unwrap();
		let rel: Vec<(&str, &str)> = graph
			.edges
			.iter()
			.filter(|e| e.kind == EdgeKind::Relationship)
			.map(|e| (e.source.as_str(), e.target.as_str()))
			.collect();
		assert_eq!(rel, vec![("src/api", "rel:2:hub"), ("src/api", "rel:3:hub")]);
	}

	#[test]
	fn missing_shared_ids_are_skipped() {
		let cat = catalog();
		let primary = cat.get(1).unwrap();
		let related = vec![RelatedEntity {
			entity: cat.get(4).unwrap(),
			shared_directories: vec!["does/not/exist".to_string(), "src/api".to_string()],
		}];
		let graph = compose_graph(primary, &related);
		let rel_edges: Vec<&GraphEdge> = graph.edges.iter().filter(|e| e.is_relationship()).collect();
		assert_eq!(rel_edges.len(), 1);
		assert_eq!(rel_edges[0].source, "src/api");
	}

	#[test]
	fn containment_edges_give_each_node_one_parent() {
		let graph = build_for(1, &catalog()).unwrap();
		for node in &graph.nodes {
			let parents = graph
				.edges
				.iter()
				.filter(|e| e.kind == EdgeKind::Containment && e.target == node.id)
				.count();
			let expected = if node.id == "root" || node.is_hub() { 0 } else { 1 };
			assert_eq!(parents, expected, "{}", node.id);
		}
	}

	#[test]
	fn scenario_without_relations_has_six_nodes() {
		let cat = Catalog::new(vec![pr(
			1,
			"acme/api",
			&[
				("src/api/handler.ts", 10, 2),
				("src/api/types.ts", 4, 1),
				("README.md", 1, 0),
			],
		)])
		.unwrap();
		let graph = build_for(1, &cat).unwrap();
		assert_eq!(graph.nodes.len(), 6);
		let root = graph.node("root").unwrap();
		assert_eq!((root.additions, root.deletions), (15, 3));
		assert_eq!(graph.max_changes(), 18);
	}

	#[test]
	fn unknown_primary_builds_nothing() {
		assert!(build_for(99, &catalog()).is_none());
	}
}
