//! Two-level selection state for the file graph.
//!
//! `graph_root` decides which pull request the graph is built around and only
//! changes from the list. `highlighted` decides which cluster of the already
//! built graph is emphasized and also changes when a node of another cluster is
//! clicked. Every transition goes through [`FocusController::reduce`], which
//! reports whether the caller has to rebuild, restyle, or tell the list.

use log::debug;

use super::catalog::{Catalog, EntityId};
use super::flatten::GraphNode;

/// Which pull request the graph is built around and which one is emphasized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusState {
	/// Entity the graph is composed around.
	pub graph_root: Option<EntityId>,
	/// Entity whose cluster is emphasized.
	pub highlighted: Option<EntityId>,
}

/// Input to [`FocusController::reduce`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusEvent {
	/// A pull request was picked in the list (`None` deselects).
	SelectFromList(Option<EntityId>),
	/// A graph node was clicked.
	ClickNode {
		/// Node id.
		id: String,
		/// Owner of the node.
		owner: EntityId,
	},
	/// Empty canvas area was clicked.
	ClickCanvas,
	/// The detail panel was closed.
	CloseDetail,
}

impl FocusEvent {
	/// Click event for `node`.
	pub fn click(node: &GraphNode) -> Self {
		FocusEvent::ClickNode {
			id: node.id.clone(),
			owner: node.owner,
		}
	}
}

/// What the caller has to do after a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reaction {
	/// Recompose the graph around the new `graph_root`.
	pub rebuild: bool,
	/// Reapply emphasis for the new `highlighted`.
	pub restyle: bool,
	/// Tell the list view to show this entity as selected.
	pub notify: Option<Option<EntityId>>,
}

/// Focus state plus the node whose details are open.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusController {
	state: FocusState,
	inspected: Option<String>,
}

impl FocusController {
	/// Nothing selected.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current selection.
	pub fn state(&self) -> FocusState {
		self.state
	}

	/// Id of the node whose detail panel is open.
	pub fn inspected(&self) -> Option<&str> {
		self.inspected.as_deref()
	}

	/// Applies one event. Unknown entity ids degrade to no selection.
	pub fn reduce(&mut self, event: FocusEvent, catalog: &Catalog) -> Reaction {
		let reaction = match event {
			FocusEvent::SelectFromList(id) => {
				let id = catalog.resolve(id).map(|pr| pr.id);
				let next = FocusState {
					graph_root: id,
					highlighted: id,
				};
				let rebuild = next.graph_root != self.state.graph_root;
				let restyle = rebuild || next.highlighted != self.state.highlighted;
				if rebuild {
					self.inspected = None;
				}
				self.state = next;
				Reaction {
					rebuild,
					restyle,
					notify: None,
				}
			}
			FocusEvent::ClickNode { id, owner } => {
				if self.state.highlighted != Some(owner) {
					self.state.highlighted = Some(owner);
					self.inspected = None;
					Reaction {
						rebuild: false,
						restyle: true,
						notify: Some(Some(owner)),
					}
				} else {
					if self.inspected.as_deref() == Some(id.as_str()) {
						self.inspected = None;
					} else {
						self.inspected = Some(id);
					}
					Reaction::default()
				}
			}
			FocusEvent::ClickCanvas | FocusEvent::CloseDetail => {
				self.inspected = None;
				Reaction::default()
			}
		};
		debug!("pr-graph: focus {:?} -> {:?}", self.state, reaction);
		reaction
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::catalog::tests::pr;
	use crate::model::compose::build_for;

	fn catalog() -> Catalog {
		Catalog::new(vec![
			pr(1, "acme/api", &[("src/api/a.ts", 1, 0)]),
			pr(2, "acme/api", &[("src/api/b.ts", 2, 0)]),
		])
		.unwrap()
	}

	#[test]
	fn list_selection_rebuilds_once() {
		let cat = catalog();
		let mut focus = FocusController::new();

		let first = focus.reduce(FocusEvent::SelectFromList(Some(1)), &cat);
		assert!(first.rebuild && first.restyle);
		assert_eq!(first.notify, None);
		assert_eq!(
			focus.state(),
			FocusState {
				graph_root: Some(1),
				highlighted: Some(1)
			}
		);

		let again = focus.reduce(FocusEvent::SelectFromList(Some(1)), &cat);
		assert!(!again.rebuild);
	}

	#[test]
	fn clicking_another_cluster_swaps_highlight_without_rebuild() {
		let cat = catalog();
		let mut focus = FocusController::new();
		focus.reduce(FocusEvent::SelectFromList(Some(1)), &cat);
		let graph = build_for(1, &cat).unwrap();
		let before = graph.clone();

		let node = graph.node("rel:2:src/api/b.ts").unwrap();
		let reaction = focus.reduce(FocusEvent::click(node), &cat);

		assert_eq!(
			reaction,
			Reaction {
				rebuild: false,
				restyle: true,
				notify: Some(Some(2))
			}
		);
		assert_eq!(focus.state().graph_root, Some(1));
		assert_eq!(focus.state().highlighted, Some(2));
		assert_eq!(graph, before);
		assert_eq!(focus.inspected(), None);
	}

	#[test]
	fn clicking_current_cluster_toggles_detail() {
		let cat = catalog();
		let mut focus = FocusController::new();
		focus.reduce(FocusEvent::SelectFromList(Some(1)), &cat);
		let graph = build_for(1, &cat).unwrap();
		let node = graph.node("src/api").unwrap();

		assert_eq!(focus.reduce(FocusEvent::click(node), &cat), Reaction::default());
		assert_eq!(focus.inspected(), Some("src/api"));

		focus.reduce(FocusEvent::click(node), &cat);
		assert_eq!(focus.inspected(), None);

		focus.reduce(FocusEvent::click(node), &cat);
		focus.reduce(FocusEvent::ClickCanvas, &cat);
		assert_eq!(focus.inspected(), None);
		assert_eq!(focus.state().highlighted, Some(1));
	}

	#[test]
	fn reselecting_the_root_after_a_swap_only_restyles() {
		let cat = catalog();
		let mut focus = FocusController::new();
		focus.reduce(FocusEvent::SelectFromList(Some(1)), &cat);
		focus.reduce(
			FocusEvent::ClickNode {
				id: "rel:2:hub".to_string(),
				owner: 2,
			},
			&cat,
		);
		let reaction = focus.reduce(FocusEvent::SelectFromList(Some(1)), &cat);
		assert!(!reaction.rebuild);
		assert!(reaction.restyle);
		assert_eq!(focus.state().highlighted, Some(1));
	}

	#[test]
	fn unknown_ids_clear_selection() {
		let cat = catalog();
		let mut focus = FocusController::new();
		focus.reduce(FocusEvent::SelectFromList(Some(1)), &cat);
		let reaction = focus.reduce(FocusEvent::SelectFromList(Some(42)), &cat);
		assert!(reaction.rebuild);
		assert_eq!(focus.state(), FocusState::default());
	}

	#[test]
	fn new_graph_closes_detail() {
		let cat = catalog();
		let mut focus = FocusController::new();
		focus.reduce(FocusEvent::SelectFromList(Some(1)), &cat);
		focus.reduce(
			FocusEvent::ClickNode {
				id: "root".to_string(),
				owner: 1,
			},
			&cat,
		);
		assert_eq!(focus.inspected(), Some("root"));
		focus.reduce(FocusEvent::SelectFromList(Some(2)), &cat);
		assert_eq!(focus.inspected(), None);
	}
}
