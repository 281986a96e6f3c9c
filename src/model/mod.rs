//! Diff-aggregation and graph-composition core.
//!
//! Everything in here is plain data and synchronous functions with no browser
//! dependency. The canvas, list, and hierarchy components consume these types.

pub mod catalog;
pub mod compose;
pub mod detail;
pub mod flatten;
pub mod focus;
pub mod layers;
pub mod related;
pub mod restyle;
pub mod tree;
pub mod zoom;

pub use catalog::{Catalog, CatalogError, EntityId, FileChangeRecord, PrStatus, PullRequest};
pub use compose::{ComposedGraph, compose_graph};
pub use flatten::{EdgeKind, GraphEdge, GraphNode, NodeKind, flatten_tree};
pub use focus::{FocusController, FocusEvent, FocusState, Reaction};
pub use related::{RelatedEntity, find_related};
pub use restyle::RestyleSet;
pub use tree::{TreeNode, build_tree};
pub use zoom::{Hierarchy, HierarchyId, ZoomableHierarchyView};
