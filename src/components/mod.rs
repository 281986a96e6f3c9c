//! Browser views over the [`model`](crate::model) types.

pub(crate) mod breadcrumb;
pub(crate) mod detail_panel;
pub mod force_graph;
pub(crate) mod icicle;
pub(crate) mod pr_diagram;
pub(crate) mod pr_list;
pub(crate) mod sunburst;
