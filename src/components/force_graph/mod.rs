//! Force-directed change graph component.
//!
//! Renders a [`ComposedGraph`](crate::model::ComposedGraph) on an HTML canvas with:
//! - Physics-based node positioning via force simulation, plus per-kind link
//!   lengths and collision radii
//! - Pan, zoom, node dragging, and click detection
//! - Focus restyling without rebuilding the simulation
//!
//! # Example
//!
//! ```ignore
//! let graph = RwSignal::new(build_for(id, &catalog).unwrap_or_default());
//! let styles = RwSignal::new(RestyleSet::compute(&graph.get(), Some(id), "api"));
//!
//! view! {
//!     <ForceGraphCanvas
//!         graph=graph
//!         styles=styles
//!         on_node_click=move |(id, owner)| log::info!("{id} of #{owner}")
//!         on_canvas_click=move |_| {}
//!     />
//! }
//! ```

mod component;
mod render;
mod scale;
mod state;
pub(crate) mod theme;

pub use component::ForceGraphCanvas;
