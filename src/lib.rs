//! pr-graph: Pull request change dashboard.
//!
//! This crate turns flat lists of changed files into directory trees, links
//! pull requests that touch the same directories, and renders the result as a
//! force-directed graph, an icicle, and a review-layer sunburst in the browser.
//! Everything under [`model`] is plain Rust; [`components`] is the Leptos shell.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod model;

use components::pr_diagram::PrDiagram;
use components::pr_list::PrList;
use components::sunburst::Sunburst;
use model::compose::build_for;
use model::layers::review_layers;
use model::{Catalog, ComposedGraph, EntityId, FocusController, FocusEvent, RestyleSet};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("pr-graph: logging initialized");
}

/// Load the catalog from a script element with id="pr-catalog".
/// Expected format: JSON array of pull requests.
fn load_catalog() -> Option<Catalog> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("pr-catalog")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match Catalog::from_json(&json_text) {
		Ok(catalog) => {
			info!("pr-graph: loaded {} pull requests", catalog.len());
			Some(catalog)
		}
		Err(e) => {
			warn!("pr-graph: failed to load catalog: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the catalog from the DOM and routes every selection change through
/// one [`FocusController`].
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let catalog = StoredValue::new(load_catalog().unwrap_or_default());
	let focus = RwSignal::new(FocusController::new());
	let graph = RwSignal::new(ComposedGraph::default());
	let styles = RwSignal::new(RestyleSet::default());
	let selected = RwSignal::new(None::<EntityId>);

	let dispatch = move |event: FocusEvent| {
		let reaction = catalog.with_value(|c| focus.try_update(|f| f.reduce(event, c)));
		let Some(reaction) = reaction else {
			return;
		};
		let state = focus.with_untracked(FocusController::state);

		if reaction.rebuild {
			let next = catalog.with_value(|c| state.graph_root.and_then(|id| build_for(id, c)));
			graph.set(next.unwrap_or_default());
		}
		if reaction.restyle {
			let root_label = catalog.with_value(|c| {
				c.resolve(state.graph_root)
					.map(|pr| pr.repo_name().to_string())
					.unwrap_or_default()
			});
			styles.set(graph.with_untracked(|g| RestyleSet::compute(g, state.highlighted, &root_label)));
		}
		if let Some(next) = reaction.notify {
			selected.set(next);
		}
	};

	let on_select = move |id: Option<EntityId>| {
		selected.set(id);
		dispatch(FocusEvent::SelectFromList(id));
	};

	let highlighted = Signal::derive(move || focus.with(|f| f.state().highlighted));
	let inspected = Signal::derive(move || focus.with(|f| f.inspected().map(str::to_string)));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Pull Request Changes" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="dashboard">
			<aside class="dashboard-list">
				<PrList catalog=catalog selected=selected on_select=on_select />
			</aside>
			<main class="dashboard-diagram">
				<PrDiagram
					catalog=catalog
					graph=graph
					styles=styles
					highlighted=highlighted
					inspected=inspected
					on_event=dispatch
				/>
			</main>
			<aside class="dashboard-glance">
				<h2 class="section-title">"At a Glance"</h2>
				<Sunburst layers=review_layers() />
			</aside>
		</div>
	}
}
