//! Center panel: header, graph or icicle, legend, and node details.

use leptos::prelude::*;

use super::detail_panel::DetailPanel;
use super::force_graph::ForceGraphCanvas;
use super::force_graph::theme::DiffPalette;
use super::icicle::Icicle;
use crate::model::{Catalog, ComposedGraph, EntityId, FocusEvent, Hierarchy, RestyleSet, build_tree};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DiagramMode {
	Graph,
	Icicle,
}

impl DiagramMode {
	fn label(self) -> &'static str {
		match self {
			DiagramMode::Graph => "Graph",
			DiagramMode::Icicle => "Icicle",
		}
	}
}

fn mode_toggle(mode: RwSignal<DiagramMode>) -> impl IntoView {
	[DiagramMode::Graph, DiagramMode::Icicle]
		.into_iter()
		.map(|m| {
			view! {
				<button
					type="button"
					class="pr-tab"
					class:active=move || mode.get() == m
					on:click=move |_| mode.set(m)
				>
					{m.label()}
				</button>
			}
		})
		.collect_view()
}

fn legend() -> impl IntoView {
	let diff = DiffPalette::github();
	let swatch = |label: &'static str, css: String| {
		view! {
			<span class="legend-item">
				<span class="legend-swatch" style=format!("background: {css};") />
				{label}
			</span>
		}
	};
	view! {
		<div class="graph-legend pr-muted">
			{swatch("additions", diff.addition.to_css())}
			{swatch("deletions", diff.deletion.to_css())}
			{swatch("unchanged", diff.unchanged.to_css())}
			<span class="legend-item">
				<span class="legend-dash" />
				"related PR"
			</span>
		</div>
	}
}

/// Diagram of the graph built around the selected pull request.
///
/// The canvas stays mounted while the icicle is shown so its simulation keeps
/// its layout. Every interaction is reported as a [`FocusEvent`].
#[component]
pub fn PrDiagram(
	catalog: StoredValue<Catalog>,
	#[prop(into)] graph: Signal<ComposedGraph>,
	#[prop(into)] styles: Signal<RestyleSet>,
	#[prop(into)] highlighted: Signal<Option<EntityId>>,
	#[prop(into)] inspected: Signal<Option<String>>,
	#[prop(into)] on_event: Callback<FocusEvent>,
) -> impl IntoView {
	let mode = RwSignal::new(DiagramMode::Graph);
	let empty = move || graph.with(ComposedGraph::is_empty);

	let header = move || {
		let related = graph.with(|g| g.related.len());
		catalog.with_value(|c| {
			c.resolve(highlighted.get()).map(|pr| {
				view! {
					<div class="diagram-header">
						<span class="diagram-title">{pr.title.clone()}</span>
						{pr.summary_text().map(|text| view! {
							<p class="diagram-summary pr-muted">{text.to_string()}</p>
						})}
						<div class="pr-meta">
							<span class="mono">{format!("{}#{}", pr.repo, pr.number)}</span>
							<span class="mono stat-add">{format!("+{}", pr.additions)}</span>
							<span class="mono stat-del">{format!("-{}", pr.deletions)}</span>
							<span class="pr-muted">{format!("{} files", pr.files.len())}</span>
							{(related > 0).then(|| view! {
								<span class="pr-muted">{format!("{related} related")}</span>
							})}
						</div>
					</div>
				}
			})
		})
	};

	let icicle = move || {
		if mode.get() != DiagramMode::Icicle {
			return None;
		}
		catalog.with_value(|c| {
			c.resolve(highlighted.get()).map(|pr| {
				let hierarchy = Hierarchy::from_tree(&build_tree(&pr.files)).sorted_by_value();
				view! { <Icicle hierarchy=hierarchy root_label=pr.repo_name().to_string() /> }
			})
		})
	};

	let detail = move || {
		inspected.get().map(|node_id| {
			view! {
				<DetailPanel
					catalog=catalog
					graph=graph
					node_id=node_id
					on_close=move |_: ()| on_event.run(FocusEvent::CloseDetail)
				/>
			}
		})
	};

	view! {
		<div class="pr-diagram">
			<Show when=move || !empty()>
				<div class="diagram-bar">
					{header}
					<div class="pr-tabs">{mode_toggle(mode)}</div>
				</div>
			</Show>
			<div class="diagram-body">
				<div class="graph-stage" style:display=move || if mode.get() == DiagramMode::Graph { "block" } else { "none" }>
					<ForceGraphCanvas
						graph=graph
						styles=styles
						on_node_click=move |(id, owner): (String, EntityId)| on_event.run(FocusEvent::ClickNode { id, owner })
						on_canvas_click=move |_: ()| on_event.run(FocusEvent::ClickCanvas)
					/>
					<Show when=move || !empty()>{legend()}</Show>
				</div>
				{icicle}
				<Show when=empty>
					<div class="diagram-empty">
						<p class="diagram-empty-title">"Select a pull request"</p>
						<p class="pr-muted">"Click a PR on the left to visualize its file changes"</p>
					</div>
				</Show>
				{detail}
			</div>
		</div>
	}
}
