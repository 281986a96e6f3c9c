//! Breadcrumb, caption, and reset control shared by the hierarchy views.

use leptos::prelude::*;

use crate::model::ZoomableHierarchyView;

/// Navigation strip above a zoomable hierarchy.
///
/// The leading button always resets to the root. Each crumb re-roots the view
/// at that ancestor.
#[component]
pub fn HierarchyNav(zoom: RwSignal<ZoomableHierarchyView>, #[prop(into)] root_label: String) -> impl IntoView {
	let crumbs = move || {
		zoom.with(|v| {
			v.breadcrumb()
				.into_iter()
				.filter_map(|id| v.hierarchy().get(id).map(|n| (id, n.name.clone())))
				.map(|(id, name)| {
					view! {
						<span class="crumb-sep">"/"</span>
						<button type="button" class="crumb" on:click=move |_| zoom.update(|v| v.zoom_to(id))>
							{name}
						</button>
					}
				})
				.collect_view()
		})
	};

	view! {
		<div class="hierarchy-nav">
			<nav class="crumbs mono">
				<button type="button" class="crumb" on:click=move |_| zoom.update(|v| v.reset())>
					{root_label}
				</button>
				{crumbs}
			</nav>
			<Show when=move || zoom.with(|v| v.focused().is_some())>
				<button type="button" class="zoom-reset" on:click=move |_| zoom.update(|v| v.reset())>
					"Reset zoom"
				</button>
			</Show>
		</div>
		<p class="zoom-caption pr-muted">{move || zoom.with(|v| v.caption())}</p>
	}
}
