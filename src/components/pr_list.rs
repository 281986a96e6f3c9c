//! Pull request list with status filter tabs.

use leptos::prelude::*;

use super::force_graph::theme::Color;
use crate::model::catalog::{Label, StatusFilter};
use crate::model::{Catalog, EntityId, PullRequest};

/// Selection after clicking `clicked` while `current` is selected. Clicking
/// the selected entry deselects it.
pub fn toggle_selection(current: Option<EntityId>, clicked: EntityId) -> Option<EntityId> {
	if current == Some(clicked) {
		None
	} else {
		Some(clicked)
	}
}

fn label_chip(label: &Label) -> impl IntoView + use<> {
	let style = label
		.color
		.as_deref()
		.and_then(Color::from_hex)
		.map(|c| format!("border-color: {}; background: {};", c.to_css(), c.with_alpha(0.15).to_css()))
		.unwrap_or_default();
	view! { <span class="pr-chip" style=style>{label.name.clone()}</span> }
}

#[component]
fn PrRow(
	pr: PullRequest,
	selected: Signal<Option<EntityId>>,
	on_select: Callback<Option<EntityId>>,
) -> impl IntoView {
	let id = pr.id;
	let labels = pr.labels.iter().map(label_chip).collect_view();
	let review = pr
		.review_status
		.map(|r| view! { <span class="pr-muted">{format!("· {}", r.label())}</span> });
	let comments = (pr.comments > 0).then(|| view! { <span class="pr-muted">{format!("{} comments", pr.comments)}</span> });

	view! {
		<button
			type="button"
			class="pr-row"
			class:selected=move || selected.get() == Some(id)
			on:click=move |_| on_select.run(toggle_selection(selected.get_untracked(), id))
		>
			<span class="pr-title">{pr.title.clone()}</span>
			<div class="pr-meta">
				<span class="mono">{format!("{}#{}", pr.repo, pr.number)}</span>
				<span class="pr-muted">"·"</span>
				<span class="pr-muted">{pr.branch.clone()}</span>
			</div>
			<div class="pr-meta">
				<span class="pr-chip">{pr.status.label()}</span>
				{labels}
				{review}
				<span class="pr-spacer" />
				<span class="mono stat-add">{format!("+{}", pr.additions)}</span>
				<span class="mono stat-del">{format!("-{}", pr.deletions)}</span>
				{comments}
				<span class="pr-muted">{pr.updated_at.clone()}</span>
			</div>
		</button>
	}
}

/// Filterable list of every pull request in the catalog.
///
/// `selected` mirrors the highlighted entity, which may change from the graph
/// as well. Clicks report the new selection through `on_select`.
#[component]
pub fn PrList(
	catalog: StoredValue<Catalog>,
	#[prop(into)] selected: Signal<Option<EntityId>>,
	#[prop(into)] on_select: Callback<Option<EntityId>>,
) -> impl IntoView {
	let filter = RwSignal::new(StatusFilter::All);

	let tabs = StatusFilter::TABS
		.into_iter()
		.map(|f| {
			let count = catalog.with_value(|c| c.count(f));
			view! {
				<button
					type="button"
					class="pr-tab"
					class:active=move || filter.get() == f
					on:click=move |_| filter.set(f)
				>
					{f.label()}
					<span class="pr-tab-count">{count}</span>
				</button>
			}
		})
		.collect_view();

	let rows = move || {
		let f = filter.get();
		catalog
			.with_value(|c| c.filtered(f).cloned().collect::<Vec<_>>())
			.into_iter()
			.map(|pr| view! { <PrRow pr=pr selected=selected on_select=on_select /> })
			.collect_view()
	};

	view! {
		<div class="pr-list">
			<h2 class="section-title">"Pull Requests"</h2>
			<div class="pr-tabs">{tabs}</div>
			<div class="pr-rows">{rows}</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clicking_the_selected_entry_deselects() {
		assert_eq!(toggle_selection(None, 3), Some(3));
		assert_eq!(toggle_selection(Some(3), 3), None);
		assert_eq!(toggle_selection(Some(2), 3), Some(3));
	}
}
