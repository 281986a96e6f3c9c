//! Zoomable icicle chart of one pull request's file tree.

use leptos::prelude::*;

use super::breadcrumb::HierarchyNav;
use super::force_graph::theme::DiffPalette;
use crate::model::zoom::Size;
use crate::model::{Hierarchy, ZoomableHierarchyView};

const SIZE: Size = Size {
	width: 560.0,
	height: 400.0,
};
const PADDING: f64 = 2.0;

/// Cells narrower or shorter than this carry no label.
const LABEL_MIN: (f64, f64) = (40.0, 14.0);
/// Cells narrower than this are not drawn.
const CULL_WIDTH: f64 = 0.5;

/// Icicle of `hierarchy`, colored by each subtree's addition share.
#[component]
pub fn Icicle(hierarchy: Hierarchy, #[prop(into)] root_label: String) -> impl IntoView {
	let zoom = RwSignal::new(ZoomableHierarchyView::new(hierarchy, SIZE, PADDING));
	let diff = DiffPalette::github();

	let cells = move || {
		zoom.with(|v| {
			v.layout()
				.into_iter()
				.filter(|rect| rect.width() >= CULL_WIDTH)
				.filter_map(|rect| {
					let node = v.hierarchy().get(rect.id)?;
					let id = rect.id;
					let label = (rect.width() > LABEL_MIN.0 && rect.height() > LABEL_MIN.1).then(|| {
						view! {
							<text x={rect.x0 + 4.0} y={rect.y0 + 13.0} class="icicle-label">
								{node.name.clone()}
							</text>
						}
					});
					Some(view! {
						<g
							class="icicle-cell"
							on:click=move |_| zoom.update(|v| v.zoom_to(id))
							on:mouseenter=move |_| zoom.update(|v| v.hover_enter(id))
							on:mouseleave=move |_| zoom.update(|v| v.hover_leave())
						>
							<rect
								x=rect.x0
								y=rect.y0
								width=rect.width()
								height=rect.height()
								rx=2
								fill=diff.ramp(node.add_ratio()).to_css()
								fill-opacity=v.opacity(id)
							/>
							{label}
						</g>
					})
				})
				.collect_view()
		})
	};

	view! {
		<div class="icicle">
			<HierarchyNav zoom=zoom root_label=root_label />
			<svg
				class="icicle-chart"
				viewBox=format!("0 0 {} {}", SIZE.width, SIZE.height)
				width=SIZE.width
				height=SIZE.height
			>
				{cells}
			</svg>
		</div>
	}
}
