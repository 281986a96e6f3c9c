//! At-a-glance sunburst of review layers.

use std::f64::consts::TAU;

use leptos::prelude::*;

use super::breadcrumb::HierarchyNav;
use super::force_graph::theme::CategoryScale;
use crate::model::layers::LayerNode;
use crate::model::zoom::Size;
use crate::model::{Hierarchy, ZoomableHierarchyView};

const RADIUS: f64 = 120.0;
/// Arcs spanning less than this angle are not drawn.
const CULL_ANGLE: f64 = 1e-3;

/// Sunburst of `layers`. Each ring is one level below the current zoom root.
#[component]
pub fn Sunburst(layers: LayerNode) -> impl IntoView {
	let hierarchy = Hierarchy::from_layers(&layers).sorted_by_value();
	let mut scale = CategoryScale::default();
	let colors: Vec<String> = (0..hierarchy.len())
		.map(|id| hierarchy.get(id).map_or_else(String::new, |n| scale.color(&n.name).to_css()))
		.collect();
	let root_label = hierarchy.root().name.clone();
	let zoom = RwSignal::new(ZoomableHierarchyView::new(
		hierarchy,
		Size {
			width: TAU,
			height: RADIUS,
		},
		0.0,
	));

	let arcs = move || {
		zoom.with(|v| {
			v.layout()
				.into_iter()
				.filter(|rect| rect.width() >= CULL_ANGLE)
				.map(|rect| {
					let id = rect.id;
					view! {
						<path
							class="sunburst-arc"
							d=rect.arc_path(2.0 / RADIUS, RADIUS)
							fill=colors.get(id).cloned().unwrap_or_default()
							fill-opacity=v.opacity(id)
							on:click=move |_| zoom.update(|v| v.zoom_to(id))
							on:mouseenter=move |_| zoom.update(|v| v.hover_enter(id))
							on:mouseleave=move |_| zoom.update(|v| v.hover_leave())
						/>
					}
				})
				.collect_view()
		})
	};

	let center = move || {
		zoom.with(|v| {
			v.active().map(|id| {
				view! {
					<text class="sunburst-center" text-anchor="middle" y={-2}>
						{v.percentage_label(id)}
					</text>
					<text class="sunburst-center-sub" text-anchor="middle" y=14>
						"of changes"
					</text>
				}
			})
		})
	};

	view! {
		<div class="sunburst">
			<HierarchyNav zoom=zoom root_label=root_label />
			<svg
				class="sunburst-chart"
				viewBox=format!("{} {} {} {}", -RADIUS, -RADIUS, 2.0 * RADIUS, 2.0 * RADIUS)
				width={2.0 * RADIUS}
				height={2.0 * RADIUS}
			>
				{arcs}
				{center}
			</svg>
		</div>
	}
}
