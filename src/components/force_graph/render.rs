//! Canvas rendering for the change graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Dimmed edges, focused edges, then dashed relationship edges (world space)
//! 3. Dimmed nodes, then focused nodes and hubs on top, then labels

use std::collections::HashMap;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, Link, NodeInfo, NodeShape};
use super::theme::Theme;
use crate::model::EdgeKind;
use crate::model::restyle::{EdgeEmphasis, HubBox};

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, state.transform.k);
	let positions = state.positions();

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, config, &scale, theme, &positions);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (cx, cy) = (state.width / 2.0, state.height / 2.0);
	match ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, state.width.max(state.height) * 0.8) {
		Ok(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background_glow.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Err(_) => ctx.set_fill_style_str(&theme.background.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	for pass in [EdgeEmphasis::Dimmed, EdgeEmphasis::Focused] {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
		for link in state.links.iter().filter(|l| l.emphasis == pass) {
			draw_link(state, ctx, theme, positions, link, scale.edge_line_width);
		}
	}

	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(scale.dash_pattern.0),
		&JsValue::from_f64(scale.dash_pattern.1),
	));
	ctx.set_line_dash_offset(scale.dash_offset(state.flow_time, config.edge.flow_speed));
	for link in state.links.iter().filter(|l| l.kind == EdgeKind::Relationship) {
		draw_link(state, ctx, theme, positions, link, scale.relationship_width);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_link(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
	link: &Link,
	width: f64,
) {
	let (Some(&(x1, y1)), Some(&(x2, y2))) = (positions.get(&link.source), positions.get(&link.target)) else {
		return;
	};
	let hover_t = smooth_step(state.hover.link(link));
	let color = theme.edge.color(link.emphasis);
	let color = color.with_alpha((color.a + (1.0 - color.a) * hover_t).min(1.0));

	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(width * (1.0 + 0.5 * hover_t));
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.stroke();
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	// Dimmed first so the highlighted cluster stays on top.
	for focused in [false, true] {
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if info.style.emphasis.is_focused() != focused {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			let hover_t = smooth_step(state.hover.node(node.index()));
			match &info.shape {
				NodeShape::Square => draw_square(ctx, info, x, y, theme, scale),
				NodeShape::Hub { subtitle } => draw_hub(ctx, info, subtitle, x, y, theme, scale),
			}
			if hover_t > 0.01 {
				draw_hover_ring(ctx, info, x, y, theme, scale, hover_t);
			}
			draw_label(ctx, info, x, y, theme, scale);
		});
	}
}

fn draw_square(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	x: f64,
	y: f64,
	theme: &Theme,
	scale: &ScaledValues,
) {
	let h = info.style.half_size;
	let fill = theme.diff.fill(info.style.add_ratio, info.style.emphasis);
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill_rect(x - h, y - h, h * 2.0, h * 2.0);
	if info.style.emphasis.is_focused() {
		ctx.set_stroke_style_str(&theme.background.with_alpha(0.8).to_css());
		ctx.set_line_width(scale.edge_line_width);
		ctx.stroke_rect(x - h, y - h, h * 2.0, h * 2.0);
	}
}

fn draw_hub(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	subtitle: &str,
	x: f64,
	y: f64,
	theme: &Theme,
	scale: &ScaledValues,
) {
	let (hw, hh) = (HubBox::WIDTH / 2.0, HubBox::HEIGHT / 2.0);
	let focused = info.style.emphasis.is_focused();
	let alpha = if focused { 1.0 } else { 0.55 };

	ctx.set_fill_style_str(&theme.hub_fill.with_alpha(alpha).to_css());
	ctx.fill_rect(x - hw, y - hh, hw * 2.0, hh * 2.0);
	ctx.set_stroke_style_str(&theme.hub_border.with_alpha(alpha).to_css());
	ctx.set_line_width(scale.relationship_width);
	ctx.stroke_rect(x - hw, y - hh, hw * 2.0, hh * 2.0);

	ctx.set_text_align("center");
	let text = if focused { theme.label } else { theme.label_dimmed };
	ctx.set_fill_style_str(&text.to_css());
	if let Some(label) = &info.style.label {
		ctx.set_font(&scale.font(info.style.label_px, info.style.bold));
		let _ = ctx.fill_text(label, x, y - 2.0);
	}
	ctx.set_font(&scale.font(9.0, false));
	let _ = ctx.fill_text(subtitle, x, y + 10.0);
	ctx.set_text_align("start");
}

fn draw_hover_ring(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	x: f64,
	y: f64,
	theme: &Theme,
	scale: &ScaledValues,
	t: f64,
) {
	let (hw, hh) = info.half_extents();
	let (hw, hh) = (hw + scale.ring_offset, hh + scale.ring_offset);
	let ring = theme.hover_ring;
	ctx.set_stroke_style_str(&ring.with_alpha(ring.a * t).to_css());
	ctx.set_line_width(scale.ring_width);
	ctx.stroke_rect(x - hw, y - hh, hw * 2.0, hh * 2.0);
}

fn draw_label(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	x: f64,
	y: f64,
	theme: &Theme,
	scale: &ScaledValues,
) {
	if matches!(info.shape, NodeShape::Hub { .. }) {
		return;
	}
	let Some(label) = &info.style.label else {
		return;
	};
	let focused = info.style.emphasis.is_focused();
	if !focused && !scale.dimmed_labels {
		return;
	}

	let px = info.style.label_px;
	let lx = x + info.style.half_size + 4.0;
	ctx.set_font(&scale.font(px, info.style.bold));
	let color = if focused { theme.label } else { theme.label_dimmed };
	ctx.set_fill_style_str(&color.to_css());
	let _ = ctx.fill_text(label, lx, y + 3.0);

	if info.style.show_stats {
		draw_stats(ctx, info, lx, y + 3.0 + px * 1.2, theme, scale);
	}
}

/// `+a -d` under a file label. The label font is monospace, so the deletion
/// count is offset by character count.
fn draw_stats(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	x: f64,
	y: f64,
	theme: &Theme,
	scale: &ScaledValues,
) {
	let px = 8.0;
	ctx.set_font(&scale.font(px, false));
	let added = format!("+{}", info.additions);
	ctx.set_fill_style_str(&theme.diff.addition.to_css());
	let _ = ctx.fill_text(&added, x, y);

	let advance = scale.font_px(px) * 0.6 * (added.chars().count() + 1) as f64;
	ctx.set_fill_style_str(&theme.diff.deletion.to_css());
	let _ = ctx.fill_text(&format!("-{}", info.deletions), x + advance, y);
}

