//! Zoom-dependent scaling for graph visuals.
//!
//! Node squares and hub boxes are sized in world units by the restyle pass and
//! scale with zoom like everything else inside the canvas transform. Text, line
//! widths, and hit slop are screen-space concerns and are corrected here.
//!
//! # Scaling Behaviors
//!
//! - [`ScaleBehavior::World`]: scales with zoom.
//! - [`ScaleBehavior::Screen`]: constant pixel size, divides by `k`.
//! - [`ScaleBehavior::Clamped`]: world-space size bounded to a pixel range.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for a base value at zoom level `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Label sizing. Pixel sizes come from the restyle pass.
#[derive(Clone, Debug)]
pub struct LabelScaleConfig {
	pub behavior: ScaleBehavior,
	/// Below this zoom, labels of dimmed nodes are skipped.
	pub dimmed_min_k: f64,
	pub family: &'static str,
}

/// Edge line widths and the relationship dash.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Containment edge width in screen pixels.
	pub line_width: f64,
	/// Relationship edge width in screen pixels.
	pub relationship_width: f64,
	/// Relationship dash pattern (dash, gap) in world units.
	pub dash_pattern: (f64, f64),
	/// Dash drift speed in world units per second.
	pub flow_speed: f64,
}

/// Hover ring and hit slop.
#[derive(Clone, Debug)]
pub struct HoverScaleConfig {
	/// Extra hit area around node squares, in screen pixels.
	pub hit_slop: f64,
	pub ring_width: f64,
	pub ring_offset: f64,
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub label: LabelScaleConfig,
	pub edge: EdgeScaleConfig,
	pub hover: HoverScaleConfig,
	/// Allowed zoom range.
	pub zoom_extent: (f64, f64),
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			label: LabelScaleConfig {
				behavior: ScaleBehavior::Clamped {
					min_screen: 7.0,
					max_screen: 18.0,
				},
				dimmed_min_k: 0.6,
				family: "ui-monospace, SFMono-Regular, Menlo, monospace",
			},
			edge: EdgeScaleConfig {
				line_width: 1.0,
				relationship_width: 1.5,
				dash_pattern: (6.0, 4.0),
				flow_speed: 10.0,
			},
			hover: HoverScaleConfig {
				hit_slop: 4.0,
				ring_width: 1.5,
				ring_offset: 3.0,
			},
			zoom_extent: (0.2, 4.0),
		}
	}
}

impl ScaleConfig {
	pub fn clamp_zoom(&self, k: f64) -> f64 {
		k.clamp(self.zoom_extent.0, self.zoom_extent.1)
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub edge_line_width: f64,
	pub relationship_width: f64,
	pub dash_pattern: (f64, f64),
	pub hit_slop: f64,
	pub ring_width: f64,
	pub ring_offset: f64,
	/// Whether labels of dimmed nodes are drawn at this zoom.
	pub dimmed_labels: bool,
	label: LabelScaleConfig,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			k,
			edge_line_width: config.edge.line_width / k,
			relationship_width: config.edge.relationship_width / k,
			dash_pattern: config.edge.dash_pattern,
			hit_slop: config.hover.hit_slop / k,
			ring_width: config.hover.ring_width / k,
			ring_offset: config.hover.ring_offset / k,
			dimmed_labels: k >= config.label.dimmed_min_k,
			label: config.label.clone(),
		}
	}

	/// World-space font size for a label styled at `px`.
	pub fn font_px(&self, px: f64) -> f64 {
		self.label.behavior.apply(px, self.k)
	}

	/// Canvas font for a label styled at `px`.
	pub fn font(&self, px: f64, bold: bool) -> String {
		let size = self.font_px(px);
		let weight = if bold { "600 " } else { "" };
		format!("{weight}{size:.2}px {}", self.label.family)
	}

	pub fn dash_offset(&self, flow_time: f64, flow_speed: f64) -> f64 {
		-flow_time * flow_speed
	}
}
