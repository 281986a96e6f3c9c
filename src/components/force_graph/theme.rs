//! Colors for the change graph.
//!
//! Node fill encodes the addition/deletion split: all-deletions is red,
//! all-additions is green, and anything in between is interpolated. Dimmed
//! clusters fall back to a flat grey.

use std::collections::HashMap;

use crate::model::restyle::{EdgeEmphasis, Emphasis};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Parses `#rrggbb`. Anything else yields `None`.
	pub fn from_hex(hex: &str) -> Option<Self> {
		let hex = hex.strip_prefix('#')?;
		if hex.len() != 6 {
			return None;
		}
		let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
		Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		let mix = |a: u8, b: u8| (a as f64 * (1.0 - t) + b as f64 * t).round() as u8;
		Self {
			r: mix(self.r, other.r),
			g: mix(self.g, other.g),
			b: mix(self.b, other.b),
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Diff colors shared by the graph, the list, and the hierarchy views.
#[derive(Clone, Debug)]
pub struct DiffPalette {
	pub addition: Color,
	pub deletion: Color,
	/// Fill for nodes without any changes.
	pub unchanged: Color,
	/// Fill for nodes outside the highlighted cluster.
	pub dimmed: Color,
}

impl DiffPalette {
	pub fn github() -> Self {
		Self {
			addition: Color::rgb(0x3f, 0xb9, 0x50),
			deletion: Color::rgb(0xe5, 0x53, 0x53),
			unchanged: Color::rgb(0x6e, 0x76, 0x81),
			dimmed: Color::rgb(0x33, 0x33, 0x33),
		}
	}

	/// Fill for a node with the given share of additions.
	pub fn fill(&self, add_ratio: Option<f64>, emphasis: Emphasis) -> Color {
		if !emphasis.is_focused() {
			return self.dimmed;
		}
		match add_ratio {
			Some(ratio) => self.deletion.lerp(self.addition, ratio),
			None => self.unchanged,
		}
	}

	/// Two-stage ramp for hierarchy cells: faint to solid red up to an even
	/// split, then red to green.
	pub fn ramp(&self, add_ratio: Option<f64>) -> Color {
		match add_ratio {
			None => self.unchanged,
			Some(r) if r > 0.5 => self.deletion.lerp(self.addition, (r - 0.5) * 2.0),
			Some(r) => self.deletion.with_alpha(0.25).lerp(self.deletion, r * 2.0),
		}
	}
}

/// Ten categorical colors, assigned to names in order of first use.
#[derive(Clone, Debug, Default)]
pub struct CategoryScale {
	assigned: HashMap<String, usize>,
}

impl CategoryScale {
	pub const COLORS: [Color; 10] = [
		Color::rgb(0x4e, 0x79, 0xa7),
		Color::rgb(0xf2, 0x8e, 0x2c),
		Color::rgb(0xe1, 0x57, 0x59),
		Color::rgb(0x76, 0xb7, 0xb2),
		Color::rgb(0x59, 0xa1, 0x4f),
		Color::rgb(0xed, 0xc9, 0x49),
		Color::rgb(0xaf, 0x7a, 0xa1),
		Color::rgb(0xff, 0x9d, 0xa7),
		Color::rgb(0x9c, 0x75, 0x5f),
		Color::rgb(0xba, 0xb0, 0xab),
	];

	pub fn color(&mut self, name: &str) -> Color {
		let next = self.assigned.len();
		let i = *self.assigned.entry(name.to_string()).or_insert(next);
		Self::COLORS[i % Self::COLORS.len()]
	}
}

/// Edge stroke per emphasis.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub focused: Color,
	pub dimmed: Color,
	pub relationship: Color,
}

impl EdgeStyle {
	pub fn color(&self, emphasis: EdgeEmphasis) -> Color {
		match emphasis {
			EdgeEmphasis::Focused => self.focused,
			EdgeEmphasis::Dimmed => self.dimmed,
			EdgeEmphasis::Relationship => self.relationship,
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	/// Center of the background radial gradient.
	pub background_glow: Color,
	pub edge: EdgeStyle,
	pub diff: DiffPalette,
	pub label: Color,
	pub label_dimmed: Color,
	pub hub_fill: Color,
	pub hub_border: Color,
	pub hover_ring: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(13, 17, 23),
			background_glow: Color::rgb(22, 27, 34),
			edge: EdgeStyle {
				focused: Color::rgba(139, 148, 158, 0.6),
				dimmed: Color::rgba(72, 79, 88, 0.35),
				relationship: Color::rgba(210, 153, 34, 0.8),
			},
			diff: DiffPalette::github(),
			label: Color::rgb(230, 237, 243),
			label_dimmed: Color::rgba(139, 148, 158, 0.6),
			hub_fill: Color::rgb(33, 38, 45),
			hub_border: Color::rgb(210, 153, 34),
			hover_ring: Color::rgba(255, 255, 255, 0.8),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fill_interpolates_between_deletion_and_addition() {
		let diff = DiffPalette::github();
		assert_eq!(diff.fill(Some(0.0), Emphasis::Focused), diff.deletion);
		assert_eq!(diff.fill(Some(1.0), Emphasis::Focused), diff.addition);
		assert_eq!(diff.fill(None, Emphasis::Focused), diff.unchanged);
		assert_eq!(diff.fill(Some(1.0), Emphasis::Dimmed), diff.dimmed);

		let mid = diff.fill(Some(0.5), Emphasis::Focused);
		assert_eq!(mid.to_css(), "#928652");
	}

	#[test]
	fn ramp_fades_deletions_and_greens_additions() {
		let diff = DiffPalette::github();
		assert_eq!(diff.ramp(None), diff.unchanged);
		assert_eq!(diff.ramp(Some(0.0)), diff.deletion.with_alpha(0.25));
		assert_eq!(diff.ramp(Some(0.5)), diff.deletion);
		assert_eq!(diff.ramp(Some(1.0)), diff.addition);
	}

	#[test]
	fn categories_follow_first_use() {
		let mut scale = CategoryScale::default();
		let schema = scale.color("Schema");
		let wiring = scale.color("Wiring");
		assert_eq!(schema, CategoryScale::COLORS[0]);
		assert_eq!(wiring, CategoryScale::COLORS[1]);
		assert_eq!(scale.color("Schema"), schema);
	}

	#[test]
	fn hex_parsing() {
		assert_eq!(Color::from_hex("#3fb950"), Some(Color::rgb(0x3f, 0xb9, 0x50)));
		assert_eq!(Color::from_hex("3fb950"), None);
		assert_eq!(Color::from_hex("#3fb"), None);
		assert_eq!(Color::from_hex("#zzzzzz"), None);
		assert_eq!(Color::rgba(1, 2, 3, 0.5).to_css(), "rgba(1, 2, 3, 0.5)");
	}
}
