//! Review layers shown in the at-a-glance sunburst.

use serde::Deserialize;

/// A named layer. Leaves carry a value, groups carry children.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LayerNode {
	/// Layer or file name.
	pub name: String,
	/// Leaf weight. Groups sum their children.
	#[serde(default)]
	pub value: Option<u64>,
	/// Sub-layers.
	#[serde(default)]
	pub children: Vec<LayerNode>,
}

impl LayerNode {
	/// Weighted leaf.
	pub fn leaf(name: &str, value: u64) -> Self {
		Self {
			name: name.to_string(),
			value: Some(value),
			children: Vec::new(),
		}
	}

	/// Named group of layers.
	pub fn group(name: &str, children: Vec<LayerNode>) -> Self {
		Self {
			name: name.to_string(),
			value: None,
			children,
		}
	}
}

/// Schema, wiring, UI, and tests, in the order a reviewer reads them.
pub fn review_layers() -> LayerNode {
	LayerNode::group(
		"PR",
		vec![
			LayerNode::group(
				"Schema",
				vec![LayerNode::leaf("schema.ts", 24), LayerNode::leaf("types.ts", 18)],
			),
			LayerNode::group(
				"Wiring",
				vec![
					LayerNode::leaf("api.ts", 32),
					LayerNode::leaf("handlers.ts", 28),
					LayerNode::leaf("reviewer.ts", 20),
				],
			),
			LayerNode::group(
				"UI",
				vec![
					LayerNode::leaf("Component.tsx", 45),
					LayerNode::leaf("page.tsx", 22),
					LayerNode::leaf("layout.tsx", 12),
				],
			),
			LayerNode::group(
				"Tests",
				vec![
					LayerNode::leaf("api.test.ts", 15),
					LayerNode::leaf("component.test.tsx", 18),
				],
			),
		],
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn layers_deserialize_from_json() {
		let layer: LayerNode = serde_json::from_value(serde_json::json!({
			"name": "PR",
			"children": [{ "name": "Schema", "children": [{ "name": "schema.ts", "value": 24 }] }]
		}))
		.unwrap();
		assert_eq!(layer.children[0].children[0], LayerNode::leaf("schema.ts", 24));
		assert_eq!(layer.value, None);
	}

	#[test]
	fn builtin_layers_have_four_groups() {
		let names: Vec<String> = review_layers().children.into_iter().map(|c| c.name).collect();
		assert_eq!(names, vec!["Schema", "Wiring", "UI", "Tests"]);
	}
}
