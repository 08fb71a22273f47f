//! Where things are on the canvas, in world coordinates, and what the
//! pointer is over.

use super::scale::ScaledValues;
use crate::editor::HoverState;
use crate::graph::{Edge, EdgeId, Node, NodeId, Position};

/// Node box width in world units.
pub const NODE_WIDTH: f64 = 150.0;
/// Node box height in world units.
pub const NODE_HEIGHT: f64 = 40.0;
/// Node box corner radius.
pub const NODE_CORNER: f64 = 4.0;

const CURVE_SAMPLES: usize = 24;

fn distance(a: Position, b: Position) -> f64 {
	(a.x - b.x).hypot(a.y - b.y)
}

/// Whether `p` lies inside the node's box.
pub fn node_contains(node: &Node, p: Position) -> bool {
	let o = node.position;
	p.x >= o.x && p.x <= o.x + NODE_WIDTH && p.y >= o.y && p.y <= o.y + NODE_HEIGHT
}

/// Outgoing connections start here (bottom center).
pub fn source_handle(node: &Node) -> Position {
	Position::new(node.position.x + NODE_WIDTH / 2.0, node.position.y + NODE_HEIGHT)
}

/// Incoming connections end here (top center).
pub fn target_handle(node: &Node) -> Position {
	Position::new(node.position.x + NODE_WIDTH / 2.0, node.position.y)
}

/// Center of the node's delete glyph (top-right corner).
pub fn node_glyph(node: &Node) -> Position {
	Position::new(node.position.x + NODE_WIDTH, node.position.y)
}

/// Cubic curve from a source handle down to a target handle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeCurve {
	/// Start point.
	pub from: Position,
	/// First control point.
	pub c1: Position,
	/// Second control point.
	pub c2: Position,
	/// End point.
	pub to: Position,
}

impl EdgeCurve {
	/// Vertical S-curve from `from` down to `to`.
	pub fn new(from: Position, to: Position) -> Self {
		let bend = ((to.y - from.y).abs() / 2.0).max(40.0);
		Self {
			from,
			c1: Position::new(from.x, from.y + bend),
			c2: Position::new(to.x, to.y - bend),
			to,
		}
	}

	/// Curve from the source handle of `source` to the top of `target`.
	pub fn between(source: &Node, target: &Node) -> Self {
		Self::new(source_handle(source), target_handle(target))
	}

	/// Point at parameter `t` in `0..=1`.
	pub fn point_at(&self, t: f64) -> Position {
		let u = 1.0 - t;
		let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
		Position::new(
			a * self.from.x + b * self.c1.x + c * self.c2.x + d * self.to.x,
			a * self.from.y + b * self.c1.y + c * self.c2.y + d * self.to.y,
		)
	}

	/// Where the edge's delete glyph sits.
	pub fn midpoint(&self) -> Position {
		self.point_at(0.5)
	}

	/// Approximate distance from `p` to the curve.
	pub fn distance_to(&self, p: Position) -> f64 {
		let mut best = f64::INFINITY;
		let mut prev = self.from;
		for i in 1..=CURVE_SAMPLES {
			let next = self.point_at(i as f64 / CURVE_SAMPLES as f64);
			best = best.min(segment_distance(prev, next, p));
			prev = next;
		}
		best
	}
}

fn segment_distance(a: Position, b: Position, p: Position) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	if len2 < 1e-12 {
		return distance(a, p);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
	distance(Position::new(a.x + t * dx, a.y + t * dy), p)
}

/// The curve of `edge`, if both endpoints exist.
pub fn edge_curve(nodes: &[Node], edge: &Edge) -> Option<EdgeCurve> {
	let source = nodes.iter().find(|n| n.id == edge.source)?;
	let target = nodes.iter().find(|n| n.id == edge.target)?;
	Some(EdgeCurve::between(source, target))
}

/// What a pointer position lands on, most specific first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
	/// Delete glyph of a hovered node.
	NodeGlyph(NodeId),
	/// Delete glyph of a hovered edge.
	EdgeGlyph(EdgeId),
	/// Bottom handle a connection starts from.
	SourceHandle(NodeId),
	/// Node body.
	Node(NodeId),
	/// Edge curve.
	Edge(EdgeId),
	/// Empty background.
	Canvas,
}

impl HitTarget {
	/// The node the pointer counts as hovering.
	pub fn hovered_node(&self) -> Option<&NodeId> {
		match self {
			HitTarget::NodeGlyph(id) | HitTarget::SourceHandle(id) | HitTarget::Node(id) => Some(id),
			_ => None,
		}
	}

	/// Edge the pointer is over, if any.
	pub fn hovered_edge(&self) -> Option<&EdgeId> {
		match self {
			HitTarget::EdgeGlyph(id) | HitTarget::Edge(id) => Some(id),
			_ => None,
		}
	}
}

/// Resolve `p` against the graph. Delete glyphs only exist while their
/// element is hovered; later nodes are drawn on top and win.
pub fn hit_test(
	nodes: &[Node],
	edges: &[Edge],
	hover: &HoverState,
	p: Position,
	scale: &ScaledValues,
) -> HitTarget {
	if let Some(node) = hover.node.as_ref().and_then(|id| nodes.iter().find(|n| &n.id == id)) {
		if distance(node_glyph(node), p) <= scale.glyph_radius {
			return HitTarget::NodeGlyph(node.id.clone());
		}
	}
	if let Some(edge) = hover.edge.as_ref().and_then(|id| edges.iter().find(|e| &e.id == id)) {
		if let Some(curve) = edge_curve(nodes, edge) {
			if distance(curve.midpoint(), p) <= scale.glyph_radius {
				return HitTarget::EdgeGlyph(edge.id.clone());
			}
		}
	}
	for node in nodes.iter().rev() {
		if distance(source_handle(node), p) <= scale.handle_radius * 2.0 {
			return HitTarget::SourceHandle(node.id.clone());
		}
		if node_contains(node, p) {
			return HitTarget::Node(node.id.clone());
		}
	}
	edges
		.iter()
		.rev()
		.find(|edge| {
			edge_curve(nodes, edge)
				.is_some_and(|curve| curve.distance_to(p) <= scale.edge_hit_tolerance)
		})
		.map(|edge| HitTarget::Edge(edge.id.clone()))
		.unwrap_or(HitTarget::Canvas)
}

/// Node a connection dragged to `p` would end on: its box or its target
/// handle.
pub fn drop_target<'a>(nodes: &'a [Node], p: Position, scale: &ScaledValues) -> Option<&'a NodeId> {
	nodes
		.iter()
		.rev()
		.find(|node| {
			node_contains(node, p) || distance(target_handle(node), p) <= scale.handle_radius * 2.0
		})
		.map(|node| &node.id)
}

/// World-space bounding box of all nodes.
pub fn bounds(nodes: &[Node]) -> Option<(Position, Position)> {
	let first = nodes.first()?;
	let mut min = first.position;
	let mut max = first.position;
	for node in nodes {
		min.x = min.x.min(node.position.x);
		min.y = min.y.min(node.position.y);
		max.x = max.x.max(node.position.x);
		max.y = max.y.max(node.position.y);
	}
	Some((min, Position::new(max.x + NODE_WIDTH, max.y + NODE_HEIGHT)))
}

/// Shorten `label` so it fits in a node box.
pub fn fit_label(label: &str, max_chars: usize) -> String {
	if label.chars().count() <= max_chars {
		return label.to_string();
	}
	let mut short: String = label.chars().take(max_chars.saturating_sub(1)).collect();
	short.push('…');
	short
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::graph_canvas::scale::ScaleConfig;

	fn scale() -> ScaledValues {
		ScaledValues::new(&ScaleConfig::default(), 1.0)
	}

	fn pair() -> (Vec<Node>, Vec<Edge>) {
		let a = Node::new("1", Position::new(0.0, 0.0), "Node 1");
		let b = Node::new("2", Position::new(0.0, 200.0), "Node 2");
		let edge = Edge::between(a.id.clone(), b.id.clone());
		(vec![a, b], vec![edge])
	}

	#[test]
	fn handles_sit_on_box_edges() {
		let node = Node::new("1", Position::new(10.0, 20.0), "n");
		assert_eq!(source_handle(&node), Position::new(85.0, 60.0));
		assert_eq!(target_handle(&node), Position::new(85.0, 20.0));
		assert_eq!(node_glyph(&node), Position::new(160.0, 20.0));
	}

	#[test]
	fn curve_runs_between_handles() {
		let (nodes, edges) = pair();
		let curve = edge_curve(&nodes, &edges[0]).unwrap();
		assert_eq!(curve.point_at(0.0), Position::new(75.0, 40.0));
		assert_eq!(curve.point_at(1.0), Position::new(75.0, 200.0));
		assert_eq!(curve.midpoint(), Position::new(75.0, 120.0));
		assert!(curve.distance_to(Position::new(78.0, 120.0)) < 3.5);
		assert!(curve.distance_to(Position::new(120.0, 120.0)) > 40.0);
	}

	#[test]
	fn hit_order() {
		let (nodes, edges) = pair();
		let scale = scale();
		let none = HoverState::default();

		assert_eq!(
			hit_test(&nodes, &edges, &none, Position::new(10.0, 10.0), &scale),
			HitTarget::Node(NodeId::from("1"))
		);
		assert_eq!(
			hit_test(&nodes, &edges, &none, Position::new(75.0, 41.0), &scale),
			HitTarget::SourceHandle(NodeId::from("1"))
		);
		assert_eq!(
			hit_test(&nodes, &edges, &none, Position::new(75.0, 120.0), &scale),
			HitTarget::Edge(edges[0].id.clone())
		);
		assert_eq!(
			hit_test(&nodes, &edges, &none, Position::new(500.0, 500.0), &scale),
			HitTarget::Canvas
		);
	}

	#[test]
	fn glyphs_need_hover() {
		let (nodes, edges) = pair();
		let scale = scale();
		let glyph = Position::new(149.0, 1.0);
		assert_eq!(
			hit_test(&nodes, &edges, &HoverState::default(), glyph, &scale),
			HitTarget::Node(NodeId::from("1"))
		);
		let hover = HoverState {
			node: Some(NodeId::from("1")),
			edge: Some(edges[0].id.clone()),
		};
		assert_eq!(
			hit_test(&nodes, &edges, &hover, glyph, &scale),
			HitTarget::NodeGlyph(NodeId::from("1"))
		);
		assert_eq!(
			hit_test(&nodes, &edges, &hover, Position::new(75.0, 120.0), &scale),
			HitTarget::EdgeGlyph(edges[0].id.clone())
		);
	}

	#[test]
	fn drops_land_on_box_or_target_handle() {
		let (nodes, _) = pair();
		let scale = scale();
		assert_eq!(
			drop_target(&nodes, Position::new(75.0, 197.0), &scale),
			Some(&NodeId::from("2"))
		);
		assert_eq!(
			drop_target(&nodes, Position::new(20.0, 220.0), &scale),
			Some(&NodeId::from("2"))
		);
		assert_eq!(drop_target(&nodes, Position::new(75.0, 120.0), &scale), None);
	}

	#[test]
	fn bounds_cover_node_boxes() {
		let (nodes, _) = pair();
		assert_eq!(
			bounds(&nodes),
			Some((Position::new(0.0, 0.0), Position::new(150.0, 240.0)))
		);
		assert_eq!(bounds(&[]), None);
	}

	#[test]
	fn long_labels_are_shortened() {
		assert_eq!(fit_label("Node 1", 18), "Node 1");
		assert_eq!(fit_label("abcdefghij", 5), "abcd…");
	}
}
