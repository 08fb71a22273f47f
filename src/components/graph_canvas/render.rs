//! Canvas rendering for the editor.
//!
//! Passes, back to front:
//! 1. Background and dot grid
//! 2. Edges, then the connection preview
//! 3. Nodes with their handles
//! 4. Delete glyphs of hovered elements

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::geometry::{
	self, EdgeCurve, NODE_CORNER, NODE_HEIGHT, NODE_WIDTH, edge_curve, node_glyph, source_handle,
	target_handle,
};
use super::scale::{ScaleConfig, ScaledValues, ViewTransform};
use super::theme::{Color, Theme};
use crate::editor::HoverState;
use crate::graph::{Edge, Node, NodeId, Position};

const LABEL_CHARS: usize = 20;
const MAX_GRID_DOTS: f64 = 20_000.0;

/// Everything one frame draws.
pub struct Frame<'a> {
	/// Nodes to draw.
	pub nodes: &'a [Node],
	/// Edges to draw.
	pub edges: &'a [Edge],
	/// Which element shows its delete glyph.
	pub hover: &'a HoverState,
	/// Node being renamed, drawn highlighted.
	pub selected: Option<&'a NodeId>,
	/// Pan and zoom.
	pub transform: ViewTransform,
	/// Canvas width in pixels.
	pub width: f64,
	/// Canvas height in pixels.
	pub height: f64,
	/// Source handle and pointer while a connection is being dragged.
	pub preview: Option<(Position, Position)>,
}

/// Paint `frame` onto `ctx`.
pub fn render(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, frame.transform.k);

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);

	ctx.save();
	let _ = ctx.translate(frame.transform.x, frame.transform.y);
	let _ = ctx.scale(frame.transform.k, frame.transform.k);

	if scale.draw_grid {
		draw_grid(frame, ctx, &scale, theme);
	}
	draw_edges(frame, ctx, &scale, theme);
	if let Some((from, to)) = frame.preview {
		draw_preview(ctx, &scale, theme, from, to);
	}
	for node in frame.nodes {
		draw_node(frame, ctx, &scale, theme, node);
	}
	draw_glyphs(frame, ctx, &scale, theme);

	ctx.restore();
}

fn draw_grid(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let step = scale.grid_spacing;
	let top_left = frame.transform.to_world(0.0, 0.0);
	let bottom_right = frame.transform.to_world(frame.width, frame.height);
	let (cols, rows) = (
		((bottom_right.x - top_left.x) / step).ceil(),
		((bottom_right.y - top_left.y) / step).ceil(),
	);
	if cols * rows > MAX_GRID_DOTS {
		return;
	}
	let dot = 1.0 / scale.k;
	ctx.set_fill_style_str(&theme.grid.to_css());
	let mut x = (top_left.x / step).floor() * step;
	while x <= bottom_right.x {
		let mut y = (top_left.y / step).floor() * step;
		while y <= bottom_right.y {
			ctx.fill_rect(x - dot / 2.0, y - dot / 2.0, dot, dot);
			y += step;
		}
		x += step;
	}
}

fn stroke_curve(ctx: &CanvasRenderingContext2d, curve: &EdgeCurve) {
	ctx.begin_path();
	ctx.move_to(curve.from.x, curve.from.y);
	ctx.bezier_curve_to(
		curve.c1.x, curve.c1.y, curve.c2.x, curve.c2.y, curve.to.x, curve.to.y,
	);
	ctx.stroke();
}

fn draw_edges(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	for edge in frame.edges {
		let Some(curve) = edge_curve(frame.nodes, edge) else {
			continue;
		};
		let hovered = frame.hover.edge.as_ref() == Some(&edge.id);
		let (color, width) = if hovered {
			(theme.edge.hovered, scale.edge_width * 2.0)
		} else {
			(theme.edge.color, scale.edge_width)
		};
		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_line_width(width);
		stroke_curve(ctx, &curve);
	}
}

fn draw_preview(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	from: Position,
	to: Position,
) {
	let dash = 6.0 / scale.k;
	let pattern = js_sys::Array::of2(&JsValue::from_f64(dash), &JsValue::from_f64(dash));
	let _ = ctx.set_line_dash(&pattern);
	ctx.set_stroke_style_str(&theme.edge.preview.to_css());
	ctx.set_line_width(scale.edge_width);
	stroke_curve(ctx, &EdgeCurve::new(from, to));
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn dot(ctx: &CanvasRenderingContext2d, at: Position, radius: f64, color: Color) {
	ctx.set_fill_style_str(&color.to_css());
	ctx.begin_path();
	let _ = ctx.arc(at.x, at.y, radius, 0.0, PI * 2.0);
	ctx.fill();
}

fn draw_node(
	frame: &Frame<'_>,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	node: &Node,
) {
	let hovered = frame.hover.node.as_ref() == Some(&node.id);
	let selected = frame.selected == Some(&node.id);
	let Position { x, y } = node.position;

	rounded_rect(ctx, x, y, NODE_WIDTH, NODE_HEIGHT, NODE_CORNER);
	let fill = if hovered {
		theme.node.hovered_fill
	} else {
		theme.node.fill
	};
	ctx.set_fill_style_str(&fill.to_css());
	ctx.fill();
	let (border, width) = if selected {
		(theme.node.selected_border, scale.border_width * 2.0)
	} else {
		(theme.node.border, scale.border_width)
	};
	ctx.set_stroke_style_str(&border.to_css());
	ctx.set_line_width(width);
	ctx.stroke();

	ctx.set_fill_style_str(&theme.node.label.to_css());
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(
		&geometry::fit_label(&node.label, LABEL_CHARS),
		x + NODE_WIDTH / 2.0,
		y + NODE_HEIGHT / 2.0,
	);

	dot(ctx, target_handle(node), scale.handle_radius, theme.node.handle);
	dot(ctx, source_handle(node), scale.handle_radius, theme.node.handle);
}

fn draw_glyph(ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme, at: Position) {
	dot(ctx, at, scale.glyph_radius, theme.glyph.fill);
	ctx.set_fill_style_str(&theme.glyph.mark.to_css());
	ctx.set_font(&scale.glyph_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text("×", at.x, at.y);
}

fn draw_glyphs(frame: &Frame<'_>, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	if let Some(edge) = frame
		.hover
		.edge
		.as_ref()
		.and_then(|id| frame.edges.iter().find(|e| &e.id == id))
	{
		if let Some(curve) = edge_curve(frame.nodes, edge) {
			draw_glyph(ctx, scale, theme, curve.midpoint());
		}
	}
	if let Some(node) = frame
		.hover
		.node
		.as_ref()
		.and_then(|id| frame.nodes.iter().find(|n| &n.id == id))
	{
		draw_glyph(ctx, scale, theme, node_glyph(node));
	}
}
