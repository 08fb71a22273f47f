//! The view transform and zoom-dependent sizes.
//!
//! # Coordinate Spaces
//!
//! - **World-space**: where node positions live. Drawing happens here after
//!   the canvas transform is applied.
//! - **Screen-space**: canvas pixels, as reported by pointer events.
//!
//! Handles, glyphs and line widths should stay readable at any zoom, so most
//! of them are [`ScaleBehavior::Screen`] or [`ScaleBehavior::Clamped`].

use crate::graph::Position;

/// Zoom bounds for the wheel.
pub const MIN_ZOOM: f64 = 0.25;
/// Largest zoom factor.
pub const MAX_ZOOM: f64 = 4.0;

/// Screen = world * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal pan in screen pixels.
	pub x: f64,
	/// Vertical pan in screen pixels.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Screen pixel to world point.
	pub fn to_world(&self, sx: f64, sy: f64) -> Position {
		Position::new((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// World point to screen pixel.
	pub fn to_screen(&self, p: Position) -> (f64, f64) {
		(p.x * self.k + self.x, p.y * self.k + self.y)
	}

	/// Zoom one wheel notch around the screen point `(sx, sy)`, which stays
	/// fixed under the pointer.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Center the world rectangle `(min, max)` in a `width` x `height`
	/// viewport at zoom 1, or smaller if it would not fit.
	pub fn fit(min: Position, max: Position, width: f64, height: f64, padding: f64) -> Self {
		let (bw, bh) = ((max.x - min.x).max(1.0), (max.y - min.y).max(1.0));
		let k = ((width - 2.0 * padding) / bw)
			.min((height - 2.0 * padding) / bh)
			.clamp(MIN_ZOOM, 1.0);
		let (cx, cy) = ((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
		Self {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}
}

/// Defines how a visual size scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped {
		/// Smallest on-screen size.
		min_screen: f64,
		/// Largest on-screen size.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// World-space value to draw with at zoom `k`.
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

/// A base size plus how it reacts to zoom.
#[derive(Clone, Debug)]
pub struct Scaled {
	/// Size at zoom 1.
	pub base: f64,
	/// How the size reacts to zoom.
	pub behavior: ScaleBehavior,
}

impl Scaled {
	const fn new(base: f64, behavior: ScaleBehavior) -> Self {
		Self { base, behavior }
	}

	fn at(&self, k: f64) -> f64 {
		self.behavior.apply(self.base, k)
	}
}

/// Base sizes of everything drawn on the canvas.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Connect handle dot.
	pub handle_radius: Scaled,
	/// Delete glyph circle.
	pub glyph_radius: Scaled,
	/// Edge stroke.
	pub edge_width: Scaled,
	/// How far from an edge curve the pointer may be and still hit it.
	pub edge_hit_tolerance: Scaled,
	/// Node outline.
	pub border_width: Scaled,
	/// Label font size in world units.
	pub label_size: f64,
	/// Distance between grid dots in world units.
	pub grid_spacing: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			handle_radius: Scaled::new(
				4.0,
				ScaleBehavior::Clamped {
					min_screen: 4.0,
					max_screen: 10.0,
				},
			),
			glyph_radius: Scaled::new(8.0, ScaleBehavior::Screen),
			edge_width: Scaled::new(1.5, ScaleBehavior::Screen),
			edge_hit_tolerance: Scaled::new(6.0, ScaleBehavior::Screen),
			border_width: Scaled::new(1.0, ScaleBehavior::World),
			label_size: 12.0,
			grid_spacing: 20.0,
		}
	}
}

/// Sizes for one frame, all in world-space.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	/// Zoom factor these were computed for.
	pub k: f64,
	/// Connect handle radius.
	pub handle_radius: f64,
	/// Delete glyph radius.
	pub glyph_radius: f64,
	/// Edge stroke width.
	pub edge_width: f64,
	/// Edge hit distance.
	pub edge_hit_tolerance: f64,
	/// Node outline width.
	pub border_width: f64,
	/// CSS font for node labels.
	pub label_font: String,
	/// CSS font for the glyph mark.
	pub glyph_font: String,
	/// Grid dots are skipped when they would be denser than this.
	pub draw_grid: bool,
	/// Distance between grid dots.
	pub grid_spacing: f64,
}

impl ScaledValues {
	/// Resolve `config` at zoom `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let glyph_radius = config.glyph_radius.at(k);
		Self {
			k,
			handle_radius: config.handle_radius.at(k),
			glyph_radius,
			edge_width: config.edge_width.at(k),
			edge_hit_tolerance: config.edge_hit_tolerance.at(k),
			border_width: config.border_width.at(k),
			label_font: format!("{}px sans-serif", config.label_size),
			glyph_font: format!("bold {}px sans-serif", glyph_radius * 1.4),
			draw_grid: config.grid_spacing * k >= 8.0,
			grid_spacing: config.grid_spacing,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_world_round_trip() {
		let t = ViewTransform {
			x: 40.0,
			y: -10.0,
			k: 2.0,
		};
		let p = t.to_world(140.0, 90.0);
		assert_eq!(p, Position::new(50.0, 50.0));
		assert_eq!(t.to_screen(p), (140.0, 90.0));
	}

	#[test]
	fn zoom_keeps_pointer_fixed_and_clamps() {
		let mut t = ViewTransform::default();
		let before = t.to_world(200.0, 100.0);
		t.zoom_at(200.0, 100.0, -1.0);
		assert!((t.k - 1.1).abs() < 1e-9);
		let after = t.to_world(200.0, 100.0);
		assert!((before.x - after.x).abs() < 1e-9);
		assert!((before.y - after.y).abs() < 1e-9);

		for _ in 0..100 {
			t.zoom_at(0.0, 0.0, -1.0);
		}
		assert_eq!(t.k, MAX_ZOOM);
		for _ in 0..100 {
			t.zoom_at(0.0, 0.0, 1.0);
		}
		assert_eq!(t.k, MIN_ZOOM);
	}

	#[test]
	fn fit_centers_content() {
		let t = ViewTransform::fit(
			Position::new(0.0, 0.0),
			Position::new(150.0, 40.0),
			800.0,
			600.0,
			40.0,
		);
		assert_eq!(t.k, 1.0);
		assert_eq!(t.to_screen(Position::new(75.0, 20.0)), (400.0, 300.0));

		let t = ViewTransform::fit(
			Position::new(0.0, 0.0),
			Position::new(150.0, 4000.0),
			800.0,
			600.0,
			40.0,
		);
		assert!(t.k < 1.0 && t.k >= MIN_ZOOM);
	}

	#[test]
	fn behaviors() {
		assert_eq!(ScaleBehavior::World.apply(4.0, 2.0), 4.0);
		assert_eq!(ScaleBehavior::Screen.apply(4.0, 2.0), 2.0);
		let clamped = ScaleBehavior::Clamped {
			min_screen: 4.0,
			max_screen: 10.0,
		};
		assert_eq!(clamped.apply(4.0, 0.5), 8.0);
		assert_eq!(clamped.apply(4.0, 4.0), 2.5);
	}
}
