//! Canvas palettes for light and dark mode.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red.
	pub r: u8,
	/// Green.
	pub g: u8,
	/// Blue.
	pub b: u8,
	/// Opacity, 0 to 1.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity `a`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color, new opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// CSS `rgba()` string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors for node boxes.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Box fill.
	pub fill: Color,
	/// Box outline.
	pub border: Color,
	/// Border of the node whose label is being edited.
	pub selected_border: Color,
	/// Fill under the pointer.
	pub hovered_fill: Color,
	/// Label text.
	pub label: Color,
	/// Connect handle.
	pub handle: Color,
}

/// Colors for edges.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Stroke.
	pub color: Color,
	/// Stroke under the pointer.
	pub hovered: Color,
	/// Dashed line shown while dragging out a new connection.
	pub preview: Color,
}

/// Colors for delete glyphs.
#[derive(Clone, Debug)]
pub struct GlyphStyle {
	/// Circle fill.
	pub fill: Color,
	/// The × mark.
	pub mark: Color,
}

/// Complete canvas theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Palette name.
	pub name: &'static str,
	/// Canvas background.
	pub background: Color,
	/// Grid dots.
	pub grid: Color,
	/// Nodes.
	pub node: NodeStyle,
	/// Edges.
	pub edge: EdgeStyle,
	/// Delete glyphs.
	pub glyph: GlyphStyle,
}

impl Theme {
	/// Palette for the light page.
	pub fn light() -> Self {
		let accent = Color::rgb(26, 25, 43);
		Self {
			name: "light",
			background: Color::rgb(250, 250, 250),
			grid: Color::rgb(200, 200, 205),
			node: NodeStyle {
				fill: Color::rgb(255, 255, 255),
				border: accent,
				selected_border: Color::rgb(255, 0, 114),
				hovered_fill: Color::rgb(244, 244, 248),
				label: Color::rgb(34, 34, 34),
				handle: Color::rgb(85, 85, 85),
			},
			edge: EdgeStyle {
				color: Color::rgb(177, 177, 183),
				hovered: accent.lighten(0.2),
				preview: accent.with_alpha(0.6),
			},
			glyph: GlyphStyle {
				fill: Color::rgb(230, 57, 70),
				mark: Color::rgb(255, 255, 255),
			},
		}
	}

	/// Palette for the dark page.
	pub fn dark() -> Self {
		let base = Color::rgb(22, 27, 34);
		Self {
			name: "dark",
			background: base,
			grid: base.lighten(0.15),
			node: NodeStyle {
				fill: Color::rgb(36, 41, 51),
				border: Color::rgb(129, 161, 193),
				selected_border: Color::rgb(255, 105, 160),
				hovered_fill: Color::rgb(36, 41, 51).lighten(0.08),
				label: Color::rgb(230, 233, 239),
				handle: Color::rgb(180, 190, 205),
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.6),
				hovered: Color::rgb(190, 205, 220),
				preview: Color::rgba(190, 205, 220, 0.6),
			},
			glyph: GlyphStyle {
				fill: Color::rgb(230, 57, 70).darken(0.1),
				mark: Color::rgb(255, 255, 255),
			},
		}
	}

	/// Dark palette when `dark`, light otherwise.
	pub fn for_mode(dark: bool) -> Self {
		if dark { Self::dark() } else { Self::light() }
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_strings() {
		assert_eq!(Color::rgb(255, 0, 114).to_css(), "#ff0072");
		assert_eq!(
			Color::rgba(10, 20, 30, 0.5).to_css(),
			"rgba(10, 20, 30, 0.5)"
		);
	}

	#[test]
	fn lighten_and_darken_bounds() {
		let c = Color::rgb(100, 100, 100);
		assert_eq!(c.lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(c.darken(1.0), Color::rgb(0, 0, 0));
		assert_eq!(c.lighten(0.0), c);
	}

	#[test]
	fn mode_picks_palette() {
		assert_eq!(Theme::for_mode(true).name, "dark");
		assert_eq!(Theme::for_mode(false).name, "light");
	}
}
