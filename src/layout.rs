//! Fixed-anchor text placement.
//!
//! The default profile is tuned for 1080x1920 portrait backgrounds: text starts near the left
//! edge, a little above the lower half. Nothing here looks at the background size, so on smaller
//! backgrounds lines past the bottom edge are clipped by the raster itself.

use derive_new::new;

use crate::wrap::DEFAULT_MAX_CHARS;

pub const DEFAULT_TEXT_MARGIN_X: i32 = 90;
pub const DEFAULT_TEXT_START_Y: i32 = 990;
pub const DEFAULT_LEADING: u32 = 10;
/// Observed spacing of the deployed 40px font.
pub const DEFAULT_LINE_HEIGHT: u32 = 51;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
	pub max_chars: usize,
	pub text_margin_x: i32,
	pub text_start_y: i32,
	pub leading: u32,
	/// Overrides `font_size + leading` when set.
	pub line_height: Option<u32>,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			max_chars: DEFAULT_MAX_CHARS,
			text_margin_x: DEFAULT_TEXT_MARGIN_X,
			text_start_y: DEFAULT_TEXT_START_Y,
			leading: DEFAULT_LEADING,
			line_height: Some(DEFAULT_LINE_HEIGHT),
		}
	}
}

impl LayoutConfig {
	pub fn line_height(&self, font_size: u32) -> u32 {
		self.line_height.unwrap_or(font_size + self.leading)
	}

	/// Anchor already-wrapped lines. Recomputed on every render.
	pub fn layout(&self, lines: Vec<String>, font_size: u32) -> LineLayout {
		LineLayout::new(lines, self.text_margin_x, self.text_start_y, self.line_height(font_size))
	}
}

/// Wrapped lines plus where each one goes. `(start_x, start_y)` is the top-left of the first line.
#[derive(Clone, Debug, PartialEq, Eq, new)]
pub struct LineLayout {
	pub lines: Vec<String>,
	pub start_x: i32,
	pub start_y: i32,
	pub line_height: u32,
}

impl LineLayout {
	/// Each line with its top-left draw origin, in order.
	pub fn positions(&self) -> impl Iterator<Item = (&str, i32, i32)> + '_ {
		self.lines
			.iter()
			.enumerate()
			.map(move |(i, line)| (line.as_str(), self.start_x, self.start_y + i as i32 * self.line_height as i32))
	}

	pub fn is_empty(&self) -> bool {
		self.lines.is_empty()
	}

	pub fn len(&self) -> usize {
		self.lines.len()
	}
}
