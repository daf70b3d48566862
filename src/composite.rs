//! Burns the watermark and the wrapped quote into a copy of the background.
//!
//! Text goes through an SVG document rendered by resvg onto a transparent pixmap the size of the
//! background, which is then alpha-blended over the copy. The watermark is pasted at the origin at
//! its native size with its own alpha channel as the mask.

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::{
	color::Color,
	error::{QuoteError, Result},
	font::FontAsset,
	layout::LineLayout,
};

/// Produce a new raster with `watermark` and `layout`'s lines drawn over `background`.
///
/// The background is never mutated and the result always has its dimensions. A missing watermark
/// is skipped, as is a watermark pixel with zero alpha.
pub fn composite(background: &DynamicImage, watermark: Option<&RgbaImage>, layout: &LineLayout, font: &FontAsset, color: Color) -> Result<DynamicImage> {
	let mut result = background.to_rgba8();

	if let Some(watermark) = watermark {
		paste_masked(&mut result, watermark);
	}

	if let Some(text_layer) = render_text_layer(result.width(), result.height(), layout, font, color)? {
		blend_layer(&mut result, &text_layer);
	}

	debug!(
		width = result.width(),
		height = result.height(),
		lines = layout.len(),
		watermark = watermark.is_some(),
		"composited quote"
	);
	Ok(DynamicImage::ImageRgba8(result))
}

/// Paste `overlay` at (0, 0) using its alpha channel as the mask.
///
/// Color channels are interpolated by the mask and alpha accumulates source-over, so an opaque
/// background stays opaque. Only the overlapping region is touched; nothing is scaled.
pub fn paste_masked(target: &mut RgbaImage, overlay: &RgbaImage) {
	let width = target.width().min(overlay.width());
	let height = target.height().min(overlay.height());

	for y in 0..height {
		for x in 0..width {
			let fg = overlay.get_pixel(x, y);
			let mask = fg[3];
			if mask == 0 {
				continue;
			}
			let bg = target.get_pixel_mut(x, y);
			for c in 0..3 {
				bg[c] = lerp_u8(bg[c], fg[c], mask);
			}
			bg[3] = lerp_u8(bg[3], 255, mask);
		}
	}
}

fn lerp_u8(bg: u8, fg: u8, alpha: u8) -> u8 {
	let a = alpha as u32;
	((fg as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8
}

/// Source-over blend of a straight-alpha layer of the same size.
fn blend_layer(target: &mut RgbaImage, layer: &RgbaImage) {
	for (bg, fg) in target.pixels_mut().zip(layer.pixels()) {
		if fg[3] == 0 {
			continue;
		}
		*bg = blend_over(*bg, *fg);
	}
}

fn blend_over(bg: Rgba<u8>, fg: Rgba<u8>) -> Rgba<u8> {
	let fg_alpha = fg[3] as f32 / 255.0;
	let bg_alpha = bg[3] as f32 / 255.0;
	let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);
	if out_alpha < 0.001 {
		return Rgba([0, 0, 0, 0]);
	}

	let channel = |f: u8, b: u8| -> u8 {
		let v = (f as f32 * fg_alpha + b as f32 * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
		v.round().clamp(0.0, 255.0) as u8
	};
	Rgba([channel(fg[0], bg[0]), channel(fg[1], bg[1]), channel(fg[2], bg[2]), (out_alpha * 255.0).round() as u8])
}

/// Render the lines to a transparent, straight-alpha layer. `None` when there is nothing to draw.
fn render_text_layer(width: u32, height: u32, layout: &LineLayout, font: &FontAsset, color: Color) -> Result<Option<RgbaImage>> {
	if layout.is_empty() || width == 0 || height == 0 {
		return Ok(None);
	}

	let svg = text_svg(width, height, layout, font, color);
	let mut options = usvg::Options::default();
	options.fontdb = font.database();
	let tree = usvg::Tree::from_str(&svg, &options).map_err(|e| QuoteError::render(format!("text layer: {e}")))?;

	let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| QuoteError::render(format!("cannot allocate {width}x{height} pixmap")))?;
	resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

	let mut layer = RgbaImage::new(width, height);
	for (dst, src) in layer.pixels_mut().zip(pixmap.pixels()) {
		let c = src.demultiply();
		*dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
	}
	Ok(Some(layer))
}

/// One `<text>` per line, hung from its top edge so `(x, y)` is the line's top-left.
fn text_svg(width: u32, height: u32, layout: &LineLayout, font: &FontAsset, color: Color) -> String {
	let texts: String = layout
		.positions()
		.map(|(line, x, y)| format!(r#"  <text x="{x}" y="{y}" dominant-baseline="text-before-edge">{}</text>"#, escape_xml(line)))
		.collect::<Vec<_>>()
		.join("\n");

	format!(
		r#"<?xml version="1.0" encoding="UTF-8"?>
<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg">
 <g font-family="'{family}'" font-size="{size}" fill="{fill}" fill-opacity="{opacity}">
{texts}
 </g>
</svg>"#,
		family = escape_xml(font.family()),
		size = font.size(),
		fill = color.to_hex_rgb(),
		opacity = color.opacity(),
	)
}

fn escape_xml(s: &str) -> String {
	s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;").replace('\'', "&apos;")
}
