//! What the front end holds between user actions: the current background, text and color.
//!
//! Every action either completes or leaves the session as it was.

use std::path::{Path, PathBuf};

use derive_new::new;
use image::{DynamicImage, RgbaImage};
use tracing::{info, warn};

use crate::{
	background,
	color::Color,
	composite::composite,
	config::AppConfig,
	error::{QuoteError, Result},
	font::FontAsset,
	layout::LayoutConfig,
	output,
	resources::Resources,
	wrap::wrap,
};

/// One render: immutable once built, produces exactly one raster.
#[derive(Clone, Copy, Debug, new)]
pub struct QuoteRequest<'a> {
	pub background: &'a DynamicImage,
	pub text: &'a str,
	pub color: Color,
	pub font: &'a FontAsset,
}

impl QuoteRequest<'_> {
	/// Wrap, lay out and composite. Blank text is rejected before any pixel work.
	pub fn render(&self, watermark: Option<&RgbaImage>, layout: &LayoutConfig) -> Result<DynamicImage> {
		let text = self.text.trim();
		if text.is_empty() {
			return Err(QuoteError::EmptyText);
		}
		let lines = wrap(text, layout.max_chars);
		let layout = layout.layout(lines, self.font.size());
		composite(self.background, watermark, &layout, self.font, self.color)
	}
}

#[derive(Debug)]
pub struct Session {
	config: AppConfig,
	resources: Resources,
	background: Option<DynamicImage>,
	background_path: Option<PathBuf>,
	text: String,
	color: Color,
}

impl Session {
	pub fn new(config: AppConfig, resources: Resources) -> Self {
		Self {
			config,
			resources,
			background: None,
			background_path: None,
			text: String::new(),
			color: Color::default(),
		}
	}

	pub fn config(&self) -> &AppConfig {
		&self.config
	}

	pub fn background(&self) -> Option<&DynamicImage> {
		self.background.as_ref()
	}

	pub fn background_path(&self) -> Option<&Path> {
		self.background_path.as_deref()
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn color(&self) -> Color {
		self.color
	}

	/// Load a background from a typed or browsed path, relative ones against `backgrounds_dir`.
	///
	/// On failure the previous background stays selected.
	pub fn load_background(&mut self, input: &str) -> Result<&Path> {
		let loaded = background::load(input, &self.config.backgrounds_dir);
		self.replace_background(loaded)
	}

	pub fn load_random_background(&mut self) -> Result<&Path> {
		let loaded = background::load_random(&self.config.backgrounds_dir);
		self.replace_background(loaded)
	}

	fn replace_background(&mut self, loaded: Result<(DynamicImage, PathBuf)>) -> Result<&Path> {
		let (image, path) = loaded.inspect_err(|e| warn!(error = %e, "background not loaded, keeping previous"))?;
		self.background = Some(image);
		let path = self.background_path.insert(path);
		Ok(path.as_path())
	}

	pub fn set_text(&mut self, text: impl Into<String>) {
		self.text = text.into();
	}

	pub fn set_color(&mut self, color: Color) {
		self.color = color;
	}

	/// `None` keeps the current color, as when a color picker is cancelled.
	pub fn choose_color(&mut self, picked: Option<&str>) -> Result<Color> {
		if let Some(hex) = picked {
			self.color = hex.parse()?;
		}
		Ok(self.color)
	}

	/// The full-resolution card for the current state.
	pub fn render(&self) -> Result<DynamicImage> {
		let background = self.background.as_ref().ok_or(QuoteError::NoBackground)?;
		let request = QuoteRequest::new(background, &self.text, self.color, self.resources.font());
		request.render(Some(self.resources.watermark()), &self.config.layout())
	}

	/// The card downsized to the preview box.
	pub fn preview(&self) -> Result<DynamicImage> {
		let card = self.render()?;
		Ok(output::preview(&card, self.config.preview_width, self.config.preview_height))
	}

	/// The bare background downsized to the preview box, shown before any text is rendered.
	pub fn background_preview(&self) -> Option<DynamicImage> {
		self.background.as_ref().map(|bg| output::preview(bg, self.config.preview_width, self.config.preview_height))
	}

	/// Render and write the card at full resolution.
	///
	/// A bare file name lands in `output_dir`; a missing extension becomes `.png`. The session is
	/// untouched whether or not the write succeeds.
	pub fn save(&self, path: &Path) -> Result<PathBuf> {
		let card = self.render()?;
		let path = self.save_path(path);
		output::export(&card, &path)?;
		info!(path = %path.display(), "quote saved");
		Ok(path)
	}

	pub fn save_path(&self, path: &Path) -> PathBuf {
		let path = output::with_default_extension(path);
		match path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => path,
			_ => self.config.output_dir.join(path),
		}
	}

	/// Forget the background, text and color.
	pub fn clear(&mut self) {
		self.background = None;
		self.background_path = None;
		self.text.clear();
		self.color = Color::default();
	}
}

#[cfg(test)]
mod tests {
	use image::{GenericImageView, Rgba};

	use super::*;
	use crate::font::tests::system_font_path;

	struct Fixture {
		dir: tempfile::TempDir,
		session: Session,
	}

	fn fixture() -> Option<Fixture> {
		let font = FontAsset::load(system_font_path()?, 40).ok()?;
		let dir = tempfile::tempdir().unwrap();
		let backgrounds = dir.path().join("backgrounds");
		std::fs::create_dir_all(&backgrounds).unwrap();
		RgbaImage::from_pixel(320, 480, Rgba([30, 60, 90, 255])).save(backgrounds.join("bg.png")).unwrap();

		let config = AppConfig {
			backgrounds_dir: backgrounds,
			output_dir: dir.path().join("Quotes"),
			text_margin_x: 10,
			text_start_y: 40,
			..AppConfig::default()
		};
		std::fs::create_dir_all(&config.output_dir).unwrap();
		let watermark = RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 255]));
		Some(Fixture {
			dir,
			session: Session::new(config, Resources::new(watermark, font)),
		})
	}

	#[test]
	fn preconditions_checked_before_compositing() {
		let Some(Fixture { dir: _dir, mut session }) = fixture() else {
			return;
		};
		assert!(matches!(session.render(), Err(QuoteError::NoBackground)));

		session.load_background("bg.png").unwrap();
		session.set_text("   \n\t ");
		assert!(matches!(session.render(), Err(QuoteError::EmptyText)));
		assert!(matches!(session.preview(), Err(QuoteError::EmptyText)));
	}

	// Test: a bad path keeps the previously loaded background
	#[test]
	fn failed_load_keeps_previous_background() {
		let Some(Fixture { dir: _dir, mut session }) = fixture() else {
			return;
		};
		let first = session.load_background("bg.png").unwrap().to_path_buf();

		assert!(matches!(session.load_background("bg.gif"), Err(QuoteError::UnsupportedFormat { .. })));
		assert!(matches!(session.load_background("missing.png"), Err(QuoteError::NotFound { .. })));
		assert_eq!(session.background_path(), Some(first.as_path()));
		assert_eq!(session.background().unwrap().dimensions(), (320, 480));
	}

	#[test]
	fn render_keeps_dimensions_and_burns_watermark() {
		let Some(Fixture { dir: _dir, mut session }) = fixture() else {
			return;
		};
		session.load_random_background().unwrap();
		session.set_text("Hello world this is a long quote that needs wrapping across several lines");

		let card = session.render().unwrap();
		assert_eq!(card.dimensions(), (320, 480));
		assert_eq!(*card.to_rgba8().get_pixel(3, 3), Rgba([255, 0, 0, 255]));

		let preview = session.preview().unwrap();
		// already inside the preview box
		assert_eq!(preview.dimensions(), (320, 480));
	}

	#[test]
	fn save_defaults_into_output_dir_with_png() {
		let Some(Fixture { dir, mut session }) = fixture() else {
			return;
		};
		session.load_background("bg.png").unwrap();
		session.set_text("Saved quote");

		let saved = session.save(Path::new("card")).unwrap();
		assert_eq!(saved, dir.path().join("Quotes").join("card.png"));
		assert_eq!(image::open(&saved).unwrap().dimensions(), (320, 480));
	}

	#[test]
	fn failed_save_leaves_session_editable() {
		let Some(Fixture { dir, mut session }) = fixture() else {
			return;
		};
		session.load_background("bg.png").unwrap();
		session.set_text("Keep me");
		session.set_color(Color::black());

		let bad = dir.path().join("no_such_dir").join("card.png");
		assert!(matches!(session.save(&bad), Err(QuoteError::Export { .. })));
		assert_eq!(session.text(), "Keep me");
		assert_eq!(session.color(), Color::black());
		assert!(session.background().is_some());
		assert!(session.save(Path::new("retry.jpg")).is_ok());
	}

	#[test]
	fn choose_color_and_clear() {
		let Some(Fixture { dir: _dir, mut session }) = fixture() else {
			return;
		};
		assert_eq!(session.color(), Color::white());
		assert_eq!(session.choose_color(Some("#1e90ff")).unwrap(), Color::rgb(30, 144, 255));
		assert_eq!(session.choose_color(None).unwrap(), Color::rgb(30, 144, 255));
		assert!(session.choose_color(Some("blue-ish")).is_err());
		assert_eq!(session.color(), Color::rgb(30, 144, 255));

		session.load_background("bg.png").unwrap();
		session.set_text("x");
		assert!(session.background_preview().is_some());
		session.clear();
		assert!(session.background().is_none());
		assert!(session.background_path().is_none());
		assert!(session.text().is_empty());
		assert_eq!(session.color(), Color::white());
		assert!(session.background_preview().is_none());
	}
}
