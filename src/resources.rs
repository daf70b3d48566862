//! Static assets every quote needs: the watermark and the font.
//!
//! Both are checked for existence up front, loaded once, and only read afterwards.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, error};

use crate::{
	error::{QuoteError, Result},
	font::FontAsset,
};

pub const DEFAULT_WATERMARK_PATH: &str = "resource/Img-3.png";
pub const DEFAULT_FONT_PATH: &str = "resource/PlusJakartaSans-SemiBold.ttf";

/// Fail with every path in `required` that does not exist, not just the first one.
pub fn ensure_exist<P: AsRef<Path>>(required: &[P]) -> Result<()> {
	let missing: Vec<PathBuf> = required.iter().map(|p| p.as_ref()).filter(|p| !p.exists()).map(Path::to_path_buf).collect();
	if missing.is_empty() {
		return Ok(());
	}
	error!(?missing, "required resource files are missing");
	Err(QuoteError::MissingResources(missing))
}

#[derive(Clone, Debug)]
pub struct Resources {
	watermark: RgbaImage,
	font: FontAsset,
}

impl Resources {
	/// Validate and load both assets. Nothing is loaded unless both files exist.
	pub fn load(watermark_path: &Path, font_path: &Path, font_size: u32) -> Result<Self> {
		ensure_exist(&[watermark_path, font_path])?;
		let watermark = load_watermark(watermark_path)?;
		let font = FontAsset::load(font_path, font_size)?;
		Ok(Self::new(watermark, font))
	}

	pub fn new(watermark: RgbaImage, font: FontAsset) -> Self {
		Self { watermark, font }
	}

	pub fn watermark(&self) -> &RgbaImage {
		&self.watermark
	}

	pub fn font(&self) -> &FontAsset {
		&self.font
	}
}

/// Decode the watermark to RGBA so its alpha channel can serve as the paste mask.
pub fn load_watermark(path: &Path) -> Result<RgbaImage> {
	let image = image::open(path).map_err(|source| QuoteError::Decode { path: path.to_path_buf(), source })?;
	let watermark = image.to_rgba8();
	debug!(path = %path.display(), width = watermark.width(), height = watermark.height(), "watermark loaded");
	Ok(watermark)
}
