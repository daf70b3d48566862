use std::{
	fs::File,
	io::{BufWriter, Write as _},
	path::{Path, PathBuf},
};

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat, imageops::FilterType};
use tracing::info;

use crate::error::{QuoteError, Result};

pub const PREVIEW_MAX_WIDTH: u32 = 800;
pub const PREVIEW_MAX_HEIGHT: u32 = 600;
pub const DEFAULT_EXTENSION: &str = "png";

/// Downsize a copy of `image` to fit within `max_width`x`max_height`, keeping the aspect ratio.
///
/// Images already inside the box come back unchanged; nothing is upsampled.
pub fn preview(image: &DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
	let (width, height) = image.dimensions();
	if width <= max_width && height <= max_height {
		return image.clone();
	}
	image.resize(max_width, max_height, FilterType::Lanczos3)
}

/// Append the default extension when `path` has none.
pub fn with_default_extension(path: &Path) -> PathBuf {
	match path.extension() {
		Some(_) => path.to_path_buf(),
		None => path.with_extension(DEFAULT_EXTENSION),
	}
}

/// Write `image` at full resolution, encoding by `path`'s extension.
///
/// The encoded bytes go to a sibling temp file that is renamed over `path` only once complete, so a
/// failed write never truncates an existing file.
pub fn export(image: &DynamicImage, path: &Path) -> Result<()> {
	let export_err = |source: ImageError| QuoteError::Export { path: path.to_path_buf(), source };
	let format = ImageFormat::from_path(path).map_err(export_err)?;

	// JPEG has no alpha channel
	let flattened;
	let encodable = match format {
		ImageFormat::Jpeg if image.color().has_alpha() => {
			flattened = DynamicImage::ImageRgb8(image.to_rgb8());
			&flattened
		}
		_ => image,
	};

	let tmp = temp_sibling(path);
	let written = write_encoded(encodable, &tmp, format).and_then(|()| std::fs::rename(&tmp, path).map_err(ImageError::IoError));
	if let Err(source) = written {
		let _ = std::fs::remove_file(&tmp);
		return Err(export_err(source));
	}

	let (width, height) = image.dimensions();
	info!(path = %path.display(), ?format, width, height, "quote image saved");
	Ok(())
}

fn write_encoded(image: &DynamicImage, path: &Path, format: ImageFormat) -> std::result::Result<(), ImageError> {
	let mut writer = BufWriter::new(File::create(path)?);
	image.write_to(&mut writer, format)?;
	writer.flush()?;
	writer.get_ref().sync_all()?;
	Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
	let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
	path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
