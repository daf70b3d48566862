use std::{
	path::{Path, PathBuf},
	sync::Arc,
};

use tracing::debug;

use crate::error::{QuoteError, Result};

/// A font file loaded once and shared read-only by every render.
#[derive(Clone)]
pub struct FontAsset {
	db: Arc<fontdb::Database>,
	family: String,
	path: PathBuf,
	size: u32,
}

impl std::fmt::Debug for FontAsset {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FontAsset")
			.field("family", &self.family)
			.field("path", &self.path)
			.field("size", &self.size)
			.field("faces", &self.db.len())
			.finish()
	}
}

impl FontAsset {
	/// Load the font at `path` for rendering at `size` pixels.
	///
	/// Fails if the file is missing or contains no face the font database can parse.
	pub fn load(path: impl AsRef<Path>, size: u32) -> Result<Self> {
		let path = path.as_ref();
		let mut db = fontdb::Database::new();
		db.load_font_file(path).map_err(|e| QuoteError::FontLoad {
			path: path.to_path_buf(),
			reason: e.to_string(),
		})?;

		// unparseable files are skipped silently by fontdb
		let family = db
			.faces()
			.find_map(|face| face.families.first().map(|(name, _)| name.clone()))
			.ok_or_else(|| QuoteError::FontLoad {
				path: path.to_path_buf(),
				reason: "no usable font face".to_string(),
			})?;
		debug!(path = %path.display(), %family, faces = db.len(), "font loaded");

		Ok(Self {
			db: Arc::new(db),
			family,
			path: path.to_path_buf(),
			size,
		})
	}

	pub fn family(&self) -> &str {
		&self.family
	}

	pub fn size(&self) -> u32 {
		self.size
	}

	pub(crate) fn database(&self) -> Arc<fontdb::Database> {
		Arc::clone(&self.db)
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	/// A Latin-capable font file installed on this machine, if any.
	pub(crate) fn system_font_path() -> Option<PathBuf> {
		const PREFERRED: [&str; 5] = ["DejaVu Sans", "Liberation Sans", "Noto Sans", "FreeSans", "Arial"];

		let mut db = fontdb::Database::new();
		db.load_system_fonts();
		let file_of = |face: &fontdb::FaceInfo| match &face.source {
			fontdb::Source::File(path) => Some(path.clone()),
			_ => None,
		};
		PREFERRED
			.iter()
			.find_map(|want| db.faces().filter(|face| face.families.iter().any(|(name, _)| name == want)).find_map(file_of))
			.or_else(|| db.faces().filter(|face| !face.families.is_empty()).find_map(file_of))
	}

	#[test]
	fn missing_file_is_font_load_error() {
		let err = FontAsset::load("definitely/not/here.ttf", 40).unwrap_err();
		assert!(matches!(err, QuoteError::FontLoad { .. }), "{err:?}");
		assert!(err.to_string().contains("definitely/not/here.ttf"));
	}

	#[test]
	fn garbage_file_is_font_load_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.ttf");
		std::fs::write(&path, b"this is not a font").unwrap();

		let err = FontAsset::load(&path, 40).unwrap_err();
		assert!(matches!(err, QuoteError::FontLoad { .. }), "{err:?}");
	}

	#[test]
	fn loads_system_font_when_available() {
		let Some(path) = system_font_path() else {
			eprintln!("no system fonts installed, skipping");
			return;
		};
		let font = FontAsset::load(&path, 40).unwrap();
		assert!(!font.family().is_empty());
		assert_eq!(font.size(), 40);
	}
}
