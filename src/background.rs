//! Opening background images from user-typed paths or at random from the backgrounds directory.

use std::{
	io,
	path::{Component, Path, PathBuf},
};

use image::{DynamicImage, GenericImageView, ImageReader};
use rand::{Rng, seq::IndexedRandom};
use tracing::{debug, info};

use crate::error::{QuoteError, Result};

pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_supported(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

/// Lexically normalize `input` against `base_dir`.
///
/// Backslashes become forward slashes, relative paths are joined onto `base_dir`, the result is
/// made absolute against the working directory and `.`/`..` components are folded away. The
/// filesystem is not touched.
pub fn normalize_path(input: &str, base_dir: &Path) -> Result<PathBuf> {
	Ok(fold_dots(&joined(input, base_dir)?))
}

fn joined(input: &str, base_dir: &Path) -> Result<PathBuf> {
	let unified = PathBuf::from(input.trim().replace('\\', "/"));
	let joined = if unified.is_absolute() { unified } else { base_dir.join(unified) };
	Ok(std::path::absolute(&joined)?)
}

fn fold_dots(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				out.pop();
			}
			other => out.push(other),
		}
	}
	out
}

/// Normalize, check the extension, then canonicalize.
///
/// The extension is checked before the filesystem is consulted, so an unsupported file is rejected
/// whether or not it exists. Symlinks are followed before `..` is applied; when an intermediate
/// directory does not exist the lexically folded path is tried instead.
pub fn resolve(input: &str, base_dir: &Path) -> Result<PathBuf> {
	let joined = joined(input, base_dir)?;
	let path = fold_dots(&joined);
	if !is_supported(&path) {
		return Err(QuoteError::UnsupportedFormat { path });
	}
	std::fs::canonicalize(&joined)
		.or_else(|e| match e.kind() {
			io::ErrorKind::NotFound => std::fs::canonicalize(&path),
			_ => Err(e),
		})
		.map_err(|e| match e.kind() {
			io::ErrorKind::NotFound => QuoteError::NotFound { path },
			_ => QuoteError::Io(e),
		})
}

/// Decode the image at `path`, sniffing the format from its magic bytes.
pub fn open(path: &Path) -> Result<DynamicImage> {
	let reader = ImageReader::open(path)
		.map_err(|e| match e.kind() {
			io::ErrorKind::NotFound => QuoteError::NotFound { path: path.to_path_buf() },
			_ => QuoteError::Io(e),
		})?
		.with_guessed_format()?;
	let image = reader.decode().map_err(|source| QuoteError::Decode { path: path.to_path_buf(), source })?;

	let (width, height) = image.dimensions();
	info!(path = %path.display(), width, height, "background loaded");
	Ok(image)
}

/// Resolve `input` against `base_dir` and open it.
pub fn load(input: &str, base_dir: &Path) -> Result<(DynamicImage, PathBuf)> {
	let path = resolve(input, base_dir)?;
	let image = open(&path)?;
	Ok((image, path))
}

/// Supported image files directly inside `dir`, sorted. A missing directory has none.
pub fn candidates(dir: &Path) -> Result<Vec<PathBuf>> {
	let entries = match std::fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
		Err(e) => return Err(e.into()),
	};

	let mut files = Vec::new();
	for entry in entries {
		let path = entry?.path();
		if path.is_file() && is_supported(&path) {
			files.push(path);
		}
	}
	files.sort();
	Ok(files)
}

pub fn load_random(base_dir: &Path) -> Result<(DynamicImage, PathBuf)> {
	load_random_with(base_dir, &mut rand::rng())
}

/// Pick uniformly among `candidates(base_dir)` and open the pick.
pub fn load_random_with<R: Rng + ?Sized>(base_dir: &Path, rng: &mut R) -> Result<(DynamicImage, PathBuf)> {
	let files = candidates(base_dir)?;
	debug!(dir = %base_dir.display(), count = files.len(), "random background candidates");
	let pick = files.choose(rng).ok_or_else(|| QuoteError::NoImagesFound { dir: base_dir.to_path_buf() })?;

	let path = std::fs::canonicalize(pick)?;
	let image = open(&path)?;
	Ok((image, path))
}
