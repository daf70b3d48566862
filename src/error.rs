use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, QuoteError>;

/// Everything that can go wrong between picking a background and writing the card.
///
/// Every variant is recoverable at the boundary of the user action that raised it,
/// except `MissingResources`, which must stop startup.
#[derive(thiserror::Error, Debug)]
pub enum QuoteError {
	#[error("no background image selected")]
	NoBackground,

	#[error("quote text is empty")]
	EmptyText,

	#[error("unsupported file format: {} (use .jpg, .jpeg or .png)", .path.display())]
	UnsupportedFormat { path: PathBuf },

	#[error("file not found: {}", .path.display())]
	NotFound { path: PathBuf },

	#[error("failed to decode image {}: {source}", .path.display())]
	Decode {
		path: PathBuf,
		#[source]
		source: image::ImageError,
	},

	#[error("no images found in {}", .dir.display())]
	NoImagesFound { dir: PathBuf },

	#[error("resource files missing: {}", join_paths(.0))]
	MissingResources(Vec<PathBuf>),

	#[error("failed to load font {}: {reason}", .path.display())]
	FontLoad { path: PathBuf, reason: String },

	#[error("invalid color: {0}")]
	InvalidColor(String),

	#[error("render error: {0}")]
	Render(String),

	#[error("failed to save image {}: {source}", .path.display())]
	Export {
		path: PathBuf,
		#[source]
		source: image::ImageError,
	},

	#[error("config error: {0}")]
	Config(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl QuoteError {
	pub fn render(msg: impl Into<String>) -> Self {
		Self::Render(msg.into())
	}

	pub fn config(msg: impl Into<String>) -> Self {
		Self::Config(msg.into())
	}

	/// Precondition failures are caught before any work is done.
	pub fn is_precondition(&self) -> bool {
		matches!(self, Self::NoBackground | Self::EmptyText)
	}
}

impl From<config::ConfigError> for QuoteError {
	fn from(e: config::ConfigError) -> Self {
		Self::Config(e.to_string())
	}
}

fn join_paths(paths: &[PathBuf]) -> String {
	paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_names_offending_path() {
		let err = QuoteError::UnsupportedFormat { path: PathBuf::from("bg/file.gif") };
		assert!(err.to_string().contains("bg/file.gif"));

		let err = QuoteError::NoImagesFound { dir: PathBuf::from("backgrounds") };
		assert_eq!(err.to_string(), "no images found in backgrounds");
	}

	#[test]
	fn missing_resources_lists_every_file() {
		let err = QuoteError::MissingResources(vec![PathBuf::from("resource/Img-3.png"), PathBuf::from("resource/font.ttf")]);
		assert_eq!(err.to_string(), "resource files missing: resource/Img-3.png, resource/font.ttf");
	}

	#[test]
	fn precondition_classification() {
		assert!(QuoteError::NoBackground.is_precondition());
		assert!(QuoteError::EmptyText.is_precondition());
		assert!(!QuoteError::render("x").is_precondition());
		assert!(!QuoteError::config("x").is_precondition());
	}
}
