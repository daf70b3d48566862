use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
	error::{QuoteError, Result},
	layout::{self, LayoutConfig},
	output, resources, wrap,
};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const ENV_PREFIX: &str = "QUOTE_CARD";

/// Session-wide settings. Loaded once at startup and read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
	pub backgrounds_dir: PathBuf,
	pub output_dir: PathBuf,
	pub font_size: u32,
	pub font_family: PathBuf,
	pub watermark: PathBuf,
	pub max_chars: usize,
	pub text_margin_x: i32,
	pub text_start_y: i32,
	pub leading: u32,
	pub line_height: Option<u32>,
	pub preview_width: u32,
	pub preview_height: u32,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			backgrounds_dir: PathBuf::from("backgrounds"),
			output_dir: PathBuf::from("Quotes"),
			font_size: 40,
			font_family: PathBuf::from(resources::DEFAULT_FONT_PATH),
			watermark: PathBuf::from(resources::DEFAULT_WATERMARK_PATH),
			max_chars: wrap::DEFAULT_MAX_CHARS,
			text_margin_x: layout::DEFAULT_TEXT_MARGIN_X,
			text_start_y: layout::DEFAULT_TEXT_START_Y,
			leading: layout::DEFAULT_LEADING,
			line_height: Some(layout::DEFAULT_LINE_HEIGHT),
			preview_width: output::PREVIEW_MAX_WIDTH,
			preview_height: output::PREVIEW_MAX_HEIGHT,
		}
	}
}

impl AppConfig {
	/// Load the config and make sure its output directory exists.
	pub fn read(path: &Path) -> Result<Self> {
		let config = Self::load(path)?;
		std::fs::create_dir_all(&config.output_dir)?;
		Ok(config)
	}

	/// Read `path`, layering `QUOTE_CARD_*` environment variables on top.
	///
	/// A missing file is created with the defaults first so later runs see the same values.
	pub fn load(path: &Path) -> Result<Self> {
		Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
	}

	fn load_with_env(path: &Path, env: config::Environment) -> Result<Self> {
		if !path.exists() {
			Self::default().persist(path)?;
			info!(path = %path.display(), "config not found, wrote defaults");
		}

		let raw = config::Config::builder()
			.add_source(config::File::from(path).format(config::FileFormat::Json).required(true))
			.add_source(env.try_parsing(true))
			.build()?;
		Ok(raw.try_deserialize()?)
	}

	/// Write as pretty JSON with four-space indentation.
	pub fn persist(&self, path: &Path) -> Result<()> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			std::fs::create_dir_all(parent)?;
		}
		let mut buf = Vec::new();
		let mut ser = serde_json::Serializer::with_formatter(&mut buf, serde_json::ser::PrettyFormatter::with_indent(b"    "));
		self.serialize(&mut ser).map_err(|e| QuoteError::config(e.to_string()))?;
		buf.push(b'\n');
		std::fs::write(path, buf)?;
		Ok(())
	}

	pub fn layout(&self) -> LayoutConfig {
		LayoutConfig {
			max_chars: self.max_chars,
			text_margin_x: self.text_margin_x,
			text_start_y: self.text_start_y,
			leading: self.leading,
			line_height: self.line_height,
		}
	}
}
