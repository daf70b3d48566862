use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{
	Result,
	eyre::{WrapErr as _, bail},
};
use image::GenericImageView;
use quote_card::{
	AppConfig, QuoteError, Resources, Session,
	config::DEFAULT_CONFIG_PATH,
	output,
	wrap::wrap,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "quote_card")]
#[command(about = "Overlay a quote and a watermark onto a background photo")]
struct Args {
	/// Path to the JSON config. Written with defaults if it does not exist.
	#[arg(long, default_value = DEFAULT_CONFIG_PATH)]
	config: PathBuf,
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Render the card and write a downsized preview.
	Preview {
		#[command(flatten)]
		quote: QuoteArgs,
		/// Where to write the preview image.
		#[arg(long)]
		out: PathBuf,
	},
	/// Render the card and save it at full resolution.
	Save {
		#[command(flatten)]
		quote: QuoteArgs,
		/// Output file. A bare name goes into `output_dir`; no extension means `.png`.
		#[arg(long, default_value = "quote.png")]
		out: PathBuf,
	},
	/// Print how the text would be wrapped.
	Wrap {
		#[arg(long)]
		text: String,
		#[arg(long)]
		max_chars: Option<usize>,
	},
}

#[derive(Debug, clap::Args)]
struct QuoteArgs {
	/// Background image (jpg or png). Relative paths are looked up in `backgrounds_dir`.
	#[arg(long, required_unless_present = "random", conflicts_with = "random")]
	background: Option<String>,
	/// Pick a random image from `backgrounds_dir` instead.
	#[arg(long)]
	random: bool,
	/// Quote text; wrapped automatically.
	#[arg(long)]
	text: String,
	/// Text color as #RGB, #RRGGBB or #RRGGBBAA.
	#[arg(long, default_value = "#FFFFFF")]
	color: String,
}

fn main() {
	if let Err(e) = run() {
		eprintln!("Error: {e:?}");
		std::process::exit(1);
	}
}

fn run() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();
	let args = Args::parse();

	let config = AppConfig::read(&args.config).wrap_err_with(|| format!("Failed to load config from {}", args.config.display()))?;

	match args.command {
		Command::Wrap { text, max_chars } => {
			let max_chars = max_chars.unwrap_or(config.max_chars);
			for line in wrap(&text, max_chars) {
				println!("{line}");
			}
		}
		Command::Preview { quote, out } => {
			let session = start_session(config, &quote)?;
			let preview = session.preview().map_err(report)?;
			output::export(&preview, &out)?;
			let (width, height) = preview.dimensions();
			println!("Preview ({width}x{height}) written to {}", out.display());
		}
		Command::Save { quote, out } => {
			let session = start_session(config, &quote)?;
			let saved = session.save(&out).map_err(report)?;
			println!("Quote image saved to {}", saved.display());
		}
	}

	Ok(())
}

fn report(e: QuoteError) -> color_eyre::Report {
	let context = if e.is_precondition() { "Nothing to render yet" } else { "Could not produce the quote image" };
	color_eyre::Report::new(e).wrap_err(context)
}

/// Validate resources, then replay the front end's selections onto a fresh session.
fn start_session(config: AppConfig, quote: &QuoteArgs) -> Result<Session> {
	let resources = Resources::load(&config.watermark, &config.font_family, config.font_size).wrap_err("Please ensure the resource folder contains all required files")?;
	let mut session = Session::new(config, resources);

	let path = match (&quote.background, quote.random) {
		(_, true) => session.load_random_background()?,
		(Some(background), false) => session.load_background(background)?,
		(None, false) => bail!("No background selected: pass --background or --random"),
	};
	info!(path = %path.display(), "background selected");

	session.set_text(quote.text.as_str());
	session.choose_color(Some(quote.color.as_str()))?;
	Ok(session)
}
