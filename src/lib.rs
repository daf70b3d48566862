//! Quote cards: a background photo with wrapped quote text and a watermark burned in.
//!
//! The pipeline is [`wrap`] → [`layout`] → [`composite`], fed by [`background`] and drained by
//! [`output`]. [`session::Session`] holds the state a front end keeps between user actions.

pub mod background;
pub mod color;
pub mod composite;
pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod output;
pub mod resources;
pub mod session;
pub mod wrap;

pub use color::Color;
pub use composite::composite;
pub use config::AppConfig;
pub use error::{QuoteError, Result};
pub use font::FontAsset;
pub use layout::{LayoutConfig, LineLayout};
pub use resources::Resources;
pub use session::{QuoteRequest, Session};
pub use wrap::wrap;
