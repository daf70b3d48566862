use std::{fmt, str::FromStr};

use crate::error::QuoteError;

/// Text fill color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: u8,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 255 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self { r, g, b, a }
	}

	pub const fn white() -> Self {
		Self::rgb(255, 255, 255)
	}

	pub const fn black() -> Self {
		Self::rgb(0, 0, 0)
	}

	/// `#rrggbb`, alpha dropped.
	pub fn to_hex_rgb(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}

	pub fn opacity(self) -> f32 {
		self.a as f32 / 255.0
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::white()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.a == 255 {
			write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
		} else {
			write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
		}
	}
}

/// Parses `#RGB`, `#RRGGBB` and `#RRGGBBAA` (case-insensitive), plus `white` and `black`.
impl FromStr for Color {
	type Err = QuoteError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let s = s.trim();
		match s.to_ascii_lowercase().as_str() {
			"white" => return Ok(Self::white()),
			"black" => return Ok(Self::black()),
			_ => {}
		}

		let hex = s.strip_prefix('#').ok_or_else(|| QuoteError::InvalidColor(format!("{s:?} must start with '#'")))?;
		if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
			return Err(QuoteError::InvalidColor(format!("{s:?} contains non-hex digits")));
		}

		let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| QuoteError::InvalidColor(s.to_string()));
		match hex.len() {
			// #RGB, each digit doubled: 0xA -> 0xAA
			3 => Ok(Self::rgb(channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17)),
			6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
			8 => Ok(Self::rgba(channel(0..2)?, channel(2..4)?, channel(4..6)?, channel(6..8)?)),
			n => Err(QuoteError::InvalidColor(format!("{s:?} must be #RGB, #RRGGBB or #RRGGBBAA, got {n} digits"))),
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("#FFFFFF", Color::white())]
	#[case("#ffffff", Color::white())]
	#[case("#000", Color::black())]
	#[case("#F00", Color::rgb(255, 0, 0))]
	#[case("#ABC", Color::rgb(170, 187, 204))]
	#[case("#1e90ff", Color::rgb(30, 144, 255))]
	#[case("#11223380", Color::rgba(0x11, 0x22, 0x33, 0x80))]
	#[case("white", Color::white())]
	#[case("  Black ", Color::black())]
	fn parses(#[case] input: &str, #[case] expected: Color) {
		assert_eq!(input.parse::<Color>().unwrap(), expected);
	}

	#[rstest]
	#[case("FFFFFF")]
	#[case("#FF00")]
	#[case("#FF000000F")]
	#[case("#GGGGGG")]
	#[case("#ééé")]
	#[case("rebeccapurple")]
	fn rejects(#[case] input: &str) {
		assert!(matches!(input.parse::<Color>(), Err(QuoteError::InvalidColor(_))));
	}

	#[test]
	fn display_roundtrips_through_parse() {
		for c in [Color::white(), Color::rgb(1, 2, 3), Color::rgba(9, 8, 7, 6)] {
			assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
		}
		assert_eq!(Color::rgb(30, 144, 255).to_hex_rgb(), "#1e90ff");
	}
}
