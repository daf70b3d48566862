//! Greedy, character-count based line wrapping.
//!
//! Widths are measured in chars, not pixels, so a proportional font renders lines of uneven
//! visual width. No language-aware segmentation is attempted.

pub const DEFAULT_MAX_CHARS: usize = 48;

/// Split `text` on whitespace and pack words greedily into lines of at most `max_chars` chars.
///
/// A word longer than `max_chars` is never split; it gets a line to itself.
/// Whitespace-only input yields no lines.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
	let mut lines = Vec::new();
	let mut current = String::new();
	let mut current_len = 0;

	for word in text.split_whitespace() {
		let word_len = word.chars().count();
		if current_len == 0 {
			current.push_str(word);
			current_len = word_len;
			continue;
		}

		if current_len + 1 + word_len > max_chars {
			lines.push(std::mem::take(&mut current));
			current.push_str(word);
			current_len = word_len;
		} else {
			current.push(' ');
			current.push_str(word);
			current_len += 1 + word_len;
		}
	}

	if !current.is_empty() {
		lines.push(current);
	}
	lines
}
