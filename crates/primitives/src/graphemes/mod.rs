use unicode_segmentation::UnicodeSegmentation;

/// Returns whether `char_idx` is at a grapheme cluster boundary of `text`.
///
/// Boundaries occur at the start/end of text and between grapheme clusters.
pub fn is_grapheme_boundary(text: &str, char_idx: usize) -> bool {
	let len = text.chars().count();
	if char_idx == 0 || char_idx >= len {
		return true;
	}
	let mut chars = 0;
	for grapheme in text.graphemes(true) {
		if chars == char_idx {
			return true;
		}
		if chars > char_idx {
			return false;
		}
		chars += grapheme.chars().count();
	}
	chars == char_idx
}

/// Returns the char index of the next grapheme cluster boundary after `char_idx`.
///
/// If `char_idx` is at or past the end, returns the text's char length.
pub fn next_grapheme_boundary(text: &str, char_idx: usize) -> usize {
	let mut chars = 0;
	for grapheme in text.graphemes(true) {
		chars += grapheme.chars().count();
		if chars > char_idx {
			return chars;
		}
	}
	chars
}

/// Returns the char index of the previous grapheme cluster boundary before `char_idx`.
///
/// If `char_idx` is 0, returns 0.
pub fn prev_grapheme_boundary(text: &str, char_idx: usize) -> usize {
	let mut prev = 0;
	let mut chars = 0;
	for grapheme in text.graphemes(true) {
		if chars >= char_idx {
			break;
		}
		prev = chars;
		chars += grapheme.chars().count();
	}
	prev
}
