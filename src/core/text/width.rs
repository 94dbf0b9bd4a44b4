//! Grapheme width and vertical advance helpers.

use emojis::get as emoji_get;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const TAB_WIDTH: usize = 2;

/// Terminal-style cell width of one grapheme: 2 for wide CJK and emoji, 1 for most
/// other printable text, 0 for control and combining-only clusters.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    if grapheme == "\t" {
        return TAB_WIDTH;
    }

    if emoji_get(grapheme).is_some() {
        return 2;
    }

    let mut width = 0;
    for ch in grapheme.chars() {
        if ch == '\t' {
            width += TAB_WIDTH;
            continue;
        }
        width += UnicodeWidthChar::width(ch).unwrap_or(0);
    }
    width
}

pub fn visible_width(input: &str) -> usize {
    input.graphemes(true).map(grapheme_width).sum()
}

/// Advance of one grapheme along a vertical line, in em.
///
/// Wide glyphs stand upright and take a full em; narrow glyphs take half.
pub fn advance_em(grapheme: &str) -> f64 {
    grapheme_width(grapheme) as f64 / 2.0
}

#[cfg(test)]
mod tests {
    use super::{advance_em, grapheme_width, visible_width};

    #[test]
    fn cjk_is_one_em_and_ascii_half() {
        assert_eq!(advance_em("縦"), 1.0);
        assert_eq!(advance_em("a"), 0.5);
        assert_eq!(advance_em("\r"), 0.0);
    }

    #[test]
    fn combining_marks_stay_in_their_cluster() {
        assert_eq!(grapheme_width("e\u{301}"), 1);
        assert_eq!(visible_width("e\u{301}x"), 2);
    }

    #[test]
    fn emoji_counts_as_wide() {
        assert_eq!(grapheme_width("👍"), 2);
    }
}
