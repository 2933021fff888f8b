#![forbid(unsafe_code)]

//! Render kernel: cells, surfaces, clipped drawing, diffs, and ANSI
//! presentation.
//!
//! A [`surface::Surface`] is a grid of [`cell::Cell`]s owned by one layer.
//! Drawing goes through a [`context::DrawContext`], which carries the
//! layer-local clip rectangle; every primitive in [`drawing`] intersects its
//! output with that clip before touching the surface. The runtime composites
//! surfaces into a screen surface, computes a [`diff::BufferDiff`] against the
//! previous screen, and hands it to the [`presenter::Presenter`].
//!
//! Text is laid out by grapheme cluster. Single-codepoint clusters are stored
//! inline in the cell; longer ones are interned in a
//! [`grapheme_pool::GraphemePool`] shared through the [`DrawState`].

pub mod ansi;
pub mod cell;
pub mod context;
pub mod diff;
pub mod drawing;
pub mod grapheme_pool;
pub mod presenter;
pub mod scissor;
pub mod surface;

pub use cell::{Cell, CellContent, GraphemeId, Pen};
pub use context::{DrawContext, DrawState};
pub use diff::{BufferDiff, ChangeRun};
pub use drawing::{BorderGlyphs, BorderSides, BorderStyle, Draw};
pub use grapheme_pool::GraphemePool;
pub use presenter::Presenter;
pub use scissor::{SCISSOR_STACK_MAX, ScissorStack};
pub use surface::Surface;

/// Display width of a single character in cells (0, 1, or 2).
///
/// Control characters and combining marks are zero width; drawing code skips
/// them instead of writing an empty cell.
#[inline]
pub fn char_width(ch: char) -> usize {
    if ch.is_ascii() {
        return match ch {
            ' '..='~' => 1,
            _ => 0,
        };
    }
    unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0).min(2)
}

/// Display width of one grapheme cluster in cells (0, 1, or 2).
///
/// A cluster whose first codepoint is zero width (a control character or a
/// stray combining mark) is zero width as a whole.
pub fn grapheme_width(grapheme: &str) -> usize {
    let Some(first) = grapheme.chars().next() else {
        return 0;
    };
    let base = char_width(first);
    if base == 0 || grapheme.len() == first.len_utf8() {
        return base;
    }
    unicode_width::UnicodeWidthStr::width(grapheme).clamp(base, 2)
}

#[cfg(test)]
mod tests {
    use super::{char_width, grapheme_width};

    #[test]
    fn ascii_widths() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width(' '), 1);
        assert_eq!(char_width('\n'), 0);
        assert_eq!(char_width('\x1b'), 0);
    }

    #[test]
    fn wide_and_combining() {
        assert_eq!(char_width('中'), 2);
        assert_eq!(char_width('\u{0301}'), 0);
        assert_eq!(char_width('─'), 1);
    }

    #[test]
    fn cluster_widths() {
        assert_eq!(grapheme_width(""), 0);
        assert_eq!(grapheme_width("a"), 1);
        assert_eq!(grapheme_width("e\u{0301}"), 1);
        assert_eq!(grapheme_width("中"), 2);
        assert_eq!(grapheme_width("\u{0301}"), 0);
        assert_eq!(grapheme_width("\r\n"), 0);
        assert_eq!(grapheme_width("👍🏽"), 2);
    }
}
