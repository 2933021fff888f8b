#![forbid(unsafe_code)]

//! Drawing primitives for draw contexts.
//!
//! Every primitive clips against the context's current clip rectangle, never
//! against the full surface, and applies its style at most once per call (and
//! only when at least one cell is visible). None of them flush.

use bitflags::bitflags;
use lamina_core::geometry::CellRect;
use lamina_core::glyph_policy::GlyphPolicy;
use lamina_style::Style;
use unicode_segmentation::UnicodeSegmentation;

use crate::context::DrawContext;
use crate::{char_width, grapheme_width};

/// Characters used to draw a border around a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderGlyphs {
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl BorderGlyphs {
    /// Single-line box drawing (U+250x).
    pub const SINGLE: Self = Self {
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
    };

    /// Rounded corners.
    pub const ROUNDED: Self = Self {
        top_left: '╭',
        top_right: '╮',
        bottom_left: '╰',
        bottom_right: '╯',
        horizontal: '─',
        vertical: '│',
    };

    /// Double-line border.
    pub const DOUBLE: Self = Self {
        top_left: '╔',
        top_right: '╗',
        bottom_left: '╚',
        bottom_right: '╝',
        horizontal: '═',
        vertical: '║',
    };

    /// Heavy (thick) border.
    pub const HEAVY: Self = Self {
        top_left: '┏',
        top_right: '┓',
        bottom_left: '┗',
        bottom_right: '┛',
        horizontal: '━',
        vertical: '┃',
    };

    /// ASCII-only border.
    pub const ASCII: Self = Self {
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        horizontal: '-',
        vertical: '|',
    };
}

/// Border and line style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    #[default]
    Single,
    Double,
    Rounded,
    /// Falls back to [`BorderStyle::Single`] when heavy glyphs are unavailable.
    Heavy,
    /// Draws nothing.
    None,
}

impl BorderStyle {
    /// Resolve the glyph set under `policy`, or `None` for [`BorderStyle::None`].
    #[must_use]
    pub fn glyphs(self, policy: GlyphPolicy) -> Option<BorderGlyphs> {
        if self == Self::None {
            return None;
        }
        if !policy.unicode() {
            return Some(BorderGlyphs::ASCII);
        }
        Some(match self {
            Self::Single | Self::None => BorderGlyphs::SINGLE,
            Self::Double => BorderGlyphs::DOUBLE,
            Self::Rounded => BorderGlyphs::ROUNDED,
            Self::Heavy if policy.heavy_lines => BorderGlyphs::HEAVY,
            Self::Heavy => BorderGlyphs::SINGLE,
        })
    }
}

bitflags! {
    /// Which sides of a rectangle a partial border draws.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BorderSides: u8 {
        const TOP = 0b0001;
        const RIGHT = 0b0010;
        const BOTTOM = 0b0100;
        const LEFT = 0b1000;
        const ALL = Self::TOP.bits() | Self::RIGHT.bits() | Self::BOTTOM.bits() | Self::LEFT.bits();
    }
}

/// Glyph for a corner shared by two sides.
///
/// True corner when both sides are on, the enabled side's line glyph when
/// only one is, nothing when neither is.
fn corner_glyph(
    horizontal_on: bool,
    vertical_on: bool,
    corner: char,
    glyphs: &BorderGlyphs,
) -> Option<char> {
    match (horizontal_on, vertical_on) {
        (true, true) => Some(corner),
        (true, false) => Some(glyphs.horizontal),
        (false, true) => Some(glyphs.vertical),
        (false, false) => None,
    }
}

/// Drawing operations on a clipped context.
pub trait Draw {
    /// Fill every cell of `rect` inside the clip with `ch`.
    fn fill_rect(&mut self, rect: CellRect, ch: char, style: Style);

    /// Outline `rect` on all four sides.
    ///
    /// No-op when the rectangle is narrower or shorter than 2 cells or the
    /// style is [`BorderStyle::None`].
    fn border_rect(&mut self, rect: CellRect, border: BorderStyle, style: Style);

    /// Outline the selected sides of `rect`.
    fn border(&mut self, rect: CellRect, sides: BorderSides, border: BorderStyle, style: Style);

    /// Horizontal run of the style's line glyph starting at `(x, y)`.
    fn hline(&mut self, x: i32, y: i32, len: i32, border: BorderStyle, style: Style);

    /// Vertical run of the style's line glyph starting at `(x, y)`.
    fn vline(&mut self, x: i32, y: i32, len: i32, border: BorderStyle, style: Style);

    /// Draw `text` starting at column `x` of row `y`.
    ///
    /// Text is laid out by grapheme cluster, so combining marks stay with
    /// their base character. Clusters that straddle either clip edge are
    /// dropped whole; zero-width clusters are skipped.
    fn text(&mut self, x: i32, y: i32, text: &str, style: Style);

    /// Like [`Draw::text`] for raw bytes. Malformed UTF-8 draws nothing.
    fn text_bytes(&mut self, x: i32, y: i32, bytes: &[u8], style: Style);

    /// Like [`Draw::text`] but never drawing past `max_cols` columns from `x`.
    ///
    /// The context's clip is unchanged when this returns.
    fn text_bounded(&mut self, x: i32, y: i32, text: &str, max_cols: i32, style: Style);
}

impl Draw for DrawContext<'_> {
    fn fill_rect(&mut self, rect: CellRect, ch: char, style: Style) {
        let visible = rect.intersection(&self.clip);
        let width = char_width(ch);
        if visible.is_empty() || width == 0 || width as i32 > visible.width {
            return;
        }
        self.apply_style(style);
        for y in visible.top()..visible.bottom() {
            let mut x = visible.left();
            while x + width as i32 <= visible.right() {
                self.put_clipped(x, y, ch, width);
                x += width as i32;
            }
        }
    }

    fn border_rect(&mut self, rect: CellRect, border: BorderStyle, style: Style) {
        self.border(rect, BorderSides::ALL, border, style);
    }

    fn border(&mut self, rect: CellRect, sides: BorderSides, border: BorderStyle, style: Style) {
        if rect.width < 2 || rect.height < 2 || sides.is_empty() {
            return;
        }
        let Some(glyphs) = border.glyphs(self.glyphs()) else {
            return;
        };
        if rect.intersection(&self.clip).is_empty() {
            return;
        }
        self.apply_style(style);

        let x1 = rect.left();
        let y1 = rect.top();
        let x2 = rect.right() - 1;
        let y2 = rect.bottom() - 1;
        let top = sides.contains(BorderSides::TOP);
        let right = sides.contains(BorderSides::RIGHT);
        let bottom = sides.contains(BorderSides::BOTTOM);
        let left = sides.contains(BorderSides::LEFT);

        let corners = [
            (x1, y1, corner_glyph(top, left, glyphs.top_left, &glyphs)),
            (x2, y1, corner_glyph(top, right, glyphs.top_right, &glyphs)),
            (x1, y2, corner_glyph(bottom, left, glyphs.bottom_left, &glyphs)),
            (x2, y2, corner_glyph(bottom, right, glyphs.bottom_right, &glyphs)),
        ];
        for (x, y, glyph) in corners {
            if let Some(ch) = glyph {
                self.put_clipped(x, y, ch, 1);
            }
        }

        // Edges exclude the corner cells, so each cell is tested on its own.
        for col in x1 + 1..x2 {
            if top {
                self.put_clipped(col, y1, glyphs.horizontal, 1);
            }
            if bottom {
                self.put_clipped(col, y2, glyphs.horizontal, 1);
            }
        }
        for row in y1 + 1..y2 {
            if left {
                self.put_clipped(x1, row, glyphs.vertical, 1);
            }
            if right {
                self.put_clipped(x2, row, glyphs.vertical, 1);
            }
        }
    }

    fn hline(&mut self, x: i32, y: i32, len: i32, border: BorderStyle, style: Style) {
        if len <= 0 || y < self.clip.top() || y >= self.clip.bottom() {
            return;
        }
        let Some(glyphs) = border.glyphs(self.glyphs()) else {
            return;
        };
        let start = x.max(self.clip.left());
        let end = x.saturating_add(len).min(self.clip.right());
        if start >= end {
            return;
        }
        self.apply_style(style);
        for col in start..end {
            self.put_clipped(col, y, glyphs.horizontal, 1);
        }
    }

    fn vline(&mut self, x: i32, y: i32, len: i32, border: BorderStyle, style: Style) {
        if len <= 0 || x < self.clip.left() || x >= self.clip.right() {
            return;
        }
        let Some(glyphs) = border.glyphs(self.glyphs()) else {
            return;
        };
        let start = y.max(self.clip.top());
        let end = y.saturating_add(len).min(self.clip.bottom());
        if start >= end {
            return;
        }
        self.apply_style(style);
        for row in start..end {
            self.put_clipped(x, row, glyphs.vertical, 1);
        }
    }

    fn text(&mut self, x: i32, y: i32, text: &str, style: Style) {
        let clip = self.clip;
        if y < clip.top() || y >= clip.bottom() || clip.is_empty() {
            return;
        }
        let mut col = x;
        let mut styled = false;
        for grapheme in text.graphemes(true) {
            let width = grapheme_width(grapheme) as i32;
            if width == 0 {
                continue;
            }
            let start = col;
            col = col.saturating_add(width);
            if start < clip.left() {
                // Entirely left of the clip, or straddling its left edge.
                continue;
            }
            if col > clip.right() {
                break;
            }
            if !styled {
                self.apply_style(style);
                styled = true;
            }
            let content = self.cluster_content(grapheme, width as usize);
            self.put_content_clipped(start, y, content);
        }
    }

    fn text_bytes(&mut self, x: i32, y: i32, bytes: &[u8], style: Style) {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.text(x, y, text, style),
            Err(_err) => {
                lamina_core::debug!(error = %_err, x, y, "text skipped: invalid UTF-8");
            }
        }
    }

    fn text_bounded(&mut self, x: i32, y: i32, text: &str, max_cols: i32, style: Style) {
        if max_cols <= 0 {
            return;
        }
        let narrowed = self.clip.intersection(&CellRect::new(x, y, max_cols, 1));
        self.with_clip(narrowed, |ctx| ctx.text(x, y, text, style));
    }
}
