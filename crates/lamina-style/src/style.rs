//! Text attributes and the style value type.

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// Text attributes applied alongside a color pair.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attrs: u8 {
        const BOLD = 0b0000_0001;
        const DIM = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
        const REVERSE = 0b0000_1000;
        const ITALIC = 0b0001_0000;
    }
}

impl Attrs {
    /// No attributes.
    pub const NORMAL: Self = Self::empty();
}

/// Foreground, background, and attributes for a run of text.
///
/// Plain value: copy it freely, no lifetime is tied to any surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Style {
    /// Terminal default colors, no attributes.
    pub const DEFAULT: Self = Self {
        fg: Color::Default,
        bg: Color::Default,
        attrs: Attrs::NORMAL,
    };

    #[must_use]
    pub const fn new(fg: Color, bg: Color, attrs: Attrs) -> Self {
        Self { fg, bg, attrs }
    }

    #[must_use]
    pub const fn fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    #[must_use]
    pub const fn bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    #[must_use]
    pub fn attrs(mut self, attrs: Attrs) -> Self {
        self.attrs |= attrs;
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.attrs(Attrs::BOLD)
    }

    #[must_use]
    pub fn dim(self) -> Self {
        self.attrs(Attrs::DIM)
    }

    #[must_use]
    pub fn underline(self) -> Self {
        self.attrs(Attrs::UNDERLINE)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        self.attrs(Attrs::REVERSE)
    }

    #[must_use]
    pub fn italic(self) -> Self {
        self.attrs(Attrs::ITALIC)
    }

    /// Whether both colors are the terminal default.
    ///
    /// Such styles never allocate a color pair.
    #[must_use]
    pub const fn uses_default_colors(&self) -> bool {
        self.fg.is_default() && self.bg.is_default()
    }
}
