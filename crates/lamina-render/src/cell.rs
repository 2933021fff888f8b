#![forbid(unsafe_code)]

//! Cell types.
//!
//! A cell holds one grapheme and the pen it was written with. The pen keeps
//! the resolved foreground and background next to the [`PairId`] they were
//! allocated under, so a pair slot recycled by the cache never changes the
//! colors of cells already drawn.
//!
//! # Layout (12 bytes)
//!
//! ```text
//! Cell {
//!     content: CellContent,  // 4 bytes - char, GraphemeId, EMPTY, or CONTINUATION
//!     pen: Pen,              // 8 bytes - pair id + fg + bg + attributes
//! }
//! ```

use std::fmt;

use lamina_style::{Attrs, Color, PairId};

use crate::char_width;

/// Reference to a multi-codepoint cluster in the
/// [`GraphemePool`](crate::grapheme_pool::GraphemePool).
///
/// ```text
/// [30-24: width (7 bits)][23-0: slot index (24 bits)]
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct GraphemeId(u32);

impl GraphemeId {
    /// Maximum slot index (24 bits).
    pub const MAX_SLOT: u32 = 0x00FF_FFFF;

    /// Maximum display width (7 bits).
    pub const MAX_WIDTH: u8 = 127;

    /// # Panics
    ///
    /// Panics in debug builds if `slot > MAX_SLOT` or `width > MAX_WIDTH`.
    #[inline]
    pub const fn new(slot: u32, width: u8) -> Self {
        debug_assert!(slot <= Self::MAX_SLOT, "grapheme slot overflow");
        debug_assert!(width <= Self::MAX_WIDTH, "grapheme width overflow");
        Self((slot & Self::MAX_SLOT) | (((width & Self::MAX_WIDTH) as u32) << 24))
    }

    #[inline]
    pub const fn slot(self) -> usize {
        (self.0 & Self::MAX_SLOT) as usize
    }

    #[inline]
    pub const fn width(self) -> usize {
        ((self.0 >> 24) & 0x7F) as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw & 0x7FFF_FFFF)
    }
}

impl fmt::Debug for GraphemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphemeId")
            .field("slot", &self.slot())
            .field("width", &self.width())
            .finish()
    }
}

/// Character content of a cell.
///
/// ```text
/// Bit 31: 0 = inline char (or a marker), 1 = GraphemeId
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CellContent(u32);

impl CellContent {
    /// Empty cell content (presented as a space).
    pub const EMPTY: Self = Self(0);

    /// Continuation marker for the trailing cells of a wide character.
    ///
    /// `0x7FFF_FFFF` is outside the Unicode scalar range.
    pub const CONTINUATION: Self = Self(0x7FFF_FFFF);

    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self(c as u32)
    }

    #[inline]
    pub const fn from_grapheme(id: GraphemeId) -> Self {
        Self(0x8000_0000 | id.raw())
    }

    #[inline]
    pub const fn is_grapheme(self) -> bool {
        self.0 & 0x8000_0000 != 0
    }

    #[inline]
    pub const fn grapheme_id(self) -> Option<GraphemeId> {
        if self.is_grapheme() {
            Some(GraphemeId::from_raw(self.0))
        } else {
            None
        }
    }

    #[inline]
    pub const fn is_continuation(self) -> bool {
        self.0 == Self::CONTINUATION.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == Self::EMPTY.0
    }

    /// The character, or `None` for empty, continuation, and pooled cells.
    #[inline]
    pub fn as_char(self) -> Option<char> {
        if self.is_empty() || self.is_continuation() || self.is_grapheme() {
            None
        } else {
            char::from_u32(self.0)
        }
    }

    /// Display width in cells. Empty and continuation cells report 0.
    #[inline]
    pub fn width(self) -> usize {
        match self.grapheme_id() {
            Some(id) => id.width(),
            None => self.as_char().map_or(0, char_width),
        }
    }

    /// Raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Default for CellContent {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for CellContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "CellContent::EMPTY")
        } else if self.is_continuation() {
            write!(f, "CellContent::CONTINUATION")
        } else if let Some(id) = self.grapheme_id() {
            write!(f, "CellContent::Grapheme({id:?})")
        } else if let Some(c) = self.as_char() {
            write!(f, "CellContent::Char({c:?})")
        } else {
            write!(f, "CellContent(0x{:08x})", self.0)
        }
    }
}

/// Drawing pen: the colors and attributes applied to written cells.
///
/// `pair` records the cache slot the colors were resolved under. The
/// presenter reads `fg` and `bg` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pen {
    pub pair: PairId,
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attrs,
}

impl Pen {
    /// Default colors, no attributes.
    pub const DEFAULT: Self = Self {
        pair: PairId::DEFAULT,
        fg: Color::Default,
        bg: Color::Default,
        attrs: Attrs::NORMAL,
    };

    #[must_use]
    pub const fn new(fg: Color, bg: Color, attrs: Attrs) -> Self {
        Self {
            pair: PairId::DEFAULT,
            fg,
            bg,
            attrs,
        }
    }

    #[must_use]
    pub const fn with_pair(mut self, pair: PairId) -> Self {
        self.pair = pair;
        self
    }
}

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub content: CellContent,
    pub pen: Pen,
}

impl Cell {
    /// Empty cell with the default pen.
    pub const BLANK: Self = Self {
        content: CellContent::EMPTY,
        pen: Pen::DEFAULT,
    };

    #[inline]
    pub const fn new(content: CellContent, pen: Pen) -> Self {
        Self { content, pen }
    }

    /// Cell with the given character and default pen.
    #[inline]
    pub const fn from_char(c: char) -> Self {
        Self::new(CellContent::from_char(c), Pen::DEFAULT)
    }

    #[inline]
    pub const fn continuation(pen: Pen) -> Self {
        Self::new(CellContent::CONTINUATION, pen)
    }

    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.content.is_continuation()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Cursor advance when presenting this cell (at least 1 for non-continuation cells).
    #[inline]
    pub fn width_hint(&self) -> usize {
        if self.is_continuation() {
            0
        } else {
            self.content.width().max(1)
        }
    }

    /// Bitwise equality of content and pen.
    #[inline]
    pub fn bits_eq(&self, other: &Self) -> bool {
        (self.content.raw() == other.content.raw()) & (self.pen == other.pen)
    }
}
