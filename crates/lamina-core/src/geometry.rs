#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Cell rectangles use signed coordinates: drawing code routinely passes
//! rectangles that start left of or above a surface, and the clip machinery
//! resolves them by intersection rather than by saturating arithmetic.

/// A rectangle in character cells.
///
/// A rectangle with `width <= 0` or `height <= 0` is empty. Empty rectangles
/// are the canonical "no overlap" result of [`CellRect::intersection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellRect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in cells.
    pub width: i32,
    /// Height in cells.
    pub height: i32,
}

impl CellRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: i32, height: i32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Left edge (inclusive). Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (inclusive). Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Area in cells (zero for empty rectangles).
    #[inline]
    pub const fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside the rectangle.
    ///
    /// Half-open on both axes: `x` in `[left, right)` and `y` in `[top, bottom)`.
    #[inline]
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Check whether `other` lies entirely inside this rectangle.
    ///
    /// Empty rectangles are contained by everything.
    #[inline]
    pub const fn contains_rect(&self, other: &CellRect) -> bool {
        other.is_empty()
            || (other.x >= self.x
                && other.y >= self.y
                && other.right() <= self.right()
                && other.bottom() <= self.bottom())
    }

    /// Compute the intersection with another rectangle.
    ///
    /// When the rectangles do not overlap the result is `{x1, y1, 0, 0}` where
    /// `(x1, y1)` is the larger of the two origins. The position is kept so the
    /// result is deterministic; only its emptiness is meaningful.
    #[inline]
    pub fn intersection(&self, other: &CellRect) -> CellRect {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 < x1 || y2 < y1 {
            CellRect::new(x1, y1, 0, 0)
        } else {
            CellRect::new(x1, y1, x2 - x1, y2 - y1)
        }
    }

    /// Compute the intersection, returning `None` if it has no area.
    #[inline]
    pub fn intersection_opt(&self, other: &CellRect) -> Option<CellRect> {
        let clipped = self.intersection(other);
        (!clipped.is_empty()).then_some(clipped)
    }

    /// Translate the rectangle by `(dx, dy)`.
    #[inline]
    pub const fn offset(&self, dx: i32, dy: i32) -> CellRect {
        CellRect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

/// A rectangle with floating-point coordinates.
///
/// Layout engines produce sub-cell positions; [`FloatRect::to_cells`] snaps
/// them onto the cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloatRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FloatRect {
    /// Create a new float rectangle.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to a cell rectangle.
    ///
    /// The origin is floored so it lands in the containing cell and the size
    /// is ceiled so content is never lost to rounding.
    #[inline]
    pub fn to_cells(&self) -> CellRect {
        CellRect::new(
            self.x.floor() as i32,
            self.y.floor() as i32,
            self.width.ceil() as i32,
            self.height.ceil() as i32,
        )
    }
}

impl From<FloatRect> for CellRect {
    fn from(rect: FloatRect) -> Self {
        rect.to_cells()
    }
}
