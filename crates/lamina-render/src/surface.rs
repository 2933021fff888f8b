#![forbid(unsafe_code)]

//! Off-screen cell surfaces.
//!
//! A `Surface` is a row-major grid of cells plus a current pen. Writes never
//! panic: anything outside the grid is silently ignored. Clipping to a
//! scissor rectangle is the drawing context's job; the surface only enforces
//! its own bounds.
//!
//! # Wide characters
//!
//! A character of width 2 occupies its head cell and one continuation cell.
//! Writes are atomic: if the whole glyph does not fit, nothing is written.
//! Overwriting either half of an existing wide character blanks the other
//! half so no orphaned continuation remains.
//!
//! # Allocation
//!
//! [`Surface::try_new`] and [`Surface::try_resize`] report a failed cell
//! allocation instead of aborting; layer management uses them for sizes that
//! come from callers.
//!
//! # Dirty tracking
//!
//! Any successful write marks the surface dirty. The frame pipeline erases
//! dirty surfaces at the start of the next frame and clears the flag.

use std::collections::TryReserveError;

use lamina_core::geometry::CellRect;
use lamina_style::{PairCache, Style};

use crate::cell::{Cell, CellContent, Pen};
use crate::grapheme_pool::GraphemePool;

/// Allocate `len` blank cells, reporting failure instead of aborting.
fn try_blank_cells(len: usize) -> Result<Vec<Cell>, TryReserveError> {
    let mut cells = Vec::new();
    cells.try_reserve_exact(len)?;
    cells.resize(len, Cell::BLANK);
    Ok(cells)
}

/// A grid of cells with a current pen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    pen: Pen,
    dirty: bool,
}

impl Surface {
    /// Create a blank surface.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "surface dimensions must be > 0");
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width as usize * height as usize],
            pen: Pen::DEFAULT,
            dirty: false,
        }
    }

    /// Create a blank surface, returning an error if the cells cannot be
    /// allocated.
    ///
    /// # Panics
    ///
    /// Panics if width or height is 0.
    pub fn try_new(width: u16, height: u16) -> Result<Self, TryReserveError> {
        assert!(width > 0 && height > 0, "surface dimensions must be > 0");
        Ok(Self {
            width,
            height,
            cells: try_blank_cells(width as usize * height as usize)?,
            pen: Pen::DEFAULT,
            dirty: false,
        })
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The full surface as a rectangle at the origin.
    #[inline]
    pub const fn bounds(&self) -> CellRect {
        CellRect::from_size(self.width as i32, self.height as i32)
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    /// Cell at an in-bounds position.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    #[inline]
    pub fn get_unchecked(&self, x: u16, y: u16) -> &Cell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// One row of cells, or `None` outside the grid.
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// All cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub const fn pen(&self) -> Pen {
        self.pen
    }

    #[inline]
    pub fn set_pen(&mut self, pen: Pen) {
        self.pen = pen;
    }

    /// Resolve a style's colors to a pair and make it the current pen.
    ///
    /// Default/default styles use the reserved default pair without touching
    /// the cache. Colors, pair, and attributes change together.
    pub fn apply_style(&mut self, style: Style, pairs: &mut PairCache) {
        let pair = pairs.resolve(style.fg, style.bg);
        self.pen = Pen::new(style.fg, style.bg, style.attrs).with_pair(pair);
    }

    /// Clean up wide-character fragments before writing at `(x, y)`.
    ///
    /// Overwriting a wide head blanks its continuation cells; overwriting a
    /// continuation (with anything but another continuation) blanks the head
    /// that owned it and the rest of its tail.
    fn cleanup_overlap(&mut self, x: i32, y: i32, writing_continuation: bool) {
        let Some(idx) = self.index(x, y) else { return };
        let current = self.cells[idx];

        if current.content.width() > 1 {
            let width = current.content.width() as i32;
            for i in 1..width {
                if let Some(tail) = self.index(x + i, y)
                    && self.cells[tail].is_continuation()
                {
                    self.cells[tail] = Cell::BLANK;
                }
            }
        } else if current.is_continuation() && !writing_continuation {
            let mut back_x = x;
            while back_x > 0 {
                back_x -= 1;
                let Some(h_idx) = self.index(back_x, y) else { break };
                let head = self.cells[h_idx];
                if head.is_continuation() {
                    continue;
                }
                let width = head.content.width() as i32;
                if back_x + width > x {
                    self.cells[h_idx] = Cell::BLANK;
                    for i in 1..width {
                        if let Some(tail) = self.index(back_x + i, y)
                            && self.cells[tail].is_continuation()
                        {
                            self.cells[tail] = Cell::BLANK;
                        }
                    }
                }
                break;
            }
        }
    }

    /// Write one character with the current pen.
    ///
    /// Returns the number of columns written: 0 for zero-width characters or
    /// a glyph that does not fit entirely inside the grid.
    pub fn put(&mut self, x: i32, y: i32, ch: char) -> usize {
        self.put_content(x, y, CellContent::from_char(ch))
    }

    /// Write a character or pooled cluster with the current pen.
    ///
    /// Same rules as [`Surface::put`]; the width comes from the content.
    pub fn put_content(&mut self, x: i32, y: i32, content: CellContent) -> usize {
        let width = content.width();
        if width == 0 {
            return 0;
        }
        let last = x.saturating_add(width as i32 - 1);
        if self.index(x, y).is_none() || self.index(last, y).is_none() {
            return 0;
        }

        self.cleanup_overlap(x, y, false);
        for i in 1..width as i32 {
            self.cleanup_overlap(x + i, y, true);
        }

        let pen = self.pen;
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::new(content, pen);
        }
        for i in 1..width as i32 {
            if let Some(idx) = self.index(x + i, y) {
                self.cells[idx] = Cell::continuation(pen);
            }
        }
        self.dirty = true;
        width
    }

    /// Copy a cell verbatim, keeping wide-character bookkeeping consistent.
    ///
    /// Used by compositing; marks the surface dirty.
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        let Some(idx) = self.index(x, y) else { return };
        self.cleanup_overlap(x, y, cell.is_continuation());
        self.cells[idx] = cell;
        self.dirty = true;
    }

    /// Blank every cell and reset the pen. The dirty flag is left untouched.
    pub fn erase(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.pen = Pen::DEFAULT;
    }

    /// Resize the grid, keeping the overlapping top-left content.
    ///
    /// Wide characters cut by the new right edge are blanked. Marks the
    /// surface dirty. Zero dimensions are ignored, and a failed allocation
    /// leaves the surface unchanged.
    pub fn resize(&mut self, width: u16, height: u16) {
        if let Err(_err) = self.try_resize(width, height) {
            lamina_core::warn!(width, height, error = %_err, "surface resize failed");
        }
    }

    /// Like [`Surface::resize`], returning an error if the new cells cannot
    /// be allocated. The surface is untouched on error.
    pub fn try_resize(&mut self, width: u16, height: u16) -> Result<(), TryReserveError> {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return Ok(());
        }
        let mut cells = try_blank_cells(width as usize * height as usize)?;
        let copy_w = self.width.min(width) as usize;
        let copy_h = self.height.min(height) as usize;
        for y in 0..copy_h {
            let src = y * self.width as usize;
            let dst = y * width as usize;
            cells[dst..dst + copy_w].copy_from_slice(&self.cells[src..src + copy_w]);
            if copy_w < self.width as usize {
                let mut x = copy_w;
                // Walk back over the continuation run at the cut to its head.
                while x > 0 && cells[dst + x - 1].is_continuation() {
                    x -= 1;
                }
                if x > 0 {
                    let head = cells[dst + x - 1];
                    if x - 1 + head.content.width() > copy_w {
                        cells[dst + x - 1..dst + copy_w].fill(Cell::BLANK);
                    }
                }
            }
        }
        self.width = width;
        self.height = height;
        self.cells = cells;
        self.dirty = true;
        Ok(())
    }

    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Render one row as a string (empty cells as spaces, continuations
    /// skipped). Pooled clusters render as U+FFFD; use [`Surface::row_text`]
    /// to resolve them. Returns an empty string outside the grid.
    pub fn row_string(&self, y: u16) -> String {
        self.row_text(y, &GraphemePool::new())
    }

    /// Like [`Surface::row_string`], resolving pooled clusters in `graphemes`.
    pub fn row_text(&self, y: u16, graphemes: &GraphemePool) -> String {
        let Some(row) = self.row(y) else {
            return String::new();
        };
        let mut out = String::with_capacity(row.len());
        for cell in row.iter().filter(|cell| !cell.is_continuation()) {
            match cell.content.grapheme_id() {
                Some(id) => out.push_str(graphemes.get(id).unwrap_or("\u{FFFD}")),
                None => out.push(cell.content.as_char().unwrap_or(' ')),
            }
        }
        out
    }
}
