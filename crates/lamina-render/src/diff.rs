#![forbid(unsafe_code)]

//! Diff computation between surfaces.
//!
//! `BufferDiff` records the cells that differ between the previously
//! presented screen and the newly composited one, scanning row-major so
//! memory access stays sequential. Changes come out sorted by `(y, x)` and
//! are coalesced into [`ChangeRun`]s for the presenter.

use crate::surface::Surface;

/// A contiguous run of changed cells on a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeRun {
    /// Row index.
    pub y: u16,
    /// Start column (inclusive).
    pub x0: u16,
    /// End column (inclusive).
    pub x1: u16,
}

impl ChangeRun {
    #[inline]
    pub const fn new(y: u16, x0: u16, x1: u16) -> Self {
        debug_assert!(x0 <= x1);
        Self { y, x0, x1 }
    }

    /// Number of cells in this run.
    #[inline]
    pub const fn len(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.x1 < self.x0
    }
}

/// The set of changed positions between two surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferDiff {
    changes: Vec<(u16, u16)>,
}

impl BufferDiff {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare two equally sized surfaces.
    ///
    /// Surfaces of different sizes produce a full diff of `new`.
    pub fn compute(old: &Surface, new: &Surface) -> Self {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("diff_compute", width = new.width(), height = new.height());
        #[cfg(feature = "tracing")]
        let _guard = _span.enter();

        if old.width() != new.width() || old.height() != new.height() {
            return Self::full(new.width(), new.height());
        }

        let width = new.width();
        let height = new.height();
        let mut changes = Vec::with_capacity((width as usize * height as usize) / 20);

        for y in 0..height {
            for x in 0..width {
                if !old.get_unchecked(x, y).bits_eq(new.get_unchecked(x, y)) {
                    changes.push((x, y));
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(changes = changes.len(), "diff computed");

        Self { changes }
    }

    /// A diff marking every cell of a `width` x `height` grid as changed.
    pub fn full(width: u16, height: u16) -> Self {
        let mut changes = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                changes.push((x, y));
            }
        }
        Self { changes }
    }

    /// Number of changed cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Changed positions as `(x, y)`, sorted by row then column.
    #[inline]
    pub fn changes(&self) -> &[(u16, u16)] {
        &self.changes
    }

    /// Coalesce consecutive columns on the same row into runs.
    pub fn runs(&self) -> Vec<ChangeRun> {
        let mut runs = Vec::new();
        let mut iter = self.changes.iter().copied().peekable();
        while let Some((x0, y)) = iter.next() {
            let mut x1 = x0;
            while let Some(&(x, yy)) = iter.peek() {
                if yy != y || x != x1 + 1 {
                    break;
                }
                x1 = x;
                iter.next();
            }
            runs.push(ChangeRun::new(y, x0, x1));
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(run_count = runs.len(), "runs coalesced");

        runs
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }
}
