#![forbid(unsafe_code)]

//! Nested clip rectangles.
//!
//! Slot 0 holds the base clip established by [`ScissorStack::reset`]. Every
//! pushed rectangle is intersected with the current top, so the visible area
//! never grows as depth increases. Each operation returns the resulting clip
//! so callers can store it on their draw context explicitly.
//!
//! A push at capacity is ignored and the clip stays at the current top. The
//! ignored pushes are counted so the matching pops are ignored too; nesting
//! past capacity therefore still unwinds to the right level.

use lamina_core::geometry::CellRect;

/// Maximum stack depth, including the base slot.
pub const SCISSOR_STACK_MAX: usize = 16;

/// Bounded stack of clip rectangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScissorStack {
    stack: [CellRect; SCISSOR_STACK_MAX],
    top: usize,
    overflow: usize,
}

impl Default for ScissorStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScissorStack {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stack: [CellRect::new(0, 0, 0, 0); SCISSOR_STACK_MAX],
            top: 0,
            overflow: 0,
        }
    }

    /// Discard all pushed levels and install `base` as slot 0.
    pub fn reset(&mut self, base: CellRect) -> CellRect {
        self.stack[0] = base;
        self.top = 0;
        self.overflow = 0;
        base
    }

    /// Push `rect` intersected with the current top; returns the new clip.
    pub fn push(&mut self, rect: CellRect) -> CellRect {
        if self.top >= SCISSOR_STACK_MAX - 1 {
            self.overflow += 1;
            lamina_core::trace!(depth = self.top, "scissor push ignored at capacity");
            return self.stack[self.top];
        }
        let clipped = rect.intersection(&self.stack[self.top]);
        self.top += 1;
        self.stack[self.top] = clipped;
        clipped
    }

    /// Pop one level; returns the restored clip. Popping the base is a no-op.
    pub fn pop(&mut self) -> CellRect {
        if self.overflow > 0 {
            self.overflow -= 1;
        } else if self.top > 0 {
            self.top -= 1;
        }
        self.stack[self.top]
    }

    /// The clip at the top of the stack.
    #[inline]
    #[must_use]
    pub fn current(&self) -> CellRect {
        self.stack[self.top]
    }

    /// Number of levels above the base (0 right after reset).
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.top
    }

    /// Whether the stack is back at its base level.
    #[inline]
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.top == 0 && self.overflow == 0
    }
}
