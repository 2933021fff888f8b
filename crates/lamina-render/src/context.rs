#![forbid(unsafe_code)]

//! Draw contexts.
//!
//! A [`DrawContext`] borrows one surface and the renderer's shared
//! [`DrawState`] for the duration of a drawing pass. It carries an origin, a
//! size, and the current clip rectangle; every primitive in
//! [`crate::drawing`] clips against that rectangle.
//!
//! The scissor stack lives in `DrawState`, not in the context. A context
//! acquired after an unbalanced push therefore sees the leaked level on its
//! next push until [`DrawContext::reset_scissor`] is called. Call it once per
//! context before pushing.

use lamina_core::geometry::CellRect;
use lamina_core::glyph_policy::GlyphPolicy;
use lamina_style::{PairCache, Style};

use crate::cell::CellContent;
use crate::grapheme_pool::GraphemePool;
use crate::scissor::ScissorStack;
use crate::surface::Surface;

/// Renderer-wide state shared by every draw context.
#[derive(Debug, Default)]
pub struct DrawState {
    /// Color pair allocation.
    pub pairs: PairCache,
    /// The clip stack.
    pub scissor: ScissorStack,
    /// Glyph capabilities for borders and lines.
    pub glyphs: GlyphPolicy,
    /// Multi-codepoint clusters referenced by cells.
    pub graphemes: GraphemePool,
}

impl DrawState {
    #[must_use]
    pub fn new(pair_capacity: usize, glyphs: GlyphPolicy) -> Self {
        Self {
            pairs: PairCache::new(pair_capacity),
            scissor: ScissorStack::new(),
            glyphs,
            graphemes: GraphemePool::new(),
        }
    }
}

/// A surface bound to an origin, a size, and a clip rectangle.
#[derive(Debug)]
pub struct DrawContext<'a> {
    pub(crate) surface: &'a mut Surface,
    pub(crate) state: &'a mut DrawState,
    origin: (i32, i32),
    size: (i32, i32),
    pub(crate) clip: CellRect,
}

impl<'a> DrawContext<'a> {
    /// Bind a drawing area of `surface`.
    ///
    /// Coordinates given to primitives are surface coordinates; the area
    /// only determines the initial and base clip.
    pub fn new(
        surface: &'a mut Surface,
        state: &'a mut DrawState,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Self {
        Self {
            surface,
            state,
            origin: (x, y),
            size: (width, height),
            clip: CellRect::new(x, y, width, height),
        }
    }

    /// Bind the whole surface with a local origin of (0, 0).
    pub fn for_surface(surface: &'a mut Surface, state: &'a mut DrawState) -> Self {
        let (w, h) = (i32::from(surface.width()), i32::from(surface.height()));
        Self::new(surface, state, 0, 0, w, h)
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    #[inline]
    pub fn size(&self) -> (i32, i32) {
        self.size
    }

    /// The drawing area as a rectangle.
    #[inline]
    pub fn area(&self) -> CellRect {
        CellRect::new(self.origin.0, self.origin.1, self.size.0, self.size.1)
    }

    /// The current effective clip.
    #[inline]
    pub fn clip(&self) -> CellRect {
        self.clip
    }

    /// Reset the shared scissor stack to this context's area.
    pub fn reset_scissor(&mut self) -> CellRect {
        self.clip = self.state.scissor.reset(self.area());
        self.clip
    }

    /// Narrow the clip to `rect` intersected with the current stack top.
    pub fn push_scissor(&mut self, rect: CellRect) -> CellRect {
        self.clip = self.state.scissor.push(rect);
        self.clip
    }

    /// Restore the clip from one level down.
    pub fn pop_scissor(&mut self) -> CellRect {
        self.clip = self.state.scissor.pop();
        self.clip
    }

    /// Depth of the shared scissor stack.
    #[inline]
    pub fn scissor_depth(&self) -> usize {
        self.state.scissor.depth()
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &*self.surface
    }

    #[inline]
    pub fn glyphs(&self) -> GlyphPolicy {
        self.state.glyphs
    }

    #[inline]
    pub fn pairs(&self) -> &PairCache {
        &self.state.pairs
    }

    /// Make `style` the surface's current pen.
    pub fn apply_style(&mut self, style: Style) {
        self.surface.apply_style(style, &mut self.state.pairs);
    }

    #[inline]
    pub fn graphemes(&self) -> &GraphemePool {
        &self.state.graphemes
    }

    /// Write a glyph if every column it spans lies inside the clip.
    ///
    /// Returns the glyph's width when written, 0 otherwise.
    pub(crate) fn put_clipped(&mut self, x: i32, y: i32, ch: char, width: usize) -> usize {
        if width == 0 {
            return 0;
        }
        self.put_content_clipped(x, y, CellContent::from_char(ch))
    }

    /// [`DrawContext::put_clipped`] for a character or pooled cluster.
    pub(crate) fn put_content_clipped(&mut self, x: i32, y: i32, content: CellContent) -> usize {
        let width = content.width();
        if width == 0 {
            return 0;
        }
        let last = x.saturating_add(width as i32 - 1);
        if !self.clip.contains(x, y) || !self.clip.contains(last, y) {
            return 0;
        }
        self.surface.put_content(x, y, content)
    }

    /// Cell content for one grapheme cluster of the given width.
    ///
    /// Single codepoints stay inline; longer clusters are interned. A full
    /// pool degrades to the cluster's first codepoint.
    pub(crate) fn cluster_content(&mut self, grapheme: &str, width: usize) -> CellContent {
        let mut chars = grapheme.chars();
        let Some(first) = chars.next() else {
            return CellContent::EMPTY;
        };
        if chars.next().is_none() {
            return CellContent::from_char(first);
        }
        match self.state.graphemes.intern(grapheme, width as u8) {
            Some(id) => CellContent::from_grapheme(id),
            None => {
                lamina_core::debug!(grapheme, "grapheme pool full; drawing base character");
                CellContent::from_char(first)
            }
        }
    }

    /// Temporarily replace the clip, restoring the previous value afterwards.
    ///
    /// The restore runs from a drop guard, so it also happens when `f`
    /// unwinds.
    pub(crate) fn with_clip<R>(&mut self, clip: CellRect, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.clip;
        self.clip = clip;
        let guard = ClipGuard { ctx: self, saved };
        f(&mut *guard.ctx)
    }
}

/// Restores a context's clip when dropped.
struct ClipGuard<'c, 'a> {
    ctx: &'c mut DrawContext<'a>,
    saved: CellRect,
}

impl Drop for ClipGuard<'_, '_> {
    fn drop(&mut self) {
        self.ctx.clip = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_context_clips_to_area() {
        let mut surface = Surface::new(20, 10);
        let mut state = DrawState::default();
        let ctx = DrawContext::new(&mut surface, &mut state, 2, 3, 5, 4);
        assert_eq!(ctx.clip(), CellRect::new(2, 3, 5, 4));
        assert_eq!(ctx.origin(), (2, 3));
        assert_eq!(ctx.size(), (5, 4));
    }

    #[test]
    fn for_surface_covers_everything() {
        let mut surface = Surface::new(8, 2);
        let mut state = DrawState::default();
        let ctx = DrawContext::for_surface(&mut surface, &mut state);
        assert_eq!(ctx.clip(), CellRect::new(0, 0, 8, 2));
    }

    #[test]
    fn push_and_pop_update_context_clip() {
        let mut surface = Surface::new(20, 10);
        let mut state = DrawState::default();
        let mut ctx = DrawContext::for_surface(&mut surface, &mut state);
        ctx.reset_scissor();
        let pushed = ctx.push_scissor(CellRect::new(15, 5, 10, 10));
        assert_eq!(pushed, CellRect::new(15, 5, 5, 5));
        assert_eq!(ctx.clip(), pushed);
        assert_eq!(ctx.scissor_depth(), 1);
        assert_eq!(ctx.pop_scissor(), CellRect::new(0, 0, 20, 10));
    }

    #[test]
    fn unbalanced_push_leaks_into_next_context() {
        let mut surface = Surface::new(20, 10);
        let mut state = DrawState::default();
        {
            let mut ctx = DrawContext::for_surface(&mut surface, &mut state);
            ctx.reset_scissor();
            ctx.push_scissor(CellRect::new(0, 0, 3, 3));
        }
        let mut ctx = DrawContext::for_surface(&mut surface, &mut state);
        // Without a reset the stale level constrains the next push.
        assert_eq!(
            ctx.push_scissor(CellRect::new(0, 0, 20, 10)),
            CellRect::new(0, 0, 3, 3)
        );
        ctx.reset_scissor();
        assert_eq!(
            ctx.push_scissor(CellRect::new(0, 0, 20, 10)),
            CellRect::new(0, 0, 20, 10)
        );
    }

    #[test]
    fn put_clipped_requires_whole_glyph() {
        let mut surface = Surface::new(10, 1);
        let mut state = DrawState::default();
        let mut ctx = DrawContext::new(&mut surface, &mut state, 0, 0, 5, 1);
        assert_eq!(ctx.put_clipped(4, 0, '中', 2), 0);
        assert_eq!(ctx.put_clipped(3, 0, '中', 2), 2);
        assert_eq!(ctx.put_clipped(5, 0, 'a', 1), 0);
    }

    #[test]
    fn with_clip_restores() {
        let mut surface = Surface::new(10, 1);
        let mut state = DrawState::default();
        let mut ctx = DrawContext::for_surface(&mut surface, &mut state);
        let before = ctx.clip();
        let inner = ctx.with_clip(CellRect::new(1, 0, 2, 1), |c| c.clip());
        assert_eq!(inner, CellRect::new(1, 0, 2, 1));
        assert_eq!(ctx.clip(), before);
    }

    #[test]
    fn with_clip_restores_on_panic() {
        let mut surface = Surface::new(10, 1);
        let mut state = DrawState::default();
        let mut ctx = DrawContext::for_surface(&mut surface, &mut state);
        let before = ctx.clip();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ctx.with_clip(CellRect::new(1, 0, 2, 1), |c| assert_eq!(c.clip().width, 0));
        }));
        assert!(result.is_err());
        assert_eq!(ctx.clip(), before);
    }

    #[test]
    fn cluster_content_interns_multi_codepoint_clusters() {
        let mut surface = Surface::new(4, 1);
        let mut state = DrawState::default();
        let mut ctx = DrawContext::for_surface(&mut surface, &mut state);
        assert_eq!(ctx.cluster_content("a", 1), CellContent::from_char('a'));
        let content = ctx.cluster_content("e\u{0301}", 1);
        assert!(content.is_grapheme());
        assert_eq!(content, ctx.cluster_content("e\u{0301}", 1));
        assert_eq!(ctx.graphemes().len(), 1);
    }
}
