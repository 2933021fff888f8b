//! Property tests for the scissor stack and clipped drawing.
//!
//! 1. push then pop restores the previous clip.
//! 2. Nested pushes never widen the clip.
//! 3. Fills never write outside the clip.
//! 4. Text never leaves half of a wide glyph behind.
//! 5. Bounded text never changes the context's clip.

use lamina_core::geometry::CellRect;
use lamina_render::{Draw, DrawContext, DrawState, SCISSOR_STACK_MAX, ScissorStack, Surface};
use lamina_style::Style;
use proptest::prelude::*;

fn rect_strategy() -> impl Strategy<Value = CellRect> {
    (-20i32..60, -10i32..30, -5i32..60, -5i32..30)
        .prop_map(|(x, y, w, h)| CellRect::new(x, y, w, h))
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just('a'),
            Just('Z'),
            Just(' '),
            Just('中'),
            Just('文'),
            Just('\u{0301}'),
            Just('─'),
        ],
        0..24,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn push_pop_is_identity(
        base in rect_strategy(),
        pre in prop::collection::vec(rect_strategy(), 0..SCISSOR_STACK_MAX + 4),
        r in rect_strategy(),
    ) {
        let mut stack = ScissorStack::new();
        stack.reset(base);
        for p in &pre {
            stack.push(*p);
        }
        let before = stack.current();
        stack.push(r);
        prop_assert_eq!(stack.pop(), before);
        prop_assert_eq!(stack.current(), before);
    }

    #[test]
    fn nested_pushes_never_widen(
        base in rect_strategy(),
        pushes in prop::collection::vec(rect_strategy(), 1..SCISSOR_STACK_MAX * 2),
    ) {
        let mut stack = ScissorStack::new();
        let mut prev = stack.reset(base);
        for r in pushes {
            let clip = stack.push(r);
            prop_assert!(
                prev.contains_rect(&clip),
                "{:?} escapes {:?}", clip, prev
            );
            prev = clip;
        }
    }

    #[test]
    fn fill_stays_inside_clip(clip in rect_strategy(), rect in rect_strategy()) {
        let mut surface = Surface::new(40, 20);
        let mut state = DrawState::default();
        let mut ctx = DrawContext::for_surface(&mut surface, &mut state);
        ctx.reset_scissor();
        let effective = ctx.push_scissor(clip);
        ctx.fill_rect(rect, '#', Style::DEFAULT);
        let target = rect.intersection(&effective);
        for y in 0..20 {
            for x in 0..40 {
                let written = surface.get(x, y).is_some_and(|c| !c.is_empty());
                prop_assert_eq!(written, target.contains(x, y), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn text_never_splits_wide_glyphs(
        clip in rect_strategy(),
        x in -10i32..40,
        y in -2i32..12,
        text in text_strategy(),
    ) {
        let mut surface = Surface::new(32, 10);
        let mut state = DrawState::default();
        let mut ctx = DrawContext::for_surface(&mut surface, &mut state);
        ctx.reset_scissor();
        let effective = ctx.push_scissor(clip);
        ctx.text(x, y, &text, Style::DEFAULT);

        for row in 0..10 {
            for col in 0..32 {
                let Some(cell) = surface.get(col, row) else { continue };
                if cell.is_empty() {
                    continue;
                }
                prop_assert!(effective.contains(col, row), "write at ({}, {}) outside {:?}", col, row, effective);
                if cell.is_continuation() {
                    let head = surface.get(col - 1, row);
                    prop_assert!(head.is_some_and(|h| h.content.width() == 2));
                }
                if cell.content.width() == 2 {
                    let tail = surface.get(col + 1, row);
                    prop_assert!(tail.is_some_and(|t| t.is_continuation()));
                    prop_assert!(effective.contains(col + 1, row));
                }
            }
        }
    }

    #[test]
    fn text_bounded_preserves_clip(
        clip in rect_strategy(),
        x in -10i32..40,
        y in -2i32..12,
        max_cols in -5i32..20,
        text in text_strategy(),
    ) {
        let mut surface = Surface::new(32, 10);
        let mut state = DrawState::default();
        let mut ctx = DrawContext::for_surface(&mut surface, &mut state);
        ctx.reset_scissor();
        let before = ctx.push_scissor(clip);
        ctx.text_bounded(x, y, &text, max_cols, Style::DEFAULT);
        prop_assert_eq!(ctx.clip(), before);
        prop_assert_eq!(ctx.scissor_depth(), 1);

        let bound = before.intersection(&CellRect::new(x, y, max_cols.max(0), 1));
        for row in 0..10 {
            for col in 0..32 {
                let written = surface.get(col, row).is_some_and(|c| !c.is_empty());
                if written {
                    prop_assert!(bound.contains(col, row));
                }
            }
        }
    }
}
