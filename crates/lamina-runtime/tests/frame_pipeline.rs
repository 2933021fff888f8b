//! End-to-end frame pipeline scenarios against the headless backend.

use lamina_core::geometry::CellRect;
use lamina_render::{BorderStyle, Draw};
use lamina_runtime::{HeadlessBackend, LayerError, ManualClock, Renderer, RendererConfig};
use lamina_style::{Color, Style};

fn renderer(width: u16, height: u16) -> Renderer<HeadlessBackend, ManualClock> {
    Renderer::new(
        RendererConfig::default(),
        HeadlessBackend::new(width, height),
        ManualClock::new(),
    )
}

#[test]
fn overlapping_layers_show_top_in_overlap() {
    let mut r = renderer(12, 6);
    let top = r.create_layer("top", 3, 2, 4, 2).unwrap();
    let bottom = r.create_layer("bottom", 1, 1, 8, 4).unwrap();
    r.compositor_mut().lower(bottom);
    assert_eq!(r.compositor().z_order(), &[bottom, top]);

    r.begin();
    {
        let mut ctx = r.draw_context(bottom).unwrap();
        ctx.reset_scissor();
        ctx.fill_rect(CellRect::new(0, 0, 8, 4), 'b', Style::DEFAULT.bg(Color::BLUE));
    }
    {
        let mut ctx = r.draw_context(top).unwrap();
        ctx.reset_scissor();
        ctx.fill_rect(CellRect::new(0, 0, 4, 2), 'T', Style::DEFAULT.fg(Color::YELLOW));
    }
    r.end().unwrap();

    let rows = r.backend().rows();
    assert_eq!(rows[0], "            ");
    assert_eq!(rows[1], " bbbbbbbb   ");
    assert_eq!(rows[2], " bbTTTTbb   ");
    assert_eq!(rows[3], " bbTTTTbb   ");
    assert_eq!(rows[4], " bbbbbbbb   ");
    assert_eq!(rows[5], "            ");

    for y in 0..6 {
        for x in 0..12 {
            let expected = if (3..7).contains(&x) && (2..4).contains(&y) {
                Some(top)
            } else if (1..9).contains(&x) && (1..5).contains(&y) {
                Some(bottom)
            } else {
                r.background()
            };
            assert_eq!(r.compositor().layer_at(x, y), expected, "({x}, {y})");
        }
    }
}

#[test]
fn one_present_per_frame_regardless_of_layer_count() {
    let mut r = renderer(20, 5);
    let ids: Vec<_> = (0..5)
        .map(|i| r.create_layer(&format!("l{i}"), i * 3, 0, 3, 3).unwrap())
        .collect();
    for frame in 1..=3 {
        r.begin();
        for id in &ids {
            let mut ctx = r.draw_context(*id).unwrap();
            ctx.reset_scissor();
            ctx.border_rect(ctx.area(), BorderStyle::Single, Style::DEFAULT);
        }
        r.end().unwrap();
        assert_eq!(r.backend().present_count(), frame);
    }
}

#[test]
fn scissor_leak_is_cleared_by_reset() {
    let mut r = renderer(10, 2);
    let a = r.create_layer("a", 0, 0, 10, 1).unwrap();
    let b = r.create_layer("b", 0, 1, 10, 1).unwrap();
    r.begin();
    {
        let mut ctx = r.draw_context(a).unwrap();
        ctx.reset_scissor();
        ctx.push_scissor(CellRect::new(0, 0, 2, 1));
        ctx.text(0, 0, "unbalanced", Style::DEFAULT);
    }
    {
        let mut ctx = r.draw_context(b).unwrap();
        assert_eq!(ctx.scissor_depth(), 1);
        ctx.reset_scissor();
        assert_eq!(ctx.scissor_depth(), 0);
        ctx.text(0, 0, "balanced", Style::DEFAULT);
    }
    r.end().unwrap();
    assert_eq!(r.backend().rows()[0], "un        ");
    assert_eq!(r.backend().rows()[1], "balanced  ");
}

#[test]
fn moving_and_hiding_layers_updates_output() {
    let mut r = renderer(8, 1);
    r.begin();
    r.end().unwrap();

    let tag = r.create_layer("tag", 0, 0, 2, 1).unwrap();
    r.draw_context(tag).unwrap().text(0, 0, "ok", Style::DEFAULT);
    r.compositor_mut().mark_clean(tag);
    r.begin();
    r.end().unwrap();
    assert_eq!(r.backend().rows()[0], "ok      ");

    r.compositor_mut().move_to(tag, 5, 0);
    r.begin();
    r.end().unwrap();
    assert_eq!(r.backend().rows()[0], "     ok ");
    assert_eq!(r.backend().last_changes(), 4);

    r.compositor_mut().hide(tag);
    r.begin();
    r.end().unwrap();
    assert_eq!(r.backend().rows()[0], "        ");
}

#[test]
fn destroyed_layer_handle_is_inert() {
    let mut r = renderer(8, 2);
    let a = r.create_layer("a", 0, 0, 2, 2).unwrap();
    assert!(r.compositor_mut().destroy(a));
    let b = r.create_layer("b", 0, 0, 2, 2).unwrap();
    assert!(r.draw_context(a).is_none());
    assert!(!r.compositor_mut().raise(a));
    assert!(r.draw_context(b).is_some());
}

#[test]
fn registry_exhaustion_counts_background() {
    let mut r = Renderer::new(
        RendererConfig::default().with_max_layers(2),
        HeadlessBackend::new(4, 4),
        ManualClock::new(),
    );
    r.begin();
    r.end().unwrap();
    assert!(r.background().is_some());
    r.create_layer("one", 0, 0, 1, 1).unwrap();
    assert_eq!(
        r.create_layer("two", 0, 0, 1, 1),
        Err(LayerError::RegistryFull { capacity: 2 })
    );
}

#[test]
fn styled_cells_reach_the_screen() {
    let mut r = renderer(4, 1);
    r.begin();
    let bg = r.background().unwrap();
    r.draw_context(bg)
        .unwrap()
        .text(0, 0, "hi", Style::DEFAULT.fg(Color::RED).bold());
    r.end().unwrap();
    let cell = *r.last_frame().get(0, 0).unwrap();
    assert_eq!(cell.pen.fg, Color::RED);
    assert_eq!(cell.pen.bg, Color::Default);
    assert_eq!(r.state().pairs.colors(cell.pen.pair), Some((Color::RED, Color::Default)));
    assert!(cell.pen.attrs.contains(lamina_style::Attrs::BOLD));
}

#[test]
fn combining_marks_reach_the_screen() {
    let mut r = renderer(4, 1);
    r.begin();
    let bg = r.background().unwrap();
    r.draw_context(bg)
        .unwrap()
        .text(0, 0, "e\u{0301}", Style::DEFAULT);
    r.end().unwrap();
    assert_eq!(r.backend().rows()[0], "e\u{0301}   ");
    assert_eq!(r.state().graphemes.len(), 1);
}

#[test]
fn more_colors_than_pair_slots_keep_their_colors() {
    let mut r = Renderer::new(
        RendererConfig::default().with_pair_capacity(2),
        HeadlessBackend::new(6, 1),
        ManualClock::new(),
    );
    let palette = [Color::RED, Color::GREEN, Color::BLUE, Color::YELLOW, Color::CYAN];
    r.begin();
    let bg = r.background().unwrap();
    {
        let mut ctx = r.draw_context(bg).unwrap();
        for (x, color) in palette.iter().enumerate() {
            ctx.text(x as i32, 0, "#", Style::DEFAULT.fg(*color));
        }
    }
    r.end().unwrap();
    assert_eq!(r.state().pairs.stats().evictions, 3);
    let shown: Vec<Color> = (0..5)
        .filter_map(|x| r.last_frame().get(x, 0).map(|c| c.pen.fg))
        .collect();
    assert_eq!(shown, palette);
}
