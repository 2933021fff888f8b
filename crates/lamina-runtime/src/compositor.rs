#![forbid(unsafe_code)]

//! Layer compositor.
//!
//! The [`Compositor`] owns every layer, their z-order, and the shared
//! [`DrawState`] (pair cache, scissor stack, glyph policy). Layers are opaque
//! panels: compositing copies each visible layer's cells into the screen
//! surface bottom to top, so an upper layer hides everything beneath its
//! bounds.
//!
//! # Invariants
//!
//! - `z_order` holds every live id exactly once, bottom first.
//! - A layer's size is its surface's size; there is no separate bookkeeping
//!   that a resize could leave stale.
//! - Operations on a stale or unknown [`LayerId`] do nothing and return
//!   `false`.

use lamina_core::geometry::CellRect;
use lamina_render::{Cell, DrawContext, DrawState, Surface};

use crate::config::RendererConfig;
use crate::error::{LayerError, alloc_surface, surface_size};
use crate::layer::{Layer, LayerArena, LayerId};

/// Registry of z-ordered layers.
#[derive(Debug)]
pub struct Compositor {
    arena: LayerArena,
    z_order: Vec<LayerId>,
    state: DrawState,
    max_layer_cells: usize,
}

impl Compositor {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            arena: LayerArena::with_capacity(config.max_layers),
            z_order: Vec::with_capacity(config.max_layers),
            state: DrawState::new(config.pair_capacity, config.glyph_policy),
            max_layer_cells: config.max_layer_cells,
        }
    }

    /// Create a visible layer on top of the z-order.
    ///
    /// # Errors
    ///
    /// Fails if the size is not positive, does not fit a surface, every
    /// registry slot is in use, or the surface cannot be allocated.
    pub fn create(
        &mut self,
        name: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<LayerId, LayerError> {
        let (w, h) = surface_size(width, height)?;
        if self.arena.is_full() {
            lamina_core::warn!(
                name,
                capacity = self.arena.capacity(),
                "layer registry full"
            );
            return Err(LayerError::RegistryFull {
                capacity: self.arena.capacity(),
            });
        }
        let surface = alloc_surface(w, h, self.max_layer_cells)?;
        let id = self
            .arena
            .insert(Layer::new(name, x, y, surface))
            .map_err(|_| LayerError::RegistryFull {
                capacity: self.arena.capacity(),
            })?;
        self.z_order.push(id);
        lamina_core::debug!(name, x, y, width, height, index = id.index(), "layer created");
        Ok(id)
    }

    /// Destroy a layer and free its surface.
    ///
    /// Destroying a dead id is a caller bug: it asserts in debug builds and
    /// returns `false` otherwise.
    pub fn destroy(&mut self, id: LayerId) -> bool {
        let Some(layer) = self.arena.remove(id) else {
            debug_assert!(false, "destroy of dead layer {id:?}");
            lamina_core::error!(?id, "destroy of dead layer ignored");
            return false;
        };
        self.z_order.retain(|z| *z != id);
        lamina_core::debug!(name = layer.name(), "layer destroyed");
        drop(layer);
        true
    }

    pub fn show(&mut self, id: LayerId) -> bool {
        self.set_visible(id, true)
    }

    pub fn hide(&mut self, id: LayerId) -> bool {
        self.set_visible(id, false)
    }

    fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        match self.arena.get_mut(id) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Move a layer to the top of the z-order (drawn last).
    pub fn raise(&mut self, id: LayerId) -> bool {
        let Some(pos) = self.z_position(id) else {
            return false;
        };
        let id = self.z_order.remove(pos);
        self.z_order.push(id);
        true
    }

    /// Move a layer to the bottom of the z-order (drawn first).
    pub fn lower(&mut self, id: LayerId) -> bool {
        let Some(pos) = self.z_position(id) else {
            return false;
        };
        let id = self.z_order.remove(pos);
        self.z_order.insert(0, id);
        true
    }

    fn z_position(&self, id: LayerId) -> Option<usize> {
        if !self.arena.contains(id) {
            return None;
        }
        self.z_order.iter().position(|z| *z == id)
    }

    /// Place a layer's top-left corner at screen position `(x, y)`.
    pub fn move_to(&mut self, id: LayerId, x: i32, y: i32) -> bool {
        match self.arena.get_mut(id) {
            Some(layer) => {
                layer.x = x;
                layer.y = y;
                true
            }
            None => false,
        }
    }

    /// Resize a layer's surface in place, keeping overlapping content.
    ///
    /// Returns `false` for a dead id or any size [`Compositor::try_resize`]
    /// rejects.
    pub fn resize(&mut self, id: LayerId, width: i32, height: i32) -> bool {
        match self.try_resize(id, width, height) {
            Ok(resized) => resized,
            Err(_err) => {
                lamina_core::debug!(width, height, error = %_err, "layer resize rejected");
                false
            }
        }
    }

    /// Resize a layer's surface, reporting why a size was rejected.
    ///
    /// Returns `Ok(false)` for a dead id. The layer is unchanged on error.
    ///
    /// # Errors
    ///
    /// Fails if the size is not positive, does not fit a surface, exceeds the
    /// per-layer cell budget, or cannot be allocated.
    pub fn try_resize(
        &mut self,
        id: LayerId,
        width: i32,
        height: i32,
    ) -> Result<bool, LayerError> {
        let (w, h) = surface_size(width, height)?;
        let Some(layer) = self.arena.get_mut(id) else {
            return Ok(false);
        };
        if usize::from(w) * usize::from(h) > self.max_layer_cells {
            return Err(LayerError::AllocationFailed { width, height });
        }
        layer
            .surface
            .try_resize(w, h)
            .map_err(|_| LayerError::AllocationFailed { width, height })?;
        lamina_core::debug!(name = layer.name(), width, height, "layer resized");
        Ok(true)
    }

    /// A draw context covering the whole layer, origin `(0, 0)`.
    ///
    /// The scissor stack is not reset; call
    /// [`DrawContext::reset_scissor`] before pushing.
    pub fn draw_context(&mut self, id: LayerId) -> Option<DrawContext<'_>> {
        let layer = self.arena.get_mut(id)?;
        Some(DrawContext::for_surface(&mut layer.surface, &mut self.state))
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.arena.get(id)
    }

    /// Lowest layer with the given name.
    pub fn find(&self, name: &str) -> Option<LayerId> {
        self.z_order
            .iter()
            .copied()
            .find(|id| self.arena.get(*id).is_some_and(|l| l.name() == name))
    }

    /// Live layers, bottom to top.
    #[inline]
    pub fn z_order(&self) -> &[LayerId] {
        &self.z_order
    }

    /// Topmost visible layer covering screen cell `(x, y)`.
    pub fn layer_at(&self, x: i32, y: i32) -> Option<LayerId> {
        self.z_order.iter().rev().copied().find(|id| {
            self.arena
                .get(*id)
                .is_some_and(|l| l.visible && l.bounds().contains(x, y))
        })
    }

    #[inline]
    pub fn is_alive(&self, id: LayerId) -> bool {
        self.arena.contains(id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    #[inline]
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut DrawState {
        &mut self.state
    }

    /// Mark every layer dirty so the next frame clears it.
    pub fn invalidate_all(&mut self) {
        for layer in self.arena.iter_mut() {
            layer.surface.mark_dirty();
        }
    }

    /// Clear a layer's dirty flag so its current content survives the next
    /// frame's clearing pass. Drawing into it again marks it dirty.
    pub fn mark_clean(&mut self, id: LayerId) -> bool {
        match self.arena.get_mut(id) {
            Some(layer) => {
                layer.surface.clear_dirty();
                true
            }
            None => false,
        }
    }

    /// Erase every dirty, visible layer and clear its flag.
    ///
    /// Returns the number of layers cleared. Hidden dirty layers keep their
    /// flag and are cleared once shown again.
    pub(crate) fn clear_dirty_layers(&mut self) -> usize {
        let mut cleared = 0;
        for layer in self.arena.iter_mut() {
            if layer.visible && layer.surface.is_dirty() {
                layer.surface.erase();
                layer.surface.clear_dirty();
                cleared += 1;
            }
        }
        cleared
    }

    /// Merge all visible layers into `screen`, bottom to top.
    ///
    /// The screen is erased first. Wide glyphs that the screen edge would
    /// cut in half are replaced by blanks.
    pub fn composite(&self, screen: &mut Surface) {
        screen.erase();
        let screen_rect = screen.bounds();
        for id in &self.z_order {
            let Some(layer) = self.arena.get(*id) else {
                continue;
            };
            if !layer.visible {
                continue;
            }
            blit(screen, screen_rect, layer);
        }
    }
}

fn blit(screen: &mut Surface, screen_rect: CellRect, layer: &Layer) {
    let target = layer.bounds().intersection(&screen_rect);
    if target.is_empty() {
        return;
    }
    for sy in target.top()..target.bottom() {
        let ly = (sy - layer.y) as u16;
        for sx in target.left()..target.right() {
            let lx = (sx - layer.x) as u16;
            let cell = *layer.surface.get_unchecked(lx, ly);
            let cut_tail = cell.is_continuation() && sx == target.left();
            let cut_head = cell.content.width() > 1 && sx + 1 >= target.right();
            if cut_tail || cut_head {
                screen.set_cell(sx, sy, Cell::BLANK);
            } else {
                screen.set_cell(sx, sy, cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_render::Draw;
    use lamina_style::Style;

    fn compositor(max_layers: usize) -> Compositor {
        Compositor::new(&RendererConfig::default().with_max_layers(max_layers))
    }

    #[test]
    fn create_rejects_bad_sizes() {
        let mut c = compositor(4);
        assert_eq!(
            c.create("a", 0, 0, 0, 5),
            Err(LayerError::InvalidSize { width: 0, height: 5 })
        );
        assert_eq!(
            c.create("a", 0, 0, 5, -2),
            Err(LayerError::InvalidSize { width: 5, height: -2 })
        );
        assert!(matches!(
            c.create("a", 0, 0, 70_000, 2),
            Err(LayerError::SurfaceTooLarge { .. })
        ));
        assert!(c.is_empty());
    }

    #[test]
    fn registry_full_is_an_error() {
        let mut c = compositor(2);
        c.create("a", 0, 0, 1, 1).unwrap();
        c.create("b", 0, 0, 1, 1).unwrap();
        assert_eq!(
            c.create("c", 0, 0, 1, 1),
            Err(LayerError::RegistryFull { capacity: 2 })
        );
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn new_layers_go_on_top() {
        let mut c = compositor(4);
        let a = c.create("a", 0, 0, 2, 2).unwrap();
        let b = c.create("b", 0, 0, 2, 2).unwrap();
        assert_eq!(c.z_order(), &[a, b]);
    }

    #[test]
    fn raise_and_lower_reorder() {
        let mut c = compositor(4);
        let a = c.create("a", 0, 0, 2, 2).unwrap();
        let b = c.create("b", 0, 0, 2, 2).unwrap();
        let d = c.create("d", 0, 0, 2, 2).unwrap();
        assert!(c.raise(a));
        assert_eq!(c.z_order(), &[b, d, a]);
        assert!(c.lower(d));
        assert_eq!(c.z_order(), &[d, b, a]);
    }

    #[test]
    fn destroy_frees_slot_and_invalidates_id() {
        let mut c = compositor(1);
        let a = c.create("a", 0, 0, 2, 2).unwrap();
        assert!(c.destroy(a));
        assert!(!c.is_alive(a));
        assert!(c.z_order().is_empty());
        let b = c.create("b", 0, 0, 2, 2).unwrap();
        assert!(!c.show(a));
        assert!(!c.raise(a));
        assert!(!c.move_to(a, 1, 1));
        assert!(!c.resize(a, 3, 3));
        assert!(c.draw_context(a).is_none());
        assert!(c.is_alive(b));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "destroy of dead layer")]
    fn double_destroy_asserts_in_debug() {
        let mut c = compositor(2);
        let a = c.create("a", 0, 0, 2, 2).unwrap();
        c.destroy(a);
        c.destroy(a);
    }

    #[test]
    fn resize_updates_layer_geometry() {
        let mut c = compositor(2);
        let a = c.create("a", 0, 0, 4, 2).unwrap();
        assert!(c.resize(a, 10, 3));
        let layer = c.layer(a).unwrap();
        assert_eq!(layer.size(), (10, 3));
        assert_eq!(layer.bounds(), CellRect::new(0, 0, 10, 3));
        let ctx = c.draw_context(a).unwrap();
        assert_eq!(ctx.clip(), CellRect::new(0, 0, 10, 3));
    }

    #[test]
    fn resize_rejects_bad_size() {
        let mut c = compositor(2);
        let a = c.create("a", 0, 0, 4, 2).unwrap();
        assert!(!c.resize(a, 0, 2));
        assert_eq!(c.layer(a).map(Layer::size), Some((4, 2)));
    }

    #[test]
    fn huge_create_fails_without_allocating() {
        let mut c = compositor(2);
        assert_eq!(
            c.create("huge", 0, 0, 65_535, 65_535),
            Err(LayerError::AllocationFailed {
                width: 65_535,
                height: 65_535
            })
        );
        assert!(c.is_empty());
        assert!(c.create("small", 0, 0, 4, 2).is_ok());
    }

    #[test]
    fn create_respects_cell_budget() {
        let config = RendererConfig::default().with_max_layer_cells(100);
        let mut c = Compositor::new(&config);
        assert!(c.create("fits", 0, 0, 10, 10).is_ok());
        assert_eq!(
            c.create("over", 0, 0, 11, 10),
            Err(LayerError::AllocationFailed { width: 11, height: 10 })
        );
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn huge_resize_is_rejected_and_keeps_content() {
        let mut c = compositor(2);
        let a = c.create("a", 0, 0, 4, 1).unwrap();
        c.draw_context(a).unwrap().text(0, 0, "keep", Style::DEFAULT);
        assert_eq!(
            c.try_resize(a, 65_535, 65_535),
            Err(LayerError::AllocationFailed {
                width: 65_535,
                height: 65_535
            })
        );
        assert!(!c.resize(a, 65_535, 65_535));
        let layer = c.layer(a).unwrap();
        assert_eq!(layer.size(), (4, 1));
        assert_eq!(layer.surface().row_string(0), "keep");
    }

    #[test]
    fn try_resize_of_dead_layer_is_ok_false() {
        let mut c = compositor(2);
        let a = c.create("a", 0, 0, 4, 1).unwrap();
        c.destroy(a);
        assert_eq!(c.try_resize(a, 2, 2), Ok(false));
        assert_eq!(
            c.try_resize(a, 0, 2),
            Err(LayerError::InvalidSize { width: 0, height: 2 })
        );
    }

    #[test]
    fn draw_context_marks_layer_dirty() {
        let mut c = compositor(2);
        let a = c.create("a", 0, 0, 4, 2).unwrap();
        assert!(!c.layer(a).unwrap().is_dirty());
        {
            let mut ctx = c.draw_context(a).unwrap();
            ctx.reset_scissor();
            ctx.text(0, 0, "hi", Style::DEFAULT);
        }
        assert!(c.layer(a).unwrap().is_dirty());
    }

    #[test]
    fn clear_dirty_layers_skips_hidden() {
        let mut c = compositor(3);
        let a = c.create("a", 0, 0, 4, 1).unwrap();
        let b = c.create("b", 0, 0, 4, 1).unwrap();
        for id in [a, b] {
            let mut ctx = c.draw_context(id).unwrap();
            ctx.text(0, 0, "x", Style::DEFAULT);
        }
        c.hide(b);
        assert_eq!(c.clear_dirty_layers(), 1);
        assert_eq!(c.layer(a).unwrap().surface().row_string(0), "    ");
        assert_eq!(c.layer(b).unwrap().surface().row_string(0), "x   ");
        assert!(c.layer(b).unwrap().is_dirty());
    }

    #[test]
    fn queries() {
        let mut c = compositor(4);
        let a = c.create("base", 0, 0, 10, 10).unwrap();
        let b = c.create("popup", 2, 2, 3, 3).unwrap();
        assert_eq!(c.find("popup"), Some(b));
        assert_eq!(c.find("missing"), None);
        assert_eq!(c.layer_at(3, 3), Some(b));
        assert_eq!(c.layer_at(0, 0), Some(a));
        assert_eq!(c.layer_at(20, 0), None);
        c.hide(b);
        assert_eq!(c.layer_at(3, 3), Some(a));
    }

    #[test]
    fn composite_respects_z_order_and_visibility() {
        let mut c = compositor(4);
        let bottom = c.create("bottom", 0, 0, 6, 2).unwrap();
        let top = c.create("top", 2, 0, 2, 1).unwrap();
        c.draw_context(bottom)
            .unwrap()
            .fill_rect(CellRect::new(0, 0, 6, 2), '.', Style::DEFAULT);
        c.draw_context(top)
            .unwrap()
            .fill_rect(CellRect::new(0, 0, 2, 1), '#', Style::DEFAULT);

        let mut screen = Surface::new(8, 2);
        c.composite(&mut screen);
        assert_eq!(screen.row_string(0), "..##..  ");
        assert_eq!(screen.row_string(1), "......  ");

        c.lower(top);
        c.composite(&mut screen);
        assert_eq!(screen.row_string(0), "......  ");

        c.raise(top);
        c.hide(bottom);
        c.composite(&mut screen);
        assert_eq!(screen.row_string(0), "  ##    ");
    }

    #[test]
    fn composite_clips_layers_to_screen() {
        let mut c = compositor(2);
        let a = c.create("a", -2, 1, 5, 5).unwrap();
        c.draw_context(a)
            .unwrap()
            .fill_rect(CellRect::new(0, 0, 5, 5), 'o', Style::DEFAULT);
        let mut screen = Surface::new(4, 3);
        c.composite(&mut screen);
        assert_eq!(screen.row_string(0), "    ");
        assert_eq!(screen.row_string(1), "ooo ");
        assert_eq!(screen.row_string(2), "ooo ");
    }

    #[test]
    fn composite_blanks_wide_glyphs_cut_by_screen_edge() {
        let mut c = compositor(2);
        let a = c.create("a", -1, 0, 6, 1).unwrap();
        c.draw_context(a).unwrap().text(0, 0, "中文x", Style::DEFAULT);
        let mut screen = Surface::new(4, 1);
        c.composite(&mut screen);
        // Layer column 1 (the first glyph's tail) lands on screen column 0.
        assert_eq!(screen.get(0, 0), Some(&Cell::BLANK));
        assert_eq!(screen.get(1, 0).and_then(|c| c.content.as_char()), Some('文'));
        assert!(screen.get(2, 0).is_some_and(|c| c.is_continuation()));
        assert_eq!(screen.get(3, 0).and_then(|c| c.content.as_char()), Some('x'));

        let mut narrow = Surface::new(2, 1);
        c.move_to(a, 1, 0);
        c.composite(&mut narrow);
        assert_eq!(narrow.get(1, 0), Some(&Cell::BLANK));
    }

    #[test]
    fn mark_clean_keeps_content_through_clearing() {
        let mut c = compositor(2);
        let a = c.create("static", 0, 0, 3, 1).unwrap();
        c.draw_context(a).unwrap().text(0, 0, "abc", Style::DEFAULT);
        assert!(c.mark_clean(a));
        assert_eq!(c.clear_dirty_layers(), 0);
        assert_eq!(c.layer(a).unwrap().surface().row_string(0), "abc");
    }

    #[test]
    fn invalidate_all_marks_every_layer() {
        let mut c = compositor(3);
        let a = c.create("a", 0, 0, 2, 2).unwrap();
        let b = c.create("b", 0, 0, 2, 2).unwrap();
        c.invalidate_all();
        assert!(c.layer(a).unwrap().is_dirty());
        assert!(c.layer(b).unwrap().is_dirty());
    }
}
