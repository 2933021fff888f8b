#![forbid(unsafe_code)]

//! Layers and the generation-checked layer arena.
//!
//! A [`LayerId`] is an index plus a generation. Destroying a layer bumps its
//! slot's generation, so ids handed out earlier stop resolving instead of
//! silently aliasing whatever layer reuses the slot.

use lamina_core::geometry::CellRect;
use lamina_render::Surface;

/// Stable handle to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId {
    index: u32,
    generation: u32,
}

impl LayerId {
    /// Slot index (stable for the layer's lifetime, reused after destroy).
    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

/// A positioned, owned drawing surface.
#[derive(Debug, Clone)]
pub struct Layer {
    name: String,
    pub(crate) surface: Surface,
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) visible: bool,
}

impl Layer {
    pub(crate) fn new(name: &str, x: i32, y: i32, surface: Surface) -> Self {
        Self {
            name: name.to_owned(),
            surface,
            x,
            y,
            visible: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Size in cells, always equal to the surface's size.
    #[inline]
    pub fn size(&self) -> (u16, u16) {
        (self.surface.width(), self.surface.height())
    }

    /// Screen-space rectangle covered by the layer.
    pub fn bounds(&self) -> CellRect {
        CellRect::new(
            self.x,
            self.y,
            i32::from(self.surface.width()),
            i32::from(self.surface.height()),
        )
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the layer was drawn into since it was last cleared.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.surface.is_dirty()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    layer: Option<Layer>,
}

/// Fixed-capacity slot arena with a free list.
#[derive(Debug)]
pub(crate) struct LayerArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    capacity: usize,
    len: usize,
}

impl LayerArena {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, u32::MAX as usize);
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            capacity,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    /// Store a layer, or hand it back if every slot is taken.
    pub(crate) fn insert(&mut self, layer: Layer) -> Result<LayerId, Layer> {
        if self.is_full() {
            return Err(layer);
        }
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    layer: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.layer = Some(layer);
        self.len += 1;
        Ok(LayerId {
            index,
            generation: slot.generation,
        })
    }

    pub(crate) fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let layer = slot.layer.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(layer)
    }

    pub(crate) fn get(&self, id: LayerId) -> Option<&Layer> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.layer.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.layer.as_mut())
    }

    #[inline]
    pub(crate) fn contains(&self, id: LayerId) -> bool {
        self.get(id).is_some()
    }

    /// Live layers in slot order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Layer> {
        self.slots.iter_mut().filter_map(|slot| slot.layer.as_mut())
    }
}
