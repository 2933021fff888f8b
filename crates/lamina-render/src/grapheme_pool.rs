#![forbid(unsafe_code)]

//! Interned storage for multi-codepoint grapheme clusters.
//!
//! Most cells hold a single `char` inline. A cluster made of several
//! codepoints (a letter plus combining marks, a ZWJ emoji sequence, a flag)
//! is interned here once and referenced from cells by [`GraphemeId`].
//!
//! Cells are copied freely between layer surfaces and the screen, so the
//! pool does not count references: a slot lives as long as the pool.
//! Identical clusters share a slot, so growth is bounded by the number of
//! distinct clusters drawn.
//!
//! ```
//! use lamina_render::grapheme_pool::GraphemePool;
//!
//! let mut pool = GraphemePool::new();
//! let id = pool.intern("e\u{0301}", 1).unwrap();
//! assert_eq!(pool.get(id), Some("e\u{0301}"));
//! assert_eq!(pool.intern("e\u{0301}", 1), Some(id));
//! assert_eq!(pool.len(), 1);
//! ```

use std::collections::HashMap;

use crate::cell::GraphemeId;

/// Append-only pool of grapheme clusters.
#[derive(Debug, Clone, Default)]
pub struct GraphemePool {
    slots: Vec<String>,
    lookup: HashMap<String, GraphemeId>,
}

impl GraphemePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct clusters stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Intern `text` with its display width, returning the existing id for a
    /// cluster seen before.
    ///
    /// Returns `None` once every slot index is taken.
    pub fn intern(&mut self, text: &str, width: u8) -> Option<GraphemeId> {
        if let Some(&id) = self.lookup.get(text) {
            return Some(id);
        }
        let slot = u32::try_from(self.slots.len())
            .ok()
            .filter(|&slot| slot <= GraphemeId::MAX_SLOT)?;
        let id = GraphemeId::new(slot, width.min(GraphemeId::MAX_WIDTH));
        self.slots.push(text.to_owned());
        self.lookup.insert(text.to_owned(), id);
        Some(id)
    }

    /// The cluster text for `id`, or `None` if this pool never issued it.
    #[must_use]
    pub fn get(&self, id: GraphemeId) -> Option<&str> {
        self.slots.get(id.slot()).map(String::as_str)
    }
}
