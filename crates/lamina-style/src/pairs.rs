//! Bounded color-pair allocation.
//!
//! Terminals expose a fixed number of foreground/background pair slots.
//! [`PairCache`] hands out slot ids for color combinations and recycles the
//! least-recently-used slot once every slot is taken. Cells keep the resolved
//! colors alongside the id, so recycling a slot only affects later lookups.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::color::Color;

/// Default number of allocatable pair slots (terminal pair 0 is reserved).
pub const DEFAULT_PAIR_CAPACITY: usize = 255;

/// Handle to an allocated color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct PairId(pub u16);

impl PairId {
    /// The terminal's default colors. Never allocated, never evicted.
    pub const DEFAULT: Self = Self(0);

    #[must_use]
    pub const fn is_default(self) -> bool {
        self.0 == 0
    }
}

/// Statistics for a [`PairCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairStats {
    /// Lookups that found an existing pair.
    pub hits: u64,
    /// Lookups that had to allocate or recycle a slot.
    pub misses: u64,
    /// Slots recycled from an older color combination.
    pub evictions: u64,
    /// Slots currently in use.
    pub size: usize,
    /// Maximum slots before recycling starts.
    pub capacity: usize,
}

type PairKey = (Color, Color);

/// LRU map from (foreground, background) to pair slot.
#[derive(Debug)]
pub struct PairCache {
    lru: LruCache<PairKey, PairId>,
    /// Colors for slot `id`, stored at `id - 1`.
    slots: Vec<PairKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl Default for PairCache {
    fn default() -> Self {
        Self::new(DEFAULT_PAIR_CAPACITY)
    }
}

impl PairCache {
    /// Create a cache with `capacity` slots.
    ///
    /// Capacity is clamped to `1..=u16::MAX - 1` so every id fits the cell
    /// encoding.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, usize::from(u16::MAX - 1));
        let bound = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            lru: LruCache::new(bound),
            slots: Vec::with_capacity(capacity.min(256)),
            capacity,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Resolve a color combination to a pair id.
    ///
    /// Two default colors map to [`PairId::DEFAULT`] without touching the
    /// cache. Any other combination returns its existing slot or claims one,
    /// recycling the least-recently-used slot when full.
    pub fn resolve(&mut self, fg: Color, bg: Color) -> PairId {
        if fg.is_default() && bg.is_default() {
            return PairId::DEFAULT;
        }
        let key = (fg, bg);
        if let Some(&id) = self.lru.get(&key) {
            self.hits += 1;
            return id;
        }
        self.misses += 1;

        if self.slots.len() < self.capacity {
            self.slots.push(key);
            let id = PairId(self.slots.len() as u16);
            self.lru.put(key, id);
            return id;
        }

        match self.lru.pop_lru() {
            Some((_old, id)) => {
                self.slots[usize::from(id.0) - 1] = key;
                self.lru.put(key, id);
                self.evictions += 1;
                lamina_core::debug!(
                    pair = id.0,
                    old_fg = ?_old.0,
                    old_bg = ?_old.1,
                    "color pair recycled"
                );
                id
            }
            // Unreachable with capacity >= 1 and a full slot table.
            None => PairId::DEFAULT,
        }
    }

    /// Colors currently assigned to `pair`, or `None` for an unknown id.
    #[must_use]
    pub fn colors(&self, pair: PairId) -> Option<(Color, Color)> {
        if pair.is_default() {
            return Some((Color::Default, Color::Default));
        }
        self.slots.get(usize::from(pair.0) - 1).copied()
    }

    /// Look up a combination without allocating or touching recency.
    #[must_use]
    pub fn peek(&self, fg: Color, bg: Color) -> Option<PairId> {
        if fg.is_default() && bg.is_default() {
            return Some(PairId::DEFAULT);
        }
        self.lru.peek(&(fg, bg)).copied()
    }

    /// Number of slots in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return current cache statistics.
    #[must_use]
    pub fn stats(&self) -> PairStats {
        PairStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size: self.slots.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_colors_use_reserved_pair() {
        let mut cache = PairCache::new(4);
        assert_eq!(cache.resolve(Color::Default, Color::Default), PairId::DEFAULT);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
        assert_eq!(
            cache.colors(PairId::DEFAULT),
            Some((Color::Default, Color::Default))
        );
    }

    #[test]
    fn same_combination_reuses_slot() {
        let mut cache = PairCache::new(4);
        let a = cache.resolve(Color::RED, Color::Default);
        let b = cache.resolve(Color::RED, Color::Default);
        assert_eq!(a, b);
        assert_eq!(a, PairId(1));
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn distinct_combinations_get_distinct_slots() {
        let mut cache = PairCache::new(4);
        let a = cache.resolve(Color::RED, Color::BLUE);
        let b = cache.resolve(Color::BLUE, Color::RED);
        assert_ne!(a, b);
        assert_eq!(cache.colors(a), Some((Color::RED, Color::BLUE)));
        assert_eq!(cache.colors(b), Some((Color::BLUE, Color::RED)));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn full_cache_recycles_least_recently_used() {
        let mut cache = PairCache::new(2);
        let red = cache.resolve(Color::RED, Color::Default);
        let green = cache.resolve(Color::GREEN, Color::Default);
        // Touch red so green becomes the eviction candidate.
        assert_eq!(cache.resolve(Color::RED, Color::Default), red);

        let blue = cache.resolve(Color::BLUE, Color::Default);
        assert_eq!(blue, green);
        assert_eq!(cache.colors(blue), Some((Color::BLUE, Color::Default)));
        assert_eq!(cache.peek(Color::GREEN, Color::Default), None);
        assert_eq!(cache.peek(Color::RED, Color::Default), Some(red));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn single_slot_is_reassigned() {
        let mut cache = PairCache::new(1);
        let red = cache.resolve(Color::RED, Color::Default);
        let green = cache.resolve(Color::GREEN, Color::Default);
        assert_eq!(red, green);
        assert_eq!(cache.colors(green), Some((Color::GREEN, Color::Default)));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn unknown_pair_has_no_colors() {
        let cache = PairCache::new(4);
        assert_eq!(cache.colors(PairId(3)), None);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut cache = PairCache::new(0);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.resolve(Color::RED, Color::RED), PairId(1));
    }

    #[test]
    fn default_capacity() {
        assert_eq!(PairCache::default().capacity(), DEFAULT_PAIR_CAPACITY);
    }
}
