#![forbid(unsafe_code)]

//! Renderer configuration.
//!
//! [`RendererConfig`] is a plain value with builder-style setters. Defaults
//! suit an interactive terminal; [`RendererConfig::from_env`] applies the
//! `LAMINA_*` environment overrides on top of them.
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `LAMINA_MAX_LAYERS` | `max_layers` | positive integer |
//! | `LAMINA_PAIR_CAPACITY` | `pair_capacity` | positive integer |
//! | `LAMINA_MAX_LAYER_CELLS` | `max_layer_cells` | positive integer |
//! | `LAMINA_FORCED_SIZE` | `forced_size` | `WxH`, e.g. `80x24` |
//! | `LAMINA_SYNC_OUTPUT` | `sync_output` | `1/0/true/false` |
//! | `LAMINA_GLYPH_MODE` | `glyph_policy.mode` | `unicode` / `ascii` |
//! | `LAMINA_GLYPH_HEAVY` | `glyph_policy.heavy_lines` | `1/0/true/false` |

use std::env;

use lamina_core::glyph_policy::{GlyphPolicy, parse_bool};
use lamina_style::DEFAULT_PAIR_CAPACITY;

/// Default number of layer slots.
pub const DEFAULT_MAX_LAYERS: usize = 32;

/// Default cell budget for a single layer surface (about 48 MiB of cells).
pub const DEFAULT_MAX_LAYER_CELLS: usize = 1 << 22;

const ENV_MAX_LAYERS: &str = "LAMINA_MAX_LAYERS";
const ENV_PAIR_CAPACITY: &str = "LAMINA_PAIR_CAPACITY";
const ENV_MAX_LAYER_CELLS: &str = "LAMINA_MAX_LAYER_CELLS";
const ENV_FORCED_SIZE: &str = "LAMINA_FORCED_SIZE";
const ENV_SYNC_OUTPUT: &str = "LAMINA_SYNC_OUTPUT";

/// Configuration for a [`crate::Renderer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Maximum number of live layers, the background included.
    pub max_layers: usize,
    /// Number of color-pair slots available to the pair cache.
    pub pair_capacity: usize,
    /// Largest surface, in cells, a layer may be created or resized to.
    pub max_layer_cells: usize,
    /// Border and line glyph capabilities.
    pub glyph_policy: GlyphPolicy,
    /// Bracket each present with DEC 2026 synchronized output.
    pub sync_output: bool,
    /// Fixed screen size, bypassing backend size queries.
    pub forced_size: Option<(u16, u16)>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_layers: DEFAULT_MAX_LAYERS,
            pair_capacity: DEFAULT_PAIR_CAPACITY,
            max_layer_cells: DEFAULT_MAX_LAYER_CELLS,
            glyph_policy: GlyphPolicy::default(),
            sync_output: true,
            forced_size: None,
        }
    }
}

impl RendererConfig {
    /// Default configuration with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Unparseable values are ignored and the default is kept.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            glyph_policy: GlyphPolicy::from_lookup(&lookup),
            ..Self::default()
        };
        if let Some(n) = lookup(ENV_MAX_LAYERS).as_deref().and_then(parse_positive) {
            config.max_layers = n;
        }
        if let Some(n) = lookup(ENV_PAIR_CAPACITY).as_deref().and_then(parse_positive) {
            config.pair_capacity = n;
        }
        if let Some(n) = lookup(ENV_MAX_LAYER_CELLS).as_deref().and_then(parse_positive) {
            config.max_layer_cells = n;
        }
        if let Some(size) = lookup(ENV_FORCED_SIZE).as_deref().and_then(parse_size) {
            config.forced_size = Some(size);
        }
        if let Some(sync) = lookup(ENV_SYNC_OUTPUT).as_deref().and_then(parse_bool) {
            config.sync_output = sync;
        }
        config
    }

    #[must_use]
    pub fn with_max_layers(mut self, max_layers: usize) -> Self {
        self.max_layers = max_layers.max(1);
        self
    }

    #[must_use]
    pub fn with_pair_capacity(mut self, capacity: usize) -> Self {
        self.pair_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_max_layer_cells(mut self, cells: usize) -> Self {
        self.max_layer_cells = cells.max(1);
        self
    }

    #[must_use]
    pub fn with_glyph_policy(mut self, policy: GlyphPolicy) -> Self {
        self.glyph_policy = policy;
        self
    }

    #[must_use]
    pub fn with_sync_output(mut self, enabled: bool) -> Self {
        self.sync_output = enabled;
        self
    }

    /// Pin the screen size (headless runs and tests).
    #[must_use]
    pub fn with_forced_size(mut self, width: u16, height: u16) -> Self {
        self.forced_size = Some((width.max(1), height.max(1)));
        self
    }
}

fn parse_positive(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Parse `WxH` (case-insensitive separator).
fn parse_size(value: &str) -> Option<(u16, u16)> {
    let value = value.trim().to_ascii_lowercase();
    let (w, h) = value.split_once('x')?;
    let w = w.trim().parse::<u16>().ok().filter(|n| *n > 0)?;
    let h = h.trim().parse::<u16>().ok().filter(|n| *n > 0)?;
    Some((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamina_core::glyph_policy::GlyphMode;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = RendererConfig::default();
        assert_eq!(config.max_layers, 32);
        assert_eq!(config.pair_capacity, 255);
        assert_eq!(config.max_layer_cells, DEFAULT_MAX_LAYER_CELLS);
        assert!(config.sync_output);
        assert_eq!(config.forced_size, None);
        assert_eq!(RendererConfig::from_lookup(lookup(&[])), config);
    }

    #[test]
    fn env_overrides() {
        let config = RendererConfig::from_lookup(lookup(&[
            ("LAMINA_MAX_LAYERS", "8"),
            ("LAMINA_PAIR_CAPACITY", "16"),
            ("LAMINA_MAX_LAYER_CELLS", "4096"),
            ("LAMINA_FORCED_SIZE", "100X30"),
            ("LAMINA_SYNC_OUTPUT", "off"),
            ("LAMINA_GLYPH_MODE", "ascii"),
        ]));
        assert_eq!(config.max_layers, 8);
        assert_eq!(config.pair_capacity, 16);
        assert_eq!(config.max_layer_cells, 4096);
        assert_eq!(config.forced_size, Some((100, 30)));
        assert!(!config.sync_output);
        assert_eq!(config.glyph_policy.mode, GlyphMode::Ascii);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = RendererConfig::from_lookup(lookup(&[
            ("LAMINA_MAX_LAYERS", "0"),
            ("LAMINA_PAIR_CAPACITY", "lots"),
            ("LAMINA_FORCED_SIZE", "80by24"),
            ("LAMINA_SYNC_OUTPUT", "maybe"),
        ]));
        assert_eq!(config, RendererConfig::default());
    }

    #[test]
    fn parse_size_variants() {
        assert_eq!(parse_size("80x24"), Some((80, 24)));
        assert_eq!(parse_size(" 120 x 40 "), Some((120, 40)));
        assert_eq!(parse_size("0x24"), None);
        assert_eq!(parse_size("80x"), None);
        assert_eq!(parse_size("70000x1"), None);
    }

    #[test]
    fn builders() {
        let config = RendererConfig::default()
            .with_max_layers(0)
            .with_pair_capacity(4)
            .with_max_layer_cells(0)
            .with_glyph_policy(GlyphPolicy::ascii())
            .with_sync_output(false)
            .with_forced_size(40, 0);
        assert_eq!(config.max_layers, 1);
        assert_eq!(config.pair_capacity, 4);
        assert_eq!(config.max_layer_cells, 1);
        assert_eq!(config.glyph_policy, GlyphPolicy::ascii());
        assert!(!config.sync_output);
        assert_eq!(config.forced_size, Some((40, 1)));
    }
}
