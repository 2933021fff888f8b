#![forbid(unsafe_code)]

//! Glyph capability policy (Unicode vs ASCII line drawing, heavy lines).
//!
//! Border and line primitives consult this policy once per call to pick a
//! glyph set. Decisions are deterministic given the environment.

use std::env;

/// Environment variable to override glyph mode (`unicode` or `ascii`).
const ENV_GLYPH_MODE: &str = "LAMINA_GLYPH_MODE";
/// Environment variable to override heavy line support (`1/0/true/false`).
const ENV_GLYPH_HEAVY: &str = "LAMINA_GLYPH_HEAVY";

/// Overall glyph rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphMode {
    /// Use Unicode box-drawing glyphs.
    #[default]
    Unicode,
    /// Use ASCII-only fallbacks (`+`, `-`, `|`).
    Ascii,
}

impl GlyphMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unicode" | "uni" | "u" => Some(Self::Unicode),
            "ascii" | "a" => Some(Self::Ascii),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unicode => "unicode",
            Self::Ascii => "ascii",
        }
    }
}

/// Glyph capability policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphPolicy {
    /// Unicode or ASCII line drawing.
    pub mode: GlyphMode,
    /// Whether heavy box-drawing glyphs (U+250F family) render correctly.
    /// When false, heavy borders fall back to single-line glyphs.
    pub heavy_lines: bool,
}

impl Default for GlyphPolicy {
    fn default() -> Self {
        Self {
            mode: GlyphMode::Unicode,
            heavy_lines: true,
        }
    }
}

impl GlyphPolicy {
    /// ASCII-only policy.
    #[must_use]
    pub const fn ascii() -> Self {
        Self {
            mode: GlyphMode::Ascii,
            heavy_lines: false,
        }
    }

    /// Default policy with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a policy from an arbitrary key lookup (testable without touching
    /// the process environment).
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut policy = Self::default();
        if let Some(mode) = lookup(ENV_GLYPH_MODE).as_deref().and_then(GlyphMode::parse) {
            policy.mode = mode;
        }
        if let Some(heavy) = lookup(ENV_GLYPH_HEAVY).as_deref().and_then(parse_bool) {
            policy.heavy_lines = heavy;
        }
        if policy.mode == GlyphMode::Ascii {
            policy.heavy_lines = false;
        }
        policy
    }

    /// Whether Unicode box drawing is enabled.
    #[must_use]
    pub const fn unicode(&self) -> bool {
        matches!(self.mode, GlyphMode::Unicode)
    }
}

/// Parse a boolean override value.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
