#![forbid(unsafe_code)]

//! Style: palette colors, text attributes, and color-pair handles.
//!
//! Colors are resolved to a 256-entry palette index when they are created,
//! never at draw time. A [`Style`] bundles foreground, background, and
//! attributes as a plain copyable value; the [`PairCache`] turns a
//! foreground/background combination into the compact [`PairId`] that cells
//! record next to their resolved colors.

pub mod color;
pub mod pairs;
pub mod style;

pub use color::{Color, Rgb, ansi256_to_rgb, rgb_to_256};
pub use pairs::{DEFAULT_PAIR_CAPACITY, PairCache, PairId, PairStats};
pub use style::{Attrs, Style};
