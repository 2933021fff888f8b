#![forbid(unsafe_code)]

//! Core: cell geometry, glyph capability policy, and logging macros.

pub mod geometry;
pub mod glyph_policy;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, trace_span, warn};
