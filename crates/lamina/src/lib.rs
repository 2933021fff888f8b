#![forbid(unsafe_code)]

//! Lamina public facade crate.
//!
//! Re-exports the types an application needs to create layers, draw into
//! them, and run frames, plus a prelude for glob import.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use lamina_core::geometry::{CellRect, FloatRect};
pub use lamina_core::glyph_policy::{GlyphMode, GlyphPolicy};

// --- Style re-exports ------------------------------------------------------

pub use lamina_style::{Attrs, Color, PairCache, PairId, Rgb, Style};

// --- Render re-exports -----------------------------------------------------

pub use lamina_render::{
    BorderSides, BorderStyle, Cell, Draw, DrawContext, DrawState, GraphemePool, SCISSOR_STACK_MAX,
    Surface,
};

// --- Runtime re-exports ----------------------------------------------------

pub use lamina_runtime::{
    Backend, Clock, Compositor, FrameState, FrameStats, HeadlessBackend, LayerError, LayerId,
    ManualClock, MonotonicClock, Renderer, RendererConfig, TerminalBackend, TerminalSession,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for lamina apps.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while presenting or managing the terminal.
    Io(std::io::Error),
    /// A layer could not be created.
    Layer(LayerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Layer(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Layer(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<LayerError> for Error {
    fn from(err: LayerError) -> Self {
        Self::Layer(err)
    }
}

/// Standard result type for lamina APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Renderer writing to standard output with the system clock.
pub type TerminalRenderer = Renderer<TerminalBackend<std::io::Stdout>, MonotonicClock>;

/// Build a [`TerminalRenderer`] from `config`.
pub fn terminal_renderer(config: RendererConfig) -> TerminalRenderer {
    let sync = config.sync_output;
    Renderer::new(config, TerminalBackend::stdout(sync), MonotonicClock)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BorderSides, BorderStyle, CellRect, Color, Draw, DrawContext, Error, LayerId, Renderer,
        RendererConfig, Result, Style, TerminalSession,
    };

    pub use crate::{core, render, runtime, style};
}

pub use lamina_core as core;
pub use lamina_render as render;
pub use lamina_runtime as runtime;
pub use lamina_style as style;
