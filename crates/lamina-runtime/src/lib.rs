#![forbid(unsafe_code)]

//! Runtime: layers, compositing, and the frame pipeline.
//!
//! A [`Renderer`] owns a [`Compositor`] of z-ordered layers, the composited
//! screen, and a [`Backend`]. Each frame runs `begin` → draw → `end`, and
//! `end` performs exactly one physical update.
//!
//! ```ignore
//! let mut renderer = Renderer::new(
//!     RendererConfig::from_env(),
//!     TerminalBackend::stdout(true),
//!     MonotonicClock,
//! );
//! let panel = renderer.create_layer("panel", 4, 2, 20, 6)?;
//! renderer.begin();
//! if let Some(mut ctx) = renderer.draw_context(panel) {
//!     ctx.reset_scissor();
//!     ctx.border_rect(ctx.area(), BorderStyle::Rounded, Style::DEFAULT);
//! }
//! renderer.end()?;
//! ```

pub mod backend;
pub mod clock;
pub mod compositor;
pub mod config;
pub mod error;
pub mod frame;
pub mod layer;
pub mod session;

pub use backend::{Backend, HeadlessBackend, TerminalBackend};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use compositor::Compositor;
pub use config::{DEFAULT_MAX_LAYER_CELLS, DEFAULT_MAX_LAYERS, RendererConfig};
pub use error::LayerError;
pub use frame::{BACKGROUND_LAYER, FrameState, FrameStats, Renderer};
pub use layer::{Layer, LayerId};
pub use session::TerminalSession;
