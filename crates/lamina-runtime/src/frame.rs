#![forbid(unsafe_code)]

//! Frame pipeline.
//!
//! [`Renderer`] sequences one frame as `begin` → drawing → `end`:
//!
//! 1. `begin` updates timing, keeps the background layer sized to the
//!    screen, and erases every layer that is both dirty and visible.
//! 2. Drawing goes through [`Renderer::draw_context`]; each write marks the
//!    layer dirty.
//! 3. `end` composites visible layers in z-order into the screen surface,
//!    diffs it against the last presented screen, and hands the result to
//!    the backend in one present.
//!
//! A layer drawn in frame N stays dirty and is erased at the start of frame
//! N+1, so its content lasts one frame. A layer left clean (never drawn, or
//! released with [`Compositor::mark_clean`]) keeps its content for as long
//! as nothing draws into it.

use std::io;
use std::time::Instant;

use lamina_render::{BufferDiff, DrawContext, DrawState, Surface};

use crate::backend::Backend;
use crate::clock::Clock;
use crate::compositor::Compositor;
use crate::config::RendererConfig;
use crate::error::LayerError;
use crate::layer::LayerId;

/// Name of the default fullscreen layer.
pub const BACKGROUND_LAYER: &str = "background";

/// Per-frame timing and pipeline state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameState {
    /// Frames begun since the renderer was created.
    pub frame_count: u64,
    /// Seconds between the last two `begin` calls (0 on the first frame).
    pub delta_time: f32,
    /// `1 / delta_time`, or 0 when no time has passed.
    pub fps: f32,
    /// Whether a frame is in progress.
    pub in_frame: bool,
}

/// Counters from the most recent frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Layers erased by the last `begin`.
    pub layers_cleared: usize,
    /// Cells emitted by the last present.
    pub cells_emitted: usize,
    /// Whether the last present repainted the whole screen.
    pub full_repaint: bool,
}

/// Owns the compositor, the screens, and the backend.
pub struct Renderer<B: Backend, C: Clock> {
    config: RendererConfig,
    compositor: Compositor,
    backend: B,
    clock: C,
    /// Last presented screen.
    prev: Surface,
    /// Screen being composited.
    screen: Surface,
    frame: FrameState,
    stats: FrameStats,
    last_begin: Option<Instant>,
    background: Option<LayerId>,
    force_full: bool,
}

impl<B: Backend, C: Clock> Renderer<B, C> {
    /// Create a renderer. No layers exist yet; the background layer is
    /// created on the first [`Renderer::begin`], once a screen size is known.
    pub fn new(config: RendererConfig, backend: B, clock: C) -> Self {
        let (width, height) = config.forced_size.unwrap_or((1, 1));
        Self {
            compositor: Compositor::new(&config),
            config,
            backend,
            clock,
            prev: Surface::new(width, height),
            screen: Surface::new(width, height),
            frame: FrameState::default(),
            stats: FrameStats::default(),
            last_begin: None,
            background: None,
            force_full: true,
        }
    }

    /// Start a frame.
    ///
    /// Calling `begin` inside a frame is a caller bug: it asserts in debug
    /// builds and is ignored otherwise.
    pub fn begin(&mut self) {
        if self.frame.in_frame {
            debug_assert!(false, "begin called while a frame is in progress");
            lamina_core::error!("begin called while a frame is in progress; ignored");
            return;
        }

        let now = self.clock.now();
        match self.last_begin {
            Some(prev) => {
                let dt = now.saturating_duration_since(prev).as_secs_f32();
                self.frame.delta_time = dt;
                self.frame.fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
            }
            None => {
                self.frame.delta_time = 0.0;
                self.frame.fps = 0.0;
            }
        }
        self.last_begin = Some(now);
        self.frame.frame_count += 1;

        self.sync_screen_size();
        self.ensure_background();

        let cleared = self.compositor.clear_dirty_layers();
        self.stats.layers_cleared = cleared;
        self.frame.in_frame = true;

        lamina_core::trace!(
            frame = self.frame.frame_count,
            cleared,
            dt = self.frame.delta_time,
            "frame begin"
        );
    }

    /// Finish the frame: composite, diff, and present once.
    ///
    /// Calling `end` outside a frame is a caller bug: it asserts in debug
    /// builds and returns `Ok(())` otherwise.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the backend. The frame is closed either
    /// way, and the next frame repaints in full.
    pub fn end(&mut self) -> io::Result<()> {
        if !self.frame.in_frame {
            debug_assert!(false, "end called without begin");
            lamina_core::error!("end called without begin; ignored");
            return Ok(());
        }
        self.frame.in_frame = false;

        self.compositor.composite(&mut self.screen);

        let full = self.force_full;
        let diff = if full {
            BufferDiff::full(self.screen.width(), self.screen.height())
        } else {
            BufferDiff::compute(&self.prev, &self.screen)
        };

        let result = self
            .backend
            .present(&self.screen, &diff, &self.compositor.state().graphemes);
        std::mem::swap(&mut self.prev, &mut self.screen);

        match result {
            Ok(emitted) => {
                self.force_full = false;
                self.stats.cells_emitted = emitted;
                self.stats.full_repaint = full;
                lamina_core::trace!(
                    frame = self.frame.frame_count,
                    emitted,
                    full,
                    "frame end"
                );
                Ok(())
            }
            Err(err) => {
                self.force_full = true;
                self.stats.cells_emitted = 0;
                lamina_core::warn!(error = %err, "present failed");
                Err(err)
            }
        }
    }

    /// Mark every layer dirty and repaint the whole screen next frame.
    pub fn invalidate_all(&mut self) {
        self.compositor.invalidate_all();
        self.force_full = true;
    }

    /// Create a layer (see [`Compositor::create`]).
    pub fn create_layer(
        &mut self,
        name: &str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<LayerId, LayerError> {
        self.compositor.create(name, x, y, width, height)
    }

    /// Draw context for a layer (scissor not reset).
    pub fn draw_context(&mut self, id: LayerId) -> Option<DrawContext<'_>> {
        self.compositor.draw_context(id)
    }

    /// The default fullscreen layer, once the first frame has begun.
    pub fn background(&self) -> Option<LayerId> {
        self.background.filter(|id| self.compositor.is_alive(*id))
    }

    #[inline]
    pub fn frame_state(&self) -> FrameState {
        self.frame
    }

    #[inline]
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    #[inline]
    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    #[inline]
    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    #[inline]
    pub fn state(&self) -> &DrawState {
        self.compositor.state()
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Size of the composited screen.
    #[inline]
    pub fn screen_size(&self) -> (u16, u16) {
        (self.screen.width(), self.screen.height())
    }

    /// The last presented screen.
    #[inline]
    pub fn last_frame(&self) -> &Surface {
        &self.prev
    }

    fn query_size(&self) -> (u16, u16) {
        if let Some(size) = self.config.forced_size {
            return size;
        }
        match self.backend.size() {
            Ok((w, h)) => (w.max(1), h.max(1)),
            Err(_err) => {
                lamina_core::warn!(error = %_err, "screen size query failed");
                (self.screen.width(), self.screen.height())
            }
        }
    }

    fn sync_screen_size(&mut self) {
        let (width, height) = self.query_size();
        if (width, height) == self.screen_size() {
            return;
        }
        lamina_core::debug!(width, height, "screen resized");
        self.screen.resize(width, height);
        self.prev.resize(width, height);
        if let Some(id) = self.background() {
            self.compositor
                .resize(id, i32::from(width), i32::from(height));
        }
        self.invalidate_all();
    }

    fn ensure_background(&mut self) {
        if self.background().is_some() {
            return;
        }
        let (width, height) = self.screen_size();
        match self
            .compositor
            .create(BACKGROUND_LAYER, 0, 0, i32::from(width), i32::from(height))
        {
            Ok(id) => {
                self.compositor.lower(id);
                self.background = Some(id);
            }
            Err(_err) => {
                lamina_core::warn!(error = %_err, "background layer unavailable");
            }
        }
    }
}
