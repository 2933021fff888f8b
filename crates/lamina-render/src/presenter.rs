#![forbid(unsafe_code)]

//! Presenter: state-tracked ANSI emission.
//!
//! Turns a screen diff into terminal output. The presenter tracks the
//! terminal's current pen and cursor so it only emits SGR when the pen
//! changes and only moves the cursor between runs. A whole frame is written
//! into one buffer, optionally bracketed by DEC 2026 synchronized output, and
//! flushed once.
//!
//! Colors come straight from each cell's pen. Pooled grapheme clusters are
//! looked up in the [`GraphemePool`] they were interned in.
//!
//! ```ignore
//! let mut presenter = Presenter::new(std::io::stdout(), true);
//! let diff = BufferDiff::compute(&previous, &screen);
//! presenter.present(&screen, &diff, &state.graphemes)?;
//! ```

use std::io::{self, BufWriter, Write};

use lamina_style::{Attrs, Color};

use crate::ansi;
use crate::cell::Cell;
use crate::diff::BufferDiff;
use crate::grapheme_pool::GraphemePool;
use crate::surface::Surface;

/// Size of the internal write buffer (64KB).
const BUFFER_CAPACITY: usize = 64 * 1024;

/// Resolved pen as last sent to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: Color,
    bg: Color,
    attrs: Attrs,
}

impl CellStyle {
    fn from_cell(cell: &Cell) -> Self {
        Self {
            fg: cell.pen.fg,
            bg: cell.pen.bg,
            attrs: cell.pen.attrs,
        }
    }
}

/// State-tracked ANSI presenter.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    /// Current style state (None = unknown/reset).
    current_style: Option<CellStyle>,
    cursor_x: Option<u16>,
    cursor_y: Option<u16>,
    sync_output: bool,
}

impl<W: Write> Presenter<W> {
    /// Create a presenter; `sync_output` enables DEC 2026 bracketing.
    pub fn new(writer: W, sync_output: bool) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            current_style: None,
            cursor_x: None,
            cursor_y: None,
            sync_output,
        }
    }

    /// Present one frame and flush. Returns the number of cells emitted.
    pub fn present(
        &mut self,
        screen: &Surface,
        diff: &BufferDiff,
        graphemes: &GraphemePool,
    ) -> io::Result<usize> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "present",
            width = screen.width(),
            height = screen.height(),
            changes = diff.len()
        );
        #[cfg(feature = "tracing")]
        let _guard = _span.enter();

        if self.sync_output {
            ansi::sync_begin(&mut self.writer)?;
        }

        let emitted = self.emit_diff(screen, diff, graphemes)?;

        ansi::sgr_reset(&mut self.writer)?;
        self.current_style = None;

        if self.sync_output {
            ansi::sync_end(&mut self.writer)?;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(emitted, "frame presented");
        self.writer.flush()?;
        Ok(emitted)
    }

    fn emit_diff(
        &mut self,
        screen: &Surface,
        diff: &BufferDiff,
        graphemes: &GraphemePool,
    ) -> io::Result<usize> {
        let mut emitted = 0;
        for run in diff.runs() {
            if run.y >= screen.height() {
                continue;
            }
            self.move_cursor_to(run.x0, run.y)?;
            for x in run.x0..=run.x1.min(screen.width().saturating_sub(1)) {
                let cell = screen.get_unchecked(x, run.y);
                if self.emit_cell(cell, graphemes)? {
                    emitted += 1;
                }
            }
        }
        Ok(emitted)
    }

    /// Emit a single cell; continuation cells produce no output.
    ///
    /// A cluster missing from `graphemes` is written as spaces over its
    /// width so the tracked cursor stays correct.
    fn emit_cell(&mut self, cell: &Cell, graphemes: &GraphemePool) -> io::Result<bool> {
        if cell.is_continuation() {
            return Ok(false);
        }

        self.emit_style_changes(CellStyle::from_cell(cell))?;

        if let Some(id) = cell.content.grapheme_id() {
            match graphemes.get(id) {
                Some(text) => self.writer.write_all(text.as_bytes())?,
                None => {
                    for _ in 0..cell.width_hint() {
                        self.writer.write_all(b" ")?;
                    }
                }
            }
        } else {
            match cell.content.as_char() {
                Some(ch) => {
                    let mut buf = [0u8; 4];
                    self.writer.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
                }
                None => self.writer.write_all(b" ")?,
            }
        }

        if let Some(x) = self.cursor_x {
            self.cursor_x = Some(x.saturating_add(cell.width_hint() as u16));
        }
        Ok(true)
    }

    /// Reset and re-apply the pen when it differs from the terminal's.
    fn emit_style_changes(&mut self, style: CellStyle) -> io::Result<()> {
        if self.current_style == Some(style) {
            return Ok(());
        }
        ansi::sgr_reset(&mut self.writer)?;
        if !style.fg.is_default() {
            ansi::sgr_fg(&mut self.writer, style.fg)?;
        }
        if !style.bg.is_default() {
            ansi::sgr_bg(&mut self.writer, style.bg)?;
        }
        ansi::sgr_attrs(&mut self.writer, style.attrs)?;
        self.current_style = Some(style);
        Ok(())
    }

    fn move_cursor_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        if self.cursor_x == Some(x) && self.cursor_y == Some(y) {
            return Ok(());
        }
        ansi::cup(&mut self.writer, y, x)?;
        self.cursor_x = Some(x);
        self.cursor_y = Some(y);
        Ok(())
    }

    /// Clear the entire screen and home the cursor.
    pub fn clear_screen(&mut self) -> io::Result<()> {
        ansi::sgr_reset(&mut self.writer)?;
        ansi::erase_display(&mut self.writer)?;
        ansi::cup(&mut self.writer, 0, 0)?;
        self.current_style = None;
        self.cursor_x = Some(0);
        self.cursor_y = Some(0);
        self.writer.flush()
    }

    /// Forget the tracked cursor and pen, forcing explicit output next frame.
    pub fn invalidate_state(&mut self) {
        self.current_style = None;
        self.cursor_x = None;
        self.cursor_y = None;
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }

    /// Get the inner writer (consuming the presenter).
    ///
    /// Flushes any buffered data before returning the writer.
    pub fn into_inner(self) -> Result<W, io::Error> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::other(e.to_string()))
    }
}
