#![forbid(unsafe_code)]

//! Output backends.
//!
//! A [`Backend`] reports the screen size and performs the single physical
//! update per frame. [`TerminalBackend`] writes ANSI through a
//! [`Presenter`]; [`HeadlessBackend`] records frames as text for tests and
//! offscreen runs.

use std::io::{self, Write};

use lamina_render::{BufferDiff, GraphemePool, Presenter, Surface};

/// Physical output target for composited frames.
pub trait Backend {
    /// Current screen size in cells `(width, height)`.
    fn size(&self) -> io::Result<(u16, u16)>;

    /// Write the changed cells of `screen` and flush once.
    ///
    /// Pooled clusters in `screen` resolve through `graphemes`. Returns the
    /// number of cells emitted.
    fn present(
        &mut self,
        screen: &Surface,
        diff: &BufferDiff,
        graphemes: &GraphemePool,
    ) -> io::Result<usize>;
}

/// ANSI terminal backend; the size comes from the controlling terminal.
pub struct TerminalBackend<W: Write> {
    presenter: Presenter<W>,
}

impl TerminalBackend<io::Stdout> {
    /// Backend writing to standard output.
    pub fn stdout(sync_output: bool) -> Self {
        Self::new(io::stdout(), sync_output)
    }
}

impl<W: Write> TerminalBackend<W> {
    pub fn new(writer: W, sync_output: bool) -> Self {
        Self {
            presenter: Presenter::new(writer, sync_output),
        }
    }

    /// Clear the physical screen and forget the tracked terminal state.
    pub fn clear(&mut self) -> io::Result<()> {
        self.presenter.clear_screen()
    }

    pub fn presenter(&self) -> &Presenter<W> {
        &self.presenter
    }
}

impl<W: Write> Backend for TerminalBackend<W> {
    fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    fn present(
        &mut self,
        screen: &Surface,
        diff: &BufferDiff,
        graphemes: &GraphemePool,
    ) -> io::Result<usize> {
        self.presenter.present(screen, diff, graphemes)
    }
}

/// In-memory backend with a fixed, settable size.
///
/// Every present snapshots the whole screen as text rows, so tests can assert
/// on what a terminal would show.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    width: u16,
    height: u16,
    rows: Vec<String>,
    presents: usize,
    last_changes: usize,
}

impl HeadlessBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            rows: Vec::new(),
            presents: 0,
            last_changes: 0,
        }
    }

    /// Change the reported size, as if the terminal was resized.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Screen rows as of the last present.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of presents performed.
    pub fn present_count(&self) -> usize {
        self.presents
    }

    /// Number of changed cells in the last presented diff.
    pub fn last_changes(&self) -> usize {
        self.last_changes
    }
}

impl Backend for HeadlessBackend {
    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn present(
        &mut self,
        screen: &Surface,
        diff: &BufferDiff,
        graphemes: &GraphemePool,
    ) -> io::Result<usize> {
        self.rows = (0..screen.height())
            .map(|y| screen.row_text(y, graphemes))
            .collect();
        self.presents += 1;
        self.last_changes = diff.len();
        Ok(diff.len())
    }
}
