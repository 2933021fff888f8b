#![forbid(unsafe_code)]

//! ANSI escape sequence generation helpers.
//!
//! Pure byte-generation functions with no state tracking; the presenter
//! decides when to call them.
//!
//! | Category | Sequence | Description |
//! |----------|----------|-------------|
//! | CSI | `ESC [ n m` | SGR (Select Graphic Rendition) |
//! | CSI | `ESC [ 38;5;n m` | 256-color foreground |
//! | CSI | `ESC [ row ; col H` | CUP (Cursor Position, 1-indexed) |
//! | CSI | `ESC [ 2 J` | ED (Erase Display) |
//! | CSI | `ESC [ ? 2026 h/l` | Synchronized Output (DEC) |

use std::io::{self, Write};

use lamina_style::{Attrs, Color};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

/// Write SGR reset sequence.
#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// Ordered table of (attribute, SGR on-code).
pub const ATTR_TABLE: [(Attrs, u8); 5] = [
    (Attrs::BOLD, 1),
    (Attrs::DIM, 2),
    (Attrs::ITALIC, 3),
    (Attrs::UNDERLINE, 4),
    (Attrs::REVERSE, 7),
];

/// Write one SGR sequence enabling every attribute in `attrs`.
///
/// Emits nothing for an empty set. Does not reset first.
pub fn sgr_attrs<W: Write>(w: &mut W, attrs: Attrs) -> io::Result<()> {
    if attrs.is_empty() {
        return Ok(());
    }
    let mut buf = [0u8; 16];
    buf[0] = 0x1b;
    buf[1] = b'[';
    let mut idx = 2;
    for (attr, code) in ATTR_TABLE {
        if attrs.contains(attr) {
            if idx > 2 {
                buf[idx] = b';';
                idx += 1;
            }
            buf[idx] = b'0' + code;
            idx += 1;
        }
    }
    buf[idx] = b'm';
    idx += 1;
    w.write_all(&buf[..idx])
}

/// Write SGR sequence for 256-color foreground: `CSI 38;5;n m`
#[inline]
pub fn sgr_fg_256<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    write!(w, "\x1b[38;5;{index}m")
}

/// Write SGR sequence for 256-color background: `CSI 48;5;n m`
#[inline]
pub fn sgr_bg_256<W: Write>(w: &mut W, index: u8) -> io::Result<()> {
    write!(w, "\x1b[48;5;{index}m")
}

/// Foreground color; the terminal default emits `CSI 39 m`.
pub fn sgr_fg<W: Write>(w: &mut W, color: Color) -> io::Result<()> {
    match color {
        Color::Default => w.write_all(b"\x1b[39m"),
        Color::Indexed(idx) => sgr_fg_256(w, idx),
    }
}

/// Background color; the terminal default emits `CSI 49 m`.
pub fn sgr_bg<W: Write>(w: &mut W, color: Color) -> io::Result<()> {
    match color {
        Color::Default => w.write_all(b"\x1b[49m"),
        Color::Indexed(idx) => sgr_bg_256(w, idx),
    }
}

/// Cursor position (0-indexed input, emitted 1-indexed).
#[inline]
pub fn cup<W: Write>(w: &mut W, row: u16, col: u16) -> io::Result<()> {
    write!(
        w,
        "\x1b[{};{}H",
        row.saturating_add(1),
        col.saturating_add(1)
    )
}

/// Erase the entire display: `CSI 2 J`
#[inline]
pub fn erase_display<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Begin synchronized output: `CSI ? 2026 h`
pub const SYNC_BEGIN: &[u8] = b"\x1b[?2026h";

/// End synchronized output: `CSI ? 2026 l`
pub const SYNC_END: &[u8] = b"\x1b[?2026l";

#[inline]
pub fn sync_begin<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SYNC_BEGIN)
}

#[inline]
pub fn sync_end<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SYNC_END)
}
