//! Palette colors and nearest-index mapping.
//!
//! The target palette is the xterm 256-color layout: 16 system colors, a
//! 6×6×6 color cube at indices 16–231, and a 24-step greyscale ramp at
//! 232–255. RGB input is mapped eagerly and lossily to one of the cube or
//! ramp entries.

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean distance to another color.
    #[must_use]
    pub const fn distance_sq(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// A terminal color: either the terminal's default or a palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's own default foreground/background.
    #[default]
    Default,
    /// Index into the 256-color palette.
    Indexed(u8),
}

impl Color {
    pub const BLACK: Self = Self::Indexed(0);
    pub const RED: Self = Self::Indexed(1);
    pub const GREEN: Self = Self::Indexed(2);
    pub const YELLOW: Self = Self::Indexed(3);
    pub const BLUE: Self = Self::Indexed(4);
    pub const MAGENTA: Self = Self::Indexed(5);
    pub const CYAN: Self = Self::Indexed(6);
    pub const WHITE: Self = Self::Indexed(7);

    /// Map an RGB triple to the nearest palette entry.
    ///
    /// Pure: the same input always yields the same index.
    #[must_use]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Indexed(rgb_to_256(r, g, b))
    }

    /// Use a palette index directly.
    #[must_use]
    pub const fn indexed(index: u8) -> Self {
        Self::Indexed(index)
    }

    /// Palette index, or `None` for the terminal default.
    #[must_use]
    pub const fn index(self) -> Option<u8> {
        match self {
            Self::Default => None,
            Self::Indexed(idx) => Some(idx),
        }
    }

    /// Check whether this is the terminal default.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Approximate RGB value, or `None` for the terminal default.
    #[must_use]
    pub fn to_rgb(self) -> Option<Rgb> {
        self.index().map(ansi256_to_rgb)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self::rgb(rgb.r, rgb.g, rgb.b)
    }
}

const ANSI16_PALETTE: [Rgb; 16] = [
    Rgb::new(0, 0, 0),       // Black
    Rgb::new(205, 0, 0),     // Red
    Rgb::new(0, 205, 0),     // Green
    Rgb::new(205, 205, 0),   // Yellow
    Rgb::new(0, 0, 238),     // Blue
    Rgb::new(205, 0, 205),   // Magenta
    Rgb::new(0, 205, 205),   // Cyan
    Rgb::new(229, 229, 229), // White
    Rgb::new(127, 127, 127), // Bright Black
    Rgb::new(255, 0, 0),     // Bright Red
    Rgb::new(0, 255, 0),     // Bright Green
    Rgb::new(255, 255, 0),   // Bright Yellow
    Rgb::new(92, 92, 255),   // Bright Blue
    Rgb::new(255, 0, 255),   // Bright Magenta
    Rgb::new(0, 255, 255),   // Bright Cyan
    Rgb::new(255, 255, 255), // Bright White
];

/// Channel levels of the 6×6×6 cube.
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// First index of the greyscale ramp.
const GREY_BASE: u8 = 232;

/// Convert an RGB color to the nearest 256-color index.
///
/// Computes the nearest cube color and the nearest greyscale ramp entry
/// independently and returns whichever is closer by squared Euclidean
/// distance. Ties go to the cube.
#[must_use]
pub fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    let target = Rgb::new(r, g, b);

    let (ri, gi, bi) = (cube_index(r), cube_index(g), cube_index(b));
    let cube = 16 + 36 * ri + 6 * gi + bi;
    let cube_rgb = Rgb::new(
        CUBE_LEVELS[ri as usize],
        CUBE_LEVELS[gi as usize],
        CUBE_LEVELS[bi as usize],
    );
    let cube_dist = target.distance_sq(cube_rgb);

    let grey_step = grey_index(r, g, b);
    let level = grey_level(grey_step);
    let grey_dist = target.distance_sq(Rgb::new(level, level, level));

    if grey_dist < cube_dist {
        GREY_BASE + grey_step
    } else {
        cube
    }
}

/// Map a channel to the nearest cube level index.
///
/// The levels are not evenly spaced; the thresholds are the midpoints
/// between adjacent levels (47.5, 115, 155, 195, 235).
fn cube_index(v: u8) -> u8 {
    match v {
        0..=47 => 0,
        48..=114 => 1,
        115..=154 => 2,
        155..=194 => 3,
        195..=234 => 4,
        _ => 5,
    }
}

/// Nearest greyscale ramp step (0–23) for the channel average.
///
/// Ramp entry `k` has level `8 + 10k`.
fn grey_index(r: u8, g: u8, b: u8) -> u8 {
    let avg = (r as i32 + g as i32 + b as i32) / 3;
    (((avg - 3).max(0)) / 10).min(23) as u8
}

const fn grey_level(step: u8) -> u8 {
    8 + 10 * step
}

/// Convert a 256-color index to its RGB representation.
#[must_use]
pub fn ansi256_to_rgb(index: u8) -> Rgb {
    if index < 16 {
        return ANSI16_PALETTE[index as usize];
    }
    if index >= GREY_BASE {
        let level = grey_level(index - GREY_BASE);
        return Rgb::new(level, level, level);
    }
    let idx = index - 16;
    let r = idx / 36;
    let g = (idx / 6) % 6;
    let b = idx % 6;
    Rgb::new(
        CUBE_LEVELS[r as usize],
        CUBE_LEVELS[g as usize],
        CUBE_LEVELS[b as usize],
    )
}
