#![forbid(unsafe_code)]

//! Error types for layer management.

use std::fmt;

use lamina_render::Surface;

/// Why a layer could not be created.
///
/// A failed create is an expected outcome the caller handles, not a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerError {
    /// Every registry slot is occupied.
    RegistryFull { capacity: usize },
    /// Width or height was zero or negative.
    InvalidSize { width: i32, height: i32 },
    /// A dimension does not fit a surface.
    SurfaceTooLarge { width: i32, height: i32 },
    /// The surface's cells exceed the per-layer budget or could not be
    /// allocated.
    AllocationFailed { width: i32, height: i32 },
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistryFull { capacity } => {
                write!(f, "layer registry is full ({capacity} layers)")
            }
            Self::InvalidSize { width, height } => {
                write!(f, "invalid layer size {width}x{height}")
            }
            Self::SurfaceTooLarge { width, height } => {
                write!(f, "layer size {width}x{height} exceeds surface limits")
            }
            Self::AllocationFailed { width, height } => {
                write!(f, "could not allocate a {width}x{height} layer surface")
            }
        }
    }
}

impl std::error::Error for LayerError {}

/// Validate requested layer dimensions and narrow them to surface units.
pub(crate) fn surface_size(width: i32, height: i32) -> Result<(u16, u16), LayerError> {
    if width <= 0 || height <= 0 {
        return Err(LayerError::InvalidSize { width, height });
    }
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(LayerError::SurfaceTooLarge { width, height }),
    }
}

/// Allocate a blank surface of `width` x `height` cells, refusing sizes
/// over `max_cells` before touching the allocator.
pub(crate) fn alloc_surface(
    width: u16,
    height: u16,
    max_cells: usize,
) -> Result<Surface, LayerError> {
    let failed = LayerError::AllocationFailed {
        width: i32::from(width),
        height: i32::from(height),
    };
    if usize::from(width) * usize::from(height) > max_cells {
        return Err(failed);
    }
    Surface::try_new(width, height).map_err(|_err| {
        lamina_core::warn!(width, height, error = %_err, "surface allocation failed");
        failed
    })
}
