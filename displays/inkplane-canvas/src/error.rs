//! Canvas errors

use inkplane_drivers::ColorPlane;

/// Errors from canvas operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanvasError {
    /// Raw buffer longer than the plane buffer
    SizeMismatch {
        /// Bytes supplied
        len: usize,
        /// Plane buffer length
        capacity: usize,
    },
    /// The canvas has no buffer for this plane
    UnsupportedPlane(ColorPlane),
    /// Panel geometry needs more bytes per plane than the canvas can hold
    BufferTooSmall {
        /// Bytes per plane required by the geometry
        needed: usize,
        /// Compile-time capacity of each plane buffer
        capacity: usize,
    },
}
