//! Panel driver errors

use inkplane_hal::ConfigError;

use crate::plane::ColorPlane;

/// Errors from panel operations, generic over the transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The serial transport failed
    Transport(E),
    /// The panel has no RAM bank for this plane
    UnsupportedPlane(ColorPlane),
    /// Write does not fit the panel RAM
    SizeMismatch {
        /// Bytes requested, counted from offset 0
        len: usize,
        /// Bytes available
        capacity: usize,
    },
    /// Busy line stayed asserted past the configured poll bound
    Timeout,
    /// Declared planes and RAM write commands disagree
    PlaneMapping,
    /// Invalid bus wiring
    Config(ConfigError),
}

impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl<E> Error<E> {
    /// Check if the error is fatal for this panel instance
    ///
    /// Unsupported planes and oversized writes are rejected per call and
    /// leave the panel usable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::UnsupportedPlane(_) | Error::SizeMismatch { .. })
    }
}
