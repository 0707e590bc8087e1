//! Panel driver trait
//!
//! Capability interface shared by every concrete e-paper panel. The canvas
//! and application code only ever talk to a panel through this trait.

use crate::plane::{ColorPlane, PlaneSet};
use crate::state::PanelState;

/// Electrophoretic display panel
///
/// Writing RAM ([`set_pixels`](Self::set_pixels)) never changes the visible
/// image; only [`refresh`](Self::refresh) does.
pub trait EpaperDisplay {
    /// Error type for panel operations
    type Error;

    /// Native width in pixels
    fn width(&self) -> u16;

    /// Native height in pixels
    fn height(&self) -> u16;

    /// Bits per pixel in each RAM plane
    fn bits_per_pixel(&self) -> u8 {
        1
    }

    /// Planes this panel has RAM banks for (fixed for the panel's lifetime)
    fn supported_planes(&self) -> PlaneSet;

    /// Current lifecycle state
    fn state(&self) -> PanelState;

    /// Check if the panel is accepting commands (busy line not asserted)
    fn is_ready(&mut self) -> Result<bool, Self::Error>;

    /// Bring the panel from power-on to ready
    ///
    /// A second call after success is a no-op. On failure the panel is left
    /// uninitialized and the error is returned without retrying.
    fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Soft-reset the controller, waiting for busy before and after
    fn power_on_reset(&mut self) -> Result<(), Self::Error>;

    /// Write `bytes` into the RAM bank of `plane`, starting at byte `start_offset`
    fn set_pixels(
        &mut self,
        plane: ColorPlane,
        bytes: &[u8],
        start_offset: usize,
    ) -> Result<(), Self::Error>;

    /// Redraw the physical display from RAM
    fn refresh(&mut self) -> Result<(), Self::Error>;

    /// Enter deep sleep
    fn enter_deep_sleep(&mut self) -> Result<(), Self::Error>;

    /// Leave deep sleep
    fn exit_deep_sleep(&mut self) -> Result<(), Self::Error>;

    /// Block until the busy line is released
    fn wait_until_ready(&mut self) -> Result<(), Self::Error>;
}

/// Bytes needed for one row of `width` pixels at one bit per pixel
pub const fn bytes_per_row(width: u16) -> usize {
    (width as usize).div_ceil(8)
}

/// Bytes needed for one full plane of `width` x `height` pixels
pub const fn plane_len(width: u16, height: u16) -> usize {
    bytes_per_row(width) * height as usize
}
