//! Display model registry
//!
//! Maps a model identifier to a concrete driver. [`Panel`] is a closed enum
//! over every supported driver so callers can hold "some panel" without
//! generics over the driver type.

use inkplane_hal::{DelayNs, SerialTransport};

use crate::busy::BusyWait;
use crate::display::EpaperDisplay;
use crate::error::Error;
use crate::panel::qyeg0213rws800::{self, Qyeg0213Rws800};
use crate::plane::{ColorPlane, PlaneSet};
use crate::state::PanelState;

/// Supported panel models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayModel {
    /// Heltec 2.13" black/white/red, 122x250
    Qyeg0213Rws800,
}

impl DisplayModel {
    /// Every registered model
    pub const ALL: [DisplayModel; 1] = [DisplayModel::Qyeg0213Rws800];

    /// Model name as printed on the panel flex
    pub const fn name(self) -> &'static str {
        match self {
            DisplayModel::Qyeg0213Rws800 => "QYEG0213RWS800",
        }
    }

    /// Look a model up by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|model| model.name().eq_ignore_ascii_case(name))
    }

    /// Native resolution as (width, height)
    pub const fn resolution(self) -> (u16, u16) {
        match self {
            DisplayModel::Qyeg0213Rws800 => (qyeg0213rws800::WIDTH, qyeg0213rws800::HEIGHT),
        }
    }
}

/// Construct the driver for `model` with the default busy policy
///
/// The panel is not initialized; no bus traffic happens here.
pub fn connect<T, D>(model: DisplayModel, transport: T, delay: D) -> Result<Panel<T, D>, Error<T::Error>>
where
    T: SerialTransport,
    D: DelayNs,
{
    connect_with_busy_wait(model, transport, delay, BusyWait::default())
}

/// Construct the driver for `model` with a custom busy policy
pub fn connect_with_busy_wait<T, D>(
    model: DisplayModel,
    transport: T,
    delay: D,
    busy: BusyWait,
) -> Result<Panel<T, D>, Error<T::Error>>
where
    T: SerialTransport,
    D: DelayNs,
{
    match model {
        DisplayModel::Qyeg0213Rws800 => {
            Qyeg0213Rws800::with_busy_wait(transport, delay, busy).map(Panel::Qyeg0213Rws800)
        }
    }
}

/// Any supported panel driver
pub enum Panel<T, D> {
    /// QYEG0213RWS800 driver
    Qyeg0213Rws800(Qyeg0213Rws800<T, D>),
}

impl<T, D> Panel<T, D> {
    /// Model this panel was constructed for
    pub fn model(&self) -> DisplayModel {
        match self {
            Panel::Qyeg0213Rws800(_) => DisplayModel::Qyeg0213Rws800,
        }
    }
}

impl<T, D> Panel<T, D>
where
    T: SerialTransport,
    D: DelayNs,
{
    /// Release the transport and delay
    pub fn release(self) -> (T, D) {
        match self {
            Panel::Qyeg0213Rws800(panel) => panel.release(),
        }
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        match self {
            Panel::Qyeg0213Rws800(panel) => panel.transport(),
        }
    }
}

macro_rules! delegate {
    ($self:ident, $panel:ident => $body:expr) => {
        match $self {
            Panel::Qyeg0213Rws800($panel) => $body,
        }
    };
}

impl<T, D> EpaperDisplay for Panel<T, D>
where
    T: SerialTransport,
    D: DelayNs,
{
    type Error = Error<T::Error>;

    fn width(&self) -> u16 {
        delegate!(self, p => p.width())
    }

    fn height(&self) -> u16 {
        delegate!(self, p => p.height())
    }

    fn bits_per_pixel(&self) -> u8 {
        delegate!(self, p => p.bits_per_pixel())
    }

    fn supported_planes(&self) -> PlaneSet {
        delegate!(self, p => p.supported_planes())
    }

    fn state(&self) -> PanelState {
        delegate!(self, p => p.state())
    }

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        delegate!(self, p => p.is_ready())
    }

    fn initialize(&mut self) -> Result<(), Self::Error> {
        delegate!(self, p => p.initialize())
    }

    fn power_on_reset(&mut self) -> Result<(), Self::Error> {
        delegate!(self, p => p.power_on_reset())
    }

    fn set_pixels(
        &mut self,
        plane: ColorPlane,
        bytes: &[u8],
        start_offset: usize,
    ) -> Result<(), Self::Error> {
        delegate!(self, p => p.set_pixels(plane, bytes, start_offset))
    }

    fn refresh(&mut self) -> Result<(), Self::Error> {
        delegate!(self, p => p.refresh())
    }

    fn enter_deep_sleep(&mut self) -> Result<(), Self::Error> {
        delegate!(self, p => p.enter_deep_sleep())
    }

    fn exit_deep_sleep(&mut self) -> Result<(), Self::Error> {
        delegate!(self, p => p.exit_deep_sleep())
    }

    fn wait_until_ready(&mut self) -> Result<(), Self::Error> {
        delegate!(self, p => p.wait_until_ready())
    }
}
