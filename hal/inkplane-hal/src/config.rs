//! Bus wiring configuration
//!
//! Describes which SPI controller and GPIO pins connect the MCU to the
//! panel. Every field is checked against the RP2040 pin mux before any pin
//! is configured, so a bad wiring description fails at startup instead of
//! producing a silently blank panel.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of user GPIOs on the RP2040
pub const GPIO_COUNT: u8 = 30;

/// Chip-select pins that cannot drive the panel on SPI0
///
/// These are the controller's hardware CSn outputs, which the PL022 drives
/// itself instead of leaving them to the per-byte chip-select discipline.
pub const FORBIDDEN_CS_SPI0: [u8; 3] = [1, 5, 17];

/// Chip-select pins that cannot drive the panel on SPI1
pub const FORBIDDEN_CS_SPI1: [u8; 2] = [9, 13];

/// Configuration errors, raised before any hardware I/O
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// SPI controller id is not 0 or 1
    InvalidBus(u8),
    /// Pin number out of range (0-29 valid)
    InvalidPin(u8),
    /// Chip-select pin is electrically unusable on this bus
    ForbiddenChipSelect {
        /// SPI controller id
        bus: u8,
        /// Rejected pin
        pin: u8,
    },
    /// Pin cannot carry the requested SPI function for this bus
    PinFunctionMismatch {
        /// SPI controller id
        bus: u8,
        /// Rejected pin
        pin: u8,
        /// Function the pin was assigned
        function: PinFunction,
    },
    /// The same pin is assigned to two signals
    PinConflict(u8),
    /// Baud rate of zero
    InvalidBaudRate,
}

/// SPI signal a pin can be muxed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinFunction {
    /// Serial clock
    Sck,
    /// Controller-out data (MOSI)
    Tx,
}

impl PinFunction {
    /// Position of this function within a 4-pin SPI group (RX, CSn, SCK, TX)
    const fn slot(self) -> u8 {
        match self {
            PinFunction::Sck => 2,
            PinFunction::Tx => 3,
        }
    }

    /// Check whether `pin` can carry this function on `bus`
    ///
    /// SPI functions repeat every four pins, and the controller alternates
    /// every eight: GPIO 0-7 are SPI0, 8-15 SPI1, 16-23 SPI0, 24-29 SPI1.
    pub const fn available_on(self, bus: u8, pin: u8) -> bool {
        pin < GPIO_COUNT && pin % 4 == self.slot() && (pin / 8) % 2 == bus
    }
}

/// Wiring between the MCU and one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// SPI controller id (0 or 1)
    pub bus: u8,
    /// MOSI pin
    pub tx_pin: u8,
    /// Clock pin
    pub sck_pin: u8,
    /// Chip-select pin (driven as plain GPIO)
    pub cs_pin: u8,
    /// Data/command select pin
    pub dc_pin: u8,
    /// Busy input pin
    pub busy_pin: u8,
    /// SPI clock frequency in Hz
    pub baud_hz: u32,
}

impl SerialConfig {
    /// Raspberry Pi Pico wired to a Heltec 2.13" panel
    pub const PICO_DEFAULT: Self = Self {
        bus: 0,
        tx_pin: 19,
        sck_pin: 18,
        cs_pin: 20,
        dc_pin: 14,
        busy_pin: 15,
        baud_hz: 2_000_000,
    };

    /// Check the wiring against the RP2040 pin mux
    pub fn validate(&self) -> Result<(), ConfigError> {
        let forbidden: &[u8] = match self.bus {
            0 => &FORBIDDEN_CS_SPI0,
            1 => &FORBIDDEN_CS_SPI1,
            other => return Err(ConfigError::InvalidBus(other)),
        };

        let pins = self.pins();
        if let Some(&pin) = pins.iter().find(|&&p| p >= GPIO_COUNT) {
            return Err(ConfigError::InvalidPin(pin));
        }

        if forbidden.contains(&self.cs_pin) {
            return Err(ConfigError::ForbiddenChipSelect {
                bus: self.bus,
                pin: self.cs_pin,
            });
        }

        for (pin, function) in [(self.sck_pin, PinFunction::Sck), (self.tx_pin, PinFunction::Tx)] {
            if !function.available_on(self.bus, pin) {
                return Err(ConfigError::PinFunctionMismatch {
                    bus: self.bus,
                    pin,
                    function,
                });
            }
        }

        for (i, pin) in pins.iter().enumerate() {
            if pins[i + 1..].contains(pin) {
                return Err(ConfigError::PinConflict(*pin));
            }
        }

        if self.baud_hz == 0 {
            return Err(ConfigError::InvalidBaudRate);
        }

        Ok(())
    }

    /// All assigned pins, in field order
    pub const fn pins(&self) -> [u8; 5] {
        [
            self.tx_pin,
            self.sck_pin,
            self.cs_pin,
            self.dc_pin,
            self.busy_pin,
        ]
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::PICO_DEFAULT
    }
}

impl fmt::Display for SerialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Serial Info: spi={} baud={}Hz tx={} sck={} cs={} dc={} busy={}",
            self.bus,
            self.baud_hz,
            self.tx_pin,
            self.sck_pin,
            self.cs_pin,
            self.dc_pin,
            self.busy_pin
        )
    }
}
