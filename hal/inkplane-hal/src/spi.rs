//! SPI bus binding
//!
//! Clock configuration types plus [`SpiTransport`], which implements the
//! [`SerialTransport`] contract on top of embedded-hal 1.0 traits so any
//! chip HAL (embassy-rp, rp2040-hal, linux-embedded-hal) can drive a panel.

use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use crate::config::SerialConfig;
use crate::transport::{FrameMode, SerialTransport};

/// Clock settings the panel bus has to be opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock level between transfers
    pub polarity: Polarity,
    /// Clock edge the panel samples MOSI on
    pub phase: Phase,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 2_000_000, // 2 MHz
            polarity: Polarity::IdleLow,
            phase: Phase::CaptureOnFirstTransition,
        }
    }
}

impl SpiConfig {
    /// SPI mode 0 at the wiring's baud rate
    ///
    /// The controller samples on the rising edge with the clock idling low.
    /// Bytes are always sent MSB first.
    pub fn for_panel(config: &SerialConfig) -> Self {
        Self {
            frequency: config.baud_hz,
            ..Self::default()
        }
    }
}

/// Clock level between transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    IdleLow,
    IdleHigh,
}

/// Sampling edge relative to the start of a bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Leading edge
    CaptureOnFirstTransition,
    /// Trailing edge
    CaptureOnSecondTransition,
}

/// Errors from the embedded-hal backed transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// SPI bus error
    Spi(spi::ErrorKind),
    /// GPIO error on chip-select, data/command or busy
    Pin(digital::ErrorKind),
}

fn spi_err<E: spi::Error>(e: E) -> TransportError {
    TransportError::Spi(e.kind())
}

fn pin_err<E: digital::Error>(e: E) -> TransportError {
    TransportError::Pin(e.kind())
}

/// Panel transport over an SPI bus and three GPIOs
///
/// - `cs`: chip-select, active low
/// - `dc`: data/command select, high for data
/// - `busy`: panel busy output, high while busy
///
/// The bus must already be configured for mode 0, MSB first (see
/// [`SpiConfig::for_panel`]).
pub struct SpiTransport<SPI, CS, DC, BUSY> {
    spi: SPI,
    cs: CS,
    dc: DC,
    busy: BUSY,
}

impl<SPI, CS, DC, BUSY> SpiTransport<SPI, CS, DC, BUSY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    BUSY: InputPin,
{
    /// Create a transport, leaving chip-select deasserted and command mode set
    pub fn new(spi: SPI, mut cs: CS, mut dc: DC, busy: BUSY) -> Result<Self, TransportError> {
        cs.set_high().map_err(pin_err)?;
        dc.set_low().map_err(pin_err)?;
        Ok(Self { spi, cs, dc, busy })
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, CS, DC, BUSY) {
        (self.spi, self.cs, self.dc, self.busy)
    }
}

impl<SPI, CS, DC, BUSY> SerialTransport for SpiTransport<SPI, CS, DC, BUSY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    BUSY: InputPin,
{
    type Error = TransportError;

    fn select(&mut self, enable: bool) -> Result<(), Self::Error> {
        if enable {
            self.cs.set_low().map_err(pin_err)
        } else {
            // Chip-select must not rise while the last byte is still shifting out
            self.spi.flush().map_err(spi_err)?;
            self.cs.set_high().map_err(pin_err)
        }
    }

    fn set_mode(&mut self, mode: FrameMode) -> Result<(), Self::Error> {
        match mode {
            FrameMode::Command => self.dc.set_low().map_err(pin_err),
            FrameMode::Data => self.dc.set_high().map_err(pin_err),
        }
    }

    fn is_busy(&mut self) -> Result<bool, Self::Error> {
        self.busy.is_high().map_err(pin_err)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.spi.write(bytes).map_err(spi_err)?;
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::vec::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Wire {
        Cs(bool),
        Dc(bool),
        Spi(u8),
        Flush,
    }

    type Log = Rc<RefCell<Vec<Wire>>>;

    struct LogSpi(Log);
    struct LogPin(Log, fn(bool) -> Wire);
    struct LevelPin(bool);

    impl spi::ErrorType for LogSpi {
        type Error = Infallible;
    }

    impl SpiBus<u8> for LogSpi {
        fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
            self.0.borrow_mut().extend(words.iter().map(|&b| Wire::Spi(b)));
            Ok(())
        }

        fn transfer(&mut self, _read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
            self.write(write)
        }

        fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push(Wire::Flush);
            Ok(())
        }
    }

    impl digital::ErrorType for LogPin {
        type Error = Infallible;
    }

    impl OutputPin for LogPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push((self.1)(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.borrow_mut().push((self.1)(true));
            Ok(())
        }
    }

    impl digital::ErrorType for LevelPin {
        type Error = Infallible;
    }

    impl InputPin for LevelPin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(self.0)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.0)
        }
    }

    fn transport(busy: bool) -> (SpiTransport<LogSpi, LogPin, LogPin, LevelPin>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let t = SpiTransport::new(
            LogSpi(log.clone()),
            LogPin(log.clone(), Wire::Cs),
            LogPin(log.clone(), Wire::Dc),
            LevelPin(busy),
        )
        .unwrap();
        (t, log)
    }

    #[test]
    fn test_new_idles_deselected_in_command_mode() {
        let (_t, log) = transport(false);
        assert_eq!(*log.borrow(), [Wire::Cs(true), Wire::Dc(false)]);
    }

    #[test]
    fn test_frame_on_the_wire() {
        let (mut t, log) = transport(false);
        log.borrow_mut().clear();

        t.write_frame(&[0x10, 0x01]).unwrap();

        assert_eq!(
            *log.borrow(),
            [
                Wire::Dc(false),
                Wire::Cs(false),
                Wire::Spi(0x10),
                Wire::Flush,
                Wire::Cs(true),
                Wire::Dc(true),
                Wire::Cs(false),
                Wire::Spi(0x01),
                Wire::Flush,
                Wire::Cs(true),
            ]
        );
    }

    #[test]
    fn test_busy_is_active_high() {
        let (mut busy, _) = transport(true);
        let (mut idle, _) = transport(false);
        assert_eq!(busy.is_busy(), Ok(true));
        assert_eq!(idle.is_busy(), Ok(false));
    }

    #[test]
    fn test_config_for_panel_is_mode0() {
        let wiring = SerialConfig {
            baud_hz: 4_000_000,
            ..SerialConfig::PICO_DEFAULT
        };
        let config = SpiConfig::for_panel(&wiring);
        assert_eq!(config.frequency, 4_000_000);
        assert_eq!(config.polarity, Polarity::IdleLow);
        assert_eq!(config.phase, Phase::CaptureOnFirstTransition);
    }
}
