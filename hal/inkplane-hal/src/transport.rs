//! Serial transport contract
//!
//! The lowest layer a panel driver sees: chip-select, command/data framing,
//! the busy line and a byte writer. Everything above this speaks in command
//! frames, everything below it is a concrete bus binding.

/// Framing for the bytes that follow a [`SerialTransport::set_mode`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameMode {
    /// Bytes are interpreted as an opcode (D/C line low)
    Command,
    /// Bytes are interpreted as opcode parameters or RAM data (D/C line high)
    Data,
}

/// Serial transport to a single panel controller
///
/// One transport owns one bus/chip-select pair. All calls block until the
/// bytes have left the bus.
pub trait SerialTransport {
    /// Error type for transport operations
    type Error;

    /// Assert (`true`) or deassert (`false`) chip-select
    fn select(&mut self, enable: bool) -> Result<(), Self::Error>;

    /// Choose command or data framing for subsequent bytes
    fn set_mode(&mut self, mode: FrameMode) -> Result<(), Self::Error>;

    /// Read the panel's hardware busy line
    fn is_busy(&mut self) -> Result<bool, Self::Error>;

    /// Clock out a byte sequence, returning the number of bytes written
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    /// Write one panel command: `opcode` followed by its data bytes
    ///
    /// The opcode goes out in command mode, every data byte in data mode.
    /// Chip-select is asserted and released around each byte, so a command
    /// is a run of single-byte transactions on the PL022.
    ///
    /// Returns the number of bytes written, opcode included. A failed write
    /// still releases chip-select before the error is returned.
    fn write_command(&mut self, opcode: u8, data: &[u8]) -> Result<usize, Self::Error> {
        self.set_mode(FrameMode::Command)?;
        self.select(true)?;
        let sent = self.write(&[opcode]);
        self.select(false)?;
        sent?;

        if !data.is_empty() {
            self.set_mode(FrameMode::Data)?;
            for byte in data {
                self.select(true)?;
                let sent = self.write(core::slice::from_ref(byte));
                self.select(false)?;
                sent?;
            }
        }

        Ok(data.len() + 1)
    }

    /// Write one command frame `[opcode, data...]`
    ///
    /// An empty frame produces no bus traffic and returns `Ok(0)`.
    fn write_frame(&mut self, frame: &[u8]) -> Result<usize, Self::Error> {
        match frame.split_first() {
            Some((&opcode, data)) => self.write_command(opcode, data),
            None => Ok(0),
        }
    }
}

impl<T: SerialTransport + ?Sized> SerialTransport for &mut T {
    type Error = T::Error;

    fn select(&mut self, enable: bool) -> Result<(), Self::Error> {
        T::select(self, enable)
    }

    fn set_mode(&mut self, mode: FrameMode) -> Result<(), Self::Error> {
        T::set_mode(self, mode)
    }

    fn is_busy(&mut self) -> Result<bool, Self::Error> {
        T::is_busy(self)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        T::write(self, bytes)
    }

    fn write_command(&mut self, opcode: u8, data: &[u8]) -> Result<usize, Self::Error> {
        T::write_command(self, opcode, data)
    }

    fn write_frame(&mut self, frame: &[u8]) -> Result<usize, Self::Error> {
        T::write_frame(self, frame)
    }
}
