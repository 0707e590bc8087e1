//! Heltec 2.13" black/white/red panel (QYEG0213RWS800)
//!
//! 122x250 pixel tri-color panel on an SSD1680-class controller.
//!
//! # RAM layout
//!
//! Data entry mode `0x01` increments X and decrements Y, so the RAM window
//! runs X from byte `0x01` to `0x10` (16 bytes = 128 pixels, 6 unused) and
//! Y from row `0xF9` (249) down to 0. A host buffer in row-major order maps
//! straight onto it.
//!
//! # Refresh
//!
//! Display update control 2 with `0xF7` loads the temperature-compensated
//! full-refresh waveform, runs it and powers the analog block down again.

use inkplane_hal::{DelayNs, SerialTransport};

use crate::busy::BusyWait;
use crate::display::{bytes_per_row, plane_len, EpaperDisplay};
use crate::error::Error;
use crate::plane::{ColorPlane, PlaneSet};
use crate::state::{PanelEvent, PanelState};

/// Panel width in pixels
pub const WIDTH: u16 = 122;

/// Panel height in pixels
pub const HEIGHT: u16 = 250;

/// Bytes in one RAM bank
pub const PLANE_LEN: usize = plane_len(WIDTH, HEIGHT);

/// Controller commands
pub mod cmd {
    pub const DRIVER_OUTPUT_CTRL: u8 = 0x01;
    pub const DEEP_SLEEP: u8 = 0x10;
    pub const DATA_ENTRY_MODE: u8 = 0x11;
    pub const SOFT_RESET: u8 = 0x12;
    pub const TEMPERATURE_SENSOR: u8 = 0x18;
    pub const MASTER_ACTIVATION: u8 = 0x20;
    pub const DISPLAY_UPDATE_CTRL_2: u8 = 0x22;
    pub const WRITE_BW_RAM: u8 = 0x24;
    pub const WRITE_R_RAM: u8 = 0x26;
    pub const BORDER_WAVEFORM: u8 = 0x3C;
    pub const RAM_X_WINDOW: u8 = 0x44;
    pub const RAM_Y_WINDOW: u8 = 0x45;
    pub const RAM_X_COUNTER: u8 = 0x4E;
    pub const RAM_Y_COUNTER: u8 = 0x4F;
    pub const ANALOG_BLOCK_CTRL: u8 = 0x74;
    pub const DIGITAL_BLOCK_CTRL: u8 = 0x7E;
}

/// First X byte address of the RAM window
const RAM_X_ORIGIN: u8 = 0x01;

/// First Y row address of the RAM window
const RAM_Y_ORIGIN: u16 = 0xF9;

/// Time for the controller state machine to come up after power is applied
const POWER_ON_SETTLE_MS: u32 = 100;

/// Full refresh, temperature compensated
const REFRESH_MODE_FULL: u8 = 0xF7;

const SUPPORTED_PLANES: PlaneSet =
    PlaneSet::from_planes(&[ColorPlane::BlackWhite, ColorPlane::Red]);

/// RAM write command for each supported plane
const RAM_COMMANDS: [(ColorPlane, u8); 2] = [
    (ColorPlane::BlackWhite, cmd::WRITE_BW_RAM),
    (ColorPlane::Red, cmd::WRITE_R_RAM),
];

/// Register setup sent after the soft reset, in order
const INIT_SEQUENCE: &[&[u8]] = &[
    &[cmd::ANALOG_BLOCK_CTRL, 0x54],
    &[cmd::DIGITAL_BLOCK_CTRL, 0x3B],
    // 250 gate lines (0xF9 + 1), default scan direction
    &[cmd::DRIVER_OUTPUT_CTRL, 0xF9, 0x00, 0x00],
    // X increment, Y decrement
    &[cmd::DATA_ENTRY_MODE, 0x01],
    &[cmd::RAM_X_WINDOW, 0x01, 0x10],
    &[cmd::RAM_Y_WINDOW, 0xF9, 0x00, 0x00, 0x00],
    &[cmd::BORDER_WAVEFORM, 0x01],
    // Internal temperature sensor
    &[cmd::TEMPERATURE_SENSOR, 0x80],
    &[cmd::RAM_X_COUNTER, 0x01],
    &[cmd::RAM_Y_COUNTER, 0xF9, 0x00],
];

/// Check that a declared plane set has exactly one RAM command per plane
pub(crate) fn planes_match_commands(planes: PlaneSet, commands: &[(ColorPlane, u8)]) -> bool {
    let mapped: PlaneSet = commands.iter().map(|&(plane, _)| plane).collect();
    mapped == planes && commands.len() == planes.len()
}

/// QYEG0213RWS800 panel driver
pub struct Qyeg0213Rws800<T, D> {
    transport: T,
    delay: D,
    busy: BusyWait,
    state: PanelState,
    /// RAM address counters left away from the window origin
    counters_moved: bool,
}

impl<T, D> Qyeg0213Rws800<T, D>
where
    T: SerialTransport,
    D: DelayNs,
{
    /// Create a driver with the default busy policy (100 ms polls, no bound)
    ///
    /// No bus traffic happens until [`initialize`](EpaperDisplay::initialize).
    pub fn new(transport: T, delay: D) -> Result<Self, Error<T::Error>> {
        Self::with_busy_wait(transport, delay, BusyWait::default())
    }

    /// Create a driver with a custom busy policy
    pub fn with_busy_wait(transport: T, delay: D, busy: BusyWait) -> Result<Self, Error<T::Error>> {
        if !planes_match_commands(SUPPORTED_PLANES, &RAM_COMMANDS) {
            return Err(Error::PlaneMapping);
        }

        Ok(Self {
            transport,
            delay,
            busy,
            state: PanelState::Uninitialized,
            counters_moved: false,
        })
    }

    /// Busy policy in use
    pub fn busy_wait(&self) -> BusyWait {
        self.busy
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Release the transport and delay
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    fn command(&mut self, opcode: u8, data: &[u8]) -> Result<(), Error<T::Error>> {
        self.transport
            .write_command(opcode, data)
            .map_err(Error::Transport)?;
        Ok(())
    }

    fn frame(&mut self, frame: &[u8]) -> Result<(), Error<T::Error>> {
        self.transport.write_frame(frame).map_err(Error::Transport)?;
        Ok(())
    }

    fn ram_command(plane: ColorPlane) -> Option<u8> {
        RAM_COMMANDS
            .iter()
            .find(|&&(p, _)| p == plane)
            .map(|&(_, opcode)| opcode)
    }

    /// Point the RAM X/Y counters at byte `offset` of a plane
    fn set_ram_address(&mut self, offset: usize) -> Result<(), Error<T::Error>> {
        let row = offset / bytes_per_row(WIDTH);
        let col = offset % bytes_per_row(WIDTH);
        // Both fit: col < 16 and row < 250 after the capacity check
        let x = RAM_X_ORIGIN + col as u8;
        let y = RAM_Y_ORIGIN - row as u16;
        let [y_lo, y_hi] = y.to_le_bytes();

        self.command(cmd::RAM_X_COUNTER, &[x])?;
        self.command(cmd::RAM_Y_COUNTER, &[y_lo, y_hi])
    }

    fn run_init_sequence(&mut self) -> Result<(), Error<T::Error>> {
        self.delay.delay_ms(POWER_ON_SETTLE_MS);
        self.power_on_reset()?;

        for frame in INIT_SEQUENCE {
            self.frame(frame)?;
        }

        self.wait_until_ready()
    }
}

impl<T, D> EpaperDisplay for Qyeg0213Rws800<T, D>
where
    T: SerialTransport,
    D: DelayNs,
{
    type Error = Error<T::Error>;

    fn width(&self) -> u16 {
        WIDTH
    }

    fn height(&self) -> u16 {
        HEIGHT
    }

    fn supported_planes(&self) -> PlaneSet {
        SUPPORTED_PLANES
    }

    fn state(&self) -> PanelState {
        self.state
    }

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        let busy = self.transport.is_busy().map_err(Error::Transport)?;
        Ok(!busy)
    }

    fn initialize(&mut self) -> Result<(), Self::Error> {
        if self.state.is_ready() {
            return Ok(());
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("QYEG0213RWS800: initializing");

        match self.run_init_sequence() {
            Ok(()) => {
                self.state = self.state.transition(PanelEvent::Initialized);
                self.counters_moved = false;
                #[cfg(feature = "defmt")]
                defmt::debug!("QYEG0213RWS800: ready");
                Ok(())
            }
            Err(e) => {
                self.state = self.state.transition(PanelEvent::InitFailed);
                #[cfg(feature = "defmt")]
                defmt::warn!("QYEG0213RWS800: initialization failed, rolled back");
                Err(e)
            }
        }
    }

    fn power_on_reset(&mut self) -> Result<(), Self::Error> {
        self.wait_until_ready()?;
        self.command(cmd::SOFT_RESET, &[])?;
        self.wait_until_ready()
    }

    fn set_pixels(
        &mut self,
        plane: ColorPlane,
        bytes: &[u8],
        start_offset: usize,
    ) -> Result<(), Self::Error> {
        let opcode = Self::ram_command(plane).ok_or(Error::UnsupportedPlane(plane))?;

        let end = start_offset.saturating_add(bytes.len());
        if end > PLANE_LEN {
            return Err(Error::SizeMismatch {
                len: end,
                capacity: PLANE_LEN,
            });
        }

        if bytes.is_empty() {
            return Ok(());
        }

        if start_offset != 0 || self.counters_moved {
            self.set_ram_address(start_offset)?;
            self.counters_moved = start_offset != 0;
        }

        self.command(opcode, bytes)?;
        self.state = self.state.transition(PanelEvent::PixelsWritten);
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), Self::Error> {
        self.command(cmd::DISPLAY_UPDATE_CTRL_2, &[REFRESH_MODE_FULL])?;
        self.command(cmd::MASTER_ACTIVATION, &[])?;
        self.wait_until_ready()?;
        self.state = self.state.transition(PanelEvent::Refreshed);
        Ok(())
    }

    fn enter_deep_sleep(&mut self) -> Result<(), Self::Error> {
        self.command(cmd::DEEP_SLEEP, &[0x01])?;
        self.state = self.state.transition(PanelEvent::EnteredDeepSleep);
        #[cfg(feature = "defmt")]
        defmt::debug!("QYEG0213RWS800: deep sleep");
        Ok(())
    }

    fn exit_deep_sleep(&mut self) -> Result<(), Self::Error> {
        self.command(cmd::DEEP_SLEEP, &[0x00])?;
        self.state = self.state.transition(PanelEvent::ExitedDeepSleep);
        Ok(())
    }

    fn wait_until_ready(&mut self) -> Result<(), Self::Error> {
        self.busy.wait(&mut self.transport, &mut self.delay)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkplane_hal::mock::{MockDelay, MockError, MockTransport};
    use std::vec;
    use std::vec::Vec;

    type Panel = Qyeg0213Rws800<MockTransport, MockDelay>;

    fn panel() -> Panel {
        Qyeg0213Rws800::new(MockTransport::new(), MockDelay::new()).unwrap()
    }

    fn expected_init_frames() -> Vec<Vec<u8>> {
        let mut frames = vec![vec![cmd::SOFT_RESET]];
        frames.extend(INIT_SEQUENCE.iter().map(|f| f.to_vec()));
        frames
    }

    #[test]
    fn test_geometry() {
        let panel = panel();
        assert_eq!(panel.width(), 122);
        assert_eq!(panel.height(), 250);
        assert_eq!(panel.bits_per_pixel(), 1);
        assert_eq!(PLANE_LEN, 4000);
        assert_eq!(panel.state(), PanelState::Uninitialized);
    }

    #[test]
    fn test_supported_planes_match_commands() {
        let panel = panel();
        let planes = panel.supported_planes();
        assert!(planes.contains(ColorPlane::BlackWhite));
        assert!(planes.contains(ColorPlane::Red));
        assert!(!planes.contains(ColorPlane::Yellow));
        assert!(planes_match_commands(planes, &RAM_COMMANDS));
    }

    #[test]
    fn test_plane_mapping_mismatch_detected() {
        let missing = [(ColorPlane::BlackWhite, cmd::WRITE_BW_RAM)];
        assert!(!planes_match_commands(SUPPORTED_PLANES, &missing));

        let extra = [
            (ColorPlane::BlackWhite, cmd::WRITE_BW_RAM),
            (ColorPlane::Red, cmd::WRITE_R_RAM),
            (ColorPlane::Yellow, 0x27),
        ];
        assert!(!planes_match_commands(SUPPORTED_PLANES, &extra));

        let duplicate = [
            (ColorPlane::BlackWhite, cmd::WRITE_BW_RAM),
            (ColorPlane::BlackWhite, cmd::WRITE_R_RAM),
        ];
        assert!(!planes_match_commands(
            PlaneSet::from(ColorPlane::BlackWhite),
            &duplicate
        ));
    }

    #[test]
    fn test_construction_is_silent() {
        let panel = panel();
        assert!(panel.transport().events().is_empty());
        assert_eq!(panel.transport().busy_polls(), 0);
    }

    #[test]
    fn test_initialize_sequence() {
        let mut panel = panel();
        panel.initialize().unwrap();

        assert_eq!(panel.transport().frames(), expected_init_frames().as_slice());
        assert_eq!(panel.state(), PanelState::Ready);

        let (_, delay) = panel.release();
        assert_eq!(delay.elapsed_ms(), u64::from(POWER_ON_SETTLE_MS));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut panel = panel();
        panel.initialize().unwrap();
        panel.initialize().unwrap();

        assert_eq!(panel.transport().frames(), expected_init_frames().as_slice());
    }

    #[test]
    fn test_initialize_waits_for_busy() {
        let mut bus = MockTransport::new();
        // busy before reset, after reset, after register setup
        bus.script_busy(&[true, false, true, true, false, true, false]);
        let mut panel = Qyeg0213Rws800::new(bus, MockDelay::new()).unwrap();

        panel.initialize().unwrap();

        let (bus, delay) = panel.release();
        assert_eq!(bus.busy_polls(), 7);
        assert_eq!(delay.elapsed_ms(), 100 + 4 * 100);
    }

    #[test]
    fn test_failed_initialize_rolls_back() {
        let mut bus = MockTransport::new();
        bus.fail_after_bytes(5);
        let mut panel = Qyeg0213Rws800::new(bus, MockDelay::new()).unwrap();

        assert_eq!(panel.initialize(), Err(Error::Transport(MockError)));
        assert_eq!(panel.state(), PanelState::Uninitialized);
    }

    #[test]
    fn test_initialize_retries_after_rollback() {
        let mut bus = MockTransport::new();
        bus.script_busy(&[true; 4]);
        let busy = BusyWait::bounded(100, 200);
        let mut panel = Qyeg0213Rws800::with_busy_wait(bus, MockDelay::new(), busy).unwrap();

        assert_eq!(panel.initialize(), Err(Error::Timeout));
        assert_eq!(panel.state(), PanelState::Uninitialized);
        assert!(panel.transport().frames().is_empty());

        // Busy script is drained now; the caller retries
        panel.initialize().unwrap();
        assert_eq!(panel.state(), PanelState::Ready);
    }

    #[test]
    fn test_set_pixels_writes_ram_command() {
        let mut panel = panel();
        let data = [0xAA; 16];
        panel.set_pixels(ColorPlane::Red, &data, 0).unwrap();

        let mut expected = vec![cmd::WRITE_R_RAM];
        expected.extend_from_slice(&data);
        assert_eq!(panel.transport().frames(), &[expected]);
    }

    #[test]
    fn test_set_pixels_unsupported_plane() {
        let mut panel = panel();
        assert_eq!(
            panel.set_pixels(ColorPlane::Yellow, &[0xFF; 4], 0),
            Err(Error::UnsupportedPlane(ColorPlane::Yellow))
        );
        assert!(panel.transport().events().is_empty());
    }

    #[test]
    fn test_set_pixels_rejects_overflow() {
        let mut panel = panel();
        let data = [0u8; PLANE_LEN + 1];
        assert_eq!(
            panel.set_pixels(ColorPlane::BlackWhite, &data, 0),
            Err(Error::SizeMismatch {
                len: PLANE_LEN + 1,
                capacity: PLANE_LEN
            })
        );
        assert_eq!(
            panel.set_pixels(ColorPlane::BlackWhite, &[0; 2], PLANE_LEN - 1),
            Err(Error::SizeMismatch {
                len: PLANE_LEN + 1,
                capacity: PLANE_LEN
            })
        );
        assert!(panel.transport().events().is_empty());
    }

    #[test]
    fn test_empty_write_is_silent() {
        let mut panel = panel();
        panel.set_pixels(ColorPlane::Red, &[], PLANE_LEN).unwrap();
        assert!(panel.transport().events().is_empty());
    }

    #[test]
    fn test_set_pixels_with_offset_moves_counters() {
        let mut panel = panel();
        // Row 2, byte 3
        panel.set_pixels(ColorPlane::BlackWhite, &[0x0F], 35).unwrap();

        assert_eq!(
            panel.transport().frames(),
            &[
                vec![cmd::RAM_X_COUNTER, 0x04],
                vec![cmd::RAM_Y_COUNTER, 0xF7, 0x00],
                vec![cmd::WRITE_BW_RAM, 0x0F],
            ]
        );
    }

    #[test]
    fn test_counters_restored_after_offset_write() {
        let mut panel = panel();
        panel.set_pixels(ColorPlane::BlackWhite, &[0x0F], 35).unwrap();
        panel.transport.clear_log();

        panel.set_pixels(ColorPlane::Red, &[0x00], 0).unwrap();
        assert_eq!(
            panel.transport().frames(),
            &[
                vec![cmd::RAM_X_COUNTER, 0x01],
                vec![cmd::RAM_Y_COUNTER, 0xF9, 0x00],
                vec![cmd::WRITE_R_RAM, 0x00],
            ]
        );

        // Counters are back at the origin; no repositioning needed
        panel.transport.clear_log();
        panel.set_pixels(ColorPlane::Red, &[0x00], 0).unwrap();
        assert_eq!(panel.transport().frames(), &[vec![cmd::WRITE_R_RAM, 0x00]]);
    }

    #[test]
    fn test_refresh_frames() {
        let mut panel = panel();
        panel.transport.script_busy(&[true, true]);
        panel.refresh().unwrap();

        assert_eq!(
            panel.transport().frames(),
            &[vec![0x22, 0xF7], vec![0x20]]
        );
        assert_eq!(panel.transport().busy_polls(), 3);
    }

    #[test]
    fn test_deep_sleep_round_trip() {
        let mut panel = panel();
        panel.initialize().unwrap();
        panel.transport.clear_log();

        panel.enter_deep_sleep().unwrap();
        assert_eq!(panel.state(), PanelState::AsleepDeep);
        panel.exit_deep_sleep().unwrap();
        assert_eq!(panel.state(), PanelState::Ready);

        assert_eq!(
            panel.transport().frames(),
            &[vec![cmd::DEEP_SLEEP, 0x01], vec![cmd::DEEP_SLEEP, 0x00]]
        );
    }

    #[test]
    fn test_initialize_from_deep_sleep_resets() {
        let mut panel = panel();
        panel.initialize().unwrap();
        panel.enter_deep_sleep().unwrap();
        panel.transport.clear_log();

        panel.initialize().unwrap();
        assert_eq!(panel.transport().frames(), expected_init_frames().as_slice());
        assert_eq!(panel.state(), PanelState::Ready);
    }

    #[test]
    fn test_is_ready_reads_busy_line() {
        let mut panel = panel();
        panel.transport.script_busy(&[true]);
        assert_eq!(panel.is_ready(), Ok(false));
        assert_eq!(panel.is_ready(), Ok(true));
    }
}
