//! Board wiring
//!
//! Raspberry Pi Pico with a Heltec 2.13" BWR panel on SPI0. The pin
//! peripherals taken in `main` must match these numbers.

use inkplane_hal::SerialConfig;

/// Panel wiring
pub const PANEL: SerialConfig = SerialConfig::PICO_DEFAULT;

/// On-board status LED
pub const LED_PIN: u8 = 25;

/// Delay before touching the panel, so a probe can attach after reset
pub const STARTUP_DELAY_MS: u64 = 2_000;
