//! Inkplane Hardware Abstraction Layer
//!
//! This crate defines the narrow serial contract that e-paper panel drivers
//! talk through, plus the bus configuration that has to be validated before
//! any pin is touched. Panel drivers never see SPI peripherals or GPIO
//! directly; they only see [`SerialTransport`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Canvas (inkplane-canvas)               │
//! └─────────────────────────────────────────┘
//!                     │ flush
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  Panel driver (inkplane-drivers)        │
//! └─────────────────────────────────────────┘
//!                     │ command frames
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  inkplane-hal (this crate - contract)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ SpiTransport  │       │ MockTransport │
//! │ (embedded-hal)│       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`transport`] - [`SerialTransport`] trait and frame discipline
//! - [`spi`] - SPI mode types and the embedded-hal backed [`SpiTransport`]
//! - [`config`] - [`SerialConfig`] wiring description and validation
//! - `mock` - recording transport and delay (tests / `mock` feature)

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "mock"))]
extern crate std;

pub mod config;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod spi;
pub mod transport;

// Re-export key types at crate root for convenience
pub use config::{ConfigError, SerialConfig};
pub use embedded_hal::delay::DelayNs;
pub use spi::{SpiConfig, SpiTransport, TransportError};
pub use transport::{FrameMode, SerialTransport};
