//! E-paper panel drivers
//!
//! Panel drivers built on the [`SerialTransport`](inkplane_hal::SerialTransport)
//! abstraction from `inkplane-hal`:
//!
//! ```text
//! ┌──────────────────┐
//! │  DisplayModel    │  connect(model, transport, delay)
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐     ┌───────────────┐
//! │  EpaperDisplay   │────▶│   BusyWait    │
//! │  (Panel / driver)│     └───────────────┘
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │ SerialTransport  │  CS / DC / BUSY framing
//! └──────────────────┘
//! ```
//!
//! Supported panels:
//!
//! - Heltec QYEG0213RWS800 (2.13", 122x250, black/white/red)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod busy;
pub mod display;
pub mod error;
pub mod panel;
pub mod plane;
pub mod registry;
pub mod state;

pub use busy::BusyWait;
pub use display::{bytes_per_row, plane_len, EpaperDisplay};
pub use error::Error;
pub use panel::Qyeg0213Rws800;
pub use plane::{ColorPlane, PlaneSet, PLANE_COUNT};
pub use registry::{connect, connect_with_busy_wait, DisplayModel, Panel};
pub use state::{PanelEvent, PanelState};
