//! Framebuffer and rasterizer for Inkplane e-paper panels
//!
//! A [`Canvas`] holds one bit-packed buffer per color plane the panel
//! supports. Drawing happens entirely in memory; nothing reaches the panel
//! until [`Canvas::flush_to_display`], and nothing becomes visible until the
//! caller refreshes the panel.
//!
//! ```text
//! draw_line / draw_circle / draw_rectangle
//!                 │
//!                 ▼
//!            draw_pixel ── Rotation::apply ── bounds check
//!                 │
//!                 ▼
//!   [BlackWhite] [Red] [Yellow]   plane buffers (native layout)
//!                 │
//!                 ▼ flush_to_display
//!            EpaperDisplay::set_pixels
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod canvas;
pub mod error;
pub mod pattern;
pub mod primitives;
pub mod rotation;

pub use canvas::Canvas;
pub use error::CanvasError;
pub use pattern::draw_test_pattern;
pub use primitives::Point;
pub use rotation::Rotation;

/// Canvas sized for the QYEG0213RWS800 (122x250, 4000 bytes per plane)
pub type Qyeg0213Rws800Canvas = Canvas<{ inkplane_drivers::panel::qyeg0213rws800::PLANE_LEN }>;
