//! Multi-plane framebuffer
//!
//! One bit-packed buffer per supported color plane, row-major, MSB-first,
//! `ceil(width / 8)` bytes per row. Buffers are allocated once at
//! construction with a compile-time capacity `N` and never resized.

use core::ops::RangeInclusive;

use heapless::Vec;
use inkplane_drivers::{bytes_per_row, plane_len, ColorPlane, EpaperDisplay, PlaneSet, PLANE_COUNT};

use crate::error::CanvasError;
use crate::rotation::Rotation;

/// Drawing surface bound to one panel's geometry
///
/// `N` is the per-plane byte capacity and must be at least
/// `ceil(width / 8) * height`.
pub struct Canvas<const N: usize> {
    width: u16,
    height: u16,
    rotation: Rotation,
    planes: PlaneSet,
    buffers: [Option<Vec<u8, N>>; PLANE_COUNT],
}

impl<const N: usize> Canvas<N> {
    /// Create a cleared canvas for a `width` x `height` panel with `planes`
    pub fn new(width: u16, height: u16, planes: PlaneSet) -> Result<Self, CanvasError> {
        let needed = plane_len(width, height);
        if needed > N {
            return Err(CanvasError::BufferTooSmall {
                needed,
                capacity: N,
            });
        }

        let mut buffers: [Option<Vec<u8, N>>; PLANE_COUNT] = core::array::from_fn(|_| None);
        for plane in planes.iter() {
            let mut buffer = Vec::new();
            buffer
                .resize(needed, plane.background())
                .map_err(|_| CanvasError::BufferTooSmall {
                    needed,
                    capacity: N,
                })?;
            buffers[plane.index()] = Some(buffer);
        }

        Ok(Self {
            width,
            height,
            rotation: Rotation::Deg0,
            planes,
            buffers,
        })
    }

    /// Create a cleared canvas matching a panel's geometry and planes
    pub fn for_display<D: EpaperDisplay>(display: &D) -> Result<Self, CanvasError> {
        Self::new(display.width(), display.height(), display.supported_planes())
    }

    /// Native width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Native height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Native (width, height)
    pub fn resolution(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// (width, height) as seen by drawing code under the current rotation
    pub fn logical_size(&self) -> (u16, u16) {
        if self.rotation.is_transposed() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Logical x and y ranges that land on the panel under the current rotation
    ///
    /// At 90/180/270 degrees the ranges are offset by one from
    /// `0..logical_size()` because the rotation maps are `W - y` / `H - x`.
    pub fn logical_bounds(&self) -> (RangeInclusive<i32>, RangeInclusive<i32>) {
        if self.width == 0 || self.height == 0 {
            return (RangeInclusive::new(1, 0), RangeInclusive::new(1, 0));
        }

        let (w, h) = (self.width, self.height);
        let (ax, ay) = self.rotation.invert(0, 0, w, h);
        let (bx, by) = self.rotation.invert(i64::from(w) - 1, i64::from(h) - 1, w, h);
        // Corners of a u16 panel stay within +-65535
        let span = |a: i64, b: i64| (a.min(b) as i32)..=(a.max(b) as i32);
        (span(ax, bx), span(ay, by))
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Change the rotation for subsequent draws (buffers are untouched)
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Planes this canvas holds buffers for
    pub fn supported_planes(&self) -> PlaneSet {
        self.planes
    }

    /// Length of every plane buffer in bytes
    pub fn plane_len(&self) -> usize {
        plane_len(self.width, self.height)
    }

    /// Raw buffer of a plane
    pub fn buffer(&self, plane: ColorPlane) -> Option<&[u8]> {
        self.buffers[plane.index()].as_deref()
    }

    /// Reset every supported plane to its background fill
    pub fn clear(&mut self) {
        self.clear_planes(self.planes);
    }

    /// Reset the named planes to their background fill
    ///
    /// Planes the canvas does not hold are skipped.
    pub fn clear_planes(&mut self, planes: PlaneSet) {
        for plane in planes.iter() {
            if let Some(buffer) = self.buffers[plane.index()].as_mut() {
                buffer.fill(plane.background());
            }
        }
    }

    /// Overwrite a plane buffer from offset 0 with raw bytes
    ///
    /// Bytes past the end of `bytes` keep their previous value.
    pub fn draw_buffer(&mut self, plane: ColorPlane, bytes: &[u8]) -> Result<(), CanvasError> {
        let buffer = self.buffers[plane.index()]
            .as_mut()
            .ok_or(CanvasError::UnsupportedPlane(plane))?;

        if bytes.len() > buffer.len() {
            return Err(CanvasError::SizeMismatch {
                len: bytes.len(),
                capacity: buffer.len(),
            });
        }

        buffer[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Set one pixel in logical coordinates
    ///
    /// Pixels that land outside the panel and planes the canvas does not
    /// hold are ignored.
    pub fn draw_pixel(&mut self, x: i32, y: i32, plane: ColorPlane) {
        self.plot(i64::from(x), i64::from(y), plane);
    }

    /// Read back one pixel in logical coordinates
    pub fn pixel(&self, x: i32, y: i32, plane: ColorPlane) -> Option<bool> {
        let (index, mask) = self.native_bit(i64::from(x), i64::from(y))?;
        let byte = self.buffer(plane)?.get(index)?;
        Some(byte & mask != 0)
    }

    /// [`draw_pixel`](Self::draw_pixel) for intermediate coordinates outside `i32`
    pub(crate) fn plot(&mut self, x: i64, y: i64, plane: ColorPlane) {
        let Some((index, mask)) = self.native_bit(x, y) else {
            return;
        };
        let Some(buffer) = self.buffers[plane.index()].as_mut() else {
            return;
        };

        if let Some(byte) = buffer.get_mut(index) {
            *byte |= mask;
        }
    }

    /// Byte index and bit mask of a logical coordinate, if it is on the panel
    fn native_bit(&self, x: i64, y: i64) -> Option<(usize, u8)> {
        let (nx, ny) = self.rotation.apply(x, y, self.width, self.height);
        let nx = usize::try_from(nx).ok().filter(|&nx| nx < usize::from(self.width))?;
        let ny = usize::try_from(ny).ok().filter(|&ny| ny < usize::from(self.height))?;
        Some((ny * bytes_per_row(self.width) + nx / 8, 0x80 >> (nx % 8)))
    }

    /// Hand every plane buffer to the panel's RAM
    ///
    /// Planes are written in discriminant order. The panel is not
    /// refreshed; call [`EpaperDisplay::refresh`] to make the image visible.
    pub fn flush_to_display<D: EpaperDisplay>(&self, display: &mut D) -> Result<(), D::Error> {
        for plane in self.planes.iter() {
            if let Some(buffer) = self.buffer(plane) {
                display.set_pixels(plane, buffer, 0)?;
            }
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("Canvas flushed {} planes", self.planes.len());

        Ok(())
    }
}
