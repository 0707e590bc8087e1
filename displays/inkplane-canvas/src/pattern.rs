//! Factory test pattern
//!
//! Black/white: every even byte column solid white plus a 4-row white band
//! every 16 rows, which shows up as a grid. Red: `0x0F` in every byte, i.e.
//! 4-pixel red stripes. Useful for checking RAM addressing and plane order
//! on a freshly wired panel.

use heapless::Vec;
use inkplane_drivers::{bytes_per_row, ColorPlane};

use crate::canvas::Canvas;
use crate::error::CanvasError;

/// Rows per grid cell
const BAND_PERIOD: usize = 16;

/// Solid rows at the top of every cell
const BAND_ROWS: usize = 4;

/// Stripe byte for chromatic planes
const STRIPE: u8 = 0x0F;

/// Pattern byte for `plane` at byte column `col` of `row`
pub fn pattern_byte(plane: ColorPlane, row: usize, col: usize) -> u8 {
    match plane {
        ColorPlane::BlackWhite => {
            if col % 2 == 0 || row % BAND_PERIOD < BAND_ROWS {
                0xFF
            } else {
                0x00
            }
        }
        ColorPlane::Red | ColorPlane::Yellow => STRIPE,
    }
}

/// Fill every supported plane of `canvas` with the test pattern
pub fn draw_test_pattern<const N: usize>(canvas: &mut Canvas<N>) -> Result<(), CanvasError> {
    let stride = bytes_per_row(canvas.width());
    let rows = usize::from(canvas.height());

    for plane in canvas.supported_planes().iter() {
        let mut bytes: Vec<u8, N> = Vec::new();
        for row in 0..rows {
            for col in 0..stride {
                bytes
                    .push(pattern_byte(plane, row, col))
                    .map_err(|_| CanvasError::BufferTooSmall {
                        needed: stride * rows,
                        capacity: N,
                    })?;
            }
        }
        canvas.draw_buffer(plane, &bytes)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkplane_drivers::PlaneSet;

    #[test]
    fn test_black_white_grid() {
        assert_eq!(pattern_byte(ColorPlane::BlackWhite, 0, 1), 0xFF);
        assert_eq!(pattern_byte(ColorPlane::BlackWhite, 3, 1), 0xFF);
        assert_eq!(pattern_byte(ColorPlane::BlackWhite, 4, 1), 0x00);
        assert_eq!(pattern_byte(ColorPlane::BlackWhite, 4, 2), 0xFF);
        assert_eq!(pattern_byte(ColorPlane::BlackWhite, 17, 15), 0xFF);
        assert_eq!(pattern_byte(ColorPlane::BlackWhite, 20, 15), 0x00);
    }

    #[test]
    fn test_fills_canvas() {
        let planes = PlaneSet::from_planes(&[ColorPlane::BlackWhite, ColorPlane::Red]);
        let mut canvas = Canvas::<4000>::new(122, 250, planes).unwrap();
        draw_test_pattern(&mut canvas).unwrap();

        let red = canvas.buffer(ColorPlane::Red).unwrap();
        assert_eq!(red.len(), 4000);
        assert!(red.iter().all(|&b| b == 0x0F));

        let bw = canvas.buffer(ColorPlane::BlackWhite).unwrap();
        for (i, &byte) in bw.iter().enumerate() {
            assert_eq!(byte, pattern_byte(ColorPlane::BlackWhite, i / 16, i % 16));
        }
        assert_eq!(bw[4 * 16 + 1], 0x00);
    }
}
