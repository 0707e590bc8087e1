//! Rasterization primitives
//!
//! All geometry is integer-only. Coordinates are logical (pre-rotation);
//! every pixel goes through the same clipped plot as [`Canvas::draw_pixel`],
//! so clipping and rotation happen in one place. Intermediate values are
//! widened, so any `i32` input is safe.

use inkplane_drivers::ColorPlane;

use crate::canvas::Canvas;

/// Logical pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Floor square root
fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Newton iteration from an upper bound converges monotonically
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Square root rounded to the nearest integer
fn round_sqrt(n: u128) -> u128 {
    let r = isqrt(n);
    // sqrt(n) >= r + 0.5  <=>  n > r^2 + r for integer n
    if n > r * r + r {
        r + 1
    } else {
        r
    }
}

/// `num / den` rounded to nearest, halves away from zero (`den > 0`)
fn div_round(num: i128, den: i128) -> i128 {
    if num >= 0 {
        (2 * num + den) / (2 * den)
    } else {
        -((-2 * num + den) / (2 * den))
    }
}

/// Steps `s` in `0..=len` whose offset `round(s * d / len)` can fall in `lo..=hi`
///
/// Conservative by one pixel on each side; the result may be empty.
fn step_window(lo: i128, hi: i128, d: i128, len: i128) -> (i128, i128) {
    if d == 0 {
        return if lo <= 0 && 0 <= hi { (0, len) } else { (1, 0) };
    }

    let (lo, hi, d) = if d > 0 { (lo, hi, d) } else { (-hi, -lo, -d) };
    let first = ((lo - 1) * len).div_euclid(d);
    let last = ((hi + 1) * len + d - 1).div_euclid(d);
    (first.max(0), last.min(len))
}

impl<const N: usize> Canvas<N> {
    /// Draw a line from `from` to `to`, both ends included
    ///
    /// Steps `L + 1` times where `L` is the rounded Euclidean length,
    /// rounding each intermediate point to the nearest pixel. A zero-length
    /// line draws nothing. Steps that cannot reach the panel are skipped.
    pub fn draw_line(&mut self, from: Point, to: Point, plane: ColorPlane) {
        let (x1, y1) = (i128::from(from.x), i128::from(from.y));
        let dx = i128::from(to.x) - x1;
        let dy = i128::from(to.y) - y1;
        let len = round_sqrt((dx * dx + dy * dy).unsigned_abs()) as i128;
        if len == 0 {
            return;
        }

        let (xs, ys) = self.logical_bounds();
        let (xa, xb) = step_window(
            i128::from(*xs.start()) - x1,
            i128::from(*xs.end()) - x1,
            dx,
            len,
        );
        let (ya, yb) = step_window(
            i128::from(*ys.start()) - y1,
            i128::from(*ys.end()) - y1,
            dy,
            len,
        );

        for step in xa.max(ya)..=xb.min(yb) {
            let x = x1 + div_round(step * dx, len);
            let y = y1 + div_round(step * dy, len);
            // Both lie between the endpoints, so they fit in i64
            self.plot(x as i64, y as i64, plane);
        }
    }

    /// Draw a circle outline, or a filled disc when `filled`
    ///
    /// Integer midpoint recurrence starting at `err = 2 - 2r`, plotting four
    /// symmetric points per step. A non-positive radius draws nothing.
    ///
    /// A circle whose bounding box misses the panel returns at once. So does
    /// one whose ring passes wholly outside the panel, after filling the
    /// panel when `filled`.
    pub fn draw_circle(&mut self, center: Point, radius: i32, plane: ColorPlane, filled: bool) {
        if radius <= 0 {
            return;
        }

        let (cx, cy, r) = (i64::from(center.x), i64::from(center.y), i64::from(radius));
        let (xs, ys) = self.logical_bounds();
        let (left, right) = (i64::from(*xs.start()), i64::from(*xs.end()));
        let (top, bottom) = (i64::from(*ys.start()), i64::from(*ys.end()));

        if cx + r < left || cx - r > right || cy + r < top || cy - r > bottom {
            return;
        }

        // The ring never comes closer than r - 1 to the center
        let inner = i128::from(r - 2);
        let inside = |x: i64, y: i64| {
            let (dx, dy) = (i128::from(x - cx), i128::from(y - cy));
            dx * dx + dy * dy < inner * inner
        };
        if inner > 0
            && [(left, top), (right, top), (left, bottom), (right, bottom)]
                .into_iter()
                .all(|(x, y)| inside(x, y))
        {
            if filled {
                for row in top..=bottom {
                    self.fill_span(left, right, row, plane);
                }
            }
            return;
        }

        let mut x = -r;
        let mut y = 0;
        let mut err = 2 - 2 * r;

        loop {
            self.plot(cx - x, cy + y, plane);
            self.plot(cx - y, cy - x, plane);
            self.plot(cx + x, cy - y, plane);
            self.plot(cx + y, cy + x, plane);

            if filled {
                self.fill_span(cx + x, cx - x, cy + y, plane);
                self.fill_span(cx + x, cx - x, cy - y, plane);
                self.fill_span(cx - y, cx + y, cy + x, plane);
                self.fill_span(cx - y, cx + y, cy - x, plane);
            }

            let e = err;
            if e <= y {
                y += 1;
                err += y * 2 + 1;
            }
            if e > x || err > y {
                x += 1;
                err += x * 2 + 1;
            }
            if x >= 0 {
                break;
            }
        }
    }

    /// Draw a rectangle between two opposite corners, both included
    ///
    /// When `filled`, every row between the two corners is swept. Fill rows
    /// and spans are clamped to [`Canvas::logical_bounds`] first, so far-off
    /// corners cost nothing.
    pub fn draw_rectangle(
        &mut self,
        top_left: Point,
        bottom_right: Point,
        plane: ColorPlane,
        filled: bool,
    ) {
        let (x1, y1) = (top_left.x, top_left.y);
        let (x2, y2) = (bottom_right.x, bottom_right.y);

        self.draw_line(Point::new(x1, y1), Point::new(x2, y1), plane);
        self.draw_line(Point::new(x1, y2), Point::new(x2, y2), plane);
        self.draw_line(Point::new(x1, y1), Point::new(x1, y2), plane);
        self.draw_line(Point::new(x2, y1), Point::new(x2, y2), plane);

        if !filled {
            return;
        }

        let (_, ys) = self.logical_bounds();
        let top = y1.min(y2).max(*ys.start());
        let bottom = y1.max(y2).min(*ys.end());
        for row in top..=bottom {
            self.fill_span(i64::from(x1), i64::from(x2), i64::from(row), plane);
        }
    }

    /// Set every pixel of row `y` between `xa` and `xb` inclusive
    fn fill_span(&mut self, xa: i64, xb: i64, y: i64, plane: ColorPlane) {
        let (xs, ys) = self.logical_bounds();
        if y < i64::from(*ys.start()) || y > i64::from(*ys.end()) {
            return;
        }

        let left = xa.min(xb).max(i64::from(*xs.start()));
        let right = xa.max(xb).min(i64::from(*xs.end()));
        for x in left..=right {
            self.plot(x, y, plane);
        }
    }
}
