//! Draw-time rotation
//!
//! Rotation is applied to each coordinate as it is plotted; the backing
//! buffers always stay in the panel's native orientation.

/// Canvas rotation, clockwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Native orientation
    #[default]
    Deg0,
    /// Quarter turn
    Deg90,
    /// Half turn
    Deg180,
    /// Three-quarter turn
    Deg270,
}

impl Rotation {
    /// All rotations in increasing angle
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotation for an angle in degrees (multiples of 90 only)
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// Angle in degrees
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// True when logical width and height are swapped relative to native
    pub const fn is_transposed(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Map a logical coordinate to native panel coordinates
    ///
    /// `width` and `height` are the native panel dimensions. The result may
    /// fall outside the panel; callers bounds-check it. Coordinates are
    /// widened so any `i32` input maps without overflow.
    pub const fn apply(self, x: i64, y: i64, width: u16, height: u16) -> (i64, i64) {
        let w = width as i64;
        let h = height as i64;
        match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (w - y, x),
            Rotation::Deg180 => (w - x, h - y),
            Rotation::Deg270 => (y, h - x),
        }
    }

    /// Inverse of [`apply`](Self::apply)
    pub const fn invert(self, x: i64, y: i64, width: u16, height: u16) -> (i64, i64) {
        let w = width as i64;
        let h = height as i64;
        match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (y, w - x),
            Rotation::Deg180 => (w - x, h - y),
            Rotation::Deg270 => (h - y, x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_degrees_round_trip() {
        for rotation in Rotation::ALL {
            assert_eq!(Rotation::from_degrees(rotation.degrees()), Some(rotation));
        }
        assert_eq!(Rotation::from_degrees(45), None);
    }

    #[test]
    fn test_mapping_table() {
        assert_eq!(Rotation::Deg0.apply(3, 7, 122, 250), (3, 7));
        assert_eq!(Rotation::Deg90.apply(3, 7, 122, 250), (115, 3));
        assert_eq!(Rotation::Deg180.apply(3, 7, 122, 250), (119, 243));
        assert_eq!(Rotation::Deg270.apply(3, 7, 122, 250), (7, 247));
    }

    #[test]
    fn test_transposed() {
        assert!(!Rotation::Deg0.is_transposed());
        assert!(Rotation::Deg90.is_transposed());
        assert!(!Rotation::Deg180.is_transposed());
        assert!(Rotation::Deg270.is_transposed());
    }

    #[test]
    fn test_extreme_coordinates_map_without_overflow() {
        let (min, max) = (i64::from(i32::MIN), i64::from(i32::MAX));
        assert_eq!(Rotation::Deg90.apply(0, min, 122, 250), (122 - min, 0));
        assert_eq!(Rotation::Deg180.apply(min, max, 122, 250), (122 - min, 250 - max));
        assert_eq!(Rotation::Deg270.apply(min, 0, 122, 250), (0, 250 - min));
    }

    proptest! {
        #[test]
        fn prop_identity(x in -500i64..500, y in -500i64..500) {
            prop_assert_eq!(Rotation::Deg0.apply(x, y, 122, 250), (x, y));
        }

        #[test]
        fn prop_half_turn_is_involution(
            x in any::<i32>(),
            y in any::<i32>(),
            w in 1u16..400,
            h in 1u16..400,
        ) {
            let (x, y) = (i64::from(x), i64::from(y));
            let (rx, ry) = Rotation::Deg180.apply(x, y, w, h);
            prop_assert_eq!(Rotation::Deg180.apply(rx, ry, w, h), (x, y));
        }

        #[test]
        fn prop_every_rotation_is_bijective(
            x in any::<i32>(),
            y in any::<i32>(),
            w in 1u16..400,
            h in 1u16..400,
        ) {
            let (x, y) = (i64::from(x), i64::from(y));
            for rotation in Rotation::ALL {
                let (nx, ny) = rotation.apply(x, y, w, h);
                prop_assert_eq!(rotation.invert(nx, ny, w, h), (x, y));
            }
        }
    }
}
