//! Color planes
//!
//! A tri-color panel stores one bit per pixel per color in separate RAM
//! banks. Each bank is a [`ColorPlane`]; a panel supports a fixed
//! [`PlaneSet`] of them for its whole lifetime.

/// Number of color planes any panel can have
pub const PLANE_COUNT: usize = 3;

/// Independent bit-plane of the display RAM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ColorPlane {
    /// Black/white plane (bit set = white)
    BlackWhite = 0,
    /// Red pigment plane
    Red = 1,
    /// Yellow pigment plane
    Yellow = 2,
}

impl ColorPlane {
    /// All planes, in discriminant order
    pub const ALL: [ColorPlane; PLANE_COUNT] =
        [ColorPlane::BlackWhite, ColorPlane::Red, ColorPlane::Yellow];

    /// Index into per-plane arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Plane for an array index
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ColorPlane::BlackWhite),
            1 => Some(ColorPlane::Red),
            2 => Some(ColorPlane::Yellow),
            _ => None,
        }
    }

    /// Byte a cleared buffer of this plane is filled with
    ///
    /// The black/white plane clears to all-ones (white), chromatic planes
    /// clear to all-zeros (no pigment).
    pub const fn background(self) -> u8 {
        match self {
            ColorPlane::BlackWhite => 0xFF,
            ColorPlane::Red | ColorPlane::Yellow => 0x00,
        }
    }

    /// True for pigment planes
    pub const fn is_chromatic(self) -> bool {
        !matches!(self, ColorPlane::BlackWhite)
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Small set of color planes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaneSet(u8);

impl PlaneSet {
    /// The empty set
    pub const EMPTY: Self = Self(0);

    /// Every plane
    pub const ALL: Self = Self::from_planes(&ColorPlane::ALL);

    /// Build a set from a list of planes (duplicates are ignored)
    pub const fn from_planes(planes: &[ColorPlane]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < planes.len() {
            bits |= planes[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Check membership
    pub const fn contains(self, plane: ColorPlane) -> bool {
        self.0 & plane.bit() != 0
    }

    /// Set with `plane` added
    pub const fn with(self, plane: ColorPlane) -> Self {
        Self(self.0 | plane.bit())
    }

    /// Add a plane in place
    pub fn insert(&mut self, plane: ColorPlane) {
        self.0 |= plane.bit();
    }

    /// Number of planes in the set
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if the set is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Planes in the set, in discriminant order
    pub fn iter(self) -> impl Iterator<Item = ColorPlane> {
        ColorPlane::ALL.into_iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<ColorPlane> for PlaneSet {
    fn from_iter<I: IntoIterator<Item = ColorPlane>>(iter: I) -> Self {
        let mut set = PlaneSet::EMPTY;
        for plane in iter {
            set.insert(plane);
        }
        set
    }
}

impl From<ColorPlane> for PlaneSet {
    fn from(plane: ColorPlane) -> Self {
        Self::EMPTY.with(plane)
    }
}
