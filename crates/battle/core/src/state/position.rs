use std::fmt;

/// Discrete battlescape position in tile coordinates; `z` is the elevation layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl TilePos {
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The tile directly below, which may be outside the map when `z == 0`.
    #[inline]
    pub const fn below(self) -> Self {
        Self::new(self.x, self.y, self.z - 1)
    }

    #[inline]
    pub const fn above(self) -> Self {
        Self::new(self.x, self.y, self.z + 1)
    }

    pub const fn with_z(self, z: i32) -> Self {
        Self::new(self.x, self.y, z)
    }

    /// Chebyshev distance ignoring elevation.
    pub fn flat_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Unit facing as a unit step on the horizontal grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Facing {
    pub dx: i8,
    pub dy: i8,
}

impl Facing {
    pub const NORTH: Self = Self::new(0, -1);
    pub const EAST: Self = Self::new(1, 0);
    pub const SOUTH: Self = Self::new(0, 1);
    pub const WEST: Self = Self::new(-1, 0);

    pub const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }

    /// Compass octant, clockwise from north. `None` for a zero or non-unit vector.
    pub const fn octant(self) -> Option<u8> {
        match (self.dx, self.dy) {
            (0, -1) => Some(0),
            (1, -1) => Some(1),
            (1, 0) => Some(2),
            (1, 1) => Some(3),
            (0, 1) => Some(4),
            (-1, 1) => Some(5),
            (-1, 0) => Some(6),
            (-1, -1) => Some(7),
            _ => None,
        }
    }
}

impl Default for Facing {
    fn default() -> Self {
        Self::SOUTH
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapSize {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl MapSize {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && pos.x < self.x
            && pos.y < self.y
            && pos.z < self.z
    }
}
