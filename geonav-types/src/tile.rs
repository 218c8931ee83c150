use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of one tile in a quadtree tile pyramid.
///
/// Depth 0 covers the whole root area with a single tile and every further
/// depth splits each tile into four, so depth `d` is a `2^d × 2^d` grid. `x`
/// counts columns from the west edge and `y` counts rows from the north edge.
///
/// Tiles are also identified by a flat row-major sequence number
/// `y * 2^depth + x`; [`TileAddress::sequence`] and
/// [`TileAddress::from_sequence`] convert between the two forms.
///
/// Grid arithmetic is defined for `depth <= TileAddress::MAX_DEPTH` only; the
/// size and sequence helpers panic on deeper levels instead of wrapping.
/// [`TileAddress::is_valid`] checks the depth first and never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileAddress {
    pub x: u32,
    pub y: u32,
    pub depth: u32,
}

impl TileAddress {
    /// Deepest level whose sequence numbers still fit in a `u64`.
    pub const MAX_DEPTH: u32 = 31;

    pub fn new(x: u32, y: u32, depth: u32) -> Self {
        Self { x, y, depth }
    }

    /// Number of tiles along one edge of the grid at `depth`.
    ///
    /// # Panics
    ///
    /// If `depth > TileAddress::MAX_DEPTH`.
    #[inline]
    pub fn tiles_per_side(depth: u32) -> u64 {
        assert!(
            depth <= Self::MAX_DEPTH,
            "tile depth {} exceeds maximum {}",
            depth,
            Self::MAX_DEPTH
        );
        1u64 << depth
    }

    /// Total number of tiles at `depth`; panics like
    /// [`TileAddress::tiles_per_side`].
    #[inline]
    pub fn tile_count(depth: u32) -> u64 {
        Self::tiles_per_side(depth) * Self::tiles_per_side(depth)
    }

    /// Flat row-major sequence number of this tile.
    #[inline]
    pub fn sequence(&self) -> u64 {
        u64::from(self.y) * Self::tiles_per_side(self.depth) + u64::from(self.x)
    }

    /// Inverse of [`TileAddress::sequence`].
    pub fn from_sequence(sequence: u64, depth: u32) -> Self {
        let side = Self::tiles_per_side(depth);
        Self {
            x: (sequence % side) as u32,
            y: (sequence / side) as u32,
            depth,
        }
    }

    /// Whether `x` and `y` fall inside the grid for this tile's depth.
    pub fn is_valid(&self) -> bool {
        self.depth <= Self::MAX_DEPTH
            && u64::from(self.x) < Self::tiles_per_side(self.depth)
            && u64::from(self.y) < Self::tiles_per_side(self.depth)
    }

    /// Name of the pre-rendered image for this tile, e.g. `d2_x3_y1`.
    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TileAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}_x{}_y{}", self.depth, self.x, self.y)
    }
}
