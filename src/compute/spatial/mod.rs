//! Nearest-neighbor point sets.
//!
//! [`KdTree`] is the indexed implementation; [`NaivePointSet`] is a linear
//! scan with the same interface, used as a reference and for tiny inputs.

pub mod kdtree;
pub mod naive;

pub use kdtree::KdTree;
pub use naive::NaivePointSet;

use geo::Point;

/// Result of a nearest-neighbor lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, T> {
    pub point: &'a Point,
    pub value: &'a T,
    /// Euclidean distance from the query.
    pub distance: f64,
}

/// A static set of 2-D points answering nearest-neighbor queries.
pub trait PointSet {
    type Value;

    /// The stored entry closest to `(x, y)`.
    fn nearest_entry(&self, x: f64, y: f64) -> Neighbor<'_, Self::Value>;

    /// The stored point closest to `(x, y)`.
    fn nearest(&self, x: f64, y: f64) -> Point {
        *self.nearest_entry(x, y).point
    }

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[inline]
pub(crate) fn squared_distance(a: &Point, b: &Point) -> f64 {
    let dx = a.x() - b.x();
    let dy = a.y() - b.y();
    dx * dx + dy * dy
}
