//! Compute layer: the data structures and algorithms behind every query.
//!
//! It provides:
//! - An indexed binary min-heap with priority updates
//! - Nearest-neighbor point sets (KD-tree and brute force)
//! - Time-bounded A* routing and a street network graph
//! - Input validation shared by all of the above
//!
//! Nothing here performs I/O; every structure is built once and then queried.

pub mod heap;
pub mod routing;
pub mod spatial;
pub mod validation;

pub use heap::IndexedMinHeap;
pub use routing::{AStarGraph, AStarSolver, SolverOutcome, StreetGraph, WeightedEdge};
pub use spatial::{KdTree, NaivePointSet, Neighbor, PointSet};
