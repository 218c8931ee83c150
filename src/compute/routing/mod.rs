//! Shortest-path search.
//!
//! - [`AStarSolver`]: time-bounded A* over any [`AStarGraph`]
//! - [`StreetGraph`]: geographic street network with nearest-node snapping

pub mod astar;
pub mod graph;
pub mod street;

pub use astar::{AStarSolver, SolverOutcome};
pub use graph::{AStarGraph, WeightedEdge};
pub use street::{NodeId, StreetGraph, StreetGraphBuilder, StreetNode};
