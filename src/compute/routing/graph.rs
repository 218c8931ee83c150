use std::hash::Hash;

/// A directed edge with a non-negative weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge<V> {
    from: V,
    to: V,
    weight: f64,
}

impl<V> WeightedEdge<V> {
    pub fn new(from: V, to: V, weight: f64) -> Self {
        Self { from, to, weight }
    }

    pub fn from(&self) -> &V {
        &self.from
    }

    pub fn to(&self) -> &V {
        &self.to
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

/// Graph interface consumed by [`AStarSolver`](super::AStarSolver).
///
/// The solver never stores the graph; it asks for outgoing edges one vertex
/// at a time. Edge weights must be non-negative.
pub trait AStarGraph {
    type Vertex: Clone + Eq + Hash;

    /// Outgoing edges of `v`.
    fn neighbors(&self, v: &Self::Vertex) -> Vec<WeightedEdge<Self::Vertex>>;

    /// Estimated distance from `v` to `goal`.
    ///
    /// Must never overestimate the true remaining distance for solved paths
    /// to be optimal. Graphs without a useful estimate can return `0.0`,
    /// which reduces A* to Dijkstra's algorithm.
    fn estimated_distance_to_goal(&self, _v: &Self::Vertex, _goal: &Self::Vertex) -> f64 {
        0.0
    }
}
