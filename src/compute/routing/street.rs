//! Street network graph with geographic vertices.
//!
//! A [`StreetGraph`] is an immutable adjacency-list graph whose vertices are
//! map nodes (longitude/latitude) and whose edges are road segments weighted
//! by great-circle length in meters. It implements [`AStarGraph`] with the
//! great-circle distance to the goal as heuristic. Because every edge weight
//! is itself a great-circle distance, the triangle inequality makes that
//! heuristic both admissible and consistent.
//!
//! Graphs are assembled with [`StreetGraphBuilder`]:
//!
//! ```rust
//! use geonav::compute::routing::{SolverOutcome, StreetGraph};
//!
//! let graph = StreetGraph::builder()
//!     .node(1, -122.2590, 37.8700)
//!     .node(2, -122.2580, 37.8700)
//!     .node(3, -122.2580, 37.8710)
//!     .way(&[1, 2, 3])
//!     .build()?;
//!
//! assert_eq!(graph.closest(-122.2581, 37.8711), 3);
//!
//! let route = graph.shortest_path(-122.2590, 37.8700, -122.2580, 37.8710)?;
//! assert_eq!(route.outcome(), SolverOutcome::Solved);
//! assert_eq!(route.solution(), &[1, 2, 3]);
//! # Ok::<(), geonav::GeoNavError>(())
//! ```

use super::astar::AStarSolver;
use super::graph::{AStarGraph, WeightedEdge};
use crate::compute::spatial::KdTree;
use crate::compute::validation::validate_geographic_point;
use crate::config::Config;
use crate::error::{GeoNavError, Result};
use geo::{Distance, Haversine, Point};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;

/// Identifier of a map node.
pub type NodeId = u64;

/// A vertex of the street network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreetNode {
    pub id: NodeId,
    pub lon: f64,
    pub lat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl StreetNode {
    pub fn point(&self) -> Point {
        Point::new(self.lon, self.lat)
    }
}

type Adjacency = SmallVec<[WeightedEdge<NodeId>; 4]>;

/// Normalize a place name for lookup: ASCII letters and spaces only,
/// lowercased.
fn clean_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphabetic() || *c == ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Immutable street network with nearest-node snapping.
#[derive(Debug)]
pub struct StreetGraph {
    nodes: FxHashMap<NodeId, StreetNode>,
    adjacency: FxHashMap<NodeId, Adjacency>,
    routable: KdTree<NodeId>,
    /// Cleaned name -> named nodes, in insertion order.
    names: FxHashMap<String, SmallVec<[NodeId; 1]>>,
    default_timeout: Duration,
}

impl StreetGraph {
    pub fn builder() -> StreetGraphBuilder {
        StreetGraphBuilder::new()
    }

    pub fn node(&self, id: NodeId) -> Option<&StreetNode> {
        self.nodes.get(&id)
    }

    pub fn lon(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(&id).map(|node| node.lon)
    }

    pub fn lat(&self, id: NodeId) -> Option<f64> {
        self.nodes.get(&id).map(|node| node.lat)
    }

    /// Number of nodes, routable or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(|edges| edges.len()).sum()
    }

    /// Outgoing edges of `id`, empty for unknown or isolated nodes.
    pub fn edges(&self, id: NodeId) -> &[WeightedEdge<NodeId>] {
        self.adjacency
            .get(&id)
            .map(|edges| edges.as_slice())
            .unwrap_or_default()
    }

    /// Great-circle distance in meters between two nodes.
    pub fn distance(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let (a, b) = (self.nodes.get(&a)?, self.nodes.get(&b)?);
        Some(Haversine.distance(a.point(), b.point()))
    }

    /// All named nodes whose name matches `name`.
    ///
    /// Matching ignores case and every character other than ASCII letters and
    /// spaces, so `"Sather Tower"`, `"sather tower!"` and `"SATHER TOWER"`
    /// find the same nodes. Unknown names give an empty result.
    pub fn locations(&self, name: &str) -> Vec<&StreetNode> {
        self.names
            .get(&clean_name(name))
            .map(|ids| ids.iter().filter_map(|id| self.nodes.get(id)).collect())
            .unwrap_or_default()
    }

    /// The routable node nearest to `(lon, lat)`.
    ///
    /// Nodes without any outgoing edge are never returned, so the result is
    /// always a usable route endpoint.
    pub fn closest(&self, lon: f64, lat: f64) -> NodeId {
        *self.routable.nearest_entry(lon, lat).value
    }

    /// Route between the nodes nearest to two coordinates using the default
    /// timeout from [`Config::solve_timeout_seconds`].
    pub fn shortest_path(
        &self,
        start_lon: f64,
        start_lat: f64,
        dest_lon: f64,
        dest_lat: f64,
    ) -> Result<AStarSolver<NodeId>> {
        self.shortest_path_within(start_lon, start_lat, dest_lon, dest_lat, self.default_timeout)
    }

    /// Route between the nodes nearest to two coordinates.
    pub fn shortest_path_within(
        &self,
        start_lon: f64,
        start_lat: f64,
        dest_lon: f64,
        dest_lat: f64,
        timeout: Duration,
    ) -> Result<AStarSolver<NodeId>> {
        validate_geographic_point(&Point::new(start_lon, start_lat))?;
        validate_geographic_point(&Point::new(dest_lon, dest_lat))?;

        let start = self.closest(start_lon, start_lat);
        let goal = self.closest(dest_lon, dest_lat);
        log::debug!("Routing from node {} to node {}", start, goal);

        AStarSolver::solve_with_graph_heuristic(self, start, goal, timeout)
    }
}

impl AStarGraph for StreetGraph {
    type Vertex = NodeId;

    fn neighbors(&self, v: &NodeId) -> Vec<WeightedEdge<NodeId>> {
        self.edges(*v).to_vec()
    }

    fn estimated_distance_to_goal(&self, v: &NodeId, goal: &NodeId) -> f64 {
        self.distance(*v, *goal).unwrap_or(0.0)
    }
}

/// Builder for [`StreetGraph`].
#[derive(Debug, Default)]
pub struct StreetGraphBuilder {
    nodes: Vec<StreetNode>,
    segments: Vec<(NodeId, NodeId, bool)>,
    config: Config,
}

impl StreetGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unnamed node.
    pub fn node(mut self, id: NodeId, lon: f64, lat: f64) -> Self {
        self.nodes.push(StreetNode {
            id,
            lon,
            lat,
            name: None,
        });
        self
    }

    /// Add a named node such as a landmark or intersection.
    pub fn named_node(mut self, id: NodeId, lon: f64, lat: f64, name: impl Into<String>) -> Self {
        self.nodes.push(StreetNode {
            id,
            lon,
            lat,
            name: Some(name.into()),
        });
        self
    }

    /// Connect consecutive nodes in both directions.
    pub fn way(mut self, node_ids: &[NodeId]) -> Self {
        for pair in node_ids.windows(2) {
            self.segments.push((pair[0], pair[1], true));
        }
        self
    }

    /// Connect consecutive nodes in the listed direction only.
    pub fn one_way(mut self, node_ids: &[NodeId]) -> Self {
        for pair in node_ids.windows(2) {
            self.segments.push((pair[0], pair[1], false));
        }
        self
    }

    /// Set the configuration; only the solver timeout is used here.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Validate nodes and segments and build the graph.
    ///
    /// # Errors
    ///
    /// [`GeoNavError::InvalidInput`] for invalid coordinates, duplicate node
    /// ids, segments referencing unknown nodes, or a graph with no edges.
    pub fn build(self) -> Result<StreetGraph> {
        self.config.validate()?;

        let mut nodes: FxHashMap<NodeId, StreetNode> = FxHashMap::default();
        let mut names: FxHashMap<String, SmallVec<[NodeId; 1]>> = FxHashMap::default();
        nodes.reserve(self.nodes.len());
        for node in self.nodes {
            validate_geographic_point(&node.point()).map_err(|e| {
                GeoNavError::InvalidInput(format!("Node {}: {}", node.id, e))
            })?;
            if nodes.contains_key(&node.id) {
                return Err(GeoNavError::InvalidInput(format!(
                    "Duplicate node id: {}",
                    node.id
                )));
            }
            if let Some(cleaned) = node.name.as_deref().map(clean_name) {
                if !cleaned.is_empty() {
                    names.entry(cleaned).or_default().push(node.id);
                }
            }
            nodes.insert(node.id, node);
        }

        let mut adjacency: FxHashMap<NodeId, Adjacency> = FxHashMap::default();
        for (from, to, both_ways) in self.segments {
            let (Some(a), Some(b)) = (nodes.get(&from), nodes.get(&to)) else {
                return Err(GeoNavError::InvalidInput(format!(
                    "Segment {} -> {} references an unknown node",
                    from, to
                )));
            };
            let weight = Haversine.distance(a.point(), b.point());

            adjacency
                .entry(from)
                .or_default()
                .push(WeightedEdge::new(from, to, weight));
            if both_ways {
                adjacency
                    .entry(to)
                    .or_default()
                    .push(WeightedEdge::new(to, from, weight));
            }
        }

        let routable = KdTree::from_entries(
            adjacency
                .keys()
                .filter_map(|id| nodes.get(id).map(|node| (node.point(), *id))),
        )
        .map_err(|_| GeoNavError::InvalidInput("Street graph has no routable nodes".into()))?;

        log::debug!(
            "Built street graph with {} nodes, {} routable",
            nodes.len(),
            routable.len()
        );

        Ok(StreetGraph {
            nodes,
            adjacency,
            routable,
            names,
            default_timeout: self.config.solve_timeout(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::routing::SolverOutcome;

    /// A 3x3 block grid around a Berkeley intersection, ids row-major from
    /// the north-west corner, plus one isolated landmark.
    fn block_grid() -> StreetGraph {
        let mut builder = StreetGraph::builder();
        for row in 0..3u64 {
            for col in 0..3u64 {
                let id = row * 3 + col + 1;
                builder = builder.node(id, -122.260 + col as f64 * 0.001, 37.872 - row as f64 * 0.001);
            }
        }
        builder
            .named_node(100, -122.2585, 37.8715, "Sather Tower")
            .way(&[1, 2, 3])
            .way(&[4, 5, 6])
            .way(&[7, 8, 9])
            .way(&[1, 4, 7])
            .way(&[3, 6, 9])
            .build()
            .unwrap()
    }

    #[test]
    fn test_counts() {
        let graph = block_grid();
        assert_eq!(graph.node_count(), 10);
        assert_eq!(graph.edge_count(), 20);
        assert!(graph.edges(100).is_empty());
        assert_eq!(graph.node(100).and_then(|n| n.name.as_deref()), Some("Sather Tower"));
    }

    #[test]
    fn test_closest_skips_isolated_nodes() {
        let graph = block_grid();
        // Exactly on the isolated landmark, which has no edges.
        let id = graph.closest(-122.2585, 37.8715);
        assert_ne!(id, 100);
        assert!(!graph.edges(id).is_empty());
        assert_eq!(graph.closest(-122.2601, 37.8721), 1);
    }

    #[test]
    fn test_shortest_path_goes_around_the_block() {
        let graph = block_grid();
        // 2 -> 8 has no middle street; the route must use an edge column.
        let route = graph
            .shortest_path(-122.259, 37.872, -122.259, 37.870)
            .unwrap();

        assert_eq!(route.outcome(), SolverOutcome::Solved);
        let path = route.solution();
        assert_eq!(path.first(), Some(&2));
        assert_eq!(path.last(), Some(&8));
        assert_eq!(path.len(), 5);

        let walked: f64 = path
            .windows(2)
            .map(|pair| graph.distance(pair[0], pair[1]).unwrap())
            .sum();
        assert!((walked - route.solution_weight()).abs() < 1e-6);
    }

    #[test]
    fn test_one_way_streets() {
        let graph = StreetGraph::builder()
            .node(1, -122.26, 37.87)
            .node(2, -122.25, 37.87)
            .one_way(&[1, 2])
            .build()
            .unwrap();

        let forward =
            AStarSolver::solve_with_graph_heuristic(&graph, 1, 2, Duration::from_secs(1)).unwrap();
        assert_eq!(forward.outcome(), SolverOutcome::Solved);

        let backward =
            AStarSolver::solve_with_graph_heuristic(&graph, 2, 1, Duration::from_secs(1)).unwrap();
        assert_eq!(backward.outcome(), SolverOutcome::Unsolvable);
    }

    #[test]
    fn test_heuristic_never_overestimates() {
        let graph = block_grid();
        for goal in 1..=9 {
            for start in 1..=9 {
                let solver = AStarSolver::solve(
                    &graph,
                    start,
                    goal,
                    |_, _| 0.0,
                    Duration::from_secs(1),
                )
                .unwrap();
                let estimate = graph.estimated_distance_to_goal(&start, &goal);
                assert!(estimate <= solver.solution_weight() + 1e-6);
            }
        }
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        let unknown = StreetGraph::builder()
            .node(1, -122.26, 37.87)
            .way(&[1, 2])
            .build();
        assert!(matches!(unknown, Err(GeoNavError::InvalidInput(_))));

        let duplicate = StreetGraph::builder()
            .node(1, -122.26, 37.87)
            .node(1, -122.25, 37.87)
            .build();
        assert!(matches!(duplicate, Err(GeoNavError::InvalidInput(_))));

        let no_edges = StreetGraph::builder().node(1, -122.26, 37.87).build();
        assert!(matches!(no_edges, Err(GeoNavError::InvalidInput(_))));

        let bad_coordinate = StreetGraph::builder().node(1, -222.0, 37.87).build();
        assert!(matches!(bad_coordinate, Err(GeoNavError::InvalidInput(_))));
    }

    #[test]
    fn test_locations_by_cleaned_name() {
        let graph = StreetGraph::builder()
            .named_node(1, -122.2585, 37.8721, "Sather Tower")
            .named_node(2, -122.2590, 37.8700, "Café Strada")
            .named_node(3, -122.2680, 37.8700, "Caf Strada")
            .named_node(4, -122.2700, 37.8650, "24/7")
            .way(&[1, 2, 3])
            .build()
            .unwrap();

        for query in ["Sather Tower", "sather tower", "SATHER TOWER!", "Sather-Tower."] {
            let hits = graph.locations(query);
            assert_eq!(hits.len(), 1, "query {:?}", query);
            assert_eq!(hits[0].id, 1);
            assert_eq!(hits[0].lon, -122.2585);
            assert_eq!(hits[0].lat, 37.8721);
            assert_eq!(hits[0].name.as_deref(), Some("Sather Tower"));
        }

        // Non-ASCII letters are dropped, so both spellings share one key.
        let ids: Vec<NodeId> = graph.locations("caf strada").iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_locations_unknown_name_is_empty() {
        let graph = block_grid();
        assert!(graph.locations("Doe Library").is_empty());
        assert!(graph.locations("").is_empty());
        // Names with no letters are not indexed.
        assert!(graph.locations("!!").is_empty());
        // Unnamed nodes never match.
        assert!(graph.locations("none").is_empty());
        assert_eq!(graph.locations("sather tower").len(), 1);
    }

    #[test]
    fn test_shortest_path_rejects_invalid_coordinates() {
        let graph = block_grid();
        assert!(graph.shortest_path(f64::NAN, 37.87, -122.26, 37.87).is_err());
    }

    #[test]
    fn test_config_timeout_is_used() {
        let config = Config::default().with_solve_timeout(Duration::ZERO);
        let graph = StreetGraph::builder()
            .node(1, -122.26, 37.87)
            .node(2, -122.25, 37.87)
            .way(&[1, 2])
            .config(config)
            .build()
            .unwrap();

        let route = graph.shortest_path(-122.26, 37.87, -122.25, 37.87).unwrap();
        assert_eq!(route.outcome(), SolverOutcome::Timeout);
    }
}
