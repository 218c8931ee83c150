//! Geospatial navigation engine: nearest-node lookup, time-bounded routing,
//! and raster tile selection.
//!
//! ```rust
//! use geonav::{Config, StreetGraph, TileResolver, SolverOutcome};
//!
//! let graph = StreetGraph::builder()
//!     .node(1, -122.25, 37.87)
//!     .node(2, -122.24, 37.87)
//!     .node(3, -122.24, 37.86)
//!     .way(&[1, 2, 3])
//!     .build()?;
//!
//! let route = graph.shortest_path(-122.2501, 37.8701, -122.2399, 37.8599)?;
//! assert_eq!(route.outcome(), SolverOutcome::Solved);
//! assert_eq!(route.solution(), &[1, 2, 3]);
//!
//! let resolver = TileResolver::new(&Config::default())?;
//! let raster = resolver.resolve_tiles(resolver.root(), 256.0, 256.0)?;
//! assert_eq!(raster.render_grid, vec![vec!["d0_x0_y0".to_string()]]);
//! # Ok::<(), geonav::GeoNavError>(())
//! ```

pub mod compute;
pub mod config;
pub mod error;
pub mod raster;

pub use config::Config;
pub use error::{GeoNavError, Result};

pub use geo::Point;
pub use geonav_types::{GeoBox, TileAddress};

pub use compute::heap::IndexedMinHeap;
pub use compute::routing::{
    AStarGraph, AStarSolver, NodeId, SolverOutcome, StreetGraph, StreetGraphBuilder, StreetNode,
    WeightedEdge,
};
pub use compute::spatial::{KdTree, NaivePointSet, Neighbor, PointSet};

pub use raster::{RasterRequest, RasterResult, TileResolver};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Config, GeoNavError, Result};

    pub use crate::{GeoBox, Point, TileAddress};

    pub use crate::{AStarGraph, AStarSolver, SolverOutcome, StreetGraph, WeightedEdge};

    pub use crate::{IndexedMinHeap, KdTree, PointSet};

    pub use crate::{RasterRequest, RasterResult, TileResolver};

    pub use std::time::Duration;
}
