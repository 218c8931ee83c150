//! Error types for geonav.

use thiserror::Error;

/// Errors surfaced by the index, heap, solver and raster layers.
///
/// "No path exists" and "ran out of time" are not errors: they are
/// [`SolverOutcome`](crate::compute::routing::SolverOutcome) values.
#[derive(Debug, Error)]
pub enum GeoNavError {
    /// Malformed construction or query arguments.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The item is already present in the heap.
    #[error("Item already present in heap")]
    DuplicateItem,

    /// The item is not present in the heap.
    #[error("Item not found in heap")]
    NotFound,

    /// Peek or remove on an empty heap.
    #[error("Heap is empty")]
    Empty,

    /// The query lies outside the area covered by the tile pyramid.
    #[error("Out of bounds: {0}")]
    OutOfBounds(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GeoNavError>;
