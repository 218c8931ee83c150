//! Raster tile selection for map viewports.

pub mod request;
pub mod resolver;

pub use request::{RasterRequest, RasterResult};
pub use resolver::TileResolver;
