//! Configuration for the raster pyramid and the route solver.
//!
//! The configuration is a small serializable struct so that it can be loaded
//! from JSON or (with the `toml` feature) TOML next to the tile images it
//! describes.

use crate::error::{GeoNavError, Result};
use geonav_types::GeoBox;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Engine configuration.
///
/// # Example
///
/// ```rust
/// use geonav::Config;
///
/// // Create default config
/// let config = Config::default();
/// assert_eq!(config.tile_size, 256);
///
/// // Load from JSON; missing fields take their defaults
/// let json = r#"{
///     "max_depth": 5,
///     "solve_timeout_seconds": 2.5
/// }"#;
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.max_depth, 5);
/// assert_eq!(config.tile_size, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Area covered by the single depth-0 tile.
    #[serde(default = "Config::default_root")]
    pub root: GeoBox,

    /// Edge length of every tile image in pixels.
    #[serde(default = "Config::default_tile_size")]
    pub tile_size: u32,

    /// Deepest zoom level with pre-rendered tiles.
    #[serde(default = "Config::default_max_depth")]
    pub max_depth: u32,

    /// Default time budget for a route search, in seconds.
    #[serde(default = "Config::default_solve_timeout_seconds")]
    pub solve_timeout_seconds: f64,
}

impl Config {
    /// Deepest zoom level a tile resolver accepts.
    ///
    /// Each request indexes every tile at the chosen depth, `4^depth` of
    /// them, so the pyramid has to stay shallow.
    pub const MAX_RASTER_DEPTH: u32 = 10;

    fn default_root() -> GeoBox {
        GeoBox::new(
            -122.2998046875,
            37.892195547244356,
            -122.2119140625,
            37.82280243352756,
        )
    }

    const fn default_tile_size() -> u32 {
        256
    }

    const fn default_max_depth() -> u32 {
        7
    }

    const fn default_solve_timeout_seconds() -> f64 {
        10.0
    }

    pub fn with_root(mut self, root: GeoBox) -> Self {
        self.root = root;
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_solve_timeout(mut self, timeout: Duration) -> Self {
        self.solve_timeout_seconds = timeout.as_secs_f64();
        self
    }

    /// Solver budget as a `Duration`; invalid values fall back to zero.
    pub fn solve_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.solve_timeout_seconds).unwrap_or(Duration::ZERO)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.root.is_finite() || self.root.is_degenerate() {
            return Err(GeoNavError::Config(format!(
                "Root box must be finite with ul north-west of lr: {:?}",
                self.root
            )));
        }

        if self.tile_size == 0 {
            return Err(GeoNavError::Config(
                "Tile size must be greater than zero".to_string(),
            ));
        }

        if self.max_depth > Self::MAX_RASTER_DEPTH {
            return Err(GeoNavError::Config(format!(
                "Max depth must be at most {}, got: {}",
                Self::MAX_RASTER_DEPTH,
                self.max_depth
            )));
        }

        if !self.solve_timeout_seconds.is_finite() || self.solve_timeout_seconds < 0.0 {
            return Err(GeoNavError::Config(format!(
                "Solve timeout must be a non-negative number of seconds, got: {}",
                self.solve_timeout_seconds
            )));
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML configuration.
    #[cfg(feature = "toml")]
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, choosing the format by extension.
    ///
    /// `.toml` files need the `toml` feature; anything else is read as JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml_str(&contents),
            #[cfg(not(feature = "toml"))]
            Some("toml") => Err(GeoNavError::Config(
                "TOML configuration requires the `toml` feature".to_string(),
            )),
            _ => Self::from_json_str(&contents),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: Self::default_root(),
            tile_size: Self::default_tile_size(),
            max_depth: Self::default_max_depth(),
            solve_timeout_seconds: Self::default_solve_timeout_seconds(),
        }
    }
}
