//! Viewport to tile-grid resolution.
//!
//! The tile pyramid covers one root box. Depth 0 is a single
//! `tile_size × tile_size` image of the whole root; each further depth halves
//! the geographic size of a tile along both axes.
//!
//! ## Resolution steps
//!
//! 1. The request's LonDPP (longitude per pixel) is its longitude span over
//!    the viewport width.
//! 2. A table holds the LonDPP of every depth. It is strictly decreasing, so
//!    a binary search finds the coarsest depth whose LonDPP does not exceed
//!    the request. Requests finer than the deepest level clamp to it.
//! 3. A [`KdTree`] over every tile center at that depth, tagged with the
//!    tile's sequence number, is built for the request.
//! 4. The box corners (clamped into the root) snap to their nearest tile
//!    centers. On a regular grid the nearest center is the tile containing
//!    the point, so the two tiles bound the covering range.
//! 5. The range becomes a row-major grid of tile names plus the geographic
//!    box those tiles actually cover.
//!
//! Boxes that miss the root entirely are not errors: interactive panning
//! sends them routinely, and they resolve to [`RasterResult::failed`].

use super::request::{RasterRequest, RasterResult};
use crate::compute::spatial::KdTree;
use crate::compute::validation::{validate_geo_box, validate_viewport};
use crate::config::Config;
use crate::error::{GeoNavError, Result};
use geo::Point;
use geonav_types::{GeoBox, TileAddress};

/// Resolves viewports against a fixed tile pyramid.
#[derive(Debug, Clone)]
pub struct TileResolver {
    root: GeoBox,
    /// LonDPP per depth, index = depth.
    lon_dpp: Vec<f64>,
}

/// Inclusive tile range at one depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TileRange {
    depth: u32,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl TileResolver {
    /// # Errors
    ///
    /// [`GeoNavError::Config`] if `config` fails validation.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let lon_dpp = (0..=config.max_depth)
            .map(|depth| {
                let pixels = f64::from(config.tile_size) * TileAddress::tiles_per_side(depth) as f64;
                config.root.lon_span() / pixels
            })
            .collect();

        Ok(Self {
            root: config.root,
            lon_dpp,
        })
    }

    pub fn root(&self) -> &GeoBox {
        &self.root
    }

    /// Deepest available zoom level.
    pub fn max_depth(&self) -> u32 {
        (self.lon_dpp.len() - 1) as u32
    }

    /// Longitude per pixel of tiles at `depth`, if that depth exists.
    pub fn lon_dpp_for_depth(&self, depth: u32) -> Option<f64> {
        self.lon_dpp.get(depth as usize).copied()
    }

    /// Coarsest depth whose LonDPP is at most `requested`, clamped to the
    /// deepest level.
    pub fn depth_for_lon_dpp(&self, requested: f64) -> u32 {
        let depth = self.lon_dpp.partition_point(|&dpp| dpp > requested);
        depth.min(self.lon_dpp.len() - 1) as u32
    }

    /// Geographic box covered by one tile.
    pub fn tile_bounds(&self, tile: TileAddress) -> GeoBox {
        let side = TileAddress::tiles_per_side(tile.depth) as f64;
        let lon_step = self.root.lon_span() / side;
        let lat_step = self.root.lat_span() / side;
        let (x, y) = (f64::from(tile.x), f64::from(tile.y));

        GeoBox::new(
            self.root.ul_lon + x * lon_step,
            self.root.ul_lat - y * lat_step,
            self.root.ul_lon + (x + 1.0) * lon_step,
            self.root.ul_lat - (y + 1.0) * lat_step,
        )
    }

    /// Geographic center of one tile.
    pub fn tile_center(&self, tile: TileAddress) -> Point {
        let side = TileAddress::tiles_per_side(tile.depth) as f64;
        Point::new(
            self.root.ul_lon + (f64::from(tile.x) + 0.5) * self.root.lon_span() / side,
            self.root.ul_lat - (f64::from(tile.y) + 0.5) * self.root.lat_span() / side,
        )
    }

    /// Resolve a viewport into a grid of tiles.
    ///
    /// # Errors
    ///
    /// [`GeoNavError::InvalidInput`] for non-finite or inverted boxes and
    /// non-positive viewport sizes. A box outside the map coverage is not an
    /// error; it yields a result with `query_success == false`.
    pub fn resolve(&self, request: &RasterRequest) -> Result<RasterResult> {
        let bbox = request.bbox();
        validate_geo_box(&bbox).inspect_err(|e| log::warn!("Rejecting raster request: {}", e))?;
        validate_viewport(request.width, request.height)
            .inspect_err(|e| log::warn!("Rejecting raster request: {}", e))?;

        match self.resolve_range(&bbox, request.lon_dpp()) {
            Ok(range) => Ok(self.render(range)),
            Err(GeoNavError::OutOfBounds(reason)) => {
                log::debug!("Raster query outside coverage: {}", reason);
                Ok(RasterResult::failed())
            }
            Err(e) => Err(e),
        }
    }

    /// Convenience wrapper around [`TileResolver::resolve`].
    pub fn resolve_tiles(&self, bbox: &GeoBox, width: f64, height: f64) -> Result<RasterResult> {
        self.resolve(&RasterRequest::new(*bbox, width, height))
    }

    fn resolve_range(&self, bbox: &GeoBox, requested_lon_dpp: f64) -> Result<TileRange> {
        if !self.root.intersects(bbox) {
            return Err(GeoNavError::OutOfBounds(format!(
                "{:?} does not overlap root {:?}",
                bbox, self.root
            )));
        }

        let depth = self.depth_for_lon_dpp(requested_lon_dpp);
        let centers = self.tile_center_index(depth)?;

        let upper_left = self.root.clamp_point(&bbox.upper_left());
        let lower_right = self.root.clamp_point(&bbox.lower_right());
        let ul = TileAddress::from_sequence(
            *centers.nearest_entry(upper_left.x(), upper_left.y()).value,
            depth,
        );
        let lr = TileAddress::from_sequence(
            *centers.nearest_entry(lower_right.x(), lower_right.y()).value,
            depth,
        );

        log::debug!(
            "Resolved LonDPP {} to depth {}: tiles {} .. {}",
            requested_lon_dpp,
            depth,
            ul,
            lr
        );

        Ok(TileRange {
            depth,
            min_x: ul.x.min(lr.x),
            min_y: ul.y.min(lr.y),
            max_x: ul.x.max(lr.x),
            max_y: ul.y.max(lr.y),
        })
    }

    /// KD-tree over all tile centers at `depth`, valued by sequence number.
    ///
    /// Tiles are inserted in bit-reversed sequence order, which spreads
    /// consecutive insertions across the grid and keeps the tree shallow;
    /// row-major insertion would build long chains.
    fn tile_center_index(&self, depth: u32) -> Result<KdTree<u64>> {
        let bits = 2 * depth;
        let entries = (0..TileAddress::tile_count(depth)).map(|i| {
            let sequence = spread_order(i, bits);
            let tile = TileAddress::from_sequence(sequence, depth);
            (self.tile_center(tile), sequence)
        });
        KdTree::from_entries(entries)
    }

    fn render(&self, range: TileRange) -> RasterResult {
        let render_grid = (range.min_y..=range.max_y)
            .map(|y| {
                (range.min_x..=range.max_x)
                    .map(|x| TileAddress::new(x, y, range.depth).file_name())
                    .collect()
            })
            .collect();

        let ul = self.tile_bounds(TileAddress::new(range.min_x, range.min_y, range.depth));
        let lr = self.tile_bounds(TileAddress::new(range.max_x, range.max_y, range.depth));

        RasterResult {
            render_grid,
            raster_ul_lon: ul.ul_lon,
            raster_ul_lat: ul.ul_lat,
            raster_lr_lon: lr.lr_lon,
            raster_lr_lat: lr.lr_lat,
            depth: range.depth,
            query_success: true,
        }
    }
}

/// Reverse the low `bits` bits of `i`; a permutation of `0..2^bits`.
#[inline]
fn spread_order(i: u64, bits: u32) -> u64 {
    if bits == 0 {
        0
    } else {
        i.reverse_bits() >> (u64::BITS - bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> TileResolver {
        TileResolver::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_lon_dpp_table_halves_per_depth() {
        let resolver = resolver();
        assert_eq!(resolver.max_depth(), 7);
        for depth in 1..=7 {
            let coarse = resolver.lon_dpp_for_depth(depth - 1).unwrap();
            let fine = resolver.lon_dpp_for_depth(depth).unwrap();
            assert!((coarse / fine - 2.0).abs() < 1e-12);
        }
        assert!(resolver.lon_dpp_for_depth(8).is_none());
    }

    #[test]
    fn test_depth_selection() {
        let resolver = resolver();
        let d0 = resolver.lon_dpp_for_depth(0).unwrap();
        let d3 = resolver.lon_dpp_for_depth(3).unwrap();

        assert_eq!(resolver.depth_for_lon_dpp(d0 * 10.0), 0);
        assert_eq!(resolver.depth_for_lon_dpp(d0), 0);
        assert_eq!(resolver.depth_for_lon_dpp(d3), 3);
        // Slightly finer than depth 3 needs depth 4.
        assert_eq!(resolver.depth_for_lon_dpp(d3 * 0.99), 4);
        assert_eq!(resolver.depth_for_lon_dpp(d3 * 1.01), 3);
        assert_eq!(resolver.depth_for_lon_dpp(0.0), 7);
    }

    #[test]
    fn test_spread_order_is_permutation() {
        for bits in [0, 2, 6, 10] {
            let mut seen: Vec<u64> = (0..1u64 << bits).map(|i| spread_order(i, bits)).collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..1u64 << bits).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_tile_center_index_is_shallow() {
        let resolver = resolver();
        let index = resolver.tile_center_index(7).unwrap();
        assert_eq!(index.len(), 1 << 14);
        assert!(index.depth() < 64, "depth {}", index.depth());
    }

    #[test]
    fn test_tile_bounds_tile_the_root() {
        let resolver = resolver();
        let root = *resolver.root();

        let first = resolver.tile_bounds(TileAddress::new(0, 0, 2));
        let last = resolver.tile_bounds(TileAddress::new(3, 3, 2));
        assert_eq!(first.ul_lon, root.ul_lon);
        assert_eq!(first.ul_lat, root.ul_lat);
        assert!((last.lr_lon - root.lr_lon).abs() < 1e-12);
        assert!((last.lr_lat - root.lr_lat).abs() < 1e-12);

        let center = resolver.tile_center(TileAddress::new(1, 2, 2));
        assert!(resolver.tile_bounds(TileAddress::new(1, 2, 2)).contains_point(&center));
    }

    #[test]
    fn test_full_root_at_depth_zero_is_one_tile() {
        let resolver = resolver();
        let result = resolver
            .resolve_tiles(&Config::default().root, 256.0, 256.0)
            .unwrap();

        assert!(result.query_success);
        assert_eq!(result.depth, 0);
        assert_eq!(result.render_grid, vec![vec!["d0_x0_y0".to_string()]]);
        let covered = result.covered_box();
        let root = Config::default().root;
        assert_eq!(covered.ul_lon, root.ul_lon);
        assert_eq!(covered.ul_lat, root.ul_lat);
        assert!((covered.lr_lon - root.lr_lon).abs() < 1e-12);
        assert!((covered.lr_lat - root.lr_lat).abs() < 1e-12);
    }

    #[test]
    fn test_single_tile_request_is_one_tile() {
        let resolver = resolver();
        let tile = TileAddress::new(5, 9, 4);
        let bounds = resolver.tile_bounds(tile);
        let inner = GeoBox::new(
            bounds.ul_lon + bounds.lon_span() * 0.25,
            bounds.ul_lat - bounds.lat_span() * 0.25,
            bounds.lr_lon - bounds.lon_span() * 0.25,
            bounds.lr_lat + bounds.lat_span() * 0.25,
        );
        // Half a tile's span across 200 px sits between depth 4 and depth 5.
        let result = resolver.resolve_tiles(&inner, 200.0, 200.0).unwrap();

        assert_eq!(result.depth, 4);
        assert_eq!(result.render_grid, vec![vec!["d4_x5_y9".to_string()]]);
        assert!(result.covered_box().contains_box(&inner));
    }

    #[test]
    fn test_partially_outside_box_is_clamped() {
        let resolver = resolver();
        let root = *resolver.root();
        let bbox = GeoBox::new(
            root.ul_lon - 0.05,
            root.ul_lat + 0.05,
            root.ul_lon + root.lon_span() / 4.0,
            root.ul_lat - root.lat_span() / 4.0,
        );

        let result = resolver.resolve_tiles(&bbox, 1024.0, 1024.0).unwrap();
        assert!(result.query_success);
        assert_eq!(result.raster_ul_lon, root.ul_lon);
        assert_eq!(result.raster_ul_lat, root.ul_lat);
        assert!(result.render_grid[0][0].ends_with("_x0_y0"));
    }

    #[test]
    fn test_outside_coverage_fails_softly() {
        let resolver = resolver();
        let result = resolver
            .resolve_tiles(&GeoBox::new(-100.0, 40.0, -99.0, 39.0), 512.0, 512.0)
            .unwrap();
        assert_eq!(result, RasterResult::failed());
    }

    #[test]
    fn test_invalid_requests_are_errors() {
        let resolver = resolver();
        let root = Config::default().root;

        let inverted = GeoBox::new(root.lr_lon, root.ul_lat, root.ul_lon, root.lr_lat);
        assert!(matches!(
            resolver.resolve_tiles(&inverted, 512.0, 512.0),
            Err(GeoNavError::InvalidInput(_))
        ));
        assert!(matches!(
            resolver.resolve_tiles(&root, 0.0, 512.0),
            Err(GeoNavError::InvalidInput(_))
        ));
        assert!(matches!(
            resolver.resolve_tiles(&root, 512.0, -3.0),
            Err(GeoNavError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config::default().with_tile_size(0);
        assert!(matches!(
            TileResolver::new(&config),
            Err(GeoNavError::Config(_))
        ));

        let too_deep = Config::default().with_max_depth(Config::MAX_RASTER_DEPTH + 1);
        assert!(matches!(
            TileResolver::new(&too_deep),
            Err(GeoNavError::Config(_))
        ));
    }
}
