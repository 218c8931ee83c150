use geonav_types::GeoBox;
use serde::{Deserialize, Serialize};

/// A viewport asking for map tiles.
///
/// Field names on the wire follow the browser front end: `ullon`, `ullat`,
/// `lrlon`, `lrlat`, `w` and `h`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterRequest {
    #[serde(rename = "ullon")]
    pub ul_lon: f64,
    #[serde(rename = "ullat")]
    pub ul_lat: f64,
    #[serde(rename = "lrlon")]
    pub lr_lon: f64,
    #[serde(rename = "lrlat")]
    pub lr_lat: f64,
    /// Viewport width in pixels.
    #[serde(rename = "w")]
    pub width: f64,
    /// Viewport height in pixels.
    #[serde(rename = "h")]
    pub height: f64,
}

impl RasterRequest {
    pub fn new(bbox: GeoBox, width: f64, height: f64) -> Self {
        Self {
            ul_lon: bbox.ul_lon,
            ul_lat: bbox.ul_lat,
            lr_lon: bbox.lr_lon,
            lr_lat: bbox.lr_lat,
            width,
            height,
        }
    }

    pub fn bbox(&self) -> GeoBox {
        GeoBox::new(self.ul_lon, self.ul_lat, self.lr_lon, self.lr_lat)
    }

    /// Longitude units per pixel requested by this viewport.
    pub fn lon_dpp(&self) -> f64 {
        (self.lr_lon - self.ul_lon) / self.width
    }
}

/// Tiles selected for a [`RasterRequest`].
///
/// `render_grid` is row-major: `render_grid[row][col]`, north to south then
/// west to east. The `raster_*` fields give the area actually covered by the
/// returned tiles, which generally exceeds the requested box because only
/// whole tiles are returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterResult {
    pub render_grid: Vec<Vec<String>>,
    pub raster_ul_lon: f64,
    pub raster_ul_lat: f64,
    pub raster_lr_lon: f64,
    pub raster_lr_lat: f64,
    pub depth: u32,
    pub query_success: bool,
}

impl RasterResult {
    /// The result reported for a query outside the map coverage.
    pub fn failed() -> Self {
        Self {
            render_grid: Vec::new(),
            raster_ul_lon: 0.0,
            raster_ul_lat: 0.0,
            raster_lr_lon: 0.0,
            raster_lr_lat: 0.0,
            depth: 0,
            query_success: false,
        }
    }

    pub fn covered_box(&self) -> GeoBox {
        GeoBox::new(
            self.raster_ul_lon,
            self.raster_ul_lat,
            self.raster_lr_lon,
            self.raster_lr_lat,
        )
    }

    /// Number of tile rows.
    pub fn rows(&self) -> usize {
        self.render_grid.len()
    }

    /// Number of tile columns.
    pub fn cols(&self) -> usize {
        self.render_grid.first().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_names() {
        let json = r#"{"ullon": -122.24, "ullat": 37.87, "lrlon": -122.22, "lrlat": 37.85, "w": 512.0, "h": 256.0}"#;
        let request: RasterRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.bbox(), GeoBox::new(-122.24, 37.87, -122.22, 37.85));
        assert_eq!(request.width, 512.0);
        assert!((request.lon_dpp() - 0.02 / 512.0).abs() < 1e-15);
    }

    #[test]
    fn test_failed_result_shape() {
        let failed = RasterResult::failed();
        assert!(!failed.query_success);
        assert_eq!(failed.rows(), 0);
        assert_eq!(failed.cols(), 0);

        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["query_success"], false);
        assert_eq!(json["depth"], 0);
        assert!(json["render_grid"].as_array().unwrap().is_empty());
    }
}
