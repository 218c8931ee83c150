//! Validation for coordinates, boxes and viewport sizes.

use crate::error::{GeoNavError, Result};
use geo::Point;
use geonav_types::GeoBox;

/// Validates that both coordinates of a planar point are finite.
///
/// # Examples
///
/// ```
/// use geonav::compute::validation::validate_finite_point;
/// use geo::Point;
///
/// assert!(validate_finite_point(&Point::new(1.0, 2.0)).is_ok());
/// assert!(validate_finite_point(&Point::new(f64::NAN, 2.0)).is_err());
/// ```
pub fn validate_finite_point(point: &Point) -> Result<()> {
    let (x, y) = (point.x(), point.y());

    if !x.is_finite() {
        return Err(GeoNavError::InvalidInput(format!(
            "x coordinate must be finite, got: {}",
            x
        )));
    }

    if !y.is_finite() {
        return Err(GeoNavError::InvalidInput(format!(
            "y coordinate must be finite, got: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a 2D point has valid longitude and latitude.
///
/// Longitude: [-180.0, 180.0], Latitude: [-90.0, 90.0]
///
/// # Examples
///
/// ```
/// use geonav::compute::validation::validate_geographic_point;
/// use geo::Point;
///
/// let berkeley = Point::new(-122.2585, 37.8719);
/// assert!(validate_geographic_point(&berkeley).is_ok());
///
/// let invalid = Point::new(200.0, 40.0);
/// assert!(validate_geographic_point(&invalid).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    validate_finite_point(point)?;
    let (x, y) = (point.x(), point.y());

    if !(-180.0..=180.0).contains(&x) {
        return Err(GeoNavError::InvalidInput(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            x
        )));
    }

    if !(-90.0..=90.0).contains(&y) {
        return Err(GeoNavError::InvalidInput(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            y
        )));
    }

    Ok(())
}

/// Validates a query box: finite corners, upper-left strictly north-west of
/// lower-right.
pub fn validate_geo_box(bbox: &GeoBox) -> Result<()> {
    if !bbox.is_finite() {
        return Err(GeoNavError::InvalidInput(format!(
            "Bounding box coordinates must be finite: {:?}",
            bbox
        )));
    }

    if bbox.ul_lon >= bbox.lr_lon {
        return Err(GeoNavError::InvalidInput(format!(
            "ul_lon ({}) must be < lr_lon ({})",
            bbox.ul_lon, bbox.lr_lon
        )));
    }

    if bbox.ul_lat <= bbox.lr_lat {
        return Err(GeoNavError::InvalidInput(format!(
            "ul_lat ({}) must be > lr_lat ({})",
            bbox.ul_lat, bbox.lr_lat
        )));
    }

    Ok(())
}

/// Validates viewport dimensions in pixels.
pub fn validate_viewport(width: f64, height: f64) -> Result<()> {
    if !(width.is_finite() && width > 0.0) {
        return Err(GeoNavError::InvalidInput(format!(
            "Viewport width must be positive, got: {}",
            width
        )));
    }

    if !(height.is_finite() && height > 0.0) {
        return Err(GeoNavError::InvalidInput(format!(
            "Viewport height must be positive, got: {}",
            height
        )));
    }

    Ok(())
}

/// Validates multiple points, reporting the index of the first bad one.
pub fn validate_points(points: &[Point]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        validate_finite_point(point)
            .map_err(|e| GeoNavError::InvalidInput(format!("Point at index {}: {}", idx, e)))?;
    }
    Ok(())
}
