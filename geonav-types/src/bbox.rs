use geo::{Point, Rect, coord};
use serde::{Deserialize, Serialize};

/// A geographic rectangle given by its upper-left and lower-right corners.
///
/// Longitude grows to the east and latitude to the north, so a well formed
/// box has `ul_lon < lr_lon` and `ul_lat > lr_lat`. This is the corner
/// convention map viewports use, as opposed to the min/max convention of
/// [`geo::Rect`].
///
/// # Examples
///
/// ```
/// use geonav_types::bbox::GeoBox;
///
/// let bbox = GeoBox::new(-122.30, 37.89, -122.21, 37.82);
/// assert!(!bbox.is_degenerate());
/// assert!((bbox.lon_span() - 0.09).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBox {
    pub ul_lon: f64,
    pub ul_lat: f64,
    pub lr_lon: f64,
    pub lr_lat: f64,
}

impl GeoBox {
    pub fn new(ul_lon: f64, ul_lat: f64, lr_lon: f64, lr_lat: f64) -> Self {
        Self {
            ul_lon,
            ul_lat,
            lr_lon,
            lr_lat,
        }
    }

    /// Build a box from its upper-left and lower-right corner points.
    pub fn from_corners(upper_left: Point<f64>, lower_right: Point<f64>) -> Self {
        Self::new(upper_left.x(), upper_left.y(), lower_right.x(), lower_right.y())
    }

    pub fn upper_left(&self) -> Point<f64> {
        Point::new(self.ul_lon, self.ul_lat)
    }

    pub fn lower_right(&self) -> Point<f64> {
        Point::new(self.lr_lon, self.lr_lat)
    }

    /// East-west extent in degrees of longitude.
    #[inline]
    pub fn lon_span(&self) -> f64 {
        self.lr_lon - self.ul_lon
    }

    /// North-south extent in degrees of latitude.
    #[inline]
    pub fn lat_span(&self) -> f64 {
        self.ul_lat - self.lr_lat
    }

    /// True when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.ul_lon.is_finite()
            && self.ul_lat.is_finite()
            && self.lr_lon.is_finite()
            && self.lr_lat.is_finite()
    }

    /// A box with zero or negative extent along either axis.
    pub fn is_degenerate(&self) -> bool {
        !(self.lon_span() > 0.0 && self.lat_span() > 0.0)
    }

    /// Whether `point` lies inside or on the boundary of this box.
    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        (self.ul_lon..=self.lr_lon).contains(&point.x())
            && (self.lr_lat..=self.ul_lat).contains(&point.y())
    }

    /// Whether `other` lies entirely inside this box (shared edges allowed).
    pub fn contains_box(&self, other: &GeoBox) -> bool {
        self.ul_lon <= other.ul_lon
            && self.ul_lat >= other.ul_lat
            && self.lr_lon >= other.lr_lon
            && self.lr_lat <= other.lr_lat
    }

    /// Whether the interiors of the two boxes overlap.
    ///
    /// Boxes that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &GeoBox) -> bool {
        self.ul_lon < other.lr_lon
            && other.ul_lon < self.lr_lon
            && self.lr_lat < other.ul_lat
            && other.lr_lat < self.ul_lat
    }

    /// Clamp a point into this box.
    pub fn clamp_point(&self, point: &Point<f64>) -> Point<f64> {
        Point::new(
            point.x().clamp(self.ul_lon, self.lr_lon),
            point.y().clamp(self.lr_lat, self.ul_lat),
        )
    }

    /// Convert to a min/max [`geo::Rect`].
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.ul_lon, y: self.lr_lat },
            coord! { x: self.lr_lon, y: self.ul_lat },
        )
    }
}

impl From<Rect<f64>> for GeoBox {
    fn from(rect: Rect<f64>) -> Self {
        let (min, max) = (rect.min(), rect.max());
        Self::new(min.x, max.y, max.x, min.y)
    }
}
