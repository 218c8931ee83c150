use super::{Neighbor, PointSet, squared_distance};
use crate::compute::validation::validate_points;
use crate::error::{GeoNavError, Result};
use geo::Point;

/// Brute-force point set: every query scans all points.
#[derive(Debug, Clone)]
pub struct NaivePointSet<T = ()> {
    entries: Vec<(Point, T)>,
}

impl NaivePointSet<()> {
    pub fn new<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        Self::from_entries(points.into_iter().map(|p| (p, ())))
    }
}

impl<T> NaivePointSet<T> {
    /// # Errors
    ///
    /// [`GeoNavError::InvalidInput`] if `entries` is empty or contains a
    /// non-finite coordinate.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Point, T)>,
    {
        let entries: Vec<(Point, T)> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(GeoNavError::InvalidInput(
                "Point set requires at least one point".into(),
            ));
        }
        let points: Vec<Point> = entries.iter().map(|(p, _)| *p).collect();
        validate_points(&points)?;
        Ok(Self { entries })
    }
}

impl<T> PointSet for NaivePointSet<T> {
    type Value = T;

    fn nearest_entry(&self, x: f64, y: f64) -> Neighbor<'_, T> {
        let goal = Point::new(x, y);
        let (mut best, mut best_sq) = (&self.entries[0], squared_distance(&self.entries[0].0, &goal));
        for entry in &self.entries[1..] {
            let dist_sq = squared_distance(&entry.0, &goal);
            if dist_sq < best_sq {
                best = entry;
                best_sq = dist_sq;
            }
        }

        Neighbor {
            point: &best.0,
            value: &best.1,
            distance: best_sq.sqrt(),
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
