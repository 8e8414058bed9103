// src/models.rs
use serde::Serialize;

use crate::utils::constants::{MAX_LONGITUDE, MIN_LONGITUDE};

/// A geographic position in degrees.
///
/// Construction never validates; range checks happen in the `geo` functions so
/// that out-of-range input surfaces as an error instead of being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Longitude extent of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LongitudeRange {
    /// `[min, max]` with `min <= max`.
    Contiguous { min: f64, max: f64 },
    /// Crosses the antimeridian: `[min, 180] ∪ [-180, max]` with `min > max`.
    Antimeridian { min: f64, max: f64 },
}

impl LongitudeRange {
    /// Picks the variant from the raw pair; `min > max` means the range wraps.
    pub fn from_degrees(min: f64, max: f64) -> Self {
        if min > max {
            LongitudeRange::Antimeridian { min, max }
        } else {
            LongitudeRange::Contiguous { min, max }
        }
    }

    pub fn full() -> Self {
        LongitudeRange::Contiguous {
            min: MIN_LONGITUDE,
            max: MAX_LONGITUDE,
        }
    }

    pub fn min(&self) -> f64 {
        match *self {
            LongitudeRange::Contiguous { min, .. } | LongitudeRange::Antimeridian { min, .. } => min,
        }
    }

    pub fn max(&self) -> f64 {
        match *self {
            LongitudeRange::Contiguous { max, .. } | LongitudeRange::Antimeridian { max, .. } => max,
        }
    }

    pub fn wraps(&self) -> bool {
        matches!(self, LongitudeRange::Antimeridian { .. })
    }

    pub fn contains(&self, longitude: f64) -> bool {
        match *self {
            LongitudeRange::Contiguous { min, max } => longitude >= min && longitude <= max,
            LongitudeRange::Antimeridian { min, max } => longitude >= min || longitude <= max,
        }
    }
}

/// Lat/lon rectangle that contains a circular search area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub longitude: LongitudeRange,
}

impl BoundingBox {
    pub fn new(min_lat: f64, max_lat: f64, longitude: LongitudeRange) -> Self {
        Self {
            min_lat,
            max_lat,
            longitude,
        }
    }

    /// Builds a box from four raw degree values, treating `min_lon > max_lon`
    /// as an antimeridian crossing.
    pub fn from_degrees(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self::new(min_lat, max_lat, LongitudeRange::from_degrees(min_lon, max_lon))
    }

    pub fn min_lon(&self) -> f64 {
        self.longitude.min()
    }

    pub fn max_lon(&self) -> f64 {
        self.longitude.max()
    }

    pub fn wraps(&self) -> bool {
        self.longitude.wraps()
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.latitude >= self.min_lat
            && point.latitude <= self.max_lat
            && self.longitude.contains(point.longitude)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lat[{:.6}, {:.6}] lon[{:.6}, {:.6}]{}",
            self.min_lat,
            self.max_lat,
            self.min_lon(),
            self.max_lon(),
            if self.wraps() { " (wraps antimeridian)" } else { "" }
        )
    }
}

/// A transport hub as returned by the search service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hub {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub location: Point,
}

impl Hub {
    pub fn new(id: impl Into<String>, name: impl Into<String>, location: Point) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
        }
    }
}

/// A hub together with its great-circle distance from the query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedHub {
    #[serde(flatten)]
    pub hub: Hub,
    pub distance_km: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longitude_range_from_degrees() {
        assert!(!LongitudeRange::from_degrees(-75.0, -73.0).wraps());
        assert!(!LongitudeRange::from_degrees(0.0, 0.0).wraps());
        assert!(LongitudeRange::from_degrees(170.0, -170.0).wraps());
    }

    #[test]
    fn test_contiguous_contains() {
        let bbox = BoundingBox::from_degrees(40.0, 41.0, -75.0, -73.0);
        assert!(bbox.contains(&Point::new(40.5, -74.0)));
        assert!(bbox.contains(&Point::new(40.0, -75.0)));
        assert!(!bbox.contains(&Point::new(40.5, -72.9)));
        assert!(!bbox.contains(&Point::new(41.1, -74.0)));
    }

    #[test]
    fn test_antimeridian_contains() {
        let bbox = BoundingBox::from_degrees(-10.0, 10.0, 170.0, -170.0);
        assert!(bbox.wraps());
        assert!(bbox.contains(&Point::new(0.0, 175.0)));
        assert!(bbox.contains(&Point::new(0.0, -175.0)));
        assert!(bbox.contains(&Point::new(0.0, 180.0)));
        assert!(!bbox.contains(&Point::new(0.0, 0.0)));
        assert!(!bbox.contains(&Point::new(0.0, 169.0)));
    }

    #[test]
    fn test_ranked_hub_serializes_flat() {
        let ranked = RankedHub {
            hub: Hub::new("jfk", "John F Kennedy Intl", Point::new(40.6413, -73.7781)),
            distance_km: 20.8,
        };
        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["id"], "jfk");
        assert_eq!(json["name"], "John F Kennedy Intl");
        assert_eq!(json["latitude"], 40.6413);
        assert_eq!(json["longitude"], -73.7781);
        assert_eq!(json["distance_km"], 20.8);
    }
}
