// src/geo.rs
//
// Spherical geometry on a mean-radius Earth. Every function validates its
// input and returns an error rather than clamping out-of-range coordinates.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::errors::HubFinderError;
use crate::models::{BoundingBox, LongitudeRange, Point};
use crate::utils::constants::{
    EARTH_RADIUS_KM, MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE,
};

const MIN_LAT_RAD: f64 = -FRAC_PI_2;
const MAX_LAT_RAD: f64 = FRAC_PI_2;
const MIN_LON_RAD: f64 = -PI;
const MAX_LON_RAD: f64 = PI;

pub fn deg_to_rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

pub fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

/// Checks that a point lies in latitude [-90, 90] and longitude [-180, 180].
/// NaN coordinates are rejected as out of range.
pub fn validate_point(point: &Point) -> Result<(), HubFinderError> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&point.latitude) {
        return Err(HubFinderError::OutOfRange {
            field: "latitude",
            value: point.latitude,
            min: MIN_LATITUDE,
            max: MAX_LATITUDE,
        });
    }
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&point.longitude) {
        return Err(HubFinderError::OutOfRange {
            field: "longitude",
            value: point.longitude,
            min: MIN_LONGITUDE,
            max: MAX_LONGITUDE,
        });
    }
    Ok(())
}

/// Great-circle distance in kilometers between two points, using the
/// haversine formula.
pub fn distance(p1: &Point, p2: &Point) -> Result<f64, HubFinderError> {
    validate_point(p1)?;
    validate_point(p2)?;

    let (phi1, phi2) = (deg_to_rad(p1.latitude), deg_to_rad(p2.latitude));
    let (delta_phi, delta_lambda) = (
        deg_to_rad(p2.latitude - p1.latitude),
        deg_to_rad(p2.longitude - p1.longitude),
    );

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Ok(EARTH_RADIUS_KM * c)
}

/// Smallest lat/lon rectangle containing every point within `radius_km` of
/// `center`.
///
/// When the latitude band reaches a pole the box spans every longitude. When
/// it crosses the antimeridian the longitude range comes back as
/// [`LongitudeRange::Antimeridian`].
pub fn bounding_box(center: &Point, radius_km: f64) -> Result<BoundingBox, HubFinderError> {
    if radius_km.is_nan() || radius_km < 0.0 {
        return Err(HubFinderError::InvalidArgument(format!(
            "radius must be a non-negative number of kilometers, got {}",
            radius_km
        )));
    }
    if radius_km.is_infinite() {
        return Err(HubFinderError::InvalidArgument(
            "radius must be finite".to_string(),
        ));
    }
    validate_point(center)?;

    let lat_rad = deg_to_rad(center.latitude);
    let lon_rad = deg_to_rad(center.longitude);
    let angular_distance = radius_km / EARTH_RADIUS_KM;

    let min_lat = lat_rad - angular_distance;
    let max_lat = lat_rad + angular_distance;

    if min_lat > MIN_LAT_RAD && max_lat < MAX_LAT_RAD {
        let delta_lon = (angular_distance.sin() / lat_rad.cos()).asin();

        let mut min_lon = lon_rad - delta_lon;
        let mut max_lon = lon_rad + delta_lon;
        if min_lon < MIN_LON_RAD {
            min_lon += 2.0 * PI;
        }
        if max_lon > MAX_LON_RAD {
            max_lon -= 2.0 * PI;
        }

        return Ok(BoundingBox::new(
            rad_to_deg(min_lat),
            rad_to_deg(max_lat),
            LongitudeRange::from_degrees(rad_to_deg(min_lon), rad_to_deg(max_lon)),
        ));
    }

    // A pole lies inside the circle, so every meridian crosses it.
    Ok(BoundingBox::new(
        rad_to_deg(min_lat.max(MIN_LAT_RAD)),
        rad_to_deg(max_lat.min(MAX_LAT_RAD)),
        LongitudeRange::full(),
    ))
}
