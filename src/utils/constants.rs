// src/utils/constants.rs

/// Mean Earth radius in kilometers used by every spherical calculation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Largest accepted search radius, roughly Earth's equatorial circumference.
pub const MAX_RADIUS_KM: f64 = 40_075.0;

/// Cloudant caps search page size at 200 rows.
pub const MAX_SEARCH_PAGE_SIZE: u32 = 200;

/// Decimal digits used when rendering coordinates into a search query.
pub const QUERY_COORDINATE_PRECISION: usize = 6;
