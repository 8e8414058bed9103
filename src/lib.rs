// src/lib.rs
//! Finds transport hubs within a radius of a point, backed by a Cloudant
//! search index.
//!
//! [`finder::ProximityFinder`] computes a search box around the point, pulls
//! every hub inside it through a [`search::BoundedFetcher`], then keeps the
//! hubs whose great-circle distance is within the radius, nearest first.

pub mod errors;
pub mod finder;
pub mod geo;
pub mod models;
pub mod search;
pub mod utils;

pub use errors::{HubFinderError, Stage};
pub use finder::ProximityFinder;
pub use models::{BoundingBox, Hub, LongitudeRange, Point, RankedHub};
pub use utils::cancel::CancellationSignal;
