// src/finder.rs
//
// Proximity search: bounding box -> fetch candidates -> exact distance ->
// radius filter -> ascending sort. Each stage's error is labelled with the
// stage it came from.

use log::{debug, info};

use crate::errors::{HubFinderError, Stage};
use crate::geo;
use crate::models::{Point, RankedHub};
use crate::search::BoundedFetcher;
use crate::utils::cancel::CancellationSignal;
use crate::utils::constants::MAX_RADIUS_KM;

pub struct ProximityFinder<F> {
    fetcher: F,
}

impl<F: BoundedFetcher> ProximityFinder<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Hubs within `radius_km` of (`latitude`, `longitude`), nearest first.
    ///
    /// A hub exactly `radius_km` away is included. Hubs at equal distance keep
    /// the order the fetcher returned them in. Nothing matching is an empty
    /// vector, not an error; any failure returns no partial results.
    pub async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
        cancel: &CancellationSignal,
    ) -> Result<Vec<RankedHub>, HubFinderError> {
        let center = Point::new(latitude, longitude);

        let bounds = check_radius(radius_km)
            .and_then(|_| geo::bounding_box(&center, radius_km))
            .map_err(|e| e.at_stage(Stage::BoundingBox))?;
        debug!(
            "Search box for ({}, {}) r={} km: {}",
            latitude, longitude, radius_km, bounds
        );

        let candidates = self
            .fetcher
            .fetch_by_bounds(&bounds, cancel)
            .await
            .map_err(|e| e.at_stage(Stage::Fetch))?;
        let candidate_count = candidates.len();

        let mut ranked = Vec::with_capacity(candidate_count);
        for hub in candidates {
            let distance_km =
                geo::distance(&center, &hub.location).map_err(|e| e.at_stage(Stage::Distance))?;
            if distance_km <= radius_km {
                ranked.push(RankedHub { hub, distance_km });
            }
        }

        // sort_by is stable, ties stay in fetch order
        ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

        info!(
            "{} of {} candidate hubs within {} km",
            ranked.len(),
            candidate_count,
            radius_km
        );
        Ok(ranked)
    }
}

fn check_radius(radius_km: f64) -> Result<(), HubFinderError> {
    if radius_km.is_nan() || !(0.0..=MAX_RADIUS_KM).contains(&radius_km) {
        return Err(HubFinderError::InvalidArgument(format!(
            "radius must be between 0 and {} km, got {}",
            MAX_RADIUS_KM, radius_km
        )));
    }
    Ok(())
}
