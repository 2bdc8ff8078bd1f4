//! Route analysis pipeline.
//!
//! Composes the farthest-point finder, the most frequented area strategy and
//! the geofence partitioner into one [`AnalysisResult`]. The steps run in
//! order because later ones consume earlier results: the default clustering
//! radius depends on the farthest distance from the start.

use std::time::Instant;

use log::{debug, info};

use crate::clustering::{resolve_radius, ClusterStrategy};
use crate::error::Result;
use crate::farthest::farthest_from_start;
use crate::geofence::{centroid_of, outside_geofence};
use crate::{
    AnalysisConfig, AnalysisResult, MaxDistanceFromStart, MostFrequentedArea, Waypoint,
    WaypointsOutsideGeofence,
};

/// Analyze a route with the clustering strategy selected in the configuration.
///
/// Fails with [`EmptyRoute`](crate::AnalysisError::EmptyRoute) if the route has
/// no waypoints; there is nothing meaningful to report for an empty route.
///
/// # Example
/// ```
/// use route_analyzer::{analyze, AnalysisConfig, Waypoint};
///
/// let route = vec![Waypoint::new(5, 1.0, 1.0)];
/// let result = analyze(&route, &AnalysisConfig::default()).unwrap();
/// assert_eq!(result.max_distance_from_start.distance_km, 0.0);
/// assert_eq!(result.most_frequented_area.entries_count, 1);
/// ```
pub fn analyze(route: &[Waypoint], config: &AnalysisConfig) -> Result<AnalysisResult> {
    let strategy = config.clustering_method.strategy();
    analyze_with(route, config, strategy.as_ref())
}

/// Analyze a route with an explicit clustering strategy.
///
/// `config.clustering_method` is ignored.
pub fn analyze_with(
    route: &[Waypoint],
    config: &AnalysisConfig,
    strategy: &dyn ClusterStrategy,
) -> Result<AnalysisResult> {
    let start = Instant::now();
    let earth_radius = config.earth_radius_km;

    // Step 1: Farthest point from the start
    let farthest = farthest_from_start(route, earth_radius)?;
    debug!(
        "[Analysis] Farthest waypoint at t={} is {:.3} from start",
        farthest.waypoint.timestamp, farthest.distance_km
    );

    // Step 2: Neighborhood radius (configured or derived from the route span)
    let radius = resolve_radius(config.most_frequented_area_radius_km, farthest.distance_km);
    debug!(
        "[Analysis] Most frequented area radius {} ({})",
        radius,
        if config.most_frequented_area_radius_km.is_some() {
            "configured"
        } else {
            "derived"
        }
    );

    // Step 3: Most frequented area
    let area = strategy.most_frequented(route, earth_radius, radius)?;
    debug!(
        "[Analysis] Most frequented area ({}) centered at t={} with {} entries",
        strategy.name(),
        area.center.timestamp,
        area.entries_count
    );

    // Step 4: Geofence violations
    let outside = outside_geofence(
        route,
        earth_radius,
        config.geofence_center_latitude,
        config.geofence_center_longitude,
        config.geofence_radius_km,
    );
    let outside_center = centroid_of(&outside);
    debug!(
        "[Analysis] {} waypoints outside geofence of radius {}",
        outside.len(),
        config.geofence_radius_km
    );

    info!(
        "[Analysis] Analyzed {} waypoints in {}ms: max distance {:.3}, {} in busiest area, {} outside geofence",
        route.len(),
        start.elapsed().as_millis(),
        farthest.distance_km,
        area.entries_count,
        outside.len()
    );

    // Step 5: Assemble
    Ok(AnalysisResult {
        max_distance_from_start: MaxDistanceFromStart {
            waypoint: farthest.waypoint,
            distance_km: farthest.distance_km,
        },
        most_frequented_area: MostFrequentedArea {
            central_waypoint: area.center,
            area_radius_km: radius,
            entries_count: area.entries_count,
        },
        waypoints_outside_geofence: WaypointsOutsideGeofence {
            central_waypoint: outside_center,
            area_radius_km: config.geofence_radius_km,
            count: outside.len(),
            waypoints: outside,
        },
    })
}
