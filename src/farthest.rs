//! Farthest point from the start of a route.

use crate::error::{OptionExt, Result};
use crate::geo_utils::haversine_distance;
use crate::Waypoint;

/// A waypoint together with its distance from the route start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarthestPoint {
    pub waypoint: Waypoint,
    pub distance_km: f64,
}

/// Find the waypoint farthest from the first waypoint of the route.
///
/// The start itself is a candidate (distance 0), so a single-waypoint route
/// returns that waypoint. When several waypoints share the maximum distance
/// the first one in route order wins.
///
/// A NaN distance ranks above every number, so the first waypoint with a
/// non-finite coordinate is reported with a NaN distance instead of being
/// skipped.
///
/// Fails with [`EmptyRoute`](crate::AnalysisError::EmptyRoute) if the route has no waypoints.
///
/// # Example
/// ```
/// use route_analyzer::{farthest_from_start, Waypoint};
///
/// let route = vec![Waypoint::new(0, 0.0, 0.0), Waypoint::new(1, 10.0, 10.0)];
/// let farthest = farthest_from_start(&route, 6371.0).unwrap();
/// assert_eq!(farthest.waypoint, route[1]);
/// ```
pub fn farthest_from_start(route: &[Waypoint], earth_radius: f64) -> Result<FarthestPoint> {
    let start = route.first().ok_or_empty_route("farthest_from_start")?;

    let mut best = FarthestPoint {
        waypoint: *start,
        distance_km: haversine_distance(earth_radius, start, start),
    };

    for waypoint in &route[1..] {
        let distance = haversine_distance(earth_radius, start, waypoint);
        if is_farther(distance, best.distance_km) {
            best = FarthestPoint {
                waypoint: *waypoint,
                distance_km: distance,
            };
        }
    }

    Ok(best)
}

/// Strict "greater than" that orders NaN above all numbers.
fn is_farther(candidate: f64, best: f64) -> bool {
    match (candidate.is_nan(), best.is_nan()) {
        (false, false) => candidate > best,
        (true, false) => true,
        _ => false,
    }
}

/// Largest distance between any two waypoints of the route (its diameter).
///
/// Returns 0.0 for routes with fewer than two waypoints. O(n²).
pub fn max_pairwise_distance(route: &[Waypoint], earth_radius: f64) -> f64 {
    if route.len() < 2 {
        return 0.0;
    }

    route
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            route[i + 1..]
                .iter()
                .map(move |b| haversine_distance(earth_radius, a, b))
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnalysisError;

    fn sample_route() -> Vec<Waypoint> {
        vec![
            Waypoint::new(0, 45.0000, 7.0000),
            Waypoint::new(1, 45.0100, 7.0100),
            Waypoint::new(2, 45.0500, 7.0500),
            Waypoint::new(3, 45.0200, 7.0200),
        ]
    }

    #[test]
    fn test_farthest_point() {
        let route = sample_route();
        let farthest = farthest_from_start(&route, 6371.0).unwrap();
        assert_eq!(farthest.waypoint, route[2]);
        assert!(farthest.distance_km > 0.0);
    }

    #[test]
    fn test_single_waypoint() {
        let route = vec![Waypoint::new(5, 1.0, 1.0)];
        let farthest = farthest_from_start(&route, 6371.0).unwrap();
        assert_eq!(farthest.waypoint, route[0]);
        assert_eq!(farthest.distance_km, 0.0);
    }

    #[test]
    fn test_empty_route() {
        let result = farthest_from_start(&[], 6371.0);
        assert!(matches!(result, Err(AnalysisError::EmptyRoute { .. })));
    }

    #[test]
    fn test_tie_keeps_first() {
        // Same coordinates, different timestamps: equal distance from start
        let route = vec![
            Waypoint::new(0, 0.0, 0.0),
            Waypoint::new(1, 1.0, 0.0),
            Waypoint::new(2, 1.0, 0.0),
        ];
        let farthest = farthest_from_start(&route, 6371.0).unwrap();
        assert_eq!(farthest.waypoint.timestamp, 1);
    }

    #[test]
    fn test_all_points_at_start() {
        let route = vec![Waypoint::new(0, 3.0, 3.0), Waypoint::new(1, 3.0, 3.0)];
        let farthest = farthest_from_start(&route, 6371.0).unwrap();
        assert_eq!(farthest.waypoint.timestamp, 0);
        assert_eq!(farthest.distance_km, 0.0);
    }

    #[test]
    fn test_max_pairwise_distance() {
        let route = sample_route();
        let diameter = max_pairwise_distance(&route, 6371.0);
        let from_start = farthest_from_start(&route, 6371.0).unwrap();
        assert!(diameter >= from_start.distance_km);

        assert_eq!(max_pairwise_distance(&route[..1], 6371.0), 0.0);
        assert_eq!(max_pairwise_distance(&[], 6371.0), 0.0);
    }

    #[test]
    fn test_nan_start_propagates() {
        let route = vec![Waypoint::new(0, f64::NAN, 0.0), Waypoint::new(1, 1.0, 1.0)];
        let farthest = farthest_from_start(&route, 6371.0).unwrap();
        assert_eq!(farthest.waypoint.timestamp, 0);
        assert!(farthest.distance_km.is_nan());
    }

    #[test]
    fn test_nan_waypoint_is_reported() {
        let route = vec![
            Waypoint::new(0, 0.0, 0.0),
            Waypoint::new(1, 5.0, 5.0),
            Waypoint::new(2, f64::NAN, 0.0),
            Waypoint::new(3, 10.0, 10.0),
            Waypoint::new(4, 0.0, f64::NAN),
        ];
        let farthest = farthest_from_start(&route, 6371.0).unwrap();
        assert_eq!(farthest.waypoint.timestamp, 2);
        assert!(farthest.distance_km.is_nan());
    }
}
