//! Geofence partitioning.
//!
//! A geofence is a circle on the sphere given by a center and a radius.
//! Waypoints farther than the radius from the center are "outside"; points
//! exactly on the boundary count as inside.

use geo::{Centroid, MultiPoint, Point};

use crate::geo_utils::haversine_distance;
use crate::{AnalysisConfig, GpsPoint, Waypoint};

/// A circular region on the Earth's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    pub center: GpsPoint,
    pub radius_km: f64,
}

impl Geofence {
    /// Create a geofence from its center coordinates and radius.
    pub fn new(center_latitude: f64, center_longitude: f64, radius_km: f64) -> Self {
        Self {
            center: GpsPoint::new(center_latitude, center_longitude),
            radius_km,
        }
    }

    /// The geofence described by an analysis configuration.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.geofence_center_latitude,
            config.geofence_center_longitude,
            config.geofence_radius_km,
        )
    }

    /// Whether the waypoint lies strictly outside the fence.
    pub fn is_outside(&self, earth_radius: f64, waypoint: &Waypoint) -> bool {
        haversine_distance(earth_radius, waypoint, &self.center) > self.radius_km
    }
}

/// Waypoints strictly farther than `radius` from the given center, in route order.
///
/// # Example
/// ```
/// use route_analyzer::{outside_geofence, Waypoint};
///
/// let route = vec![Waypoint::new(0, 0.0, 0.0), Waypoint::new(1, 10.0, 10.0)];
/// let outside = outside_geofence(&route, 6371.0, 0.0, 0.0, 5.0);
/// assert_eq!(outside, vec![route[1]]);
/// ```
pub fn outside_geofence(
    route: &[Waypoint],
    earth_radius: f64,
    center_lat: f64,
    center_lon: f64,
    radius: f64,
) -> Vec<Waypoint> {
    let fence = Geofence::new(center_lat, center_lon, radius);
    route
        .iter()
        .filter(|w| fence.is_outside(earth_radius, w))
        .copied()
        .collect()
}

/// Split a route into (inside, outside) waypoints. Both keep route order.
pub fn partition(
    route: &[Waypoint],
    earth_radius: f64,
    fence: &Geofence,
) -> (Vec<Waypoint>, Vec<Waypoint>) {
    route
        .iter()
        .copied()
        .partition(|w| !fence.is_outside(earth_radius, w))
}

/// Arithmetic mean of the waypoints' latitudes and longitudes.
///
/// Returns None for an empty slice. The result has timestamp 0.
///
/// This is a planar mean of angular coordinates, not a spherical centroid: it
/// is accurate for compact groups of points but drifts near the poles and is
/// wrong for groups straddling the antimeridian. Do not use it as a geodesic
/// center for further distance computations.
pub fn centroid_of(waypoints: &[Waypoint]) -> Option<Waypoint> {
    let points: MultiPoint<f64> = waypoints
        .iter()
        .map(|w| Point::new(w.longitude, w.latitude))
        .collect();

    points
        .centroid()
        .map(|c| Waypoint::new(0, c.y(), c.x()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn sample_route() -> Vec<Waypoint> {
        vec![
            Waypoint::new(0, 0.0, 0.0),
            Waypoint::new(1, 0.0, 0.01),
            Waypoint::new(2, 10.0, 10.0),
            Waypoint::new(3, -10.0, -10.0),
            Waypoint::new(4, 0.01, 0.0),
        ]
    }

    #[test]
    fn test_outside_geofence() {
        let route = sample_route();
        let outside = outside_geofence(&route, 6371.0, 0.0, 0.0, 5.0);
        assert_eq!(outside, vec![route[2], route[3]]);
    }

    #[test]
    fn test_boundary_is_inside() {
        let route = vec![Waypoint::new(0, 0.0, 1.0)];
        let radius = haversine_distance(6371.0, &route[0], &GpsPoint::new(0.0, 0.0));
        assert!(outside_geofence(&route, 6371.0, 0.0, 0.0, radius).is_empty());
        assert_eq!(
            outside_geofence(&route, 6371.0, 0.0, 0.0, radius * 0.999),
            route
        );
    }

    #[test]
    fn test_partition_is_complete() {
        let route = sample_route();
        let fence = Geofence::new(0.0, 0.0, 5.0);
        let (inside, outside) = partition(&route, 6371.0, &fence);

        assert_eq!(inside.len() + outside.len(), route.len());
        assert_eq!(inside, vec![route[0], route[1], route[4]]);
        assert_eq!(outside, outside_geofence(&route, 6371.0, 0.0, 0.0, 5.0));
    }

    #[test]
    fn test_centroid_empty() {
        assert_eq!(centroid_of(&[]), None);
    }

    #[test]
    fn test_centroid_single() {
        let wp = Waypoint::new(42, 10.0, 10.0);
        assert_eq!(centroid_of(&[wp]), Some(Waypoint::new(0, 10.0, 10.0)));
    }

    #[test]
    fn test_centroid_mean() {
        let centroid = centroid_of(&[
            Waypoint::new(1, 10.0, 20.0),
            Waypoint::new(2, 20.0, 40.0),
            Waypoint::new(3, 30.0, 0.0),
        ])
        .unwrap();
        assert_eq!(centroid.timestamp, 0);
        assert!(approx_eq(centroid.latitude, 20.0, 1e-9));
        assert!(approx_eq(centroid.longitude, 20.0, 1e-9));
    }

    #[test]
    fn test_centroid_is_planar_across_antimeridian() {
        // Planar mean, so two points near the antimeridian average to ~0 longitude
        let centroid = centroid_of(&[
            Waypoint::new(1, 0.0, 179.0),
            Waypoint::new(2, 0.0, -179.0),
        ])
        .unwrap();
        assert!(approx_eq(centroid.longitude, 0.0, 1e-9));
    }

    #[test]
    fn test_geofence_from_config() {
        let config = AnalysisConfig::default().with_geofence(45.0, 7.0, 12.5);
        let fence = Geofence::from_config(&config);
        assert_eq!(fence.center, GpsPoint::new(45.0, 7.0));
        assert_eq!(fence.radius_km, 12.5);
    }
}
