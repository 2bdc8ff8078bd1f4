//! Geographic utilities.
//!
//! Great-circle distance with a caller-supplied Earth radius, so that the
//! unit of the radius (km, miles, ...) is the unit of every result.

use crate::{GpsPoint, Waypoint};

/// Mean Earth radius in kilometers.
pub const MEAN_EARTH_RADIUS_KM: f64 = 6371.0;

/// Anything with a latitude and longitude in degrees.
pub trait Coordinate {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
}

impl Coordinate for Waypoint {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl Coordinate for GpsPoint {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// `geo` points store longitude in `x` and latitude in `y`.
impl Coordinate for geo::Point<f64> {
    fn latitude(&self) -> f64 {
        self.y()
    }

    fn longitude(&self) -> f64 {
        self.x()
    }
}

/// Great-circle distance between two coordinates using the haversine formula.
///
/// The result is in the unit of `earth_radius`. Symmetric, zero for identical
/// coordinates. Inputs are not validated: NaN propagates to the result.
///
/// # Example
/// ```
/// use route_analyzer::{haversine_distance, GpsPoint, MEAN_EARTH_RADIUS_KM};
///
/// let london = GpsPoint::new(51.5074, -0.1278);
/// let paris = GpsPoint::new(48.8566, 2.3522);
/// let km = haversine_distance(MEAN_EARTH_RADIUS_KM, &london, &paris);
/// assert!((km - 343.5).abs() < 5.0);
/// ```
pub fn haversine_distance<A, B>(earth_radius: f64, p1: &A, p2: &B) -> f64
where
    A: Coordinate + ?Sized,
    B: Coordinate + ?Sized,
{
    let lat1 = p1.latitude().to_radians();
    let lat2 = p2.latitude().to_radians();
    let d_lat = (p2.latitude() - p1.latitude()).to_radians();
    let d_lon = (p2.longitude() - p1.longitude()).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * earth_radius * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Central angle in degrees subtended by an arc of `distance` on a sphere of
/// `earth_radius` (both in the same unit).
pub fn distance_to_degrees(distance: f64, earth_radius: f64) -> f64 {
    (distance / earth_radius).to_degrees()
}
