//! # Route Analyzer
//!
//! Batch geospatial analysis of a recorded vehicle route.
//!
//! Given a time-ordered sequence of GPS waypoints and an [`AnalysisConfig`],
//! this library computes:
//! - the waypoint farthest from the route's start, and its distance
//! - the most frequented area (densest waypoint neighborhood)
//! - the waypoints outside a circular geofence, and their centroid
//!
//! All distances are great-circle (haversine) distances scaled by the
//! configured Earth radius, so every distance and radius shares one unit.
//!
//! ## Features
//!
//! - **`cli`** (default) - Build the `route-analyzer` binary
//! - **`parallel`** - Count clustering neighborhoods in parallel with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use route_analyzer::{analyze, AnalysisConfig, Waypoint};
//!
//! let route = vec![
//!     Waypoint::new(0, 0.0, 0.0),
//!     Waypoint::new(1, 0.0, 0.01),
//!     Waypoint::new(2, 10.0, 10.0),
//! ];
//! let config = AnalysisConfig::default().with_geofence(0.0, 0.0, 5.0);
//!
//! let result = analyze(&route, &config).unwrap();
//! assert_eq!(result.max_distance_from_start.waypoint, route[2]);
//! assert_eq!(result.waypoints_outside_geofence.count, 1);
//! ```

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{AnalysisError, OptionExt, Result};

// Geographic utilities (haversine distance, coordinate trait)
pub mod geo_utils;
pub use geo_utils::{haversine_distance, Coordinate, MEAN_EARTH_RADIUS_KM};

// Farthest point from the route start
pub mod farthest;
pub use farthest::{farthest_from_start, max_pairwise_distance, FarthestPoint};

// Most frequented area detection (pluggable strategies)
pub mod clustering;
pub use clustering::{
    most_frequented_area, resolve_radius, ClusterStrategy, ClusteringMethod, ExactDuplicate,
    FrequentedArea, IndexedNeighborhood, RadiusNeighborhood,
};

// Geofence partitioning and centroid
pub mod geofence;
pub use geofence::{centroid_of, outside_geofence, partition, Geofence};

// Orchestration of the full analysis
pub mod analysis;
pub use analysis::{analyze, analyze_with};

// CSV/JSON adapters for route, config and result files
pub mod io;

// ============================================================================
// Core Types
// ============================================================================

/// A plain GPS coordinate with latitude and longitude in degrees.
///
/// Used where no timestamp is involved, such as a geofence center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single recorded sample along a route.
///
/// Equality and hashing compare all three fields bit-for-bit, so two
/// waypoints are equal only if they are exact duplicates. This makes
/// `Waypoint` usable as a `HashMap` key for duplicate counting.
///
/// # Example
/// ```
/// use route_analyzer::Waypoint;
/// let wp = Waypoint::new(1_700_000_000_000, 45.0703, 7.6869); // Turin
/// assert_eq!(wp, Waypoint::new(1_700_000_000_000, 45.0703, 7.6869));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Waypoint {
    /// Recording time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Waypoint {
    /// Create a new waypoint.
    pub fn new(timestamp: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp,
            latitude,
            longitude,
        }
    }
}

impl PartialEq for Waypoint {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
            && self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Waypoint {}

impl Hash for Waypoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.timestamp.hash(state);
        self.latitude.to_bits().hash(state);
        self.longitude.to_bits().hash(state);
    }
}

/// Parameters for one analysis run.
///
/// Field names serialize in camelCase (`earthRadiusKm`, `geofenceRadiusKm`, ...)
/// to match the configuration file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Radius of the Earth. Its unit is the unit of every distance in the result.
    pub earth_radius_km: f64,

    /// Latitude of the geofence center in degrees.
    pub geofence_center_latitude: f64,

    /// Longitude of the geofence center in degrees.
    pub geofence_center_longitude: f64,

    /// Geofence radius. Waypoints exactly on the boundary are inside.
    pub geofence_radius_km: f64,

    /// Neighborhood radius for the most frequented area.
    /// None = derive from the route's extent (see [`resolve_radius`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub most_frequented_area_radius_km: Option<f64>,

    /// Strategy used to find the most frequented area.
    /// Default: radius-based neighborhood counting
    #[serde(default)]
    pub clustering_method: ClusteringMethod,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            earth_radius_km: MEAN_EARTH_RADIUS_KM,
            geofence_center_latitude: 0.0,
            geofence_center_longitude: 0.0,
            geofence_radius_km: 0.0,
            most_frequented_area_radius_km: None,
            clustering_method: ClusteringMethod::default(),
        }
    }
}

impl AnalysisConfig {
    /// Set the geofence center and radius.
    pub fn with_geofence(mut self, latitude: f64, longitude: f64, radius_km: f64) -> Self {
        self.geofence_center_latitude = latitude;
        self.geofence_center_longitude = longitude;
        self.geofence_radius_km = radius_km;
        self
    }

    /// Use a fixed most-frequented-area radius instead of the derived default.
    pub fn with_frequented_area_radius(mut self, radius_km: f64) -> Self {
        self.most_frequented_area_radius_km = Some(radius_km);
        self
    }

    /// Set the Earth radius (and with it, the distance unit).
    pub fn with_earth_radius(mut self, earth_radius_km: f64) -> Self {
        self.earth_radius_km = earth_radius_km;
        self
    }

    /// Select the most-frequented-area strategy.
    pub fn with_clustering_method(mut self, method: ClusteringMethod) -> Self {
        self.clustering_method = method;
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// The waypoint farthest from the start of the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxDistanceFromStart {
    pub waypoint: Waypoint,
    pub distance_km: f64,
}

/// The densest neighborhood found along the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MostFrequentedArea {
    /// Waypoint at the center of the neighborhood
    pub central_waypoint: Waypoint,
    /// Resolved neighborhood radius. The exact-duplicate strategy ignores it,
    /// but it is still reported so the output shape does not depend on the
    /// strategy.
    pub area_radius_km: f64,
    /// Waypoints within the radius, the center included
    pub entries_count: usize,
}

/// Waypoints that left the configured geofence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointsOutsideGeofence {
    /// Planar centroid of the outside waypoints (None if there are none)
    pub central_waypoint: Option<Waypoint>,
    /// Configured geofence radius
    pub area_radius_km: f64,
    /// Number of outside waypoints
    pub count: usize,
    /// Outside waypoints in route order
    pub waypoints: Vec<Waypoint>,
}

/// Complete result of one route analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub max_distance_from_start: MaxDistanceFromStart,
    pub most_frequented_area: MostFrequentedArea,
    pub waypoints_outside_geofence: WaypointsOutsideGeofence,
}

// ============================================================================
// Tests
// ============================================================================
