//! Most frequented area detection.
//!
//! The most frequented area is the waypoint whose neighborhood (all waypoints
//! within a radius, itself included) is the largest. Every waypoint is a
//! candidate center, which makes the canonical algorithm O(n²) in the route
//! length. That is fine for hundreds to low thousands of waypoints and is the
//! main cost of an analysis beyond that; [`IndexedNeighborhood`] and the
//! `parallel` feature exist for larger routes.
//!
//! Strategies implement [`ClusterStrategy`] so the orchestrator does not care
//! which policy is in use:
//! - [`RadiusNeighborhood`] - all-pairs neighborhood counting (canonical)
//! - [`IndexedNeighborhood`] - same result, candidates pre-filtered by an R-tree
//! - [`ExactDuplicate`] - counts bit-identical waypoints, ignores the radius

use std::collections::HashMap;
use std::time::Instant;

use log::debug;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{OptionExt, Result};
use crate::geo_utils::{distance_to_degrees, haversine_distance};
use crate::Waypoint;

/// Radius used when the route spans less than [`SMALL_ROUTE_SPAN_KM`].
pub const DEFAULT_MIN_RADIUS_KM: f64 = 0.1;

/// Routes spanning less than this use [`DEFAULT_MIN_RADIUS_KM`].
pub const SMALL_ROUTE_SPAN_KM: f64 = 1.0;

/// Share of the route span used as radius for larger routes.
pub const DEFAULT_RADIUS_FRACTION: f64 = 0.1;

const OPERATION: &str = "most_frequented_area";

/// Resolve the neighborhood radius for the most frequented area.
///
/// A configured radius is used verbatim. Otherwise the radius scales with the
/// route: 0.1 for routes whose farthest point is less than 1.0 from the start,
/// 10% of that distance for anything larger. Both values are in the unit of
/// the Earth radius used to compute `max_distance_from_start`.
///
/// # Example
/// ```
/// use route_analyzer::resolve_radius;
///
/// assert_eq!(resolve_radius(None, 0.5), 0.1);
/// assert_eq!(resolve_radius(None, 200.0), 20.0);
/// assert_eq!(resolve_radius(Some(3.0), 200.0), 3.0);
/// ```
pub fn resolve_radius(configured: Option<f64>, max_distance_from_start: f64) -> f64 {
    match configured {
        Some(radius) => radius,
        None if max_distance_from_start < SMALL_ROUTE_SPAN_KM => DEFAULT_MIN_RADIUS_KM,
        None => max_distance_from_start * DEFAULT_RADIUS_FRACTION,
    }
}

/// Center of the most frequented area and the size of its neighborhood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequentedArea {
    pub center: Waypoint,
    /// Waypoints in the neighborhood, the center included
    pub entries_count: usize,
}

/// A policy for picking the most frequented area of a route.
///
/// Implementations must fail with [`EmptyRoute`](crate::AnalysisError::EmptyRoute)
/// on an empty route and break ties in favor of the first waypoint in route order.
pub trait ClusterStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Find the most frequented area of `route` for the given neighborhood radius.
    fn most_frequented(
        &self,
        route: &[Waypoint],
        earth_radius: f64,
        radius: f64,
    ) -> Result<FrequentedArea>;
}

/// Find the most frequented area with the canonical radius-based strategy.
///
/// Shorthand for [`RadiusNeighborhood`]. Fails with
/// [`EmptyRoute`](crate::AnalysisError::EmptyRoute) on an empty route.
pub fn most_frequented_area(
    route: &[Waypoint],
    earth_radius: f64,
    radius: f64,
) -> Result<FrequentedArea> {
    RadiusNeighborhood.most_frequented(route, earth_radius, radius)
}

/// Which [`ClusterStrategy`] an analysis uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ClusteringMethod {
    /// All-pairs neighborhood counting
    #[default]
    Radius,
    /// Bit-identical duplicate counting
    Exact,
    /// Neighborhood counting accelerated by an R-tree
    Indexed,
}

impl ClusteringMethod {
    /// Instantiate the strategy for this method.
    pub fn strategy(self) -> Box<dyn ClusterStrategy> {
        match self {
            ClusteringMethod::Radius => Box::new(RadiusNeighborhood),
            ClusteringMethod::Exact => Box::new(ExactDuplicate),
            ClusteringMethod::Indexed => Box::new(IndexedNeighborhood),
        }
    }
}

/// Pick the first waypoint with the highest count.
fn first_max(route: &[Waypoint], counts: &[usize]) -> Result<FrequentedArea> {
    let mut best: Option<FrequentedArea> = None;

    for (waypoint, &count) in route.iter().zip(counts) {
        match best {
            Some(b) if count <= b.entries_count => {}
            _ => {
                best = Some(FrequentedArea {
                    center: *waypoint,
                    entries_count: count,
                })
            }
        }
    }

    best.ok_or_empty_route(OPERATION)
}

/// Count waypoints within `radius` of `center` by scanning the whole route.
fn neighborhood_count(
    route: &[Waypoint],
    center: &Waypoint,
    earth_radius: f64,
    radius: f64,
) -> usize {
    route
        .iter()
        .filter(|other| haversine_distance(earth_radius, center, *other) <= radius)
        .count()
}

// ============================================================================
// Radius-based neighborhood counting
// ============================================================================

/// Canonical strategy: for every waypoint, count the waypoints within the
/// radius (boundary included) and keep the largest neighborhood.
///
/// With the `parallel` feature the candidate centers are counted with rayon.
/// Counts are collected in route order, so the result is identical either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct RadiusNeighborhood;

impl ClusterStrategy for RadiusNeighborhood {
    fn name(&self) -> &'static str {
        "radius"
    }

    fn most_frequented(
        &self,
        route: &[Waypoint],
        earth_radius: f64,
        radius: f64,
    ) -> Result<FrequentedArea> {
        route.first().ok_or_empty_route(OPERATION)?;
        let start = Instant::now();

        #[cfg(feature = "parallel")]
        let counts: Vec<usize> = route
            .par_iter()
            .map(|center| neighborhood_count(route, center, earth_radius, radius))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let counts: Vec<usize> = route
            .iter()
            .map(|center| neighborhood_count(route, center, earth_radius, radius))
            .collect();

        debug!(
            "[Clustering] Counted {} neighborhoods (radius={}) in {}ms",
            route.len(),
            radius,
            start.elapsed().as_millis()
        );

        first_max(route, &counts)
    }
}

// ============================================================================
// Exact duplicate counting
// ============================================================================

/// Counts bit-identical waypoints (same timestamp, latitude and longitude).
///
/// The center is the first waypoint of the largest group of duplicates.
/// The radius is ignored. Useful for data sources that re-emit the same
/// sample while a vehicle is parked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactDuplicate;

impl ClusterStrategy for ExactDuplicate {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn most_frequented(
        &self,
        route: &[Waypoint],
        _earth_radius: f64,
        _radius: f64,
    ) -> Result<FrequentedArea> {
        route.first().ok_or_empty_route(OPERATION)?;

        let mut occurrences: HashMap<Waypoint, usize> = HashMap::with_capacity(route.len());
        for waypoint in route {
            *occurrences.entry(*waypoint).or_insert(0) += 1;
        }

        debug!(
            "[Clustering] {} distinct waypoints out of {}",
            occurrences.len(),
            route.len()
        );

        let counts: Vec<usize> = route.iter().map(|w| occurrences[w]).collect();
        first_max(route, &counts)
    }
}

// ============================================================================
// R-tree accelerated neighborhood counting
// ============================================================================

/// A waypoint position with its route index for R-tree queries.
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    idx: usize,
    lat: f64,
    lng: f64,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lat, self.lng])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.lat - point[0];
        let dlng = self.lng - point[1];
        dlat * dlat + dlng * dlng
    }
}

/// Relative widening of query envelopes so float rounding never drops a
/// waypoint that the exact haversine test would accept.
const ENVELOPE_MARGIN: f64 = 1e-9;

/// Same result as [`RadiusNeighborhood`], but each candidate only checks the
/// waypoints inside a lat/lon envelope that contains its whole neighborhood.
///
/// The envelope is derived from the angular radius: `Δlat <= d` and
/// `Δlon <= asin(sin d / cos lat)`. Candidates whose envelope would reach a
/// pole or cross the antimeridian are counted with a full scan, as are all
/// candidates of a route with coordinates outside the standard ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexedNeighborhood;

impl IndexedNeighborhood {
    /// Query envelope for `center`, or None if a full scan is required.
    fn envelope(center: &Waypoint, radius: f64, earth_radius: f64) -> Option<AABB<[f64; 2]>> {
        let lat_span =
            distance_to_degrees(radius, earth_radius) * (1.0 + ENVELOPE_MARGIN) + ENVELOPE_MARGIN;
        if !lat_span.is_finite() || center.latitude.abs() + lat_span >= 90.0 {
            return None;
        }

        let ratio = (radius / earth_radius).sin() / center.latitude.to_radians().cos();
        if !ratio.is_finite() || ratio >= 1.0 {
            return None;
        }
        let lng_span = ratio.asin().to_degrees() * (1.0 + ENVELOPE_MARGIN) + ENVELOPE_MARGIN;
        if center.longitude - lng_span < -180.0 || center.longitude + lng_span > 180.0 {
            return None;
        }

        Some(AABB::from_corners(
            [center.latitude - lat_span, center.longitude - lng_span],
            [center.latitude + lat_span, center.longitude + lng_span],
        ))
    }
}

fn in_standard_range(waypoint: &Waypoint) -> bool {
    waypoint.latitude.is_finite()
        && waypoint.longitude.is_finite()
        && waypoint.latitude.abs() <= 90.0
        && waypoint.longitude.abs() <= 180.0
}

impl ClusterStrategy for IndexedNeighborhood {
    fn name(&self) -> &'static str {
        "indexed"
    }

    fn most_frequented(
        &self,
        route: &[Waypoint],
        earth_radius: f64,
        radius: f64,
    ) -> Result<FrequentedArea> {
        route.first().ok_or_empty_route(OPERATION)?;

        let angular_radius = radius / earth_radius;
        if !(angular_radius >= 0.0) || !route.iter().all(in_standard_range) {
            debug!("[Clustering] Index not applicable, falling back to full scan");
            return RadiusNeighborhood.most_frequented(route, earth_radius, radius);
        }

        let start = Instant::now();
        let indexed: Vec<IndexedPoint> = route
            .iter()
            .enumerate()
            .map(|(idx, w)| IndexedPoint {
                idx,
                lat: w.latitude,
                lng: w.longitude,
            })
            .collect();
        let tree = RTree::bulk_load(indexed);

        let mut full_scans = 0usize;
        let counts: Vec<usize> = route
            .iter()
            .map(|center| match Self::envelope(center, radius, earth_radius) {
                Some(envelope) => tree
                    .locate_in_envelope(&envelope)
                    .filter(|p| haversine_distance(earth_radius, center, &route[p.idx]) <= radius)
                    .count(),
                None => {
                    full_scans += 1;
                    neighborhood_count(route, center, earth_radius, radius)
                }
            })
            .collect();

        debug!(
            "[Clustering] Counted {} neighborhoods via R-tree ({} full scans) in {}ms",
            route.len(),
            full_scans,
            start.elapsed().as_millis()
        );

        first_max(route, &counts)
    }
}
