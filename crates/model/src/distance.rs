use itertools::Itertools;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::round_to;

use crate::{
    route::RouteStopEntry,
    stop::{GeoPoint, Stop, DISTANCE_DECIMALS},
    ExampleData,
};

/// Where the distance of a single leg comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum LegSource {
    /// First stop of a route, it has no predecessor.
    Start,
    /// Great-circle distance between both stops.
    Measured,
    /// Manual override supplied by the caller.
    Overridden,
    /// A location is missing and there is no override, counted as zero.
    Unknown,
}

/// Per-leg and running distances of a route, all parallel to its stops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteDistances {
    pub leg_distances: Vec<f64>,
    pub cumulative_distances: Vec<f64>,
    pub total_distance: f64,
    pub leg_sources: Vec<LegSource>,
}

impl RouteDistances {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            leg_distances: Vec::with_capacity(capacity),
            cumulative_distances: Vec::with_capacity(capacity),
            total_distance: 0.0,
            leg_sources: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, source: LegSource, leg_distance: f64) {
        // re-round on every step, drift over many legs would show up otherwise
        let cumulative = round_to(self.total_distance + leg_distance, DISTANCE_DECIMALS);
        self.leg_distances.push(leg_distance);
        self.cumulative_distances.push(cumulative);
        self.leg_sources.push(source);
        self.total_distance = cumulative;
    }

    pub fn len(&self) -> usize {
        self.leg_distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leg_distances.is_empty()
    }

    pub fn unknown_legs(&self) -> usize {
        self.leg_sources
            .iter()
            .filter(|source| **source == LegSource::Unknown)
            .count()
    }
}

impl ExampleData for RouteDistances {
    fn example_data() -> Self {
        let stop = |id: &str, latitude: f64, longitude: f64| {
            crate::WithId::new(
                utility::id::Id::new(id.to_owned()),
                Stop::new(id, Some(GeoPoint::new(latitude, longitude))),
            )
        };
        let route = crate::route::Route::from_stops([
            stop("A", 0.0, 0.0),
            stop("B", 0.0, 1.0),
            stop("C", 1.0, 1.0),
        ]);
        route.distances()
    }
}

/// Computes leg, cumulative and total distance over the stops in the given
/// order.
///
/// The computation never fails: a leg whose stops lack a complete location and
/// has no override counts as zero. Overrides win over geometry, except for
/// negative or non-finite values which are treated like a missing location.
pub fn compute_route_distances(entries: &[RouteStopEntry]) -> RouteDistances {
    let mut distances = RouteDistances::with_capacity(entries.len());
    if entries.is_empty() {
        return distances;
    }

    distances.push(LegSource::Start, 0.0);
    for (previous, current) in entries.iter().tuple_windows() {
        let (source, leg_distance) = leg_distance(previous, current);
        distances.push(source, leg_distance);
    }
    distances
}

fn leg_distance(previous: &RouteStopEntry, current: &RouteStopEntry) -> (LegSource, f64) {
    if let Some(distance) = current.manual_distance_override {
        if distance.is_finite() && distance >= 0.0 {
            return (LegSource::Overridden, distance);
        }
        log::debug!(
            "ignoring invalid distance override {} for stop {}",
            distance,
            current.stop.id
        );
        return (LegSource::Unknown, 0.0);
    }

    match previous.stop.content.distance_to(&current.stop.content) {
        Some(distance) if distance.is_finite() => (LegSource::Measured, distance),
        _ => (LegSource::Unknown, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use utility::id::Id;

    use super::*;
    use crate::WithId;

    fn entry(
        id: &str,
        location: Option<GeoPoint>,
        manual_distance_override: Option<f64>,
    ) -> RouteStopEntry {
        RouteStopEntry::new(0, WithId::new(Id::new(id.to_owned()), Stop::new(id, location)))
            .with_override(manual_distance_override)
    }

    fn at(id: &str, latitude: f64, longitude: f64) -> RouteStopEntry {
        entry(id, Some(GeoPoint::new(latitude, longitude)), None)
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 0.01, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn empty_route() {
        let distances = compute_route_distances(&[]);
        assert!(distances.leg_distances.is_empty());
        assert!(distances.cumulative_distances.is_empty());
        assert_eq!(distances.total_distance, 0.0);
    }

    #[test]
    fn single_stop() {
        for stop in [at("a", 23.81, 90.41), entry("b", None, Some(12.0))] {
            let distances = compute_route_distances(&[stop]);
            assert_eq!(distances.leg_distances, vec![0.0]);
            assert_eq!(distances.cumulative_distances, vec![0.0]);
            assert_eq!(distances.leg_sources, vec![LegSource::Start]);
            assert_eq!(distances.total_distance, 0.0);
        }
    }

    #[test]
    fn three_stops_on_a_one_degree_grid() {
        let distances =
            compute_route_distances(&[at("a", 0.0, 0.0), at("b", 0.0, 1.0), at("c", 1.0, 1.0)]);
        assert_close(&distances.leg_distances, &[0.0, 111.19, 111.19]);
        assert_close(&distances.cumulative_distances, &[0.0, 111.19, 222.38]);
        assert!((distances.total_distance - 222.38).abs() < 0.01);
        assert_eq!(
            distances.leg_sources,
            vec![LegSource::Start, LegSource::Measured, LegSource::Measured]
        );
        assert_eq!(distances, RouteDistances::example_data());
    }

    #[test]
    fn override_wins_over_coordinates() {
        let distances = compute_route_distances(&[
            at("a", 0.0, 0.0),
            entry("b", Some(GeoPoint::new(0.0, 1.0)), Some(5.5)),
        ]);
        assert_eq!(distances.leg_distances[1], 5.5);
        assert_eq!(distances.leg_sources[1], LegSource::Overridden);
        assert_eq!(distances.total_distance, 5.5);
    }

    #[test]
    fn override_applies_without_coordinates() {
        let distances =
            compute_route_distances(&[entry("a", None, None), entry("b", None, Some(3.25))]);
        assert_eq!(distances.leg_distances, vec![0.0, 3.25]);
        assert_eq!(distances.total_distance, 3.25);
    }

    #[test]
    fn missing_location_counts_as_zero() {
        let distances = compute_route_distances(&[
            at("a", 23.8103, 90.4125),
            entry("b", None, None),
            at("c", 23.8193, 90.4125),
        ]);
        assert_eq!(distances.leg_distances, vec![0.0, 0.0, 0.0]);
        assert_eq!(distances.total_distance, 0.0);
        assert_eq!(distances.unknown_legs(), 2);
    }

    #[test]
    fn half_known_location_counts_as_zero() {
        let half = GeoPoint {
            latitude: Some(0.0),
            longitude: None,
        };
        let distances = compute_route_distances(&[at("a", 0.0, 0.0), entry("b", Some(half), None)]);
        assert_eq!(distances.leg_distances, vec![0.0, 0.0]);
        assert_eq!(distances.leg_sources[1], LegSource::Unknown);
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let distances = compute_route_distances(&[
            at("a", 0.0, 0.0),
            entry("b", Some(GeoPoint::new(0.0, 1.0)), Some(-4.0)),
            entry("c", None, Some(f64::NAN)),
        ]);
        assert_eq!(distances.leg_distances, vec![0.0, 0.0, 0.0]);
        assert_eq!(distances.unknown_legs(), 2);
    }

    #[test]
    fn cumulative_distances_never_decrease() {
        let distances = compute_route_distances(&[
            at("a", 54.3233, 10.1228),
            at("b", 54.2891, 10.2539),
            entry("c", None, None),
            entry("d", None, Some(0.0)),
            at("e", 54.3233, 10.1228),
            entry("f", None, Some(17.3)),
            at("g", f64::NAN, 10.0),
            at("h", 53.5511, 9.9937),
        ]);
        assert_eq!(distances.len(), 8);
        for window in distances.cumulative_distances.windows(2) {
            assert!(window[1] >= window[0], "{:?}", distances.cumulative_distances);
        }
        assert_eq!(
            distances.total_distance,
            *distances.cumulative_distances.last().unwrap()
        );
    }

    #[test]
    fn cumulative_sum_is_rounded_at_every_step() {
        let entries = (0..100)
            .map(|i| entry(&format!("s{i}"), None, Some(0.1)))
            .collect::<Vec<_>>();
        let distances = compute_route_distances(&entries);
        assert_eq!(distances.total_distance, 9.9);
        assert_eq!(distances.cumulative_distances[10], 1.0);
    }

    #[test]
    fn huge_override_keeps_totals_finite() {
        let distances =
            compute_route_distances(&[entry("a", None, None), entry("b", None, Some(1e307))]);
        assert_eq!(distances.cumulative_distances, vec![0.0, 1e307]);
        assert_eq!(distances.total_distance, 1e307);
        assert!(serde_json::to_value(&distances).unwrap()["totalDistance"].is_f64());
    }

    #[test]
    fn serializes_in_camel_case() {
        let distances = compute_route_distances(&[entry("a", None, None), entry("b", None, Some(2.0))]);
        assert_eq!(
            serde_json::to_value(&distances).unwrap(),
            serde_json::json!({
                "legDistances": [0.0, 2.0],
                "cumulativeDistances": [0.0, 2.0],
                "totalDistance": 2.0,
                "legSources": ["start", "overridden"],
            })
        );
    }

    #[test]
    fn input_is_left_untouched() {
        let entries = vec![at("a", 0.0, 0.0), entry("b", None, Some(2.0))];
        let before = entries.clone();
        let _ = compute_route_distances(&entries);
        assert_eq!(entries, before);
    }
}
