//! Itinerary reconstruction from disjoint GTFS tables.
//!
//! The join is deliberately forgiving: unresolved stop references are
//! dropped, missing routes null out the denormalized metadata, and
//! candidates that collapse below two positioned stops are discarded.
//! Nothing in here aborts the build.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use crate::models::{Itinerary, Route, Stop, StopTime, TransitNetwork, Trip};

/// Build output plus the observability counters.
#[derive(Clone, Debug, Default)]
pub struct ItineraryBatch {
    pub itineraries: Vec<Itinerary>,
    /// Distinct (route, direction) pairs seen in the trips input.
    pub candidate_pairs: usize,
    /// Pairs that produced an itinerary with at least two stops.
    pub accepted_pairs: usize,
}

/// Join stops, stop-times, trips, and routes into one itinerary per
/// distinct (route_id, direction) pair.
///
/// Output order follows the order in which pairs are first observed in
/// the trips input, so identical inputs always yield an identical list.
pub fn build_itineraries(
    stops: &[Stop],
    stop_times: &[StopTime],
    trips: &[Trip],
    routes: &[Route],
) -> ItineraryBatch {
    let stops_by_id = stop_lookup(stops);
    let routes_by_id = route_lookup(routes);

    // Multimap keyed by trip, each group in input order.
    let times_by_trip: HashMap<&str, Vec<&StopTime>> = stop_times
        .iter()
        .map(|st| (st.trip_id.as_str(), st))
        .into_group_map();

    let mut batch = ItineraryBatch::default();

    for trip in representative_trips(trips) {
        batch.candidate_pairs += 1;

        let mut ordered: Vec<&StopTime> = times_by_trip
            .get(trip.trip_id.as_str())
            .cloned()
            .unwrap_or_default();
        // Stable: equal sequence numbers keep their input order.
        ordered.sort_by_key(|st| st.stop_sequence);

        let resolved: Vec<Stop> = ordered
            .iter()
            .filter_map(|st| stops_by_id.get(st.stop_id.as_str()))
            .filter(|stop| stop.position().is_some())
            .map(|stop| (*stop).clone())
            .collect();

        if resolved.len() < 2 {
            continue;
        }
        batch.accepted_pairs += 1;

        let route = routes_by_id.get(trip.route_id.as_str());
        batch.itineraries.push(Itinerary {
            route_id: trip.route_id.clone(),
            direction_id: trip.direction_id.unwrap_or(0),
            trip_id: trip.trip_id.clone(),
            headsign: trip.trip_headsign.clone(),
            route_short_name: route.and_then(|r| r.route_short_name.clone()),
            route_long_name: route.and_then(|r| r.route_long_name.clone()),
            route_type: route.and_then(|r| r.route_type),
            color: route.and_then(|r| r.route_color.clone()),
            text_color: route.and_then(|r| r.route_text_color.clone()),
            stops: resolved,
        });
    }

    log::debug!(
        "built {} itineraries from {} (route, direction) pairs",
        batch.accepted_pairs,
        batch.candidate_pairs
    );
    batch
}

impl TransitNetwork {
    /// Convenience wrapper over [`build_itineraries`].
    pub fn itineraries(&self) -> ItineraryBatch {
        build_itineraries(&self.stops, &self.stop_times, &self.trips, &self.routes)
    }
}

/// Stop lookup by id. On duplicate ids the LAST record in input order
/// wins: the map is a plain overwrite-by-key fold.
fn stop_lookup(stops: &[Stop]) -> HashMap<&str, &Stop> {
    let mut lookup = HashMap::with_capacity(stops.len());
    for stop in stops {
        lookup.insert(stop.stop_id.as_str(), stop);
    }
    lookup
}

fn route_lookup(routes: &[Route]) -> HashMap<&str, &Route> {
    let mut lookup = HashMap::with_capacity(routes.len());
    for route in routes {
        lookup.insert(route.route_id.as_str(), route);
    }
    lookup
}

/// One representative trip per (route_id, direction-or-0) pair: the FIRST
/// trip encountered in input order wins, later trips with the same key are
/// ignored entirely. Returned in first-observed key order.
fn representative_trips(trips: &[Trip]) -> Vec<&Trip> {
    let mut seen: HashSet<(&str, u8)> = HashSet::with_capacity(trips.len());
    let mut representatives = Vec::new();
    for trip in trips {
        let key = (trip.route_id.as_str(), trip.direction_id.unwrap_or(0));
        if seen.insert(key) {
            representatives.push(trip);
        }
    }
    representatives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(id: &str, lat: f64, lon: f64) -> Stop {
        Stop {
            stop_id: id.into(),
            stop_name: id.to_ascii_uppercase(),
            stop_lat: Some(lat),
            stop_lon: Some(lon),
            ..Default::default()
        }
    }

    fn trip(route_id: &str, trip_id: &str, direction: Option<u8>) -> Trip {
        Trip {
            route_id: route_id.into(),
            service_id: "weekday".into(),
            trip_id: trip_id.into(),
            direction_id: direction,
            ..Default::default()
        }
    }

    fn stop_time(trip_id: &str, stop_id: &str, sequence: u32) -> StopTime {
        StopTime {
            trip_id: trip_id.into(),
            stop_id: stop_id.into(),
            stop_sequence: sequence,
            ..Default::default()
        }
    }

    #[test]
    fn orders_stops_by_sequence_not_input_order() {
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 1.0, 1.0), stop("c", 2.0, 2.0)];
        let trips = vec![trip("10", "t1", Some(0))];
        // Sequence [2, 1, 3] referencing [b, a, c].
        let stop_times = vec![
            stop_time("t1", "b", 2),
            stop_time("t1", "a", 1),
            stop_time("t1", "c", 3),
        ];

        let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
        assert_eq!(batch.itineraries.len(), 1);
        let ids: Vec<&str> = batch.itineraries[0]
            .stops
            .iter()
            .map(|s| s.stop_id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn equal_sequence_numbers_keep_input_order() {
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 1.0, 1.0), stop("c", 2.0, 2.0)];
        let trips = vec![trip("10", "t1", Some(0))];
        let stop_times = vec![
            stop_time("t1", "b", 1),
            stop_time("t1", "a", 1),
            stop_time("t1", "c", 2),
        ];

        let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
        let ids: Vec<&str> = batch.itineraries[0]
            .stops
            .iter()
            .map(|s| s.stop_id.as_str())
            .collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn single_resolved_stop_produces_no_itinerary() {
        let stops = vec![stop("a", 0.0, 0.0)];
        let trips = vec![trip("10", "t1", Some(0))];
        let stop_times = vec![stop_time("t1", "a", 1), stop_time("t1", "ghost", 2)];

        let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
        assert!(batch.itineraries.is_empty());
        assert_eq!(batch.candidate_pairs, 1);
        assert_eq!(batch.accepted_pairs, 0);
    }

    #[test]
    fn unresolved_stop_references_are_dropped_not_fatal() {
        let stops = vec![stop("a", 0.0, 0.0), stop("c", 2.0, 2.0)];
        let trips = vec![trip("10", "t1", Some(0))];
        let stop_times = vec![
            stop_time("t1", "a", 1),
            stop_time("t1", "ghost", 2),
            stop_time("t1", "c", 3),
        ];

        let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
        let ids: Vec<&str> = batch.itineraries[0]
            .stops
            .iter()
            .map(|s| s.stop_id.as_str())
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn unpositioned_stops_are_excluded_from_the_sequence() {
        let mut no_coords = stop("b", 0.0, 0.0);
        no_coords.stop_lat = None;
        no_coords.stop_lon = None;
        let stops = vec![stop("a", 0.0, 0.0), no_coords, stop("c", 2.0, 2.0)];
        let trips = vec![trip("10", "t1", Some(0))];
        let stop_times = vec![
            stop_time("t1", "a", 1),
            stop_time("t1", "b", 2),
            stop_time("t1", "c", 3),
        ];

        let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
        assert_eq!(batch.itineraries[0].stops.len(), 2);
    }

    #[test]
    fn first_trip_per_pair_wins_and_later_stop_times_are_never_consulted() {
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 1.0, 1.0), stop("c", 2.0, 2.0)];
        let trips = vec![trip("10", "first", Some(0)), trip("10", "second", Some(0))];
        let stop_times = vec![
            stop_time("first", "a", 1),
            stop_time("first", "b", 2),
            // The second trip visits different stops; they must not leak in.
            stop_time("second", "c", 1),
            stop_time("second", "a", 2),
        ];

        let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
        assert_eq!(batch.itineraries.len(), 1);
        assert_eq!(batch.itineraries[0].trip_id, "first");
        let ids: Vec<&str> = batch.itineraries[0]
            .stops
            .iter()
            .map(|s| s.stop_id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn duplicate_stop_ids_resolve_to_the_last_record() {
        let mut relocated = stop("a", 5.0, 5.0);
        relocated.stop_name = "A moved".into();
        let stops = vec![stop("a", 0.0, 0.0), relocated, stop("b", 1.0, 1.0)];
        let trips = vec![trip("10", "t1", Some(0))];
        let stop_times = vec![stop_time("t1", "a", 1), stop_time("t1", "b", 2)];

        let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
        assert_eq!(batch.itineraries[0].stops[0].stop_name, "A moved");
        assert_eq!(batch.itineraries[0].stops[0].stop_lat, Some(5.0));
    }

    #[test]
    fn absent_direction_shares_the_zero_key() {
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 1.0, 1.0)];
        // Same route: explicit direction 0 first, then an absent direction.
        let trips = vec![trip("10", "explicit", Some(0)), trip("10", "implicit", None)];
        let stop_times = vec![
            stop_time("explicit", "a", 1),
            stop_time("explicit", "b", 2),
            stop_time("implicit", "a", 1),
            stop_time("implicit", "b", 2),
        ];

        let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
        assert_eq!(batch.itineraries.len(), 1);
        assert_eq!(batch.itineraries[0].trip_id, "explicit");
        assert_eq!(batch.itineraries[0].direction_id, 0);
    }

    #[test]
    fn missing_route_nulls_metadata_and_keeps_route_id() {
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 1.0, 1.0)];
        let trips = vec![trip("unknown-route", "t1", Some(1))];
        let stop_times = vec![stop_time("t1", "a", 1), stop_time("t1", "b", 2)];

        let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
        let itinerary = &batch.itineraries[0];
        assert_eq!(itinerary.route_id, "unknown-route");
        assert!(itinerary.route_short_name.is_none());
        assert!(itinerary.route_long_name.is_none());
        assert!(itinerary.route_type.is_none());
        assert!(itinerary.color.is_none());
    }

    #[test]
    fn denormalizes_route_metadata() {
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 1.0, 1.0)];
        let routes = vec![Route {
            route_id: "10".into(),
            route_short_name: Some("10".into()),
            route_long_name: Some("Airport - Center".into()),
            route_type: Some(3),
            route_color: Some("FF0000".into()),
            ..Default::default()
        }];
        let trips = vec![trip("10", "t1", Some(0))];
        let stop_times = vec![stop_time("t1", "a", 1), stop_time("t1", "b", 2)];

        let batch = build_itineraries(&stops, &stop_times, &trips, &routes);
        let itinerary = &batch.itineraries[0];
        assert_eq!(itinerary.route_long_name.as_deref(), Some("Airport - Center"));
        assert_eq!(itinerary.route_type, Some(3));
        assert_eq!(itinerary.color.as_deref(), Some("FF0000"));
    }

    #[test]
    fn rebuilding_from_identical_inputs_is_order_stable() {
        let stops = vec![stop("a", 0.0, 0.0), stop("b", 1.0, 1.0), stop("c", 2.0, 2.0)];
        let trips = vec![
            trip("20", "t2", Some(1)),
            trip("10", "t1", Some(0)),
            trip("30", "t3", None),
        ];
        let stop_times = vec![
            stop_time("t1", "a", 1),
            stop_time("t1", "b", 2),
            stop_time("t2", "b", 1),
            stop_time("t2", "c", 2),
            stop_time("t3", "a", 1),
            stop_time("t3", "c", 2),
        ];

        let first = build_itineraries(&stops, &stop_times, &trips, &[]);
        let second = build_itineraries(&stops, &stop_times, &trips, &[]);
        assert_eq!(first.itineraries, second.itineraries);

        // Key order follows the trips input, not any map iteration order.
        let routes_seen: Vec<&str> = first
            .itineraries
            .iter()
            .map(|i| i.route_id.as_str())
            .collect();
        assert_eq!(routes_seen, ["20", "10", "30"]);
    }
}
