//! GTFS record types.
//!
//! These are plain, already-validated records as the loader hands them
//! over. Coordinates are optional on purpose: a stop without a position
//! stays in the collection but is excluded from every geometry operation.

use geo::Point;
use serde::Serialize;

/// A transit stop (station or platform).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
    pub stop_desc: Option<String>,
    pub zone_id: Option<String>,
    pub stop_url: Option<String>,
    pub location_type: Option<u8>,
    pub parent_station: Option<String>,
}

impl Stop {
    /// Position as (lon, lat), or `None` when either coordinate is absent.
    pub fn position(&self) -> Option<Point<f64>> {
        match (self.stop_lon, self.stop_lat) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        }
    }
}

/// A transit route (line).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Route {
    pub route_id: String,
    pub agency_id: Option<String>,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
    pub route_desc: Option<String>,
    pub route_type: Option<u16>,
    pub route_url: Option<String>,
    pub route_color: Option<String>,
    pub route_text_color: Option<String>,
}

/// A vehicle run along a route.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Trip {
    pub route_id: String,
    pub service_id: String,
    pub trip_id: String,
    pub trip_headsign: Option<String>,
    pub trip_short_name: Option<String>,
    /// 0 or 1 per GTFS; absent trips are keyed as direction 0.
    pub direction_id: Option<u8>,
    pub block_id: Option<String>,
    pub shape_id: Option<String>,
}

/// One scheduled stop of a trip. Times are opaque strings: GTFS allows
/// hour values past 24 for runs crossing midnight, so they are not
/// clock times.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StopTime {
    pub trip_id: String,
    pub arrival_time: String,
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    pub stop_headsign: Option<String>,
    pub pickup_type: Option<u8>,
    pub drop_off_type: Option<u8>,
    pub shape_dist_traveled: Option<f64>,
    pub timepoint: Option<u8>,
}

/// The full public-transport network described by one GTFS load.
#[derive(Clone, Debug, Default)]
pub struct TransitNetwork {
    pub stops: Vec<Stop>,
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stop_times: Vec<StopTime>,
}
