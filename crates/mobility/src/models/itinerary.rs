//! The reconstructed stop sequence of a representative trip.

use serde::Serialize;

use super::gtfs::Stop;

/// One itinerary per distinct (route, direction) pair.
///
/// Route metadata is denormalized at build time; every metadata field is
/// `None` when the trip references a route absent from the load. The stop
/// sequence always holds at least two positioned stops: shorter candidates
/// are never materialized.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Itinerary {
    pub route_id: String,
    pub direction_id: u8,
    pub trip_id: String,
    pub headsign: Option<String>,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
    pub route_type: Option<u16>,
    pub color: Option<String>,
    pub text_color: Option<String>,
    pub stops: Vec<Stop>,
}
