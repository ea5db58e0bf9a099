//! Observed-demand records: individual shared-bike trips and per-stop
//! ridership counts.

use chrono::NaiveDateTime;
use geo::Point;
use serde::Serialize;

/// One shared-bike rental, start to end.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BikeTrip {
    pub trip_id: String,
    pub rental_id: Option<String>,
    pub vehicle_type: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    pub lat_start: Option<f64>,
    pub lon_start: Option<f64>,
    pub lat_end: Option<f64>,
    pub lon_end: Option<f64>,
    pub distance_km: Option<f64>,
}

impl BikeTrip {
    pub fn start_position(&self) -> Option<Point<f64>> {
        match (self.lon_start, self.lat_start) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        }
    }

    pub fn end_position(&self) -> Option<Point<f64>> {
        match (self.lon_end, self.lat_end) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        }
    }
}

/// Boardings and alightings observed at one stop during one timeslot.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Ridership {
    pub date: String,
    pub timeslot: String,
    pub day_index: u8,
    pub line_type: Option<String>,
    pub schedule_type: Option<String>,
    pub line: String,
    pub stop_name: String,
    pub stop_code: Option<String>,
    pub boardings: u32,
    pub alightings: u32,
    pub day_label: Option<String>,
    pub week_index: Option<u32>,
    pub month_year: Option<String>,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
    /// Whether the row is final, validated data.
    pub is_final: bool,
    /// Whether the row was excluded from the source's primary analysis.
    pub is_filtered: bool,
}

impl Ridership {
    pub fn position(&self) -> Option<Point<f64>> {
        match (self.stop_lon, self.stop_lat) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        }
    }
}
