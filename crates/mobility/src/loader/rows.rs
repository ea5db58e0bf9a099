//! Row-level CSV ingestion.
//!
//! Each table gets a raw serde row struct and an explicit fallible parse
//! function turning it into a validated record. The batch reader collects
//! successes and a skip count; a malformed row never aborts the batch.

use std::fmt;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{MobilityError, Result};
use crate::models::{BikeStation, BikeTrip, Ridership, Route, Stop, StopTime, Trip};

/// The outcome of one batch load: admitted records plus how many rows
/// failed to read or validate.
#[derive(Clone, Debug)]
pub struct LoadOutcome<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for LoadOutcome<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

/// Why one row was rejected. Rejections are counted and logged, never
/// propagated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowError(String);

impl RowError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for RowError {}

pub type RowResult<T> = std::result::Result<T, RowError>;

/// Read a CSV file row by row, parsing each into a record. Rows that fail
/// to deserialize or to parse are skipped and counted.
pub fn read_csv_records<Row, T, F>(path: &Path, parse: F) -> Result<LoadOutcome<T>>
where
    Row: DeserializeOwned,
    F: Fn(Row) -> RowResult<T>,
{
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| MobilityError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut outcome = LoadOutcome::default();
    for row in reader.deserialize::<Row>() {
        match row {
            Ok(raw) => match parse(raw) {
                Ok(record) => outcome.records.push(record),
                Err(err) => {
                    outcome.skipped += 1;
                    log::debug!("skipping row in {}: {}", path.display(), err);
                }
            },
            Err(err) => {
                outcome.skipped += 1;
                log::debug!("skipping unreadable row in {}: {}", path.display(), err);
            }
        }
    }
    Ok(outcome)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Flag columns arrive as python-style "True"/"False" strings; anything
/// else reads as false.
fn parse_flag(raw: Option<String>) -> bool {
    non_empty(raw).is_some_and(|value| value.eq_ignore_ascii_case("true") || value == "1")
}

/// Timestamps arrive as `2024-03-01 08:15:02.123 UTC` and friends; strip
/// the suffix and the fraction, then parse. Unparseable values degrade to
/// `None` since the field is optional.
fn parse_timestamp(raw: Option<String>) -> Option<NaiveDateTime> {
    let raw = non_empty(raw)?;
    let trimmed = raw.trim_end_matches(" UTC");
    let trimmed = trimmed.split('.').next().unwrap_or(trimmed);
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").ok()
}

// ============================================================================
// GTFS rows
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RawStop {
    #[serde(default)]
    pub stop_id: Option<String>,
    #[serde(default)]
    pub stop_name: Option<String>,
    #[serde(default)]
    pub stop_lat: Option<f64>,
    #[serde(default)]
    pub stop_lon: Option<f64>,
    #[serde(default)]
    pub stop_desc: Option<String>,
    #[serde(default)]
    pub zone_id: Option<String>,
    #[serde(default)]
    pub stop_url: Option<String>,
    #[serde(default)]
    pub location_type: Option<u8>,
    #[serde(default)]
    pub parent_station: Option<String>,
}

pub fn parse_stop(row: RawStop) -> RowResult<Stop> {
    let stop_id = non_empty(row.stop_id).ok_or_else(|| RowError::new("missing stop_id"))?;
    Ok(Stop {
        stop_id,
        stop_name: non_empty(row.stop_name).unwrap_or_default(),
        stop_lat: row.stop_lat,
        stop_lon: row.stop_lon,
        stop_desc: non_empty(row.stop_desc),
        zone_id: non_empty(row.zone_id),
        stop_url: non_empty(row.stop_url),
        location_type: row.location_type,
        parent_station: non_empty(row.parent_station),
    })
}

#[derive(Debug, Deserialize)]
pub struct RawRoute {
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub agency_id: Option<String>,
    #[serde(default)]
    pub route_short_name: Option<String>,
    #[serde(default)]
    pub route_long_name: Option<String>,
    #[serde(default)]
    pub route_desc: Option<String>,
    #[serde(default)]
    pub route_type: Option<u16>,
    #[serde(default)]
    pub route_url: Option<String>,
    #[serde(default)]
    pub route_color: Option<String>,
    #[serde(default)]
    pub route_text_color: Option<String>,
}

pub fn parse_route(row: RawRoute) -> RowResult<Route> {
    let route_id = non_empty(row.route_id).ok_or_else(|| RowError::new("missing route_id"))?;
    Ok(Route {
        route_id,
        agency_id: non_empty(row.agency_id),
        route_short_name: non_empty(row.route_short_name),
        route_long_name: non_empty(row.route_long_name),
        route_desc: non_empty(row.route_desc),
        route_type: row.route_type,
        route_url: non_empty(row.route_url),
        route_color: non_empty(row.route_color),
        route_text_color: non_empty(row.route_text_color),
    })
}

#[derive(Debug, Deserialize)]
pub struct RawTrip {
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub trip_headsign: Option<String>,
    #[serde(default)]
    pub trip_short_name: Option<String>,
    #[serde(default)]
    pub direction_id: Option<u8>,
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(default)]
    pub shape_id: Option<String>,
}

pub fn parse_trip(row: RawTrip) -> RowResult<Trip> {
    let trip_id = non_empty(row.trip_id).ok_or_else(|| RowError::new("missing trip_id"))?;
    let route_id = non_empty(row.route_id).ok_or_else(|| RowError::new("missing route_id"))?;
    Ok(Trip {
        route_id,
        service_id: non_empty(row.service_id).unwrap_or_default(),
        trip_id,
        trip_headsign: non_empty(row.trip_headsign),
        trip_short_name: non_empty(row.trip_short_name),
        direction_id: row.direction_id,
        block_id: non_empty(row.block_id),
        shape_id: non_empty(row.shape_id),
    })
}

#[derive(Debug, Deserialize)]
pub struct RawStopTime {
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub stop_id: Option<String>,
    #[serde(default)]
    pub stop_sequence: Option<u32>,
    #[serde(default)]
    pub stop_headsign: Option<String>,
    #[serde(default)]
    pub pickup_type: Option<u8>,
    #[serde(default)]
    pub drop_off_type: Option<u8>,
    #[serde(default)]
    pub shape_dist_traveled: Option<f64>,
    #[serde(default)]
    pub timepoint: Option<u8>,
}

pub fn parse_stop_time(row: RawStopTime) -> RowResult<StopTime> {
    let trip_id = non_empty(row.trip_id).ok_or_else(|| RowError::new("missing trip_id"))?;
    let stop_id = non_empty(row.stop_id).ok_or_else(|| RowError::new("missing stop_id"))?;
    let stop_sequence = row
        .stop_sequence
        .ok_or_else(|| RowError::new("missing stop_sequence"))?;
    Ok(StopTime {
        trip_id,
        arrival_time: non_empty(row.arrival_time).unwrap_or_default(),
        departure_time: non_empty(row.departure_time).unwrap_or_default(),
        stop_id,
        stop_sequence,
        stop_headsign: non_empty(row.stop_headsign),
        pickup_type: row.pickup_type,
        drop_off_type: row.drop_off_type,
        shape_dist_traveled: row.shape_dist_traveled,
        timepoint: row.timepoint,
    })
}

// ============================================================================
// Shared-mobility rows
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RawBikeStation {
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

pub fn parse_bike_station(row: RawBikeStation) -> RowResult<BikeStation> {
    let name = non_empty(row.name).ok_or_else(|| RowError::new("missing station name"))?;
    // Station exports for some cities carry no separate id column; the
    // name doubles as the identifier there.
    let station_id = non_empty(row.station_id).unwrap_or_else(|| name.clone());
    Ok(BikeStation {
        station_id,
        name,
        short_name: non_empty(row.short_name),
        address: non_empty(row.address),
        capacity: row.capacity,
        lat: row.latitude,
        lon: row.longitude,
    })
}

#[derive(Debug, Deserialize)]
pub struct RawBikeTrip {
    #[serde(default)]
    pub trip_id: Option<String>,
    #[serde(default)]
    pub rental_id: Option<String>,
    #[serde(default)]
    pub vehicle_type: Option<String>,
    #[serde(default)]
    pub trip_started_at_utc: Option<String>,
    #[serde(default)]
    pub trip_ended_at_utc: Option<String>,
    #[serde(default)]
    pub latitude_start: Option<f64>,
    #[serde(default)]
    pub longitude_start: Option<f64>,
    #[serde(default)]
    pub latitude_end: Option<f64>,
    #[serde(default)]
    pub longitude_end: Option<f64>,
    #[serde(default)]
    pub distance_in_km: Option<f64>,
}

pub fn parse_bike_trip(row: RawBikeTrip) -> RowResult<BikeTrip> {
    let trip_id = non_empty(row.trip_id).ok_or_else(|| RowError::new("missing trip_id"))?;
    Ok(BikeTrip {
        trip_id,
        rental_id: non_empty(row.rental_id),
        vehicle_type: non_empty(row.vehicle_type),
        started_at: parse_timestamp(row.trip_started_at_utc),
        ended_at: parse_timestamp(row.trip_ended_at_utc),
        lat_start: row.latitude_start,
        lon_start: row.longitude_start,
        lat_end: row.latitude_end,
        lon_end: row.longitude_end,
        distance_km: row.distance_in_km,
    })
}

/// Ridership exports keep their human-facing column names, including the
/// source's own "Longtitudes" spelling.
#[derive(Debug, Deserialize)]
pub struct RawRidership {
    #[serde(default, rename = "Date")]
    pub date: Option<String>,
    #[serde(default, rename = "Timeslot")]
    pub timeslot: Option<String>,
    #[serde(default, rename = "Index Day Week")]
    pub day_index: Option<u8>,
    #[serde(default, rename = "Line Type")]
    pub line_type: Option<String>,
    #[serde(default, rename = "Schedule Type")]
    pub schedule_type: Option<String>,
    #[serde(default, rename = "Line")]
    pub line: Option<String>,
    #[serde(default, rename = "Stop")]
    pub stop_name: Option<String>,
    #[serde(default, rename = "Long Code Stop")]
    pub stop_code: Option<String>,
    #[serde(default, rename = "Number of Boarding Passengers")]
    pub boardings: Option<u32>,
    #[serde(default, rename = "Number of Disembarking Passengers")]
    pub alightings: Option<u32>,
    #[serde(default, rename = "jour_semaine")]
    pub day_label: Option<String>,
    #[serde(default, rename = "Week Index")]
    pub week_index: Option<u32>,
    #[serde(default, rename = "Month Year")]
    pub month_year: Option<String>,
    #[serde(default, rename = "Stop Latitudes")]
    pub stop_lat: Option<f64>,
    #[serde(default, rename = "Stop Longtitudes")]
    pub stop_lon: Option<f64>,
    #[serde(default, rename = "Final Data")]
    pub is_final: Option<String>,
    #[serde(default, rename = "filter_graph")]
    pub is_filtered: Option<String>,
}

pub fn parse_ridership(row: RawRidership) -> RowResult<Ridership> {
    let stop_name = non_empty(row.stop_name).ok_or_else(|| RowError::new("missing stop name"))?;
    Ok(Ridership {
        date: non_empty(row.date).unwrap_or_default(),
        timeslot: non_empty(row.timeslot).unwrap_or_default(),
        day_index: row.day_index.unwrap_or(0),
        line_type: non_empty(row.line_type),
        schedule_type: non_empty(row.schedule_type),
        line: non_empty(row.line).unwrap_or_default(),
        stop_name,
        stop_code: non_empty(row.stop_code),
        boardings: row.boardings.unwrap_or(0),
        alightings: row.alightings.unwrap_or(0),
        day_label: non_empty(row.day_label),
        week_index: row.week_index,
        month_year: non_empty(row.month_year),
        stop_lat: row.stop_lat,
        stop_lon: row.stop_lon,
        is_final: parse_flag(row.is_final),
        is_filtered: parse_flag(row.is_filtered),
    })
}
