//! Shared-vehicle (GBFS-style) station records.

use geo::Point;
use serde::Serialize;

/// A bike-share station with its descriptive metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BikeStation {
    pub station_id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub address: Option<String>,
    pub capacity: Option<u32>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl BikeStation {
    pub fn position(&self) -> Option<Point<f64>> {
        match (self.lon, self.lat) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        }
    }
}
