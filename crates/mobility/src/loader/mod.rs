//! Dataset loading.
//!
//! A loader supplies typed, already-validated collections; the derivation
//! layer never re-validates admission. The one concrete implementation
//! reads per-city CSV exports, but the trait keeps the seam open for
//! other sources.

pub mod dataset;
pub mod rows;

pub use dataset::CsvDatasetLoader;
pub use rows::{LoadOutcome, RowError, RowResult};

use crate::error::Result;
use crate::models::{BikeStation, BikeTrip, Ridership, Route, Stop, StopTime, Trip};
use crate::system::MobilitySystem;

/// Which layers of a city dataset to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Stops,
    /// Routes, trips, and stop-times: everything itinerary reconstruction
    /// consumes beyond the stops themselves.
    Itineraries,
    BikeStations,
    Ridership,
    BikeTrips,
}

pub const DEFAULT_DATA_TYPES: [DataType; 5] = [
    DataType::Stops,
    DataType::Itineraries,
    DataType::BikeStations,
    DataType::Ridership,
    DataType::BikeTrips,
];

/// The seven load operations a city dataset must support, plus a provided
/// `load_all` assembling them into a [`MobilitySystem`].
pub trait MobilityLoader {
    fn load_stops(&self) -> Result<LoadOutcome<Stop>>;
    fn load_routes(&self) -> Result<LoadOutcome<Route>>;
    fn load_trips(&self) -> Result<LoadOutcome<Trip>>;
    fn load_stop_times(&self) -> Result<LoadOutcome<StopTime>>;
    fn load_bike_stations(&self) -> Result<LoadOutcome<BikeStation>>;
    fn load_ridership(&self) -> Result<LoadOutcome<Ridership>>;
    fn load_bike_trips(&self) -> Result<LoadOutcome<BikeTrip>>;

    /// Load the requested layers (all of them when `None`) into a fresh
    /// system. Derived artifacts are left empty; building them is the
    /// caller's call.
    fn load_all(&self, data_types: Option<&[DataType]>) -> Result<MobilitySystem> {
        let requested = data_types.unwrap_or(&DEFAULT_DATA_TYPES);
        let mut system = MobilitySystem::default();

        if requested.contains(&DataType::Stops) {
            let outcome = self.load_stops()?;
            log::info!(
                "loaded {} stops ({} rows skipped)",
                outcome.records.len(),
                outcome.skipped
            );
            system.transit.stops = outcome.records;
        }
        if requested.contains(&DataType::Itineraries) {
            let outcome = self.load_routes()?;
            log::info!(
                "loaded {} routes ({} rows skipped)",
                outcome.records.len(),
                outcome.skipped
            );
            system.transit.routes = outcome.records;

            let outcome = self.load_trips()?;
            log::info!(
                "loaded {} trips ({} rows skipped)",
                outcome.records.len(),
                outcome.skipped
            );
            system.transit.trips = outcome.records;

            let outcome = self.load_stop_times()?;
            log::info!(
                "loaded {} stop times ({} rows skipped)",
                outcome.records.len(),
                outcome.skipped
            );
            system.transit.stop_times = outcome.records;
        }
        if requested.contains(&DataType::BikeStations) {
            let outcome = self.load_bike_stations()?;
            log::info!(
                "loaded {} bike stations ({} rows skipped)",
                outcome.records.len(),
                outcome.skipped
            );
            system.bike_stations = outcome.records;
        }
        if requested.contains(&DataType::Ridership) {
            let outcome = self.load_ridership()?;
            log::info!(
                "loaded {} ridership rows ({} rows skipped)",
                outcome.records.len(),
                outcome.skipped
            );
            system.ridership = outcome.records;
        }
        if requested.contains(&DataType::BikeTrips) {
            let outcome = self.load_bike_trips()?;
            log::info!(
                "loaded {} bike trips ({} rows skipped)",
                outcome.records.len(),
                outcome.skipped
            );
            system.bike_trips = outcome.records;
        }

        Ok(system)
    }
}
