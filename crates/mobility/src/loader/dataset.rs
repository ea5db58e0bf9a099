//! CSV-backed city dataset loader.

use crate::config::CityConfig;
use crate::error::Result;
use crate::loader::rows::{
    parse_bike_station, parse_bike_trip, parse_ridership, parse_route, parse_stop,
    parse_stop_time, parse_trip, read_csv_records, LoadOutcome,
};
use crate::loader::MobilityLoader;
use crate::models::{BikeStation, BikeTrip, Ridership, Route, Stop, StopTime, Trip};
use crate::spatial::SpatialFilter;

/// Loads the seven tables from the file locations a [`CityConfig`] names.
///
/// When a [`SpatialFilter`] is attached, point-bearing records are
/// admitted through `position_is_valid` before they enter the system;
/// non-spatial tables (routes, trips, stop-times) pass through untouched.
pub struct CsvDatasetLoader {
    config: CityConfig,
    filter: Option<SpatialFilter>,
}

impl CsvDatasetLoader {
    pub fn new(config: CityConfig) -> Self {
        Self {
            config,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: SpatialFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    fn admit<T>(
        &self,
        outcome: LoadOutcome<T>,
        layer: &str,
        position: impl Fn(&T) -> (Option<f64>, Option<f64>),
    ) -> LoadOutcome<T> {
        let Some(filter) = &self.filter else {
            return outcome;
        };
        let before = outcome.records.len();
        let records: Vec<T> = outcome
            .records
            .into_iter()
            .filter(|record| {
                let (lat, lon) = position(record);
                filter.position_is_valid(lat, lon)
            })
            .collect();
        let excluded = before - records.len();
        if excluded > 0 {
            log::info!("excluded {excluded} {layer} records outside the configured area");
        }
        LoadOutcome {
            records,
            skipped: outcome.skipped,
        }
    }
}

impl MobilityLoader for CsvDatasetLoader {
    fn load_stops(&self) -> Result<LoadOutcome<Stop>> {
        let outcome = read_csv_records(&self.config.stops_file, parse_stop)?;
        Ok(self.admit(outcome, "stop", |s: &Stop| (s.stop_lat, s.stop_lon)))
    }

    fn load_routes(&self) -> Result<LoadOutcome<Route>> {
        read_csv_records(&self.config.routes_file, parse_route)
    }

    fn load_trips(&self) -> Result<LoadOutcome<Trip>> {
        read_csv_records(&self.config.trips_file, parse_trip)
    }

    fn load_stop_times(&self) -> Result<LoadOutcome<StopTime>> {
        read_csv_records(&self.config.stop_times_file, parse_stop_time)
    }

    fn load_bike_stations(&self) -> Result<LoadOutcome<BikeStation>> {
        let outcome = read_csv_records(&self.config.bike_stations_file, parse_bike_station)?;
        Ok(self.admit(outcome, "bike station", |s: &BikeStation| (s.lat, s.lon)))
    }

    fn load_ridership(&self) -> Result<LoadOutcome<Ridership>> {
        let outcome = read_csv_records(&self.config.ridership_file, parse_ridership)?;
        Ok(self.admit(outcome, "ridership", |r: &Ridership| (r.stop_lat, r.stop_lon)))
    }

    fn load_bike_trips(&self) -> Result<LoadOutcome<BikeTrip>> {
        let outcome = read_csv_records(&self.config.bike_trips_file, parse_bike_trip)?;
        // Admission keys off where a rental began.
        Ok(self.admit(outcome, "bike trip", |t: &BikeTrip| (t.lat_start, t.lon_start)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DataType;
    use geo::Point;
    use std::path::{Path, PathBuf};

    fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn fixture_config(tag: &str) -> CityConfig {
        let dir = std::env::temp_dir().join(format!("urban-mobility-dataset-{tag}"));
        std::fs::create_dir_all(&dir).unwrap();

        write_fixture(
            &dir,
            "stops.txt",
            "stop_id,stop_name,stop_lat,stop_lon\n\
             s1,Cornavin,46.2102,6.1424\n\
             s2,Plainpalais,46.1956,6.1417\n\
             far,Lausanne,46.5197,6.6323\n",
        );
        write_fixture(
            &dir,
            "routes.txt",
            "route_id,route_short_name,route_long_name,route_type\n\
             10,10,Airport - Center,3\n",
        );
        write_fixture(
            &dir,
            "trips.txt",
            "route_id,service_id,trip_id,direction_id\n\
             10,wk,t1,0\n",
        );
        write_fixture(
            &dir,
            "stop_times.txt",
            "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
             t1,08:00:00,08:00:30,s1,1\n\
             t1,08:05:00,08:05:30,s2,2\n",
        );
        write_fixture(&dir, "bike_stations.csv", "name,latitude,longitude\n");
        write_fixture(&dir, "ridership.csv", "Date,Timeslot,Line,Stop\n");
        write_fixture(
            &dir,
            "bike_trips.csv",
            "trip_id,latitude_start,longitude_start,latitude_end,longitude_end\n\
             b1,46.2044,6.1432,46.2102,6.1424\n",
        );

        CityConfig {
            name: "fixture".into(),
            country_alpha3: "CHE".into(),
            center: Point::new(6.1432, 46.2044),
            default_radius_km: 25.0,
            stops_file: dir.join("stops.txt"),
            routes_file: dir.join("routes.txt"),
            trips_file: dir.join("trips.txt"),
            stop_times_file: dir.join("stop_times.txt"),
            bike_stations_file: dir.join("bike_stations.csv"),
            ridership_file: dir.join("ridership.csv"),
            bike_trips_file: dir.join("bike_trips.csv"),
        }
    }

    #[test]
    fn load_all_fills_every_requested_layer() {
        let loader = CsvDatasetLoader::new(fixture_config("all"));
        let system = loader.load_all(None).unwrap();

        assert_eq!(system.transit.stops.len(), 3);
        assert_eq!(system.transit.routes.len(), 1);
        assert_eq!(system.transit.trips.len(), 1);
        assert_eq!(system.transit.stop_times.len(), 2);
        assert_eq!(system.bike_trips.len(), 1);
        assert!(system.bike_stations.is_empty());
        assert!(system.itineraries.is_empty());
        assert!(system.hex_grid.is_none());
    }

    #[test]
    fn load_all_honors_the_requested_subset() {
        let loader = CsvDatasetLoader::new(fixture_config("subset"));
        let system = loader.load_all(Some(&[DataType::Stops])).unwrap();

        assert_eq!(system.transit.stops.len(), 3);
        assert!(system.transit.routes.is_empty());
        assert!(system.transit.stop_times.is_empty());
        assert!(system.bike_trips.is_empty());
    }

    #[test]
    fn attached_filter_excludes_out_of_area_records() {
        let config = fixture_config("filtered");
        let filter =
            SpatialFilter::unrestricted().with_radius_km(Point::new(6.1432, 46.2044), 10.0);
        let loader = CsvDatasetLoader::new(config).with_filter(filter);

        let outcome = loader.load_stops().unwrap();
        let ids: Vec<&str> = outcome.records.iter().map(|s| s.stop_id.as_str()).collect();
        // Lausanne is ~50 km out and gets excluded by admission.
        assert_eq!(ids, ["s1", "s2"]);
    }

    #[test]
    fn non_spatial_tables_bypass_admission() {
        let config = fixture_config("nonspatial");
        // A filter nothing can pass.
        let filter =
            SpatialFilter::unrestricted().with_radius_km(Point::new(0.0, 0.0), 0.001);
        let loader = CsvDatasetLoader::new(config).with_filter(filter);

        assert_eq!(loader.load_stops().unwrap().records.len(), 0);
        assert_eq!(loader.load_routes().unwrap().records.len(), 1);
        assert_eq!(loader.load_stop_times().unwrap().records.len(), 2);
    }
}
