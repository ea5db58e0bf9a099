//! Per-city configuration.
//!
//! Each supported city is one configuration value: where its files live,
//! which country bounds it, and where its center sits. No subclassing,
//! no per-city code paths.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use geo::Point;

/// Cities with known dataset wiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum City {
    Geneva,
    Larnaca,
}

impl City {
    /// The configuration for this city's datasets under `data_dir`, or
    /// `None` when no dataset wiring exists yet.
    pub fn config(self, data_dir: &Path) -> Option<CityConfig> {
        match self {
            City::Geneva => Some(CityConfig::geneva(data_dir)),
            City::Larnaca => None,
        }
    }
}

impl FromStr for City {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "geneva" | "gva" => Ok(City::Geneva),
            "larnaca" | "lca" => Ok(City::Larnaca),
            other => Err(format!("unknown city {other:?} (expected geneva or larnaca)")),
        }
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            City::Geneva => f.write_str("geneva"),
            City::Larnaca => f.write_str("larnaca"),
        }
    }
}

/// Everything a loader and filter need to know about one city.
#[derive(Clone, Debug)]
pub struct CityConfig {
    pub name: String,
    /// ISO alpha-3 code of the country whose boundary restricts the load.
    pub country_alpha3: String,
    /// City center as (lon, lat), used for radius restriction.
    pub center: Point<f64>,
    pub default_radius_km: f64,
    pub stops_file: PathBuf,
    pub routes_file: PathBuf,
    pub trips_file: PathBuf,
    pub stop_times_file: PathBuf,
    pub bike_stations_file: PathBuf,
    pub ridership_file: PathBuf,
    pub bike_trips_file: PathBuf,
}

impl CityConfig {
    pub fn geneva(data_dir: &Path) -> Self {
        Self {
            name: "geneva".into(),
            country_alpha3: "CHE".into(),
            center: Point::new(6.1432, 46.2044),
            default_radius_km: 25.0,
            stops_file: data_dir.join("gtfs/stops.txt"),
            routes_file: data_dir.join("gtfs/routes.txt"),
            trips_file: data_dir.join("gtfs/trips.txt"),
            stop_times_file: data_dir.join("gtfs/stop_times.txt"),
            bike_stations_file: data_dir.join("gbfs/shared_bikes_stations.csv"),
            ridership_file: data_dir.join("mobility/ridership.csv"),
            bike_trips_file: data_dir.join("mobility/shared_bikes_trips.csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_parses_from_name_or_code() {
        assert_eq!("Geneva".parse::<City>().unwrap(), City::Geneva);
        assert_eq!("gva".parse::<City>().unwrap(), City::Geneva);
        assert_eq!("larnaca".parse::<City>().unwrap(), City::Larnaca);
        assert!("zurich".parse::<City>().is_err());
    }

    #[test]
    fn geneva_config_points_into_the_data_dir() {
        let config = City::Geneva.config(Path::new("/data")).unwrap();
        assert_eq!(config.country_alpha3, "CHE");
        assert_eq!(config.stops_file, Path::new("/data/gtfs/stops.txt"));
        assert_eq!(
            config.bike_trips_file,
            Path::new("/data/mobility/shared_bikes_trips.csv")
        );
    }

    #[test]
    fn larnaca_has_no_dataset_wiring_yet() {
        assert!(City::Larnaca.config(Path::new("/data")).is_none());
    }
}
