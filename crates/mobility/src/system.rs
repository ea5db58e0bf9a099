//! The aggregate holding one city's loaded collections and the latest
//! derived artifacts.

use std::path::Path;

use geo::Point;

use crate::build::generate_hex_grid;
use crate::error::{MobilityError, Result};
use crate::export;
use crate::models::{BikeStation, BikeTrip, HexGrid, Itinerary, Ridership, TransitNetwork};

/// An integrated urban mobility system: public transport, bike sharing,
/// and observed demand, plus whatever has been derived from them so far.
///
/// Loaded collections are snapshots; the derived fields are fully
/// replaceable, and rebuilding one never touches the other.
#[derive(Clone, Debug, Default)]
pub struct MobilitySystem {
    pub transit: TransitNetwork,
    pub bike_stations: Vec<BikeStation>,
    pub ridership: Vec<Ridership>,
    pub bike_trips: Vec<BikeTrip>,
    pub itineraries: Vec<Itinerary>,
    pub hex_grid: Option<HexGrid>,
}

impl MobilitySystem {
    /// Rebuild the per-(route, direction) itineraries, replacing any
    /// previous result.
    pub fn build_itineraries(&mut self) -> &[Itinerary] {
        let batch = self.transit.itineraries();
        log::info!(
            "itineraries: accepted {} of {} (route, direction) pairs",
            batch.accepted_pairs,
            batch.candidate_pairs
        );
        self.itineraries = batch.itineraries;
        &self.itineraries
    }

    /// Rebuild the hex grid over every point feature currently loaded,
    /// replacing any previous grid.
    pub fn build_hex_grid(&mut self, resolution: u8) -> Result<&HexGrid> {
        let points = self.grid_points();
        let grid = generate_hex_grid(&points, resolution)?;
        log::info!(
            "hex grid: {} cells at resolution {}",
            grid.cells.len(),
            resolution
        );
        Ok(self.hex_grid.insert(grid))
    }

    /// Every resolvable point feature: stops, bike stations, and
    /// ridership rows. Records without coordinates contribute nothing.
    pub fn grid_points(&self) -> Vec<Point<f64>> {
        let stops = self.transit.stops.iter().filter_map(|s| s.position());
        let stations = self.bike_stations.iter().filter_map(|s| s.position());
        let ridership = self.ridership.iter().filter_map(|r| r.position());
        stops.chain(stations).chain(ridership).collect()
    }

    /// Write one GeoJSON file per non-empty layer into `dir`.
    pub fn save_geojson(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).map_err(|source| MobilityError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        if !self.transit.stops.is_empty() {
            let collection = export::points_to_features(&self.transit.stops)?;
            export::write_feature_collection(&collection, &dir.join("stops.geojson"))?;
            log::info!("exported {} stop features", collection.features.len());
        }
        if !self.itineraries.is_empty() {
            let collection = export::itineraries_to_features(&self.itineraries);
            export::write_feature_collection(&collection, &dir.join("itineraries.geojson"))?;
            log::info!("exported {} itinerary features", collection.features.len());
        }
        if !self.bike_stations.is_empty() {
            let collection = export::points_to_features(&self.bike_stations)?;
            export::write_feature_collection(&collection, &dir.join("bike_stations.geojson"))?;
            log::info!("exported {} bike station features", collection.features.len());
        }
        if !self.ridership.is_empty() {
            let collection = export::points_to_features(&self.ridership)?;
            export::write_feature_collection(&collection, &dir.join("ridership.geojson"))?;
            log::info!("exported {} ridership features", collection.features.len());
        }
        if !self.bike_trips.is_empty() {
            let collection = export::bike_trips_to_features(&self.bike_trips)?;
            export::write_feature_collection(&collection, &dir.join("bike_trips.geojson"))?;
            log::info!("exported {} bike trip features", collection.features.len());
        }
        if let Some(grid) = &self.hex_grid {
            let collection = export::hex_grid_to_features(grid);
            export::write_feature_collection(&collection, &dir.join("hex_grid.geojson"))?;
            log::info!("exported {} hex cell features", collection.features.len());
        }

        Ok(())
    }
}
