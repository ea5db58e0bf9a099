//! # urban-mobility
//!
//! Derives geographic artifacts from heterogeneous urban-mobility
//! datasets: transit schedules, shared-bike station inventories,
//! ridership counts, and bike-trip logs.
//!
//! ## Features
//!
//! - **Itineraries**: one ordered stop sequence per (route, direction)
//!   pair, joined from disjoint GTFS tables
//! - **Hex grid**: an H3 tiling covering every loaded point feature
//! - **Spatial admission**: country-boundary and radius predicates for
//!   restricting a load to one area
//! - **GeoJSON export**: every collection and derived artifact as a
//!   FeatureCollection, optionally written to disk
//!
//! ## Example
//!
//! ```
//! use urban_mobility::build::build_itineraries;
//! use urban_mobility::models::{Stop, StopTime, Trip};
//!
//! let stops = vec![
//!     Stop {
//!         stop_id: "a".into(),
//!         stop_name: "Cornavin".into(),
//!         stop_lat: Some(46.2102),
//!         stop_lon: Some(6.1424),
//!         ..Default::default()
//!     },
//!     Stop {
//!         stop_id: "b".into(),
//!         stop_name: "Bel-Air".into(),
//!         stop_lat: Some(46.2044),
//!         stop_lon: Some(6.1432),
//!         ..Default::default()
//!     },
//! ];
//! let trips = vec![Trip {
//!     route_id: "10".into(),
//!     trip_id: "t1".into(),
//!     direction_id: Some(0),
//!     ..Default::default()
//! }];
//! let stop_times = vec![
//!     StopTime {
//!         trip_id: "t1".into(),
//!         stop_id: "a".into(),
//!         stop_sequence: 1,
//!         ..Default::default()
//!     },
//!     StopTime {
//!         trip_id: "t1".into(),
//!         stop_id: "b".into(),
//!         stop_sequence: 2,
//!         ..Default::default()
//!     },
//! ];
//!
//! let batch = build_itineraries(&stops, &stop_times, &trips, &[]);
//! assert_eq!(batch.itineraries.len(), 1);
//! assert_eq!(batch.itineraries[0].stops.len(), 2);
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod models;
pub mod spatial;
pub mod system;

// Re-exports for convenience
pub mod prelude {
    pub use crate::build::{build_itineraries, generate_hex_grid, ItineraryBatch};
    pub use crate::config::{City, CityConfig};
    pub use crate::error::{MobilityError, Result};
    pub use crate::loader::{CsvDatasetLoader, DataType, LoadOutcome, MobilityLoader};
    pub use crate::models::{
        BikeStation, BikeTrip, HexCell, HexGrid, Itinerary, Ridership, Route, Stop, StopTime,
        TransitNetwork, Trip,
    };
    pub use crate::spatial::{CountryBoundaries, SpatialFilter};
    pub use crate::system::MobilitySystem;
}

pub use prelude::*;
