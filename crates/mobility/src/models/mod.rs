//! Record models: raw collections handed over by the loader and the
//! derived artifacts the builders produce from them.

pub mod gbfs;
pub mod grid;
pub mod gtfs;
pub mod itinerary;
pub mod mobility;

pub use gbfs::BikeStation;
pub use grid::{HexCell, HexGrid};
pub use gtfs::{Route, Stop, StopTime, TransitNetwork, Trip};
pub use itinerary::Itinerary;
pub use mobility::{BikeTrip, Ridership};
