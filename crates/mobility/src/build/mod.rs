//! Derivation layer: the only part of the crate doing real work.
//!
//! `itineraries` joins the four GTFS tables into one ordered stop
//! sequence per (route, direction); `hexgrid` tiles the covering area of
//! an arbitrary point set with H3 cells.

pub mod hexgrid;
pub mod itineraries;

pub use hexgrid::generate_hex_grid;
pub use itineraries::{build_itineraries, ItineraryBatch};
