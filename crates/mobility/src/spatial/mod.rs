//! Geographic admission predicates.
//!
//! `CountryBoundaries` supplies country polygons keyed by alpha-3 code;
//! `SpatialFilter` combines country containment and radius containment
//! into the single `position_is_valid` check loaders apply per record.

pub mod boundaries;
pub mod filter;

pub use boundaries::CountryBoundaries;
pub use filter::SpatialFilter;
