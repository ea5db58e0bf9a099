//! Error taxonomy for the urban-mobility crate.
//!
//! Fatal conditions abort the single call that raised them; everything
//! recoverable (unresolved references, malformed rows, missing coordinates)
//! is skip-and-continue and never surfaces here.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MobilityError {
    /// The configured alpha-3 code has no matching boundary feature.
    /// Raised at filter construction; no predicate runs afterwards.
    #[error("no country boundary found for alpha-3 code {0:?}")]
    CountryNotFound(String),

    /// Hex grid resolution outside the H3 range.
    #[error("grid resolution {0} is out of range (0..=15)")]
    InvalidResolution(u8),

    /// Hex grid generation was asked to tile zero points.
    #[error("cannot tile an empty point set")]
    EmptyPointSet,

    /// A polygon could not be handed to the grid primitive.
    #[error("invalid geometry: {0}")]
    Geometry(String),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV file {}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed GeoJSON in {}: {}", .path.display(), .message)]
    Boundaries { path: PathBuf, message: String },

    #[error("GeoJSON serialization failed")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MobilityError>;
