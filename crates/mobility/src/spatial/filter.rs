//! Point admission predicates.

use geo::{Contains, HaversineDistance, MultiPolygon, Point};

use crate::error::{MobilityError, Result};
use crate::spatial::boundaries::CountryBoundaries;

/// Combined geographic admission filter.
///
/// Both predicates are pure and independent; a point must pass every
/// configured one. An unrestricted filter admits any positioned point.
///
/// Radius containment is a great-circle distance test against the
/// configured center, which for short ranges is the same predicate as a
/// metric buffer around it.
#[derive(Clone, Debug, Default)]
pub struct SpatialFilter {
    country: Option<MultiPolygon<f64>>,
    radius: Option<(Point<f64>, f64)>,
}

impl SpatialFilter {
    /// A filter with no restrictions configured.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// Restrict to points inside one country's boundary geometry.
    ///
    /// The lookup happens once, here; an unknown code is fatal and no
    /// predicate may be evaluated afterwards.
    pub fn with_country(mut self, boundaries: &CountryBoundaries, alpha3: &str) -> Result<Self> {
        let geometry = boundaries
            .lookup(alpha3)
            .ok_or_else(|| MobilityError::CountryNotFound(alpha3.to_string()))?;
        self.country = Some(geometry.clone());
        Ok(self)
    }

    /// Restrict to points within `radius_km` of `center` (lon, lat).
    pub fn with_radius_km(mut self, center: Point<f64>, radius_km: f64) -> Self {
        self.radius = Some((center, radius_km * 1000.0));
        self
    }

    /// Whether a (lat, lon) pair is admissible.
    ///
    /// Always false when either coordinate is absent, regardless of
    /// configuration.
    pub fn position_is_valid(&self, lat: Option<f64>, lon: Option<f64>) -> bool {
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return false;
        };
        let point = Point::new(lon, lat);

        if let Some(country) = &self.country {
            if !country.contains(&point) {
                return false;
            }
        }
        if let Some((center, radius_m)) = self.radius {
            if point.haversine_distance(&center) > radius_m {
                return false;
            }
        }
        true
    }
}
