//! Country boundary lookup.
//!
//! Boundary data is a GeoJSON FeatureCollection of country features, one
//! Polygon or MultiPolygon geometry each, with the alpha-3 code carried as
//! a string property. Public datasets disagree on the property name
//! (`ISO_A3`, `ADM0_A3`, `SOV_A3`), so the key is configurable.

use std::collections::HashMap;
use std::path::Path;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use geojson::GeoJson;

use crate::error::{MobilityError, Result};

pub const DEFAULT_CODE_PROPERTY: &str = "ISO_A3";

/// Alpha-3-keyed country geometries. RFC 7946 GeoJSON is always WGS84,
/// matching every coordinate this crate handles, so containment tests
/// against these geometries need no reprojection.
#[derive(Clone, Debug, Default)]
pub struct CountryBoundaries {
    countries: HashMap<String, MultiPolygon<f64>>,
}

impl CountryBoundaries {
    /// Read a boundary file, indexing geometries by `code_property`.
    pub fn from_geojson_file(path: &Path, code_property: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| MobilityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_geojson(&content, code_property).map_err(|err| match err {
            MobilityError::Boundaries { message, .. } => MobilityError::Boundaries {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse boundary data from a GeoJSON string.
    pub fn from_geojson(content: &str, code_property: &str) -> Result<Self> {
        let geojson: GeoJson = content.parse().map_err(|err: geojson::Error| {
            MobilityError::Boundaries {
                path: Path::new("<inline>").to_path_buf(),
                message: err.to_string(),
            }
        })?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(MobilityError::Boundaries {
                path: Path::new("<inline>").to_path_buf(),
                message: "expected a FeatureCollection of country features".into(),
            });
        };

        let mut countries: HashMap<String, MultiPolygon<f64>> = HashMap::new();
        for feature in collection.features {
            let Some(code) = feature
                .properties
                .as_ref()
                .and_then(|props| props.get(code_property))
                .and_then(|value| value.as_str())
            else {
                continue;
            };
            let Some(geometry) = feature.geometry else {
                continue;
            };
            let Some(polygons) = geometry_to_polygons(geometry.value) else {
                continue;
            };
            countries
                .entry(code.to_ascii_uppercase())
                .or_insert_with(|| MultiPolygon::new(Vec::new()))
                .0
                .extend(polygons);
        }

        log::debug!("indexed {} country boundaries", countries.len());
        Ok(Self { countries })
    }

    /// The geometry for one country, or `None` when the code is unknown.
    pub fn lookup(&self, alpha3: &str) -> Option<&MultiPolygon<f64>> {
        self.countries.get(&alpha3.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }
}

fn geometry_to_polygons(value: geojson::Value) -> Option<Vec<Polygon<f64>>> {
    match value {
        geojson::Value::Polygon(rings) => Some(vec![rings_to_polygon(&rings)?]),
        geojson::Value::MultiPolygon(polygons) => {
            let converted: Vec<Polygon<f64>> = polygons
                .iter()
                .filter_map(|rings| rings_to_polygon(rings))
                .collect();
            (!converted.is_empty()).then_some(converted)
        }
        _ => None,
    }
}

fn rings_to_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let exterior = coords_to_linestring(rings.first()?);
    let interiors: Vec<LineString<f64>> =
        rings.iter().skip(1).map(|ring| coords_to_linestring(ring)).collect();
    Some(Polygon::new(exterior, interiors))
}

fn coords_to_linestring(coords: &[Vec<f64>]) -> LineString<f64> {
    LineString::new(
        coords
            .iter()
            .map(|position| Coord {
                x: position.first().copied().unwrap_or(0.0),
                y: position.get(1).copied().unwrap_or(0.0),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Contains, Point};

    const TWO_SQUARES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"ISO_A3": "AAA"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": {"ISO_A3": "BBB"},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[10.0, 10.0], [12.0, 10.0], [12.0, 12.0], [10.0, 12.0], [10.0, 10.0]]]]
                }
            }
        ]
    }"#;

    #[test]
    fn indexes_features_by_alpha3_code() {
        let boundaries = CountryBoundaries::from_geojson(TWO_SQUARES, DEFAULT_CODE_PROPERTY).unwrap();
        assert_eq!(boundaries.len(), 2);

        let aaa = boundaries.lookup("AAA").unwrap();
        assert!(aaa.contains(&Point::new(1.0, 1.0)));
        assert!(!aaa.contains(&Point::new(11.0, 11.0)));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let boundaries = CountryBoundaries::from_geojson(TWO_SQUARES, DEFAULT_CODE_PROPERTY).unwrap();
        assert!(boundaries.lookup("bbb").is_some());
        assert!(boundaries.lookup("CCC").is_none());
    }

    #[test]
    fn rejects_bare_geometry_documents() {
        let result = CountryBoundaries::from_geojson(
            r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#,
            DEFAULT_CODE_PROPERTY,
        );
        assert!(result.is_err());
    }
}
