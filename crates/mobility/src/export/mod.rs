//! GeoJSON feature export.
//!
//! Every function here is a pure mapping from records or derived
//! artifacts to a `FeatureCollection` (WGS84, coordinates in [lon, lat]
//! order). Persistence is layered on top: `write_feature_collection` does
//! a whole-document write through a temporary sibling path, so a failed
//! write never leaves a partial file behind.

use std::path::{Path, PathBuf};

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;

use crate::error::{MobilityError, Result};
use crate::models::{BikeStation, BikeTrip, HexGrid, Itinerary, Ridership, Stop};

/// Seam for anything exportable as a single Point feature: a position and
/// a property bag. Records lacking a position are skipped, not errored.
pub trait PointRecord: Serialize {
    fn position(&self) -> Option<geo::Point<f64>>;
}

impl PointRecord for Stop {
    fn position(&self) -> Option<geo::Point<f64>> {
        Stop::position(self)
    }
}

impl PointRecord for BikeStation {
    fn position(&self) -> Option<geo::Point<f64>> {
        BikeStation::position(self)
    }
}

impl PointRecord for Ridership {
    fn position(&self) -> Option<geo::Point<f64>> {
        Ridership::position(self)
    }
}

/// One Point feature per record with a resolvable position, all record
/// fields copied as properties.
pub fn points_to_features<T: PointRecord>(records: &[T]) -> Result<FeatureCollection> {
    let mut features = Vec::new();
    for record in records {
        let Some(position) = record.position() else {
            continue;
        };
        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::Point(vec![position.x(), position.y()]))),
            id: None,
            properties: Some(properties_of(record)?),
            foreign_members: None,
        });
    }
    Ok(collection(features))
}

/// One LineString feature per itinerary, drawn through its resolved stop
/// positions in sequence order.
pub fn itineraries_to_features(itineraries: &[Itinerary]) -> FeatureCollection {
    let features = itineraries
        .iter()
        .map(|itinerary| {
            let coords: Vec<Vec<f64>> = itinerary
                .stops
                .iter()
                .filter_map(|stop| stop.position())
                .map(|p| vec![p.x(), p.y()])
                .collect();

            let mut properties = JsonObject::new();
            properties.insert("route_id".into(), itinerary.route_id.clone().into());
            properties.insert(
                "route_short_name".into(),
                option_value(&itinerary.route_short_name),
            );
            properties.insert(
                "route_long_name".into(),
                option_value(&itinerary.route_long_name),
            );
            properties.insert(
                "route_type".into(),
                itinerary.route_type.map_or(serde_json::Value::Null, Into::into),
            );
            properties.insert("direction_id".into(), itinerary.direction_id.into());
            properties.insert("trip_id".into(), itinerary.trip_id.clone().into());
            properties.insert("headsign".into(), option_value(&itinerary.headsign));
            properties.insert("color".into(), option_value(&itinerary.color));
            properties.insert("text_color".into(), option_value(&itinerary.text_color));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::LineString(coords))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    collection(features)
}

/// One two-point LineString per bike trip. A trip missing any of its four
/// coordinates is skipped entirely, never partially emitted.
pub fn bike_trips_to_features(trips: &[BikeTrip]) -> Result<FeatureCollection> {
    let mut features = Vec::new();
    for trip in trips {
        let (Some(start), Some(end)) = (trip.start_position(), trip.end_position()) else {
            continue;
        };
        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::LineString(vec![
                vec![start.x(), start.y()],
                vec![end.x(), end.y()],
            ]))),
            id: None,
            properties: Some(properties_of(trip)?),
            foreign_members: None,
        });
    }
    Ok(collection(features))
}

/// One Polygon feature per cell. The cell's open boundary ring is closed
/// here; properties carry the cell identifier and the grid resolution.
pub fn hex_grid_to_features(grid: &HexGrid) -> FeatureCollection {
    let features = grid
        .cells
        .iter()
        .map(|cell| {
            let mut ring: Vec<Vec<f64>> = cell
                .boundary
                .iter()
                .map(|coord| vec![coord.x, coord.y])
                .collect();
            if let Some(first) = ring.first().cloned() {
                ring.push(first);
            }

            let mut properties = JsonObject::new();
            properties.insert("h3_id".into(), cell.id.to_string().into());
            properties.insert("resolution".into(), grid.resolution.into());

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    collection(features)
}

/// Whole-document write: serialize, write to a `.tmp` sibling, rename
/// over the destination.
pub fn write_feature_collection(collection: &FeatureCollection, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(collection)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    std::fs::write(&tmp, json).map_err(|source| MobilityError::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| MobilityError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("wrote {} features to {}", collection.features.len(), path.display());
    Ok(())
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn properties_of<T: Serialize>(record: &T) -> Result<JsonObject> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(MobilityError::Serialize(
            <serde_json::Error as serde::ser::Error>::custom(format!(
                "expected a JSON object for feature properties, got {other}"
            )),
        )),
    }
}

fn option_value(value: &Option<String>) -> serde_json::Value {
    value
        .clone()
        .map_or(serde_json::Value::Null, serde_json::Value::String)
}
