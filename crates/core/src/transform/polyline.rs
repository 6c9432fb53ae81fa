//! Cycling path GeoJSON (`LineString` features with OSM tags) to polylines.

use geo::MultiLineString;
use serde_json::Value;

use super::{TransformError, object_id, parse_path};
use crate::feature::{Attributes, Feature, Geometry, OBJECT_ID_FIELD, Shape, SpatialReference};

/// Properties copied onto each path; absent or non-string values become `""`
pub const PATH_PROPERTIES: [&str; 3] = ["name", "highway", "surface"];

pub fn paths_to_features(
    document: &Value,
    spatial_reference: SpatialReference,
) -> Result<Vec<Feature>, TransformError> {
    let features = document
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| TransformError::MalformedLayerData("data.features[]".to_owned()))?;

    features
        .iter()
        .enumerate()
        .map(|(index, record)| path_feature(index, record, spatial_reference))
        .collect()
}

fn path_feature(
    index: usize,
    record: &Value,
    spatial_reference: SpatialReference,
) -> Result<Feature, TransformError> {
    let what = format!("features[{index}].geometry.coordinates");
    let coordinates = record
        .pointer("/geometry/coordinates")
        .ok_or_else(|| TransformError::MalformedLayerData(what.clone()))?;

    // A LineString's coordinates are a single path; wrap once.
    let path = parse_path(coordinates, &what)?;

    let properties = record.get("properties");
    let mut attributes = Attributes::new();
    attributes.insert(OBJECT_ID_FIELD.to_owned(), object_id(index));
    for name in PATH_PROPERTIES {
        let value = properties
            .and_then(|p| p.get(name))
            .and_then(Value::as_str)
            .unwrap_or_default();
        attributes.insert(name.to_owned(), value.into());
    }

    Ok(Feature::new(
        Geometry::new(Shape::Polyline(MultiLineString::new(vec![path])), spatial_reference),
        attributes,
    ))
}
