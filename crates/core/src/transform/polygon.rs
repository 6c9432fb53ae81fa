//! Default transform: ArcGIS-style polygon feature sets
//! (`{ features: [{ geometry: { rings }, attributes }] }`).

use serde_json::Value;

use super::{TransformError, feature_array, object_id, parse_path};
use crate::feature::{
    AttributeValue, Attributes, Feature, Geometry, OBJECT_ID_FIELD, Shape, SpatialReference,
};

/// Copy each record's rings and attribute bag as-is. Records without an
/// `ObjectID` attribute are numbered by position.
pub fn polygons_to_features(
    document: &Value,
    spatial_reference: SpatialReference,
) -> Result<Vec<Feature>, TransformError> {
    feature_array(document)?
        .iter()
        .enumerate()
        .map(|(index, record)| polygon_feature(index, record, spatial_reference))
        .collect()
}

fn polygon_feature(
    index: usize,
    record: &Value,
    spatial_reference: SpatialReference,
) -> Result<Feature, TransformError> {
    let rings = record
        .pointer("/geometry/rings")
        .and_then(Value::as_array)
        .ok_or_else(|| TransformError::MalformedLayerData(format!("features[{index}].geometry.rings")))?
        .iter()
        .map(|ring| parse_path(ring, &format!("features[{index}].geometry.rings")))
        .collect::<Result<Vec<_>, _>>()?;

    let mut attributes: Attributes = record
        .get("attributes")
        .and_then(Value::as_object)
        .map(|bag| {
            bag.iter()
                .map(|(name, value)| (name.clone(), AttributeValue::from_json(value)))
                .collect()
        })
        .unwrap_or_default();
    attributes
        .entry(OBJECT_ID_FIELD.to_owned())
        .or_insert_with(|| object_id(index));

    Ok(Feature::new(
        Geometry::new(Shape::Polygon { rings }, spatial_reference),
        attributes,
    ))
}
