//! Raw layer documents to features.
//!
//! Each layer either names its own transform in its descriptor or falls back to
//! [`polygon::polygons_to_features`]. Every transform numbers its output with a
//! 1-based `ObjectID` local to the batch, so re-running it on the same
//! document yields identical features.

pub mod choropleth;
pub mod polygon;
pub mod polyline;
pub mod stops;

use geo::{Coord, LineString};
use metro_transit::TransitError;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ErrorKind, LayerError};
use crate::feature::{AttributeValue, Feature, SpatialReference};
use crate::registry::LayerDescriptor;

/// Converts one fetched document into features in the given spatial reference
pub type TransformFn = fn(&Value, SpatialReference) -> Result<Vec<Feature>, TransformError>;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("malformed layer data: expected {0}")]
    MalformedLayerData(String),

    #[error(transparent)]
    Transit(#[from] TransitError),
}

impl TransformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TransformError::MalformedLayerData(_) => ErrorKind::MalformedLayerData,
            TransformError::Transit(TransitError::UnknownRouteType(_)) => ErrorKind::UnknownRouteType,
        }
    }
}

/// Run the descriptor's transform on `document`, tagging failures with the
/// layer title.
pub fn transform_layer(
    descriptor: &LayerDescriptor,
    document: &Value,
    spatial_reference: SpatialReference,
) -> Result<Vec<Feature>, LayerError> {
    let transform = descriptor.transform.unwrap_or(polygon::polygons_to_features);
    let features = transform(document, spatial_reference)
        .map_err(|e| LayerError::new(descriptor.title.clone(), e))?;

    if let Some(stray) = features.iter().find(|f| f.geometry.kind() != descriptor.geometry_kind) {
        return Err(LayerError::new(
            descriptor.title.clone(),
            TransformError::MalformedLayerData(format!(
                "{} features, found a {}",
                descriptor.geometry_kind,
                stray.geometry.kind()
            )),
        ));
    }

    tracing::debug!(layer = %descriptor.title, features = features.len(), "transformed layer data");
    Ok(features)
}

pub(crate) fn object_id(index: usize) -> AttributeValue {
    AttributeValue::Integer(index as i64 + 1)
}

/// Parse `[[x, y, ...], ...]`; extra ordinates (z, m) are dropped.
pub(crate) fn parse_path(value: &Value, what: &str) -> Result<LineString, TransformError> {
    let positions = Vec::<Vec<f64>>::deserialize(value)
        .map_err(|e| TransformError::MalformedLayerData(format!("{what} as [[x, y], ...]: {e}")))?;

    positions
        .into_iter()
        .map(|p| match p.as_slice() {
            [x, y, ..] => Ok(Coord { x: *x, y: *y }),
            _ => Err(TransformError::MalformedLayerData(format!(
                "{what} positions with at least two ordinates"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(LineString::new)
}

/// The non-empty `features` array of a feature-collection document
pub(crate) fn feature_array<'a>(document: &'a Value) -> Result<&'a [Value], TransformError> {
    document
        .get("features")
        .and_then(Value::as_array)
        .filter(|features| !features.is_empty())
        .map(Vec::as_slice)
        .ok_or_else(|| TransformError::MalformedLayerData("data.features[]".to_owned()))
}
