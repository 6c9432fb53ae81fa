//! Renderable features: a geometry in the map's spatial reference plus a flat
//! attribute table.

pub mod geojson;

use std::collections::BTreeMap;

use geo::{LineString, MultiLineString, Point};
use serde::{Deserialize, Serialize};

/// Attribute holding the 1-based position of a feature within its batch
pub const OBJECT_ID_FIELD: &str = "ObjectID";

// ============================================================================
// Spatial reference & extent
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

impl SpatialReference {
    /// Geographic lat/lon
    pub const WGS84: SpatialReference = SpatialReference { wkid: 4326 };
}

/// Bounding box in the map's coordinate system
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    /// True unless both spans are positive; NaN bounds count as empty.
    pub fn is_empty(&self) -> bool {
        !(self.xmin < self.xmax && self.ymin < self.ymax)
    }
}

// ============================================================================
// Geometry
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GeometryKind {
    Point,
    Polygon,
    Polyline,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Point(Point),
    /// One or more paths
    Polyline(MultiLineString),
    /// Rings as the backend sent them; ring orientation decides outer vs hole
    Polygon { rings: Vec<LineString> },
}

impl Shape {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Shape::Point(_) => GeometryKind::Point,
            Shape::Polyline(_) => GeometryKind::Polyline,
            Shape::Polygon { .. } => GeometryKind::Polygon,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub shape: Shape,
    pub spatial_reference: SpatialReference,
}

impl Geometry {
    pub fn new(shape: Shape, spatial_reference: SpatialReference) -> Self {
        Self {
            shape,
            spatial_reference,
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.shape.kind()
    }
}

// ============================================================================
// Attributes
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    Text(String),
}

impl AttributeValue {
    /// Scalars map directly; arrays and objects are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::Text(s.clone()),
            nested @ (Value::Array(_) | Value::Object(_)) => Self::Text(nested.to_string()),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Double(d) => serde_json::Number::from_f64(*d)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for AttributeValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Ordered so that rebuilding a layer yields structurally identical features
pub type Attributes = BTreeMap<String, AttributeValue>;

// ============================================================================
// Feature
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub geometry: Geometry,
    pub attributes: Attributes,
}

impl Feature {
    pub fn new(geometry: Geometry, attributes: Attributes) -> Self {
        Self {
            geometry,
            attributes,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn object_id(&self) -> Option<i64> {
        self.attribute(OBJECT_ID_FIELD).and_then(AttributeValue::as_i64)
    }
}
