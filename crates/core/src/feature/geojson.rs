//! GeoJSON export of built features, for renderers that speak GeoJSON rather
//! than the ArcGIS feature model.

use geo::LineString;
use geojson::{FeatureCollection, JsonObject};

use super::{Feature, Shape};

fn position(coord: geo::Coord) -> Vec<f64> {
    vec![coord.x, coord.y]
}

fn path(line: &LineString) -> Vec<Vec<f64>> {
    line.coords().copied().map(position).collect()
}

impl Shape {
    pub fn to_geojson(&self) -> geojson::Geometry {
        let value = match self {
            Shape::Point(point) => geojson::Value::Point(position(point.0)),
            Shape::Polyline(lines) => geojson::Value::MultiLineString(lines.iter().map(path).collect()),
            Shape::Polygon { rings } => geojson::Value::Polygon(rings.iter().map(path).collect()),
        };
        geojson::Geometry::new(value)
    }
}

impl Feature {
    pub fn to_geojson(&self) -> geojson::Feature {
        let properties: JsonObject = self
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();

        geojson::Feature {
            bbox: None,
            geometry: Some(self.geometry.shape.to_geojson()),
            id: self
                .object_id()
                .map(|id| geojson::feature::Id::Number(id.into())),
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

pub fn feature_collection<'a>(features: impl IntoIterator<Item = &'a Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: features.into_iter().map(Feature::to_geojson).collect(),
        foreign_members: None,
    }
}
