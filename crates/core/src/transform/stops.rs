//! Bus and light-rail stop payloads (`{ stops: [...] }`) to point features.

use geo::Point;
use metro_transit::{
    Route, RouteIdentifier, RouteType, StopIdentifier, StopMarker, TransitError, WheelchairBoarding,
};
use serde::Deserialize;
use serde_json::Value;

use super::{TransformError, object_id};
use crate::feature::{Attributes, Feature, Geometry, OBJECT_ID_FIELD, Shape, SpatialReference};

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct RawStops {
    stops: Vec<RawStop>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStop {
    id: StopIdentifier,
    name: String,
    /// Kept as text so an unknown code surfaces as `UnknownRouteType`
    typ: String,
    #[serde(default)]
    routes: Vec<RawRoute>,
    yx: RawCoordinates,
    #[serde(default)]
    tract_geoid: Option<String>,
    #[serde(default)]
    whl_chr: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRoute {
    id: RouteIdentifier,
    name: String,
    name_long: String,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawStop> for StopMarker {
    type Error = TransitError;

    fn try_from(raw: RawStop) -> Result<Self, Self::Error> {
        Ok(StopMarker {
            id: raw.id,
            name: raw.name.into(),
            route_type: RouteType::from_code(&raw.typ)?,
            routes: raw
                .routes
                .into_iter()
                .map(|r| Route::new(r.id, r.name, r.name_long))
                .collect(),
            location: Point::new(raw.yx.longitude, raw.yx.latitude),
            tract_geoid: raw.tract_geoid.filter(|g| !g.is_empty()).map(Into::into),
            wheelchair: raw.whl_chr.as_deref().map(WheelchairBoarding::from_code),
        })
    }
}

// ============================================================================
// Transform
// ============================================================================

/// Decode every stop in the document, failing on the first unknown route type
pub fn parse_stops(document: &Value) -> Result<Vec<StopMarker>, TransformError> {
    let raw = RawStops::deserialize(document)
        .map_err(|e| TransformError::MalformedLayerData(format!("{{ stops: [...] }}: {e}")))?;

    raw.stops
        .into_iter()
        .map(|stop| StopMarker::try_from(stop).map_err(TransformError::from))
        .collect()
}

pub fn stops_to_features(
    document: &Value,
    spatial_reference: SpatialReference,
) -> Result<Vec<Feature>, TransformError> {
    Ok(parse_stops(document)?
        .iter()
        .enumerate()
        .map(|(index, stop)| stop_feature(index, stop, spatial_reference))
        .collect())
}

pub fn stop_feature(index: usize, stop: &StopMarker, spatial_reference: SpatialReference) -> Feature {
    let mut attributes = Attributes::new();
    attributes.insert(OBJECT_ID_FIELD.to_owned(), object_id(index));
    attributes.insert("id".to_owned(), stop.id.as_str().into());
    attributes.insert("name".to_owned(), stop.name.as_ref().into());
    attributes.insert("type".to_owned(), stop.route_type.category_label().into());
    attributes.insert("typ".to_owned(), stop.route_type.code().into());
    attributes.insert("routes".to_owned(), stop.routes_served().into());
    if let Some(geoid) = &stop.tract_geoid {
        attributes.insert("tractGeoid".to_owned(), geoid.as_ref().into());
    }
    if let Some(wheelchair) = &stop.wheelchair {
        attributes.insert("whlChr".to_owned(), wheelchair.code().into());
    }

    Feature::new(
        Geometry::new(Shape::Point(stop.location), spatial_reference),
        attributes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::feature::AttributeValue;
    use serde_json::json;

    fn stops_document() -> Value {
        json!({
            "stops": [
                {
                    "id": "4021",
                    "name": "Grand & Arsenal",
                    "typ": "bus",
                    "whlChr": "POSSIBLE",
                    "tractGeoid": "29510116500",
                    "routes": [
                        { "id": "70", "name": "70", "nameLong": "Grand" },
                        { "id": 8, "name": "8", "nameLong": "Bates-Morganford" }
                    ],
                    "yx": { "latitude": 38.6035, "longitude": -90.2432 }
                },
                {
                    "id": 14328,
                    "name": "Forest Park-DeBaliviere",
                    "typ": "mlc",
                    "routes": [
                        { "id": "mlr", "name": "MLR", "nameLong": "MetroLink Red" },
                        { "id": "mlb", "name": "MLB", "nameLong": "MetroLink Blue" }
                    ],
                    "yx": { "latitude": 38.6489, "longitude": -90.2852 }
                }
            ]
        })
    }

    #[test]
    fn test_bus_and_rail_stops() {
        let features = stops_to_features(&stops_document(), SpatialReference::WGS84).unwrap();
        assert_eq!(features.len(), 2);

        let bus = &features[0];
        assert_eq!(bus.object_id(), Some(1));
        assert_eq!(bus.attribute("type"), Some(&AttributeValue::from("Bus")));
        assert_eq!(bus.attribute("typ"), Some(&AttributeValue::from("bus")));
        assert_eq!(
            bus.attribute("routes"),
            Some(&AttributeValue::from("70-Grand, 8-Bates-Morganford"))
        );
        assert_eq!(bus.attribute("whlChr"), Some(&AttributeValue::from("POSSIBLE")));
        assert_eq!(bus.attribute("tractGeoid"), Some(&AttributeValue::from("29510116500")));

        let rail = &features[1];
        assert_eq!(rail.object_id(), Some(2));
        assert_eq!(rail.attribute("type"), Some(&AttributeValue::from("Light Rail")));
        assert_eq!(rail.attribute("typ"), Some(&AttributeValue::from("mlc")));
        assert_eq!(rail.attribute("id"), Some(&AttributeValue::from("14328")));
        assert!(rail.attribute("whlChr").is_none());
        assert!(rail.attribute("tractGeoid").is_none());
    }

    #[test]
    fn test_point_geometry_is_lon_lat_in_map_reference() {
        let features = stops_to_features(&stops_document(), SpatialReference::WGS84).unwrap();
        let geometry = &features[1].geometry;

        assert_eq!(geometry.spatial_reference, SpatialReference::WGS84);
        assert_eq!(geometry.shape, Shape::Point(Point::new(-90.2852, 38.6489)));
    }

    #[test]
    fn test_object_ids_are_contiguous_in_input_order() {
        let stops: Vec<Value> = (0..25)
            .map(|i| {
                let typ = ["bus", "mlr", "mlb", "mlc"][i % 4];
                json!({
                    "id": format!("s{i}"),
                    "name": format!("Stop {i}"),
                    "typ": typ,
                    "routes": [],
                    "yx": { "latitude": 38.6, "longitude": -90.2 }
                })
            })
            .collect();

        let features = stops_to_features(&json!({ "stops": stops }), SpatialReference::WGS84).unwrap();
        for (i, feature) in features.iter().enumerate() {
            assert_eq!(feature.object_id(), Some(i as i64 + 1));
            assert_eq!(feature.attribute("name"), Some(&AttributeValue::from(format!("Stop {i}"))));
        }
    }

    #[test]
    fn test_unknown_route_type_fails() {
        for code in ["streetcar", "BUS", ""] {
            let mut document = stops_document();
            document["stops"][1]["typ"] = json!(code);

            let err = stops_to_features(&document, SpatialReference::WGS84).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownRouteType);
            assert!(err.to_string().contains(&format!("{code:?}")));
        }
    }

    #[test]
    fn test_missing_stops_array_is_malformed() {
        let err = stops_to_features(&json!({ "busStops": [] }), SpatialReference::WGS84).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedLayerData);
    }

    #[test]
    fn test_transform_is_idempotent() {
        let document = stops_document();
        let first = stops_to_features(&document, SpatialReference::WGS84).unwrap();
        let second = stops_to_features(&document, SpatialReference::WGS84).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_stops_models() {
        let stops = parse_stops(&stops_document()).unwrap();
        assert_eq!(stops[0].route_type, RouteType::Bus);
        assert_eq!(stops[0].wheelchair, Some(WheelchairBoarding::Possible));
        assert_eq!(stops[0].routes[1].id, RouteIdentifier::new("8"));
        assert_eq!(stops[1].route_type, RouteType::RailBoth);
    }

    #[test]
    fn test_unrecognized_wheelchair_code_is_passed_through() {
        let mut document = stops_document();
        document["stops"][0]["whlChr"] = json!("RAMP_REAR_DOOR");

        let stops = parse_stops(&document).unwrap();
        assert_eq!(stops[0].wheelchair, Some(WheelchairBoarding::Other("RAMP_REAR_DOOR".into())));

        let features = stops_to_features(&document, SpatialReference::WGS84).unwrap();
        assert_eq!(features[0].attribute("whlChr"), Some(&AttributeValue::from("RAMP_REAR_DOOR")));
    }

    #[test]
    fn test_stop_without_id_is_malformed() {
        let mut document = stops_document();
        document["stops"][0]["id"] = json!(null);

        let err = parse_stops(&document).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedLayerData);
    }
}
