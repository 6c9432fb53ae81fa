//! The map's layers. To add one, write a constructor here and list it in
//! [`LayerRegistry::new`](super::LayerRegistry::new).

use metro_transit::{RouteType, WheelchairBoarding};

use super::symbol::{Renderer, Symbol, ValueClass};
use super::{FieldSpec, FieldType, LayerDescriptor, PopupTemplate};
use crate::config::MapConfig;
use crate::feature::{GeometryKind, OBJECT_ID_FIELD};
use crate::transform::{choropleth, polyline, stops};

pub const BUS_STOPS_TITLE: &str = "MetroBus Stops";
pub const RAIL_STOPS_TITLE: &str = "MetroLink Stops";
pub const ALL_STOPS_TITLE: &str = "Metro Transit Stops";
pub const COUNTIES_TITLE: &str = "St. Louis MSA Counties";
pub const TRACTS_TITLE: &str = "Census Tract Population Density";
pub const CYCLING_TITLE: &str = "Cycling Paths";

fn stop_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(OBJECT_ID_FIELD, "ObjectID", FieldType::Oid),
        FieldSpec::new("id", "ID", FieldType::String),
        FieldSpec::new("name", "Name", FieldType::String),
        FieldSpec::new("typ", "Service Type", FieldType::String),
        FieldSpec::new("type", "Stop Type", FieldType::String),
        FieldSpec::new("routes", "Routes Served", FieldType::String),
        FieldSpec::new("tractGeoid", "Tract GeoID", FieldType::String),
        FieldSpec::new("whlChr", "Wheelchair Boarding", FieldType::String),
    ]
}

fn stop_popup() -> PopupTemplate {
    PopupTemplate::new(
        "{type} Stop: {name}",
        &[("routes", "Routes Served:"), ("tractGeoid", "Tract GeoID:")],
    )
}

fn rail_class(config: &MapConfig, route_type: RouteType) -> ValueClass {
    let style = &config.style;
    let color = match route_type {
        RouteType::RailRed => style.rail_red,
        RouteType::RailBlue => style.rail_blue,
        RouteType::RailBoth => style.rail_both,
        RouteType::Bus => style.bus_stop_accessible,
    };
    let size = if route_type.is_rail() {
        style.rail_stop_size
    } else {
        style.bus_stop_size
    };
    ValueClass::new(route_type.line_label(), &[route_type.code()], Symbol::circle(color, size))
}

pub fn bus_stops(config: &MapConfig) -> LayerDescriptor {
    let style = &config.style;
    LayerDescriptor {
        title: BUS_STOPS_TITLE.into(),
        source: Some(config.endpoints.bus_stops.clone()),
        geometry_kind: GeometryKind::Point,
        fields: stop_fields(),
        renderer: Renderer::UniqueValue {
            field: "whlChr".into(),
            classes: vec![
                ValueClass::new(
                    "Wheelchair Accessible",
                    &[WheelchairBoarding::POSSIBLE],
                    Symbol::circle(style.bus_stop_accessible, style.bus_stop_size),
                ),
                ValueClass::new(
                    "Not Wheelchair Accessible",
                    &[WheelchairBoarding::NOT_POSSIBLE],
                    Symbol::circle(style.bus_stop_not_accessible, style.bus_stop_size),
                ),
            ],
            default: None,
        },
        popup: Some(stop_popup()),
        transform: Some(stops::stops_to_features),
    }
}

pub fn rail_stops(config: &MapConfig) -> LayerDescriptor {
    LayerDescriptor {
        title: RAIL_STOPS_TITLE.into(),
        source: Some(config.endpoints.rail_stops.clone()),
        geometry_kind: GeometryKind::Point,
        fields: stop_fields(),
        renderer: Renderer::UniqueValue {
            field: "typ".into(),
            classes: [RouteType::RailRed, RouteType::RailBlue, RouteType::RailBoth]
                .into_iter()
                .map(|t| rail_class(config, t))
                .collect(),
            default: None,
        },
        popup: Some(stop_popup()),
        transform: Some(stops::stops_to_features),
    }
}

/// Every stop from the combined `/stops` endpoint, coloured by service type
pub fn all_stops(config: &MapConfig) -> LayerDescriptor {
    LayerDescriptor {
        title: ALL_STOPS_TITLE.into(),
        source: Some(config.endpoints.all_stops.clone()),
        geometry_kind: GeometryKind::Point,
        fields: stop_fields(),
        renderer: Renderer::UniqueValue {
            field: "typ".into(),
            classes: RouteType::ALL
                .into_iter()
                .map(|t| rail_class(config, t))
                .collect(),
            default: None,
        },
        popup: Some(stop_popup()),
        transform: Some(stops::stops_to_features),
    }
}

pub fn counties(config: &MapConfig) -> LayerDescriptor {
    let style = &config.style;
    LayerDescriptor {
        title: COUNTIES_TITLE.into(),
        source: Some(config.endpoints.counties.clone()),
        geometry_kind: GeometryKind::Polygon,
        fields: vec![
            FieldSpec::new(OBJECT_ID_FIELD, "ObjectID", FieldType::Oid),
            FieldSpec::new("NAME", "Name", FieldType::String),
            FieldSpec::new("STATE", "State", FieldType::String),
        ],
        renderer: Renderer::simple(
            Symbol::fill(style.county_fill)
                .with_outline(style.county_outline_width, style.county_outline),
        ),
        popup: Some(PopupTemplate::new(
            "{NAME}",
            &[("STATE", "State: "), ("NAME", "County: ")],
        )),
        transform: None,
    }
}

pub fn census_tracts(config: &MapConfig) -> LayerDescriptor {
    let style = &config.style;
    LayerDescriptor {
        title: TRACTS_TITLE.into(),
        source: Some(config.endpoints.tracts.clone()),
        geometry_kind: GeometryKind::Polygon,
        fields: vec![
            FieldSpec::new(OBJECT_ID_FIELD, "ObjectID", FieldType::Oid),
            FieldSpec::new("GEOID", "GEOID", FieldType::String),
            FieldSpec::new("TRACT", "Tract", FieldType::String),
            FieldSpec::new("POPL", "Population", FieldType::Double),
            FieldSpec::new("POPLSQMI", "Population/Mi^2", FieldType::Double),
        ],
        renderer: Renderer::ClassBreaks {
            field: "POPLSQMI".into(),
            breaks: choropleth::build_class_breaks(
                &style.population_density_breaks,
                style.tract_alpha,
            ),
        },
        popup: Some(PopupTemplate::new(
            "Census Tract {TRACT}",
            &[("POPL", "Population: "), ("POPLSQMI", "Population/Mi^2: ")],
        )),
        transform: None,
    }
}

pub fn cycling_paths(config: &MapConfig) -> LayerDescriptor {
    let style = &config.style;
    let line = |color| Symbol::line(color, style.cycling_width);
    LayerDescriptor {
        title: CYCLING_TITLE.into(),
        source: Some(config.endpoints.cycling.clone()),
        geometry_kind: GeometryKind::Polyline,
        fields: vec![
            FieldSpec::new(OBJECT_ID_FIELD, "ObjectID", FieldType::Oid),
            FieldSpec::new("name", "Name", FieldType::String),
            FieldSpec::new("highway", "Highway", FieldType::String),
            FieldSpec::new("surface", "Surface", FieldType::String),
        ],
        renderer: Renderer::UniqueValue {
            field: "surface".into(),
            classes: vec![
                ValueClass::new("Paved Path", &["paved", "concrete", "asphalt"], line(style.cycling_paved)),
                ValueClass::new("Unpaved Path", &["unpaved", "dirt"], line(style.cycling_unpaved)),
                ValueClass::new(
                    "Gravel Path",
                    &["gravel", "fine_gravel", "crushed_limestone"],
                    line(style.cycling_gravel),
                ),
            ],
            default: Some(("Path Type Unknown".into(), line(style.cycling_other))),
        },
        popup: Some(PopupTemplate::new("{name}", &[("surface", "Surface: ")])),
        transform: Some(polyline::paths_to_features),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Color;

    #[test]
    fn test_endpoints_come_from_config() {
        let mut config = MapConfig::default();
        config.endpoints.bus_stops = "/v2/stops/bus".into();

        assert_eq!(bus_stops(&config).source.as_deref(), Some("/v2/stops/bus"));
        assert_eq!(rail_stops(&config).source.as_deref(), Some("/stops/ml"));
        assert_eq!(cycling_paths(&config).source.as_deref(), Some("/bikes"));
    }

    #[test]
    fn test_polygon_layers_use_default_transform() {
        let config = MapConfig::default();
        assert!(counties(&config).transform.is_none());
        assert!(census_tracts(&config).transform.is_none());
        assert!(cycling_paths(&config).transform.is_some());
    }

    #[test]
    fn test_rail_stops_classes_follow_line_colours() {
        let config = MapConfig::default();
        let Renderer::UniqueValue { field, classes, .. } = rail_stops(&config).renderer else {
            panic!("rail stops should be categorical");
        };

        assert_eq!(field, "typ");
        let values: Vec<_> = classes.iter().map(|c| c.values[0].as_str()).collect();
        assert_eq!(values, ["mlr", "mlb", "mlc"]);
        assert_eq!(classes[2].label, "Blue/Red Lines");
        assert_eq!(classes[0].symbol.color(), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_all_stops_covers_every_route_type() {
        let Renderer::UniqueValue { classes, .. } = all_stops(&MapConfig::default()).renderer else {
            panic!("combined stops should be categorical");
        };
        assert_eq!(classes.len(), RouteType::ALL.len());
    }

    #[test]
    fn test_tract_breaks_use_configured_alpha() {
        let mut config = MapConfig::default();
        config.style.tract_alpha = 0.4;

        let Renderer::ClassBreaks { breaks, .. } = census_tracts(&config).renderer else {
            panic!("tracts should be a choropleth");
        };
        assert!(breaks.iter().all(|b| b.symbol.color().alpha() == 0.4));
        assert_eq!(breaks.last().map(|b| b.max), Some(99999.0));
    }
}
