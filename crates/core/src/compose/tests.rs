use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use super::*;
use crate::config::Color;
use crate::feature::{Feature, Geometry, GeometryKind, Shape, SpatialReference};
use crate::fetch::StaticFetcher;
use crate::registry::layers::*;
use crate::registry::{LayerDescriptor, Renderer, Symbol};
use crate::transform::TransformError;

#[derive(Default)]
struct Record {
    view: Option<ViewSettings>,
    layers: Vec<(usize, String, usize)>,
    layer_list: bool,
    legend: bool,
    released: u32,
}

#[derive(Default)]
struct RecordingSurface {
    record: Arc<Mutex<Record>>,
    fail_initialize: bool,
    fail_ready: bool,
    reject_layer: Option<&'static str>,
    fail_legend: bool,
}

impl MapSurface for RecordingSurface {
    fn initialize(&mut self, view: &ViewSettings) -> Result<(), SurfaceError> {
        if self.fail_initialize {
            return Err(SurfaceError::ViewLoad("no container".into()));
        }
        self.record.lock().unwrap().view = Some(view.clone());
        Ok(())
    }

    fn when_ready(&mut self) -> surface::ReadyFuture<'_> {
        let fail = self.fail_ready;
        Box::pin(async move {
            tokio::task::yield_now().await;
            if fail {
                Err(SurfaceError::ViewLoad("basemap tiles unavailable".into()))
            } else {
                Ok(())
            }
        })
    }

    fn add_layer(&mut self, index: usize, layer: BuiltLayer) -> Result<(), SurfaceError> {
        if self.reject_layer == Some(layer.title()) {
            return Err(SurfaceError::Layer("renderer field missing".into()));
        }
        self.record
            .lock()
            .unwrap()
            .layers
            .push((index, layer.title().to_owned(), layer.features.len()));
        Ok(())
    }

    fn add_layer_list(&mut self) -> Result<(), SurfaceError> {
        self.record.lock().unwrap().layer_list = true;
        Ok(())
    }

    fn add_legend(&mut self) -> Result<(), SurfaceError> {
        if self.fail_legend {
            return Err(SurfaceError::Widget("legend container missing".into()));
        }
        self.record.lock().unwrap().legend = true;
        Ok(())
    }

    fn release(&mut self) {
        self.record.lock().unwrap().released += 1;
    }
}

fn stop(id: &str, typ: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Stop {id}"),
        "typ": typ,
        "routes": [{ "id": "1", "name": "1", "nameLong": "Gateway" }],
        "yx": { "latitude": 38.62, "longitude": -90.19 }
    })
}

fn polygons() -> Value {
    json!({
        "features": [{
            "geometry": { "rings": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]] },
            "attributes": { "NAME": "St. Louis city" }
        }]
    })
}

fn backend() -> StaticFetcher {
    StaticFetcher::new()
        .with_document("/tracts", polygons())
        .with_document("/counties", polygons())
        .with_document("/bikes", json!({ "features": [] }))
        .with_document("/stops/bus", json!({ "stops": [stop("1", "bus"), stop("2", "bus")] }))
        .with_document("/stops/ml", json!({ "stops": [stop("3", "mlr")] }))
}

fn new_controller(surface: RecordingSurface, fetcher: StaticFetcher) -> MapController<RecordingSurface> {
    let config = MapConfig::default();
    let registry = Arc::new(LayerRegistry::new(&config));
    MapController::new(surface, &config, registry, Arc::new(fetcher))
}

fn point_layer(title: &str, endpoint: &str) -> LayerDescriptor {
    LayerDescriptor {
        title: title.into(),
        source: Some(endpoint.to_owned()),
        geometry_kind: GeometryKind::Point,
        fields: Vec::new(),
        renderer: Renderer::simple(Symbol::circle(Color::rgb(0, 0, 0), 4.0)),
        popup: None,
        transform: Some(crate::transform::stops::stops_to_features),
    }
}

#[tokio::test]
async fn test_builds_to_ready() {
    let surface = RecordingSurface::default();
    let record = surface.record.clone();
    let mut controller = new_controller(surface, backend());
    assert_eq!(controller.state(), CompositionState::ViewLoading);

    controller.run().await.unwrap();
    assert_eq!(controller.state(), CompositionState::Ready);

    let record = record.lock().unwrap();
    assert_eq!(record.view.as_ref().map(|v| v.basemap.as_str()), Some("dark-gray"));
    assert_eq!(
        record.layers,
        [
            (0, TRACTS_TITLE.to_owned(), 1),
            (1, COUNTIES_TITLE.to_owned(), 1),
            (2, CYCLING_TITLE.to_owned(), 0),
            (3, BUS_STOPS_TITLE.to_owned(), 2),
            (4, RAIL_STOPS_TITLE.to_owned(), 1),
        ]
    );
    assert!(record.layer_list);
    assert!(record.legend);
}

#[tokio::test]
async fn test_state_transitions_are_published() {
    let mut controller = new_controller(RecordingSurface::default(), backend());
    let mut states = controller.subscribe();
    assert_eq!(*states.borrow_and_update(), CompositionState::ViewLoading);

    controller.run().await.unwrap();
    assert!(states.has_changed().unwrap());
    assert_eq!(*states.borrow_and_update(), CompositionState::Ready);
}

#[tokio::test]
async fn test_third_layer_fetch_failure_fails_build() {
    let registry = LayerRegistry::from_descriptors(vec![
        point_layer("First", "/one"),
        point_layer("Second", "/two"),
        point_layer("Third", "/three"),
        point_layer("Fourth", "/four"),
    ]);
    let fetcher = StaticFetcher::new()
        .with_document("/one", json!({ "stops": [stop("1", "bus")] }))
        .with_document("/two", json!({ "stops": [stop("2", "mlb")] }))
        .with_status("/three", 503)
        .with_document("/four", json!({ "stops": [stop("4", "mlc")] }));

    let surface = RecordingSurface::default();
    let record = surface.record.clone();
    let mut controller = MapController::new(
        surface,
        &MapConfig::default(),
        Arc::new(registry),
        Arc::new(fetcher),
    );

    let diagnostic = controller.run().await.unwrap_err();
    assert_eq!(diagnostic.layer.as_deref(), Some("Third"));
    assert_eq!(diagnostic.kind, ErrorKind::FetchFailure);
    assert!(diagnostic.to_string().contains("\"Third\""));
    assert_eq!(controller.state(), CompositionState::Failed(diagnostic));

    let record = record.lock().unwrap();
    assert!(record.layers.is_empty());
    assert!(!record.layer_list);
    assert!(!record.legend);
}

#[tokio::test]
async fn test_unknown_route_type_fails_build() {
    let fetcher = backend().with_document("/stops/ml", json!({ "stops": [stop("3", "funicular")] }));
    let mut controller = new_controller(RecordingSurface::default(), fetcher);

    let diagnostic = controller.run().await.unwrap_err();
    assert_eq!(diagnostic.layer.as_deref(), Some(RAIL_STOPS_TITLE));
    assert_eq!(diagnostic.kind, ErrorKind::UnknownRouteType);
}

#[tokio::test]
async fn test_view_failures_have_no_layer() {
    let surface = RecordingSurface {
        fail_initialize: true,
        ..Default::default()
    };
    let mut controller = new_controller(surface, backend());
    assert!(matches!(controller.state(), CompositionState::Failed(_)));

    let diagnostic = controller.run().await.unwrap_err();
    assert_eq!(diagnostic.layer, None);
    assert_eq!(diagnostic.kind, ErrorKind::RenderFailure);

    let surface = RecordingSurface {
        fail_ready: true,
        ..Default::default()
    };
    let record = surface.record.clone();
    let mut controller = new_controller(surface, backend());
    let diagnostic = controller.run().await.unwrap_err();
    assert!(diagnostic.cause.contains("basemap tiles unavailable"));
    assert!(record.lock().unwrap().layers.is_empty());
}

#[tokio::test]
async fn test_rejected_layer_is_render_failure() {
    let surface = RecordingSurface {
        reject_layer: Some(CYCLING_TITLE),
        ..Default::default()
    };
    let record = surface.record.clone();
    let mut controller = new_controller(surface, backend());

    let diagnostic = controller.run().await.unwrap_err();
    assert_eq!(diagnostic.layer.as_deref(), Some(CYCLING_TITLE));
    assert_eq!(diagnostic.kind, ErrorKind::RenderFailure);

    // layers below the rejected one were already attached
    assert_eq!(record.lock().unwrap().layers.len(), 2);
}

#[tokio::test]
async fn test_spatial_reference_mismatch_is_rejected() {
    fn web_mercator(_: &Value, _: SpatialReference) -> Result<Vec<Feature>, TransformError> {
        Ok(vec![Feature::new(
            Geometry::new(Shape::Point(geo::Point::new(0.0, 0.0)), SpatialReference { wkid: 3857 }),
            Default::default(),
        )])
    }

    let mut descriptor = point_layer("Projected", "/projected");
    descriptor.transform = Some(web_mercator);
    let registry = LayerRegistry::from_descriptors(vec![descriptor]);
    let fetcher = StaticFetcher::new().with_document("/projected", json!({}));

    let mut controller = MapController::new(
        RecordingSurface::default(),
        &MapConfig::default(),
        Arc::new(registry),
        Arc::new(fetcher),
    );

    let diagnostic = controller.run().await.unwrap_err();
    assert_eq!(diagnostic.kind, ErrorKind::RenderFailure);
    assert!(diagnostic.cause.contains("3857"));
}

#[tokio::test]
async fn test_run_does_not_retry() {
    let surface = RecordingSurface::default();
    let record = surface.record.clone();
    let mut controller = new_controller(surface, backend());

    controller.run().await.unwrap();
    controller.run().await.unwrap();
    assert_eq!(record.lock().unwrap().layers.len(), 5);

    let mut failed = controller_with_failure();
    let first = failed.run().await.unwrap_err();
    let second = failed.run().await.unwrap_err();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_interrupted_run_fails_instead_of_resuming() {
    let surface = RecordingSurface::default();
    let record = surface.record.clone();
    let mut controller = new_controller(surface, backend());

    {
        let mut run = std::pin::pin!(controller.run());
        // the view becomes ready on the second poll, the fetches are then pending
        assert!(futures_util::poll!(run.as_mut()).is_pending());
        assert!(futures_util::poll!(run.as_mut()).is_pending());
    }
    assert_eq!(controller.state(), CompositionState::LayersBuilding);

    let diagnostic = controller.run().await.unwrap_err();
    assert_eq!(diagnostic.layer, None);
    assert_eq!(diagnostic.kind, ErrorKind::RenderFailure);
    assert!(diagnostic.cause.contains("LayersBuilding"));
    assert_eq!(controller.state(), CompositionState::Failed(diagnostic));
    assert!(record.lock().unwrap().layers.is_empty());
}

#[tokio::test]
async fn test_widget_failure_fails_build() {
    let surface = RecordingSurface {
        fail_legend: true,
        ..Default::default()
    };
    let record = surface.record.clone();
    let mut controller = new_controller(surface, backend());

    let diagnostic = controller.run().await.unwrap_err();
    assert_eq!(diagnostic.layer, None);
    assert!(diagnostic.cause.contains("legend container missing"));
    assert!(record.lock().unwrap().layer_list);
    assert!(matches!(controller.state(), CompositionState::Failed(_)));
}

fn controller_with_failure() -> MapController<RecordingSurface> {
    new_controller(RecordingSurface::default(), backend().with_status("/counties", 500))
}

#[tokio::test]
async fn test_drop_releases_surface_once() {
    let surface = RecordingSurface::default();
    let record = surface.record.clone();

    let mut controller = new_controller(surface, backend());
    controller.run().await.unwrap();
    assert_eq!(record.lock().unwrap().released, 0);

    drop(controller);
    assert_eq!(record.lock().unwrap().released, 1);
}

#[test]
fn test_diagnostic_display() {
    let diagnostic = Diagnostic {
        layer: Some("Cycling Paths".into()),
        kind: ErrorKind::MalformedLayerData,
        cause: "malformed layer data: expected data.features[]".into(),
    };
    assert_eq!(
        diagnostic.to_string(),
        "MalformedLayerData in layer \"Cycling Paths\": malformed layer data: expected data.features[]"
    );

    let view = Diagnostic::from(&SurfaceError::ViewLoad("no container".into()));
    assert_eq!(view.to_string(), "RenderFailure in map view: map view failed to load: no container");
}
