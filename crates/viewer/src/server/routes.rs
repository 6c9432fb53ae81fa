use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use metro_map_core::compose::CompositionState;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use super::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/state", get(composition_state))
        .route("/layers", get(list_layers))
        .route("/layers/{index}", get(layer_features))
        .route("/legend", get(legend))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn composition_state(State(state): State<AppState>) -> Json<Value> {
    let composition = state.composition.borrow().clone();
    let diagnostic = match &composition {
        CompositionState::Failed(diagnostic) => json!({
            "layer": diagnostic.layer.as_deref(),
            "kind": diagnostic.kind.to_string(),
            "cause": diagnostic.cause,
            "message": diagnostic.to_string(),
        }),
        _ => Value::Null,
    };

    let view = state.snapshot.read().view.as_ref().map(|view| {
        json!({
            "extent": view.extent,
            "wkid": view.spatial_reference.wkid,
            "basemap": view.basemap,
        })
    });

    let layer_list: Vec<String> = state
        .snapshot
        .read()
        .layer_list
        .iter()
        .map(|title| title.to_string())
        .collect();

    Json(json!({
        "state": composition.name(),
        "diagnostic": diagnostic,
        "view": view,
        "layerList": layer_list,
    }))
}

async fn list_layers(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.snapshot.read();
    let layers: Vec<Value> = snapshot
        .layers
        .iter()
        .enumerate()
        .map(|(index, layer)| {
            json!({
                "index": index,
                "title": layer.title(),
                "geometryKind": layer.descriptor.geometry_kind,
                "features": layer.features.len(),
            })
        })
        .collect();

    Json(Value::Array(layers))
}

async fn layer_features(State(state): State<AppState>, Path(index): Path<usize>) -> Response {
    let snapshot = state.snapshot.read();
    match snapshot.layers.get(index) {
        Some(layer) => Json(layer.to_feature_collection()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn legend(State(state): State<AppState>) -> Json<Value> {
    let snapshot = state.snapshot.read();
    let entries: Vec<Value> = snapshot
        .legend
        .iter()
        .map(|(layer, entry)| {
            json!({
                "layer": &**layer,
                "label": entry.label,
                "color": entry.color.to_css(),
            })
        })
        .collect();

    Json(Value::Array(entries))
}
