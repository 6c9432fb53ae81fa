//! Failure classification shared by every stage of a map build.

use std::sync::Arc;

use crate::compose::surface::SurfaceError;
use crate::fetch::FetchError;
use crate::transform::TransformError;

/// The four ways a layer can fail to reach the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
pub enum ErrorKind {
    /// Non-success HTTP status, network error or unreadable body
    FetchFailure,
    /// Expected array or field missing from the layer document
    MalformedLayerData,
    /// Stop service type outside the known set
    UnknownRouteType,
    /// The map surface rejected the view or a layer
    RenderFailure,
}

#[derive(Debug, thiserror::Error)]
pub enum LayerFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Render(#[from] SurfaceError),
}

impl LayerFailure {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayerFailure::Fetch(_) => ErrorKind::FetchFailure,
            LayerFailure::Transform(e) => e.kind(),
            LayerFailure::Render(_) => ErrorKind::RenderFailure,
        }
    }
}

/// A failure annotated with the title of the layer it belongs to
#[derive(Debug, thiserror::Error)]
#[error("layer \"{title}\": {failure}")]
pub struct LayerError {
    pub title: Arc<str>,
    pub failure: LayerFailure,
}

impl LayerError {
    pub fn new(title: Arc<str>, failure: impl Into<LayerFailure>) -> Self {
        Self {
            title,
            failure: failure.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.failure.kind()
    }
}
