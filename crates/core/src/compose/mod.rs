//! Drives a map surface from an empty view to a fully layered map.
//!
//! ```text
//! Uninitialized -> ViewLoading -> LayersBuilding -> Ready
//!        \______________\_______________\__________> Failed
//! ```
//!
//! Layers are attached only after every one of them has been fetched and
//! transformed. A single failing layer fails the whole build, and the view is
//! left without data layers rather than with an arbitrary subset of them.

mod builder;
pub mod surface;

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

pub use builder::{BuiltLayer, LayerBuilder};

use crate::config::MapConfig;
use crate::error::{ErrorKind, LayerError};
use crate::fetch::DataFetcher;
use crate::registry::LayerRegistry;
use surface::{MapSurface, SurfaceError, ViewSettings};

// ============================================================================
// State
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
pub enum CompositionState {
    Uninitialized,
    ViewLoading,
    LayersBuilding,
    Ready,
    Failed(Diagnostic),
}

impl CompositionState {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// The single user-facing report of a failed build
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// `None` when the view itself failed
    pub layer: Option<Arc<str>>,
    pub kind: ErrorKind,
    pub cause: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.layer {
            Some(layer) => write!(f, "{} in layer \"{}\": {}", self.kind, layer, self.cause),
            None => write!(f, "{} in map view: {}", self.kind, self.cause),
        }
    }
}

impl std::error::Error for Diagnostic {}

impl From<&LayerError> for Diagnostic {
    fn from(error: &LayerError) -> Self {
        Self {
            layer: Some(error.title.clone()),
            kind: error.kind(),
            cause: error.failure.to_string(),
        }
    }
}

impl From<&SurfaceError> for Diagnostic {
    fn from(error: &SurfaceError) -> Self {
        Self {
            layer: None,
            kind: ErrorKind::RenderFailure,
            cause: error.to_string(),
        }
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Owns a map surface for its whole lifetime and composes the configured
/// layers onto it. Dropping the controller releases the surface.
pub struct MapController<S: MapSurface> {
    surface: S,
    builder: LayerBuilder,
    view: ViewSettings,
    state: watch::Sender<CompositionState>,
}

impl<S: MapSurface> MapController<S> {
    /// Takes ownership of `surface` and initializes its view right away.
    pub fn new(
        surface: S,
        config: &MapConfig,
        registry: Arc<LayerRegistry>,
        fetcher: Arc<dyn DataFetcher>,
    ) -> Self {
        let (state, _) = watch::channel(CompositionState::Uninitialized);
        let view = ViewSettings {
            extent: config.extent,
            spatial_reference: config.spatial_reference,
            basemap: config.basemap.clone(),
        };

        let mut controller = Self {
            surface,
            builder: LayerBuilder::new(fetcher, registry, config.spatial_reference),
            view,
            state,
        };

        match controller.surface.initialize(&controller.view) {
            Ok(()) => controller.transition(CompositionState::ViewLoading),
            Err(e) => {
                controller.fail(Diagnostic::from(&e));
            }
        }
        controller
    }

    pub fn state(&self) -> CompositionState {
        self.state.borrow().clone()
    }

    /// Watch state changes; the presentation layer waits on this for
    /// ready/failed.
    pub fn subscribe(&self) -> watch::Receiver<CompositionState> {
        self.state.subscribe()
    }

    /// Wait for the view, build every layer and attach them with a layer list
    /// and legend.
    ///
    /// Runs once: a finished controller returns its final outcome again
    /// without touching the surface. If an earlier `run` was dropped before
    /// finishing, the surface holds an unknown subset of the build and the
    /// controller fails instead of resuming.
    pub async fn run(&mut self) -> Result<(), Diagnostic> {
        match self.state() {
            CompositionState::ViewLoading => {}
            CompositionState::Ready => return Ok(()),
            CompositionState::Failed(diagnostic) => return Err(diagnostic),
            interrupted => {
                return Err(self.fail(Diagnostic {
                    layer: None,
                    kind: ErrorKind::RenderFailure,
                    cause: format!("map composition interrupted during {}", interrupted.name()),
                }));
            }
        }

        match self.compose().await {
            Ok(()) => {
                self.transition(CompositionState::Ready);
                Ok(())
            }
            Err(diagnostic) => Err(self.fail(diagnostic)),
        }
    }

    async fn compose(&mut self) -> Result<(), Diagnostic> {
        self.surface
            .when_ready()
            .await
            .map_err(|e| Diagnostic::from(&e))?;
        self.transition(CompositionState::LayersBuilding);

        let layers = self
            .builder
            .build_layers()
            .await
            .map_err(|e| Diagnostic::from(&e))?;

        for (index, layer) in layers.into_iter().enumerate() {
            let title = layer.descriptor.title.clone();
            self.attach(index, layer)
                .map_err(|e| Diagnostic::from(&LayerError::new(title, e)))?;
        }

        self.surface.add_layer_list().map_err(|e| Diagnostic::from(&e))?;
        self.surface.add_legend().map_err(|e| Diagnostic::from(&e))?;
        Ok(())
    }

    fn attach(&mut self, index: usize, layer: BuiltLayer) -> Result<(), SurfaceError> {
        let expected = self.view.spatial_reference;
        if let Some(stray) = layer
            .features
            .iter()
            .map(|f| f.geometry.spatial_reference)
            .find(|sr| *sr != expected)
        {
            return Err(SurfaceError::SpatialReference {
                expected: expected.wkid,
                found: stray.wkid,
            });
        }

        tracing::debug!(layer = layer.title(), index, features = layer.features.len(), "attaching layer");
        self.surface.add_layer(index, layer)
    }

    fn transition(&mut self, next: CompositionState) {
        tracing::info!(state = next.name(), "map composition");
        self.state.send_replace(next);
    }

    fn fail(&mut self, diagnostic: Diagnostic) -> Diagnostic {
        tracing::error!(%diagnostic, "failed to build or display map");
        self.state.send_replace(CompositionState::Failed(diagnostic.clone()));
        diagnostic
    }
}

impl<S: MapSurface> Drop for MapController<S> {
    fn drop(&mut self) {
        self.surface.release();
    }
}

#[cfg(test)]
mod tests;
