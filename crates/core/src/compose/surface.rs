//! The boundary with whatever actually draws the map.

use std::future::Future;
use std::pin::Pin;

use crate::compose::BuiltLayer;
use crate::feature::{Extent, SpatialReference};

pub type ReadyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), SurfaceError>> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("map view failed to load: {0}")]
    ViewLoad(String),

    #[error("map rejected layer: {0}")]
    Layer(String),

    #[error("feature in wkid {found} on a map in wkid {expected}")]
    SpatialReference { expected: u32, found: u32 },

    #[error("map widget: {0}")]
    Widget(String),
}

/// Initial state of the view
#[derive(Clone, Debug, PartialEq)]
pub struct ViewSettings {
    pub extent: Extent,
    pub spatial_reference: SpatialReference,
    pub basemap: String,
}

/// A map and its view, as provided by the rendering library.
///
/// The controller owns its surface exclusively and calls [`release`] exactly
/// once when it is dropped.
///
/// [`release`]: MapSurface::release
pub trait MapSurface: Send {
    /// Create the map and view over the initial extent
    fn initialize(&mut self, view: &ViewSettings) -> Result<(), SurfaceError>;

    /// Resolves once the view can take layers
    fn when_ready(&mut self) -> ReadyFuture<'_>;

    /// Attach a layer at `index`; higher indices draw on top
    fn add_layer(&mut self, index: usize, layer: BuiltLayer) -> Result<(), SurfaceError>;

    /// Expandable list of the attached layers, top layer first
    fn add_layer_list(&mut self) -> Result<(), SurfaceError>;

    /// Expandable legend built from the attached layers' renderers
    fn add_legend(&mut self) -> Result<(), SurfaceError>;

    /// Tear down the view and free whatever it holds
    fn release(&mut self);
}
