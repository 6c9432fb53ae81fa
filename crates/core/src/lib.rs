//! # metro-map-core
//!
//! Builds the layers of the metro transit map: fetches layer data from the
//! backend, turns raw records into features, and composes the resulting layers
//! onto a map surface in drawing order.

pub mod compose;
pub mod config;
pub mod error;
pub mod feature;
pub mod fetch;
pub mod registry;
pub mod transform;

// Re-export transit from the transit crate
pub use metro_transit as transit;

pub mod prelude {
    pub use crate::compose::{
        BuiltLayer, CompositionState, Diagnostic, LayerBuilder, MapController,
        surface::{MapSurface, SurfaceError, ViewSettings},
    };
    pub use crate::config::{Color, MapConfig};
    pub use crate::error::{ErrorKind, LayerError, LayerFailure};
    pub use crate::feature::{
        AttributeValue, Attributes, Extent, Feature, Geometry, GeometryKind, Shape,
        SpatialReference,
    };
    pub use crate::fetch::{DataFetcher, FetchError, HttpFetcher, StaticFetcher};
    pub use crate::registry::{LayerDescriptor, LayerRegistry};
}
