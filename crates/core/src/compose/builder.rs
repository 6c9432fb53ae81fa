use std::sync::Arc;

use futures_util::future::join_all;

use crate::error::LayerError;
use crate::feature::{Feature, SpatialReference, geojson::feature_collection};
use crate::fetch::DataFetcher;
use crate::registry::{LayerDescriptor, LayerRegistry};
use crate::transform::transform_layer;

/// A layer's descriptor together with the features built for it
#[derive(Clone, Debug)]
pub struct BuiltLayer {
    pub descriptor: Arc<LayerDescriptor>,
    pub features: Vec<Feature>,
}

impl BuiltLayer {
    pub fn title(&self) -> &str {
        &self.descriptor.title
    }

    pub fn to_feature_collection(&self) -> geojson::FeatureCollection {
        feature_collection(&self.features)
    }
}

/// Fetches and transforms every layer in the registry's composition order
#[derive(Clone)]
pub struct LayerBuilder {
    fetcher: Arc<dyn DataFetcher>,
    registry: Arc<LayerRegistry>,
    spatial_reference: SpatialReference,
}

impl LayerBuilder {
    pub fn new(
        fetcher: Arc<dyn DataFetcher>,
        registry: Arc<LayerRegistry>,
        spatial_reference: SpatialReference,
    ) -> Self {
        Self {
            fetcher,
            registry,
            spatial_reference,
        }
    }

    /// Build all layers concurrently.
    ///
    /// Every layer runs to completion before this returns. If any failed, the
    /// error of the first failing layer in composition order is returned and
    /// no layers are.
    pub async fn build_layers(&self) -> Result<Vec<BuiltLayer>, LayerError> {
        let order = self.registry.composition_order();
        tracing::info!(layers = order.len(), "building map layers");

        join_all(order.into_iter().map(|descriptor| self.build_layer(descriptor)))
            .await
            .into_iter()
            .collect()
    }

    pub async fn build_layer(&self, descriptor: Arc<LayerDescriptor>) -> Result<BuiltLayer, LayerError> {
        let features = match &descriptor.source {
            Some(endpoint) => {
                let document = self
                    .fetcher
                    .fetch_json(endpoint)
                    .await
                    .map_err(|e| LayerError::new(descriptor.title.clone(), e))?;
                transform_layer(&descriptor, &document, self.spatial_reference)?
            }
            None => Vec::new(),
        };

        Ok(BuiltLayer {
            descriptor,
            features,
        })
    }
}
