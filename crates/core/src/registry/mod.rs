//! Declarative layer table.
//!
//! One [`LayerDescriptor`] per logical layer says where its data lives, what
//! geometry it holds, how it is styled and what its popup shows. The registry
//! also fixes the composition order: earlier layers draw underneath later ones.

pub mod layers;
pub mod symbol;

use std::sync::Arc;

use crate::config::MapConfig;
use crate::feature::GeometryKind;
use crate::transform::TransformFn;

pub use symbol::{ClassBreak, LegendEntry, Renderer, Symbol, ValueClass};

// ============================================================================
// Descriptor
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldType {
    Oid,
    String,
    Integer,
    Double,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub alias: String,
    pub field_type: FieldType,
}

impl FieldSpec {
    pub fn new(name: &str, alias: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_owned(),
            alias: alias.to_owned(),
            field_type,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopupField {
    pub field: String,
    pub label: String,
}

/// Shown when a feature is selected. `title` may reference fields as `{NAME}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopupTemplate {
    pub title: String,
    pub fields: Vec<PopupField>,
}

impl PopupTemplate {
    pub fn new(title: &str, fields: &[(&str, &str)]) -> Self {
        Self {
            title: title.to_owned(),
            fields: fields
                .iter()
                .map(|(field, label)| PopupField {
                    field: (*field).to_owned(),
                    label: (*label).to_owned(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayerDescriptor {
    pub title: Arc<str>,
    /// Backend path; `None` for layers with no remote data
    pub source: Option<String>,
    pub geometry_kind: GeometryKind,
    pub fields: Vec<FieldSpec>,
    pub renderer: Renderer,
    pub popup: Option<PopupTemplate>,
    /// Falls back to the polygon transform when unset
    pub transform: Option<TransformFn>,
}

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no layer titled {0:?}")]
    UnknownLayer(String),

    #[error("layer {0:?} listed twice")]
    DuplicateLayer(String),
}

#[derive(Clone, Debug)]
pub struct LayerRegistry {
    descriptors: Vec<Arc<LayerDescriptor>>,
    /// Indices into `descriptors`, bottom layer first
    order: Vec<usize>,
}

impl LayerRegistry {
    /// Every known layer, composed polygons first, then paths, then stops
    pub fn new(config: &MapConfig) -> Self {
        let descriptors = vec![
            layers::census_tracts(config),
            layers::counties(config),
            layers::cycling_paths(config),
            layers::bus_stops(config),
            layers::rail_stops(config),
            layers::all_stops(config),
        ];
        let mut registry = Self::from_descriptors(descriptors);
        // the combined stop layer duplicates bus + rail; registered, not drawn
        registry.order.truncate(5);
        registry
    }

    /// Registry drawing exactly `descriptors`, in the given order
    pub fn from_descriptors(descriptors: Vec<LayerDescriptor>) -> Self {
        let order = (0..descriptors.len()).collect();
        Self {
            descriptors: descriptors.into_iter().map(Arc::new).collect(),
            order,
        }
    }

    /// Replace the composition order with the named layers, bottom first
    pub fn with_order(mut self, titles: &[&str]) -> Result<Self, RegistryError> {
        let mut order = Vec::with_capacity(titles.len());
        for title in titles {
            let index = self
                .descriptors
                .iter()
                .position(|d| &*d.title == *title)
                .ok_or_else(|| RegistryError::UnknownLayer((*title).to_owned()))?;
            if order.contains(&index) {
                return Err(RegistryError::DuplicateLayer((*title).to_owned()));
            }
            order.push(index);
        }
        self.order = order;
        Ok(self)
    }

    pub fn get(&self, title: &str) -> Option<&Arc<LayerDescriptor>> {
        self.descriptors.iter().find(|d| &*d.title == title)
    }

    pub fn descriptors(&self) -> &[Arc<LayerDescriptor>] {
        &self.descriptors
    }

    pub fn composition_order(&self) -> Vec<Arc<LayerDescriptor>> {
        self.order.iter().map(|&i| self.descriptors[i].clone()).collect()
    }
}
