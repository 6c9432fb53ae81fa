//! A map surface that keeps what it is given, for serving to a browser.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use metro_map_core::compose::surface::{MapSurface, ReadyFuture, SurfaceError, ViewSettings};
use metro_map_core::compose::BuiltLayer;
use metro_map_core::registry::LegendEntry;

#[derive(Default)]
pub struct Snapshot {
    pub view: Option<ViewSettings>,
    /// Bottom layer first
    pub layers: Vec<BuiltLayer>,
    /// Layer titles, top layer first
    pub layer_list: Vec<Arc<str>>,
    /// `(layer title, entry)`, top layer first
    pub legend: Vec<(Arc<str>, LegendEntry)>,
    pub released: bool,
}

/// Read access to the snapshot a [`SnapshotSurface`] writes into
#[derive(Clone, Default)]
pub struct SnapshotHandle(Arc<RwLock<Snapshot>>);

impl SnapshotHandle {
    pub fn read(&self) -> RwLockReadGuard<'_, Snapshot> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Default)]
pub struct SnapshotSurface {
    snapshot: SnapshotHandle,
}

impl SnapshotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }

    fn update<T>(&self, f: impl FnOnce(&mut Snapshot) -> T) -> T {
        let mut guard = self.snapshot.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl MapSurface for SnapshotSurface {
    fn initialize(&mut self, view: &ViewSettings) -> Result<(), SurfaceError> {
        if view.extent.is_empty() {
            return Err(SurfaceError::ViewLoad(format!("empty extent {:?}", view.extent)));
        }

        self.update(|snapshot| {
            if snapshot.released {
                return Err(SurfaceError::ViewLoad("surface already released".into()));
            }
            snapshot.view = Some(view.clone());
            Ok(())
        })
    }

    fn when_ready(&mut self) -> ReadyFuture<'_> {
        // nothing to load
        Box::pin(async { Ok(()) })
    }

    fn add_layer(&mut self, index: usize, layer: BuiltLayer) -> Result<(), SurfaceError> {
        self.update(|snapshot| {
            if snapshot.view.is_none() {
                return Err(SurfaceError::Layer(format!("{} added before the view", layer.title())));
            }
            let index = index.min(snapshot.layers.len());
            snapshot.layers.insert(index, layer);
            Ok(())
        })
    }

    fn add_layer_list(&mut self) -> Result<(), SurfaceError> {
        self.update(|snapshot| {
            if snapshot.view.is_none() {
                return Err(SurfaceError::Widget("layer list added before the view".into()));
            }
            snapshot.layer_list = snapshot
                .layers
                .iter()
                .rev()
                .map(|layer| layer.descriptor.title.clone())
                .collect();
            Ok(())
        })
    }

    fn add_legend(&mut self) -> Result<(), SurfaceError> {
        self.update(|snapshot| {
            if snapshot.view.is_none() {
                return Err(SurfaceError::Widget("legend added before the view".into()));
            }
            snapshot.legend = snapshot
                .layers
                .iter()
                .rev()
                .flat_map(|layer| {
                    let title = layer.descriptor.title.clone();
                    layer
                        .descriptor
                        .renderer
                        .legend(&title)
                        .into_iter()
                        .map(move |entry| (title.clone(), entry))
                })
                .collect();
            Ok(())
        })
    }

    fn release(&mut self) {
        self.update(|snapshot| {
            tracing::debug!(layers = snapshot.layers.len(), "releasing map surface");
            snapshot.view = None;
            snapshot.layers.clear();
            snapshot.layer_list.clear();
            snapshot.legend.clear();
            snapshot.released = true;
        })
    }
}
