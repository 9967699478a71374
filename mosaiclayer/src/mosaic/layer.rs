//! Renderable layers and the collection they are installed into.

use std::fmt;
use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::geo::GeographicRectangle;

/// Handle to a layer inside a [`LayerCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u64);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

/// Role of a mosaic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Low-resolution render of the whole mosaic, installed once.
    FullCoverage,
    /// High-resolution render of the visible region.
    Inset,
}

/// A composited bitmap draped over a geographic rectangle.
#[derive(Debug, Clone)]
pub struct Layer {
    pub kind: LayerKind,
    pub rectangle: GeographicRectangle,
    pub bitmap: Arc<Bitmap>,
    pub credit: Option<String>,
}

/// The renderer's layer list.
///
/// Layers added later draw on top of earlier ones. A cutout hides the part of
/// a layer inside the given rectangle.
pub trait LayerCollection {
    fn add(&mut self, layer: Layer) -> LayerId;

    /// Returns false when `id` was not present.
    fn remove(&mut self, id: LayerId) -> bool;

    fn set_cutout(&mut self, id: LayerId, cutout: Option<GeographicRectangle>);
}

#[derive(Debug, Clone)]
struct Slot {
    id: LayerId,
    layer: Layer,
    cutout: Option<GeographicRectangle>,
}

/// In-memory [`LayerCollection`], bottom to top.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    slots: Vec<Slot>,
    next_id: u64,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.slot(id).map(|slot| &slot.layer)
    }

    pub fn cutout(&self, id: LayerId) -> Option<GeographicRectangle> {
        self.slot(id).and_then(|slot| slot.cutout)
    }

    /// Layers from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.slots.iter().map(|slot| (slot.id, &slot.layer))
    }

    /// Layers of one kind, bottom to top.
    pub fn of_kind(&self, kind: LayerKind) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.iter().filter(move |(_, layer)| layer.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, id: LayerId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.id == id)
    }
}

impl LayerCollection for LayerStack {
    fn add(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            layer,
            cutout: None,
        });
        id
    }

    fn remove(&mut self, id: LayerId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }

    fn set_cutout(&mut self, id: LayerId, cutout: Option<GeographicRectangle>) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.id == id) {
            slot.cutout = cutout;
        }
    }
}
