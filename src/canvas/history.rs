//! Snapshot-based undo history for the annotation layer

use super::layer::{AnnotationLayer, Snapshot};

/// LIFO stack of layer snapshots; depth is bounded only by memory
#[derive(Debug, Default)]
pub struct History {
    snapshots: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the layer's current state before it is mutated
    pub fn push(&mut self, layer: &AnnotationLayer) {
        self.snapshots.push(layer.snapshot());
        log::debug!("Undo snapshot pushed (depth {})", self.snapshots.len());
    }

    /// Restore the most recent snapshot; no-op on empty history
    pub fn undo(&mut self, layer: &mut AnnotationLayer) -> bool {
        let Some(snapshot) = self.snapshots.pop() else {
            return false;
        };
        layer.restore(snapshot);
        log::debug!("Undo applied (depth {})", self.snapshots.len());
        true
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
