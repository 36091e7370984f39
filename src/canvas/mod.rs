//! Raster state owned by the surface
//!
//! - The annotation layer: a transparent pixmap composited over the capture
//! - Snapshot history for undo

pub mod history;
pub mod layer;

pub use history::History;
pub use layer::{AnnotationLayer, Patch, Snapshot};
