//! Interactive editing surface and its controllers

pub mod drawing;
pub mod selection;
pub mod surface;
pub mod text_overlay;

pub use drawing::{DrawState, DrawingMachine};
pub use selection::{SelectionEngine, SizeLabel};
pub use surface::{Services, Surface};
pub use text_overlay::{TextEditSession, TextOverlay};
