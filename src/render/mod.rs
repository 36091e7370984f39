//! Annotation rendering module
//!
//! This module contains:
//! - Geometry calculations shared by committed marks and live previews
//! - Mark rasterization using tiny-skia
//! - Text measurement and rasterization
//! - Per-frame composition of the displayed surface

pub mod compose;
pub mod geometry;
pub mod image;
pub mod text;

pub use compose::{FrameInputs, compose};
pub use text::{GlyphText, LineMetrics, TextRasterizer};
