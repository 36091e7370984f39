//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the crate.
//! Types here have no rendering or I/O dependencies.

pub mod annotation;
pub mod geometry;
pub mod selection;

pub use annotation::*;
pub use geometry::*;
pub use selection::*;
