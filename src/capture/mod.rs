//! Captured image handling
//!
//! The surface receives one captured image at construction and never
//! mutates it; it is only read and cropped.

pub mod image;

pub use self::image::CapturedImage;
