//! Screenshot annotation surface
//!
//! A [`Surface`] takes one captured image and lets the user select a region,
//! draw pen strokes, shapes and text over it, undo, and finally save, copy or
//! close. The host window owns the event loop: it forwards input and toolbar
//! events, paints frames on request and listens for [`SurfaceEvent`]s.

pub mod canvas;
pub mod capture;
pub mod config;
pub mod domain;
pub mod output;
pub mod render;
pub mod session;
pub mod widget;

use crossbeam_channel::Receiver;

pub use capture::CapturedImage;
pub use config::{AppConfig, ShapeColor};
pub use domain::{CursorShape, Point, Rect, Tool};
pub use session::{EditorEvent, InputEvent, Key, Modifiers, SurfaceEvent};
pub use widget::{Services, Surface};

/// Open a surface on `image` with the system collaborators
///
/// Returns the surface and the channel its notifications arrive on.
pub fn open(image: CapturedImage) -> anyhow::Result<(Surface, Receiver<SurfaceEvent>)> {
    let (sender, receiver) = crossbeam_channel::unbounded();
    let services = Services::system()?;
    let surface = Surface::new(image, services, sender)?;
    let capture = surface.image();
    log::info!("Opened surface on {}x{} capture", capture.width(), capture.height());
    Ok((surface, receiver))
}
