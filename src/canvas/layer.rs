//! Mutable annotation layer
//!
//! Every write to the layer goes through [`AnnotationLayer::commit`] (blend a
//! rasterized patch) or [`AnnotationLayer::restore`] (replace from a snapshot).

use anyhow::Context;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

use crate::domain::{Point, Rect};

/// A rasterized mark positioned in layer coordinates
#[derive(Clone, Debug)]
pub struct Patch {
    pub origin: Point,
    pub pixmap: Pixmap,
}

impl Patch {
    pub fn new(origin: Point, pixmap: Pixmap) -> Self {
        Self { origin, pixmap }
    }

    /// Area covered by the patch in layer coordinates
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.pixmap.width() as i32,
            self.origin.y + self.pixmap.height() as i32,
        )
    }
}

/// Saved copy of the whole layer
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot(Pixmap);

/// Transparent pixmap holding every committed mark
#[derive(Clone, Debug)]
pub struct AnnotationLayer {
    pixmap: Pixmap,
}

impl AnnotationLayer {
    /// Fully transparent layer of the given size
    pub fn new(width: u32, height: u32) -> anyhow::Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .with_context(|| format!("cannot allocate {width}x{height} annotation layer"))?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Blend `patch` over the layer
    ///
    /// Returns false (and leaves the layer untouched) when the patch lies
    /// entirely outside the layer.
    pub fn commit(&mut self, patch: &Patch) -> bool {
        if patch.bounds().intersect(self.bounds()).is_none() {
            log::debug!("Dropping patch outside layer: {:?}", patch.bounds());
            return false;
        }
        self.pixmap.draw_pixmap(
            patch.origin.x,
            patch.origin.y,
            patch.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.pixmap.clone())
    }

    /// Replace the layer with a snapshot of the same size
    pub fn restore(&mut self, snapshot: Snapshot) -> bool {
        let Snapshot(pixmap) = snapshot;
        if pixmap.width() != self.width() || pixmap.height() != self.height() {
            log::warn!(
                "Ignoring {}x{} snapshot for {}x{} layer",
                pixmap.width(),
                pixmap.height(),
                self.width(),
                self.height()
            );
            return false;
        }
        self.pixmap = pixmap;
        true
    }

    /// Straight-alpha RGBA at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// True when nothing has been drawn
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }
}
