//! Immutable screenshot image

use image::RgbaImage;

use crate::domain::Rect;

/// A captured screenshot; fixed at construction
#[derive(Clone, Debug)]
pub struct CapturedImage {
    rgba: RgbaImage,
}

impl CapturedImage {
    pub fn new(rgba: RgbaImage) -> Self {
        log::debug!(
            "CapturedImage captured: {}x{} pixels",
            rgba.width(),
            rgba.height()
        );
        Self { rgba }
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    /// Image extent as a rectangle at the origin
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width() as i32, self.height() as i32)
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Copy of the region `rect` clipped to the image, for region capture
    pub fn cropped(&self, rect: Rect) -> Option<Self> {
        let region = rect.normalized().intersect(self.bounds())?;
        let sub = image::imageops::crop_imm(
            &self.rgba,
            region.left as u32,
            region.top as u32,
            region.width() as u32,
            region.height() as u32,
        )
        .to_image();
        Some(Self::new(sub))
    }
}

impl From<RgbaImage> for CapturedImage {
    fn from(rgba: RgbaImage) -> Self {
        Self::new(rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cropped_clips_to_bounds() {
        let img = CapturedImage::new(RgbaImage::from_pixel(100, 50, image::Rgba([1, 2, 3, 255])));
        let crop = img.cropped(Rect::new(80, 40, 140, 10)).unwrap();
        assert_eq!((crop.width(), crop.height()), (20, 30));
        assert!(img.cropped(Rect::new(200, 0, 300, 10)).is_none());
    }
}
