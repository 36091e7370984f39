//! Shared geometry calculations for annotations
//!
//! This module contains constants and math shared between
//! committed marks and the live preview drawn each frame.

/// Arrow geometry constants
pub mod arrow {
    /// Arrowhead half-angle from the shaft in radians (30 degrees)
    pub const HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;
    /// Arrowhead length as a multiple of the stroke width
    pub const HEAD_LENGTH_FACTOR: f32 = 2.0;

    /// Calculate the two arrowhead wing points for an arrow ending at `end`
    ///
    /// The wings point back along the shaft: the reversed line direction is
    /// rotated by +/- [`HEAD_ANGLE`] and scaled to twice the stroke width.
    /// Returns `None` for zero-length arrows.
    pub fn head_points(
        start: (f32, f32),
        end: (f32, f32),
        stroke_width: f32,
    ) -> Option<[(f32, f32); 2]> {
        let dx = start.0 - end.0;
        let dy = start.1 - end.1;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        let angle = dy.atan2(dx);
        let length = stroke_width * HEAD_LENGTH_FACTOR;

        let wing = |a: f32| (end.0 + a.cos() * length, end.1 + a.sin() * length);
        Some([wing(angle + HEAD_ANGLE), wing(angle - HEAD_ANGLE)])
    }
}

/// Shape (rectangle/ellipse) geometry constants
pub mod shape {
    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;
}

/// Selection decoration constants
pub mod selection {
    /// Dashed outline width
    pub const OUTLINE_WIDTH: f32 = 2.0;
    /// Dash pattern: on, off
    pub const DASH: [f32; 2] = [6.0, 4.0];
    /// Side of the filled square drawn at each handle
    pub const HANDLE_MARK_SIZE: f32 = 6.0;
    /// Size label offset from the selection's top-right corner
    pub const LABEL_OFFSET: (i32, i32) = (10, -20);
    /// Toolbar offset from the selection's top-right corner
    pub const TOOLBAR_OFFSET: (i32, i32) = (10, 10);
    /// Size label text height
    pub const LABEL_FONT_SIZE: f32 = 12.0;
}

/// Brush indicator outline width
pub const BRUSH_OUTLINE_WIDTH: f32 = 2.0;

/// Horizontal padding added to the measured text width of the text field
pub const TEXT_FIELD_PADDING: f32 = 10.0;

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

/// Calculate ellipse center and radii from bounding box
#[inline]
pub fn ellipse_from_bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> (f32, f32, f32, f32) {
    let cx = (min_x + max_x) * 0.5;
    let cy = (min_y + max_y) * 0.5;
    let rx = ((max_x - min_x) * 0.5).max(1.0);
    let ry = ((max_y - min_y) * 0.5).max(1.0);
    (cx, cy, rx, ry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_horizontal_arrowhead() {
        let [w1, w2] = arrow::head_points((0.0, 0.0), (100.0, 0.0), 5.0).unwrap();

        for (wx, wy) in [w1, w2] {
            let (dx, dy) = (wx - 100.0, wy);
            // 2x stroke width from the tip
            assert!(approx((dx * dx + dy * dy).sqrt(), 10.0));
            // 30 degrees off the reversed direction (-1, 0)
            let cos = -dx / 10.0;
            assert!(approx(cos, arrow::HEAD_ANGLE.cos()));
        }

        assert!(approx(w1.0, 100.0 - 10.0 * 30f32.to_radians().cos()));
        assert!(approx(w1.1, -5.0));
        assert!(approx(w2.1, 5.0));
    }

    #[test]
    fn test_zero_length_arrow_has_no_head() {
        assert!(arrow::head_points((3.0, 3.0), (3.0, 3.0), 5.0).is_none());
    }

    #[test]
    fn test_ellipse_from_bounds() {
        let (cx, cy, rx, ry) = ellipse_from_bounds(0.0, 0.0, 20.0, 10.0);
        assert_eq!((cx, cy, rx, ry), (10.0, 5.0, 10.0, 5.0));
    }
}
