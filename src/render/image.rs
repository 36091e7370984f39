//! Mark rasterization using tiny-skia
//!
//! Shapes are drawn either into a standalone [`Patch`] (for committing to the
//! annotation layer) or straight onto a frame pixmap (for live preview).

use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PremultipliedColorU8,
    Stroke, Transform,
};

use super::geometry::{self, arrow, shape};
use crate::canvas::Patch;
use crate::config::ShapeColor;
use crate::domain::{Point, Shape, ShapeKind};

/// Convert a straight-alpha RgbaImage into a premultiplied Pixmap
pub fn rgba_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Convert a premultiplied Pixmap back into a straight-alpha RgbaImage
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    img
}

/// Anti-aliased solid paint in the given color
pub fn solid_paint(color: ShapeColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Solid stroke with rounded caps and joins
pub fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<Path> {
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);

    // Top to right
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);

    // Right to bottom
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);

    // Bottom to left
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);

    // Left to top
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

/// Closed rectangle outline path
pub fn build_rect_path(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    pb.finish()
}

fn build_line_path(start: (f32, f32), end: (f32, f32)) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(start.0, start.1);
    pb.line_to(end.0, end.1);
    pb.finish()
}

/// Filled triangle at the tip of an arrow
fn build_arrowhead_path(start: (f32, f32), end: (f32, f32), width: f32) -> Option<Path> {
    let [w1, w2] = arrow::head_points(start, end, width)?;
    let mut pb = PathBuilder::new();
    pb.move_to(end.0, end.1);
    pb.line_to(w1.0, w1.1);
    pb.line_to(w2.0, w2.1);
    pb.close();
    pb.finish()
}

/// Stroke outline and optional fill for a shape
struct ShapePaths {
    stroke: Path,
    fill: Option<Path>,
}

fn shape_paths(shape: &Shape, width: f32) -> Option<ShapePaths> {
    let start = shape.anchor.to_f32();
    let end = shape.end.to_f32();
    match shape.kind {
        ShapeKind::Rectangle => {
            let (min_x, min_y, max_x, max_y) =
                geometry::normalize_rect(start.0, start.1, end.0, end.1);
            Some(ShapePaths {
                stroke: build_rect_path(min_x, min_y, max_x, max_y)?,
                fill: None,
            })
        }
        ShapeKind::Ellipse => {
            let (min_x, min_y, max_x, max_y) =
                geometry::normalize_rect(start.0, start.1, end.0, end.1);
            let (cx, cy, rx, ry) = geometry::ellipse_from_bounds(min_x, min_y, max_x, max_y);
            Some(ShapePaths {
                stroke: build_ellipse_path(cx, cy, rx, ry)?,
                fill: None,
            })
        }
        ShapeKind::Line => Some(ShapePaths {
            stroke: build_line_path(start, end)?,
            fill: None,
        }),
        ShapeKind::Arrow => Some(ShapePaths {
            stroke: build_line_path(start, end)?,
            fill: build_arrowhead_path(start, end, width),
        }),
    }
}

/// Draw a shape onto `pixmap` with the given transform
pub fn draw_shape(
    pixmap: &mut Pixmap,
    shape: &Shape,
    color: ShapeColor,
    width: f32,
    transform: Transform,
) {
    let Some(paths) = shape_paths(shape, width) else {
        return;
    };
    let paint = solid_paint(color);
    pixmap.stroke_path(&paths.stroke, &paint, &round_stroke(width), transform, None);
    if let Some(fill) = &paths.fill {
        pixmap.fill_path(fill, &paint, FillRule::Winding, transform, None);
        // Outline the head too so its corners get the pen's round joins
        pixmap.stroke_path(fill, &paint, &round_stroke(width), transform, None);
    }
}

/// Rasterize a shape into a patch just large enough to hold it
pub fn shape_patch(shape: &Shape, color: ShapeColor, width: f32) -> Option<Patch> {
    if shape.is_degenerate() {
        return None;
    }
    let paths = shape_paths(shape, width)?;
    let mut bounds = paths.stroke.bounds();
    if let Some(fill) = &paths.fill {
        let fb = fill.bounds();
        bounds = tiny_skia::Rect::from_ltrb(
            bounds.left().min(fb.left()),
            bounds.top().min(fb.top()),
            bounds.right().max(fb.right()),
            bounds.bottom().max(fb.bottom()),
        )?;
    }

    // Half the stroke on each side plus a pixel for anti-aliasing
    let pad = width / 2.0 + 1.0;
    let left = (bounds.left() - pad).floor() as i32;
    let top = (bounds.top() - pad).floor() as i32;
    let right = (bounds.right() + pad).ceil() as i32;
    let bottom = (bounds.bottom() + pad).ceil() as i32;

    let mut pixmap = Pixmap::new((right - left) as u32, (bottom - top) as u32)?;
    let transform = Transform::from_translate(-left as f32, -top as f32);
    draw_shape(&mut pixmap, shape, color, width, transform);
    Some(Patch::new(Point::new(left, top), pixmap))
}

/// Rasterize one pen segment with rounded caps
pub fn segment_patch(from: Point, to: Point, color: ShapeColor, width: f32) -> Option<Patch> {
    shape_patch(&Shape::new(ShapeKind::Line, from, to), color, width)
}

/// Fill a pixmap from a coverage mask in a single color
pub fn coverage_to_pixmap(
    coverage: &[f32],
    width: u32,
    height: u32,
    color: ShapeColor,
) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(width, height)?;
    let [r, g, b, _] = color.to_rgba_u8();
    for (dst, &c) in pixmap.pixels_mut().iter_mut().zip(coverage) {
        let a = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        if a == 0 {
            continue;
        }
        let premul = |v: u8| ((v as u32 * a as u32 + 127) / 255) as u8;
        if let Some(px) = PremultipliedColorU8::from_rgba(premul(r), premul(g), premul(b), a) {
            *dst = px;
        }
    }
    Some(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha_at(patch: &Patch, x: i32, y: i32) -> u8 {
        let lx = (x - patch.origin.x) as u32;
        let ly = (y - patch.origin.y) as u32;
        patch.pixmap.pixel(lx, ly).map(|p| p.alpha()).unwrap_or(0)
    }

    #[test]
    fn test_rgba_pixmap_roundtrip_keeps_opaque_pixels() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let back = pixmap_to_rgba(&rgba_to_pixmap(&img).unwrap());
        assert_eq!(back, img);
    }

    #[test]
    fn test_rectangle_patch_strokes_edges_only() {
        let shape = Shape::new(ShapeKind::Rectangle, Point::new(10, 10), Point::new(50, 40));
        let patch = shape_patch(&shape, ShapeColor::BLACK, 4.0).unwrap();
        assert!(patch.bounds().contains(Point::new(8, 8)));
        assert_eq!(alpha_at(&patch, 10, 25), 255);
        assert_eq!(alpha_at(&patch, 30, 25), 0);
    }

    #[test]
    fn test_arrow_patch_includes_head() {
        let shape = Shape::new(ShapeKind::Arrow, Point::new(0, 50), Point::new(100, 50));
        let patch = shape_patch(&shape, ShapeColor::RED, 5.0).unwrap();
        // Inside the head triangle, off the shaft
        assert!(alpha_at(&patch, 94, 46) > 0);
        assert_eq!(alpha_at(&patch, 50, 40), 0);
    }

    #[test]
    fn test_degenerate_shape_has_no_patch() {
        let p = Point::new(4, 4);
        let dot = Shape::new(ShapeKind::Ellipse, p, p);
        assert!(shape_patch(&dot, ShapeColor::BLACK, 3.0).is_none());
        assert!(segment_patch(p, p, ShapeColor::BLACK, 3.0).is_none());
    }

    #[test]
    fn test_coverage_to_pixmap() {
        let pixmap = coverage_to_pixmap(&[0.0, 1.0], 2, 1, ShapeColor::RED).unwrap();
        assert_eq!(pixmap.pixel(0, 0).unwrap().alpha(), 0);
        let c = pixmap.pixel(1, 0).unwrap().demultiply();
        assert_eq!((c.red(), c.alpha()), (255, 255));
    }
}
