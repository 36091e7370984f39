//! Frame composition
//!
//! Builds the displayed frame from the current surface state. Composition only
//! reads its inputs; all drawing happens on a copy of the base image.

use tiny_skia::{
    Color, PathBuilder, Pixmap, PixmapPaint, Rect as SkRect, Stroke, StrokeDash, Transform,
};

use super::geometry::selection::{DASH, HANDLE_MARK_SIZE, LABEL_FONT_SIZE, OUTLINE_WIDTH};
use super::geometry::BRUSH_OUTLINE_WIDTH;
use super::image::{build_rect_path, draw_shape, solid_paint};
use super::text::TextRasterizer;
use crate::canvas::{AnnotationLayer, Patch};
use crate::config::ShapeColor;
use crate::domain::{Point, Rect, Shape, handle_set};
use crate::widget::selection::SizeLabel;
use crate::widget::text_overlay::TextEditSession;

const SELECTION_COLOR: ShapeColor = ShapeColor::RED;
const LABEL_TEXT_COLOR: ShapeColor = ShapeColor {
    r: 1.0,
    g: 1.0,
    b: 1.0,
};
const LABEL_PADDING: f32 = 4.0;
const TEXT_FRAME_COLOR: ShapeColor = ShapeColor {
    r: 0.5,
    g: 0.5,
    b: 0.5,
};

/// Everything a frame is built from
pub struct FrameInputs<'a> {
    pub base: &'a Pixmap,
    pub layer: &'a AnnotationLayer,
    /// Only set when the selection is valid
    pub selection: Option<(Rect, Option<&'a SizeLabel>)>,
    pub preview: Option<Shape>,
    pub text_field: Option<&'a TextEditSession>,
    /// Pointer position when a tool is active
    pub brush: Option<Point>,
    pub color: ShapeColor,
    pub stroke_width: f32,
    pub text: &'a dyn TextRasterizer,
}

/// Composite one frame
pub fn compose(inputs: &FrameInputs) -> Pixmap {
    let mut frame = inputs.base.clone();

    frame.draw_pixmap(
        0,
        0,
        inputs.layer.pixmap().as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );

    if let Some((rect, label)) = inputs.selection {
        draw_selection(&mut frame, rect);
        if let Some(label) = label {
            draw_size_label(&mut frame, label, inputs.text);
        }
    }

    if let Some(shape) = &inputs.preview {
        draw_shape(
            &mut frame,
            shape,
            inputs.color,
            inputs.stroke_width,
            Transform::identity(),
        );
    }

    if let Some(session) = inputs.text_field {
        draw_text_field(&mut frame, session, inputs.text);
    }

    if let Some(pointer) = inputs.brush {
        draw_brush(&mut frame, pointer, inputs.stroke_width, inputs.color);
    }

    frame
}

fn blit(frame: &mut Pixmap, patch: &Patch) {
    frame.draw_pixmap(
        patch.origin.x,
        patch.origin.y,
        patch.pixmap.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

fn frame_bounds(frame: &Pixmap) -> Rect {
    Rect::new(0, 0, frame.width() as i32, frame.height() as i32)
}

/// Dashed outline plus the eight handle marks
fn draw_selection(frame: &mut Pixmap, rect: Rect) {
    let paint = solid_paint(SELECTION_COLOR);
    if let Some(path) = build_rect_path(
        rect.left as f32,
        rect.top as f32,
        rect.right as f32,
        rect.bottom as f32,
    ) {
        let stroke = Stroke {
            width: OUTLINE_WIDTH,
            dash: StrokeDash::new(DASH.to_vec(), 0.0),
            ..Default::default()
        };
        frame.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    let half = HANDLE_MARK_SIZE / 2.0;
    for (_, p) in handle_set(&rect) {
        if let Some(mark) = SkRect::from_xywh(
            p.x as f32 - half,
            p.y as f32 - half,
            HANDLE_MARK_SIZE,
            HANDLE_MARK_SIZE,
        ) {
            frame.fill_rect(mark, &paint, Transform::identity(), None);
        }
    }
}

/// "WxH" on a dark box whose top-left is the label position
fn draw_size_label(frame: &mut Pixmap, label: &SizeLabel, text: &dyn TextRasterizer) {
    let metrics = text.metrics(LABEL_FONT_SIZE);
    let width = text.advance(&label.text, LABEL_FONT_SIZE) + LABEL_PADDING * 2.0;
    let height = metrics.line_height + LABEL_PADDING;
    let x = label.position.x as f32;
    let y = label.position.y as f32;

    if let Some(backing) = SkRect::from_xywh(x, y, width, height) {
        let mut paint = solid_paint(ShapeColor::BLACK);
        paint.set_color(Color::from_rgba8(0, 0, 0, 180));
        frame.fill_rect(backing, &paint, Transform::identity(), None);
    }

    let baseline = (x + LABEL_PADDING, y + LABEL_PADDING / 2.0 + metrics.ascent);
    let clip = frame_bounds(frame);
    if let Some(patch) =
        text.rasterize_line(&label.text, LABEL_FONT_SIZE, LABEL_TEXT_COLOR, baseline, clip)
    {
        blit(frame, &patch);
    }
}

/// In-progress text and a thin frame around the field
fn draw_text_field(frame: &mut Pixmap, session: &TextEditSession, text: &dyn TextRasterizer) {
    let size = session.font_size() as f32;
    let metrics = text.metrics(size);
    let anchor = session.anchor();
    let clip = frame_bounds(frame);
    let mut baseline = anchor.y as f32 + metrics.ascent;
    for line in session.text().split('\n') {
        let origin = (anchor.x as f32, baseline);
        if let Some(patch) = text.rasterize_line(line, size, session.color(), origin, clip) {
            blit(frame, &patch);
        }
        baseline += metrics.line_height;
    }

    let (width, height) = session.size();
    let (left, top) = (anchor.x as f32, anchor.y as f32);
    if let Some(path) = build_rect_path(left, top, left + width, top + height) {
        let stroke = Stroke {
            width: 1.0,
            ..Default::default()
        };
        frame.stroke_path(
            &path,
            &solid_paint(TEXT_FRAME_COLOR),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}

/// Circle showing the stroke width under the pointer
fn draw_brush(frame: &mut Pixmap, pointer: Point, radius: f32, color: ShapeColor) {
    let Some(circle) = PathBuilder::from_circle(pointer.x as f32, pointer.y as f32, radius) else {
        return;
    };
    let stroke = Stroke {
        width: BRUSH_OUTLINE_WIDTH,
        ..Default::default()
    };
    frame.stroke_path(
        &circle,
        &solid_paint(color),
        &stroke,
        Transform::identity(),
        None,
    );
}
