//! Text overlay controller
//!
//! At most one editable text session exists at a time. It is opened by a
//! click with the Text tool and finalized (rasterized into the annotation
//! layer) by a second click, Escape, or the surface closing.

use crate::canvas::{AnnotationLayer, History};
use crate::config::ShapeColor;
use crate::domain::Point;
use crate::render::geometry::TEXT_FIELD_PADDING;
use crate::render::text::TextRasterizer;

pub const DEFAULT_FONT_SIZE: u32 = 16;

/// The editable text field shown while a session is open
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditSession {
    anchor: Point,
    text: String,
    font_size: u32,
    color: ShapeColor,
    width: f32,
    height: f32,
}

impl TextEditSession {
    fn new(anchor: Point, font_size: u32, color: ShapeColor) -> Self {
        Self {
            anchor,
            text: String::new(),
            font_size,
            color,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Top-left corner of the field
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn color(&self) -> ShapeColor {
        self.color
    }

    /// Field size fitted to the content
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Recompute the field size from font metrics
    fn fit(&mut self, text: &dyn TextRasterizer) {
        let size = self.font_size as f32;
        let flattened = self.text.replace('\n', " ");
        self.width = text.advance(&flattened, size) + TEXT_FIELD_PADDING;
        self.height = self.text.split('\n').count() as f32 * text.metrics(size).line_height;
    }

    /// Write each line into the layer, baselines one line height apart
    fn rasterize(&self, layer: &mut AnnotationLayer, text: &dyn TextRasterizer) {
        let size = self.font_size as f32;
        let metrics = text.metrics(size);
        let x = self.anchor.x as f32;
        let clip = layer.bounds();
        let mut baseline = self.anchor.y as f32 + metrics.ascent;
        for line in self.text.split('\n') {
            let origin = (x, baseline);
            if let Some(patch) = text.rasterize_line(line, size, self.color, origin, clip) {
                layer.commit(&patch);
            }
            baseline += metrics.line_height;
        }
    }
}

#[derive(Debug)]
pub struct TextOverlay {
    session: Option<TextEditSession>,
    font_size: u32,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_SIZE)
    }
}

impl TextOverlay {
    pub fn new(font_size: u32) -> Self {
        Self {
            session: None,
            font_size: font_size.max(1),
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&TextEditSession> {
        self.session.as_ref()
    }

    /// Size used for the next session
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Open an empty session at `anchor`; false if one is already open
    pub fn open(&mut self, anchor: Point, color: ShapeColor, text: &dyn TextRasterizer) -> bool {
        if self.session.is_some() {
            return false;
        }
        let mut session = TextEditSession::new(anchor, self.font_size, color);
        session.fit(text);
        log::debug!("Text session opened at {anchor:?}");
        self.session = Some(session);
        true
    }

    /// Apply an edit to the open session and refit the field
    fn edit(&mut self, text: &dyn TextRasterizer, f: impl FnOnce(&mut String) -> bool) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !f(&mut session.text) {
            return false;
        }
        session.fit(text);
        true
    }

    pub fn insert_char(&mut self, ch: char, text: &dyn TextRasterizer) -> bool {
        self.edit(text, |s| {
            s.push(ch);
            true
        })
    }

    pub fn insert_str(&mut self, input: &str, text: &dyn TextRasterizer) -> bool {
        self.edit(text, |s| {
            s.push_str(input);
            !input.is_empty()
        })
    }

    pub fn backspace(&mut self, text: &dyn TextRasterizer) -> bool {
        self.edit(text, |s| s.pop().is_some())
    }

    pub fn set_color(&mut self, color: ShapeColor) {
        if let Some(session) = self.session.as_mut() {
            session.color = color;
        }
    }

    /// Change the open session's font size by wheel notches
    ///
    /// Sizes that would drop to zero or below are ignored.
    pub fn adjust_font_size(&mut self, notches: i32, text: &dyn TextRasterizer) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let size = session.font_size as i32 + notches;
        if size <= 0 || notches == 0 {
            return false;
        }
        session.font_size = size as u32;
        self.font_size = size as u32;
        session.fit(text);
        true
    }

    /// Rasterize and destroy the open session
    ///
    /// Idempotent: returns false when no session is open. An empty session is
    /// destroyed without touching the layer or the history.
    pub fn finalize(
        &mut self,
        layer: &mut AnnotationLayer,
        history: &mut History,
        text: &dyn TextRasterizer,
    ) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        if session.text.trim().is_empty() {
            log::debug!("Discarding empty text session");
            return true;
        }
        history.push(layer);
        session.rasterize(layer, text);
        log::debug!(
            "Text committed at {:?} ({} lines)",
            session.anchor,
            session.text.split('\n').count()
        );
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::canvas::Patch;
    use crate::domain::Rect;
    use crate::render::image::coverage_to_pixmap;
    use crate::render::text::LineMetrics;

    /// Fixed-metric font: every glyph is a solid block half as wide as the size
    #[derive(Default, Clone)]
    pub struct BlockFont {
        pub calls: Rc<RefCell<Vec<(String, f32, (f32, f32))>>>,
    }

    impl TextRasterizer for BlockFont {
        fn metrics(&self, size: f32) -> LineMetrics {
            LineMetrics {
                ascent: size * 0.75,
                line_height: size * 1.25,
            }
        }

        fn advance(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }

        fn rasterize_line(
            &self,
            text: &str,
            size: f32,
            color: ShapeColor,
            baseline: (f32, f32),
            clip: Rect,
        ) -> Option<Patch> {
            self.calls
                .borrow_mut()
                .push((text.to_string(), size, baseline));
            let top = (baseline.1 - size * 0.75) as i32;
            let ink = Rect::new(
                baseline.0 as i32,
                top,
                (baseline.0 + self.advance(text, size)) as i32,
                baseline.1 as i32,
            )
            .intersect(clip)?;
            let (width, height) = (ink.width() as u32, ink.height() as u32);
            let pixmap = coverage_to_pixmap(
                &vec![1.0; (width * height) as usize],
                width,
                height,
                color,
            )?;
            Some(Patch::new(ink.top_left(), pixmap))
        }
    }

    fn setup() -> (TextOverlay, AnnotationLayer, History, BlockFont) {
        (
            TextOverlay::new(16),
            AnnotationLayer::new(200, 200).unwrap(),
            History::new(),
            BlockFont::default(),
        )
    }

    #[test]
    fn test_field_fits_content() {
        let (mut overlay, _, _, font) = setup();
        assert!(overlay.open(Point::new(50, 50), ShapeColor::BLACK, &font));
        assert_eq!(overlay.session().unwrap().size(), (10.0, 20.0));

        overlay.insert_str("Hi", &font);
        assert_eq!(overlay.session().unwrap().size(), (26.0, 20.0));

        overlay.insert_char('\n', &font);
        overlay.insert_char('x', &font);
        // "Hi x" on one line for width, two lines high
        assert_eq!(overlay.session().unwrap().size(), (42.0, 40.0));

        overlay.backspace(&font);
        overlay.backspace(&font);
        assert_eq!(overlay.session().unwrap().text(), "Hi");
    }

    #[test]
    fn test_only_one_session() {
        let (mut overlay, _, _, font) = setup();
        assert!(overlay.open(Point::new(1, 1), ShapeColor::BLACK, &font));
        assert!(!overlay.open(Point::new(9, 9), ShapeColor::BLACK, &font));
        assert_eq!(overlay.session().unwrap().anchor(), Point::new(1, 1));
    }

    #[test]
    fn test_finalize_rasterizes_each_line() {
        let (mut overlay, mut layer, mut history, font) = setup();
        overlay.open(Point::new(50, 50), ShapeColor::RED, &font);
        overlay.insert_str("Hi\nyo", &font);

        assert!(overlay.finalize(&mut layer, &mut history, &font));
        assert!(!overlay.is_open());
        assert_eq!(history.len(), 1);

        let calls = font.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("Hi".to_string(), 16.0, (50.0, 62.0)));
        assert_eq!(calls[1], ("yo".to_string(), 16.0, (50.0, 82.0)));
        assert_eq!(layer.pixel(55, 55), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let (mut overlay, mut layer, mut history, font) = setup();
        assert!(!overlay.finalize(&mut layer, &mut history, &font));
        overlay.open(Point::new(5, 5), ShapeColor::BLACK, &font);
        overlay.insert_char('a', &font);
        assert!(overlay.finalize(&mut layer, &mut history, &font));
        assert!(!overlay.finalize(&mut layer, &mut history, &font));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_empty_session_leaves_layer_alone() {
        let (mut overlay, mut layer, mut history, font) = setup();
        overlay.open(Point::new(5, 5), ShapeColor::BLACK, &font);
        assert!(overlay.finalize(&mut layer, &mut history, &font));
        assert!(history.is_empty());
        assert!(layer.is_blank());
    }

    #[test]
    fn test_oversized_text_stays_inside_layer() {
        let (mut overlay, mut layer, mut history, font) = setup();
        overlay.open(Point::new(50, 50), ShapeColor::BLACK, &font);
        overlay.insert_str("WWWWWWWWWWWWWWWWWWWW", &font);
        assert!(overlay.adjust_font_size(20_000, &font));

        assert!(overlay.finalize(&mut layer, &mut history, &font));
        assert_eq!(layer.pixel(199, 199), Some([0, 0, 0, 255]));
        assert_eq!(layer.pixel(49, 49), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_font_size_scroll() {
        let (mut overlay, _, _, font) = setup();
        assert!(!overlay.adjust_font_size(1, &font));
        overlay.open(Point::new(5, 5), ShapeColor::BLACK, &font);
        assert!(overlay.adjust_font_size(4, &font));
        assert_eq!(overlay.session().unwrap().font_size(), 20);
        assert!(!overlay.adjust_font_size(-20, &font));
        assert_eq!(overlay.font_size(), 20);
    }
}
