//! Display surface: owns the captured image, the annotation layer and every
//! interaction controller, and routes host input to them.
//!
//! The host window feeds pointer, wheel and key input plus toolbar events,
//! paints whatever [`Surface::paint`] returns when it receives
//! [`SurfaceEvent::RedrawRequested`], and drops the surface after
//! [`SurfaceEvent::Closed`].

use anyhow::Context;
use crossbeam_channel::Sender;
use image::RgbaImage;
use tiny_skia::{Pixmap, PixmapPaint, Transform};

use super::drawing::{DrawingMachine, scroll_notches};
use super::selection::SelectionEngine;
use super::text_overlay::{TextEditSession, TextOverlay};
use crate::canvas::{AnnotationLayer, History};
use crate::capture::CapturedImage;
use crate::config::{ConfigSource, JsonConfig, ShapeColor};
use crate::domain::{CursorShape, HitTarget, Point, Rect, Tool};
use crate::output::{
    ClipboardSink, NativeSaveDialog, SaveDialog, SystemClipboard, save_filters, save_image,
    unique_file_path,
};
use crate::render::geometry::selection::TOOLBAR_OFFSET;
use crate::render::image::{pixmap_to_rgba, rgba_to_pixmap};
use crate::render::{FrameInputs, GlyphText, TextRasterizer, compose};
use crate::session::{
    EditorEvent, InputEvent, Key, KeyAction, Modifiers, SurfaceEvent, handle_key_event,
};

/// Base name of saved screenshots
const SAVE_BASE_NAME: &str = "screenshot";

/// External collaborators used by the surface
pub struct Services {
    pub config: Box<dyn ConfigSource>,
    pub dialog: Box<dyn SaveDialog>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub text: Box<dyn TextRasterizer>,
}

impl Services {
    /// JSON config, native dialog, OS clipboard and the configured font
    pub fn system() -> anyhow::Result<Self> {
        let config = JsonConfig::default();
        let font_path = config.load_config().font_path;
        let text = GlyphText::load(font_path.as_deref()).context("loading annotation font")?;
        Ok(Self {
            config: Box::new(config),
            dialog: Box::new(NativeSaveDialog),
            clipboard: Box::new(SystemClipboard),
            text: Box::new(text),
        })
    }
}

pub struct Surface {
    image: CapturedImage,
    /// Premultiplied copy of `image` for composition
    base: Pixmap,
    layer: AnnotationLayer,
    history: History,
    selection: SelectionEngine,
    drawing: DrawingMachine,
    text_overlay: TextOverlay,
    tool: Tool,
    color: ShapeColor,
    pointer: Option<Point>,
    cursor: CursorShape,
    toolbar_visible: bool,
    services: Services,
    events: Sender<SurfaceEvent>,
    redraw_pending: bool,
    closed: bool,
}

impl Surface {
    pub fn new(
        image: CapturedImage,
        services: Services,
        events: Sender<SurfaceEvent>,
    ) -> anyhow::Result<Self> {
        let (width, height) = (image.width(), image.height());
        let base = rgba_to_pixmap(image.rgba())
            .with_context(|| format!("cannot display {width}x{height} image"))?;
        let layer = AnnotationLayer::new(image.width(), image.height())?;
        let config = services.config.load_config();

        let mut surface = Self {
            image,
            base,
            layer,
            history: History::new(),
            selection: SelectionEngine::new(),
            drawing: DrawingMachine::new(config.stroke_width),
            text_overlay: TextOverlay::new(config.font_size),
            tool: Tool::None,
            color: ShapeColor::default(),
            pointer: None,
            cursor: CursorShape::Arrow,
            toolbar_visible: false,
            services,
            events,
            redraw_pending: false,
            closed: false,
        };
        surface.request_redraw();
        Ok(surface)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn image(&self) -> &CapturedImage {
        &self.image
    }

    pub fn layer(&self) -> &AnnotationLayer {
        &self.layer
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    pub fn selection(&self) -> Rect {
        self.selection.rect()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn color(&self) -> ShapeColor {
        self.color
    }

    pub fn stroke_width(&self) -> u32 {
        self.drawing.stroke_width()
    }

    pub fn text_session(&self) -> Option<&TextEditSession> {
        self.text_overlay.session()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Pointer shape for the last known pointer position
    pub fn cursor(&self) -> CursorShape {
        self.cursor
    }

    /// Where the host should place the toolbar: just below-right of the
    /// selection's top-right corner
    pub fn toolbar_anchor(&self) -> Option<Point> {
        self.selection.is_valid().then(|| {
            let corner = self.selection.rect().top_right();
            corner.offset(TOOLBAR_OFFSET.0, TOOLBAR_OFFSET.1)
        })
    }

    /// True once a valid selection has been made
    pub fn toolbar_visible(&self) -> bool {
        self.toolbar_visible
    }

    // ------------------------------------------------------------------------
    // Host input
    // ------------------------------------------------------------------------

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerPressed(p) => self.pointer_down(p),
            InputEvent::PointerMoved(p) => self.pointer_move(p),
            InputEvent::PointerReleased(p) => self.pointer_up(p),
            InputEvent::Scrolled(delta) => self.scroll(delta),
            InputEvent::KeyPressed(key, modifiers) => self.key(&key, modifiers),
        }
    }

    pub fn handle_editor_event(&mut self, event: EditorEvent) {
        match event {
            EditorEvent::ToolChanged(tool) => self.set_tool(tool),
            EditorEvent::ColorChanged(color) => self.set_color(color),
            EditorEvent::SaveRequested => {
                self.save();
            }
            EditorEvent::CopyRequested => {
                self.copy();
            }
            EditorEvent::PublishRequested => self.publish(),
            EditorEvent::CloseRequested => self.close(),
        }
    }

    pub fn pointer_down(&mut self, point: Point) {
        if self.closed {
            return;
        }
        self.pointer = Some(point);
        let changed = match self.tool {
            Tool::None => {
                let hit = self.selection.press(point);
                self.cursor = match hit {
                    HitTarget::None => CursorShape::Crosshair,
                    _ => CursorShape::from(hit),
                };
                true
            }
            Tool::Text if self.text_overlay.is_open() => self.text_overlay.finalize(
                &mut self.layer,
                &mut self.history,
                self.services.text.as_ref(),
            ),
            Tool::Text => {
                self.text_overlay
                    .open(point, self.color, self.services.text.as_ref())
            }
            tool => self
                .drawing
                .pointer_down(tool, point, &self.layer, &mut self.history),
        };
        if changed {
            self.request_redraw();
        }
    }

    pub fn pointer_move(&mut self, point: Point) {
        if self.closed {
            return;
        }
        self.pointer = Some(point);
        if self.tool == Tool::None {
            if self.selection.is_dragging() {
                if self.selection.drag(point) {
                    self.request_redraw();
                }
            } else {
                self.cursor = CursorShape::from(self.selection.hit_test(point));
            }
            return;
        }
        self.cursor = CursorShape::Crosshair;
        self.drawing.pointer_move(point, self.color, &mut self.layer);
        // Brush indicator follows the pointer
        self.request_redraw();
    }

    pub fn pointer_up(&mut self, point: Point) {
        if self.closed {
            return;
        }
        self.pointer = Some(point);
        let changed = if self.tool == Tool::None {
            let was_dragging = self.selection.is_dragging();
            self.selection.release();
            if self.selection.is_valid() && !self.toolbar_visible {
                log::debug!("Selection ready, showing toolbar");
                self.toolbar_visible = true;
            }
            self.cursor = CursorShape::from(self.selection.hit_test(point));
            was_dragging
        } else {
            self.drawing
                .pointer_up(point, self.color, &mut self.layer, &mut self.history)
        };
        if changed {
            self.request_redraw();
        }
    }

    /// Wheel input: font size while editing text, stroke width otherwise
    pub fn scroll(&mut self, delta: i32) {
        if self.closed {
            return;
        }
        let notches = scroll_notches(delta);
        if notches == 0 {
            return;
        }
        let changed = if self.tool == Tool::Text && self.text_overlay.is_open() {
            self.text_overlay
                .adjust_font_size(notches, self.services.text.as_ref())
        } else if self.tool.uses_stroke_width() {
            self.drawing.adjust_stroke_width(notches)
        } else {
            false
        };
        if changed {
            self.request_redraw();
        }
    }

    pub fn key(&mut self, key: &Key, modifiers: Modifiers) {
        if self.closed {
            return;
        }
        let Some(action) = handle_key_event(key, modifiers, self.tool, self.text_overlay.is_open())
        else {
            return;
        };
        let text = self.services.text.as_ref();
        let changed = match action {
            KeyAction::Undo => return self.undo(),
            KeyAction::Copy => {
                self.copy();
                return;
            }
            KeyAction::Close => return self.close(),
            KeyAction::ResetTool => return self.reset_tool(),
            KeyAction::CommitText => {
                self.text_overlay
                    .finalize(&mut self.layer, &mut self.history, text)
            }
            KeyAction::InsertText(s) => self.text_overlay.insert_str(&s, text),
            KeyAction::Newline => self.text_overlay.insert_char('\n', text),
            KeyAction::Backspace => self.text_overlay.backspace(text),
        };
        if changed {
            self.request_redraw();
        }
    }

    // ------------------------------------------------------------------------
    // Editor events
    // ------------------------------------------------------------------------

    pub fn set_tool(&mut self, tool: Tool) {
        if self.closed || tool == self.tool {
            return;
        }
        // An open text session outlives the switch; it is still drawn and
        // waits for a Text click, Escape or close
        self.drawing.cancel();
        self.selection.release();
        log::debug!("Tool changed: {:?} -> {:?}", self.tool, tool);
        self.tool = tool;
        self.cursor = if tool == Tool::None {
            CursorShape::Arrow
        } else {
            CursorShape::Crosshair
        };
        self.request_redraw();
    }

    pub fn set_color(&mut self, color: ShapeColor) {
        if self.closed {
            return;
        }
        self.color = color;
        self.text_overlay.set_color(color);
        self.request_redraw();
    }

    /// Drop back to selection mode and tell the toolbar
    fn reset_tool(&mut self) {
        self.set_tool(Tool::None);
        self.send(SurfaceEvent::ToolsReset);
    }

    pub fn undo(&mut self) {
        if self.closed {
            return;
        }
        if self.history.undo(&mut self.layer) {
            self.request_redraw();
        }
    }

    // ------------------------------------------------------------------------
    // Commit operations
    // ------------------------------------------------------------------------

    /// Ask for a path and write the original capture there, then close
    ///
    /// Returns false if the dialog was cancelled or writing failed; the
    /// surface stays open in both cases.
    pub fn save(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let config = self.services.config.load_config();
        let default = unique_file_path(
            &config.default_save_folder,
            SAVE_BASE_NAME,
            &config.file_extension,
        );
        let filters = save_filters(&config.file_extension);
        let Some(path) = self.services.dialog.choose_save_path(&default, &filters) else {
            log::info!("Save cancelled");
            return false;
        };
        if let Err(err) = save_image(&path, self.image.rgba()) {
            log::error!("Failed to save screenshot: {err:#}");
            return false;
        }
        self.close();
        true
    }

    /// Put the annotated image, cropped to the selection, on the clipboard,
    /// then close
    pub fn copy(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let mut composite = self.composite();
        if self.selection.is_valid() {
            let Some(region) = self.selection.rect().intersect(self.image.bounds()) else {
                log::warn!(
                    "Selection {:?} lies outside the image, nothing to copy",
                    self.selection.rect()
                );
                return false;
            };
            composite = image::imageops::crop_imm(
                &composite,
                region.left as u32,
                region.top as u32,
                region.width() as u32,
                region.height() as u32,
            )
            .to_image();
        }
        if let Err(err) = self.services.clipboard.set_image(&composite) {
            log::error!("Failed to copy to clipboard: {err:#}");
            return false;
        }
        self.close();
        true
    }

    pub fn publish(&mut self) {
        log::info!("Publishing is not available");
    }

    /// Finalize any open text, drop history and notify the host once
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.text_overlay.finalize(
            &mut self.layer,
            &mut self.history,
            self.services.text.as_ref(),
        );
        self.drawing.cancel();
        self.history.clear();
        self.closed = true;
        log::info!("Surface closed");
        self.send(SurfaceEvent::Closed);
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Build the frame to display and clear the pending redraw
    pub fn paint(&mut self) -> Pixmap {
        self.redraw_pending = false;
        let selection = self
            .selection
            .is_valid()
            .then(|| (self.selection.rect(), self.selection.size_label()));
        let brush = if self.tool == Tool::None {
            None
        } else {
            self.pointer
        };
        compose(&FrameInputs {
            base: &self.base,
            layer: &self.layer,
            selection,
            preview: self.drawing.preview(),
            text_field: self.text_overlay.session(),
            brush,
            color: self.color,
            stroke_width: self.drawing.stroke_width() as f32,
            text: self.services.text.as_ref(),
        })
    }

    /// Captured image with the annotation layer blended on top
    fn composite(&self) -> RgbaImage {
        let mut pixmap = self.base.clone();
        pixmap.draw_pixmap(
            0,
            0,
            self.layer.pixmap().as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        pixmap_to_rgba(&pixmap)
    }

    /// At most one redraw is outstanding until the host paints
    fn request_redraw(&mut self) {
        if self.redraw_pending || self.closed {
            return;
        }
        self.redraw_pending = true;
        self.send(SurfaceEvent::RedrawRequested);
    }

    fn send(&self, event: SurfaceEvent) {
        if self.events.send(event).is_err() {
            log::debug!("Host stopped listening; dropped {event:?}");
        }
    }
}
