//! Text measurement and rasterization
//!
//! The surface only talks to [`TextRasterizer`]; [`GlyphText`] implements it
//! with `ab_glyph` outlines.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use anyhow::Context;

use super::image::coverage_to_pixmap;
use crate::canvas::Patch;
use crate::config::ShapeColor;
use crate::domain::{Point, Rect};

/// Vertical metrics of one line of text at a given size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of the line to the baseline
    pub ascent: f32,
    /// Distance between consecutive baselines
    pub line_height: f32,
}

/// Font metrics and line rasterization used by the text overlay
pub trait TextRasterizer {
    fn metrics(&self, size: f32) -> LineMetrics;

    /// Horizontal advance of `text` laid out on one line
    fn advance(&self, text: &str, size: f32) -> f32;

    /// Rasterize the part of one line that falls inside `clip`, with its
    /// baseline starting at `baseline`
    ///
    /// Returns None when no ink is visible.
    fn rasterize_line(
        &self,
        text: &str,
        size: f32,
        color: ShapeColor,
        baseline: (f32, f32),
        clip: Rect,
    ) -> Option<Patch>;
}

/// Common font locations tried when no font is configured
pub const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Outline-font text rendering
#[derive(Clone)]
pub struct GlyphText {
    font: FontArc,
}

impl GlyphText {
    pub fn from_bytes(data: Vec<u8>) -> anyhow::Result<Self> {
        let font = FontArc::try_from_vec(data).context("invalid font data")?;
        Ok(Self { font })
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data =
            std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        Self::from_bytes(data).with_context(|| format!("loading font {}", path.display()))
    }

    /// Load the configured font, or the first usable system font
    pub fn load(configured: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = configured {
            return Self::from_file(path);
        }
        for candidate in FONT_CANDIDATES.iter().map(PathBuf::from) {
            if !candidate.exists() {
                continue;
            }
            match Self::from_file(&candidate) {
                Ok(text) => {
                    log::debug!("Using font {}", candidate.display());
                    return Ok(text);
                }
                Err(err) => log::warn!("Skipping font: {err:#}"),
            }
        }
        anyhow::bail!("no usable font found; set font_path in the config file")
    }
}

impl TextRasterizer for GlyphText {
    fn metrics(&self, size: f32) -> LineMetrics {
        let scaled = self.font.as_scaled(PxScale::from(size));
        LineMetrics {
            ascent: scaled.ascent(),
            line_height: scaled.height() + scaled.line_gap(),
        }
    }

    fn advance(&self, text: &str, size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev_id) = prev {
                width += scaled.kern(prev_id, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn rasterize_line(
        &self,
        text: &str,
        size: f32,
        color: ShapeColor,
        baseline: (f32, f32),
        clip: Rect,
    ) -> Option<Patch> {
        let scale = PxScale::from(size);
        let scaled = self.font.as_scaled(scale);

        let mut caret = baseline.0;
        let mut prev = None;
        let mut outlines = Vec::new();
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev_id) = prev {
                caret += scaled.kern(prev_id, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline.1));
            caret += scaled.h_advance(id);
            prev = Some(id);
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            // Glyphs entirely outside the clip are never drawn
            if glyph_rect(&outlined).intersect(clip).is_some() {
                outlines.push(outlined);
            }
        }

        // Union of visible glyph pixel boxes, cut down to the clip
        let mut ink = outlines.iter().map(glyph_rect);
        let first = ink.next()?;
        let area = ink
            .fold(first, |acc, r| {
                Rect::new(
                    acc.left.min(r.left),
                    acc.top.min(r.top),
                    acc.right.max(r.right),
                    acc.bottom.max(r.bottom),
                )
            })
            .intersect(clip)?;

        let width = area.width() as u32;
        let height = area.height() as u32;
        let len = (width as usize).checked_mul(height as usize)?;
        let mut coverage = vec![0.0f32; len];
        for outlined in &outlines {
            let b = outlined.px_bounds();
            let dx = b.min.x as i32 - area.left;
            let dy = b.min.y as i32 - area.top;
            outlined.draw(|x, y, c| {
                let px = dx + x as i32;
                let py = dy + y as i32;
                if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                    return;
                }
                let idx = py as usize * width as usize + px as usize;
                coverage[idx] = coverage[idx].max(c);
            });
        }

        let pixmap = coverage_to_pixmap(&coverage, width, height, color)?;
        Some(Patch::new(area.top_left(), pixmap))
    }
}

/// Whole-pixel box covered by an outlined glyph
fn glyph_rect(outlined: &ab_glyph::OutlinedGlyph) -> Rect {
    let b = outlined.px_bounds();
    Rect::new(
        b.min.x.floor() as i32,
        b.min.y.floor() as i32,
        b.max.x.ceil() as i32,
        b.max.y.ceil() as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_font() -> Option<GlyphText> {
        GlyphText::load(None).ok()
    }

    fn wide_clip() -> Rect {
        Rect::new(0, 0, 400, 400)
    }

    #[test]
    fn test_metrics_and_advance() {
        let Some(font) = system_font() else {
            return;
        };
        let metrics = font.metrics(16.0);
        assert!(metrics.ascent > 0.0);
        assert!(metrics.line_height >= metrics.ascent);

        let hi = font.advance("Hi", 16.0);
        assert!(hi > 0.0);
        assert!(font.advance("Hi there", 16.0) > hi);
        assert!(font.advance("Hi", 32.0) > hi);
        assert_eq!(font.advance("", 16.0), 0.0);
    }

    #[test]
    fn test_line_sits_on_baseline() {
        let Some(font) = system_font() else {
            return;
        };
        let ascent = font.metrics(16.0).ascent;
        let baseline = (50.0, 50.0 + ascent);
        let patch = font
            .rasterize_line("Hi", 16.0, ShapeColor::BLACK, baseline, wide_clip())
            .unwrap();
        let ink = patch.bounds();

        // No descenders: ink ends at the baseline and starts below the line top
        assert!((ink.bottom - baseline.1.round() as i32).abs() <= 1, "{ink:?}");
        assert!(ink.top >= 49, "{ink:?}");
        assert!(ink.left >= 49 && ink.left <= 53, "{ink:?}");
        assert!(ink.width() as f32 <= font.advance("Hi", 16.0) + 2.0);
        assert!(patch.pixmap.pixels().iter().any(|p| p.alpha() == 255));
    }

    #[test]
    fn test_blank_line_has_no_patch() {
        let Some(font) = system_font() else {
            return;
        };
        assert!(
            font.rasterize_line("   ", 16.0, ShapeColor::BLACK, (10.0, 30.0), wide_clip())
                .is_none()
        );
        assert!(
            font.rasterize_line("", 16.0, ShapeColor::BLACK, (10.0, 30.0), wide_clip())
                .is_none()
        );
    }

    #[test]
    fn test_huge_text_is_clipped() {
        let Some(font) = system_font() else {
            return;
        };
        let clip = Rect::new(0, 0, 200, 100);
        let patch = font
            .rasterize_line("WWWW", 4_000.0, ShapeColor::RED, (0.0, 2_800.0), clip)
            .unwrap();
        assert_eq!(patch.bounds().intersect(clip), Some(patch.bounds()));

        // Nothing of the line reaches the clip
        assert!(
            font.rasterize_line("W", 16.0, ShapeColor::RED, (500.0, 500.0), clip)
                .is_none()
        );
    }
}
