//! System clipboard access

use std::borrow::Cow;

use anyhow::Context;
use image::RgbaImage;

/// Receives the annotated image on copy
pub trait ClipboardSink {
    fn set_image(&mut self, image: &RgbaImage) -> anyhow::Result<()>;
}

/// OS clipboard via arboard
///
/// A fresh handle is opened per copy; on Linux the contents stay available
/// only while some process owns the selection.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_image(&mut self, image: &RgbaImage) -> anyhow::Result<()> {
        let mut clipboard = arboard::Clipboard::new().context("opening clipboard")?;
        // arboard wants straight RGBA rows
        let data = arboard::ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw()),
        };
        clipboard
            .set_image(data)
            .context("placing image on clipboard")?;
        log::info!(
            "Image copied to clipboard ({}x{})",
            image.width(),
            image.height()
        );
        Ok(())
    }
}
