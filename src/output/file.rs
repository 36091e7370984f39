//! Writing screenshots to disk

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{DynamicImage, ImageFormat, RgbaImage};

/// `folder/base.ext`, or `folder/base_N.ext` with the smallest free N
pub fn unique_file_path(folder: &Path, base: &str, extension: &str) -> PathBuf {
    let candidate = folder.join(format!("{base}.{extension}"));
    if !candidate.exists() {
        return candidate;
    }
    (1u32..)
        .map(|n| folder.join(format!("{base}_{n}.{extension}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

/// Encode `image` in the format implied by the path's extension
pub fn save_image(path: &Path, image: &RgbaImage) -> anyhow::Result<()> {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" | "" => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_png(BufWriter::new(file), image)
                .with_context(|| format!("encoding PNG {}", path.display()))?;
        }
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            rgb.save_with_format(path, ImageFormat::Jpeg)
                .with_context(|| format!("encoding JPEG {}", path.display()))?;
        }
        _ => {
            image
                .save(path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }
    log::info!("Saved screenshot to {}", path.display());
    Ok(())
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_file_path_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        let first = unique_file_path(dir.path(), "screenshot", "png");
        assert_eq!(first, dir.path().join("screenshot.png"));

        std::fs::write(&first, b"x").unwrap();
        std::fs::write(dir.path().join("screenshot_1.png"), b"x").unwrap();
        assert_eq!(
            unique_file_path(dir.path(), "screenshot", "png"),
            dir.path().join("screenshot_2.png")
        );
    }

    #[test]
    fn test_save_png_and_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let img = RgbaImage::from_pixel(4, 3, image::Rgba([200, 10, 10, 255]));

        let png_path = dir.path().join("a.png");
        save_image(&png_path, &img).unwrap();
        assert_eq!(image::open(&png_path).unwrap().to_rgba8(), img);

        let jpg_path = dir.path().join("a.jpg");
        save_image(&jpg_path, &img).unwrap();
        assert_eq!(image::open(&jpg_path).unwrap().width(), 4);
    }
}
