//! Save-path selection

use std::path::{Path, PathBuf};

/// A named extension filter offered by the save dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

pub const PNG_FILTER: FileFilter = FileFilter {
    name: "PNG Image",
    extensions: &["png"],
};

pub const JPEG_FILTER: FileFilter = FileFilter {
    name: "JPEG Image",
    extensions: &["jpg", "jpeg"],
};

/// Filters for the configured extension; both formats when it is neither
pub fn save_filters(extension: &str) -> Vec<FileFilter> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => vec![PNG_FILTER],
        "jpg" | "jpeg" => vec![JPEG_FILTER],
        _ => vec![PNG_FILTER, JPEG_FILTER],
    }
}

/// Blocking "choose save path" interaction
pub trait SaveDialog {
    /// Returns None when the user cancels
    fn choose_save_path(&mut self, default: &Path, filters: &[FileFilter]) -> Option<PathBuf>;
}

/// Native file dialog via rfd
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeSaveDialog;

impl SaveDialog for NativeSaveDialog {
    fn choose_save_path(&mut self, default: &Path, filters: &[FileFilter]) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_title("Save As");
        if let Some(dir) = default.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = default.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        for filter in filters {
            dialog = dialog.add_filter(filter.name, filter.extensions);
        }
        dialog.save_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_follow_extension() {
        assert_eq!(save_filters("png"), vec![PNG_FILTER]);
        assert_eq!(save_filters("JPG"), vec![JPEG_FILTER]);
        assert_eq!(save_filters("jpeg"), vec![JPEG_FILTER]);
        assert_eq!(save_filters("bmp"), vec![PNG_FILTER, JPEG_FILTER]);
    }
}
