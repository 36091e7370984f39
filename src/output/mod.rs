//! Output collaborators: clipboard, save dialog and image files

pub mod clipboard;
pub mod dialog;
pub mod file;

pub use clipboard::{ClipboardSink, SystemClipboard};
pub use dialog::{FileFilter, NativeSaveDialog, SaveDialog, save_filters};
pub use file::{save_image, unique_file_path};
