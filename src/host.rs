//! Contracts for the collaborators a drawing surface calls out to: file
//! pickers, modal prompts, and the multi-document host.
//!
//! Every call is modal from the surface's point of view. The surface abandons
//! any gesture in progress before it calls into one of these traits.

use std::path::PathBuf;

use egui::Color32;
use image::RgbImage;

/// A named group of file extensions offered by a file picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

/// The image formats a surface can be saved as or loaded from
pub const IMAGE_FILTERS: &[FileFilter] = &[
    FileFilter { name: "PNG files", extensions: &["png"] },
    FileFilter { name: "JPEG files", extensions: &["jpg", "jpeg"] },
    FileFilter { name: "BMP files", extensions: &["bmp"] },
];

pub trait FileDialogs {
    /// `None` when the user cancels
    fn ask_save_path(&mut self, default_ext: &str, filters: &[FileFilter], suggested_name: &str) -> Option<PathBuf>;

    /// `None` when the user cancels
    fn ask_open_path(&mut self, filters: &[FileFilter]) -> Option<PathBuf>;
}

/// Answer to "save changes before closing?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    Yes,
    No,
    Cancel,
}

pub trait Prompts {
    fn ask_color(&mut self) -> Option<Color32>;

    fn ask_text(&mut self, prompt: &str) -> Option<String>;

    fn confirm_save_before_close(&mut self) -> CloseChoice;

    /// Non-fatal success notice
    fn notify_info(&mut self, title: &str, message: &str);

    /// Non-fatal failure notice
    fn notify_error(&mut self, title: &str, message: &str);
}

/// The multi-document shell that owns windows and tabs
pub trait HostContainer {
    fn create_window_from_image(&mut self, bitmap: RgbImage);

    fn dock_image_as_tab(&mut self, bitmap: RgbImage);
}
