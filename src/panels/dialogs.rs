//! egui stand-ins for the modal collaborators a surface calls out to.
//!
//! egui has no blocking dialogs, so the answers are prepared in the tools
//! panel (path and text entries, colour buttons, the close confirmation
//! window) before the surface operation that asks for them runs.

use std::path::PathBuf;

use egui::Color32;
use image::RgbImage;
use log::{info, warn};

use crate::host::{CloseChoice, FileDialogs, FileFilter, HostContainer, Prompts};

/// File picker backed by the path entry of the tools panel
#[derive(Debug, Default)]
pub struct PathEntry {
    pub entry: String,
}

impl FileDialogs for PathEntry {
    fn ask_save_path(&mut self, default_ext: &str, _filters: &[FileFilter], suggested_name: &str) -> Option<PathBuf> {
        let entry = self.entry.trim();
        let mut path = if entry.is_empty() {
            PathBuf::from(suggested_name)
        } else {
            PathBuf::from(entry)
        };
        if path.extension().is_none() {
            path.set_extension(default_ext.trim_start_matches('.'));
        }
        Some(path)
    }

    fn ask_open_path(&mut self, _filters: &[FileFilter]) -> Option<PathBuf> {
        let entry = self.entry.trim();
        if entry.is_empty() {
            None
        } else {
            Some(PathBuf::from(entry))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

/// Prompt answers staged by the panels, plus the queue of pending notices
#[derive(Debug, Default)]
pub struct PanelPrompts {
    pub text_entry: String,
    pub picked_color: Option<Color32>,
    pub close_choice: Option<CloseChoice>,
    notices: Vec<Notice>,
}

impl PanelPrompts {
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// One window per pending notice; OK dismisses it
    pub fn show_notices(&mut self, ctx: &egui::Context) {
        let mut dismissed = None;
        for (index, notice) in self.notices.iter().enumerate() {
            egui::Window::new(&notice.title)
                .id(egui::Id::new(("notice", index)))
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    if notice.is_error {
                        ui.colored_label(Color32::from_rgb(200, 40, 40), &notice.message);
                    } else {
                        ui.label(&notice.message);
                    }
                    if ui.button("OK").clicked() {
                        dismissed = Some(index);
                    }
                });
        }
        if let Some(index) = dismissed {
            self.notices.remove(index);
        }
    }
}

impl Prompts for PanelPrompts {
    fn ask_color(&mut self) -> Option<Color32> {
        self.picked_color.take()
    }

    fn ask_text(&mut self, _prompt: &str) -> Option<String> {
        if self.text_entry.is_empty() {
            None
        } else {
            Some(self.text_entry.clone())
        }
    }

    /// Nothing staged means the confirmation was dismissed
    fn confirm_save_before_close(&mut self) -> CloseChoice {
        self.close_choice.take().unwrap_or(CloseChoice::Cancel)
    }

    fn notify_info(&mut self, title: &str, message: &str) {
        info!("{}: {}", title, message);
        self.notices.push(Notice {
            title: title.to_owned(),
            message: message.to_owned(),
            is_error: false,
        });
    }

    fn notify_error(&mut self, title: &str, message: &str) {
        warn!("{}: {}", title, message);
        self.notices.push(Notice {
            title: title.to_owned(),
            message: message.to_owned(),
            is_error: true,
        });
    }
}

/// Bitmaps handed over by dock/undock, collected until the app opens them
#[derive(Debug, Default)]
pub struct Handoff {
    pub tabs: Vec<RgbImage>,
    pub windows: Vec<RgbImage>,
}

impl Handoff {
    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty() && self.windows.is_empty()
    }
}

impl HostContainer for Handoff {
    fn create_window_from_image(&mut self, bitmap: RgbImage) {
        self.windows.push(bitmap);
    }

    fn dock_image_as_tab(&mut self, bitmap: RgbImage) {
        self.tabs.push(bitmap);
    }
}

/// Yes/No/Cancel window for closing a surface with unsaved marks
pub fn confirm_close_window(ctx: &egui::Context, title: &str) -> Option<CloseChoice> {
    let mut choice = None;
    egui::Window::new("Save changes?")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("{} has unsaved changes. Save before closing?", title));
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    choice = Some(CloseChoice::Yes);
                }
                if ui.button("No").clicked() {
                    choice = Some(CloseChoice::No);
                }
                if ui.button("Cancel").clicked() {
                    choice = Some(CloseChoice::Cancel);
                }
            });
        });
    choice
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::IMAGE_FILTERS;

    #[test]
    fn test_save_path_defaults() {
        let mut files = PathEntry::default();
        let path = files.ask_save_path(".png", IMAGE_FILTERS, "paint_20240101_000000.png");
        assert_eq!(path, Some(PathBuf::from("paint_20240101_000000.png")));

        files.entry = "  out/drawing ".to_owned();
        let path = files.ask_save_path(".png", IMAGE_FILTERS, "ignored.png");
        assert_eq!(path, Some(PathBuf::from("out/drawing.png")));

        files.entry = "photo.jpg".to_owned();
        assert_eq!(
            files.ask_save_path(".png", IMAGE_FILTERS, "ignored.png"),
            Some(PathBuf::from("photo.jpg"))
        );
    }

    #[test]
    fn test_open_needs_a_path() {
        let mut files = PathEntry::default();
        assert_eq!(files.ask_open_path(IMAGE_FILTERS), None);
        files.entry = "in.bmp".to_owned();
        assert_eq!(files.ask_open_path(IMAGE_FILTERS), Some(PathBuf::from("in.bmp")));
    }

    #[test]
    fn test_staged_answers_are_used_once() {
        let mut prompts = PanelPrompts::default();
        assert_eq!(prompts.ask_text("Enter text"), None);
        prompts.text_entry = "label".to_owned();
        assert_eq!(prompts.ask_text("Enter text"), Some("label".to_owned()));

        prompts.picked_color = Some(Color32::RED);
        assert_eq!(prompts.ask_color(), Some(Color32::RED));
        assert_eq!(prompts.ask_color(), None);

        prompts.close_choice = Some(CloseChoice::No);
        assert_eq!(prompts.confirm_save_before_close(), CloseChoice::No);
        assert_eq!(prompts.confirm_save_before_close(), CloseChoice::Cancel);
    }

    #[test]
    fn test_notices_are_queued() {
        let mut prompts = PanelPrompts::default();
        prompts.notify_info("Image Saved", "done");
        prompts.notify_error("Save failed", "disk full");
        assert_eq!(prompts.notices().len(), 2);
        assert!(prompts.notices()[1].is_error);
    }
}
