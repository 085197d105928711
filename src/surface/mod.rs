//! One drawing surface: paper geometry, the persistent raster, the live
//! overlay and the gesture state machine that keeps them in step.

mod gesture;

pub use gesture::Gesture;

use std::path::{Path, PathBuf};

use egui::{Color32, Pos2};
use image::RgbImage;
use log::{error, info};
use uuid::Uuid;

use crate::codec;
use crate::compositor::ExportCompositor;
use crate::config::SurfaceConfig;
use crate::error::{SurfaceError, SurfaceResult};
use crate::host::{CloseChoice, FileDialogs, HostContainer, IMAGE_FILTERS, Prompts};
use crate::overlay::VectorOverlay;
use crate::paper::Paper;
use crate::raster::RasterBuffer;
use crate::session::Session;
use crate::tool::ToolState;
use crate::widgets::ResizeHandle;

/// Result of [`DrawingSurface::save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    Cancelled,
    Failed,
}

/// Result of [`DrawingSurface::open`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened(PathBuf),
    Cancelled,
    Failed,
}

/// Result of [`DrawingSurface::close`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// The user chose to keep the surface open, or the save before closing did not happen
    Cancelled,
}

#[derive(Debug)]
pub struct DrawingSurface {
    id: Uuid,
    number: usize,
    paper: Paper,
    raster: RasterBuffer,
    overlay: VectorOverlay,
    tools: ToolState,
    gesture: Gesture,
    /// The raster holds a loaded image rather than only painted marks
    bg_loaded: bool,
    /// Marks made since the last save
    dirty: bool,
    closed: bool,
}

impl DrawingSurface {
    /// Blank surface sized and tooled from `config`
    pub fn new(session: &mut Session, config: &SurfaceConfig) -> Self {
        let mut surface = Self::with_paper(session, config.width, config.height, config.background_color());
        surface.tools = config.tool_state();
        surface
    }

    /// Blank surface with default tools
    pub fn with_paper(session: &mut Session, width: u32, height: u32, background: Color32) -> Self {
        let paper = Paper::new(width, height, background);
        let (width, height) = paper.size();
        let surface = Self {
            id: Uuid::new_v4(),
            number: session.open_surface(),
            paper,
            raster: RasterBuffer::new(width, height, background),
            overlay: VectorOverlay::new(width, height),
            tools: ToolState::default(),
            gesture: Gesture::Idle,
            bg_loaded: false,
            dirty: false,
            closed: false,
        };
        info!("Opened {} ({}x{})", surface.title(), width, height);
        surface
    }

    /// Surface whose paper takes the size of `bitmap` and whose raster is that bitmap.
    /// Used on the receiving side of a dock/undock handoff.
    pub fn from_bitmap(session: &mut Session, config: &SurfaceConfig, bitmap: RgbImage) -> Self {
        let mut surface = Self::with_paper(session, bitmap.width(), bitmap.height(), config.background_color());
        surface.tools = config.tool_state();
        surface.load_bitmap(&bitmap);
        surface
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Window number handed out by the session
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn title(&self) -> String {
        format!("Paint Window #{}", self.number)
    }

    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    pub fn raster(&self) -> &RasterBuffer {
        &self.raster
    }

    pub fn overlay(&self) -> &VectorOverlay {
        &self.overlay
    }

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolState {
        &mut self.tools
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn has_loaded_image(&self) -> bool {
        self.bg_loaded
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Resize handle under `pos`, for cursor feedback
    pub fn handle_at(&self, pos: Pos2) -> Option<ResizeHandle> {
        ResizeHandle::hit_test(&self.paper, pos)
    }

    /// Set the paper size directly. Sizes are clamped to at least 1.
    pub fn resize_paper(&mut self, width: u32, height: u32) {
        self.abandon_gesture();
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == self.paper.size() {
            return;
        }
        self.paper.set_size(width, height);
        self.overlay.rescale_to(width, height);
        self.raster.resize(width, height);
        self.dirty = true;
        info!("{}: resized to {}x{}", self.title(), width, height);
    }

    /// Back to blank paper: raster refilled, every record and the preview dropped
    pub fn clear(&mut self) {
        self.abandon_gesture();
        self.raster.clear(self.paper.background());
        self.overlay.clear();
        self.bg_loaded = false;
        self.dirty = true;
        info!("{}: cleared", self.title());
    }

    /// Change the background fill. Raster pixels and overlay records still
    /// showing the old background take the new one, so eraser marks follow.
    pub fn set_background(&mut self, background: Color32) {
        self.abandon_gesture();
        let background = Color32::from_rgb(background.r(), background.g(), background.b());
        let old = self.paper.background();
        let recoloured = self.raster.replace_color(old, background);
        let records = self.overlay.recolor(old, background);
        self.paper.set_background(background);
        if recoloured > 0 || records > 0 {
            self.dirty = true;
        }
    }

    /// Ask for a new brush colour; cancelling keeps the current one
    pub fn choose_color(&mut self, prompts: &mut dyn Prompts) {
        self.abandon_gesture();
        if let Some(color) = prompts.ask_color() {
            self.tools.set_color(color);
        }
    }

    /// Flattened bitmap of the current surface
    pub fn compose(&self) -> RgbImage {
        ExportCompositor::new(&self.paper, &self.raster, &self.overlay).compose()
    }

    /// Replace the raster with `bitmap` resampled to the paper. The overlay is
    /// cleared because the raster no longer contains its marks.
    pub fn load_bitmap(&mut self, bitmap: &RgbImage) {
        self.abandon_gesture();
        self.raster.paste_image(bitmap);
        self.overlay.clear();
        self.bg_loaded = true;
        self.dirty = true;
    }

    pub fn load_image(&mut self, path: &Path) -> SurfaceResult<()> {
        let bitmap = codec::load_bitmap(path)?;
        self.load_bitmap(&bitmap);
        info!("{}: loaded {}", self.title(), path.display());
        Ok(())
    }

    /// Ask for an image file and load it. Failures are reported through
    /// `prompts` and leave the surface unchanged.
    pub fn open(&mut self, dialogs: &mut dyn FileDialogs, prompts: &mut dyn Prompts) -> OpenOutcome {
        self.abandon_gesture();
        let Some(path) = dialogs.ask_open_path(IMAGE_FILTERS) else {
            return OpenOutcome::Cancelled;
        };
        match self.load_image(&path) {
            Ok(()) => OpenOutcome::Opened(path),
            Err(err) => {
                error!("{}: failed to open {}: {}", self.title(), path.display(), err);
                prompts.notify_error("Open failed", &format!("Could not open {}:\n{}", path.display(), err));
                OpenOutcome::Failed
            }
        }
    }

    /// Write the composed bitmap to `path`, format chosen by extension
    pub fn save_to(&mut self, path: &Path) -> SurfaceResult<()> {
        codec::save_bitmap(&self.compose(), path)?;
        self.dirty = false;
        info!("{}: saved {}", self.title(), path.display());
        Ok(())
    }

    /// Ask for a destination and save. Failures are reported through `prompts`.
    pub fn save(&mut self, dialogs: &mut dyn FileDialogs, prompts: &mut dyn Prompts) -> SaveOutcome {
        self.abandon_gesture();
        let suggested = suggested_file_name();
        let Some(path) = dialogs.ask_save_path(".png", IMAGE_FILTERS, &suggested) else {
            return SaveOutcome::Cancelled;
        };
        match self.save_to(&path) {
            Ok(()) => {
                prompts.notify_info("Image Saved", &format!("Image saved!\n{}", path.display()));
                SaveOutcome::Saved(path)
            }
            Err(err) => {
                error!("{}: failed to save {}: {}", self.title(), path.display(), err);
                prompts.notify_error("Save failed", &format!("Could not save {}:\n{}", path.display(), err));
                SaveOutcome::Failed
            }
        }
    }

    /// Hand the composed bitmap to the host as a new tab
    pub fn dock(&mut self, host: &mut dyn HostContainer) {
        self.abandon_gesture();
        info!("{}: docking as tab", self.title());
        host.dock_image_as_tab(self.compose());
    }

    /// Hand the composed bitmap to the host as a new standalone window
    pub fn undock(&mut self, host: &mut dyn HostContainer) {
        self.abandon_gesture();
        info!("{}: undocking into a window", self.title());
        host.create_window_from_image(self.compose());
    }

    /// Close the surface, offering to save unsaved marks first.
    /// Closing releases the surface's slot in `session`; closing twice is a no-op.
    pub fn close(
        &mut self,
        session: &mut Session,
        dialogs: &mut dyn FileDialogs,
        prompts: &mut dyn Prompts,
    ) -> CloseOutcome {
        self.abandon_gesture();
        if self.closed {
            return CloseOutcome::Closed;
        }

        if self.dirty {
            match prompts.confirm_save_before_close() {
                CloseChoice::Cancel => return CloseOutcome::Cancelled,
                CloseChoice::No => {}
                CloseChoice::Yes => {
                    if !matches!(self.save(dialogs, prompts), SaveOutcome::Saved(_)) {
                        return CloseOutcome::Cancelled;
                    }
                }
            }
        }

        session.close_surface();
        self.closed = true;
        info!("Closed {}", self.title());
        CloseOutcome::Closed
    }

    /// Check that paper, raster and overlay still describe the same surface.
    ///
    /// Every live record must equal its committed geometry rescaled to the
    /// current paper, and its anchor points must lie on the paper (1px slack).
    /// Records committed since the last resize must also replay onto the
    /// exact pixels the raster holds.
    pub fn verify_alignment(&self) -> SurfaceResult<()> {
        let (width, height) = self.paper.size();
        let drift = |reason: String| SurfaceError::Drift {
            paper_width: width,
            paper_height: height,
            reason,
        };

        if self.raster.dimensions() != (width, height) {
            let (rw, rh) = self.raster.dimensions();
            return Err(drift(format!("raster is {}x{}", rw, rh)));
        }
        if self.overlay.size() != (width, height) {
            let (ow, oh) = self.overlay.size();
            return Err(drift(format!("overlay is expressed at {}x{}", ow, oh)));
        }

        let allowed = self.paper.rect().expand(1.0);
        for item in self.overlay.items() {
            let (ox, oy) = item.origin();
            let expected = item
                .committed()
                .scaled(width as f64 / ox as f64, height as f64 / oy as f64);
            if &expected != item.record() {
                return Err(drift(format!("item {} no longer matches its committed geometry", item.id())));
            }
            if let Some(point) = item.record().anchor_points().into_iter().find(|p| !allowed.contains(*p)) {
                return Err(drift(format!("item {} has a point off the paper at {:?}", item.id(), point)));
            }
        }

        // Marks committed since the last resize were drawn into the raster
        // unresampled, so replaying them must reproduce the raster exactly
        let mut footprint = RasterBuffer::new(width, height, Color32::BLACK);
        let mut fresh = 0;
        for item in self.overlay.unresampled() {
            let mut record = item.record().clone();
            record.set_color(Color32::WHITE);
            footprint.apply(&record);
            fresh += 1;
        }
        if fresh > 0 {
            let composed = self.compose();
            let raster = self.raster.image();
            for (x, y, mark) in footprint.image().enumerate_pixels() {
                if mark.0 == [255, 255, 255] && composed.get_pixel(x, y) != raster.get_pixel(x, y) {
                    return Err(drift(format!("overlay and raster disagree at ({}, {})", x, y)));
                }
            }
        }
        Ok(())
    }
}

/// Default file name offered by the save dialog
pub fn suggested_file_name() -> String {
    format!("paint_{}.png", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::StrokeRecord;
    use egui::pos2;

    #[test]
    fn test_new_surface_from_config() {
        let mut session = Session::new();
        let config = SurfaceConfig {
            width: 320,
            height: 0,
            background: "#ffff00".to_owned(),
            ..SurfaceConfig::default()
        };
        let surface = DrawingSurface::new(&mut session, &config);
        assert_eq!(surface.paper().size(), (320, 1));
        assert_eq!(surface.raster().pixel(0, 0), Some(Color32::from_rgb(255, 255, 0)));
        assert_eq!(surface.title(), "Paint Window #1");
        assert!(!surface.is_dirty());
    }

    #[test]
    fn test_set_background_recolours_untouched_pixels() {
        let mut session = Session::new();
        let mut surface = DrawingSurface::with_paper(&mut session, 20, 20, Color32::WHITE);
        surface.commit(StrokeRecord::Dot {
            center: pos2(10.0, 10.0),
            radius: 2.0,
            color: Color32::BLACK,
        });
        surface.set_background(Color32::from_rgb(10, 20, 30));
        assert_eq!(surface.paper().background(), Color32::from_rgb(10, 20, 30));
        assert_eq!(surface.raster().pixel(0, 0), Some(Color32::from_rgb(10, 20, 30)));
        assert_eq!(surface.raster().pixel(10, 10), Some(Color32::BLACK));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = Session::new();
        let mut surface = DrawingSurface::with_paper(&mut session, 20, 20, Color32::WHITE);
        surface.load_bitmap(&RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0])));
        assert!(surface.has_loaded_image());
        surface.clear();
        assert!(!surface.has_loaded_image());
        assert!(surface.overlay().is_empty());
        assert_eq!(surface.raster().pixel(19, 19), Some(Color32::WHITE));
    }

    #[test]
    fn test_programmatic_resize_clamps_to_one() {
        let mut session = Session::new();
        let mut surface = DrawingSurface::with_paper(&mut session, 20, 20, Color32::WHITE);
        surface.resize_paper(0, 7);
        assert_eq!(surface.paper().size(), (1, 7));
        assert!(surface.verify_alignment().is_ok());
    }

    #[test]
    fn test_alignment_check_catches_drift() {
        let mut session = Session::new();
        let mut surface = DrawingSurface::with_paper(&mut session, 40, 40, Color32::WHITE);
        surface.commit(StrokeRecord::Dot {
            center: pos2(39.0, 39.0),
            radius: 1.0,
            color: Color32::BLACK,
        });
        assert!(surface.verify_alignment().is_ok());

        // Overlay rescaled without the paper and raster following
        surface.overlay.rescale_to(80, 80);
        assert!(matches!(surface.verify_alignment(), Err(SurfaceError::Drift { .. })));

        // Sizes agree again, but the point now lies off the paper
        surface.overlay = VectorOverlay::new(40, 40);
        surface.overlay.push(StrokeRecord::Dot {
            center: pos2(60.0, 10.0),
            radius: 1.0,
            color: Color32::BLACK,
        });
        let err = surface.verify_alignment().unwrap_err();
        assert!(err.to_string().contains("off the paper"));
    }

    #[test]
    fn test_alignment_check_compares_pixels() {
        let mut session = Session::new();
        let mut surface = DrawingSurface::with_paper(&mut session, 40, 40, Color32::WHITE);
        surface.commit(StrokeRecord::Dot {
            center: pos2(20.0, 20.0),
            radius: 3.0,
            color: Color32::RED,
        });
        assert!(surface.verify_alignment().is_ok());

        // Raster repainted without the overlay knowing
        surface.raster.clear(Color32::WHITE);
        let err = surface.verify_alignment().unwrap_err();
        assert!(err.to_string().contains("disagree"));

        // After a resize the raster is resampled and only geometry is compared
        surface.resize_paper(80, 80);
        assert!(surface.verify_alignment().is_ok());
    }

    #[test]
    fn test_suggested_file_name_shape() {
        let name = suggested_file_name();
        assert!(name.starts_with("paint_"));
        assert!(name.ends_with(".png"));
        // paint_YYYYmmdd_HHMMSS.png
        assert_eq!(name.len(), "paint_20240101_120000.png".len());
    }
}
