use egui::Pos2;
use log::{debug, info};

use super::DrawingSurface;
use crate::compositor::ExportCompositor;
use crate::host::Prompts;
use crate::overlay::PreviewPrimitive;
use crate::raster::RasterBuffer;
use crate::stroke::{ShapeKind, StrokeRecord};
use crate::tool::ShapeMode;
use crate::widgets::ResizeHandle;

/// Pointer gesture currently in progress on a surface
#[derive(Debug, Clone)]
pub enum Gesture {
    Idle,
    /// Freehand stroke. `last` is `None` after the pointer left the padded area.
    Painting { last: Option<Pos2> },
    /// Shape drag from a fixed, already clamped start point
    ShapeDragging { kind: ShapeKind, start: Pos2 },
    /// Handle drag. `base` is the raster as it was when the drag started.
    Resizing { handle: ResizeHandle, base: RasterBuffer },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Painting { .. } => "painting",
            Gesture::ShapeDragging { .. } => "shape-dragging",
            Gesture::Resizing { .. } => "resizing",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }
}

impl DrawingSurface {
    /// Pointer pressed at `pos` (paper coordinates).
    ///
    /// Text placement prompts through `prompts`; every other mode only
    /// touches the surface.
    pub fn press(&mut self, pos: Pos2, prompts: &mut dyn Prompts) {
        self.abandon_gesture();

        if let Some(handle) = ResizeHandle::hit_test(&self.paper, pos) {
            debug!("{}: {} handle grabbed at {:?}", self.title(), handle.as_str(), self.paper.size());
            self.gesture = Gesture::Resizing {
                handle,
                base: self.raster.clone(),
            };
            return;
        }

        let mode = self.tools.mode();
        if let Some(kind) = mode.shape_kind() {
            self.begin_shape(kind, pos);
            return;
        }
        match mode {
            ShapeMode::Freehand => self.begin_stroke(pos),
            ShapeMode::Text => self.place_text(pos, prompts),
            ShapeMode::Fill => self.fill_at(pos),
            ShapeMode::Line | ShapeMode::Ellipse | ShapeMode::Cylinder => {}
        }
    }

    /// Pointer moved to `pos` while pressed
    pub fn pointer_move(&mut self, pos: Pos2) {
        match &self.gesture {
            Gesture::Idle => {}
            Gesture::Painting { last } => {
                let last = *last;
                self.continue_stroke(last, pos);
            }
            Gesture::ShapeDragging { kind, start } => {
                let preview = PreviewPrimitive {
                    kind: *kind,
                    from: *start,
                    to: self.paper.clamp_point(pos),
                    color: self.tools.color(),
                    width: self.tools.width() as f32,
                    filled: self.tools.filled(),
                };
                self.overlay.set_preview(preview);
            }
            Gesture::Resizing { handle, base } => {
                let (width, height) = handle.drag_size(&self.paper, pos);
                if (width, height) != self.paper.size() {
                    // Overlay and raster move in the same step so they never disagree
                    self.paper.set_size(width, height);
                    self.overlay.rescale_to(width, height);
                    self.raster.resample_from(base, width, height);
                    self.dirty = true;
                }
            }
        }
    }

    /// Pointer released at `pos`
    pub fn release(&mut self, pos: Pos2) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle | Gesture::Painting { .. } => {}
            Gesture::ShapeDragging { kind, start } => {
                self.overlay.clear_preview();
                let record = StrokeRecord::Shape {
                    kind,
                    from: start,
                    to: self.paper.clamp_point(pos),
                    color: self.tools.color(),
                    width: self.tools.width() as f32,
                    filled: self.tools.filled(),
                };
                self.commit(record);
            }
            Gesture::Resizing { handle, .. } => {
                let (width, height) = self.paper.size();
                info!("{}: resized to {}x{} with the {} handle", self.title(), width, height, handle.as_str());
            }
        }
    }

    /// Drop whatever gesture is in progress. Marks already committed stay;
    /// a resize already applied stays applied.
    pub fn abandon_gesture(&mut self) {
        if !self.gesture.is_idle() {
            debug!("{}: abandoning {} gesture", self.title(), self.gesture.name());
        }
        self.overlay.clear_preview();
        self.gesture = Gesture::Idle;
    }

    fn begin_stroke(&mut self, pos: Pos2) {
        if !self.paper.contains(pos) {
            return;
        }
        let point = self.paper.clamp_freehand(pos, self.tools.width());
        self.stroke_to(None, point);
    }

    fn continue_stroke(&mut self, last: Option<Pos2>, pos: Pos2) {
        let width = self.tools.width();
        if !self.paper.in_freehand_bounds(pos, width) {
            // The stroke stops at the edge and restarts with a dot on re-entry
            self.gesture = Gesture::Painting { last: None };
            return;
        }
        let point = self.paper.clamp_freehand(pos, width);
        if last == Some(point) {
            return;
        }
        self.stroke_to(last, point);
    }

    fn stroke_to(&mut self, last: Option<Pos2>, point: Pos2) {
        let color = self.tools.stroke_color(self.paper.background());
        let width = self.tools.width() as f32;
        let record = match last {
            None => StrokeRecord::Dot {
                center: point,
                radius: (width / 2.0).max(1.0),
                color,
            },
            Some(from) => StrokeRecord::Segment {
                from,
                to: point,
                color,
                width,
            },
        };
        self.commit(record);
        self.gesture = Gesture::Painting { last: Some(point) };
    }

    fn begin_shape(&mut self, kind: ShapeKind, pos: Pos2) {
        let start = self.paper.clamp_point(pos);
        self.gesture = Gesture::ShapeDragging { kind, start };
    }

    fn place_text(&mut self, pos: Pos2, prompts: &mut dyn Prompts) {
        if !self.paper.contains(pos) {
            return;
        }
        let Some(text) = prompts.ask_text("Enter text") else {
            return;
        };
        if text.is_empty() {
            return;
        }
        let record = StrokeRecord::TextMark {
            anchor: self.paper.clamp_point(pos),
            text,
            color: self.tools.color(),
        };
        self.commit(record);
    }

    /// Fill runs on the composited image, so marks only held by the overlay
    /// act as boundaries too. The result becomes the raster and the overlay
    /// records are flattened into it.
    fn fill_at(&mut self, pos: Pos2) {
        if !self.paper.contains(pos) {
            return;
        }
        let seed = self.paper.clamp_point(pos);
        let color = self.tools.color();

        let composite = ExportCompositor::new(&self.paper, &self.raster, &self.overlay).compose();
        let mut snapshot = RasterBuffer::from_image(composite);
        let changed = snapshot.flood_fill(seed.x as u32, seed.y as u32, color);
        if changed == 0 {
            debug!("{}: fill at {:?} is a no-op", self.title(), seed);
            return;
        }

        self.raster.paste_image(snapshot.image());
        self.overlay.clear_records();
        self.dirty = true;
        info!("{}: filled {} pixels from {:?}", self.title(), changed, seed);
    }

    /// Rasterize a record and add it to the overlay
    pub(super) fn commit(&mut self, record: StrokeRecord) {
        self.raster.apply(&record);
        debug!("{}: committed {}", self.title(), record.kind_name());
        self.overlay.push(record);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CloseChoice;
    use crate::session::Session;
    use egui::{Color32, pos2};

    #[derive(Default)]
    struct FakePrompts {
        text: Option<String>,
        asked: usize,
    }

    impl Prompts for FakePrompts {
        fn ask_color(&mut self) -> Option<Color32> {
            None
        }

        fn ask_text(&mut self, _prompt: &str) -> Option<String> {
            self.asked += 1;
            self.text.clone()
        }

        fn confirm_save_before_close(&mut self) -> CloseChoice {
            CloseChoice::Cancel
        }

        fn notify_info(&mut self, _title: &str, _message: &str) {}

        fn notify_error(&mut self, _title: &str, _message: &str) {}
    }

    fn surface(width: u32, height: u32) -> DrawingSurface {
        DrawingSurface::with_paper(&mut Session::new(), width, height, Color32::WHITE)
    }

    #[test]
    fn test_freehand_press_outside_paper_stays_idle() {
        let mut s = surface(100, 100);
        s.press(pos2(-5.0, 50.0), &mut FakePrompts::default());
        assert!(s.gesture().is_idle());
        assert!(s.overlay().is_empty());
    }

    #[test]
    fn test_freehand_dot_then_segment() {
        let mut s = surface(100, 100);
        let mut prompts = FakePrompts::default();
        s.press(pos2(20.0, 20.0), &mut prompts);
        s.pointer_move(pos2(40.0, 20.0));
        s.release(pos2(40.0, 20.0));

        let kinds: Vec<_> = s.overlay().records().map(StrokeRecord::kind_name).collect();
        assert_eq!(kinds, vec!["dot", "segment"]);
        assert_eq!(s.raster().pixel(30, 20), Some(Color32::BLACK));
        assert!(s.gesture().is_idle());
    }

    #[test]
    fn test_stroke_leaving_the_paper_restarts_with_a_dot() {
        let mut s = surface(100, 100);
        s.press(pos2(50.0, 50.0), &mut FakePrompts::default());
        s.pointer_move(pos2(150.0, 50.0));
        assert!(matches!(s.gesture(), Gesture::Painting { last: None }));
        s.pointer_move(pos2(60.0, 50.0));
        let kinds: Vec<_> = s.overlay().records().map(StrokeRecord::kind_name).collect();
        assert_eq!(kinds, vec!["dot", "dot"]);
        // Nothing was drawn towards the exit point
        assert_eq!(s.raster().pixel(97, 50), Some(Color32::WHITE));
    }

    #[test]
    fn test_shape_preview_never_touches_raster() {
        let mut s = surface(100, 100);
        s.tools_mut().set_mode(ShapeMode::Ellipse);
        s.press(pos2(10.0, 10.0), &mut FakePrompts::default());
        let revision = s.raster().revision();
        s.pointer_move(pos2(50.0, 60.0));
        s.pointer_move(pos2(500.0, 70.0));

        let preview = s.overlay().preview().expect("preview while dragging");
        assert_eq!(preview.to, pos2(99.0, 70.0));
        assert_eq!(s.raster().revision(), revision);
        assert!(s.overlay().is_empty());

        s.release(pos2(500.0, 70.0));
        assert!(s.overlay().preview().is_none());
        assert_eq!(s.overlay().len(), 1);
        assert!(s.raster().revision() > revision);
    }

    #[test]
    fn test_text_prompt() {
        let mut s = surface(100, 100);
        s.tools_mut().set_mode(ShapeMode::Text);

        let mut cancelled = FakePrompts::default();
        s.press(pos2(10.0, 10.0), &mut cancelled);
        assert_eq!(cancelled.asked, 1);
        assert!(s.overlay().is_empty());

        let mut empty = FakePrompts {
            text: Some(String::new()),
            ..FakePrompts::default()
        };
        s.press(pos2(10.0, 10.0), &mut empty);
        assert!(s.overlay().is_empty());

        let mut prompts = FakePrompts {
            text: Some("Hi".to_owned()),
            ..FakePrompts::default()
        };
        s.press(pos2(10.0, 10.0), &mut prompts);
        assert_eq!(s.overlay().len(), 1);
        assert!(s.gesture().is_idle());
        assert!(s.is_dirty());
    }

    #[test]
    fn test_fill_flattens_overlay() {
        let mut s = surface(50, 50);
        s.press(pos2(25.0, 25.0), &mut FakePrompts::default());
        s.release(pos2(25.0, 25.0));
        assert_eq!(s.overlay().len(), 1);

        s.tools_mut().set_mode(ShapeMode::Fill);
        s.tools_mut().set_color(Color32::BLUE);
        s.press(pos2(2.0, 2.0), &mut FakePrompts::default());
        assert!(s.overlay().is_empty());
        assert_eq!(s.raster().pixel(0, 0), Some(Color32::BLUE));
        // The dot was a boundary
        assert_eq!(s.raster().pixel(25, 25), Some(Color32::BLACK));
    }

    #[test]
    fn test_resize_drag_resamples_from_snapshot() {
        let mut s = surface(100, 100);
        s.press(pos2(100.0, 50.0), &mut FakePrompts::default());
        assert!(matches!(s.gesture(), Gesture::Resizing { handle: ResizeHandle::Right, .. }));

        s.pointer_move(pos2(180.0, 50.0));
        s.pointer_move(pos2(140.0, 50.0));
        assert_eq!(s.paper().size(), (140, 100));
        assert_eq!(s.raster().dimensions(), (140, 100));
        assert_eq!(s.overlay().size(), (140, 100));

        s.pointer_move(pos2(2.0, 50.0));
        assert_eq!(s.paper().width(), crate::paper::MIN_DRAG_SIZE);

        s.release(pos2(2.0, 50.0));
        assert!(s.gesture().is_idle());
        assert!(s.verify_alignment().is_ok());
    }
}
