use egui::{Color32, CursorIcon, Painter, Pos2, Rect, Stroke, Vec2, pos2};

use crate::paper::{MIN_DRAG_SIZE, Paper};

/// Half the side length of a handle's square hit region
pub const HANDLE_HALF_EXTENT: f32 = 6.0;

/// The three draggable controls that change paper geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// Right edge: width only
    Right,
    /// Bottom edge: height only
    Bottom,
    /// Bottom-right corner: both axes
    Corner,
}

impl ResizeHandle {
    /// Checked in this order, so the corner wins where regions overlap
    pub const ALL: [ResizeHandle; 3] = [ResizeHandle::Corner, ResizeHandle::Right, ResizeHandle::Bottom];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::Right => "right",
            ResizeHandle::Bottom => "bottom",
            ResizeHandle::Corner => "corner",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            ResizeHandle::Right => CursorIcon::ResizeHorizontal,
            ResizeHandle::Bottom => CursorIcon::ResizeVertical,
            ResizeHandle::Corner => CursorIcon::ResizeNwSe,
        }
    }

    /// Handle position for the given paper, in paper coordinates
    pub fn center(&self, paper: &Paper) -> Pos2 {
        let (w, h) = (paper.width() as f32, paper.height() as f32);
        match self {
            ResizeHandle::Right => pos2(w, h / 2.0),
            ResizeHandle::Bottom => pos2(w / 2.0, h),
            ResizeHandle::Corner => pos2(w, h),
        }
    }

    pub fn hit_rect(&self, paper: &Paper) -> Rect {
        Rect::from_center_size(self.center(paper), Vec2::splat(HANDLE_HALF_EXTENT * 2.0))
    }

    /// Handle under `pos`, if any
    pub fn hit_test(paper: &Paper, pos: Pos2) -> Option<ResizeHandle> {
        Self::ALL.into_iter().find(|handle| handle.hit_rect(paper).contains(pos))
    }

    /// New paper size when this handle is dragged to `pos`.
    /// Axes the handle does not control keep their current size.
    pub fn drag_size(&self, paper: &Paper, pos: Pos2) -> (u32, u32) {
        let to_size = |v: f32| {
            if v.is_nan() { MIN_DRAG_SIZE } else { (v.round().max(0.0) as u32).max(MIN_DRAG_SIZE) }
        };
        match self {
            ResizeHandle::Right => (to_size(pos.x), paper.height()),
            ResizeHandle::Bottom => (paper.width(), to_size(pos.y)),
            ResizeHandle::Corner => (to_size(pos.x), to_size(pos.y)),
        }
    }

    /// Draw the handle with the paper's top-left corner at `origin`
    pub fn draw(&self, painter: &Painter, origin: Pos2, paper: &Paper, active: bool) {
        let rect = self.hit_rect(paper).translate(origin.to_vec2());
        let fill = if active {
            Color32::from_rgb(255, 140, 0)
        } else {
            Color32::from_rgb(30, 120, 255)
        };
        painter.rect_filled(rect, 2.0, fill);
        painter.rect_stroke(rect, 2.0, Stroke::new(1.0, Color32::WHITE));
    }
}
