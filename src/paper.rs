use egui::{Color32, Pos2, Rect, pos2};

/// Smallest paper edge reachable by dragging a resize handle
pub const MIN_DRAG_SIZE: u32 = 10;

/// The logical drawable area: size plus background fill.
///
/// Width and height are never below 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paper {
    width: u32,
    height: u32,
    background: Color32,
}

impl Paper {
    pub fn new(width: u32, height: u32, background: Color32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    pub(crate) fn set_background(&mut self, background: Color32) {
        self.background = background;
    }

    pub(crate) fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    /// Paper area in paper coordinates
    pub fn rect(&self) -> Rect {
        Rect::from_min_max(Pos2::ZERO, pos2(self.width as f32, self.height as f32))
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect().contains(pos)
    }

    /// Clamp to the pixel grid: `[0, width - 1] x [0, height - 1]`
    pub fn clamp_point(&self, pos: Pos2) -> Pos2 {
        let clamp = |v: f32, limit: u32| {
            if v.is_nan() { 0.0 } else { v.round().clamp(0.0, (limit - 1) as f32) }
        };
        pos2(clamp(pos.x, self.width), clamp(pos.y, self.height))
    }

    /// Per-axis inset keeping a freehand stroke of `stroke_width` on the paper.
    /// Collapses to zero on an axis too small to hold twice the inset.
    pub fn freehand_padding(&self, stroke_width: u32) -> (u32, u32) {
        let pad = stroke_width.max(1).div_ceil(2);
        let pad_x = if self.width > pad.saturating_mul(2) { pad } else { 0 };
        let pad_y = if self.height > pad.saturating_mul(2) { pad } else { 0 };
        (pad_x, pad_y)
    }

    /// Freehand point snapped to whole pixels and clamped inside the padded area
    pub fn clamp_freehand(&self, pos: Pos2, stroke_width: u32) -> Pos2 {
        let (pad_x, pad_y) = self.freehand_padding(stroke_width);
        let clamp = |v: f32, pad: u32, limit: u32| {
            let v = if v.is_nan() { 0.0 } else { v.trunc() };
            v.clamp(pad as f32, (limit - pad) as f32)
        };
        pos2(clamp(pos.x, pad_x, self.width), clamp(pos.y, pad_y, self.height))
    }

    /// Whether a freehand point lies inside the padded area
    pub fn in_freehand_bounds(&self, pos: Pos2, stroke_width: u32) -> bool {
        let (pad_x, pad_y) = self.freehand_padding(stroke_width);
        let x_ok = pos.x >= pad_x as f32 && pos.x <= (self.width - pad_x) as f32;
        let y_ok = pos.y >= pad_y as f32 && pos.y <= (self.height - pad_y) as f32;
        x_ok && y_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_clamped() {
        let paper = Paper::new(0, 0, Color32::WHITE);
        assert_eq!(paper.size(), (1, 1));
        let mut paper = Paper::new(5, 5, Color32::WHITE);
        paper.set_size(0, 7);
        assert_eq!(paper.size(), (1, 7));
    }

    #[test]
    fn test_freehand_padding_clamps_corner() {
        let paper = Paper::new(100, 100, Color32::WHITE);
        assert_eq!(paper.freehand_padding(10), (5, 5));
        assert_eq!(paper.clamp_freehand(pos2(0.0, 0.0), 10), pos2(5.0, 5.0));
        assert_eq!(paper.clamp_freehand(pos2(250.0, 99.9), 10), pos2(95.0, 95.0));
        // Odd widths round the padding up
        assert_eq!(paper.freehand_padding(5), (3, 3));
    }

    #[test]
    fn test_padding_collapses_on_tiny_paper() {
        let paper = Paper::new(8, 100, Color32::WHITE);
        assert_eq!(paper.freehand_padding(10), (0, 5));
        assert!(paper.in_freehand_bounds(pos2(0.0, 50.0), 10));
        assert!(!paper.in_freehand_bounds(pos2(0.0, 2.0), 10));
    }

    #[test]
    fn test_padding_with_enormous_width() {
        let paper = Paper::new(100, 100, Color32::WHITE);
        assert_eq!(paper.freehand_padding(u32::MAX), (0, 0));
        assert_eq!(paper.clamp_freehand(pos2(250.0, -4.0), u32::MAX), pos2(100.0, 0.0));
        assert!(paper.in_freehand_bounds(pos2(50.0, 50.0), u32::MAX));
    }

    #[test]
    fn test_clamp_point_to_pixel_grid() {
        let paper = Paper::new(400, 300, Color32::WHITE);
        assert_eq!(paper.clamp_point(pos2(-3.0, 310.0)), pos2(0.0, 299.0));
        assert_eq!(paper.clamp_point(pos2(f32::NAN, 12.4)), pos2(0.0, 12.0));
    }
}
