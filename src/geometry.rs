use egui::{Pos2, Rect};

/// Calculate distance from a point to a line segment
pub fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let line_vec = end - start;
    let point_vec = point - start;

    let len_sq = line_vec.length_sq();
    if len_sq == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / len_sq).clamp(0.0, 1.0);
    let projection = start + line_vec * t;
    (point - projection).length()
}

/// Rectangle spanned by two arbitrary corners
pub fn normalized_rect(a: Pos2, b: Pos2) -> Rect {
    Rect::from_two_pos(a, b)
}

/// Integer pixel span `[lo, hi]` covering `[min, max]`, clipped to `[0, limit)`.
/// Returns `None` when nothing of the span lies on the bitmap.
pub(crate) fn pixel_span(min: f32, max: f32, limit: u32) -> Option<(u32, u32)> {
    if limit == 0 || !min.is_finite() || !max.is_finite() {
        return None;
    }
    let lo = min.floor().max(0.0);
    let hi = max.ceil().min((limit - 1) as f32);
    if lo > hi {
        return None;
    }
    Some((lo as u32, hi as u32))
}
