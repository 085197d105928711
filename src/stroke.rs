use egui::{Color32, Pos2, Rect, pos2, vec2};
use serde::{Deserialize, Serialize};

use crate::geometry;

/// Cylinder end caps take this share of the shape's height
pub const CYLINDER_CAP_RATIO: f32 = 0.15;
/// Minimum cap height in pixels
pub const CYLINDER_MIN_CAP: f32 = 4.0;

/// Parametric shapes that are dragged out from a start point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Line,
    Ellipse,
    Cylinder,
}

/// A committed mark, kept alongside the raster buffer for redraw and export.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeRecord {
    /// One step of a freehand stroke
    Segment {
        from: Pos2,
        to: Pos2,
        color: Color32,
        width: f32,
    },
    /// First point of a freehand stroke
    Dot {
        center: Pos2,
        radius: f32,
        color: Color32,
    },
    Shape {
        kind: ShapeKind,
        from: Pos2,
        to: Pos2,
        color: Color32,
        width: f32,
        filled: bool,
    },
    TextMark {
        anchor: Pos2,
        text: String,
        color: Color32,
    },
}

/// Raster-level building block. Every record expands into one or more of these,
/// so the raster buffer, the compositor and the egui renderer agree on geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line { from: Pos2, to: Pos2, width: f32 },
    Ellipse { rect: Rect, filled: bool, width: f32 },
    Rect { rect: Rect, filled: bool, width: f32 },
    /// Left and right edges of a rectangle (the outlined body of a cylinder)
    Sides { rect: Rect, width: f32 },
    Text { anchor: Pos2, text: String },
}

impl StrokeRecord {
    pub fn color(&self) -> Color32 {
        match self {
            Self::Segment { color, .. }
            | Self::Dot { color, .. }
            | Self::Shape { color, .. }
            | Self::TextMark { color, .. } => *color,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Segment { .. } => "segment",
            Self::Dot { .. } => "dot",
            Self::Shape { kind: ShapeKind::Line, .. } => "line",
            Self::Shape { kind: ShapeKind::Ellipse, .. } => "ellipse",
            Self::Shape { kind: ShapeKind::Cylinder, .. } => "cylinder",
            Self::TextMark { .. } => "text",
        }
    }

    pub fn set_color(&mut self, new: Color32) {
        match self {
            Self::Segment { color, .. }
            | Self::Dot { color, .. }
            | Self::Shape { color, .. }
            | Self::TextMark { color, .. } => *color = new,
        }
    }

    /// Copy of this record with every coordinate multiplied per axis.
    /// Widths, radii and text size are not scaled.
    pub fn scaled(&self, sx: f64, sy: f64) -> Self {
        let scale = |p: Pos2| pos2((p.x as f64 * sx) as f32, (p.y as f64 * sy) as f32);
        match self {
            Self::Segment { from, to, color, width } => Self::Segment {
                from: scale(*from),
                to: scale(*to),
                color: *color,
                width: *width,
            },
            Self::Dot { center, radius, color } => Self::Dot {
                center: scale(*center),
                radius: *radius,
                color: *color,
            },
            Self::Shape { kind, from, to, color, width, filled } => Self::Shape {
                kind: *kind,
                from: scale(*from),
                to: scale(*to),
                color: *color,
                width: *width,
                filled: *filled,
            },
            Self::TextMark { anchor, text, color } => Self::TextMark {
                anchor: scale(*anchor),
                text: text.clone(),
                color: *color,
            },
        }
    }

    /// Points that pin the record to the paper: endpoints, centres and anchors
    pub fn anchor_points(&self) -> Vec<Pos2> {
        match self {
            Self::Segment { from, to, .. } | Self::Shape { from, to, .. } => vec![*from, *to],
            Self::Dot { center, .. } => vec![*center],
            Self::TextMark { anchor, .. } => vec![*anchor],
        }
    }

    pub fn primitives(&self) -> Vec<Primitive> {
        match self {
            Self::Segment { from, to, width, .. } => vec![Primitive::Line {
                from: *from,
                to: *to,
                width: *width,
            }],
            Self::Dot { center, radius, .. } => vec![Primitive::Ellipse {
                rect: Rect::from_center_size(*center, vec2(radius * 2.0, radius * 2.0)),
                filled: true,
                width: 1.0,
            }],
            Self::Shape { kind, from, to, width, filled, .. } => shape_primitives(*kind, *from, *to, *width, *filled),
            Self::TextMark { anchor, text, .. } => vec![Primitive::Text {
                anchor: *anchor,
                text: text.clone(),
            }],
        }
    }
}

/// Expand a dragged shape into raster primitives
pub fn shape_primitives(kind: ShapeKind, from: Pos2, to: Pos2, width: f32, filled: bool) -> Vec<Primitive> {
    match kind {
        ShapeKind::Line => vec![Primitive::Line { from, to, width }],
        ShapeKind::Ellipse => vec![Primitive::Ellipse {
            rect: geometry::normalized_rect(from, to),
            filled,
            width,
        }],
        ShapeKind::Cylinder => cylinder_primitives(geometry::normalized_rect(from, to), width, filled).to_vec(),
    }
}

/// Two end-cap ellipses joined by a body spanning the remaining height
pub fn cylinder_primitives(rect: Rect, width: f32, filled: bool) -> [Primitive; 3] {
    let cap = (rect.height() * CYLINDER_CAP_RATIO).max(CYLINDER_MIN_CAP);
    let top = Rect::from_min_max(rect.min, pos2(rect.max.x, rect.min.y + cap));
    let bottom = Rect::from_min_max(pos2(rect.min.x, rect.max.y - cap), rect.max);
    let body = Rect::from_min_max(
        pos2(rect.min.x, rect.min.y + cap / 2.0),
        pos2(rect.max.x, (rect.max.y - cap / 2.0).max(rect.min.y + cap / 2.0)),
    );

    let body = if filled {
        Primitive::Rect { rect: body, filled: true, width }
    } else {
        Primitive::Sides { rect: body, width }
    };

    [
        body,
        Primitive::Ellipse { rect: bottom, filled, width },
        Primitive::Ellipse { rect: top, filled, width },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaling_round_trip_is_exact() {
        let record = StrokeRecord::Segment {
            from: pos2(10.0, 10.0),
            to: pos2(100.0, 100.0),
            color: Color32::RED,
            width: 3.0,
        };
        let doubled = record.scaled(2.0, 1.0);
        assert_eq!(
            doubled,
            StrokeRecord::Segment {
                from: pos2(20.0, 10.0),
                to: pos2(200.0, 100.0),
                color: Color32::RED,
                width: 3.0,
            }
        );
        assert_eq!(doubled.scaled(0.5, 1.0), record);
    }

    #[test]
    fn test_cylinder_cap_heights() {
        // 15% of 100 = 15
        let parts = cylinder_primitives(Rect::from_min_max(pos2(0.0, 0.0), pos2(50.0, 100.0)), 2.0, true);
        match &parts[2] {
            Primitive::Ellipse { rect, .. } => assert_eq!(rect.height(), 15.0),
            other => panic!("unexpected top cap {:?}", other),
        }

        // Small shapes fall back to the minimum cap
        let parts = cylinder_primitives(Rect::from_min_max(pos2(0.0, 0.0), pos2(50.0, 10.0)), 2.0, false);
        match &parts[1] {
            Primitive::Ellipse { rect, filled, .. } => {
                assert_eq!(rect.height(), CYLINDER_MIN_CAP);
                assert!(!filled);
            }
            other => panic!("unexpected bottom cap {:?}", other),
        }
        assert!(matches!(parts[0], Primitive::Sides { .. }));
    }

    #[test]
    fn test_shape_primitives_normalize_drag_direction() {
        let prims = shape_primitives(ShapeKind::Ellipse, pos2(150.0, 120.0), pos2(50.0, 50.0), 1.0, true);
        assert_eq!(
            prims,
            vec![Primitive::Ellipse {
                rect: Rect::from_min_max(pos2(50.0, 50.0), pos2(150.0, 120.0)),
                filled: true,
                width: 1.0,
            }]
        );
    }
}
