use serde::{Deserialize, Serialize};

use crate::stroke::ShapeKind;

/// What a freehand stroke paints with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Brush,
    /// Paints with the paper's background fill
    Eraser,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Brush, Tool::Eraser];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Brush => "🖌 Brush",
            Tool::Eraser => "⌫ Eraser",
        }
    }
}

/// How a pointer press is interpreted on the paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeMode {
    #[default]
    Freehand,
    Line,
    Ellipse,
    Cylinder,
    /// Single click places a text mark
    Text,
    /// Single click flood-fills the composited image
    Fill,
}

impl ShapeMode {
    pub const ALL: [ShapeMode; 6] = [
        ShapeMode::Freehand,
        ShapeMode::Line,
        ShapeMode::Ellipse,
        ShapeMode::Cylinder,
        ShapeMode::Text,
        ShapeMode::Fill,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShapeMode::Freehand => "Freehand",
            ShapeMode::Line => "Line",
            ShapeMode::Ellipse => "Ellipse",
            ShapeMode::Cylinder => "Cylinder",
            ShapeMode::Text => "Text",
            ShapeMode::Fill => "Fill",
        }
    }

    /// The dragged shape this mode produces, if it is a drag mode
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            ShapeMode::Line => Some(ShapeKind::Line),
            ShapeMode::Ellipse => Some(ShapeKind::Ellipse),
            ShapeMode::Cylinder => Some(ShapeKind::Cylinder),
            ShapeMode::Freehand | ShapeMode::Text | ShapeMode::Fill => None,
        }
    }
}
