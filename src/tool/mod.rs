mod types;

pub use types::{ShapeMode, Tool};

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Widest brush a surface accepts
pub const MAX_WIDTH: u32 = 500;

/// Current tool settings of a drawing surface.
///
/// A plain value holder: gesture handlers read it at the moment they need a
/// value, and nothing is notified when a setter runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolState {
    tool: Tool,
    mode: ShapeMode,
    color: Color32,
    /// Always within `1..=MAX_WIDTH`
    width: u32,
    filled: bool,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            mode: ShapeMode::Freehand,
            color: Color32::BLACK,
            width: 5,
            filled: false,
        }
    }
}

impl ToolState {
    pub fn new(color: Color32, width: u32) -> Self {
        Self {
            color,
            width: width.clamp(1, MAX_WIDTH),
            ..Self::default()
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn mode(&self) -> ShapeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ShapeMode) {
        self.mode = mode;
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Alpha is dropped; the paper is opaque RGB
    pub fn set_color(&mut self, color: Color32) {
        self.color = Color32::from_rgb(color.r(), color.g(), color.b());
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = width.clamp(1, MAX_WIDTH);
    }

    pub fn filled(&self) -> bool {
        self.filled
    }

    pub fn set_filled(&mut self, filled: bool) {
        self.filled = filled;
    }

    /// Colour a freehand stroke paints with on paper of the given background
    pub fn stroke_color(&self, background: Color32) -> Color32 {
        match self.tool {
            Tool::Brush => self.color,
            Tool::Eraser => background,
        }
    }
}
