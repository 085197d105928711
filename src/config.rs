use std::fs;
use std::path::Path;

use egui::Color32;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::color::{parse_color, to_hex};
use crate::error::SurfaceResult;
use crate::tool::{ShapeMode, ToolState};

/// Defaults applied to every new drawing surface.
///
/// Colours are kept as strings (`"#rrggbb"`, `"#rgb"` or a basic name) so the
/// file stays hand-editable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub brush_color: String,
    pub brush_width: u32,
    pub filled: bool,
    pub shape_mode: ShapeMode,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            background: "white".to_owned(),
            brush_color: "black".to_owned(),
            brush_width: 5,
            filled: false,
            shape_mode: ShapeMode::Freehand,
        }
    }
}

impl SurfaceConfig {
    pub fn from_json(json: &str) -> SurfaceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> SurfaceResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> SurfaceResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn background_color(&self) -> Color32 {
        parse_or_warn("background", &self.background, Color32::WHITE)
    }

    pub fn brush_color(&self) -> Color32 {
        parse_or_warn("brush_color", &self.brush_color, Color32::BLACK)
    }

    /// Tool settings a new surface starts with
    pub fn tool_state(&self) -> ToolState {
        let mut tools = ToolState::new(self.brush_color(), self.brush_width);
        tools.set_filled(self.filled);
        tools.set_mode(self.shape_mode);
        tools
    }

    /// Remember the current tool settings as the defaults for new surfaces
    pub fn remember_tools(&mut self, tools: &ToolState) {
        self.brush_color = to_hex(tools.color());
        self.brush_width = tools.width();
        self.filled = tools.filled();
        self.shape_mode = tools.mode();
    }
}

fn parse_or_warn(field: &str, value: &str, fallback: Color32) -> Color32 {
    parse_color(value).unwrap_or_else(|| {
        warn!("Unrecognized colour {:?} for {}, using {}", value, field, to_hex(fallback));
        fallback
    })
}
