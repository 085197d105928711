mod central_panel;
pub mod dialogs;
mod tools_panel;

pub use central_panel::{canvas_ui, central_panel, surface_windows};
pub use dialogs::{Handoff, Notice, PanelPrompts, PathEntry, confirm_close_window};
pub use tools_panel::tools_panel;
