use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::app::{PaintApp, PanelAction};
use crate::tool::{ShapeMode, Tool};

/// Left side panel: tool settings of the active surface plus surface actions.
/// Actions that open, close or hand over surfaces are returned to the app.
pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) -> Option<PanelAction> {
    let mut action = None;

    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");
            if ui.button("New window").clicked() {
                action = Some(PanelAction::NewWindow);
            }
            ui.separator();

            let Some(tab) = app.tabs.get_mut(app.active) else {
                ui.label("No open surface");
                return;
            };
            let surface = &mut tab.surface;
            ui.strong(surface.title());

            ui.horizontal(|ui| {
                for tool in Tool::ALL {
                    if ui.selectable_label(surface.tools().tool() == tool, tool.label()).clicked() {
                        log::info!("Tool selected from UI: {:?}", tool);
                        surface.tools_mut().set_tool(tool);
                    }
                }
            });

            ui.label("Mode:");
            ui.horizontal_wrapped(|ui| {
                for mode in ShapeMode::ALL {
                    if ui.selectable_label(surface.tools().mode() == mode, mode.label()).clicked() {
                        surface.tools_mut().set_mode(mode);
                    }
                }
            });

            ui.separator();

            ui.horizontal(|ui| {
                ui.label("Color:");
                let mut color = surface.tools().color();
                if color_edit_button_srgba(ui, &mut color, Alpha::Opaque).changed() {
                    app.prompts.picked_color = Some(color);
                    surface.choose_color(&mut app.prompts);
                }
            });

            ui.horizontal(|ui| {
                ui.label("Background:");
                let mut background = surface.paper().background();
                if color_edit_button_srgba(ui, &mut background, Alpha::Opaque).changed() {
                    surface.set_background(background);
                }
            });

            let mut width = surface.tools().width();
            if ui.add(egui::Slider::new(&mut width, 1..=50).text("Width")).changed() {
                surface.tools_mut().set_width(width);
            }

            let mut filled = surface.tools().filled();
            if ui.checkbox(&mut filled, "Filled shapes").changed() {
                surface.tools_mut().set_filled(filled);
            }

            ui.separator();
            ui.label("Text:");
            ui.text_edit_singleline(&mut app.prompts.text_entry);
            ui.label("File path:");
            ui.text_edit_singleline(&mut app.files.entry);

            ui.separator();
            ui.horizontal_wrapped(|ui| {
                if ui.button("Save").clicked() {
                    action = Some(PanelAction::Save);
                }
                if ui.button("Open").clicked() {
                    action = Some(PanelAction::Open);
                }
                if ui.button("Clear").clicked() {
                    action = Some(PanelAction::Clear);
                }
                if tab.docked {
                    if ui.button("Undock").clicked() {
                        action = Some(PanelAction::Undock);
                    }
                } else if ui.button("Dock").clicked() {
                    action = Some(PanelAction::Dock);
                }
                if ui.button("Close").clicked() {
                    action = Some(PanelAction::Close);
                }
            });

            ui.separator();
            let surface = &tab.surface;
            let (width, height) = surface.paper().size();
            ui.label(format!("Paper: {}x{}", width, height));
            ui.label(format!("Overlay records: {}", surface.overlay().len()));
            ui.label(format!("Gesture: {}", surface.gesture().name()));
            if surface.is_dirty() {
                ui.label("Unsaved changes");
            }
        });

    action
}
