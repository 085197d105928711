use egui::{Vec2, vec2};

use crate::app::{PaintApp, Tab};
use crate::host::Prompts;

/// Blank space around the paper so the edge handles stay grabbable
const CANVAS_MARGIN: f32 = 12.0;

/// Docked surfaces as tabs in the central panel
pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let mut selected = None;
        ui.horizontal(|ui| {
            for (index, tab) in app.tabs.iter().enumerate().filter(|(_, tab)| tab.docked) {
                if ui.selectable_label(index == app.active, tab.surface.title()).clicked() {
                    selected = Some(index);
                }
            }
        });
        if let Some(index) = selected {
            app.active = index;
        }
        ui.separator();

        let shown = if app.tabs.get(app.active).is_some_and(|tab| tab.docked) {
            Some(app.active)
        } else {
            app.tabs.iter().position(|tab| tab.docked)
        };
        match shown {
            Some(index) => {
                if canvas_ui(ui, &mut app.tabs[index], &mut app.prompts) {
                    app.active = index;
                }
            }
            None => {
                ui.label("No docked surfaces");
            }
        }
    });
}

/// Undocked surfaces, each in its own window
pub fn surface_windows(app: &mut PaintApp, ctx: &egui::Context) {
    for index in 0..app.tabs.len() {
        if app.tabs[index].docked {
            continue;
        }
        let surface = &app.tabs[index].surface;
        let (width, height) = surface.paper().size();
        let mut pressed = false;
        egui::Window::new(surface.title())
            .id(egui::Id::new(surface.id()))
            .resizable(true)
            .default_size(vec2(width as f32, height as f32) + Vec2::splat(CANVAS_MARGIN * 2.0))
            .show(ctx, |ui| {
                pressed = canvas_ui(ui, &mut app.tabs[index], &mut app.prompts);
            });
        if pressed {
            app.active = index;
        }
    }
}

/// Route pointer input to a surface and paint it. Returns true when the
/// surface received a press this frame.
pub fn canvas_ui(ui: &mut egui::Ui, tab: &mut Tab, prompts: &mut dyn Prompts) -> bool {
    let (width, height) = tab.surface.paper().size();
    let size = vec2(width as f32, height as f32) + Vec2::splat(CANVAS_MARGIN * 2.0);
    let mut pressed_here = false;

    egui::ScrollArea::both().id_salt(tab.surface.id()).show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let origin = response.rect.min + Vec2::splat(CANVAS_MARGIN);

        let (pressed, down, released, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });

        if let Some(screen_pos) = pointer {
            let pos = (screen_pos - origin).to_pos2();
            if pressed && response.hovered() {
                tab.surface.press(pos, prompts);
                pressed_here = true;
            } else if down && !tab.surface.gesture().is_idle() {
                tab.surface.pointer_move(pos);
            }
            if released && !tab.surface.gesture().is_idle() {
                tab.surface.release(pos);
            }
            if response.hovered() {
                if let Some(handle) = tab.surface.handle_at(pos) {
                    ui.ctx().set_cursor_icon(handle.cursor_icon());
                }
            }
        }

        tab.renderer.render(ui.ctx(), &painter, origin, &tab.surface);
    });

    pressed_here
}
