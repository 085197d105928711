use log::info;

use crate::config::SurfaceConfig;
use crate::host::CloseChoice;
use crate::panels::{self, Handoff, PanelPrompts, PathEntry};
use crate::renderer::Renderer;
use crate::session::Session;
use crate::surface::{CloseOutcome, DrawingSurface};

/// A surface shown either as a tab in the central panel (`docked`) or in its own window
pub struct Tab {
    pub surface: DrawingSurface,
    pub renderer: Renderer,
    pub docked: bool,
}

impl Tab {
    fn new(surface: DrawingSurface, docked: bool) -> Self {
        Self {
            surface,
            renderer: Renderer::new(),
            docked,
        }
    }
}

/// Surface actions picked in the tools panel, applied after the panels are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelAction {
    NewWindow,
    Save,
    Open,
    Clear,
    Dock,
    Undock,
    Close,
}

pub struct PaintApp {
    /// Defaults for new surfaces; the only state persisted between runs
    pub(crate) config: SurfaceConfig,
    pub(crate) session: Session,
    pub(crate) tabs: Vec<Tab>,
    pub(crate) active: usize,
    pub(crate) files: PathEntry,
    pub(crate) prompts: PanelPrompts,
    pub(crate) handoff: Handoff,
    /// Surface waiting for the save-before-close answer
    pub(crate) confirm_close: Option<usize>,
}

impl Default for PaintApp {
    fn default() -> Self {
        Self::with_config(SurfaceConfig::default())
    }
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config: SurfaceConfig = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_config(config)
    }

    /// App with one docked blank surface
    pub fn with_config(config: SurfaceConfig) -> Self {
        let mut session = Session::new();
        let surface = DrawingSurface::new(&mut session, &config);
        Self {
            config,
            session,
            tabs: vec![Tab::new(surface, true)],
            active: 0,
            files: PathEntry::default(),
            prompts: PanelPrompts::default(),
            handoff: Handoff::default(),
            confirm_close: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_surface(&self) -> Option<&DrawingSurface> {
        self.tabs.get(self.active).map(|tab| &tab.surface)
    }

    pub fn active_surface_mut(&mut self) -> Option<&mut DrawingSurface> {
        self.tabs.get_mut(self.active).map(|tab| &mut tab.surface)
    }

    pub fn handle_action(&mut self, action: PanelAction) {
        if action == PanelAction::NewWindow {
            let surface = DrawingSurface::new(&mut self.session, &self.config);
            self.tabs.push(Tab::new(surface, false));
            self.active = self.tabs.len() - 1;
            return;
        }

        let index = self.active;
        let Some(tab) = self.tabs.get_mut(index) else {
            return;
        };
        match action {
            PanelAction::NewWindow => {}
            PanelAction::Save => {
                tab.surface.save(&mut self.files, &mut self.prompts);
            }
            PanelAction::Open => {
                tab.surface.open(&mut self.files, &mut self.prompts);
            }
            PanelAction::Clear => tab.surface.clear(),
            PanelAction::Dock => {
                tab.surface.dock(&mut self.handoff);
                // The content now lives in the new tab
                self.close_tab(index, Some(CloseChoice::No));
            }
            PanelAction::Undock => {
                tab.surface.undock(&mut self.handoff);
                self.close_tab(index, Some(CloseChoice::No));
            }
            PanelAction::Close => {
                if tab.surface.is_dirty() {
                    self.confirm_close = Some(index);
                } else {
                    self.close_tab(index, None);
                }
            }
        }
    }

    /// Close the surface at `index` with an already known answer to the
    /// save-before-close question. The tab is dropped only if the surface closed.
    pub fn close_tab(&mut self, index: usize, choice: Option<CloseChoice>) -> CloseOutcome {
        let Some(tab) = self.tabs.get_mut(index) else {
            return CloseOutcome::Cancelled;
        };
        self.prompts.close_choice = choice;
        let outcome = tab.surface.close(&mut self.session, &mut self.files, &mut self.prompts);
        self.prompts.close_choice = None;

        if outcome == CloseOutcome::Closed {
            self.tabs.remove(index);
            if self.active >= self.tabs.len() {
                self.active = self.tabs.len().saturating_sub(1);
            } else if self.active > index {
                self.active -= 1;
            }
        }
        outcome
    }

    /// Open every bitmap handed over by dock/undock as a new surface
    pub fn drain_handoff(&mut self) {
        if self.handoff.is_empty() {
            return;
        }
        let docked = self.handoff.tabs.drain(..).map(|bitmap| (bitmap, true));
        let windows = self.handoff.windows.drain(..).map(|bitmap| (bitmap, false));
        for (bitmap, is_tab) in docked.chain(windows).collect::<Vec<_>>() {
            let surface = DrawingSurface::from_bitmap(&mut self.session, &self.config, bitmap);
            info!("Received {} as a {}", surface.title(), if is_tab { "tab" } else { "window" });
            self.tabs.push(Tab::new(surface, is_tab));
            self.active = self.tabs.len() - 1;
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Some(tab) = self.tabs.get(self.active) {
            self.config.remember_tools(tab.surface.tools());
        }
        eframe::set_value(storage, eframe::APP_KEY, &self.config);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let action = panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::surface_windows(self, ctx);

        if let Some(index) = self.confirm_close {
            let title = self.tabs.get(index).map(|tab| tab.surface.title()).unwrap_or_default();
            match panels::confirm_close_window(ctx, &title) {
                Some(CloseChoice::Cancel) => self.confirm_close = None,
                Some(choice) => {
                    self.confirm_close = None;
                    self.close_tab(index, Some(choice));
                }
                None => {}
            }
        }
        self.prompts.show_notices(ctx);

        if let Some(action) = action {
            self.handle_action(action);
        }
        self.drain_handoff();
    }
}
