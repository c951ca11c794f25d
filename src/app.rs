use eframe::egui;

use sleep_dash::config::DashboardConfig;

use crate::state::{AppState, Page};
use crate::ui::{pages, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SleepDashApp {
    pub state: AppState,
}

impl SleepDashApp {
    /// Build the app and load the configured dataset.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.ensure_loaded();
        Self { state }
    }
}

impl eframe::App for SleepDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: page navigation ----
        egui::SidePanel::left("page_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: the selected page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::page_header(ui, self.state.page);

            if let Some(err) = &self.state.load_error {
                panels::load_warning(ui, err);
                return;
            }
            let Some(dataset) = self.state.dataset() else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to explore the survey  (File → Open…)");
                });
                return;
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.state.page {
                    Page::Demographics => pages::demographics(ui, dataset, &self.state.config),
                    Page::Comparison => pages::comparison(ui, dataset, &self.state.config),
                    Page::Correlation => pages::correlation(ui, dataset, &self.state.config),
                });
        });
    }
}
