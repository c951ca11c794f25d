use eframe::egui::{self, Color32, RichText, Ui};

use sleep_dash::DataError;

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – page navigation and dataset info
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sleep Health");
    ui.label("and Lifestyle Dataset");
    ui.separator();

    for page in Page::ALL {
        ui.selectable_value(&mut state.page, page, page.title())
            .on_hover_text(page.subtitle());
    }

    ui.separator();
    ui.strong("Source");
    ui.label(RichText::new(state.cache.source().to_string()).small());

    if let Some(ds) = state.dataset() {
        ui.add_space(4.0);
        ui.label(format!("{} rows × {} columns", ds.len(), ds.column_count()));
        if let Some(at) = state.cache.loaded_at() {
            ui.label(
                RichText::new(format!("loaded {}s ago", at.elapsed().as_secs()))
                    .small()
                    .weak(),
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = state.dataset() {
            ui.label(format!(
                "The dataset contains {} rows and {} columns.",
                ds.len(),
                ds.column_count()
            ));
        }

        if let Some(err) = &state.load_error {
            ui.separator();
            ui.label(RichText::new(format!("Error: {err}")).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel chrome
// ---------------------------------------------------------------------------

pub fn page_header(ui: &mut Ui, page: Page) {
    ui.vertical_centered(|ui| {
        ui.heading(RichText::new(page.title()).strong().size(28.0));
        ui.label(page.subtitle());
    });
    ui.separator();
}

/// Shown instead of every data view when the dataset failed to load.
pub fn load_warning(ui: &mut Ui, err: &DataError) {
    ui.add_space(12.0);
    ui.colored_label(Color32::from_rgb(0xE6, 0xA2, 0x3C), err.user_message());
    ui.label(RichText::new(err.to_string()).small().weak());
}

/// Shown in place of a single view whose inputs are unusable.
pub fn view_error(ui: &mut Ui, err: &DataError) {
    ui.colored_label(Color32::LIGHT_RED, err.user_message());
    if let DataError::MissingColumns { expected, .. } = err {
        ui.label(RichText::new(format!("Expected: {expected:?}")).small().weak());
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.open_path(path);
    }
}
