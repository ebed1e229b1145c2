use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::EXPORT_FILE_NAME;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    // Clone what we need so we can mutate state inside the loops.
    let platforms = state.domain.platforms.clone();
    let content_types = state.domain.content_types.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let header = format!(
                "Platform(s)  ({}/{})",
                state.filters.platforms.len(),
                platforms.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("platforms")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_platforms(true);
                        }
                        if ui.small_button("None").clicked() {
                            state.select_all_platforms(false);
                        }
                    });
                    for platform in &platforms {
                        let mut checked = state.filters.platforms.contains(platform);
                        let text = RichText::new(platform).color(state.platform_colors.color_for(platform));
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_platform(platform);
                        }
                    }
                });

            let header = format!(
                "Content Type(s)  ({}/{})",
                state.filters.content_types.len(),
                content_types.len()
            );
            egui::CollapsingHeader::new(RichText::new(header).strong())
                .id_salt("content_types")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_content_types(true);
                        }
                        if ui.small_button("None").clicked() {
                            state.select_all_content_types(false);
                        }
                    });
                    for content_type in &content_types {
                        let mut checked = state.filters.content_types.contains(content_type);
                        if ui.checkbox(&mut checked, content_type).changed() {
                            state.toggle_content_type(content_type);
                        }
                    }
                });

            ui.separator();
            sales_range(ui, state);
        });
}

/// Two sliders bounding monthly sales, limited to the observed range.
fn sales_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Monthly Sales Range");

    let bounds = state.domain.sales_min..=state.domain.sales_max;
    let mut min = state.filters.sales_min();
    let mut max = state.filters.sales_max();

    let min_changed = ui
        .add(egui::Slider::new(&mut min, bounds.clone()).text("min"))
        .changed();
    let max_changed = ui
        .add(egui::Slider::new(&mut max, bounds).text("max"))
        .changed();

    if min_changed {
        state.filters.set_sales_min(min);
    }
    if max_changed {
        state.filters.set_sales_max(max);
    }
    if min_changed || max_changed {
        let (lo, hi) = (state.filters.sales_min(), state.filters.sales_max());
        state.set_sales_range(lo, hi);
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
            if ui.button("Export filtered data…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} campaigns loaded, {} visible",
            state.table.len(),
            state.summary.row_count
        ));

        ui.separator();

        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::LIGHT_GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open campaign data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_directory(&state.export_dir)
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_filtered(&path);
    }
}
