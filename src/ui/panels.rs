use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use crate::data::export;
use crate::data::model::{Table, Value};
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Columns that get a categorical filter widget: every value is text (or
/// null). Numeric and date columns are excluded; dates get the range picker.
fn categorical_columns(table: &Table) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|col| {
            let values = &table.unique_values[*col];
            !values.is_empty()
                && values
                    .iter()
                    .all(|v| matches!(v, Value::Text(_) | Value::Null))
        })
        .cloned()
        .collect()
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let table = match &state.table {
        Some(t) => t,
        None => {
            ui.label("No data loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state inside the loop.
    let columns = categorical_columns(table);
    let unique = table.unique_values.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Per-column filter widgets (collapsible) ----
            for col in &columns {
                let Some(all_values) = unique.get(col) else {
                    continue;
                };

                // Show count of selected / total in the header
                let n_selected = state.selected_count(col);
                let n_total = all_values.len();
                let header_text = format!("{col}  ({n_selected}/{n_total})");

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(col);
                            }
                            if ui.small_button("Clear").clicked() {
                                state.clear_column(col);
                            }
                        });

                        for val in all_values {
                            let mut checked = state.is_selected(col, val);
                            let label = match val {
                                Value::Null => "<blank>".to_string(),
                                other => other.to_string(),
                            };
                            if ui.checkbox(&mut checked, label).changed() {
                                state.toggle_filter_value(col, val);
                            }
                        }
                    });
            }

            // ---- Date range (when the table has a date column) ----
            if let Some(date_col) = state.date_column.clone() {
                ui.separator();
                ui.strong(&date_col);

                let mut changed = ui
                    .checkbox(&mut state.date_filter_on, "Filter by date")
                    .changed();

                if let (Some(mut start), Some(mut end)) = (state.date_start, state.date_end) {
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("From");
                        if ui
                            .add(DatePickerButton::new(&mut start).id_salt("date_from"))
                            .changed()
                        {
                            state.date_start = Some(start);
                            changed = true;
                        }
                    });
                    ui.horizontal(|ui: &mut Ui| {
                        ui.label("To");
                        if ui
                            .add(DatePickerButton::new(&mut end).id_salt("date_to"))
                            .changed()
                        {
                            state.date_end = Some(end);
                            changed = true;
                        }
                    });
                }

                if changed {
                    state.update_date_filter();
                }
            }
        });
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
            let can_export = state.table.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_csv_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        for (view, label) in [
            (View::Dashboard, "Dashboard"),
            (View::Data, "Data"),
            (View::Charts, "Charts"),
        ] {
            if ui.selectable_label(state.view == view, label).clicked() {
                state.view = view;
            }
        }

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} devices loaded, {} visible",
                table.len(),
                state.visible_indices.len()
            ));
        }

        if state.loading {
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Data view – the filtered table
// ---------------------------------------------------------------------------

/// Render the filtered rows as a scrollable table.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let table = match &state.table {
        Some(t) => t,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view data  (File → Open…)");
            });
            return;
        }
    };

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().resizable(true), table.columns.len())
        .header(20.0, |mut header| {
            for col in &table.columns {
                header.col(|ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let idx = state.visible_indices[row.index()];
                for cell in &table.rows[idx] {
                    row.col(|ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open monitoring data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    table.len(),
                    table.columns
                );
                state.set_table(table);
            }
            Err(e) => {
                // Parse failure: report it and keep the previous table.
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}

pub fn export_csv_dialog(state: &mut AppState) {
    let Some(filtered) = state.filtered_table() else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export filtered data")
        .set_file_name("filtered.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::export_csv(&filtered, &path) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", filtered.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export CSV: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
