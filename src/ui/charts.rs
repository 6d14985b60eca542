use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot};

use crate::color::ColorMap;
use crate::data::metrics::{metrics, CPU_COLUMN, STATUS_COLUMN};
use crate::data::model::Table;
use crate::data::summary::{box_stats, group_sum, grouped_histogram, histogram};
use crate::state::AppState;

/// Grouping and value columns expected by convention.
const DEVICE_COLUMN: &str = "Device Type";
const LOCATION_COLUMN: &str = "Location";
const MEMORY_COLUMN: &str = "Memory Usage (%)";
const TRAFFIC_COLUMN: &str = "Network Traffic (MB)";

const GREEN: Color32 = Color32::from_rgb(0x27, 0xae, 0x60);
const BLUE: Color32 = Color32::from_rgb(0x29, 0x80, 0xb9);
const RED: Color32 = Color32::from_rgb(0xc0, 0x39, 0x2b);

// ---------------------------------------------------------------------------
// Dashboard view – metric boxes + quick charts
// ---------------------------------------------------------------------------

/// Render the dashboard overview for the currently filtered table.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(filtered) = state.filtered_table() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to begin  (File → Open…)");
        });
        return;
    };

    let m = metrics(&filtered);

    ui.columns(3, |cols: &mut [Ui]| {
        metric_box(&mut cols[0], "Total Devices", &m.count.to_string(), GREEN);

        // An absent expected column is reported for this render instead of
        // showing a silent zero.
        match m.online_count {
            Some(n) => metric_box(&mut cols[1], "Online Devices", &n.to_string(), BLUE),
            None => missing_metric(&mut cols[1], "Online Devices", STATUS_COLUMN),
        }
        match m.avg_cpu {
            Some(avg) => {
                let text = if avg.is_nan() {
                    "NaN".to_string()
                } else {
                    format!("{avg:.2}%")
                };
                metric_box(&mut cols[2], "Avg. CPU Usage", &text, RED);
            }
            None => missing_metric(&mut cols[2], "Avg. CPU Usage", CPU_COLUMN),
        }
    });

    ui.separator();
    ui.strong("Quick Stats");

    ui.columns(2, |cols: &mut [Ui]| {
        cpu_box_plot(&mut cols[0], &filtered, "dash_cpu_box");
        memory_histogram(&mut cols[1], &filtered, 30, "dash_mem_hist");
    });
}

fn metric_box(ui: &mut Ui, title: &str, value: &str, color: Color32) {
    ui.group(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(title).strong());
            ui.heading(RichText::new(value).color(color).size(28.0));
        });
    });
}

fn missing_metric(ui: &mut Ui, title: &str, column: &str) {
    ui.group(|ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.label(RichText::new(title).strong());
            ui.label(
                RichText::new(format!("{column} column missing")).color(Color32::GRAY),
            );
        });
    });
}

// ---------------------------------------------------------------------------
// Charts view – full-width visualizations
// ---------------------------------------------------------------------------

/// Render the visualizations page for the currently filtered table.
pub fn charts_view(ui: &mut Ui, state: &AppState) {
    let Some(filtered) = state.filtered_table() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view charts  (File → Open…)");
        });
        return;
    };

    eframe::egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("CPU Usage by Device Type");
            cpu_box_plot(ui, &filtered, "charts_cpu_box");
            ui.separator();

            ui.strong("Memory Usage Distribution");
            memory_histogram(ui, &filtered, 40, "charts_mem_hist");
            ui.separator();

            ui.strong("Total Network Traffic by Location");
            traffic_bar_chart(ui, &filtered, "charts_traffic_bar");
        });
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

/// Box plot of CPU usage per device type. Skipped (with a note) when the
/// required columns are absent or carry no numeric data.
fn cpu_box_plot(ui: &mut Ui, table: &Table, id: &str) {
    let stats = box_stats(table, DEVICE_COLUMN, CPU_COLUMN);
    if stats.is_empty() {
        missing_chart(ui, &format!("{DEVICE_COLUMN} / {CPU_COLUMN}"));
        return;
    }
    let color_map = group_colors(table, DEVICE_COLUMN);

    Plot::new(id.to_string())
        .legend(Legend::default())
        .y_axis_label(CPU_COLUMN)
        .height(260.0)
        .show(ui, |plot_ui| {
            for (i, (group, five)) in stats.iter().enumerate() {
                let color = color_map
                    .as_ref()
                    .map(|cm| cm.color_for_label(group))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(five.min, five.q1, five.median, five.q3, five.max),
                )
                .fill(color);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(group).color(color));
            }
        });
}

/// Histogram of memory usage over `bins` equal-width buckets, stacked per
/// device type when that column is present (falls back to a single series
/// otherwise).
fn memory_histogram(ui: &mut Ui, table: &Table, bins: usize, id: &str) {
    if let Some(h) = grouped_histogram(table, MEMORY_COLUMN, DEVICE_COLUMN, bins) {
        let color_map = group_colors(table, DEVICE_COLUMN);
        // Running stack height per bin.
        let mut base = vec![0.0f64; bins];

        Plot::new(id.to_string())
            .legend(Legend::default())
            .x_axis_label(MEMORY_COLUMN)
            .y_axis_label("Devices")
            .height(260.0)
            .show(ui, |plot_ui| {
                for (group, counts) in &h.groups {
                    let color = color_map
                        .as_ref()
                        .map(|cm| cm.color_for_label(group))
                        .unwrap_or(Color32::LIGHT_BLUE);
                    let bars: Vec<Bar> = counts
                        .iter()
                        .enumerate()
                        .map(|(i, &count)| {
                            Bar::new(h.start + (i as f64 + 0.5) * h.width, count as f64)
                                .width(h.width)
                                .base_offset(base[i])
                                .fill(color)
                        })
                        .collect();
                    for (i, &count) in counts.iter().enumerate() {
                        base[i] += count as f64;
                    }
                    plot_ui.bar_chart(BarChart::new(bars).name(group).color(color));
                }
            });
        return;
    }

    let Some(h) = histogram(table, MEMORY_COLUMN, bins) else {
        missing_chart(ui, MEMORY_COLUMN);
        return;
    };

    let bars: Vec<Bar> = h
        .counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            Bar::new(h.start + (i as f64 + 0.5) * h.width, count as f64).width(h.width)
        })
        .collect();

    Plot::new(id.to_string())
        .x_axis_label(MEMORY_COLUMN)
        .y_axis_label("Devices")
        .height(260.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(MEMORY_COLUMN).color(BLUE));
        });
}

/// Bar chart of summed network traffic per location, one legend entry per
/// location.
fn traffic_bar_chart(ui: &mut Ui, table: &Table, id: &str) {
    let sums = group_sum(table, LOCATION_COLUMN, TRAFFIC_COLUMN);
    if sums.is_empty() {
        missing_chart(ui, &format!("{LOCATION_COLUMN} / {TRAFFIC_COLUMN}"));
        return;
    }
    let color_map = group_colors(table, LOCATION_COLUMN);

    Plot::new(id.to_string())
        .legend(Legend::default())
        .y_axis_label(TRAFFIC_COLUMN)
        .height(260.0)
        .show(ui, |plot_ui| {
            for (i, (location, total)) in sums.iter().enumerate() {
                let color = color_map
                    .as_ref()
                    .map(|cm| cm.color_for_label(location))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let bar = Bar::new(i as f64, *total).width(0.6).fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(location).color(color));
            }
        });
}

fn group_colors(table: &Table, column: &str) -> Option<ColorMap> {
    table.unique_values.get(column).map(ColorMap::new)
}

fn missing_chart(ui: &mut Ui, columns: &str) {
    ui.label(
        RichText::new(format!("Chart unavailable: no usable data in {columns}"))
            .color(Color32::GRAY),
    );
}
