use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::data::filter::{apply, filtered_indices, ColumnFilter, FilterSpec};
use crate::data::model::{Table, Value};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which page of the dashboard is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Data,
    Charts,
}

/// The full UI state, independent of rendering. This is the session: the
/// table lives here from a successful load until the next load replaces it,
/// and is never mutated in place.
pub struct AppState {
    /// Loaded table (None until the user loads a file).
    pub table: Option<Table>,

    /// Per-column filter selections. An absent column or empty selection
    /// set means "no constraint".
    pub filters: FilterSpec,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Active page.
    pub view: View,

    /// Name of the date column, when the table has one.
    pub date_column: Option<String>,

    /// Date-range picker state; only applied while `date_filter_on`.
    pub date_filter_on: bool,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            filters: FilterSpec::default(),
            visible_indices: Vec::new(),
            view: View::Dashboard,
            date_column: None,
            date_filter_on: false,
            date_start: None,
            date_end: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded table: reset filters (nothing selected → show
    /// all) and seed the date-range picker from the data.
    pub fn set_table(&mut self, table: Table) {
        self.filters = FilterSpec::default();
        self.visible_indices = (0..table.len()).collect();

        self.date_column = table
            .columns
            .iter()
            .find(|col| {
                table.unique_values[*col]
                    .iter()
                    .any(|v| matches!(v, Value::Date(_)))
            })
            .cloned();
        self.date_filter_on = false;
        let bounds = self.date_column.as_ref().map(|col| {
            let dates: Vec<NaiveDate> = table.unique_values[col]
                .iter()
                .filter_map(|v| v.as_date())
                .collect();
            (dates.first().copied(), dates.last().copied())
        });
        (self.date_start, self.date_end) = bounds.unwrap_or((None, None));

        self.table = Some(table);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = filtered_indices(table, &self.filters);
        }
    }

    /// Materialize the filtered view (for metrics, charts, export).
    pub fn filtered_table(&self) -> Option<Table> {
        self.table.as_ref().map(|t| apply(t, &self.filters))
    }

    /// Toggle a single value in a column's categorical selection.
    pub fn toggle_filter_value(&mut self, column: &str, value: &Value) {
        let entry = self
            .filters
            .entry(column.to_string())
            .or_insert_with(|| ColumnFilter::OneOf(BTreeSet::new()));
        if let ColumnFilter::OneOf(selected) = entry {
            if selected.contains(value) {
                selected.remove(value);
            } else {
                selected.insert(value.clone());
            }
        }
        self.refilter();
    }

    /// Select every value in a column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(table) = &self.table {
            if let Some(all_vals) = table.unique_values.get(column) {
                self.filters
                    .insert(column.to_string(), ColumnFilter::OneOf(all_vals.clone()));
                self.refilter();
            }
        }
    }

    /// Clear a column's selection (back to "no constraint").
    pub fn clear_column(&mut self, column: &str) {
        self.filters.remove(column);
        self.refilter();
    }

    /// Whether a value is currently selected in a column's filter.
    pub fn is_selected(&self, column: &str, value: &Value) -> bool {
        matches!(
            self.filters.get(column),
            Some(ColumnFilter::OneOf(selected)) if selected.contains(value)
        )
    }

    /// How many values are selected in a column's filter.
    pub fn selected_count(&self, column: &str) -> usize {
        match self.filters.get(column) {
            Some(ColumnFilter::OneOf(selected)) => selected.len(),
            _ => 0,
        }
    }

    /// Sync the date-range constraint with the picker state.
    pub fn update_date_filter(&mut self) {
        let Some(col) = self.date_column.clone() else {
            return;
        };
        match (self.date_filter_on, self.date_start, self.date_end) {
            (true, Some(start), Some(end)) => {
                self.filters
                    .insert(col, ColumnFilter::DateRange { start, end });
            }
            _ => {
                self.filters.remove(&col);
            }
        }
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::from_rows(
            vec!["Location".into(), "Date".into()],
            vec![
                vec![
                    Value::Text("NY".into()),
                    Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                ],
                vec![
                    Value::Text("LA".into()),
                    Value::Date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
                ],
            ],
        )
    }

    #[test]
    fn set_table_resets_filters_and_seeds_dates() {
        let mut state = AppState::default();
        state.toggle_filter_value("Location", &Value::Text("NY".into()));
        state.set_table(sample_table());

        assert!(state.filters.is_empty());
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.date_column.as_deref(), Some("Date"));
        assert_eq!(state.date_start, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(state.date_end, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn toggle_then_clear_restores_all_rows() {
        let mut state = AppState::default();
        state.set_table(sample_table());

        state.toggle_filter_value("Location", &Value::Text("NY".into()));
        assert_eq!(state.visible_indices, vec![0]);

        state.clear_column("Location");
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn date_filter_follows_picker_state() {
        let mut state = AppState::default();
        state.set_table(sample_table());

        state.date_filter_on = true;
        state.date_end = NaiveDate::from_ymd_opt(2024, 3, 2);
        state.update_date_filter();
        assert_eq!(state.visible_indices, vec![0]);

        state.date_filter_on = false;
        state.update_date_filter();
        assert_eq!(state.visible_indices, vec![0, 1]);
    }
}
