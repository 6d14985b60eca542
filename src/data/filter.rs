use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Filter predicate: per-column constraints built from the UI selections
// ---------------------------------------------------------------------------

/// Constraint on a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Keep rows whose cell is a member of the set (categorical columns).
    /// An empty set means "no constraint" (nothing selected → show all),
    /// matching the multiselect convention of the original dashboard.
    OneOf(BTreeSet<Value>),
    /// Keep rows whose cell is a date within `[start, end]`, inclusive on
    /// both ends. Non-date cells (including malformed dates kept as text)
    /// never match.
    DateRange { start: NaiveDate, end: NaiveDate },
}

impl ColumnFilter {
    fn is_noop(&self) -> bool {
        matches!(self, ColumnFilter::OneOf(set) if set.is_empty())
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            ColumnFilter::OneOf(selected) => selected.contains(value),
            ColumnFilter::DateRange { start, end } => {
                value.as_date().is_some_and(|d| d >= *start && d <= *end)
            }
        }
    }
}

/// Per-column constraints: maps column_name → constraint.
/// Columns absent from the map are unconstrained.
pub type FilterSpec = BTreeMap<String, ColumnFilter>;

/// Return indices of rows that pass all active constraints, in table order.
///
/// A row passes a column constraint when:
/// * The column is absent from the table → passes (constraint is a no-op)
/// * The constraint's selection set is empty → passes (no constraint)
/// * The row's cell for that column matches the constraint
pub fn filtered_indices(table: &Table, spec: &FilterSpec) -> Vec<usize> {
    let active: Vec<(usize, &ColumnFilter)> = spec
        .iter()
        .filter(|(_, f)| !f.is_noop())
        .filter_map(|(col, f)| table.column_index(col).map(|idx| (idx, f)))
        .collect();

    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| active.iter().all(|(idx, f)| f.matches(&row[*idx])))
        .map(|(i, _)| i)
        .collect()
}

/// Materialize the filtered view: same columns, the subset of rows passing
/// `spec`, with a freshly built value index.
pub fn apply(table: &Table, spec: &FilterSpec) -> Table {
    let rows: Vec<Vec<Value>> = filtered_indices(table, spec)
        .into_iter()
        .map(|i| table.rows[i].clone())
        .collect();
    Table::from_rows(table.columns.clone(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device_table() -> Table {
        let rows = vec![
            ("NY", "Router", "Online", "2024-03-01"),
            ("NY", "Switch", "Offline", "2024-03-02"),
            ("LA", "Router", "Online", "2024-03-03"),
            ("NY", "Firewall", "Online", "bad-date"),
            ("LA", "Switch", "Offline", ""),
        ];
        Table::from_rows(
            vec![
                "Location".into(),
                "Device Type".into(),
                "Status".into(),
                "Date".into(),
            ],
            rows.into_iter()
                .map(|(loc, dev, status, date)| {
                    let date_val = match date {
                        "" => Value::Null,
                        d => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                            .map(Value::Date)
                            .unwrap_or_else(|_| Value::Text(d.into())),
                    };
                    vec![
                        Value::Text(loc.into()),
                        Value::Text(dev.into()),
                        Value::Text(status.into()),
                        date_val,
                    ]
                })
                .collect(),
        )
    }

    fn one_of(values: &[&str]) -> ColumnFilter {
        ColumnFilter::OneOf(values.iter().map(|v| Value::Text((*v).into())).collect())
    }

    #[test]
    fn empty_spec_is_identity() {
        let table = device_table();
        let filtered = apply(&table, &FilterSpec::new());
        assert_eq!(filtered, table);
    }

    #[test]
    fn empty_selection_set_is_no_constraint() {
        let table = device_table();
        let spec = FilterSpec::from([("Location".to_string(), one_of(&[]))]);
        assert_eq!(apply(&table, &spec), table);
    }

    #[test]
    fn categorical_filter_keeps_matching_rows_in_order() {
        let table = device_table();
        let spec = FilterSpec::from([("Location".to_string(), one_of(&["NY"]))]);
        let filtered = apply(&table, &spec);
        assert_eq!(filtered.len(), 3);
        for row in 0..filtered.len() {
            assert_eq!(
                filtered.value(row, "Location"),
                Some(&Value::Text("NY".into()))
            );
        }
        // Source order preserved: Router, Switch, Firewall.
        assert_eq!(
            filtered.value(2, "Device Type"),
            Some(&Value::Text("Firewall".into()))
        );
    }

    #[test]
    fn constraints_compose_conjunctively() {
        let table = device_table();
        let spec = FilterSpec::from([
            ("Location".to_string(), one_of(&["NY"])),
            ("Status".to_string(), one_of(&["Online"])),
        ]);
        let filtered = apply(&table, &spec);
        assert_eq!(filtered.len(), 2);
        let indices = filtered_indices(&table, &spec);
        assert_eq!(indices, vec![0, 3]);
    }

    #[test]
    fn filtered_rows_are_a_subset_without_duplication() {
        let table = device_table();
        let spec = FilterSpec::from([("Status".to_string(), one_of(&["Offline"]))]);
        let indices = filtered_indices(&table, &spec);
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(indices, sorted);
        assert!(indices.iter().all(|&i| i < table.len()));
    }

    #[test]
    fn absent_column_constraint_is_a_noop() {
        let table = device_table();
        let spec = FilterSpec::from([("Uptime (days)".to_string(), one_of(&["7"]))]);
        assert_eq!(apply(&table, &spec), table);
    }

    #[test]
    fn date_range_is_inclusive_and_skips_non_dates() {
        let table = device_table();
        let spec = FilterSpec::from([(
            "Date".to_string(),
            ColumnFilter::DateRange {
                start: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                end: NaiveDate::from_ymd_opt(2024, 3, 3).unwrap(),
            },
        )]);
        // Rows 1 and 2 fall in range; the malformed-date and null rows drop.
        assert_eq!(filtered_indices(&table, &spec), vec![1, 2]);
    }
}
