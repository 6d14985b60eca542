use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Dashboard metrics
// ---------------------------------------------------------------------------

/// Column and sentinel names expected by convention in monitoring exports.
pub const STATUS_COLUMN: &str = "Status";
pub const CPU_COLUMN: &str = "CPU Usage (%)";
pub const ONLINE_STATUS: &str = "Online";

/// Scalar summaries shown in the dashboard metric boxes. Recomputed from the
/// filtered table on every render, never cached.
///
/// `None` marks an expected column that is absent from the table; the UI
/// reports that for the render instead of showing a number.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    /// Total rows in the (filtered) table.
    pub count: usize,
    /// Rows whose `Status` cell equals `"Online"`; `None` when the table
    /// has no `Status` column.
    pub online_count: Option<usize>,
    /// Mean of the numeric `CPU Usage (%)` cells: NaN when there are none,
    /// `None` when the column itself is missing.
    pub avg_cpu: Option<f64>,
}

/// Compute the dashboard metrics. A missing `Status` or `CPU Usage (%)`
/// column yields `None` for that field so the caller can report it for
/// this render; session state is untouched.
pub fn metrics(table: &Table) -> Metrics {
    let online_count = table.column_index(STATUS_COLUMN).map(|idx| {
        table
            .rows
            .iter()
            .filter(|row| matches!(&row[idx], Value::Text(s) if s == ONLINE_STATUS))
            .count()
    });

    let avg_cpu = table.column_index(CPU_COLUMN).map(|idx| {
        let cpu: Vec<f64> = table
            .rows
            .iter()
            .filter_map(|row| row[idx].as_f64())
            .collect();
        if cpu.is_empty() {
            f64::NAN
        } else {
            cpu.iter().sum::<f64>() / cpu.len() as f64
        }
    });

    Metrics {
        count: table.len(),
        online_count,
        avg_cpu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, ColumnFilter, FilterSpec};

    fn status_cpu_table(rows: &[(&str, f64)]) -> Table {
        Table::from_rows(
            vec![STATUS_COLUMN.into(), CPU_COLUMN.into()],
            rows.iter()
                .map(|(status, cpu)| {
                    vec![Value::Text((*status).into()), Value::Float(*cpu)]
                })
                .collect(),
        )
    }

    #[test]
    fn counts_and_average() {
        let table = status_cpu_table(&[("Online", 10.0), ("Offline", 50.0)]);
        let m = metrics(&table);
        assert_eq!(m.count, 2);
        assert_eq!(m.online_count, Some(1));
        assert_eq!(m.avg_cpu, Some(30.0));
    }

    #[test]
    fn empty_table_yields_nan_average() {
        let table = status_cpu_table(&[]);
        let m = metrics(&table);
        assert_eq!(m.count, 0);
        assert_eq!(m.online_count, Some(0));
        assert!(m.avg_cpu.is_some_and(f64::is_nan));
    }

    #[test]
    fn missing_expected_columns_are_reported_absent() {
        let table = Table::from_rows(
            vec!["Location".into()],
            vec![vec![Value::Text("NY".into())]],
        );
        let m = metrics(&table);
        assert_eq!(m.count, 1);
        // No silent zero: the absent columns must be visible to the caller
        // so the render can flag them.
        assert_eq!(m.online_count, None);
        assert_eq!(m.avg_cpu, None);
    }

    #[test]
    fn count_after_filter_matches_direct_recount() {
        let table = status_cpu_table(&[
            ("Online", 10.0),
            ("Offline", 50.0),
            ("Online", 25.0),
            ("Online", 75.0),
        ]);
        let spec = FilterSpec::from([(
            STATUS_COLUMN.to_string(),
            ColumnFilter::OneOf([Value::Text(ONLINE_STATUS.into())].into()),
        )]);
        let filtered = apply(&table, &spec);
        let recount = table
            .rows
            .iter()
            .filter(|row| row[0] == Value::Text(ONLINE_STATUS.into()))
            .count();
        assert_eq!(metrics(&filtered).count, recount);
        assert_eq!(metrics(&filtered).online_count, Some(recount));
    }
}
