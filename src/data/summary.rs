use std::collections::BTreeMap;

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Chart aggregations
// ---------------------------------------------------------------------------
//
// The charts themselves are drawn by egui_plot; this module computes the
// numbers behind them. Non-numeric cells are skipped, and an absent column
// yields an empty result so the caller can skip that chart for the render.

/// Sum `value_col` per distinct `key_col` value, groups in first-appearance
/// order (bar chart: total network traffic by location).
pub fn group_sum(table: &Table, key_col: &str, value_col: &str) -> Vec<(String, f64)> {
    let (Some(key_idx), Some(val_idx)) =
        (table.column_index(key_col), table.column_index(value_col))
    else {
        return Vec::new();
    };

    let mut order: Vec<String> = Vec::new();
    let mut sums: BTreeMap<String, f64> = BTreeMap::new();

    for row in &table.rows {
        let Some(v) = row[val_idx].as_f64() else {
            continue;
        };
        let key = row[key_idx].to_string();
        if !sums.contains_key(&key) {
            order.push(key.clone());
        }
        *sums.entry(key).or_insert(0.0) += v;
    }

    order
        .into_iter()
        .map(|k| {
            let total = sums[&k];
            (k, total)
        })
        .collect()
}

/// Equal-width histogram over the numeric cells of a column (memory usage
/// distribution).
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    /// Lower edge of the first bin.
    pub start: f64,
    /// Width of every bin.
    pub width: f64,
    /// Count of values per bin.
    pub counts: Vec<usize>,
}

/// Bin the numeric cells of `col` into `bins` equal-width buckets spanning
/// the observed range. `None` when the column is absent, has no numeric
/// cells, or `bins` is zero. A single distinct value lands in one bin of
/// unit width.
pub fn histogram(table: &Table, col: &str, bins: usize) -> Option<HistogramBins> {
    if bins == 0 {
        return None;
    }
    let idx = table.column_index(col)?;
    let values: Vec<f64> = table.rows.iter().filter_map(|r| r[idx].as_f64()).collect();
    if values.is_empty() {
        return None;
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let width = if range.abs() < f64::EPSILON {
        1.0
    } else {
        range / bins as f64
    };

    let mut counts = vec![0usize; bins];
    for v in values {
        let mut bin = ((v - min) / width) as usize;
        if bin >= bins {
            bin = bins - 1; // max value lands in the last bin
        }
        counts[bin] += 1;
    }

    Some(HistogramBins {
        start: min,
        width,
        counts,
    })
}

/// Equal-width histogram split by a grouping column. Bin edges are shared
/// across groups so the series can be stacked in one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedHistogram {
    /// Lower edge of the first bin.
    pub start: f64,
    /// Width of every bin.
    pub width: f64,
    /// Per-group bin counts, groups in first-appearance order.
    pub groups: Vec<(String, Vec<usize>)>,
}

/// Like [`histogram`] but with counts broken down per `group_col` value
/// (memory usage distribution coloured by device type). `None` when either
/// column is absent, there are no numeric cells, or `bins` is zero.
pub fn grouped_histogram(
    table: &Table,
    col: &str,
    group_col: &str,
    bins: usize,
) -> Option<GroupedHistogram> {
    if bins == 0 {
        return None;
    }
    let idx = table.column_index(col)?;
    let group_idx = table.column_index(group_col)?;

    let values: Vec<(String, f64)> = table
        .rows
        .iter()
        .filter_map(|r| Some((r[group_idx].to_string(), r[idx].as_f64()?)))
        .collect();
    if values.is_empty() {
        return None;
    }

    let min = values.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = values
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let width = if range.abs() < f64::EPSILON {
        1.0
    } else {
        range / bins as f64
    };

    let mut order: Vec<String> = Vec::new();
    let mut counts: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (key, v) in values {
        if !counts.contains_key(&key) {
            order.push(key.clone());
        }
        let slots = counts.entry(key).or_insert_with(|| vec![0; bins]);
        let mut bin = ((v - min) / width) as usize;
        if bin >= bins {
            bin = bins - 1; // max value lands in the last bin
        }
        slots[bin] += 1;
    }

    Some(GroupedHistogram {
        start: min,
        width,
        groups: order
            .into_iter()
            .filter_map(|k| counts.remove(&k).map(|c| (k, c)))
            .collect(),
    })
}

/// Five-number summary of one group for a box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct FiveNumber {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Five-number summary of `value_col` per distinct `group_col` value, groups
/// in first-appearance order (box plot: CPU usage by device type). Quartiles
/// use linear interpolation between order statistics.
pub fn box_stats(table: &Table, group_col: &str, value_col: &str) -> Vec<(String, FiveNumber)> {
    let (Some(group_idx), Some(val_idx)) =
        (table.column_index(group_col), table.column_index(value_col))
    else {
        return Vec::new();
    };

    let mut order: Vec<String> = Vec::new();
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for row in &table.rows {
        let Some(v) = row[val_idx].as_f64() else {
            continue;
        };
        let key = row[group_idx].to_string();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(v);
    }

    order
        .into_iter()
        .filter_map(|k| {
            let mut values = groups.remove(&k)?;
            values.sort_by(f64::total_cmp);
            Some((
                k,
                FiveNumber {
                    min: values[0],
                    q1: quantile(&values, 0.25),
                    median: quantile(&values, 0.5),
                    q3: quantile(&values, 0.75),
                    max: values[values.len() - 1],
                },
            ))
        })
        .collect()
}

/// Linear-interpolation quantile over sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traffic_table() -> Table {
        let rows = vec![
            ("NY", "Router", 100.0),
            ("LA", "Router", 40.0),
            ("NY", "Switch", 60.0),
            ("SF", "Switch", 10.0),
            ("LA", "Router", 5.0),
        ];
        Table::from_rows(
            vec![
                "Location".into(),
                "Device Type".into(),
                "Network Traffic (MB)".into(),
            ],
            rows.into_iter()
                .map(|(loc, dev, mb)| {
                    vec![
                        Value::Text(loc.into()),
                        Value::Text(dev.into()),
                        Value::Float(mb),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn group_sum_in_first_appearance_order() {
        let sums = group_sum(&traffic_table(), "Location", "Network Traffic (MB)");
        assert_eq!(
            sums,
            vec![
                ("NY".to_string(), 160.0),
                ("LA".to_string(), 45.0),
                ("SF".to_string(), 10.0),
            ]
        );
    }

    #[test]
    fn group_sum_over_absent_column_is_empty() {
        assert!(group_sum(&traffic_table(), "Region", "Network Traffic (MB)").is_empty());
    }

    #[test]
    fn histogram_covers_the_range() {
        let h = histogram(&traffic_table(), "Network Traffic (MB)", 4).unwrap();
        assert_eq!(h.start, 5.0);
        assert_eq!(h.counts.iter().sum::<usize>(), 5);
        // 100.0 is the max and must land in the last bin, not overflow.
        assert_eq!(*h.counts.last().unwrap(), 1);
    }

    #[test]
    fn histogram_of_constant_column() {
        let table = Table::from_rows(
            vec!["v".into()],
            vec![vec![Value::Float(3.0)], vec![Value::Float(3.0)]],
        );
        let h = histogram(&table, "v", 10).unwrap();
        assert_eq!(h.counts[0], 2);
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn grouped_histogram_splits_counts_per_group() {
        let h = grouped_histogram(
            &traffic_table(),
            "Network Traffic (MB)",
            "Device Type",
            4,
        )
        .unwrap();
        // Same bin edges as the ungrouped histogram.
        let flat = histogram(&traffic_table(), "Network Traffic (MB)", 4).unwrap();
        assert_eq!(h.start, flat.start);
        assert_eq!(h.width, flat.width);

        // Groups in first-appearance order, per-group counts summing to the
        // ungrouped bins.
        let names: Vec<&str> = h.groups.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, vec!["Router", "Switch"]);
        for bin in 0..4 {
            let stacked: usize = h.groups.iter().map(|(_, c)| c[bin]).sum();
            assert_eq!(stacked, flat.counts[bin]);
        }
    }

    #[test]
    fn grouped_histogram_over_absent_group_column_is_none() {
        assert!(
            grouped_histogram(&traffic_table(), "Network Traffic (MB)", "Region", 4).is_none()
        );
    }

    #[test]
    fn box_stats_five_numbers() {
        let table = Table::from_rows(
            vec!["Device Type".into(), "CPU Usage (%)".into()],
            [10.0, 20.0, 30.0, 40.0, 50.0]
                .iter()
                .map(|&v| vec![Value::Text("Router".into()), Value::Float(v)])
                .collect(),
        );
        let stats = box_stats(&table, "Device Type", "CPU Usage (%)");
        assert_eq!(stats.len(), 1);
        let (group, five) = &stats[0];
        assert_eq!(group, "Router");
        assert_eq!(five.min, 10.0);
        assert_eq!(five.q1, 20.0);
        assert_eq!(five.median, 30.0);
        assert_eq!(five.q3, 40.0);
        assert_eq!(five.max, 50.0);
    }
}
