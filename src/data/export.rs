use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Write the table as CSV: header row in table column order, comma-separated,
/// UTF-8, no index column. Cell formatting round-trips through the CSV
/// loader (floats use shortest-round-trip formatting, dates ISO-8601, nulls
/// become empty fields).
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.columns)
        .context("writing CSV header")?;
    for (row_no, row) in table.rows.iter().enumerate() {
        wtr.write_record(row.iter().map(csv_field))
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }
    wtr.flush().context("flushing CSV output")?;
    Ok(())
}

/// Serialize one cell. Whole floats keep a `.0` suffix so the loader reads
/// them back as floats rather than integers.
fn csv_field(value: &Value) -> String {
    match value {
        Value::Float(v) if v.fract() == 0.0 && v.is_finite() => format!("{v:.1}"),
        other => other.to_string(),
    }
}

/// Export the table to a file on disk.
pub fn export_csv(table: &Table, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(table, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, ColumnFilter, FilterSpec};
    use crate::data::loader::read_csv;
    use crate::data::model::Value;
    use chrono::NaiveDate;

    #[test]
    fn export_then_reparse_is_identity() {
        let table = Table::from_rows(
            vec![
                "Location".into(),
                "CPU Usage (%)".into(),
                "Date".into(),
                "Note".into(),
            ],
            vec![
                vec![
                    Value::Text("NY".into()),
                    Value::Float(41.5),
                    Value::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
                    Value::Null,
                ],
                vec![
                    Value::Text("LA".into()),
                    Value::Integer(7),
                    Value::Null,
                    Value::Text("spare, unit".into()),
                ],
            ],
        );

        let mut buf = Vec::new();
        write_csv(&table, &mut buf).unwrap();
        let reparsed = read_csv(buf.as_slice()).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn whole_floats_survive_the_round_trip() {
        let table = Table::from_rows(
            vec!["CPU Usage (%)".into()],
            vec![vec![Value::Float(30.0)], vec![Value::Integer(30)]],
        );
        let mut buf = Vec::new();
        write_csv(&table, &mut buf).unwrap();
        assert_eq!(String::from_utf8_lossy(&buf), "CPU Usage (%)\n30.0\n30\n");
        assert_eq!(read_csv(buf.as_slice()).unwrap(), table);
    }

    #[test]
    fn filtered_export_keeps_column_order() {
        let table = Table::from_rows(
            vec!["Status".into(), "Location".into()],
            vec![
                vec![Value::Text("Online".into()), Value::Text("NY".into())],
                vec![Value::Text("Offline".into()), Value::Text("LA".into())],
            ],
        );
        let spec = FilterSpec::from([(
            "Status".to_string(),
            ColumnFilter::OneOf([Value::Text("Online".into())].into()),
        )]);
        let filtered = apply(&table, &spec);

        let mut buf = Vec::new();
        write_csv(&filtered, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Status,Location\nOnline,NY\n");
    }
}
