use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use tracing::debug;

use crate::error::{DashboardError, Result};
use crate::models::{DataKind, Dataset, Observation};
use crate::processors::RecordFilter;
use crate::readers::{canonical_column, column_names};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// The records of one kind inside a window, flattened to named cells.
///
/// Cells keep their JSON types so numeric columns sort by value and text
/// columns (timestamps included) sort lexically.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    kind: DataKind,
    columns: Vec<&'static str>,
    rows: Vec<Map<String, Value>>,
    dropped_malformed: usize,
}

impl RecordTable {
    pub fn from_records<R: Serialize>(kind: DataKind, records: &[&R]) -> Result<Self> {
        let rows = records
            .iter()
            .map(|record| match serde_json::to_value(record)? {
                Value::Object(cells) => Ok(cells),
                other => Err(DashboardError::Json(serde::ser::Error::custom(format!(
                    "{} record serialized as {} instead of an object",
                    kind, other
                )))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            kind,
            columns: column_names(kind),
            rows,
            dropped_malformed: 0,
        })
    }

    /// Table of the records `filter` selects, in dataset order.
    pub fn windowed(dataset: &Dataset, filter: &RecordFilter) -> Result<Self> {
        fn build<R: Observation + Serialize>(
            kind: DataKind,
            records: &[R],
            filter: &RecordFilter,
        ) -> Result<RecordTable> {
            let filtered = filter.apply(records);
            let mut table = RecordTable::from_records(kind, &filtered.records)?;
            table.dropped_malformed = filtered.dropped_malformed;
            Ok(table)
        }

        let kind = dataset.kind();
        match dataset {
            Dataset::Traffic(r) => build(kind, r, filter),
            Dataset::TrafficTally(r) => build(kind, r, filter),
            Dataset::Parking(r) => build(kind, r, filter),
            Dataset::ParkingSnapshot(r) => build(kind, r, filter),
            Dataset::Weather(r) => build(kind, r, filter),
        }
    }

    /// Stable sort on one column; rows with equal cells keep their order.
    /// Header aliases accepted by the CSV reader name the same column.
    pub fn sort_by(&mut self, column: &str, order: SortOrder) -> Result<()> {
        let key = canonical_column(self.kind, column).ok_or_else(|| DashboardError::UnknownColumn {
            column: column.to_string(),
            kind: self.kind.to_string(),
        })?;

        self.rows.sort_by(|a, b| {
            let ordering = compare_cells(a.get(key), b.get(key));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        debug!(kind = %self.kind, column = key, ?order, rows = self.rows.len(), "Sorted record table");
        Ok(())
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    pub fn rows(&self) -> &[Map<String, Value>] {
        &self.rows
    }

    pub fn dropped_malformed(&self) -> usize {
        self.dropped_malformed
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Serialize for RecordTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.rows.serialize(serializer)
    }
}

/// Left-aligned columns, two spaces apart, under a dashed rule.
impl std::fmt::Display for RecordTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| self.columns.iter().map(|c| cell_text(row.get(*c))).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = self.columns.iter().map(|c| c.to_string()).collect();
        write_line(f, &header, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &rule, &widths)?;
        for row in &cells {
            write_line(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_line(f: &mut std::fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> std::fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Numbers by value, strings lexically; mismatched types by type rank.
fn compare_cells(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(_) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data;
    use crate::models::{DateWindow, TrafficObservation, TravelDirection, VehicleClass};
    use pretty_assertions::assert_eq;

    fn sample_traffic_table() -> RecordTable {
        let filter = RecordFilter::new(DateWindow::single("2024-01-15").unwrap());
        RecordTable::windowed(&Dataset::Traffic(mock_data::traffic()), &filter).unwrap()
    }

    fn object_ids(table: &RecordTable) -> Vec<u64> {
        table
            .rows()
            .iter()
            .map(|row| row["object_id"].as_u64().unwrap())
            .collect()
    }

    #[test]
    fn test_sort_by_speed() {
        let mut table = sample_traffic_table();

        table.sort_by("speed_kmh", SortOrder::Ascending).unwrap();
        assert_eq!(object_ids(&table), vec![9, 1, 10, 7, 8]);

        table.sort_by("speed_kmh", SortOrder::Descending).unwrap();
        assert_eq!(object_ids(&table), vec![8, 7, 10, 1, 9]);
    }

    #[test]
    fn test_equal_cells_keep_window_order() {
        let mut table = sample_traffic_table();

        table.sort_by("class_name", SortOrder::Ascending).unwrap();
        assert_eq!(object_ids(&table), vec![9, 1, 7, 10, 8]);

        table.sort_by("class_name", SortOrder::Descending).unwrap();
        assert_eq!(object_ids(&table), vec![8, 1, 7, 10, 9]);
    }

    #[test]
    fn test_timestamp_sort_is_chronological() {
        let mut records = mock_data::traffic();
        records.reverse();
        let filter = RecordFilter::new(DateWindow::single("2024-01-15").unwrap());
        let mut table = RecordTable::windowed(&Dataset::Traffic(records), &filter).unwrap();

        assert_eq!(object_ids(&table), vec![10, 9, 8, 7, 1]);
        table.sort_by("timestamp", SortOrder::Ascending).unwrap();
        assert_eq!(object_ids(&table), vec![1, 7, 8, 9, 10]);
    }

    #[test]
    fn test_alias_and_unknown_columns() {
        let mut table = sample_traffic_table();
        table.sort_by("vehicle_class", SortOrder::Ascending).unwrap();
        assert_eq!(object_ids(&table)[0], 9);

        let err = table.sort_by("avg_speed", SortOrder::Ascending).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Column 'avg_speed' does not exist in traffic records"
        );
    }

    #[test]
    fn test_only_windowed_records_are_listed() {
        let mut records = mock_data::traffic();
        records.push(TrafficObservation::new("garbage", 99, VehicleClass::Car, TravelDirection::Left, 1.0));
        records.push(TrafficObservation::new(
            "2024-01-16 09:00:00",
            100,
            VehicleClass::Car,
            TravelDirection::Left,
            1.0,
        ));
        let filter = RecordFilter::new(DateWindow::single("2024-01-15").unwrap());
        let table = RecordTable::windowed(&Dataset::Traffic(records), &filter).unwrap();

        assert_eq!(table.len(), 5);
        assert_eq!(table.dropped_malformed(), 1);
    }

    #[test]
    fn test_text_layout() {
        let filter = RecordFilter::new(DateWindow::single("2024-01-15").unwrap());
        let table = RecordTable::windowed(&Dataset::Weather(mock_data::weather()), &filter).unwrap();
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            vec![
                "date        weather  temperature  humidity",
                "----------  -------  -----------  --------",
                "2024-01-15  sunny    12           45",
            ]
        );
    }

    #[test]
    fn test_json_rows_use_device_field_names() {
        let filter = RecordFilter::new(DateWindow::single("2024-01-15").unwrap());
        let table =
            RecordTable::windowed(&Dataset::TrafficTally(mock_data::traffic_tallies()), &filter).unwrap();
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json.as_array().map(|rows| rows.len()), Some(10));
        assert_eq!(json[0]["usage_type"], "private");
        assert_eq!(json[0]["vehicle_count"], 45);
    }
}
