use crate::error::{DashboardError, Result};
use crate::models::{
    DataKind, Dataset, ParkingEvent, ParkingSnapshot, TrafficObservation, TrafficTally,
    WeatherSample,
};
use crate::utils::constants::CSV_EXTENSION;
use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::SHIFT_JIS;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A required header, with the other spellings the device has used for it.
struct Column {
    name: &'static str,
    aliases: &'static [&'static str],
}

const fn column(name: &'static str) -> Column {
    Column { name, aliases: &[] }
}

const TRAFFIC_COLUMNS: [Column; 5] = [
    column("timestamp"),
    column("object_id"),
    Column { name: "class_name", aliases: &["vehicle_class"] },
    column("direction"),
    column("speed_kmh"),
];

const TRAFFIC_TALLY_COLUMNS: [Column; 5] = [
    column("timestamp"),
    column("vehicle_count"),
    column("avg_speed"),
    column("vehicle_type"),
    Column { name: "usage_type", aliases: &["usage_category"] },
];

const PARKING_COLUMNS: [Column; 8] = [
    column("timestamp"),
    column("object_id"),
    column("vehicle_type"),
    column("direction"),
    Column { name: "city", aliases: &["region_label"] },
    column("engine_size"),
    Column { name: "kana", aliases: &["kana_classifier"] },
    Column { name: "four-digit number", aliases: &["plate_number"] },
];

const SNAPSHOT_COLUMNS: [Column; 6] = [
    column("timestamp"),
    column("plate_region"),
    column("stay_duration"),
    column("entry_count"),
    column("exit_count"),
    column("occupancy_rate"),
];

const WEATHER_COLUMNS: [Column; 4] = [
    column("date"),
    Column { name: "weather", aliases: &["condition"] },
    Column { name: "temperature", aliases: &["temperature_c"] },
    Column { name: "humidity", aliases: &["humidity_percent"] },
];

fn required_columns(kind: DataKind) -> &'static [Column] {
    match kind {
        DataKind::Traffic => &TRAFFIC_COLUMNS,
        DataKind::TrafficTally => &TRAFFIC_TALLY_COLUMNS,
        DataKind::Parking => &PARKING_COLUMNS,
        DataKind::ParkingSnapshot => &SNAPSHOT_COLUMNS,
        DataKind::Weather => &WEATHER_COLUMNS,
    }
}

/// Header names for `kind`, in the order the device exports them. These are
/// also the field names records serialize under.
pub fn column_names(kind: DataKind) -> Vec<&'static str> {
    required_columns(kind).iter().map(|c| c.name).collect()
}

/// Resolve a header name or one of its aliases to the canonical name.
pub fn canonical_column(kind: DataKind, name: &str) -> Option<&'static str> {
    required_columns(kind)
        .iter()
        .find(|c| c.name == name || c.aliases.contains(&name))
        .map(|c| c.name)
}

/// One data row, with cells addressed by their position in the required
/// column list.
struct Row<'r> {
    record: &'r StringRecord,
    columns: &'static [Column],
    indices: &'r [usize],
    line: usize,
}

impl Row<'_> {
    fn text(&self, slot: usize) -> &str {
        self.record.get(self.indices[slot]).unwrap_or("")
    }

    fn parse<T: FromStr>(&self, slot: usize, expected: &'static str) -> Result<T> {
        let value = self.text(slot);
        value.parse::<T>().map_err(|_| DashboardError::InvalidCell {
            line: self.line,
            column: self.columns[slot].name.to_string(),
            value: value.to_string(),
            expected,
        })
    }

    fn percent(&self, slot: usize) -> Result<u8> {
        const EXPECTED: &str = "an integer 0-100";
        let value: u8 = self.parse(slot, EXPECTED)?;
        if value > 100 {
            return Err(DashboardError::InvalidCell {
                line: self.line,
                column: self.columns[slot].name.to_string(),
                value: value.to_string(),
                expected: EXPECTED,
            });
        }
        Ok(value)
    }
}

/// Parses uploaded CSV files into typed datasets.
///
/// An upload is accepted whole or not at all: a missing column, an empty file
/// or a single cell that cannot be coerced rejects it.
pub struct CsvReader {
    require_extension: bool,
}

impl CsvReader {
    pub fn new() -> Self {
        Self {
            require_extension: true,
        }
    }

    /// Accept files regardless of their extension.
    pub fn without_extension_check() -> Self {
        Self {
            require_extension: false,
        }
    }

    pub fn read_dataset(&self, path: &Path, kind: DataKind) -> Result<Dataset> {
        let result = self.check_extension(path).and_then(|_| {
            let bytes = std::fs::read(path)?;
            self.parse_bytes(&bytes, kind)
        });

        match &result {
            Ok(dataset) => info!(
                path = %path.display(),
                kind = %kind,
                records = dataset.len(),
                "Loaded CSV upload"
            ),
            Err(e) => warn!(path = %path.display(), kind = %kind, error = %e, "Rejected CSV upload"),
        }
        result
    }

    /// Runs [`read_dataset`](Self::read_dataset) on the blocking pool.
    pub async fn read_dataset_async(path: PathBuf, kind: DataKind) -> Result<Dataset> {
        tokio::task::spawn_blocking(move || CsvReader::new().read_dataset(&path, kind)).await?
    }

    pub fn parse_bytes(&self, bytes: &[u8], kind: DataKind) -> Result<Dataset> {
        self.parse_str(&decode_bytes(bytes), kind)
    }

    pub fn parse_str(&self, text: &str, kind: DataKind) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let columns = required_columns(kind);
        let indices = locate_columns(&headers, columns)?;

        let mut dataset = Dataset::empty(kind);
        let mut record = StringRecord::new();
        let mut row_index = 0usize;

        while reader.read_record(&mut record)? {
            row_index += 1;
            if record.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_index + 1);
            let row = Row {
                record: &record,
                columns,
                indices: &indices,
                line,
            };
            push_row(&mut dataset, &row)?;
        }

        if dataset.is_empty() {
            return Err(DashboardError::Parse("file has no data rows".to_string()));
        }

        debug!(kind = %kind, rows = dataset.len(), "Parsed CSV rows");
        Ok(dataset)
    }

    /// Guess the record kind from a header row: the first kind whose required
    /// columns are all present.
    pub fn detect_kind(&self, bytes: &[u8]) -> Result<DataKind> {
        let text = decode_bytes(bytes);
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = reader.headers()?.clone();

        // Snapshot headers are checked before the event ones they overlap with.
        [
            DataKind::ParkingSnapshot,
            DataKind::Parking,
            DataKind::Traffic,
            DataKind::TrafficTally,
            DataKind::Weather,
        ]
        .into_iter()
        .find(|kind| locate_columns(&headers, required_columns(*kind)).is_ok())
        .ok_or_else(|| {
            DashboardError::Parse("header does not match any known record layout".to_string())
        })
    }

    fn check_extension(&self, path: &Path) -> Result<()> {
        if !self.require_extension {
            return Ok(());
        }
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(CSV_EXTENSION));
        if is_csv {
            Ok(())
        } else {
            Err(DashboardError::Parse(format!(
                "{} is not a .csv file",
                path.display()
            )))
        }
    }
}

impl Default for CsvReader {
    fn default() -> Self {
        Self::new()
    }
}

/// UTF-8 (BOM stripped) when valid, otherwise Shift_JIS as exported by
/// Japanese spreadsheet tools.
pub fn decode_bytes(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, had_errors) = SHIFT_JIS.decode(bytes);
            if had_errors {
                warn!("CSV is neither valid UTF-8 nor Shift_JIS; undecodable bytes replaced");
            } else {
                debug!("Decoded CSV as Shift_JIS");
            }
            text.into_owned()
        }
    }
}

fn locate_columns(headers: &StringRecord, columns: &[Column]) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(columns.len());
    let mut missing = Vec::new();

    for column in columns {
        let found = headers.iter().position(|h| {
            h == column.name || column.aliases.iter().any(|alias| h == *alias)
        });
        match found {
            Some(index) => indices.push(index),
            None => missing.push(column.name.to_string()),
        }
    }

    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(DashboardError::MissingColumns(missing))
    }
}

fn push_row(dataset: &mut Dataset, row: &Row<'_>) -> Result<()> {
    match dataset {
        Dataset::Traffic(records) => records.push(TrafficObservation {
            timestamp: row.text(0).to_string(),
            object_id: row.parse(1, "an integer")?,
            vehicle_class: row.parse(2, "a vehicle class")?,
            direction: row.parse(3, "a direction (left/right)")?,
            speed_kmh: row.parse(4, "a number")?,
        }),
        Dataset::TrafficTally(records) => records.push(TrafficTally {
            timestamp: row.text(0).to_string(),
            vehicle_count: row.parse(1, "an integer")?,
            avg_speed: row.parse(2, "a number")?,
            vehicle_type: row.parse(3, "a vehicle class")?,
            usage_type: row.parse(4, "a usage type (private/commercial/rental/other)")?,
        }),
        Dataset::Parking(records) => records.push(ParkingEvent {
            timestamp: row.text(0).to_string(),
            object_id: row.parse(1, "an integer")?,
            vehicle_type: row.text(2).to_string(),
            direction: row.parse(3, "a direction (in/out)")?,
            region_label: row.text(4).to_string(),
            engine_size: row.parse(5, "an integer")?,
            kana_classifier: row.text(6).to_string(),
            plate_number: row.text(7).to_string(),
        }),
        Dataset::ParkingSnapshot(records) => records.push(ParkingSnapshot {
            timestamp: row.text(0).to_string(),
            plate_region: row.text(1).to_string(),
            stay_duration: row.parse(2, "an integer")?,
            entry_count: row.parse(3, "an integer")?,
            exit_count: row.parse(4, "an integer")?,
            occupancy_rate: row.parse(5, "a number")?,
        }),
        Dataset::Weather(records) => records.push(WeatherSample {
            date: row.text(0).to_string(),
            condition: row.parse(1, "a weather condition")?,
            temperature_c: row.parse(2, "an integer")?,
            humidity_percent: row.percent(3)?,
        }),
    }
    Ok(())
}
