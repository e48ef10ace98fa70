use crate::analyzers::breakdown::total;
use crate::analyzers::{
    CategoryCount, ParkingAnalyzer, ParkingDimension, SnapshotAnalyzer, TallyDimension,
    TrafficAnalyzer, TrafficDimension, TrafficTallyAnalyzer, WeatherAnalyzer,
};
use crate::cli::args::{Cli, Commands, DimensionArg, SelectionArgs, SourceArgs};
use crate::error::{DashboardError, Result};
use crate::fetch::{BasicClient, DataSourceClient, SelectionGuard};
use crate::mock_data;
use crate::models::{DataKind, Dataset, DateWindow, Granularity, Observation};
use crate::processors::{RecordFilter, RecordTable, Series, SortOrder};
use crate::readers::CsvReader;
use crate::settings::Settings;
use crate::store::DatasetStore;
use crate::utils::progress::ProgressReporter;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let settings = Settings::load(cli.config.as_deref())?;
    let mut session = Session::new(settings, cli.json);

    match cli.command {
        Commands::Series { source, selection } => {
            let (window, dataset) = session.load(&source, &selection).await?;
            session.print_series(&dataset, &window)?;
        }

        Commands::Breakdown {
            source,
            selection,
            dimension,
        } => {
            let (window, dataset) = session.load(&source, &selection).await?;
            let counts = session.breakdown(&dataset, &window, dimension)?;
            session.print_breakdown(&counts)?;
        }

        Commands::Summary { source, selection } => {
            let (window, dataset) = session.load(&source, &selection).await?;
            let summary = session.summarize(&dataset, &window)?;
            session.print_summary(&summary)?;
        }

        Commands::Records {
            source,
            selection,
            sort,
            desc,
        } => {
            let (window, dataset) = session.load(&source, &selection).await?;
            let order = if desc { SortOrder::Descending } else { SortOrder::Ascending };
            let table = session.records(&dataset, &window, sort.as_deref(), order)?;
            session.print_records(&table)?;
        }

        Commands::Validate { file, kind } => {
            validate_upload(&file, kind, cli.json)?;
        }
    }

    Ok(())
}

/// Stderr logging always; a second, plain-text copy when `--log-file` is set.
/// `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let stderr_layer = fmt::layer()
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let file_layer = match log_file {
        Some(path) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(File::create(path)?))
                .with_filter(filter()),
        ),
        None => None,
    };

    // A subscriber may already be installed when embedded or under test.
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    Ok(())
}

/// Upload store, selection guard and settings for one invocation.
struct Session {
    settings: Settings,
    store: DatasetStore,
    guard: SelectionGuard,
    source: &'static str,
    json: bool,
}

#[derive(Debug, Serialize)]
struct DatasetSummary {
    kind: DataKind,
    source: &'static str,
    window: DateWindow,
    granularity: Granularity,
    records_in_window: usize,
    dropped_malformed: usize,
    buckets: usize,
    breakdown: Vec<CategoryCount>,
}

impl Session {
    fn new(settings: Settings, json: bool) -> Self {
        Self {
            settings,
            store: DatasetStore::new(),
            guard: SelectionGuard::new(),
            source: "sample data",
            json,
        }
    }

    async fn load(
        &mut self,
        source: &SourceArgs,
        selection: &SelectionArgs,
    ) -> Result<(DateWindow, Dataset)> {
        let window = selection.to_selection().resolve()?;
        let kind = source.kind;

        if let Some(path) = &source.csv {
            let progress = ProgressReporter::new_spinner(
                &format!("Reading {}...", path.display()),
                self.json,
            );
            let dataset = CsvReader::read_dataset_async(path.clone(), kind).await?;
            progress.finish_with_message(&format!("Loaded {} {} records", dataset.len(), kind));
            self.store.replace(dataset);
        }

        if let Some(uploaded) = self.store.get(kind) {
            self.source = "upload";
            return Ok((window, uploaded.clone()));
        }

        if !source.fetch {
            debug!(kind = %kind, "Using built-in sample data");
            self.source = "sample data";
            return Ok((window, mock_data::dataset(kind)));
        }

        let base_url = source
            .api_base_url
            .as_deref()
            .unwrap_or(&self.settings.api_base_url);
        let client = DataSourceClient::new(
            BasicClient::with_timeout(self.settings.request_timeout())?,
            base_url,
        );

        let progress = ProgressReporter::new_spinner("Connecting to data source...", self.json);
        let ticket = self.guard.issue(window.clone());
        progress.set_message(&format!("Fetching {} records for {}...", kind, ticket.window()));
        let fetched = client.fetch_for_ticket(&self.guard, &ticket, kind).await;
        progress.finish_and_clear();

        let dataset = fetched?.unwrap_or_else(|| Dataset::empty(kind));
        self.source = "data source";
        Ok((window, dataset))
    }

    fn traffic_analyzer(&self) -> TrafficAnalyzer {
        TrafficAnalyzer::new().with_congestion_threshold(self.settings.congestion_threshold_kmh)
    }

    fn tally_analyzer(&self) -> TrafficTallyAnalyzer {
        TrafficTallyAnalyzer::new().with_congestion_threshold(self.settings.congestion_threshold_kmh)
    }

    fn snapshot_analyzer(&self) -> SnapshotAnalyzer {
        SnapshotAnalyzer::new().with_rental_region(&self.settings.rental_region)
    }

    fn print_series(&self, dataset: &Dataset, window: &DateWindow) -> Result<()> {
        match dataset {
            Dataset::Traffic(records) => {
                let report = self.traffic_analyzer().series_report(records, window);
                self.emit_series(&report, |s| {
                    format!(
                        "count={:<4} avg_speed={:>5.1} km/h{}",
                        s.count,
                        s.avg_speed,
                        if s.congested { "  congested" } else { "" }
                    )
                })
            }
            Dataset::TrafficTally(records) => {
                let report = self.tally_analyzer().series_report(records, window);
                self.emit_series(&report, |s| {
                    format!(
                        "vehicles={:<5} intervals={:<3} avg_speed={:>5.1} km/h{}",
                        s.vehicle_count,
                        s.intervals,
                        s.avg_speed,
                        if s.congested { "  congested" } else { "" }
                    )
                })
            }
            Dataset::Parking(records) => {
                let report = ParkingAnalyzer::new().series_report(records, window);
                self.emit_series(&report, |s| {
                    format!(
                        "entries={:<4} exits={:<4} occupancy_delta={:+}%",
                        s.entries, s.exits, s.occupancy_delta
                    )
                })
            }
            Dataset::ParkingSnapshot(records) => {
                let report = self.snapshot_analyzer().series_report(records, window);
                self.emit_series(&report, |s| {
                    format!(
                        "count={:<4} entries={:<4} exits={:<4} occupancy={:>5.1}% avg_stay={:.1} min",
                        s.count, s.entries, s.exits, s.occupancy_rate_percent, s.avg_stay_minutes
                    )
                })
            }
            Dataset::Weather(records) => {
                let report = WeatherAnalyzer::new().series_report(records, window);
                self.emit_series(&report, |s| {
                    format!(
                        "count={:<4} avg_temp={:>5.1}°C avg_humidity={:.1}%",
                        s.count, s.avg_temperature, s.avg_humidity
                    )
                })
            }
        }
    }

    fn emit_series<S: Serialize>(&self, report: &Series<S>, line: impl Fn(&S) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(report)?);
            return Ok(());
        }

        println!(
            "Window: {} ({} buckets, {} records)",
            report.window, report.granularity, report.record_count
        );
        if report.dropped_malformed > 0 {
            println!("⚠️  Skipped {} malformed records", report.dropped_malformed);
        }
        if report.is_empty() {
            println!("No records in the selected window");
            return Ok(());
        }
        for bucket in &report.buckets {
            println!("{:>10}  {}", bucket.key, line(&bucket.summary));
        }
        Ok(())
    }

    fn breakdown(
        &self,
        dataset: &Dataset,
        window: &DateWindow,
        dimension: Option<DimensionArg>,
    ) -> Result<Vec<CategoryCount>> {
        let filter = RecordFilter::new(window.clone());
        let unsupported = |dim: DimensionArg| DashboardError::UnsupportedDimension {
            dimension: dim.flag_value(),
            kind: dataset.kind().to_string(),
        };

        let counts = match dataset {
            Dataset::Traffic(records) => {
                let dim = match dimension {
                    None | Some(DimensionArg::VehicleClass) => TrafficDimension::VehicleClass,
                    Some(DimensionArg::Direction) => TrafficDimension::Direction,
                    Some(other) => return Err(unsupported(other)),
                };
                self.traffic_analyzer()
                    .category_breakdown(filter.select(records), dim)
            }
            Dataset::TrafficTally(records) => {
                let dim = match dimension {
                    None | Some(DimensionArg::VehicleType) => TallyDimension::VehicleType,
                    Some(DimensionArg::UsageType | DimensionArg::UsageCategory) => {
                        TallyDimension::UsageType
                    }
                    Some(other) => return Err(unsupported(other)),
                };
                self.tally_analyzer()
                    .category_breakdown(filter.select(records), dim)
            }
            Dataset::Parking(records) => {
                let dim = match dimension {
                    None | Some(DimensionArg::Region) => ParkingDimension::Region,
                    Some(DimensionArg::VehicleType) => ParkingDimension::VehicleType,
                    Some(DimensionArg::UsageCategory) => ParkingDimension::UsageCategory,
                    Some(other) => return Err(unsupported(other)),
                };
                ParkingAnalyzer::new().category_breakdown(filter.select(records), dim)
            }
            Dataset::ParkingSnapshot(records) => {
                let dim = match dimension {
                    None | Some(DimensionArg::Region) => ParkingDimension::Region,
                    Some(DimensionArg::UsageCategory) => ParkingDimension::UsageCategory,
                    Some(other) => return Err(unsupported(other)),
                };
                self.snapshot_analyzer()
                    .category_breakdown(filter.select(records), dim)
            }
            Dataset::Weather(records) => match dimension {
                None | Some(DimensionArg::Condition) => {
                    WeatherAnalyzer::new().category_breakdown(filter.select(records))
                }
                Some(other) => return Err(unsupported(other)),
            },
        };

        Ok(counts)
    }

    fn print_breakdown(&self, counts: &[CategoryCount]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(counts)?);
            return Ok(());
        }
        if counts.is_empty() {
            println!("No records in the selected window");
            return Ok(());
        }

        let total = total(counts);
        for entry in counts {
            println!(
                "{:<16} {:>6}  {:>5.1}%",
                entry.label,
                entry.count,
                entry.count as f64 * 100.0 / total as f64
            );
        }
        Ok(())
    }

    fn summarize(&self, dataset: &Dataset, window: &DateWindow) -> Result<DatasetSummary> {
        let kind = dataset.kind();
        let breakdown = self.breakdown(dataset, window, None)?;

        let summary = match dataset {
            Dataset::Traffic(records) => {
                self.overview(kind, &self.traffic_analyzer().series_report(records, window), breakdown)
            }
            Dataset::TrafficTally(records) => {
                self.overview(kind, &self.tally_analyzer().series_report(records, window), breakdown)
            }
            Dataset::Parking(records) => {
                self.overview(kind, &ParkingAnalyzer::new().series_report(records, window), breakdown)
            }
            Dataset::ParkingSnapshot(records) => {
                self.overview(kind, &self.snapshot_analyzer().series_report(records, window), breakdown)
            }
            Dataset::Weather(records) => {
                self.overview(kind, &WeatherAnalyzer::new().series_report(records, window), breakdown)
            }
        };
        Ok(summary)
    }

    fn overview<S>(
        &self,
        kind: DataKind,
        report: &Series<S>,
        breakdown: Vec<CategoryCount>,
    ) -> DatasetSummary {
        DatasetSummary {
            kind,
            source: self.source,
            window: report.window.clone(),
            granularity: report.granularity,
            records_in_window: report.record_count,
            dropped_malformed: report.dropped_malformed,
            buckets: report.buckets.len(),
            breakdown,
        }
    }

    fn records(
        &self,
        dataset: &Dataset,
        window: &DateWindow,
        sort: Option<&str>,
        order: SortOrder,
    ) -> Result<RecordTable> {
        let mut table = RecordTable::windowed(dataset, &RecordFilter::new(window.clone()))?;
        let column = match sort {
            Some(column) => column,
            None => table.columns().first().copied().unwrap_or("timestamp"),
        };
        table.sort_by(column, order)?;
        Ok(table)
    }

    fn print_records(&self, table: &RecordTable) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(table)?);
            return Ok(());
        }

        if table.dropped_malformed() > 0 {
            println!("⚠️  Skipped {} malformed records", table.dropped_malformed());
        }
        if table.is_empty() {
            println!("No records in the selected window");
            return Ok(());
        }
        print!("{}", table);
        println!("{} {} records ({})", table.len(), table.kind(), self.source);
        Ok(())
    }

    fn print_summary(&self, summary: &DatasetSummary) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(summary)?);
            return Ok(());
        }

        println!("Kind:        {} ({})", summary.kind, summary.source);
        println!("Window:      {}", summary.window);
        println!("Granularity: {}", summary.granularity);
        println!("Records:     {}", summary.records_in_window);
        println!("Buckets:     {}", summary.buckets);
        if summary.dropped_malformed > 0 {
            println!("Malformed:   {}", summary.dropped_malformed);
        }
        if let Some(top) = summary.breakdown.first() {
            println!("Top:         {} ({})", top.label, top.count);
        }
        Ok(())
    }
}

fn validate_upload(path: &Path, kind: Option<DataKind>, json: bool) -> Result<()> {
    let reader = CsvReader::new();
    let kind = match kind {
        Some(kind) => kind,
        None => {
            let bytes = std::fs::read(path)?;
            let detected = reader.detect_kind(&bytes)?;
            info!(kind = %detected, "Detected record kind from header");
            detected
        }
    };

    let dataset = reader.read_dataset(path, kind)?;
    let malformed = count_malformed(&dataset);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "file": path.display().to_string(),
                "kind": kind,
                "records": dataset.len(),
                "malformed_timestamps": malformed,
            })
        );
        return Ok(());
    }

    println!("✅ {}: {} {} records", path.display(), dataset.len(), kind);
    if malformed > 0 {
        println!(
            "⚠️  {} records have malformed timestamps and will be left out of every window",
            malformed
        );
    }
    Ok(())
}

fn count_malformed(dataset: &Dataset) -> usize {
    fn malformed<R: Observation>(records: &[R]) -> usize {
        records.iter().filter(|r| !r.is_well_formed()).count()
    }

    match dataset {
        Dataset::Traffic(r) => malformed(r),
        Dataset::TrafficTally(r) => malformed(r),
        Dataset::Parking(r) => malformed(r),
        Dataset::ParkingSnapshot(r) => malformed(r),
        Dataset::Weather(r) => malformed(r),
    }
}
