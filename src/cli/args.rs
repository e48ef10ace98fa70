use crate::models::{DataKind, DateSelection};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edge-dashboard")]
#[command(about = "Time-bucketed aggregation of edge device traffic, parking and weather data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Settings file [default: ./edge-dashboard.toml if present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bucketed series for a date selection
    Series {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Category counts for a date selection
    Breakdown {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(
            long,
            value_enum,
            help = "Category to slice by [default: vehicle-class, region or condition]"
        )]
        dimension: Option<DimensionArg>,
    },

    /// Record counts, granularity and default breakdown in one view
    Summary {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Records inside a date selection, as a table sorted on one column
    Records {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        #[arg(
            long,
            value_name = "COLUMN",
            help = "Column to sort by, e.g. speed_kmh [default: timestamp or date]"
        )]
        sort: Option<String>,

        #[arg(long, help = "Sort descending")]
        desc: bool,
    },

    /// Check a CSV file against the upload rules without aggregating it
    Validate {
        #[arg(short, long, help = "CSV file to check")]
        file: PathBuf,

        #[arg(short, long, help = "Record kind [default: detected from the header]")]
        kind: Option<DataKind>,
    },
}

/// Where records come from. Without `--csv` or `--fetch` the built-in sample
/// dataset is used.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[arg(
        short,
        long,
        help = "Record kind: traffic, traffic-tally, parking, parking-snapshot or weather"
    )]
    pub kind: DataKind,

    #[arg(long, conflicts_with = "fetch", help = "Uploaded CSV file")]
    pub csv: Option<PathBuf>,

    #[arg(long, help = "Fetch from the data source")]
    pub fetch: bool,

    #[arg(long, requires = "fetch", help = "Data source base URL [default: from settings]")]
    pub api_base_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    #[arg(short, long, conflicts_with_all = ["start", "end"], help = "Single date (YYYY-MM-DD)")]
    pub date: Option<String>,

    #[arg(long, requires = "end", help = "Range start, inclusive (YYYY-MM-DD)")]
    pub start: Option<String>,

    #[arg(long, requires = "start", help = "Range end, inclusive (YYYY-MM-DD)")]
    pub end: Option<String>,
}

impl SelectionArgs {
    pub fn to_selection(&self) -> DateSelection {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => DateSelection::range(start, end),
            _ => DateSelection {
                selected_date: self.date.clone(),
                ..DateSelection::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DimensionArg {
    VehicleClass,
    Direction,
    VehicleType,
    Region,
    UsageCategory,
    UsageType,
    Condition,
}

impl DimensionArg {
    /// The value as typed on the command line, e.g. `vehicle-type`.
    pub fn flag_value(&self) -> String {
        self.to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_else(|| format!("{:?}", self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_flags_become_range_selection() {
        let cli = Cli::try_parse_from([
            "edge-dashboard",
            "series",
            "--kind",
            "traffic",
            "--start",
            "2024-01-14",
            "--end",
            "2024-01-16",
        ])
        .unwrap();

        let Commands::Series { source, selection } = cli.command else {
            panic!("expected series command");
        };
        assert_eq!(source.kind, DataKind::Traffic);
        assert_eq!(
            selection.to_selection(),
            DateSelection::range("2024-01-14", "2024-01-16")
        );
    }

    #[test]
    fn test_date_conflicts_with_range() {
        let result = Cli::try_parse_from([
            "edge-dashboard",
            "series",
            "--kind",
            "weather",
            "--date",
            "2024-01-15",
            "--start",
            "2024-01-14",
            "--end",
            "2024-01-16",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = Cli::try_parse_from(["edge-dashboard", "summary", "--kind", "bicycles"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_records_sort_flags() {
        let cli = Cli::try_parse_from([
            "edge-dashboard",
            "records",
            "--kind",
            "traffic-tally",
            "--date",
            "2024-01-15",
            "--sort",
            "avg_speed",
            "--desc",
        ])
        .unwrap();

        let Commands::Records {
            source, sort, desc, ..
        } = cli.command
        else {
            panic!("expected records command");
        };
        assert_eq!(source.kind, DataKind::TrafficTally);
        assert_eq!(sort.as_deref(), Some("avg_speed"));
        assert!(desc);
    }

    #[test]
    fn test_dimension_flag_value() {
        assert_eq!(DimensionArg::VehicleType.flag_value(), "vehicle-type");
        assert_eq!(DimensionArg::UsageType.flag_value(), "usage-type");
    }
}
