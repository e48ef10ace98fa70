use async_trait::async_trait;
use edge_dashboard::analyzers::{
    CategoryCount, ParkingAnalyzer, ParkingDimension, SnapshotAnalyzer, TallyDimension,
    TrafficAnalyzer, TrafficDimension, TrafficSummary, TrafficTallyAnalyzer, WeatherAnalyzer,
};
use edge_dashboard::fetch::{DataSourceClient, HttpClient, SelectionGuard};
use edge_dashboard::mock_data;
use edge_dashboard::models::{
    DataKind, Dataset, DateSelection, DateWindow, Granularity, TrafficObservation,
    TravelDirection, VehicleClass,
};
use edge_dashboard::processors::{Bucket, RecordFilter, RecordTable, SortOrder};
use edge_dashboard::readers::CsvReader;
use edge_dashboard::store::DatasetStore;
use edge_dashboard::{DashboardError, Result};
use pretty_assertions::assert_eq;
use reqwest::Url;
use std::io::Write;
use tempfile::{Builder, TempDir};

fn traffic(timestamp: &str, speed: f64) -> TrafficObservation {
    TrafficObservation::new(timestamp, 1, VehicleClass::Car, TravelDirection::Left, speed)
}

#[test]
fn test_single_day_hourly_series() {
    let records = vec![
        traffic("2024-01-15 09:00:00", 20.0),
        traffic("2024-01-15 09:30:00", 40.0),
    ];
    let window = DateSelection::range("2024-01-15", "2024-01-15").resolve().unwrap();

    let buckets = TrafficAnalyzer::new().series(&records, &window);
    assert_eq!(
        buckets,
        vec![Bucket {
            key: "09:00".to_string(),
            summary: TrafficSummary {
                count: 2,
                avg_speed: 30.0,
                congested: true,
            },
        }]
    );
}

#[test]
fn test_three_day_range_switches_to_daily_buckets() {
    let records = vec![
        traffic("2024-01-15 09:00:00", 20.0),
        traffic("2024-01-15 09:30:00", 40.0),
    ];
    let analyzer = TrafficAnalyzer::new();

    let two_days = DateWindow::new("2024-01-15", "2024-01-16").unwrap();
    assert_eq!(analyzer.series_report(&records, &two_days).granularity, Granularity::Hourly);

    let three_days = DateWindow::new("2024-01-14", "2024-01-16").unwrap();
    let report = analyzer.series_report(&records, &three_days);
    assert_eq!(report.granularity, Granularity::Daily);
    assert_eq!(report.buckets.len(), 1);
    assert_eq!(report.buckets[0].key, "2024-01-15");
    assert_eq!(report.buckets[0].summary.count, 2);
    assert_eq!(report.buckets[0].summary.avg_speed, 30.0);
}

#[test]
fn test_degenerate_range_matches_single_date() {
    let records = mock_data::traffic();
    let single = RecordFilter::new(DateSelection::single("2024-01-15").resolve().unwrap());
    let range = RecordFilter::new(
        DateSelection::range("2024-01-15", "2024-01-15")
            .resolve()
            .unwrap(),
    );

    assert_eq!(single.select(&records), range.select(&records));
}

#[test]
fn test_bucket_counts_sum_to_window_count() {
    let records = mock_data::traffic();
    let window = DateWindow::single("2024-01-15").unwrap();
    let report = TrafficAnalyzer::new().series_report(&records, &window);

    let total: usize = report.buckets.iter().map(|b| b.summary.count).sum();
    assert_eq!(total, report.record_count);
    assert_eq!(total, records.len());
}

#[test]
fn test_garbage_timestamp_is_dropped() {
    let records = vec![traffic("garbage", 10.0), traffic("2024-01-15 09:00:00", 20.0)];
    let window = DateWindow::single("2024-01-15").unwrap();

    let report = TrafficAnalyzer::new().series_report(&records, &window);
    assert_eq!(report.buckets.len(), 1);
    assert_eq!(report.dropped_malformed, 1);
}

#[test]
fn test_empty_input_yields_empty_outputs() {
    let window = DateWindow::single("2024-01-15").unwrap();

    assert!(TrafficAnalyzer::new().series(&[], &window).is_empty());
    assert!(ParkingAnalyzer::new().series(&[], &window).is_empty());
    assert!(SnapshotAnalyzer::new().series(&[], &window).is_empty());
    assert!(WeatherAnalyzer::new().series(&[], &window).is_empty());
    assert!(TrafficAnalyzer::new()
        .category_breakdown(&[], TrafficDimension::Direction)
        .is_empty());
    assert!(ParkingAnalyzer::new()
        .category_breakdown(&[], ParkingDimension::UsageCategory)
        .is_empty());
}

#[test]
fn test_window_outside_data_is_empty_not_error() {
    let records = mock_data::weather();
    let window = DateWindow::new("2023-06-01", "2023-06-30").unwrap();
    let report = WeatherAnalyzer::new().series_report(&records, &window);

    assert!(report.is_empty());
    assert_eq!(report.record_count, 0);
}

#[test]
fn test_sample_parking_flow() {
    let records = mock_data::parking();
    let window = DateWindow::single("2024-01-15").unwrap();
    let buckets = ParkingAnalyzer::new().series(&records, &window);

    let keys: Vec<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
    assert_eq!(keys, vec!["14:00", "15:00"]);
    // 14:xx: 3 in, 1 out; 15:xx: 3 in, 3 out
    assert_eq!(buckets[0].summary.entries, 3);
    assert_eq!(buckets[0].summary.exits, 1);
    assert_eq!(buckets[0].summary.occupancy_delta, 50);
    assert_eq!(buckets[1].summary.occupancy_delta, 0);
}

#[test]
fn test_sample_usage_categories_per_strategy() {
    let window = DateWindow::single("2024-01-15").unwrap();
    let filter = RecordFilter::new(window);

    let events = mock_data::parking();
    let by_kana = ParkingAnalyzer::new()
        .category_breakdown(filter.select(&events), ParkingDimension::UsageCategory);
    assert_eq!(
        by_kana,
        vec![
            CategoryCount::new("private", 8),
            CategoryCount::new("commercial", 2),
        ]
    );

    let snapshots = mock_data::parking_snapshots();
    let by_stay = SnapshotAnalyzer::new()
        .category_breakdown(filter.select(&snapshots), ParkingDimension::UsageCategory);
    assert_eq!(
        by_stay,
        vec![
            CategoryCount::new("private", 9),
            CategoryCount::new("rental", 1),
        ]
    );
}

#[test]
fn test_csv_upload_feeds_the_engine() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("traffic.csv");
    std::fs::write(
        &path,
        "timestamp,object_id,class_name,direction,speed_kmh\n\
         2024-01-15 09:00:00,1,car,L,20.0\n\
         2024-01-15 09:30:00,2,truck,R,40.0\n\
         2024-01-16 10:15:00,3,bus,R,25.0\n",
    )
    .unwrap();

    let mut store = DatasetStore::new();
    let dataset = CsvReader::new().read_dataset(&path, DataKind::Traffic).unwrap();
    assert_eq!(dataset.len(), 3);
    store.replace(dataset);

    let Some(Dataset::Traffic(records)) = store.get(DataKind::Traffic) else {
        panic!("expected uploaded traffic");
    };
    let window = DateWindow::single("2024-01-15").unwrap();
    let buckets = TrafficAnalyzer::new().series(records, &window);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].summary.avg_speed, 30.0);
}

#[test]
fn test_rejected_upload_leaves_store_untouched() {
    let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(b"timestamp,object_id,class_name,direction,speed_kmh\n2024-01-15 09:00:00,1,car,L,fast\n")
        .unwrap();

    let mut store = DatasetStore::new();
    store.replace(mock_data::dataset(DataKind::Traffic));

    let err = CsvReader::new()
        .read_dataset(file.path(), DataKind::Traffic)
        .unwrap_err();
    assert!(err.is_parse_failure());
    assert!(!err.is_retryable());
    assert_eq!(store.get(DataKind::Traffic).map(|d| d.len()), Some(5));
}

struct StaticClient(&'static str);

#[async_trait]
impl HttpClient for StaticClient {
    async fn get(&self, _url: Url) -> Result<Vec<u8>> {
        Ok(self.0.as_bytes().to_vec())
    }
}

#[tokio::test]
async fn test_fetched_records_are_refiltered() {
    // The source ignores the date parameter and returns a neighbouring day too.
    let body = r#"[
        {"date":"2024-01-15","weather":"sunny","temperature":12,"humidity":45},
        {"date":"2024-01-16","weather":"cloudy","temperature":8,"humidity":62}
    ]"#;
    let source = DataSourceClient::new(StaticClient(body), "http://localhost:3001/api");
    let guard = SelectionGuard::new();
    let ticket = guard.issue(DateWindow::single("2024-01-16").unwrap());

    let dataset = source
        .fetch_for_ticket(&guard, &ticket, DataKind::Weather)
        .await
        .unwrap()
        .expect("latest ticket is accepted");
    let Dataset::Weather(records) = dataset else {
        panic!("expected weather");
    };

    let report = WeatherAnalyzer::new().series_report(&records, ticket.window());
    assert_eq!(report.record_count, 1);
    assert_eq!(report.buckets[0].key, "2024-01-16");
}

#[test]
fn test_invalid_selection_is_reported() {
    let err = DateSelection::default().resolve().unwrap_err();
    assert!(matches!(err, DashboardError::InvalidSelection(_)));

    let err = DateSelection::single("15/01/2024").resolve().unwrap_err();
    assert!(matches!(err, DashboardError::InvalidSelection(_)));
}

#[test]
fn test_interval_tally_upload_is_detected_and_aggregated() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("traffic_counts.csv");
    std::fs::write(
        &path,
        "timestamp,vehicle_count,avg_speed,vehicle_type,usage_type\n\
         2024-01-15 09:00:00,12,32.5,car,private\n\
         2024-01-15 09:20:00,36,24.5,truck,commercial\n\
         2024-01-16 09:00:00,20,50.0,car,rental\n",
    )
    .unwrap();

    let reader = CsvReader::new();
    let kind = reader.detect_kind(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(kind, DataKind::TrafficTally);

    let mut store = DatasetStore::new();
    store.replace(reader.read_dataset(&path, kind).unwrap());
    let Some(Dataset::TrafficTally(records)) = store.get(DataKind::TrafficTally) else {
        panic!("expected uploaded tallies");
    };

    let window = DateWindow::single("2024-01-15").unwrap();
    let buckets = TrafficTallyAnalyzer::new().series(records, &window);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].summary.vehicle_count, 48);
    // (12 * 32.5 + 36 * 24.5) / 48
    assert_eq!(buckets[0].summary.avg_speed, 26.5);
    assert!(buckets[0].summary.congested);

    let filter = RecordFilter::new(window);
    assert_eq!(
        TrafficTallyAnalyzer::new()
            .category_breakdown(filter.select(records), TallyDimension::VehicleType),
        vec![CategoryCount::new("truck", 36), CategoryCount::new("car", 12)]
    );
}

#[test]
fn test_record_table_lists_window_in_sorted_order() {
    let filter = RecordFilter::new(DateWindow::new("2024-01-16", "2024-01-18").unwrap());
    let mut table = RecordTable::windowed(&Dataset::Weather(mock_data::weather()), &filter).unwrap();
    table.sort_by("temperature", SortOrder::Descending).unwrap();

    let dates: Vec<&str> = table
        .rows()
        .iter()
        .filter_map(|row| row["date"].as_str())
        .collect();
    assert_eq!(dates, vec!["2024-01-18", "2024-01-16", "2024-01-17"]);
}
