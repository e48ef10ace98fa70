/// Record kind identifiers, as used in data source paths and CLI flags
pub const KIND_TRAFFIC: &str = "traffic";
pub const KIND_TRAFFIC_TALLY: &str = "traffic-tally";
pub const KIND_PARKING: &str = "parking";
pub const KIND_PARKING_SNAPSHOT: &str = "parking-snapshot";
pub const KIND_WEATHER: &str = "weather";

/// Windows covering at least this many calendar days bucket by day
pub const DAILY_BUCKET_MIN_DAYS: i64 = 3;

/// Traffic buckets at or below this average speed are flagged as congested
pub const DEFAULT_CONGESTION_THRESHOLD_KMH: f64 = 30.0;

/// Stay-duration heuristic thresholds (minutes)
pub const COMMERCIAL_MIN_STAY_MINUTES: u32 = 180;
pub const RENTAL_MAX_STAY_MINUTES: u32 = 120;
pub const DEFAULT_RENTAL_REGION: &str = "Kobe";

/// Data source defaults
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration
pub const CONFIG_FILE_STEM: &str = "edge-dashboard";
pub const ENV_PREFIX: &str = "EDGE_DASHBOARD";

/// Upload files must carry this extension (case-insensitive)
pub const CSV_EXTENSION: &str = "csv";

/// Label used for parking records with an empty region
pub const UNKNOWN_REGION: &str = "unknown";
