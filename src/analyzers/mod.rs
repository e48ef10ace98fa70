pub mod breakdown;
pub mod parking_analyzer;
pub mod traffic_analyzer;
pub mod usage_classifier;
pub mod weather_analyzer;

pub use breakdown::{tally, tally_weighted, CategoryCount};
pub use parking_analyzer::{
    OccupancyRateSummary, ParkingAnalyzer, ParkingDimension, ParkingFlowSummary, SnapshotAnalyzer,
};
pub use traffic_analyzer::{
    TallyDimension, TrafficAnalyzer, TrafficDimension, TrafficSummary, TrafficTallyAnalyzer,
    TrafficTallySummary,
};
pub use usage_classifier::{KanaTableClassifier, StayDurationClassifier, UsageClassifier};
pub use weather_analyzer::{WeatherAnalyzer, WeatherSummary};
