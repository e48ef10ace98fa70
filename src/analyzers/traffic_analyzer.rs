use serde::{Deserialize, Serialize};

use crate::analyzers::breakdown::{tally, tally_weighted, CategoryCount};
use crate::models::{DateWindow, TrafficObservation, TrafficTally};
use crate::processors::{compute_series, Bucket, BucketReducer, Series};
use crate::utils::constants::DEFAULT_CONGESTION_THRESHOLD_KMH;
use crate::utils::rounding::{mean, round_to};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficSummary {
    pub count: usize,
    /// km/h, one decimal
    pub avg_speed: f64,
    /// Average speed at or below the congestion threshold
    pub congested: bool,
}

#[derive(Debug, Default)]
pub struct TrafficAccumulator {
    count: usize,
    speed_sum: f64,
}

/// What a traffic pie chart slices by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrafficDimension {
    #[default]
    VehicleClass,
    Direction,
}

pub struct TrafficAnalyzer {
    congestion_threshold_kmh: f64,
}

impl TrafficAnalyzer {
    pub fn new() -> Self {
        Self {
            congestion_threshold_kmh: DEFAULT_CONGESTION_THRESHOLD_KMH,
        }
    }

    pub fn with_congestion_threshold(mut self, threshold_kmh: f64) -> Self {
        self.congestion_threshold_kmh = threshold_kmh;
        self
    }

    /// Count and mean speed per bucket for the records inside `window`.
    pub fn series(
        &self,
        records: &[TrafficObservation],
        window: &DateWindow,
    ) -> Vec<Bucket<TrafficSummary>> {
        self.series_report(records, window).buckets
    }

    pub fn series_report(
        &self,
        records: &[TrafficObservation],
        window: &DateWindow,
    ) -> Series<TrafficSummary> {
        compute_series(records, window, self)
    }

    /// Tally over the given records; callers pass an already-windowed set.
    pub fn category_breakdown<'a, I>(&self, records: I, dimension: TrafficDimension) -> Vec<CategoryCount>
    where
        I: IntoIterator<Item = &'a TrafficObservation>,
    {
        let records = records.into_iter();
        match dimension {
            TrafficDimension::VehicleClass => tally(records.map(|r| r.vehicle_class.as_str())),
            TrafficDimension::Direction => tally(records.map(|r| r.direction.as_str())),
        }
    }
}

impl BucketReducer for TrafficAnalyzer {
    type Record = TrafficObservation;
    type Accumulator = TrafficAccumulator;
    type Summary = TrafficSummary;

    fn accumulate(&self, acc: &mut TrafficAccumulator, record: &TrafficObservation) {
        acc.count += 1;
        acc.speed_sum += record.speed_kmh;
    }

    fn finish(&self, acc: TrafficAccumulator) -> TrafficSummary {
        let avg_speed = mean(acc.speed_sum, acc.count)
            .map(|m| round_to(m, 1))
            .unwrap_or(0.0);
        TrafficSummary {
            count: acc.count,
            avg_speed,
            congested: acc.count > 0 && avg_speed <= self.congestion_threshold_kmh,
        }
    }
}

impl Default for TrafficAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-bucket totals for interval tallies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficTallySummary {
    /// Tally rows in the bucket
    pub intervals: usize,
    pub vehicle_count: u64,
    /// Vehicle-weighted mean of the interval speeds, km/h, one decimal
    pub avg_speed: f64,
    pub congested: bool,
}

#[derive(Debug, Default)]
pub struct TrafficTallyAccumulator {
    intervals: usize,
    vehicles: u64,
    weighted_speed_sum: f64,
}

/// What an interval-tally pie chart slices by. Slices are sized by vehicle
/// count, not by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TallyDimension {
    #[default]
    VehicleType,
    UsageType,
}

/// Reduces pre-aggregated interval tallies. Each row's `avg_speed` counts
/// `vehicle_count` times.
pub struct TrafficTallyAnalyzer {
    congestion_threshold_kmh: f64,
}

impl TrafficTallyAnalyzer {
    pub fn new() -> Self {
        Self {
            congestion_threshold_kmh: DEFAULT_CONGESTION_THRESHOLD_KMH,
        }
    }

    pub fn with_congestion_threshold(mut self, threshold_kmh: f64) -> Self {
        self.congestion_threshold_kmh = threshold_kmh;
        self
    }

    pub fn series(&self, records: &[TrafficTally], window: &DateWindow) -> Vec<Bucket<TrafficTallySummary>> {
        self.series_report(records, window).buckets
    }

    pub fn series_report(&self, records: &[TrafficTally], window: &DateWindow) -> Series<TrafficTallySummary> {
        compute_series(records, window, self)
    }

    pub fn category_breakdown<'a, I>(&self, records: I, dimension: TallyDimension) -> Vec<CategoryCount>
    where
        I: IntoIterator<Item = &'a TrafficTally>,
    {
        let records = records.into_iter();
        match dimension {
            TallyDimension::VehicleType => tally_weighted(
                records.map(|r| (r.vehicle_type.as_str(), r.vehicle_count as usize)),
            ),
            TallyDimension::UsageType => tally_weighted(
                records.map(|r| (r.usage_type.as_str(), r.vehicle_count as usize)),
            ),
        }
    }
}

impl BucketReducer for TrafficTallyAnalyzer {
    type Record = TrafficTally;
    type Accumulator = TrafficTallyAccumulator;
    type Summary = TrafficTallySummary;

    fn accumulate(&self, acc: &mut TrafficTallyAccumulator, record: &TrafficTally) {
        acc.intervals += 1;
        acc.vehicles += u64::from(record.vehicle_count);
        acc.weighted_speed_sum += record.avg_speed * f64::from(record.vehicle_count);
    }

    fn finish(&self, acc: TrafficTallyAccumulator) -> TrafficTallySummary {
        let avg_speed = mean(acc.weighted_speed_sum, acc.vehicles as usize)
            .map(|m| round_to(m, 1))
            .unwrap_or(0.0);
        TrafficTallySummary {
            intervals: acc.intervals,
            vehicle_count: acc.vehicles,
            avg_speed,
            congested: acc.vehicles > 0 && avg_speed <= self.congestion_threshold_kmh,
        }
    }
}

impl Default for TrafficTallyAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
