use serde::{Deserialize, Serialize};

use crate::analyzers::breakdown::{tally, CategoryCount};
use crate::analyzers::usage_classifier::{
    KanaTableClassifier, StayDurationClassifier, UsageClassifier,
};
use crate::models::{DateWindow, ParkingDirection, ParkingEvent, ParkingSnapshot};
use crate::processors::{compute_series, Bucket, BucketReducer, Series};
use crate::utils::constants::UNKNOWN_REGION;
use crate::utils::rounding::{mean, round_half_away, round_to};

/// Entries and exits per bucket of plate-read events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkingFlowSummary {
    pub entries: usize,
    pub exits: usize,
    /// `round((entries - exits) / total * 100)`: net flow as a share of all
    /// movements, not a true occupancy
    pub occupancy_delta: i64,
}

#[derive(Debug, Default)]
pub struct ParkingFlowAccumulator {
    entries: usize,
    exits: usize,
}

/// Means over the counter's own snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyRateSummary {
    pub count: usize,
    pub entries: u64,
    pub exits: u64,
    /// Mean of the supplied occupancy rate, as a percentage, one decimal
    pub occupancy_rate_percent: f64,
    pub avg_stay_minutes: f64,
}

#[derive(Debug, Default)]
pub struct OccupancyRateAccumulator {
    count: usize,
    entries: u64,
    exits: u64,
    rate_sum: f64,
    stay_sum: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParkingDimension {
    VehicleType,
    #[default]
    Region,
    UsageCategory,
}

fn region_label(region: &str) -> &str {
    let trimmed = region.trim();
    if trimmed.is_empty() {
        UNKNOWN_REGION
    } else {
        trimmed
    }
}

/// Aggregates plate-read entry/exit events.
pub struct ParkingAnalyzer {
    classifier: KanaTableClassifier,
}

impl ParkingAnalyzer {
    pub fn new() -> Self {
        Self {
            classifier: KanaTableClassifier::new(),
        }
    }

    pub fn series(
        &self,
        records: &[ParkingEvent],
        window: &DateWindow,
    ) -> Vec<Bucket<ParkingFlowSummary>> {
        self.series_report(records, window).buckets
    }

    pub fn series_report(
        &self,
        records: &[ParkingEvent],
        window: &DateWindow,
    ) -> Series<ParkingFlowSummary> {
        compute_series(records, window, self)
    }

    pub fn category_breakdown<'a, I>(&self, records: I, dimension: ParkingDimension) -> Vec<CategoryCount>
    where
        I: IntoIterator<Item = &'a ParkingEvent>,
    {
        let records = records.into_iter();
        match dimension {
            ParkingDimension::VehicleType => tally(records.map(|r| r.vehicle_type.trim())),
            ParkingDimension::Region => tally(records.map(|r| region_label(&r.region_label))),
            ParkingDimension::UsageCategory => {
                tally(records.map(|r| self.classifier.classify(r).as_str()))
            }
        }
    }
}

impl BucketReducer for ParkingAnalyzer {
    type Record = ParkingEvent;
    type Accumulator = ParkingFlowAccumulator;
    type Summary = ParkingFlowSummary;

    fn accumulate(&self, acc: &mut ParkingFlowAccumulator, record: &ParkingEvent) {
        match record.direction {
            ParkingDirection::In => acc.entries += 1,
            ParkingDirection::Out => acc.exits += 1,
        }
    }

    fn finish(&self, acc: ParkingFlowAccumulator) -> ParkingFlowSummary {
        let total = acc.entries + acc.exits;
        let occupancy_delta = if total == 0 {
            0
        } else {
            let net = acc.entries as f64 - acc.exits as f64;
            round_half_away(net * 100.0 / total as f64) as i64
        };
        ParkingFlowSummary {
            entries: acc.entries,
            exits: acc.exits,
            occupancy_delta,
        }
    }
}

impl Default for ParkingAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregates the counter's occupancy snapshots.
pub struct SnapshotAnalyzer {
    classifier: StayDurationClassifier,
}

impl SnapshotAnalyzer {
    pub fn new() -> Self {
        Self {
            classifier: StayDurationClassifier::default(),
        }
    }

    pub fn with_rental_region(mut self, region: &str) -> Self {
        self.classifier = StayDurationClassifier::new(region);
        self
    }

    pub fn series(
        &self,
        records: &[ParkingSnapshot],
        window: &DateWindow,
    ) -> Vec<Bucket<OccupancyRateSummary>> {
        self.series_report(records, window).buckets
    }

    pub fn series_report(
        &self,
        records: &[ParkingSnapshot],
        window: &DateWindow,
    ) -> Series<OccupancyRateSummary> {
        compute_series(records, window, self)
    }

    /// Snapshots carry no vehicle type; `VehicleType` yields an empty tally.
    pub fn category_breakdown<'a, I>(&self, records: I, dimension: ParkingDimension) -> Vec<CategoryCount>
    where
        I: IntoIterator<Item = &'a ParkingSnapshot>,
    {
        let records = records.into_iter();
        match dimension {
            ParkingDimension::VehicleType => Vec::new(),
            ParkingDimension::Region => tally(records.map(|r| region_label(&r.plate_region))),
            ParkingDimension::UsageCategory => {
                tally(records.map(|r| self.classifier.classify(r).as_str()))
            }
        }
    }
}

impl BucketReducer for SnapshotAnalyzer {
    type Record = ParkingSnapshot;
    type Accumulator = OccupancyRateAccumulator;
    type Summary = OccupancyRateSummary;

    fn accumulate(&self, acc: &mut OccupancyRateAccumulator, record: &ParkingSnapshot) {
        acc.count += 1;
        acc.entries += u64::from(record.entry_count);
        acc.exits += u64::from(record.exit_count);
        acc.rate_sum += record.occupancy_rate;
        acc.stay_sum += f64::from(record.stay_duration);
    }

    fn finish(&self, acc: OccupancyRateAccumulator) -> OccupancyRateSummary {
        OccupancyRateSummary {
            count: acc.count,
            entries: acc.entries,
            exits: acc.exits,
            occupancy_rate_percent: mean(acc.rate_sum, acc.count)
                .map(|m| round_to(m * 100.0, 1))
                .unwrap_or(0.0),
            avg_stay_minutes: mean(acc.stay_sum, acc.count)
                .map(|m| round_to(m, 1))
                .unwrap_or(0.0),
        }
    }
}

impl Default for SnapshotAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
