use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{ParkingEvent, ParkingSnapshot, TrafficObservation, TrafficTally, WeatherSample};
use crate::utils::constants::{
    KIND_PARKING, KIND_PARKING_SNAPSHOT, KIND_TRAFFIC, KIND_TRAFFIC_TALLY, KIND_WEATHER,
};

/// The record kinds the dashboard knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataKind {
    Traffic,
    TrafficTally,
    Parking,
    ParkingSnapshot,
    Weather,
}

impl DataKind {
    pub const ALL: [DataKind; 5] = [
        DataKind::Traffic,
        DataKind::TrafficTally,
        DataKind::Parking,
        DataKind::ParkingSnapshot,
        DataKind::Weather,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataKind::Traffic => KIND_TRAFFIC,
            DataKind::TrafficTally => KIND_TRAFFIC_TALLY,
            DataKind::Parking => KIND_PARKING,
            DataKind::ParkingSnapshot => KIND_PARKING_SNAPSHOT,
            DataKind::Weather => KIND_WEATHER,
        }
    }

    /// Path segment under the data source's base URL. Interval tallies and
    /// snapshots are served from the traffic and parking endpoints.
    pub fn api_path(&self) -> &'static str {
        match self {
            DataKind::Traffic | DataKind::TrafficTally => KIND_TRAFFIC,
            DataKind::Parking | DataKind::ParkingSnapshot => KIND_PARKING,
            DataKind::Weather => KIND_WEATHER,
        }
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            KIND_TRAFFIC => Ok(DataKind::Traffic),
            KIND_TRAFFIC_TALLY | "traffic_tally" => Ok(DataKind::TrafficTally),
            KIND_PARKING => Ok(DataKind::Parking),
            KIND_PARKING_SNAPSHOT | "parking_snapshot" => Ok(DataKind::ParkingSnapshot),
            KIND_WEATHER => Ok(DataKind::Weather),
            other => Err(format!(
                "unknown data kind '{}' (expected traffic, traffic-tally, parking, parking-snapshot or weather)",
                other
            )),
        }
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A homogeneous set of records of one kind, as produced by a reader or a
/// fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Traffic(Vec<TrafficObservation>),
    TrafficTally(Vec<TrafficTally>),
    Parking(Vec<ParkingEvent>),
    ParkingSnapshot(Vec<ParkingSnapshot>),
    Weather(Vec<WeatherSample>),
}

impl Dataset {
    pub fn empty(kind: DataKind) -> Self {
        match kind {
            DataKind::Traffic => Dataset::Traffic(Vec::new()),
            DataKind::TrafficTally => Dataset::TrafficTally(Vec::new()),
            DataKind::Parking => Dataset::Parking(Vec::new()),
            DataKind::ParkingSnapshot => Dataset::ParkingSnapshot(Vec::new()),
            DataKind::Weather => Dataset::Weather(Vec::new()),
        }
    }

    pub fn kind(&self) -> DataKind {
        match self {
            Dataset::Traffic(_) => DataKind::Traffic,
            Dataset::TrafficTally(_) => DataKind::TrafficTally,
            Dataset::Parking(_) => DataKind::Parking,
            Dataset::ParkingSnapshot(_) => DataKind::ParkingSnapshot,
            Dataset::Weather(_) => DataKind::Weather,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::Traffic(r) => r.len(),
            Dataset::TrafficTally(r) => r.len(),
            Dataset::Parking(r) => r.len(),
            Dataset::ParkingSnapshot(r) => r.len(),
            Dataset::Weather(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
