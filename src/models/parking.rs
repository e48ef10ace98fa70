use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParkingDirection {
    In,
    Out,
}

impl FromStr for ParkingDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Ok(ParkingDirection::In),
            "out" => Ok(ParkingDirection::Out),
            other => Err(format!("unknown parking direction '{}'", other)),
        }
    }
}

/// Coarse usage of a parked vehicle, derived from its plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageCategory {
    Commercial,
    Private,
    Rental,
    /// Military (US forces) plates
    Other,
}

impl UsageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsageCategory::Commercial => "commercial",
            UsageCategory::Private => "private",
            UsageCategory::Rental => "rental",
            UsageCategory::Other => "other",
        }
    }
}

impl FromStr for UsageCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commercial" => Ok(UsageCategory::Commercial),
            "private" => Ok(UsageCategory::Private),
            "rental" => Ok(UsageCategory::Rental),
            "other" => Ok(UsageCategory::Other),
            other => Err(format!("unknown usage type '{}'", other)),
        }
    }
}

impl std::fmt::Display for UsageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single vehicle entering or leaving the car park, read off its plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingEvent {
    pub timestamp: String,

    pub object_id: u32,

    pub vehicle_type: String,

    pub direction: ParkingDirection,

    /// Registration office printed on the plate (city or prefecture)
    #[serde(rename = "city", alias = "region_label")]
    pub region_label: String,

    /// Engine displacement in cc
    pub engine_size: u32,

    /// Hiragana (or Latin letter) classifier on the plate; may be empty
    #[serde(rename = "kana", alias = "kana_classifier", default)]
    pub kana_classifier: String,

    /// `NN-NN`
    #[serde(rename = "four-digit number", alias = "plate_number", default)]
    pub plate_number: String,
}

impl ParkingEvent {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp: &str,
        object_id: u32,
        vehicle_type: &str,
        direction: ParkingDirection,
        region_label: &str,
        engine_size: u32,
        kana_classifier: &str,
        plate_number: &str,
    ) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            object_id,
            vehicle_type: vehicle_type.to_string(),
            direction,
            region_label: region_label.to_string(),
            engine_size,
            kana_classifier: kana_classifier.to_string(),
            plate_number: plate_number.to_string(),
        }
    }

    pub fn kana(&self) -> Option<char> {
        self.kana_classifier.trim().chars().next()
    }

    pub fn is_entry(&self) -> bool {
        self.direction == ParkingDirection::In
    }
}

impl Observation for ParkingEvent {
    fn partition_key(&self) -> &str {
        &self.timestamp
    }
}

/// Interval snapshot reported by the car park counter, carrying its own
/// occupancy rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkingSnapshot {
    pub timestamp: String,

    pub plate_region: String,

    /// Minutes
    pub stay_duration: u32,

    pub entry_count: u32,

    pub exit_count: u32,

    /// Fraction in `0..=1`
    pub occupancy_rate: f64,
}

impl ParkingSnapshot {
    pub fn new(
        timestamp: &str,
        plate_region: &str,
        stay_duration: u32,
        entry_count: u32,
        exit_count: u32,
        occupancy_rate: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            plate_region: plate_region.to_string(),
            stay_duration,
            entry_count,
            exit_count,
            occupancy_rate,
        }
    }
}

impl Observation for ParkingSnapshot {
    fn partition_key(&self) -> &str {
        &self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_device_record() {
        let json = r#"{ "timestamp": "2024-01-15 14:45:12", "object_id": 3, "vehicle_type": "car",
                        "direction": "out", "city": "世田谷", "engine_size": 280, "kana": "あ",
                        "four-digit number": "12-34" }"#;
        let event: ParkingEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.direction, ParkingDirection::Out);
        assert_eq!(event.region_label, "世田谷");
        assert_eq!(event.kana(), Some('あ'));
        assert_eq!(event.plate_number, "12-34");
        assert!(!event.is_entry());
    }

    #[test]
    fn test_missing_kana_defaults_to_empty() {
        let json = r#"{ "timestamp": "2024-01-15 14:45:12", "object_id": 3, "vehicle_type": "car",
                        "direction": "in", "city": "品川", "engine_size": 280 }"#;
        let event: ParkingEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kana(), None);
    }
}
