use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{Observation, UsageCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    Car,
    Truck,
    Bus,
    Motorcycle,
}

impl VehicleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleClass::Car => "car",
            VehicleClass::Truck => "truck",
            VehicleClass::Bus => "bus",
            VehicleClass::Motorcycle => "motorcycle",
        }
    }
}

impl FromStr for VehicleClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(VehicleClass::Car),
            "truck" => Ok(VehicleClass::Truck),
            "bus" => Ok(VehicleClass::Bus),
            "motorcycle" => Ok(VehicleClass::Motorcycle),
            other => Err(format!("unknown vehicle class '{}'", other)),
        }
    }
}

impl std::fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Travel direction across the camera's field of view. The device reports
/// `L`/`R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelDirection {
    #[serde(rename = "left", alias = "L", alias = "l")]
    Left,
    #[serde(rename = "right", alias = "R", alias = "r")]
    Right,
}

impl TravelDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelDirection::Left => "left",
            TravelDirection::Right => "right",
        }
    }
}

impl FromStr for TravelDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(TravelDirection::Left),
            "right" | "r" => Ok(TravelDirection::Right),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

impl std::fmt::Display for TravelDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One vehicle passing the roadside camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficObservation {
    pub timestamp: String,

    /// Unique per detection event within a day only
    pub object_id: u32,

    #[serde(rename = "class_name", alias = "vehicle_class")]
    pub vehicle_class: VehicleClass,

    pub direction: TravelDirection,

    pub speed_kmh: f64,
}

impl TrafficObservation {
    pub fn new(
        timestamp: &str,
        object_id: u32,
        vehicle_class: VehicleClass,
        direction: TravelDirection,
        speed_kmh: f64,
    ) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            object_id,
            vehicle_class,
            direction,
            speed_kmh,
        }
    }
}

impl Observation for TrafficObservation {
    fn partition_key(&self) -> &str {
        &self.timestamp
    }
}

/// Vehicles counted over one reporting interval, already aggregated on the
/// device. One row stands for `vehicle_count` vehicles of a single type and
/// usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficTally {
    pub timestamp: String,

    pub vehicle_count: u32,

    /// Mean speed of the counted vehicles, km/h
    pub avg_speed: f64,

    pub vehicle_type: VehicleClass,

    pub usage_type: UsageCategory,
}

impl TrafficTally {
    pub fn new(
        timestamp: &str,
        vehicle_count: u32,
        avg_speed: f64,
        vehicle_type: VehicleClass,
        usage_type: UsageCategory,
    ) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            vehicle_count,
            avg_speed,
            vehicle_type,
            usage_type,
        }
    }
}

impl Observation for TrafficTally {
    fn partition_key(&self) -> &str {
        &self.timestamp
    }
}
