//! Built-in sample dataset, served when no data source or upload is given.

use crate::models::{
    DataKind, Dataset, ParkingDirection, ParkingEvent, ParkingSnapshot, TrafficObservation,
    TrafficTally, TravelDirection, UsageCategory, VehicleClass, WeatherCondition, WeatherSample,
};

const TRAFFIC: [(&str, u32, VehicleClass, TravelDirection, f64); 5] = [
    ("2024-01-15 06:02:15", 1, VehicleClass::Car, TravelDirection::Right, 27.3),
    ("2024-01-15 07:29:55", 7, VehicleClass::Car, TravelDirection::Right, 36.4),
    ("2024-01-15 07:44:38", 8, VehicleClass::Truck, TravelDirection::Right, 41.2),
    ("2024-01-15 07:59:23", 9, VehicleClass::Bus, TravelDirection::Left, 18.5),
    ("2024-01-15 08:14:07", 10, VehicleClass::Car, TravelDirection::Left, 32.9),
];

const TRAFFIC_TALLIES: [(&str, u32, f64, VehicleClass, UsageCategory); 10] = [
    ("2024-01-15 09:00", 45, 35.2, VehicleClass::Car, UsageCategory::Private),
    ("2024-01-15 09:10", 52, 32.8, VehicleClass::Truck, UsageCategory::Commercial),
    ("2024-01-15 09:20", 38, 37.5, VehicleClass::Car, UsageCategory::Rental),
    ("2024-01-15 09:30", 61, 29.3, VehicleClass::Motorcycle, UsageCategory::Private),
    ("2024-01-15 09:40", 44, 34.7, VehicleClass::Car, UsageCategory::Private),
    ("2024-01-15 09:50", 49, 33.1, VehicleClass::Truck, UsageCategory::Commercial),
    ("2024-01-15 10:00", 56, 31.8, VehicleClass::Car, UsageCategory::Rental),
    ("2024-01-15 10:10", 42, 36.4, VehicleClass::Motorcycle, UsageCategory::Private),
    ("2024-01-15 10:20", 48, 34.2, VehicleClass::Car, UsageCategory::Private),
    ("2024-01-15 10:30", 53, 32.5, VehicleClass::Truck, UsageCategory::Commercial),
];

type ParkingRow = (&'static str, u32, ParkingDirection, &'static str, u32, &'static str, &'static str);

const PARKING: [ParkingRow; 10] = [
    ("2024-01-15 14:34:24", 1, ParkingDirection::In, "世田谷", 310, "ふ", "70-50"),
    ("2024-01-15 14:40:34", 2, ParkingDirection::In, "横浜", 331, "や", "28-50"),
    ("2024-01-15 14:45:12", 3, ParkingDirection::Out, "世田谷", 280, "あ", "12-34"),
    ("2024-01-15 14:52:18", 4, ParkingDirection::In, "品川", 350, "か", "56-78"),
    ("2024-01-15 15:01:45", 5, ParkingDirection::Out, "横浜", 290, "さ", "90-12"),
    ("2024-01-15 15:08:33", 6, ParkingDirection::In, "川崎", 320, "た", "34-56"),
    ("2024-01-15 15:15:27", 7, ParkingDirection::In, "世田谷", 340, "な", "78-90"),
    ("2024-01-15 15:22:41", 8, ParkingDirection::Out, "品川", 300, "は", "23-45"),
    ("2024-01-15 15:29:15", 9, ParkingDirection::In, "横浜", 360, "ま", "67-89"),
    ("2024-01-15 15:35:52", 10, ParkingDirection::Out, "川崎", 275, "ら", "01-23"),
];

const SNAPSHOTS: [(&str, &str, u32, u32, u32, f64); 10] = [
    ("2024-01-15 09:00", "Osaka", 120, 8, 5, 0.65),
    ("2024-01-15 09:10", "Kobe", 95, 12, 7, 0.70),
    ("2024-01-15 09:20", "Kyoto", 150, 6, 9, 0.67),
    ("2024-01-15 09:30", "Nara", 180, 10, 8, 0.69),
    ("2024-01-15 09:40", "Osaka", 110, 9, 11, 0.67),
    ("2024-01-15 09:50", "Kobe", 135, 7, 6, 0.68),
    ("2024-01-15 10:00", "Kyoto", 165, 11, 8, 0.71),
    ("2024-01-15 10:10", "Wakayama", 90, 5, 7, 0.69),
    ("2024-01-15 10:20", "Osaka", 125, 8, 10, 0.67),
    ("2024-01-15 10:30", "Kobe", 140, 9, 6, 0.70),
];

const WEATHER: [(&str, WeatherCondition, i32, u8); 5] = [
    ("2024-01-15", WeatherCondition::Sunny, 12, 45),
    ("2024-01-16", WeatherCondition::Cloudy, 8, 62),
    ("2024-01-17", WeatherCondition::Rainy, 6, 78),
    ("2024-01-18", WeatherCondition::Sunny, 14, 38),
    ("2024-01-19", WeatherCondition::Cloudy, 10, 55),
];

pub fn traffic() -> Vec<TrafficObservation> {
    TRAFFIC
        .iter()
        .map(|&(ts, id, class, dir, speed)| TrafficObservation::new(ts, id, class, dir, speed))
        .collect()
}

pub fn traffic_tallies() -> Vec<TrafficTally> {
    TRAFFIC_TALLIES
        .iter()
        .map(|&(ts, count, speed, class, usage)| TrafficTally::new(ts, count, speed, class, usage))
        .collect()
}

pub fn parking() -> Vec<ParkingEvent> {
    PARKING
        .iter()
        .map(|&(ts, id, dir, city, cc, kana, plate)| {
            ParkingEvent::new(ts, id, "car", dir, city, cc, kana, plate)
        })
        .collect()
}

pub fn parking_snapshots() -> Vec<ParkingSnapshot> {
    SNAPSHOTS
        .iter()
        .map(|&(ts, region, stay, entries, exits, rate)| {
            ParkingSnapshot::new(ts, region, stay, entries, exits, rate)
        })
        .collect()
}

pub fn weather() -> Vec<WeatherSample> {
    WEATHER
        .iter()
        .map(|&(date, condition, temp, humidity)| WeatherSample::new(date, condition, temp, humidity))
        .collect()
}

pub fn dataset(kind: DataKind) -> Dataset {
    match kind {
        DataKind::Traffic => Dataset::Traffic(traffic()),
        DataKind::TrafficTally => Dataset::TrafficTally(traffic_tallies()),
        DataKind::Parking => Dataset::Parking(parking()),
        DataKind::ParkingSnapshot => Dataset::ParkingSnapshot(parking_snapshots()),
        DataKind::Weather => Dataset::Weather(weather()),
    }
}
