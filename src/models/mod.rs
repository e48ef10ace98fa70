pub mod dataset;
pub mod observation;
pub mod parking;
pub mod traffic;
pub mod weather;
pub mod window;

pub use dataset::{DataKind, Dataset};
pub use observation::Observation;
pub use parking::{ParkingDirection, ParkingEvent, ParkingSnapshot, UsageCategory};
pub use traffic::{TrafficObservation, TrafficTally, TravelDirection, VehicleClass};
pub use weather::{WeatherCondition, WeatherSample};
pub use window::{DateSelection, DateWindow, Granularity};
