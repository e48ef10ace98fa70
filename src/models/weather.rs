use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Sunny => "sunny",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rainy => "rainy",
            WeatherCondition::Snowy => "snowy",
        }
    }
}

impl FromStr for WeatherCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunny" => Ok(WeatherCondition::Sunny),
            "cloudy" => Ok(WeatherCondition::Cloudy),
            "rainy" => Ok(WeatherCondition::Rainy),
            "snowy" => Ok(WeatherCondition::Snowy),
            other => Err(format!("unknown weather condition '{}'", other)),
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Daily weather at the survey site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub date: String,

    #[serde(rename = "weather", alias = "condition")]
    pub condition: WeatherCondition,

    #[serde(rename = "temperature", alias = "temperature_c")]
    pub temperature_c: i32,

    #[serde(rename = "humidity", alias = "humidity_percent")]
    pub humidity_percent: u8,
}

impl WeatherSample {
    pub fn new(date: &str, condition: WeatherCondition, temperature_c: i32, humidity_percent: u8) -> Self {
        Self {
            date: date.to_string(),
            condition,
            temperature_c,
            humidity_percent,
        }
    }
}

impl Observation for WeatherSample {
    fn partition_key(&self) -> &str {
        &self.date
    }

    fn has_time_of_day(&self) -> bool {
        false
    }
}
