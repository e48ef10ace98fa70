use serde::Serialize;

use crate::analyzers::breakdown::{tally, CategoryCount};
use crate::models::{DateWindow, Granularity, WeatherSample};
use crate::processors::{compute_series, Bucket, BucketReducer, Series};
use crate::utils::rounding::{mean, round_to};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSummary {
    pub count: usize,
    /// °C, one decimal
    pub avg_temperature: f64,
    /// %, one decimal
    pub avg_humidity: f64,
}

#[derive(Debug, Default)]
pub struct WeatherAccumulator {
    count: usize,
    temperature_sum: f64,
    humidity_sum: f64,
}

/// Weather samples are daily, so their series is always bucketed by day.
pub struct WeatherAnalyzer;

impl WeatherAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn series(&self, records: &[WeatherSample], window: &DateWindow) -> Vec<Bucket<WeatherSummary>> {
        self.series_report(records, window).buckets
    }

    pub fn series_report(&self, records: &[WeatherSample], window: &DateWindow) -> Series<WeatherSummary> {
        compute_series(records, window, self)
    }

    /// Days per weather condition.
    pub fn category_breakdown<'a, I>(&self, records: I) -> Vec<CategoryCount>
    where
        I: IntoIterator<Item = &'a WeatherSample>,
    {
        tally(records.into_iter().map(|r| r.condition.as_str()))
    }
}

impl BucketReducer for WeatherAnalyzer {
    type Record = WeatherSample;
    type Accumulator = WeatherAccumulator;
    type Summary = WeatherSummary;

    fn accumulate(&self, acc: &mut WeatherAccumulator, record: &WeatherSample) {
        acc.count += 1;
        acc.temperature_sum += f64::from(record.temperature_c);
        acc.humidity_sum += f64::from(record.humidity_percent);
    }

    fn finish(&self, acc: WeatherAccumulator) -> WeatherSummary {
        WeatherSummary {
            count: acc.count,
            avg_temperature: mean(acc.temperature_sum, acc.count)
                .map(|m| round_to(m, 1))
                .unwrap_or(0.0),
            avg_humidity: mean(acc.humidity_sum, acc.count)
                .map(|m| round_to(m, 1))
                .unwrap_or(0.0),
        }
    }

    fn granularity(&self, _window: &DateWindow) -> Granularity {
        Granularity::Daily
    }
}

impl Default for WeatherAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
