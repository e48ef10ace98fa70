use tracing::debug;

use crate::models::{DateWindow, Observation};

/// Outcome of windowing a record set.
#[derive(Debug)]
pub struct FilteredRecords<'a, R> {
    pub records: Vec<&'a R>,
    /// Records skipped because their key could not be read
    pub dropped_malformed: usize,
}

impl<R> FilteredRecords<'_, R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Selects the records whose date falls inside a window.
///
/// Malformed records never fail the pass; they are counted and left out.
pub struct RecordFilter {
    window: DateWindow,
}

impl RecordFilter {
    pub fn new(window: DateWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn apply<'a, R: Observation>(&self, records: &'a [R]) -> FilteredRecords<'a, R> {
        let mut selected = Vec::new();
        let mut dropped_malformed = 0;

        for record in records {
            if !record.is_well_formed() {
                dropped_malformed += 1;
                continue;
            }
            match record.record_date() {
                Some(date) if self.window.contains(date) => selected.push(record),
                Some(_) => {}
                None => dropped_malformed += 1,
            }
        }

        if dropped_malformed > 0 {
            debug!(
                dropped = dropped_malformed,
                window = %self.window,
                "Skipped records with malformed timestamps"
            );
        }

        FilteredRecords {
            records: selected,
            dropped_malformed,
        }
    }

    /// Convenience over [`RecordFilter::apply`] returning only the selection.
    pub fn select<'a, R: Observation>(&self, records: &'a [R]) -> Vec<&'a R> {
        self.apply(records).records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DateSelection, TrafficObservation, TravelDirection, VehicleClass, WeatherCondition,
        WeatherSample,
    };

    fn traffic(timestamp: &str) -> TrafficObservation {
        TrafficObservation::new(timestamp, 1, VehicleClass::Car, TravelDirection::Left, 30.0)
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let filter = RecordFilter::new(DateWindow::single("2024-01-15").unwrap());
        let records: Vec<TrafficObservation> = Vec::new();
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let records = vec![
            traffic("2024-01-13 23:59:59"),
            traffic("2024-01-14 00:00:00"),
            traffic("2024-01-16 23:59:59"),
            traffic("2024-01-17 00:00:00"),
        ];
        let filter = RecordFilter::new(DateWindow::new("2024-01-14", "2024-01-16").unwrap());
        let selected = filter.select(&records);

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].timestamp, "2024-01-14 00:00:00");
        assert_eq!(selected[1].timestamp, "2024-01-16 23:59:59");
    }

    #[test]
    fn test_degenerate_range_matches_single_mode() {
        let records = vec![
            traffic("2024-01-14 10:00:00"),
            traffic("2024-01-15 09:00:00"),
            traffic("2024-01-15 18:20:00"),
            traffic("2024-01-16 07:00:00"),
        ];
        let single = RecordFilter::new(DateSelection::single("2024-01-15").resolve().unwrap());
        let range = RecordFilter::new(
            DateSelection::range("2024-01-15", "2024-01-15")
                .resolve()
                .unwrap(),
        );

        assert_eq!(single.select(&records), range.select(&records));
    }

    #[test]
    fn test_malformed_records_are_dropped_silently() {
        let records = vec![
            traffic("garbage"),
            traffic("2024-01-15"),
            traffic("2024-01-15 31:00:00"),
            traffic("2024-01-15 09:00:00"),
        ];
        let filter = RecordFilter::new(DateWindow::single("2024-01-15").unwrap());
        let outcome = filter.apply(&records);

        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome.dropped_malformed, 3);
    }

    #[test]
    fn test_weather_uses_date_field_directly() {
        let records = vec![
            WeatherSample::new("2024-01-15", WeatherCondition::Sunny, 12, 45),
            WeatherSample::new("2024-01-16", WeatherCondition::Cloudy, 8, 62),
        ];
        let filter = RecordFilter::new(DateWindow::single("2024-01-16").unwrap());
        let selected = filter.select(&records);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].condition, WeatherCondition::Cloudy);
    }

    #[test]
    fn test_inverted_window_selects_nothing() {
        let records = vec![traffic("2024-01-15 09:00:00")];
        let filter = RecordFilter::new(DateWindow::new("2024-01-16", "2024-01-14").unwrap());
        let outcome = filter.apply(&records);

        assert!(outcome.is_empty());
        assert_eq!(outcome.dropped_malformed, 0);
    }
}
