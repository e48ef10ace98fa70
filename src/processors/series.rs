use serde::Serialize;

use crate::models::{DateWindow, Granularity};
use crate::processors::{Bucket, BucketReducer, RecordFilter, TimeBucketer};

/// A bucketed series together with how it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct Series<S> {
    pub window: DateWindow,
    pub granularity: Granularity,
    /// Records inside the window
    pub record_count: usize,
    pub dropped_malformed: usize,
    pub buckets: Vec<Bucket<S>>,
}

impl<S> Series<S> {
    /// An empty selection is a normal state, not an error.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Filter `records` into `window`, bucket them at the window's granularity and
/// reduce each bucket.
pub fn compute_series<R: BucketReducer>(
    records: &[R::Record],
    window: &DateWindow,
    reducer: &R,
) -> Series<R::Summary> {
    let filtered = RecordFilter::new(window.clone()).apply(records);
    let bucketer = TimeBucketer::new(reducer.granularity(window));
    let buckets = bucketer.bucketize(filtered.records.iter().copied(), reducer);

    Series {
        window: window.clone(),
        granularity: bucketer.granularity(),
        record_count: filtered.records.len(),
        dropped_malformed: filtered.dropped_malformed,
        buckets,
    }
}
