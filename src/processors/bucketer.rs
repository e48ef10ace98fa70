use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::models::{DateWindow, Granularity, Observation};

/// Folds the records of one bucket into a summary.
///
/// `accumulate` sees each record once; `finish` turns the running totals into
/// display values.
pub trait BucketReducer {
    type Record: Observation;
    type Accumulator: Default;
    type Summary;

    fn accumulate(&self, acc: &mut Self::Accumulator, record: &Self::Record);

    fn finish(&self, acc: Self::Accumulator) -> Self::Summary;

    /// Bucket size for `window`. Date-only record kinds override this.
    fn granularity(&self, window: &DateWindow) -> Granularity {
        window.granularity()
    }
}

/// A labelled time bucket. Serialized flat, with the label under `time`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket<S> {
    #[serde(rename = "time")]
    pub key: String,
    #[serde(flatten)]
    pub summary: S,
}

/// Groups records into hour-of-day or calendar-day buckets.
pub struct TimeBucketer {
    granularity: Granularity,
}

impl TimeBucketer {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Buckets come out in ascending key order. Keys with no records are
    /// not emitted.
    pub fn bucketize<'a, R, I>(&self, records: I, reducer: &R) -> Vec<Bucket<R::Summary>>
    where
        R: BucketReducer,
        R::Record: 'a,
        I: IntoIterator<Item = &'a R::Record>,
    {
        let mut grouped: BTreeMap<String, R::Accumulator> = BTreeMap::new();
        let mut unbucketed = 0usize;

        for record in records {
            match record.bucket_key(self.granularity) {
                Some(key) => reducer.accumulate(grouped.entry(key).or_default(), record),
                None => unbucketed += 1,
            }
        }

        if unbucketed > 0 {
            debug!(
                skipped = unbucketed,
                granularity = %self.granularity,
                "Skipped records without a bucket key"
            );
        }

        grouped
            .into_iter()
            .map(|(key, acc)| Bucket {
                key,
                summary: reducer.finish(acc),
            })
            .collect()
    }
}
