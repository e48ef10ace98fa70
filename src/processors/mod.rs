pub mod bucketer;
pub mod record_filter;
pub mod record_table;
pub mod series;

pub use bucketer::{Bucket, BucketReducer, TimeBucketer};
pub use record_filter::{FilteredRecords, RecordFilter};
pub use record_table::{RecordTable, SortOrder};
pub use series::{compute_series, Series};
