use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::models::observation::is_iso_date;
use crate::utils::constants::DAILY_BUCKET_MIN_DAYS;

/// Time bucket size for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// `HH:00`, pooled across every day of the window
    Hourly,
    /// `YYYY-MM-DD`
    Daily,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Hourly => write!(f, "hourly"),
            Granularity::Daily => write!(f, "daily"),
        }
    }
}

/// Inclusive `[from, to]` window of date-only strings.
///
/// `from > to` is allowed and matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    from: String,
    to: String,
    #[serde(skip)]
    from_date: NaiveDate,
    #[serde(skip)]
    to_date: NaiveDate,
}

impl DateWindow {
    pub fn new(from: &str, to: &str) -> Result<Self> {
        Ok(Self {
            from_date: parse_window_date(from)?,
            to_date: parse_window_date(to)?,
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    pub fn single(date: &str) -> Result<Self> {
        Self::new(date, date)
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn is_single_day(&self) -> bool {
        self.from == self.to
    }

    pub fn is_inverted(&self) -> bool {
        self.from > self.to
    }

    /// Lexical containment of a `YYYY-MM-DD` string.
    pub fn contains(&self, date: &str) -> bool {
        self.from.as_str() <= date && date <= self.to.as_str()
    }

    /// Number of calendar days covered, counting both ends. Inverted windows
    /// cover zero days.
    pub fn calendar_days(&self) -> i64 {
        let days = self.to_date.signed_duration_since(self.from_date).num_days() + 1;
        days.max(0)
    }

    /// Daily once the window covers [`DAILY_BUCKET_MIN_DAYS`] calendar days,
    /// hourly below that.
    ///
    /// The day count is inclusive: `2024-01-14..2024-01-16` is 3 days and
    /// buckets by day, `2024-01-15..2024-01-16` is 2 days and stays hourly.
    /// The dashboard's own rule is written as a plain difference,
    /// `ceil(to - from) >= 3`, which would need a 4-day window before
    /// switching. The inclusive count is deliberate and pinned by
    /// `test_granularity_threshold_counts_both_ends`; do not drop the `+ 1`
    /// from [`calendar_days`](Self::calendar_days).
    pub fn granularity(&self) -> Granularity {
        if self.calendar_days() >= DAILY_BUCKET_MIN_DAYS {
            Granularity::Daily
        } else {
            Granularity::Hourly
        }
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{} ~ {}", self.from, self.to)
        }
    }
}

fn parse_window_date(value: &str) -> Result<NaiveDate> {
    if !is_iso_date(value) {
        return Err(DashboardError::InvalidSelection(format!(
            "'{}' is not a YYYY-MM-DD date",
            value
        )));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DashboardError::InvalidSelection(format!("'{}': {}", value, e)))
}

/// Date picker state: one selected date, or a start/end pair in range mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSelection {
    pub selected_date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub range_mode: bool,
}

impl DateSelection {
    pub fn single(date: &str) -> Self {
        Self {
            selected_date: Some(date.to_string()),
            ..Self::default()
        }
    }

    pub fn range(start_date: &str, end_date: &str) -> Self {
        Self {
            selected_date: None,
            start_date: Some(start_date.to_string()),
            end_date: Some(end_date.to_string()),
            range_mode: true,
        }
    }

    /// Resolve the picker state into a concrete window.
    ///
    /// The start <= end ordering is not enforced: the picker clamps it, and an
    /// inverted window simply selects nothing.
    pub fn resolve(&self) -> Result<DateWindow> {
        if self.range_mode {
            match (&self.start_date, &self.end_date) {
                (Some(start), Some(end)) => DateWindow::new(start, end),
                _ => Err(DashboardError::InvalidSelection(
                    "range mode needs both a start date and an end date".to_string(),
                )),
            }
        } else {
            match &self.selected_date {
                Some(date) => DateWindow::single(date),
                None => Err(DashboardError::InvalidSelection(
                    "no date selected".to_string(),
                )),
            }
        }
    }
}
