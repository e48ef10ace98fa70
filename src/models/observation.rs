use crate::models::Granularity;

/// A record that can be placed in a date window and a time bucket.
///
/// Partition keys are compared as strings: `YYYY-MM-DD` sorts the same
/// lexically and chronologically, and every key function here keeps that
/// property.
pub trait Observation {
    /// Raw partition key as stored on the record (`timestamp` or `date`).
    fn partition_key(&self) -> &str;

    /// Date-only records have no time of day and always bucket by day.
    fn has_time_of_day(&self) -> bool {
        true
    }

    /// The `YYYY-MM-DD` part of the key, or `None` if the key is malformed.
    fn record_date(&self) -> Option<&str> {
        if self.has_time_of_day() {
            split_timestamp(self.partition_key()).map(|(date, _)| date)
        } else {
            let key = self.partition_key();
            is_iso_date(key).then_some(key)
        }
    }

    /// A record is usable when its date can be windowed and, for timestamped
    /// records, its hour can be bucketed.
    fn is_well_formed(&self) -> bool {
        if self.has_time_of_day() {
            self.bucket_key(Granularity::Hourly).is_some()
        } else {
            self.record_date().is_some()
        }
    }

    /// Label of the bucket this record falls into at `granularity`.
    fn bucket_key(&self, granularity: Granularity) -> Option<String> {
        if !self.has_time_of_day() {
            return self.record_date().map(str::to_string);
        }
        let (date, time) = split_timestamp(self.partition_key())?;
        match granularity {
            Granularity::Daily => Some(date.to_string()),
            Granularity::Hourly => hour_label(time),
        }
    }
}

/// Shape check for `YYYY-MM-DD`. Only the shape matters for lexical
/// comparison, so calendar validity is not checked here.
pub fn is_iso_date(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Split `YYYY-MM-DD HH:MM[:SS]` on the first space.
///
/// Returns `None` unless the date part is ISO-shaped and the time part starts
/// with `HH:MM`.
pub fn split_timestamp(timestamp: &str) -> Option<(&str, &str)> {
    let (date, time) = timestamp.split_once(' ')?;
    if !is_iso_date(date) {
        return None;
    }
    let t = time.as_bytes();
    let well_formed = t.len() >= 5
        && t[0].is_ascii_digit()
        && t[1].is_ascii_digit()
        && t[2] == b':'
        && t[3].is_ascii_digit()
        && t[4].is_ascii_digit();
    well_formed.then_some((date, time))
}

/// `HH:MM...` -> `HH:00`. Hours outside 00-23 are rejected.
pub fn hour_label(time: &str) -> Option<String> {
    let hour = time.get(..2)?;
    let value: u8 = hour.parse().ok()?;
    (value < 24).then(|| format!("{}:00", hour))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date_shape() {
        assert!(is_iso_date("2024-01-15"));
        assert!(!is_iso_date("2024-1-15"));
        assert!(!is_iso_date("2024/01/15"));
        assert!(!is_iso_date("garbage"));
    }

    #[test]
    fn test_split_timestamp() {
        assert_eq!(
            split_timestamp("2024-01-15 09:30:00"),
            Some(("2024-01-15", "09:30:00"))
        );
        assert_eq!(
            split_timestamp("2024-01-15 09:30"),
            Some(("2024-01-15", "09:30"))
        );
        assert_eq!(split_timestamp("2024-01-15"), None);
        assert_eq!(split_timestamp("2024-01-15 9:30"), None);
        assert_eq!(split_timestamp("garbage"), None);
    }

    #[test]
    fn test_hour_label_is_zero_padded() {
        assert_eq!(hour_label("09:30:00").as_deref(), Some("09:00"));
        assert_eq!(hour_label("23:59").as_deref(), Some("23:00"));
        assert_eq!(hour_label("24:00"), None);
    }
}
