//! Lead-time derivation helpers for table producers.
//!
//! The sampling operations expect a precomputed numeric lead-time column;
//! these helpers derive it for callers whose records carry booking and
//! event dates instead.

use chrono::{DateTime, NaiveDate, Utc};

/// Number of whole days between a booking date and the event date.
/// Negative when the booking postdates the event.
pub fn lead_days(booking: NaiveDate, event: NaiveDate) -> i64 {
    (event - booking).num_days()
}

/// Lead days between timestamped booking and event instants.
/// Partial days truncate toward zero.
pub fn lead_days_at(booking: DateTime<Utc>, event: DateTime<Utc>) -> i64 {
    (event - booking).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn lead_days_spans_calendar_boundaries() {
        let booking = NaiveDate::from_ymd_opt(2025, 1, 28).unwrap();
        let event = NaiveDate::from_ymd_opt(2025, 2, 4).unwrap();
        assert_eq!(lead_days(booking, event), 7);
        assert_eq!(lead_days(event, booking), -7);
        assert_eq!(lead_days(event, event), 0);
    }

    #[test]
    fn lead_days_at_truncates_partial_days() {
        let booking = Utc.with_ymd_and_hms(2025, 3, 1, 23, 0, 0).unwrap();
        let event = Utc.with_ymd_and_hms(2025, 3, 3, 1, 0, 0).unwrap();
        assert_eq!(lead_days_at(booking, event), 1);
    }
}
