//! Bucketing stored lessons into the calendar day the client saw.
//!
//! A 7pm lesson entered on Pacific time is stored as 2am UTC the next day,
//! so the stored UTC date is one day ahead of the client's. The rule used
//! here treats any stored hour at or below the adjustment in whole hours as
//! having rolled past midnight. It only holds for whole-hour western
//! offsets; it is not a general time zone interval computation. With a zero
//! adjustment, lessons stored in the midnight hour still land on the
//! previous day.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

use super::error::{Result, ScheduleError};
use super::offset::OffsetAdjustment;

fn rolled_past_midnight(stored: DateTime<Utc>, adjustment: OffsetAdjustment) -> bool {
    (stored.hour() as i32) <= adjustment.whole_hours()
}

/// The calendar date a stored lesson belongs to from the client's side.
pub fn client_date(stored: DateTime<Utc>, adjustment: OffsetAdjustment) -> NaiveDate {
    let date = stored.date_naive();
    if rolled_past_midnight(stored, adjustment) {
        date.pred_opt().unwrap_or(date)
    } else {
        date
    }
}

/// Day-of-year bucket (1..=366) of a stored lesson.
pub fn day_of_year(stored: DateTime<Utc>, adjustment: OffsetAdjustment) -> u32 {
    client_date(stored, adjustment).ordinal()
}

/// The client's "today", bucketed with the same rule as lessons so the
/// default agenda agrees with the per-lesson buckets.
pub fn today(now: DateTime<Utc>, adjustment: OffsetAdjustment) -> u32 {
    day_of_year(now, adjustment)
}

/// Parse a client-supplied calendar date (`YYYYMMDD` or `YYYY-MM-DD`).
pub fn parse_client_date(raw: &str) -> Result<NaiveDate> {
    let value = raw.trim();
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| ScheduleError::InvalidDate(raw.to_string()))
}
