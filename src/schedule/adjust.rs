//! Shifting lesson times between the client's clock and storage.
//!
//! A client-local instant is the client's wall-clock reading taken as if it
//! were in the server's frame. Adding the adjustment gives the true UTC
//! instant that gets stored; subtracting it on the way out gives back the
//! wall-clock reading the client entered. Apply each exactly once.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use super::error::{Result, ScheduleError};
use super::offset::OffsetAdjustment;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Separator the front end joins submitted lesson values with.
pub const LESSON_LIST_SEPARATOR: &str = "; ";

pub fn to_storage_time(client_local: DateTime<Utc>, adjustment: OffsetAdjustment) -> DateTime<Utc> {
    client_local + adjustment.as_duration()
}

pub fn to_client_time(stored: DateTime<Utc>, adjustment: OffsetAdjustment) -> DateTime<Utc> {
    stored - adjustment.as_duration()
}

/// Convert a submitted lesson list for storage, sorted ascending.
pub fn to_storage_times<I>(client_local: I, adjustment: OffsetAdjustment) -> Vec<DateTime<Utc>>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut stored: Vec<_> = client_local
        .into_iter()
        .map(|lesson| to_storage_time(lesson, adjustment))
        .collect();
    stored.sort();
    stored
}

/// Parse one submitted lesson value into a client-local instant.
///
/// Values are naive wall-clock datetimes, or bare dates meaning midnight,
/// read in the server's frame. Values carrying their own offset are rejected
/// since shifting them again would apply the offset twice.
pub fn parse_client_lesson(raw: &str, server_utc_offset_minutes: i32) -> Result<DateTime<Utc>> {
    let value = raw.trim();
    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ScheduleError::MalformedLessonInput(raw.to_string()))?;

    let server_frame = FixedOffset::east_opt(server_utc_offset_minutes * 60).unwrap_or(Utc.fix());
    server_frame
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ScheduleError::MalformedLessonInput(raw.to_string()))
}

/// Parse every submitted value, failing on the first malformed one.
pub fn parse_client_lessons<S: AsRef<str>>(
    raw: &[S],
    server_utc_offset_minutes: i32,
) -> Result<Vec<DateTime<Utc>>> {
    raw.iter()
        .map(|value| value.as_ref())
        .filter(|value| !value.trim().is_empty())
        .map(|value| parse_client_lesson(value, server_utc_offset_minutes))
        .collect()
}

/// Split the front end's joined lesson string. An empty string is an empty
/// list.
pub fn split_lesson_list(joined: &str) -> Vec<&str> {
    if joined.trim().is_empty() {
        return vec![];
    }
    joined.split(LESSON_LIST_SEPARATOR).collect()
}
