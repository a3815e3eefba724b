//! Per-request schedule selection.
//!
//! The selected tutor and day always come from the caller. Nothing about a
//! selection is remembered between requests.

use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use super::agenda::{
    AgendaEntry, fetch_tutor_lessons, lesson_dates_for_tutor, lessons_for_tutor_on_day,
};
use super::bucket::today;
use super::error::{Result, ScheduleError};
use super::offset::OffsetAdjustment;
use crate::students::LessonStore;

/// Who is asking, as established by the auth layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Caller {
    pub id: Option<i64>,
    pub admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScheduleMode {
    /// The caller's own (or the already selected) tutor for some day.
    DayView,
    /// An admin switched to another tutor. Their calendar highlights
    /// different dates so the date index is always sent.
    TutorChange,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleRequest {
    pub tutor_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub include_date_index: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub tutor_id: i64,
    pub day_of_year: u32,
    pub include_date_index: bool,
    pub mode: ScheduleMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub mode: ScheduleMode,
    pub day_of_year: u32,
    pub entries: Vec<AgendaEntry>,
    pub date_index: Option<Vec<DateTime<Utc>>>,
}

impl ScheduleRequest {
    /// Settle which tutor and day to show. Without a date the client's
    /// today is used, bucketed like any lesson.
    pub fn resolve(
        &self,
        caller: &Caller,
        now: DateTime<Utc>,
        adjustment: OffsetAdjustment,
    ) -> Result<ScheduleQuery> {
        let caller_id = caller.id.ok_or(ScheduleError::MissingCaller)?;
        let tutor_id = self.tutor_id.unwrap_or(caller_id);

        let mode = if tutor_id == caller_id {
            ScheduleMode::DayView
        } else if caller.admin {
            ScheduleMode::TutorChange
        } else {
            return Err(ScheduleError::Forbidden {
                caller: caller_id,
                tutor: tutor_id,
            });
        };

        let day_of_year = match self.date {
            Some(date) => date.ordinal(),
            None => today(now, adjustment),
        };

        Ok(ScheduleQuery {
            tutor_id,
            day_of_year,
            include_date_index: self.include_date_index || mode == ScheduleMode::TutorChange,
            mode,
        })
    }
}

/// Answer a resolved query with a single store round trip.
pub async fn run(
    store: &dyn LessonStore,
    query: ScheduleQuery,
    adjustment: OffsetAdjustment,
    timeout: Duration,
) -> Result<Schedule> {
    let students = fetch_tutor_lessons(store, query.tutor_id, timeout).await?;
    let entries = lessons_for_tutor_on_day(&students, query.day_of_year, adjustment);
    let date_index = query
        .include_date_index
        .then(|| lesson_dates_for_tutor(&students));

    tracing::debug!(
        "Schedule for tutor {} on day {}: {} entries",
        query.tutor_id,
        query.day_of_year,
        entries.len()
    );

    Ok(Schedule {
        mode: query.mode,
        day_of_year: query.day_of_year,
        entries,
        date_index,
    })
}
