//! Agenda queries over a tutor's lessons.
//!
//! The store hands back raw rows; bucketing, filtering and ordering happen
//! here so every store gives the same answer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::adjust::to_client_time;
use super::bucket::day_of_year;
use super::error::{Result, ScheduleError};
use super::offset::OffsetAdjustment;
use crate::students::{LessonStore, StudentLessons};

/// One lesson on a tutor's agenda. Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaEntry {
    pub student_id: i64,
    pub name: String,
    pub lesson_instant: DateTime<Utc>,
    pub lesson_local_instant: DateTime<Utc>,
    pub client_day_of_year: u32,
    pub test_label: Option<String>,
    pub location_summary: Option<String>,
    pub slug: String,
    pub photo_ref: Option<String>,
}

/// Lessons whose client day is `day_of_year`, earliest local time first.
pub fn lessons_for_tutor_on_day(
    students: &[StudentLessons],
    day_of_year_target: u32,
    adjustment: OffsetAdjustment,
) -> Vec<AgendaEntry> {
    let mut entries: Vec<AgendaEntry> = students
        .iter()
        .flat_map(|student| {
            student.lessons.iter().filter_map(move |lesson| {
                let day = day_of_year(*lesson, adjustment);
                (day == day_of_year_target).then(|| AgendaEntry {
                    student_id: student.student_id,
                    name: student.display.name.clone(),
                    lesson_instant: *lesson,
                    lesson_local_instant: to_client_time(*lesson, adjustment),
                    client_day_of_year: day,
                    test_label: student.display.test_label.clone(),
                    location_summary: student.display.location_summary.clone(),
                    slug: student.display.slug.clone(),
                    photo_ref: student.display.photo_ref.clone(),
                })
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        a.lesson_local_instant
            .cmp(&b.lesson_local_instant)
            .then(a.student_id.cmp(&b.student_id))
    });
    entries
}

/// Every stored lesson instant across the tutor's students, ascending.
pub fn lesson_dates_for_tutor(students: &[StudentLessons]) -> Vec<DateTime<Utc>> {
    let mut dates: Vec<_> = students
        .iter()
        .flat_map(|student| student.lessons.iter().copied())
        .collect();
    dates.sort();
    dates
}

/// The first lesson after `now`, in client time.
pub fn next_lesson_local(
    lessons: &[DateTime<Utc>],
    now: DateTime<Utc>,
    adjustment: OffsetAdjustment,
) -> Option<DateTime<Utc>> {
    lessons
        .iter()
        .filter(|lesson| **lesson > now)
        .min()
        .map(|lesson| to_client_time(*lesson, adjustment))
}

/// Fetch a tutor's lessons, bounded by `timeout`. Any store failure or
/// timeout is an upstream failure the caller may retry.
pub async fn fetch_tutor_lessons(
    store: &dyn LessonStore,
    tutor_id: i64,
    timeout: Duration,
) -> Result<Vec<StudentLessons>> {
    match tokio::time::timeout(timeout, store.fetch_lessons_by_tutor(tutor_id)).await {
        Ok(Ok(students)) => Ok(students),
        Ok(Err(e)) => Err(ScheduleError::UpstreamFetchFailure(e.to_string())),
        Err(_) => Err(ScheduleError::UpstreamFetchFailure(format!(
            "fetching lessons for tutor {} timed out after {:?}",
            tutor_id, timeout
        ))),
    }
}
