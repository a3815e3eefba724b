//! Writing and reading a single student's lessons.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::adjust::{parse_client_lessons, to_client_time, to_storage_times};
use super::agenda::next_lesson_local;
use super::error::{Result, ScheduleError};
use super::offset::OffsetAdjustment;
use crate::students::LessonStore;

/// A student's lessons as the client should see them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientLessons {
    pub student_id: i64,
    pub lessons: Vec<DateTime<Utc>>,
    pub next_lesson: Option<DateTime<Utc>>,
}

/// Replace a student's lessons with the submitted client-local values.
///
/// Every value is parsed before anything is written, so one bad value
/// leaves the stored list untouched. The write is bounded by `timeout`.
/// Returns the stored instants.
pub async fn persist_lessons<S: AsRef<str>>(
    store: &dyn LessonStore,
    student_id: i64,
    raw_lessons: &[S],
    adjustment: OffsetAdjustment,
    server_utc_offset_minutes: i32,
    timeout: Duration,
) -> Result<Vec<DateTime<Utc>>> {
    let client_local = parse_client_lessons(raw_lessons, server_utc_offset_minutes)?;
    let stored = to_storage_times(client_local, adjustment);

    let replaced =
        match tokio::time::timeout(timeout, store.replace_lessons(student_id, stored.clone())).await
        {
            Ok(Ok(replaced)) => replaced,
            Ok(Err(e)) => return Err(ScheduleError::UpstreamFetchFailure(e.to_string())),
            Err(_) => {
                return Err(ScheduleError::UpstreamFetchFailure(format!(
                    "storing lessons for student {} timed out after {:?}",
                    student_id, timeout
                )));
            }
        };
    if !replaced {
        return Err(ScheduleError::UnknownStudent(student_id));
    }

    tracing::info!(
        "Stored {} lessons for student {} (adjustment {} min)",
        stored.len(),
        student_id,
        adjustment.minutes()
    );
    Ok(stored)
}

/// Read a student's lessons in client time along with the next one due.
pub async fn client_lessons(
    store: &dyn LessonStore,
    student_id: i64,
    now: DateTime<Utc>,
    adjustment: OffsetAdjustment,
    timeout: Duration,
) -> Result<ClientLessons> {
    let student = match tokio::time::timeout(timeout, store.fetch_student_lessons(student_id)).await
    {
        Ok(Ok(Some(student))) => student,
        Ok(Ok(None)) => return Err(ScheduleError::UnknownStudent(student_id)),
        Ok(Err(e)) => return Err(ScheduleError::UpstreamFetchFailure(e.to_string())),
        Err(_) => {
            return Err(ScheduleError::UpstreamFetchFailure(format!(
                "fetching lessons for student {} timed out after {:?}",
                student_id, timeout
            )));
        }
    };

    let mut stored = student.lessons;
    stored.sort();

    Ok(ClientLessons {
        student_id,
        next_lesson: next_lesson_local(&stored, now, adjustment),
        lessons: stored
            .into_iter()
            .map(|lesson| to_client_time(lesson, adjustment))
            .collect(),
    })
}
