//! Public types for the student lessons API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::adjust::split_lesson_list;

/// Lesson values as entered on the client, either a list or the calendar
/// widget's `"; "`-joined string.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum LessonList {
    Many(Vec<String>),
    Joined(String),
}

impl LessonList {
    pub fn values(&self) -> Vec<&str> {
        match self {
            LessonList::Many(values) => values.iter().map(String::as_str).collect(),
            LessonList::Joined(joined) => split_lesson_list(joined),
        }
    }
}

#[derive(Deserialize)]
pub struct PersistLessonsRequest {
    pub lessons: LessonList,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistLessonsResponse {
    pub student_id: i64,
    // Stored UTC instants, ascending
    pub lessons: Vec<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLessonsResponse {
    pub student_id: i64,
    // Client local instants, ascending
    pub lessons: Vec<DateTime<Utc>>,
    pub next_lesson_local: Option<DateTime<Utc>>,
}
