//! Student records as seen by the scheduler.
//!
//! The scheduler only reads the fields it displays and the lesson list, and
//! only writes the lesson list. Everything else about a student belongs to
//! the record store.

pub mod db;
mod models;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use db::SqliteLessonStore;
pub use models::{StudentDisplay, StudentLessons, Tutor};

#[async_trait]
pub trait LessonStore: Send + Sync {
    /// Every student assigned to the tutor with their stored lessons.
    async fn fetch_lessons_by_tutor(&self, tutor_id: i64) -> Result<Vec<StudentLessons>>;

    async fn fetch_student_lessons(&self, student_id: i64) -> Result<Option<StudentLessons>>;

    /// Replace the student's lessons wholesale. Returns `false` when the
    /// student does not exist.
    async fn replace_lessons(&self, student_id: i64, lessons: Vec<DateTime<Utc>>) -> Result<bool>;

    async fn list_tutors(&self) -> Result<Vec<Tutor>>;
}
