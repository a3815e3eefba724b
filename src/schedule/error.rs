//! Error types for scheduling operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Lesson store unavailable: {0}")]
    UpstreamFetchFailure(String),

    #[error("Malformed lesson input: {0:?}")]
    MalformedLessonInput(String),

    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    #[error("Client offset out of range: {0} minutes")]
    OffsetOutOfRange(i32),

    #[error("Invalid tutor id: {0:?}")]
    InvalidTutor(String),

    #[error("Unknown student: {0}")]
    UnknownStudent(i64),

    #[error("Missing caller identity")]
    MissingCaller,

    #[error("Caller {caller} is not allowed to view tutor {tutor}")]
    Forbidden { caller: i64, tutor: i64 },
}

impl ScheduleError {
    /// Whether the caller can expect the same request to succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScheduleError::UpstreamFetchFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
