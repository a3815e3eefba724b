//! Lesson scheduling and time normalization.
//!
//! - [`offset`]: client/server offset resolution
//! - [`adjust`]: shifting lesson times to and from storage
//! - [`bucket`]: client-perceived day of a stored lesson
//! - [`agenda`]: a tutor's lessons on a day and their lesson-date index
//! - [`session`]: per-request tutor/day selection
//! - [`lessons`]: persisting and reading one student's lessons

pub mod adjust;
pub mod agenda;
pub mod bucket;
pub mod error;
pub mod lessons;
pub mod offset;
pub mod session;

pub use agenda::{AgendaEntry, lesson_dates_for_tutor, lessons_for_tutor_on_day};
pub use bucket::day_of_year;
pub use error::ScheduleError;
pub use offset::{
    CLIENT_OFFSET_COOKIE, ClientOffset, Clock, DEFAULT_CLIENT_OFFSET_MINUTES, FixedClock,
    MAX_OFFSET_MINUTES, OffsetAdjustment, SystemClock,
};
pub use session::{Caller, Schedule, ScheduleMode, ScheduleQuery, ScheduleRequest};
