//! Public types for the schedule API
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{AgendaEntry, Schedule, ScheduleMode};
use crate::students::Tutor;

/// Query for a tutor's agenda. The front end's `tutor` and `getDates`
/// names are accepted too.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaQuery {
    #[serde(alias = "tutor")]
    pub tutor_id: Option<String>,
    // YYYYMMDD or YYYY-MM-DD, the client's today when missing
    pub date: Option<String>,
    #[serde(default, alias = "getDates")]
    pub include_date_index: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaResponse {
    pub mode: ScheduleMode,
    pub day_of_year: u32,
    pub entries: Vec<AgendaEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_index: Option<Vec<DateTime<Utc>>>,
}

impl From<Schedule> for AgendaResponse {
    fn from(schedule: Schedule) -> Self {
        Self {
            mode: schedule.mode,
            day_of_year: schedule.day_of_year,
            entries: schedule.entries,
            date_index: schedule.date_index,
        }
    }
}

/// Landing view: today's agenda, the full date index, and the tutors an
/// admin can switch between.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayResponse {
    pub day_of_year: u32,
    pub entries: Vec<AgendaEntry>,
    pub date_index: Vec<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tutors: Option<Vec<Tutor>>,
}

#[derive(Deserialize)]
pub struct OffsetRequest {
    pub offset: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetResponse {
    pub client_offset: i32,
    pub adjustment: i32,
}
