use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields of a student shown next to each agenda entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDisplay {
    pub name: String,
    pub test_label: Option<String>,
    pub location_summary: Option<String>,
    pub slug: String,
    pub photo_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentLessons {
    pub student_id: i64,
    pub display: StudentDisplay,
    // Stored UTC instants, in no particular order
    pub lessons: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub admin: bool,
}
