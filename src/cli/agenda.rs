use anyhow::Result;

use crate::core::AppConfig;
use crate::core::db::async_db;
use crate::schedule::bucket::parse_client_date;
use crate::schedule::offset::resolve_with_clock;
use crate::schedule::session;
use crate::schedule::{Caller, Clock, ScheduleRequest, SystemClock};
use crate::students::SqliteLessonStore;

pub async fn run(
    tutor: i64,
    date: Option<String>,
    offset: Option<String>,
    dates: bool,
    config: &AppConfig,
) -> Result<()> {
    let db = async_db(&config.db_path).await?;
    let store = SqliteLessonStore::new(db);
    let clock = SystemClock;
    let adjustment = resolve_with_clock(offset.as_deref(), &clock);

    let request = ScheduleRequest {
        tutor_id: Some(tutor),
        date: date.as_deref().map(parse_client_date).transpose()?,
        include_date_index: dates,
    };
    let caller = Caller {
        id: Some(tutor),
        admin: false,
    };
    let query = request.resolve(&caller, clock.now_utc(), adjustment)?;
    let schedule = session::run(&store, query, adjustment, config.fetch_timeout()).await?;

    println!(
        "Day {} ({} min adjustment)",
        schedule.day_of_year,
        adjustment.minutes()
    );
    if schedule.entries.is_empty() {
        println!("No students scheduled");
    }
    for entry in &schedule.entries {
        println!(
            "{}  {}  {}",
            entry.lesson_local_instant.format("%l:%M %P"),
            entry.name,
            entry.test_label.as_deref().unwrap_or("")
        );
    }

    if let Some(date_index) = schedule.date_index {
        println!("Lesson dates:");
        for lesson in date_index {
            println!("  {}", lesson.to_rfc3339());
        }
    }

    Ok(())
}
