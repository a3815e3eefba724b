//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};
use chrono::{DateTime, Utc};
use tokio_rusqlite::Connection;

use tutor_schedule::api::AppState;
use tutor_schedule::api::app;
use tutor_schedule::core::AppConfig;
use tutor_schedule::core::db::initialize_db;
use tutor_schedule::schedule::FixedClock;
use tutor_schedule::students::db::NewStudent;
use tutor_schedule::students::{LessonStore, SqliteLessonStore};

// Seeded ids, in insertion order
pub const ADA: i64 = 1;
pub const GRACE: i64 = 2;
pub const NOBODY: i64 = 3;
pub const SAM: i64 = 1;
pub const KIM: i64 = 2;
pub const PAT: i64 = 3;
pub const LEE: i64 = 4;

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// 3am UTC on March 2nd 2024, still the evening of March 1st on the
/// Pacific coast. The server runs on UTC.
pub fn test_clock() -> FixedClock {
    FixedClock::new(utc("2024-03-02T03:00:00Z"), 0)
}

pub fn test_config() -> AppConfig {
    AppConfig {
        storage_path: String::from("./"),
        db_path: String::from("./db"),
        fetch_timeout_secs: 5,
        offset_cookie_days: 365,
    }
}

fn student(name: &str, tutor_id: i64, test_label: &str) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        slug: name.to_lowercase(),
        tutor_id: Some(tutor_id),
        test_label: Some(test_label.to_string()),
        address: Some(format!("{} Lane", name)),
        photo_ref: None,
    }
}

/// Ada tutors Sam, Kim and Pat (no lessons). Grace is an admin tutoring
/// Lee. Nobody has no students.
async fn seed(db: &Connection) {
    let store = SqliteLessonStore::new(db.clone());

    store.insert_tutor("Ada", "ada@example.com", false).await.unwrap();
    store.insert_tutor("Grace", "grace@example.com", true).await.unwrap();
    store.insert_tutor("Nobody", "nobody@example.com", false).await.unwrap();

    store.insert_student(student("Sam", ADA, "SAT")).await.unwrap();
    store.insert_student(student("Kim", ADA, "ACT")).await.unwrap();
    store.insert_student(student("Pat", ADA, "GRE")).await.unwrap();
    store.insert_student(student("Lee", GRACE, "SAT")).await.unwrap();

    store
        .replace_lessons(
            SAM,
            vec![
                utc("2024-03-02T02:30:00Z"),
                utc("2024-03-02T20:00:00Z"),
                utc("2024-03-01T20:00:00Z"),
            ],
        )
        .await
        .unwrap();
    store
        .replace_lessons(KIM, vec![utc("2024-03-01T17:00:00Z")])
        .await
        .unwrap();
    store
        .replace_lessons(LEE, vec![utc("2024-03-01T18:00:00Z")])
        .await
        .unwrap();
}

async fn test_db() -> Connection {
    let db = Connection::open_in_memory()
        .await
        .expect("Failed to open in memory db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to migrate db");
        Ok(())
    })
    .await
    .unwrap();
    db
}

/// Creates a test application router backed by a seeded in-memory
/// database and a frozen clock.
pub async fn test_app() -> Router {
    let db = test_db().await;
    seed(&db).await;

    let app_state = AppState::new(db, test_config()).with_clock(test_clock());
    app(Arc::new(RwLock::new(app_state)))
}

/// Same as `test_app` with the lesson store swapped out.
pub async fn test_app_with_store(store: impl LessonStore + 'static) -> Router {
    test_app_with_store_and_config(store, test_config()).await
}

pub async fn test_app_with_store_and_config(
    store: impl LessonStore + 'static,
    config: AppConfig,
) -> Router {
    let db = test_db().await;
    let app_state = AppState::new(db, config)
        .with_clock(test_clock())
        .with_store(store);
    app(Arc::new(RwLock::new(app_state)))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}
