//! Router for the student lessons API

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use http::HeaderMap;

use super::public;
use crate::api::state::AppState;
use crate::api::utils::{caller_from_headers, client_offset_cookie};
use crate::schedule::ScheduleError;
use crate::schedule::lessons::{client_lessons, persist_lessons};
use crate::schedule::offset::resolve_with_clock;

type SharedState = Arc<RwLock<AppState>>;

// Replace a student's lessons with the values the client entered
async fn replace_lessons(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(payload): Json<public::PersistLessonsRequest>,
) -> Result<Json<public::PersistLessonsResponse>, crate::api::public::ApiError> {
    caller_from_headers(&headers)
        .id
        .ok_or(ScheduleError::MissingCaller)?;

    let (store, clock, timeout) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            Arc::clone(&shared_state.store),
            Arc::clone(&shared_state.clock),
            shared_state.config.fetch_timeout(),
        )
    };
    let adjustment = resolve_with_clock(client_offset_cookie(&jar).as_deref(), clock.as_ref());
    let values = payload.lessons.values();

    let stored = persist_lessons(
        store.as_ref(),
        id,
        values.as_slice(),
        adjustment,
        clock.utc_offset_minutes(),
        timeout,
    )
    .await?;

    Ok(Json(public::PersistLessonsResponse {
        student_id: id,
        lessons: stored,
    }))
}

// A student's lessons in client time with the next one due
async fn view_lessons(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<Json<public::StudentLessonsResponse>, crate::api::public::ApiError> {
    caller_from_headers(&headers)
        .id
        .ok_or(ScheduleError::MissingCaller)?;

    let (store, clock, timeout) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            Arc::clone(&shared_state.store),
            Arc::clone(&shared_state.clock),
            shared_state.config.fetch_timeout(),
        )
    };
    let adjustment = resolve_with_clock(client_offset_cookie(&jar).as_deref(), clock.as_ref());

    let lessons = client_lessons(store.as_ref(), id, clock.now_utc(), adjustment, timeout).await?;

    Ok(Json(public::StudentLessonsResponse {
        student_id: lessons.student_id,
        lessons: lessons.lessons,
        next_lesson_local: lessons.next_lesson,
    }))
}

/// Create the student lessons router
pub fn router() -> Router<SharedState> {
    Router::new().route("/{id}/lessons", get(view_lessons).post(replace_lessons))
}
