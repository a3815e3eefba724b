//! Router for the schedule API

use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use axum_extra::extract::Query;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use http::HeaderMap;

use super::public;
use crate::api::state::AppState;
use crate::api::utils::{caller_from_headers, client_offset_cookie, parse_tutor_id};
use crate::schedule::bucket::parse_client_date;
use crate::schedule::offset::{resolve, resolve_with_clock};
use crate::schedule::session;
use crate::schedule::{
    CLIENT_OFFSET_COOKIE, ClientOffset, Clock, ScheduleError, ScheduleRequest,
};
use crate::students::LessonStore;

type SharedState = Arc<RwLock<AppState>>;

fn request_handles(state: &SharedState) -> (Arc<dyn LessonStore>, Arc<dyn Clock>, Duration) {
    let shared_state = state.read().expect("Unable to read share state");
    (
        Arc::clone(&shared_state.store),
        Arc::clone(&shared_state.clock),
        shared_state.config.fetch_timeout(),
    )
}

// Agenda for one tutor and day
async fn agenda(
    State(state): State<SharedState>,
    headers: HeaderMap,
    jar: CookieJar,
    Query(params): Query<public::AgendaQuery>,
) -> Result<Json<public::AgendaResponse>, crate::api::public::ApiError> {
    let caller = caller_from_headers(&headers);
    let tutor_id = parse_tutor_id(params.tutor_id.as_deref())?;
    let date = params
        .date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(parse_client_date)
        .transpose()?;

    let (store, clock, timeout) = request_handles(&state);
    let adjustment = resolve_with_clock(client_offset_cookie(&jar).as_deref(), clock.as_ref());

    let request = ScheduleRequest {
        tutor_id,
        date,
        include_date_index: params.include_date_index,
    };
    let query = request.resolve(&caller, clock.now_utc(), adjustment)?;
    let schedule = session::run(store.as_ref(), query, adjustment, timeout).await?;

    Ok(Json(schedule.into()))
}

// Landing view for the caller's own schedule
async fn today(
    State(state): State<SharedState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<Json<public::TodayResponse>, crate::api::public::ApiError> {
    let caller = caller_from_headers(&headers);
    let (store, clock, timeout) = request_handles(&state);
    let adjustment = resolve_with_clock(client_offset_cookie(&jar).as_deref(), clock.as_ref());

    let request = ScheduleRequest {
        include_date_index: true,
        ..Default::default()
    };
    let query = request.resolve(&caller, clock.now_utc(), adjustment)?;
    let schedule = session::run(store.as_ref(), query, adjustment, timeout).await?;

    // Admins can switch to any tutor's schedule
    let tutors = if caller.admin {
        let tutors = tokio::time::timeout(timeout, store.list_tutors())
            .await
            .map_err(|_| ScheduleError::UpstreamFetchFailure("listing tutors timed out".into()))?
            .map_err(|e| ScheduleError::UpstreamFetchFailure(e.to_string()))?;
        Some(tutors)
    } else {
        None
    };

    Ok(Json(public::TodayResponse {
        day_of_year: schedule.day_of_year,
        entries: schedule.entries,
        date_index: schedule.date_index.unwrap_or_default(),
        tutors,
    }))
}

// Record the client's UTC offset for later requests
async fn record_offset(
    State(state): State<SharedState>,
    jar: CookieJar,
    Json(payload): Json<public::OffsetRequest>,
) -> Result<(CookieJar, Json<public::OffsetResponse>), crate::api::public::ApiError> {
    if !ClientOffset::is_plausible(payload.offset) {
        return Err(ScheduleError::OffsetOutOfRange(payload.offset).into());
    }

    let (server_offset, cookie_days) = {
        let shared_state = state.read().expect("Unable to read share state");
        (
            shared_state.clock.utc_offset_minutes(),
            shared_state.config.offset_cookie_days,
        )
    };

    let client_offset = ClientOffset(payload.offset);
    let cookie = Cookie::build((CLIENT_OFFSET_COOKIE, payload.offset.to_string()))
        .path("/")
        .max_age(time::Duration::days(cookie_days));

    Ok((
        jar.add(cookie),
        Json(public::OffsetResponse {
            client_offset: client_offset.minutes(),
            adjustment: resolve(client_offset, server_offset).minutes(),
        }),
    ))
}

/// Create the schedule router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(agenda))
        .route("/today", get(today))
        .route("/offset", post(record_offset))
}
