use axum_extra::extract::cookie::CookieJar;
use http::HeaderMap;

use crate::schedule::{CLIENT_OFFSET_COOKIE, Caller, ScheduleError};

/// Set by the auth layer in front of the API.
pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ADMIN_HEADER: &str = "x-user-admin";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

pub fn caller_from_headers(headers: &HeaderMap) -> Caller {
    let id = header_str(headers, USER_ID_HEADER).and_then(|v| v.trim().parse().ok());
    let admin = header_str(headers, USER_ADMIN_HEADER)
        .map(|v| matches!(v.trim(), "true" | "1"))
        .unwrap_or(false);
    Caller { id, admin }
}

pub fn client_offset_cookie(jar: &CookieJar) -> Option<String> {
    jar.get(CLIENT_OFFSET_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

/// The front end sends an empty tutor when none is selected.
pub fn parse_tutor_id(raw: Option<&str>) -> Result<Option<i64>, ScheduleError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ScheduleError::InvalidTutor(value.to_string())),
    }
}
