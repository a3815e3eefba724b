//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

use crate::schedule::ScheduleError;

// Errors

pub struct ApiError(anyhow::Error);

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<ScheduleError>() {
            Some(ScheduleError::UpstreamFetchFailure(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Some(
                ScheduleError::MalformedLessonInput(_)
                | ScheduleError::InvalidDate(_)
                | ScheduleError::InvalidTutor(_)
                | ScheduleError::OffsetOutOfRange(_),
            ) => StatusCode::BAD_REQUEST,
            Some(ScheduleError::UnknownStudent(_)) => StatusCode::NOT_FOUND,
            Some(ScheduleError::MissingCaller) => StatusCode::UNAUTHORIZED,
            Some(ScheduleError::Forbidden { .. }) => StatusCode::FORBIDDEN,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let retryable = self
            .0
            .downcast_ref::<ScheduleError>()
            .is_some_and(ScheduleError::is_retryable);

        if status.is_server_error() {
            tracing::error!("{}", self.0);
        } else {
            tracing::warn!("Rejected request: {}", self.0);
        }

        let body = Json(serde_json::json!({
            "error": self.0.to_string(),
            "retryable": retryable,
        }));
        (status, body).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` or `Result<_, ScheduleError>` to turn them into
/// `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod schedule {
    pub use crate::api::routes::schedule::public::*;
}

pub mod students {
    pub use crate::api::routes::students::public::*;
}
