//! API routes module

pub mod schedule;
pub mod students;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Agenda, landing view and client offset routes
        .nest("/schedule", schedule::router())
        // Per-student lesson routes
        .nest("/students", students::router())
}
