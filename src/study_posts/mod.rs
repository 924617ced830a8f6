pub mod entity;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::study_post_routes()
}
