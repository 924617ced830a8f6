use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod entity;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
