use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::extractors::AuthUser;
use crate::{
    error::RestResult,
    helpers::json_body,
    state::AppState,
    users::{
        dto::{LoginRequest, LoginResponse, RefreshRequest},
        entity::User,
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> RestResult<Json<LoginResponse>> {
    let payload = json_body(payload)?;
    let user = state
        .users
        .find_by_email_and_password(&payload.email, &payload.password)
        .await?;
    let response = state.users.login_user(user)?;
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> RestResult<Json<LoginResponse>> {
    let payload = json_body(payload)?;
    let response = state.users.refresh_tokens(&payload.refresh_token).await?;
    Ok(Json(response))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> RestResult<Json<User>> {
    let user = state.users.get_user_by_id(user_id).await?;
    Ok(Json(user))
}
