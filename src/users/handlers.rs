use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{AvailabilityResponse, EmailCheckRequest, NicknameCheckRequest},
    entity::User,
};
use crate::{
    error::RestResult,
    helpers::{int_param, json_body, pagination, Pagination, SuccessResponse},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_all_users).post(save_user))
        .route(
            "/users/:user_id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/check-email", post(check_duplicated_email))
        .route("/users/check-nickname", post(check_duplicated_nickname))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> RestResult<Json<User>> {
    let user_id = int_param("user_id", user_id)?;
    let user = state.users.get_user_by_id(user_id).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn get_all_users(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> RestResult<Json<Vec<User>>> {
    let p = pagination(query)?;
    let users = state.users.get_all_users(p.limit, p.offset).await?;
    Ok(Json(users))
}

#[instrument(skip(state, payload))]
pub async fn save_user(
    State(state): State<AppState>,
    payload: Result<Json<User>, JsonRejection>,
) -> RestResult<Json<User>> {
    let user = json_body(payload)?;
    let user = state.users.save_user(user).await?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<User>, JsonRejection>,
) -> RestResult<Json<User>> {
    let user_id = int_param("user_id", user_id)?;
    let mut user = json_body(payload)?;
    user.id = user_id;
    let user = state.users.update_user(user).await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> RestResult<Json<SuccessResponse>> {
    let user_id = int_param("user_id", user_id)?;
    state.users.delete_user(user_id).await?;
    Ok(Json(SuccessResponse::success()))
}

#[instrument(skip(state, payload))]
pub async fn check_duplicated_email(
    State(state): State<AppState>,
    payload: Result<Json<EmailCheckRequest>, JsonRejection>,
) -> RestResult<Json<AvailabilityResponse>> {
    let body = json_body(payload)?;
    state.users.check_duplicated_email(&body.email).await?;
    Ok(Json(AvailabilityResponse { available: true }))
}

#[instrument(skip(state, payload))]
pub async fn check_duplicated_nickname(
    State(state): State<AppState>,
    payload: Result<Json<NicknameCheckRequest>, JsonRejection>,
) -> RestResult<Json<AvailabilityResponse>> {
    let body = json_body(payload)?;
    state.users.check_duplicated_nickname(&body.nickname).await?;
    Ok(Json(AvailabilityResponse { available: true }))
}
