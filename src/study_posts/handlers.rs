use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::entity::StudyPost;
use crate::{
    error::RestResult,
    helpers::{int_param, json_body, pagination, Pagination, SuccessResponse},
    state::AppState,
};

pub fn study_post_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/study-posts",
            get(get_posts_in_latest_order).post(save_post),
        )
        .route(
            "/study-posts/:study_post_id",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/users/:user_id/study-posts", get(get_posts_by_user_id))
}

#[instrument(skip(state))]
pub async fn get_post(
    State(state): State<AppState>,
    post_id: Result<Path<i64>, PathRejection>,
) -> RestResult<Json<StudyPost>> {
    let post_id = int_param("study_post_id", post_id)?;
    let post = state.study_posts.get_post(post_id).await?;
    Ok(Json(post))
}

#[instrument(skip(state))]
pub async fn get_posts_in_latest_order(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> RestResult<Json<Vec<StudyPost>>> {
    let p = pagination(query)?;
    let posts = state
        .study_posts
        .get_posts_in_latest_order(p.limit, p.offset)
        .await?;
    Ok(Json(posts))
}

#[instrument(skip(state))]
pub async fn get_posts_by_user_id(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> RestResult<Json<Vec<StudyPost>>> {
    let user_id = int_param("user_id", user_id)?;
    let p = pagination(query)?;
    let posts = state
        .study_posts
        .get_posts_by_user_id(user_id, p.limit, p.offset)
        .await?;
    Ok(Json(posts))
}

#[instrument(skip(state, payload))]
pub async fn save_post(
    State(state): State<AppState>,
    payload: Result<Json<StudyPost>, JsonRejection>,
) -> RestResult<Json<StudyPost>> {
    let post = json_body(payload)?;
    let post = state.study_posts.save_post(post).await?;
    Ok(Json(post))
}

#[instrument(skip(state, payload))]
pub async fn update_post(
    State(state): State<AppState>,
    post_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StudyPost>, JsonRejection>,
) -> RestResult<Json<StudyPost>> {
    let post_id = int_param("study_post_id", post_id)?;
    let mut post = json_body(payload)?;
    post.id = post_id;
    let post = state.study_posts.update_post(post).await?;
    Ok(Json(post))
}

#[instrument(skip(state))]
pub async fn delete_post(
    State(state): State<AppState>,
    post_id: Result<Path<i64>, PathRejection>,
) -> RestResult<Json<SuccessResponse>> {
    let post_id = int_param("study_post_id", post_id)?;
    state.study_posts.delete_post(post_id).await?;
    Ok(Json(SuccessResponse::success()))
}
