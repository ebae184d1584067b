// src/web/user_handlers.rs
use crate::{
    error::AppResult,
    models::{
        pagination::Pagination,
        user::{User, UserCreate, UserProfilePicture, UserUpdate},
    },
    services::user_service,
    state::AppState,
    web::{extractors::ValidatedJson, OkResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

pub async fn handle_create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserCreate>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = user_service::create_user(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn handle_list_users(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<User>>> {
    Ok(Json(user_service::list_users(&state.db_pool, page).await?))
}

pub async fn handle_get_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> AppResult<Json<User>> {
    Ok(Json(user_service::get_user(&state.db_pool, user_id).await?))
}

pub async fn handle_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UserUpdate>,
) -> AppResult<Json<User>> {
    Ok(Json(user_service::update_user(&state.db_pool, user_id, &payload).await?))
}

// PUT /users/{id}/profile_picture
pub async fn handle_update_profile_picture(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UserProfilePicture>,
) -> AppResult<Json<User>> {
    Ok(Json(user_service::update_profile_picture(&state.db_pool, user_id, &payload.picture).await?))
}

pub async fn handle_delete_user(State(state): State<AppState>, Path(user_id): Path<i64>) -> AppResult<Json<OkResponse>> {
    user_service::delete_user(&state.db_pool, user_id).await?;
    Ok(Json(OkResponse::default()))
}
