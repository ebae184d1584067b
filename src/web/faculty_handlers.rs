// src/web/faculty_handlers.rs
use crate::{
    error::AppResult,
    models::{
        faculty::{Faculty, FacultyCreate, FacultyUpdate},
        pagination::Pagination,
    },
    services::faculty_service,
    state::AppState,
    web::extractors::ValidatedJson,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

// POST /faculties
pub async fn handle_create_faculty(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<FacultyCreate>,
) -> AppResult<(StatusCode, Json<Faculty>)> {
    let faculty = faculty_service::create_faculty(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(faculty)))
}

// GET /faculties
pub async fn handle_list_faculties(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Faculty>>> {
    Ok(Json(faculty_service::list_faculties(&state.db_pool, page).await?))
}

// GET /faculties/{id}
pub async fn handle_get_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<i64>,
) -> AppResult<Json<Faculty>> {
    Ok(Json(faculty_service::get_faculty(&state.db_pool, faculty_id).await?))
}

// PUT /faculties/{id}
pub async fn handle_update_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<FacultyUpdate>,
) -> AppResult<Json<Faculty>> {
    Ok(Json(faculty_service::update_faculty(&state.db_pool, faculty_id, &payload).await?))
}

// DELETE /faculties/{id}: devolve a faculdade removida
pub async fn handle_delete_faculty(
    State(state): State<AppState>,
    Path(faculty_id): Path<i64>,
) -> AppResult<Json<Faculty>> {
    Ok(Json(faculty_service::delete_faculty(&state.db_pool, faculty_id).await?))
}
