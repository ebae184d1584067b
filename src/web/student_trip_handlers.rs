// src/web/student_trip_handlers.rs
use crate::{
    error::AppResult,
    models::{
        pagination::{Pagination, TripFilter},
        student_trip::{StudentTrip, StudentTripCreate, StudentTripStatusUpdate, UpdatePointParams, UpdateTripParams},
    },
    services::student_trip_service,
    state::AppState,
    web::{extractors::ValidatedJson, StatusResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

pub async fn handle_create_student_trip(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StudentTripCreate>,
) -> AppResult<(StatusCode, Json<StudentTrip>)> {
    let row = student_trip_service::create_student_trip(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

// GET /student_trips?trip_id=&skip=&limit=
pub async fn handle_list_student_trips(
    State(state): State<AppState>,
    Query(filter): Query<TripFilter>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<StudentTrip>>> {
    Ok(Json(student_trip_service::list_student_trips(&state.db_pool, filter.trip_id, page).await?))
}

pub async fn handle_get_student_trip(
    State(state): State<AppState>,
    Path(student_trip_id): Path<i64>,
) -> AppResult<Json<StudentTrip>> {
    Ok(Json(student_trip_service::get_student_trip(&state.db_pool, student_trip_id).await?))
}

// PUT /student_trips/{id}/update_point?point_id=
pub async fn handle_update_point(
    State(state): State<AppState>,
    Path(student_trip_id): Path<i64>,
    Query(params): Query<UpdatePointParams>,
) -> AppResult<Json<StudentTrip>> {
    Ok(Json(student_trip_service::update_point(&state.db_pool, student_trip_id, params.point_id).await?))
}

// PUT /student_trips/{id}/update_trip?new_trip_id=
pub async fn handle_update_trip(
    State(state): State<AppState>,
    Path(student_trip_id): Path<i64>,
    Query(params): Query<UpdateTripParams>,
) -> AppResult<Json<StudentTrip>> {
    Ok(Json(student_trip_service::move_to_trip(&state.db_pool, student_trip_id, params.new_trip_id).await?))
}

// PUT /student_trips/{id}/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(student_trip_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<StudentTripStatusUpdate>,
) -> AppResult<Json<StudentTrip>> {
    Ok(Json(student_trip_service::update_status(&state.db_pool, student_trip_id, payload.status).await?))
}

pub async fn handle_delete_student_trip(
    State(state): State<AppState>,
    Path(student_trip_id): Path<i64>,
) -> AppResult<Json<StatusResponse>> {
    student_trip_service::delete_student_trip(&state.db_pool, student_trip_id).await?;
    Ok(Json(StatusResponse::deleted()))
}
