// src/web/trip_handlers.rs
use crate::{
    error::AppResult,
    models::{
        pagination::Pagination,
        trip::{Trip, TripCreate, TripUpdate},
    },
    services::trip_service,
    state::AppState,
    web::{extractors::ValidatedJson, StatusResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

pub async fn handle_create_trip(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TripCreate>,
) -> AppResult<(StatusCode, Json<Trip>)> {
    let trip = trip_service::create_trip(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

pub async fn handle_list_trips(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Trip>>> {
    Ok(Json(trip_service::list_trips(&state.db_pool, page).await?))
}

pub async fn handle_get_trip(State(state): State<AppState>, Path(trip_id): Path<i64>) -> AppResult<Json<Trip>> {
    Ok(Json(trip_service::get_trip(&state.db_pool, trip_id).await?))
}

pub async fn handle_update_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<TripUpdate>,
) -> AppResult<Json<Trip>> {
    Ok(Json(trip_service::update_trip(&state.db_pool, trip_id, &payload).await?))
}

// PUT /trips/{id}/finalizar_ida
pub async fn handle_finalizar_ida(State(state): State<AppState>, Path(trip_id): Path<i64>) -> AppResult<Json<Trip>> {
    Ok(Json(trip_service::finalizar_ida(&state.db_pool, trip_id).await?))
}

// PUT /trips/{id}/finalizar_volta
pub async fn handle_finalizar_volta(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> AppResult<Json<Trip>> {
    Ok(Json(trip_service::finalizar_volta(&state.db_pool, trip_id).await?))
}

pub async fn handle_delete_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> AppResult<Json<StatusResponse>> {
    trip_service::delete_trip(&state.db_pool, trip_id).await?;
    Ok(Json(StatusResponse::deleted()))
}
