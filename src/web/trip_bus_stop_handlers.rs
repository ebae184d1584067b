// src/web/trip_bus_stop_handlers.rs
use crate::{
    error::AppResult,
    models::{
        pagination::TripFilter,
        trip_bus_stop::{TripBusStop, TripBusStopCreate, TripBusStopUpdate},
    },
    services::trip_bus_stop_service,
    state::AppState,
    web::{extractors::ValidatedJson, OkResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

pub async fn handle_create_trip_bus_stop(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TripBusStopCreate>,
) -> AppResult<(StatusCode, Json<TripBusStop>)> {
    let row = trip_bus_stop_service::create_trip_bus_stop(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn handle_list_trip_bus_stops(
    State(state): State<AppState>,
    Query(filter): Query<TripFilter>,
) -> AppResult<Json<Vec<TripBusStop>>> {
    Ok(Json(trip_bus_stop_service::list_trip_bus_stops(&state.db_pool, filter.trip_id).await?))
}

pub async fn handle_get_trip_bus_stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TripBusStop>> {
    Ok(Json(trip_bus_stop_service::get_trip_bus_stop(&state.db_pool, id).await?))
}

// PUT /trip_bus_stops/{id}
pub async fn handle_update_trip_bus_stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<TripBusStopUpdate>,
) -> AppResult<Json<TripBusStop>> {
    let row =
        trip_bus_stop_service::update_status(&state.db_pool, state.notifier.as_ref(), id, payload.status).await?;
    Ok(Json(row))
}

pub async fn handle_delete_trip_bus_stop(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OkResponse>> {
    trip_bus_stop_service::delete_trip_bus_stop(&state.db_pool, id).await?;
    Ok(Json(OkResponse::default()))
}
