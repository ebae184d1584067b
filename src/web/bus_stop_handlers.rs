// src/web/bus_stop_handlers.rs
use crate::{
    error::AppResult,
    models::{
        bus_stop::{BusStop, BusStopCreate, BusStopListItem, BusStopUpdate},
        pagination::Pagination,
    },
    services::bus_stop_service,
    state::AppState,
    web::{extractors::ValidatedJson, OkResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

pub async fn handle_create_bus_stop(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BusStopCreate>,
) -> AppResult<(StatusCode, Json<BusStop>)> {
    let stop = bus_stop_service::create_bus_stop(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(stop)))
}

pub async fn handle_list_bus_stops(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<BusStop>>> {
    Ok(Json(bus_stop_service::list_bus_stops(&state.db_pool, page).await?))
}

pub async fn handle_get_bus_stop(
    State(state): State<AppState>,
    Path(bus_stop_id): Path<i64>,
) -> AppResult<Json<BusStop>> {
    Ok(Json(bus_stop_service::get_bus_stop(&state.db_pool, bus_stop_id).await?))
}

pub async fn handle_update_bus_stop(
    State(state): State<AppState>,
    Path(bus_stop_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<BusStopUpdate>,
) -> AppResult<Json<BusStop>> {
    Ok(Json(bus_stop_service::update_bus_stop(&state.db_pool, bus_stop_id, &payload).await?))
}

pub async fn handle_delete_bus_stop(
    State(state): State<AppState>,
    Path(bus_stop_id): Path<i64>,
) -> AppResult<Json<OkResponse>> {
    bus_stop_service::delete_bus_stop(&state.db_pool, bus_stop_id).await?;
    Ok(Json(OkResponse::default()))
}

// GET /bus_stops/ida
pub async fn handle_ida_stops(State(state): State<AppState>) -> AppResult<Json<Vec<BusStopListItem>>> {
    Ok(Json(bus_stop_service::list_ida_stops(&state.db_pool).await?))
}

// GET /bus_stops/volta/{trip_id}
pub async fn handle_volta_stops(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> AppResult<Json<Vec<BusStopListItem>>> {
    Ok(Json(bus_stop_service::list_volta_stops(&state.db_pool, trip_id).await?))
}

// GET /bus_stops/list/faculty_names
pub async fn handle_faculty_names(State(state): State<AppState>) -> AppResult<Json<Vec<BusStopListItem>>> {
    Ok(Json(bus_stop_service::list_with_faculty_names(&state.db_pool).await?))
}
