// src/web/bus_handlers.rs
use crate::{
    error::AppResult,
    models::{
        bus::{Bus, BusCreate, BusUpdate},
        pagination::Pagination,
    },
    services::bus_service,
    state::AppState,
    web::{extractors::ValidatedJson, OkResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

pub async fn handle_create_bus(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<BusCreate>,
) -> AppResult<(StatusCode, Json<Bus>)> {
    let bus = bus_service::create_bus(&state.db_pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(bus)))
}

pub async fn handle_list_buses(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Vec<Bus>>> {
    Ok(Json(bus_service::list_buses(&state.db_pool, page).await?))
}

pub async fn handle_get_bus(State(state): State<AppState>, Path(bus_id): Path<i64>) -> AppResult<Json<Bus>> {
    Ok(Json(bus_service::get_bus(&state.db_pool, bus_id).await?))
}

pub async fn handle_update_bus(
    State(state): State<AppState>,
    Path(bus_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<BusUpdate>,
) -> AppResult<Json<Bus>> {
    Ok(Json(bus_service::update_bus(&state.db_pool, bus_id, &payload).await?))
}

pub async fn handle_delete_bus(State(state): State<AppState>, Path(bus_id): Path<i64>) -> AppResult<Json<OkResponse>> {
    bus_service::delete_bus(&state.db_pool, bus_id).await?;
    Ok(Json(OkResponse::default()))
}
