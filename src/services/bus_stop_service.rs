// src/services/bus_stop_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        bus_stop::{BusStop, BusStopCreate, BusStopListItem, BusStopUpdate, BusStopWithFaculty},
        pagination::Pagination,
        trip_bus_stop::TripBusStopStatus,
    },
    services::faculty_service,
};
use sqlx::{FromRow, Sqlite, SqlitePool};

const BUS_STOP_COLUMNS: &str = "id, name, faculty_id, system_deleted, create_date, update_date";

pub async fn find_bus_stop<'e, E>(executor: E, bus_stop_id: i64) -> AppResult<Option<BusStop>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let stop = sqlx::query_as::<_, BusStop>(&format!(
        "SELECT {} FROM bus_stops WHERE id = ?1 AND system_deleted = 0",
        BUS_STOP_COLUMNS
    ))
    .bind(bus_stop_id)
    .fetch_optional(executor)
    .await?;
    Ok(stop)
}

pub async fn get_bus_stop(db_pool: &SqlitePool, bus_stop_id: i64) -> AppResult<BusStop> {
    find_bus_stop(db_pool, bus_stop_id)
        .await?
        .ok_or_else(|| AppError::not_found("Bus stop not found"))
}

pub async fn list_bus_stops(db_pool: &SqlitePool, page: Pagination) -> AppResult<Vec<BusStop>> {
    let stops = sqlx::query_as::<_, BusStop>(&format!(
        "SELECT {} FROM bus_stops WHERE system_deleted = 0 ORDER BY id LIMIT ?1 OFFSET ?2",
        BUS_STOP_COLUMNS
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(db_pool)
    .await?;
    Ok(stops)
}

async fn ensure_faculty_exists(db_pool: &SqlitePool, faculty_id: i64) -> AppResult<()> {
    faculty_service::get_faculty(db_pool, faculty_id).await.map(|_| ())
}

async fn name_taken(db_pool: &SqlitePool, name: &str, except_id: i64) -> AppResult<bool> {
    let taken: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM bus_stops WHERE name = ?1 AND system_deleted = 0 AND id != ?2",
    )
    .bind(name)
    .bind(except_id)
    .fetch_one(db_pool)
    .await?;
    Ok(taken > 0)
}

/// Cria um ponto. Se existir um ponto removido com o mesmo nome, ele é
/// reativado com a nova faculdade em vez de se inserir outra linha.
pub async fn create_bus_stop(db_pool: &SqlitePool, payload: &BusStopCreate) -> AppResult<BusStop> {
    let name = payload.name.trim();
    ensure_faculty_exists(db_pool, payload.faculty_id).await?;

    if name_taken(db_pool, name, 0).await? {
        tracing::warn!("Ponto '{}' já registado.", name);
        return Err(AppError::bad_request("Bus stop name already registered"));
    }

    let deleted_id: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM bus_stops WHERE name = ?1 AND system_deleted = 1 ORDER BY id DESC LIMIT 1",
    )
    .bind(name)
    .fetch_optional(db_pool)
    .await?;

    let id = match deleted_id {
        Some(id) => {
            sqlx::query("UPDATE bus_stops SET system_deleted = 0, faculty_id = ?1 WHERE id = ?2")
                .bind(payload.faculty_id)
                .bind(id)
                .execute(db_pool)
                .await?;
            tracing::info!("♻️ Ponto '{}' reativado (ID {}).", name, id);
            id
        }
        None => {
            let id = sqlx::query("INSERT INTO bus_stops (name, faculty_id) VALUES (?1, ?2)")
                .bind(name)
                .bind(payload.faculty_id)
                .execute(db_pool)
                .await?
                .last_insert_rowid();
            tracing::info!("✅ Ponto '{}' criado com ID {}.", name, id);
            id
        }
    };

    get_bus_stop(db_pool, id).await
}

pub async fn update_bus_stop(
    db_pool: &SqlitePool,
    bus_stop_id: i64,
    payload: &BusStopUpdate,
) -> AppResult<BusStop> {
    let current = get_bus_stop(db_pool, bus_stop_id).await?;

    let name = payload.name.as_deref().map(str::trim).unwrap_or(&current.name).to_string();
    if name != current.name && name_taken(db_pool, &name, bus_stop_id).await? {
        return Err(AppError::bad_request("Bus stop name already registered"));
    }

    let faculty_id = payload.faculty_id.unwrap_or(current.faculty_id);
    if faculty_id != current.faculty_id {
        ensure_faculty_exists(db_pool, faculty_id).await?;
    }

    sqlx::query("UPDATE bus_stops SET name = ?1, faculty_id = ?2 WHERE id = ?3")
        .bind(&name)
        .bind(faculty_id)
        .bind(bus_stop_id)
        .execute(db_pool)
        .await?;

    get_bus_stop(db_pool, bus_stop_id).await
}

pub async fn delete_bus_stop(db_pool: &SqlitePool, bus_stop_id: i64) -> AppResult<()> {
    let rows_affected =
        sqlx::query("UPDATE bus_stops SET system_deleted = 1 WHERE id = ?1 AND system_deleted = 0")
            .bind(bus_stop_id)
            .execute(db_pool)
            .await?
            .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::not_found("Bus stop not found"));
    }
    tracing::info!("🗑️ Ponto {} removido.", bus_stop_id);
    Ok(())
}

async fn stops_with_faculty(db_pool: &SqlitePool) -> AppResult<Vec<BusStopWithFaculty>> {
    let rows = sqlx::query_as::<_, BusStopWithFaculty>(
        r#"
        SELECT s.id, s.name, f.name AS faculty_name
        FROM bus_stops s
        JOIN faculties f ON f.id = s.faculty_id
        WHERE s.system_deleted = 0
        ORDER BY s.id
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    Ok(rows)
}

/// Pontos da viagem de ida: todos os pontos ativos, ainda "A caminho".
pub async fn list_ida_stops(db_pool: &SqlitePool) -> AppResult<Vec<BusStopListItem>> {
    let items: Vec<BusStopListItem> = stops_with_faculty(db_pool)
        .await?
        .into_iter()
        .map(|row| {
            BusStopListItem::new(
                row.id,
                &row.name,
                &row.faculty_name,
                Some(TripBusStopStatus::ACaminho.label()),
            )
        })
        .collect();

    if items.is_empty() {
        return Err(AppError::not_found("No bus stops found"));
    }
    Ok(items)
}

#[derive(FromRow)]
struct VoltaStopRow {
    id: i64,
    name: String,
    faculty_name: String,
    status: TripBusStopStatus,
}

/// Pontos de uma viagem de volta, com o estado de cada um nessa viagem.
pub async fn list_volta_stops(db_pool: &SqlitePool, trip_id: i64) -> AppResult<Vec<BusStopListItem>> {
    let rows = sqlx::query_as::<_, VoltaStopRow>(
        r#"
        SELECT s.id, s.name, f.name AS faculty_name, tbs.status
        FROM trip_bus_stops tbs
        JOIN bus_stops s ON s.id = tbs.bus_stop_id
        JOIN faculties f ON f.id = s.faculty_id
        WHERE tbs.trip_id = ?1 AND tbs.system_deleted = 0 AND s.system_deleted = 0
        ORDER BY tbs.id
        "#,
    )
    .bind(trip_id)
    .fetch_all(db_pool)
    .await?;

    if rows.is_empty() {
        return Err(AppError::not_found("No bus stops found for this trip"));
    }

    Ok(rows
        .into_iter()
        .map(|row| BusStopListItem::new(row.id, &row.name, &row.faculty_name, Some(row.status.label())))
        .collect())
}

pub async fn list_with_faculty_names(db_pool: &SqlitePool) -> AppResult<Vec<BusStopListItem>> {
    let items: Vec<BusStopListItem> = stops_with_faculty(db_pool)
        .await?
        .into_iter()
        .map(|row| BusStopListItem::new(row.id, &row.name, &row.faculty_name, None))
        .collect();

    if items.is_empty() {
        return Err(AppError::not_found("No bus stops found"));
    }
    Ok(items)
}
