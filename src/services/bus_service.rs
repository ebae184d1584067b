// src/services/bus_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        bus::{normalize_registration_number, Bus, BusCreate, BusUpdate},
        pagination::Pagination,
    },
};
use sqlx::{Sqlite, SqlitePool};

const BUS_COLUMNS: &str =
    "id, registration_number, name, capacity, system_deleted, create_date, update_date";

/// Busca um ônibus ativo. Aceita o pool ou uma transação aberta.
pub async fn find_bus<'e, E>(executor: E, bus_id: i64) -> AppResult<Option<Bus>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let bus = sqlx::query_as::<_, Bus>(&format!(
        "SELECT {} FROM buses WHERE id = ?1 AND system_deleted = 0",
        BUS_COLUMNS
    ))
    .bind(bus_id)
    .fetch_optional(executor)
    .await?;
    Ok(bus)
}

pub async fn get_bus(db_pool: &SqlitePool, bus_id: i64) -> AppResult<Bus> {
    find_bus(db_pool, bus_id).await?.ok_or_else(|| AppError::not_found("Bus not found"))
}

pub async fn list_buses(db_pool: &SqlitePool, page: Pagination) -> AppResult<Vec<Bus>> {
    let buses = sqlx::query_as::<_, Bus>(&format!(
        "SELECT {} FROM buses WHERE system_deleted = 0 ORDER BY id LIMIT ?1 OFFSET ?2",
        BUS_COLUMNS
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(db_pool)
    .await?;
    Ok(buses)
}

/// Verifica se a placa ou o nome já pertencem a outro ônibus ativo.
async fn ensure_unique(
    db_pool: &SqlitePool,
    registration_number: Option<&str>,
    name: Option<&str>,
    except_id: Option<i64>,
) -> AppResult<()> {
    if let Some(plate) = registration_number {
        let taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM buses
             WHERE registration_number = ?1 AND system_deleted = 0 AND id != ?2",
        )
        .bind(plate)
        .bind(except_id.unwrap_or(0))
        .fetch_one(db_pool)
        .await?;
        if taken > 0 {
            tracing::warn!("Placa '{}' já registada.", plate);
            return Err(AppError::bad_request("Registration number already registered"));
        }
    }

    if let Some(name) = name {
        let taken: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM buses WHERE name = ?1 AND system_deleted = 0 AND id != ?2",
        )
        .bind(name)
        .bind(except_id.unwrap_or(0))
        .fetch_one(db_pool)
        .await?;
        if taken > 0 {
            tracing::warn!("Nome de ônibus '{}' já registado.", name);
            return Err(AppError::bad_request("Bus name already registered"));
        }
    }

    Ok(())
}

pub async fn create_bus(db_pool: &SqlitePool, payload: &BusCreate) -> AppResult<Bus> {
    let plate = normalize_registration_number(&payload.registration_number)
        .map_err(AppError::bad_request)?;
    let name = payload.name.trim();

    ensure_unique(db_pool, Some(&plate), Some(name), None).await?;

    let id = sqlx::query("INSERT INTO buses (registration_number, name, capacity) VALUES (?1, ?2, ?3)")
        .bind(&plate)
        .bind(name)
        .bind(payload.capacity)
        .execute(db_pool)
        .await?
        .last_insert_rowid();

    tracing::info!("✅ Ônibus '{}' ({}) criado com ID {}.", name, plate, id);
    get_bus(db_pool, id).await
}

pub async fn update_bus(db_pool: &SqlitePool, bus_id: i64, payload: &BusUpdate) -> AppResult<Bus> {
    let current = get_bus(db_pool, bus_id).await?;

    let plate = match payload.registration_number.as_deref() {
        Some(raw) => normalize_registration_number(raw).map_err(AppError::bad_request)?,
        None => current.registration_number.clone(),
    };
    let name = payload.name.as_deref().map(str::trim).unwrap_or(&current.name).to_string();
    let capacity = payload.capacity.unwrap_or(current.capacity);

    // Só verifica unicidade do que realmente mudou
    let new_plate = (plate != current.registration_number).then_some(plate.as_str());
    let new_name = (name != current.name).then_some(name.as_str());
    ensure_unique(db_pool, new_plate, new_name, Some(bus_id)).await?;

    sqlx::query("UPDATE buses SET registration_number = ?1, name = ?2, capacity = ?3 WHERE id = ?4")
        .bind(&plate)
        .bind(&name)
        .bind(capacity)
        .bind(bus_id)
        .execute(db_pool)
        .await?;

    tracing::info!("Ônibus {} atualizado.", bus_id);
    get_bus(db_pool, bus_id).await
}

pub async fn delete_bus(db_pool: &SqlitePool, bus_id: i64) -> AppResult<()> {
    let rows_affected = sqlx::query("UPDATE buses SET system_deleted = 1 WHERE id = ?1 AND system_deleted = 0")
        .bind(bus_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao remover ônibus: {} não encontrado.", bus_id);
        return Err(AppError::not_found("Bus not found"));
    }
    tracing::info!("🗑️ Ônibus {} removido.", bus_id);
    Ok(())
}
