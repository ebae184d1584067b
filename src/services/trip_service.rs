// src/services/trip_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::Pagination,
        student_trip::StudentStatus,
        trip::{Trip, TripCreate, TripStatus, TripType, TripUpdate},
        trip_bus_stop::TripBusStopStatus,
    },
    services::{bus_service, user_service},
};
use sqlx::{Sqlite, SqlitePool};

const TRIP_COLUMNS: &str =
    "id, trip_type, status, bus_id, driver_id, bus_issue, system_deleted, create_date, update_date";

const ACTIVE_TRIP_CONFLICT: &str = "Há uma viagem ativa para o ônibus ou motorista";

pub async fn find_trip<'e, E>(executor: E, trip_id: i64) -> AppResult<Option<Trip>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let trip = sqlx::query_as::<_, Trip>(&format!(
        "SELECT {} FROM trips WHERE id = ?1 AND system_deleted = 0",
        TRIP_COLUMNS
    ))
    .bind(trip_id)
    .fetch_optional(executor)
    .await?;
    Ok(trip)
}

pub async fn get_trip(db_pool: &SqlitePool, trip_id: i64) -> AppResult<Trip> {
    find_trip(db_pool, trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))
}

pub async fn list_trips(db_pool: &SqlitePool, page: Pagination) -> AppResult<Vec<Trip>> {
    let trips = sqlx::query_as::<_, Trip>(&format!(
        "SELECT {} FROM trips WHERE system_deleted = 0 ORDER BY id LIMIT ?1 OFFSET ?2",
        TRIP_COLUMNS
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(db_pool)
    .await?;
    Ok(trips)
}

/// Um ônibus ou motorista só pode estar numa viagem ativa de cada vez.
async fn ensure_no_active_trip(
    db_pool: &SqlitePool,
    bus_id: i64,
    driver_id: i64,
    except_id: i64,
) -> AppResult<()> {
    let active: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM trips
        WHERE system_deleted = 0 AND status = ?1 AND (bus_id = ?2 OR driver_id = ?3) AND id != ?4
        "#,
    )
    .bind(TripStatus::Ativa)
    .bind(bus_id)
    .bind(driver_id)
    .bind(except_id)
    .fetch_one(db_pool)
    .await?;

    if active > 0 {
        tracing::warn!(
            "Viagem rejeitada: ônibus {} ou motorista {} já têm viagem ativa.",
            bus_id,
            driver_id
        );
        return Err(AppError::bad_request(ACTIVE_TRIP_CONFLICT));
    }
    Ok(())
}

async fn ensure_bus_and_driver(db_pool: &SqlitePool, bus_id: i64, driver_id: i64) -> AppResult<()> {
    bus_service::get_bus(db_pool, bus_id).await?;
    user_service::find_user_by_id(db_pool, driver_id)
        .await?
        .ok_or_else(|| AppError::not_found("Driver not found"))?;
    Ok(())
}

pub async fn create_trip(db_pool: &SqlitePool, payload: &TripCreate) -> AppResult<Trip> {
    ensure_bus_and_driver(db_pool, payload.bus_id, payload.driver_id).await?;

    let status = payload.status.unwrap_or(TripStatus::Ativa);
    if status == TripStatus::Ativa {
        ensure_no_active_trip(db_pool, payload.bus_id, payload.driver_id, 0).await?;
    }

    let id = sqlx::query("INSERT INTO trips (trip_type, status, bus_id, driver_id) VALUES (?1, ?2, ?3, ?4)")
        .bind(payload.trip_type)
        .bind(status)
        .bind(payload.bus_id)
        .bind(payload.driver_id)
        .execute(db_pool)
        .await?
        .last_insert_rowid();

    tracing::info!(
        "🚌 Viagem {} criada ({:?}, ônibus {}, motorista {}).",
        id,
        payload.trip_type,
        payload.bus_id,
        payload.driver_id
    );
    get_trip(db_pool, id).await
}

pub async fn update_trip(db_pool: &SqlitePool, trip_id: i64, payload: &TripUpdate) -> AppResult<Trip> {
    let current = get_trip(db_pool, trip_id).await?;

    let trip_type = payload.trip_type.unwrap_or(current.trip_type);
    let status = payload.status.unwrap_or(current.status);
    let bus_id = payload.bus_id.unwrap_or(current.bus_id);
    let driver_id = payload.driver_id.unwrap_or(current.driver_id);
    let bus_issue = payload.bus_issue.unwrap_or(current.bus_issue);

    if bus_id != current.bus_id || driver_id != current.driver_id {
        ensure_bus_and_driver(db_pool, bus_id, driver_id).await?;
    }
    let reassigned = bus_id != current.bus_id || driver_id != current.driver_id;
    if status == TripStatus::Ativa && (reassigned || !current.is_active()) {
        ensure_no_active_trip(db_pool, bus_id, driver_id, trip_id).await?;
    }

    sqlx::query(
        "UPDATE trips SET trip_type = ?1, status = ?2, bus_id = ?3, driver_id = ?4, bus_issue = ?5 WHERE id = ?6",
    )
    .bind(trip_type)
    .bind(status)
    .bind(bus_id)
    .bind(driver_id)
    .bind(bus_issue)
    .bind(trip_id)
    .execute(db_pool)
    .await?;

    tracing::info!("Viagem {} atualizada.", trip_id);
    get_trip(db_pool, trip_id).await
}

/// Encerra a ida e abre a volta correspondente, numa única transação:
/// os alunos da ida passam a EM_AULA e são copiados para a volta, e cada
/// ponto usado por eles ganha um registo A_CAMINHO na nova viagem.
pub async fn finalizar_ida(db_pool: &SqlitePool, trip_id: i64) -> AppResult<Trip> {
    let mut tx = db_pool.begin().await?;

    let ida = find_trip(&mut *tx, trip_id)
        .await?
        .filter(|trip| trip.trip_type == TripType::Ida)
        .ok_or_else(|| AppError::not_found("Viagem de ida não encontrada"))?;
    if !ida.is_active() {
        return Err(AppError::bad_request("Viagem de ida já finalizada"));
    }

    sqlx::query("UPDATE trips SET status = ?1 WHERE id = ?2")
        .bind(TripStatus::Concluida)
        .bind(trip_id)
        .execute(&mut *tx)
        .await?;

    let volta_id = sqlx::query("INSERT INTO trips (trip_type, status, bus_id, driver_id) VALUES (?1, ?2, ?3, ?4)")
        .bind(TripType::Volta)
        .bind(TripStatus::Ativa)
        .bind(ida.bus_id)
        .bind(ida.driver_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    sqlx::query("UPDATE student_trips SET status = ?1 WHERE trip_id = ?2 AND system_deleted = 0")
        .bind(StudentStatus::EmAula)
        .bind(trip_id)
        .execute(&mut *tx)
        .await?;

    let cloned = sqlx::query(
        r#"
        INSERT INTO student_trips (trip_id, student_id, status, point_id)
        SELECT ?1, student_id, ?2, point_id
        FROM student_trips
        WHERE trip_id = ?3 AND system_deleted = 0
        ORDER BY id
        "#,
    )
    .bind(volta_id)
    .bind(StudentStatus::EmAula)
    .bind(trip_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    sqlx::query(
        r#"
        INSERT INTO trip_bus_stops (trip_id, bus_stop_id, status)
        SELECT ?1, point_id, ?2
        FROM student_trips
        WHERE trip_id = ?1 AND system_deleted = 0
        GROUP BY point_id
        ORDER BY MIN(id)
        "#,
    )
    .bind(volta_id)
    .bind(TripBusStopStatus::ACaminho)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        "🏁 Ida {} finalizada; volta {} criada com {} alunos.",
        trip_id,
        volta_id,
        cloned
    );
    get_trip(db_pool, trip_id).await
}

pub async fn finalizar_volta(db_pool: &SqlitePool, trip_id: i64) -> AppResult<Trip> {
    let volta = find_trip(db_pool, trip_id)
        .await?
        .filter(|trip| trip.trip_type == TripType::Volta)
        .ok_or_else(|| AppError::not_found("Viagem de volta não encontrada"))?;
    if !volta.is_active() {
        return Err(AppError::bad_request("Viagem de volta já finalizada"));
    }

    sqlx::query("UPDATE trips SET status = ?1 WHERE id = ?2")
        .bind(TripStatus::Concluida)
        .bind(trip_id)
        .execute(db_pool)
        .await?;

    tracing::info!("🏁 Volta {} finalizada.", trip_id);
    get_trip(db_pool, trip_id).await
}

pub async fn delete_trip(db_pool: &SqlitePool, trip_id: i64) -> AppResult<()> {
    let rows_affected =
        sqlx::query("UPDATE trips SET system_deleted = 1 WHERE id = ?1 AND system_deleted = 0")
            .bind(trip_id)
            .execute(db_pool)
            .await?
            .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::not_found("Trip not found"));
    }
    tracing::info!("🗑️ Viagem {} removida.", trip_id);
    Ok(())
}
