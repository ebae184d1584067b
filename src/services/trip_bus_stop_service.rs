// src/services/trip_bus_stop_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        student_trip::StudentStatus,
        trip_bus_stop::{TripBusStop, TripBusStopCreate, TripBusStopStatus, INVALID_TRANSITION_MESSAGE},
    },
    services::{bus_stop_service, notification_service::PushNotifier, trip_service},
};
use sqlx::{Sqlite, SqlitePool};

const TRIP_BUS_STOP_COLUMNS: &str = "id, trip_id, bus_stop_id, status, system_deleted, create_date, update_date";

pub async fn find_trip_bus_stop<'e, E>(executor: E, id: i64) -> AppResult<Option<TripBusStop>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, TripBusStop>(&format!(
        "SELECT {} FROM trip_bus_stops WHERE id = ?1 AND system_deleted = 0",
        TRIP_BUS_STOP_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

pub async fn get_trip_bus_stop(db_pool: &SqlitePool, id: i64) -> AppResult<TripBusStop> {
    find_trip_bus_stop(db_pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip Bus Stop not found"))
}

pub async fn list_trip_bus_stops(db_pool: &SqlitePool, trip_id: Option<i64>) -> AppResult<Vec<TripBusStop>> {
    let rows = sqlx::query_as::<_, TripBusStop>(&format!(
        "SELECT {} FROM trip_bus_stops WHERE system_deleted = 0 AND (?1 IS NULL OR trip_id = ?1) ORDER BY id",
        TRIP_BUS_STOP_COLUMNS
    ))
    .bind(trip_id)
    .fetch_all(db_pool)
    .await?;
    Ok(rows)
}

pub async fn create_trip_bus_stop(db_pool: &SqlitePool, payload: &TripBusStopCreate) -> AppResult<TripBusStop> {
    trip_service::get_trip(db_pool, payload.trip_id).await?;
    bus_stop_service::get_bus_stop(db_pool, payload.bus_stop_id).await?;

    let existing: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM trip_bus_stops WHERE trip_id = ?1 AND bus_stop_id = ?2 AND system_deleted = 0",
    )
    .bind(payload.trip_id)
    .bind(payload.bus_stop_id)
    .fetch_one(db_pool)
    .await?;
    if existing > 0 {
        return Err(AppError::bad_request("Bus stop already added to this trip"));
    }

    let status = payload.status.unwrap_or(TripBusStopStatus::ACaminho);
    let id = sqlx::query("INSERT INTO trip_bus_stops (trip_id, bus_stop_id, status) VALUES (?1, ?2, ?3)")
        .bind(payload.trip_id)
        .bind(payload.bus_stop_id)
        .bind(status)
        .execute(db_pool)
        .await?
        .last_insert_rowid();

    tracing::info!("Ponto {} associado à viagem {} (ID {}).", payload.bus_stop_id, payload.trip_id, id);
    get_trip_bus_stop(db_pool, id).await
}

/// Alunos do ponto que ainda não embarcaram.
async fn students_not_boarded<'e, E>(executor: E, row: &TripBusStop) -> AppResult<usize>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let statuses: Vec<StudentStatus> = sqlx::query_scalar(
        "SELECT status FROM student_trips WHERE trip_id = ?1 AND point_id = ?2 AND system_deleted = 0",
    )
    .bind(row.trip_id)
    .bind(row.bus_stop_id)
    .fetch_all(executor)
    .await?;
    Ok(statuses.into_iter().filter(|s| s.blocks_departure()).count())
}

/// Avança o estado do ponto dentro da viagem.
///
/// A verificação e a escrita correm na mesma transação e a escrita só acontece
/// se o estado lido não mudou entretanto. Quando o ônibus chega ao ponto, os
/// alunos que aguardam ali são avisados por push depois do commit; falhas de
/// envio ficam apenas no log.
pub async fn update_status(
    db_pool: &SqlitePool,
    notifier: &dyn PushNotifier,
    id: i64,
    target: TripBusStopStatus,
) -> AppResult<TripBusStop> {
    let mut tx = db_pool.begin().await?;

    let row = find_trip_bus_stop(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip Bus Stop not found"))?;

    row.status.check_transition(target).map_err(|message| {
        tracing::warn!("Transição inválida no ponto {}: {:?} -> {:?}.", id, row.status, target);
        AppError::bad_request(message)
    })?;

    if target == TripBusStopStatus::JaPassou && students_not_boarded(&mut *tx, &row).await? > 0 {
        return Err(AppError::bad_request("Not all students have boarded the bus"));
    }

    let updated = sqlx::query("UPDATE trip_bus_stops SET status = ?1 WHERE id = ?2 AND status = ?3")
        .bind(target)
        .bind(id)
        .bind(row.status)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if updated == 0 {
        tracing::warn!("Ponto {} mudou de estado durante a atualização.", id);
        return Err(AppError::bad_request(INVALID_TRANSITION_MESSAGE));
    }

    tx.commit().await?;
    tracing::info!("🚏 Ponto {} da viagem {}: {:?} -> {:?}.", row.bus_stop_id, row.trip_id, row.status, target);

    if target == TripBusStopStatus::NoPonto {
        notify_waiting_students(db_pool, notifier, &row).await?;
    }

    get_trip_bus_stop(db_pool, id).await
}

async fn notify_waiting_students(
    db_pool: &SqlitePool,
    notifier: &dyn PushNotifier,
    row: &TripBusStop,
) -> AppResult<()> {
    let tokens: Vec<String> = sqlx::query_scalar(
        r#"
        SELECT u.device_token FROM student_trips st
        JOIN users u ON u.id = st.student_id
        WHERE st.trip_id = ?1 AND st.point_id = ?2 AND st.system_deleted = 0
          AND st.status = ?3 AND u.device_token IS NOT NULL AND u.device_token != ''
        "#,
    )
    .bind(row.trip_id)
    .bind(row.bus_stop_id)
    .bind(StudentStatus::AguardandoNoPonto)
    .fetch_all(db_pool)
    .await?;

    for token in tokens {
        if let Err(e) = notifier
            .send(&token, "Circular no ponto", "O ônibus chegou ao seu ponto.")
            .await
        {
            tracing::warn!("Falha ao avisar aluno no ponto {}: {}", row.bus_stop_id, e);
        }
    }
    Ok(())
}

pub async fn delete_trip_bus_stop(db_pool: &SqlitePool, id: i64) -> AppResult<()> {
    let rows_affected =
        sqlx::query("UPDATE trip_bus_stops SET system_deleted = 1 WHERE id = ?1 AND system_deleted = 0")
            .bind(id)
            .execute(db_pool)
            .await?
            .rows_affected();

    if rows_affected == 0 {
        return Err(AppError::not_found("Trip Bus Stop not found"));
    }
    Ok(())
}
