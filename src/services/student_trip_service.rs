// src/services/student_trip_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::Pagination,
        student_trip::{StudentStatus, StudentTrip, StudentTripCreate},
        trip::{Trip, TripType},
        trip_bus_stop::TripBusStopStatus,
    },
    services::{bus_service, bus_stop_service, trip_service, user_service},
};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

const STUDENT_TRIP_COLUMNS: &str =
    "id, trip_id, student_id, status, point_id, system_deleted, create_date, update_date";

const FULL_MESSAGE: &str = "Capacidade do ônibus atingida";
const STOP_PASSED_MESSAGE: &str = "Bus stop has already passed";
const INVALID_TRANSITION_MESSAGE: &str = "Invalid status transition";

pub async fn find_student_trip<'e, E>(executor: E, student_trip_id: i64) -> AppResult<Option<StudentTrip>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, StudentTrip>(&format!(
        "SELECT {} FROM student_trips WHERE id = ?1 AND system_deleted = 0",
        STUDENT_TRIP_COLUMNS
    ))
    .bind(student_trip_id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

pub async fn get_student_trip(db_pool: &SqlitePool, student_trip_id: i64) -> AppResult<StudentTrip> {
    find_student_trip(db_pool, student_trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student trip not found"))
}

pub async fn list_student_trips(
    db_pool: &SqlitePool,
    trip_id: Option<i64>,
    page: Pagination,
) -> AppResult<Vec<StudentTrip>> {
    let rows = sqlx::query_as::<_, StudentTrip>(&format!(
        r#"
        SELECT {} FROM student_trips
        WHERE system_deleted = 0 AND (?1 IS NULL OR trip_id = ?1)
        ORDER BY id LIMIT ?2 OFFSET ?3
        "#,
        STUDENT_TRIP_COLUMNS
    ))
    .bind(trip_id)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(db_pool)
    .await?;
    Ok(rows)
}

/// Lugares ocupados: alunos da viagem que não estão em NAO_VOLTARA nem na fila.
pub async fn occupied_seats<'e, E>(executor: E, trip_id: i64) -> AppResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let occupied: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM student_trips
        WHERE trip_id = ?1 AND system_deleted = 0 AND status NOT IN (?2, ?3)
        "#,
    )
    .bind(trip_id)
    .bind(StudentStatus::NaoVoltara)
    .bind(StudentStatus::FilaDeEspera)
    .fetch_one(executor)
    .await?;
    Ok(occupied)
}

/// Indica se a viagem ainda tem lugar livre no ônibus.
async fn has_room(conn: &mut SqliteConnection, trip: &Trip) -> AppResult<bool> {
    let bus = bus_service::find_bus(&mut *conn, trip.bus_id)
        .await?
        .ok_or_else(|| AppError::not_found("Bus not found"))?;
    let occupied = occupied_seats(&mut *conn, trip.id).await?;
    tracing::debug!("Viagem {}: {}/{} lugares ocupados.", trip.id, occupied, bus.capacity);
    Ok(occupied < bus.capacity)
}

/// Estado do ponto dentro da viagem, se o ponto já estiver associado a ela.
pub async fn stop_status_in_trip<'e, E>(
    executor: E,
    trip_id: i64,
    bus_stop_id: i64,
) -> AppResult<Option<TripBusStopStatus>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let status = sqlx::query_scalar::<_, TripBusStopStatus>(
        r#"
        SELECT status FROM trip_bus_stops
        WHERE trip_id = ?1 AND bus_stop_id = ?2 AND system_deleted = 0
        ORDER BY id LIMIT 1
        "#,
    )
    .bind(trip_id)
    .bind(bus_stop_id)
    .fetch_optional(executor)
    .await?;
    Ok(status)
}

async fn ensure_stop_not_passed(conn: &mut SqliteConnection, trip_id: i64, bus_stop_id: i64) -> AppResult<()> {
    if stop_status_in_trip(conn, trip_id, bus_stop_id).await? == Some(TripBusStopStatus::JaPassou) {
        tracing::warn!("Ponto {} já passou na viagem {}.", bus_stop_id, trip_id);
        return Err(AppError::bad_request(STOP_PASSED_MESSAGE));
    }
    Ok(())
}

async fn ensure_not_enrolled(conn: &mut SqliteConnection, trip_id: i64, student_id: i64) -> AppResult<()> {
    let enrolled: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM student_trips WHERE trip_id = ?1 AND student_id = ?2 AND system_deleted = 0",
    )
    .bind(trip_id)
    .bind(student_id)
    .fetch_one(conn)
    .await?;
    if enrolled > 0 {
        return Err(AppError::bad_request("Aluno já cadastrado nesta viagem"));
    }
    Ok(())
}

fn seated_status(trip_type: TripType) -> StudentStatus {
    match trip_type {
        TripType::Ida => StudentStatus::Presente,
        TripType::Volta => StudentStatus::EmAula,
    }
}

/// Inscreve um aluno numa viagem ativa.
///
/// Com o ônibus lotado a volta coloca o aluno na fila de espera (desde que o
/// ponto ainda não tenha passado) e a ida recusa a inscrição.
pub async fn create_student_trip(db_pool: &SqlitePool, payload: &StudentTripCreate) -> AppResult<StudentTrip> {
    let mut tx = db_pool.begin().await?;

    let trip = trip_service::find_trip(&mut *tx, payload.trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Trip not found"))?;
    if !trip.is_active() {
        return Err(AppError::bad_request("Trip is not active"));
    }
    user_service::find_user_by_id(&mut *tx, payload.student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student not found"))?;
    bus_stop_service::find_bus_stop(&mut *tx, payload.point_id)
        .await?
        .ok_or_else(|| AppError::not_found("Bus stop not found"))?;

    ensure_not_enrolled(&mut tx, trip.id, payload.student_id).await?;

    let status = if has_room(&mut tx, &trip).await? {
        seated_status(trip.trip_type)
    } else {
        match trip.trip_type {
            TripType::Volta => {
                ensure_stop_not_passed(&mut tx, trip.id, payload.point_id).await?;
                tracing::info!(
                    "Viagem {} lotada: aluno {} entra na fila de espera.",
                    trip.id,
                    payload.student_id
                );
                StudentStatus::FilaDeEspera
            }
            TripType::Ida => {
                tracing::warn!("Viagem {} lotada: inscrição do aluno {} recusada.", trip.id, payload.student_id);
                return Err(AppError::bad_request(FULL_MESSAGE));
            }
        }
    };

    let id = sqlx::query("INSERT INTO student_trips (trip_id, student_id, status, point_id) VALUES (?1, ?2, ?3, ?4)")
        .bind(trip.id)
        .bind(payload.student_id)
        .bind(status)
        .bind(payload.point_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    if trip.trip_type == TripType::Volta && status != StudentStatus::FilaDeEspera {
        let existing = stop_status_in_trip(&mut *tx, trip.id, payload.point_id).await?;
        if existing.is_none() {
            sqlx::query("INSERT INTO trip_bus_stops (trip_id, bus_stop_id, status) VALUES (?1, ?2, ?3)")
                .bind(trip.id)
                .bind(payload.point_id)
                .bind(TripBusStopStatus::NoPonto)
                .execute(&mut *tx)
                .await?;
            tracing::debug!("Ponto {} adicionado à volta {}.", payload.point_id, trip.id);
        }
    }

    tx.commit().await?;
    tracing::info!("✅ Aluno {} inscrito na viagem {} ({:?}).", payload.student_id, trip.id, status);
    get_student_trip(db_pool, id).await
}

pub async fn update_point(db_pool: &SqlitePool, student_trip_id: i64, point_id: i64) -> AppResult<StudentTrip> {
    let mut conn = db_pool.acquire().await?;

    let row = find_student_trip(&mut *conn, student_trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student trip not found"))?;
    bus_stop_service::find_bus_stop(&mut *conn, point_id)
        .await?
        .ok_or_else(|| AppError::not_found("Bus stop not found"))?;
    ensure_stop_not_passed(&mut conn, row.trip_id, point_id).await?;

    sqlx::query("UPDATE student_trips SET point_id = ?1 WHERE id = ?2")
        .bind(point_id)
        .bind(student_trip_id)
        .execute(&mut *conn)
        .await?;
    drop(conn);

    tracing::info!("Inscrição {}: ponto alterado para {}.", student_trip_id, point_id);
    get_student_trip(db_pool, student_trip_id).await
}

/// Move a inscrição para outra viagem. O lugar libertado na viagem antiga
/// é oferecido à respetiva fila de espera.
pub async fn move_to_trip(db_pool: &SqlitePool, student_trip_id: i64, new_trip_id: i64) -> AppResult<StudentTrip> {
    let mut tx = db_pool.begin().await?;

    let row = find_student_trip(&mut *tx, student_trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student trip not found"))?;
    let new_trip = trip_service::find_trip(&mut *tx, new_trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("New trip not found"))?;
    if !new_trip.is_active() {
        return Err(AppError::bad_request("New trip is not active"));
    }
    // Mesma viagem: nada muda, nem para quem está na fila
    if row.trip_id == new_trip.id {
        return Ok(row);
    }
    if !has_room(&mut tx, &new_trip).await? {
        return Err(AppError::bad_request("New trip is full"));
    }
    ensure_stop_not_passed(&mut tx, new_trip.id, row.point_id).await?;
    ensure_not_enrolled(&mut tx, new_trip.id, row.student_id).await?;

    // Quem estava na fila ganha o lugar na nova viagem
    let status = if row.status == StudentStatus::FilaDeEspera {
        seated_status(new_trip.trip_type)
    } else {
        row.status
    };

    sqlx::query("UPDATE student_trips SET trip_id = ?1, status = ?2 WHERE id = ?3")
        .bind(new_trip.id)
        .bind(status)
        .bind(student_trip_id)
        .execute(&mut *tx)
        .await?;

    if row.status.occupies_seat() {
        promote_waitlist(&mut tx, row.trip_id).await?;
    }

    tx.commit().await?;
    tracing::info!("Inscrição {} movida da viagem {} para {}.", student_trip_id, row.trip_id, new_trip.id);
    get_student_trip(db_pool, student_trip_id).await
}

pub async fn update_status(
    db_pool: &SqlitePool,
    student_trip_id: i64,
    target: StudentStatus,
) -> AppResult<StudentTrip> {
    let mut tx = db_pool.begin().await?;

    let row = find_student_trip(&mut *tx, student_trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student trip not found"))?;

    if !row.status.can_change_to(target) {
        tracing::warn!(
            "Transição de aluno inválida na inscrição {}: {:?} -> {:?}.",
            student_trip_id,
            row.status,
            target
        );
        return Err(AppError::bad_request(INVALID_TRANSITION_MESSAGE));
    }

    if !row.status.occupies_seat() && target.occupies_seat() {
        let trip = trip_service::find_trip(&mut *tx, row.trip_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trip not found"))?;
        if !has_room(&mut tx, &trip).await? {
            return Err(AppError::bad_request(FULL_MESSAGE));
        }
    }

    sqlx::query("UPDATE student_trips SET status = ?1 WHERE id = ?2")
        .bind(target)
        .bind(student_trip_id)
        .execute(&mut *tx)
        .await?;

    if row.status.occupies_seat() && !target.occupies_seat() {
        promote_waitlist(&mut tx, row.trip_id).await?;
    }

    tx.commit().await?;
    tracing::info!(
        "Inscrição {}: estado {:?} -> {:?}.",
        student_trip_id,
        row.status,
        target
    );
    get_student_trip(db_pool, student_trip_id).await
}

pub async fn delete_student_trip(db_pool: &SqlitePool, student_trip_id: i64) -> AppResult<()> {
    let mut tx = db_pool.begin().await?;

    let row = find_student_trip(&mut *tx, student_trip_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student trip not found"))?;

    sqlx::query("UPDATE student_trips SET system_deleted = 1 WHERE id = ?1")
        .bind(student_trip_id)
        .execute(&mut *tx)
        .await?;

    if row.status.occupies_seat() {
        promote_waitlist(&mut tx, row.trip_id).await?;
    }

    tx.commit().await?;
    tracing::info!("🗑️ Inscrição {} removida.", student_trip_id);
    Ok(())
}

/// Promove o aluno mais antigo da fila de uma volta para EM_AULA, se houver lugar.
async fn promote_waitlist(conn: &mut SqliteConnection, trip_id: i64) -> AppResult<Option<i64>> {
    let Some(trip) = trip_service::find_trip(&mut *conn, trip_id).await? else {
        return Ok(None);
    };
    if trip.trip_type != TripType::Volta || !has_room(conn, &trip).await? {
        return Ok(None);
    }

    let next: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT id FROM student_trips
        WHERE trip_id = ?1 AND status = ?2 AND system_deleted = 0
        ORDER BY create_date, id
        LIMIT 1
        "#,
    )
    .bind(trip_id)
    .bind(StudentStatus::FilaDeEspera)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(id) = next {
        sqlx::query("UPDATE student_trips SET status = ?1 WHERE id = ?2")
            .bind(StudentStatus::EmAula)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        tracing::info!("⬆️ Inscrição {} saiu da fila de espera da viagem {}.", id, trip_id);
    }
    Ok(next)
}
