// src/services/faculty_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        faculty::{Faculty, FacultyCreate, FacultyUpdate},
        pagination::Pagination,
    },
};
use sqlx::SqlitePool;

const FACULTY_COLUMNS: &str = "id, name, system_deleted, create_date, update_date";

/// Busca uma faculdade ativa pelo ID.
pub async fn find_faculty(db_pool: &SqlitePool, faculty_id: i64) -> AppResult<Option<Faculty>> {
    let faculty = sqlx::query_as::<_, Faculty>(&format!(
        "SELECT {} FROM faculties WHERE id = ?1 AND system_deleted = 0",
        FACULTY_COLUMNS
    ))
    .bind(faculty_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(faculty)
}

pub async fn get_faculty(db_pool: &SqlitePool, faculty_id: i64) -> AppResult<Faculty> {
    find_faculty(db_pool, faculty_id)
        .await?
        .ok_or_else(|| AppError::not_found("Faculty not found"))
}

pub async fn list_faculties(db_pool: &SqlitePool, page: Pagination) -> AppResult<Vec<Faculty>> {
    let faculties = sqlx::query_as::<_, Faculty>(&format!(
        "SELECT {} FROM faculties WHERE system_deleted = 0 ORDER BY id LIMIT ?1 OFFSET ?2",
        FACULTY_COLUMNS
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontradas {} faculdades.", faculties.len());
    Ok(faculties)
}

pub async fn create_faculty(db_pool: &SqlitePool, payload: &FacultyCreate) -> AppResult<Faculty> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Faculty name is required"));
    }

    let id = sqlx::query("INSERT INTO faculties (name) VALUES (?1)")
        .bind(name)
        .execute(db_pool)
        .await?
        .last_insert_rowid();

    tracing::info!("✅ Faculdade '{}' criada com ID {}.", name, id);
    get_faculty(db_pool, id).await
}

pub async fn update_faculty(
    db_pool: &SqlitePool,
    faculty_id: i64,
    payload: &FacultyUpdate,
) -> AppResult<Faculty> {
    let current = get_faculty(db_pool, faculty_id).await?;

    let name = match payload.name.as_deref().map(str::trim) {
        Some("") => return Err(AppError::bad_request("Faculty name is required")),
        Some(name) => name.to_string(),
        None => current.name,
    };

    sqlx::query("UPDATE faculties SET name = ?1 WHERE id = ?2")
        .bind(&name)
        .bind(faculty_id)
        .execute(db_pool)
        .await?;

    get_faculty(db_pool, faculty_id).await
}

/// Exclusão lógica. Devolve a faculdade tal como estava antes de ser removida.
pub async fn delete_faculty(db_pool: &SqlitePool, faculty_id: i64) -> AppResult<Faculty> {
    let faculty = get_faculty(db_pool, faculty_id).await?;

    sqlx::query("UPDATE faculties SET system_deleted = 1 WHERE id = ?1")
        .bind(faculty_id)
        .execute(db_pool)
        .await?;

    tracing::info!("🗑️ Faculdade {} removida.", faculty_id);
    Ok(faculty)
}
