// src/services/user_service.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        pagination::Pagination,
        user::{User, UserCreate, UserUpdate},
    },
    services::{auth_service, faculty_service},
};
use sqlx::{Sqlite, SqlitePool};

// Colunas do utilizador + nome da faculdade
const USER_SELECT: &str = r#"
    SELECT
        u.id, u.login, u.name, u.email, u.cpf, u.phone, u.hashed_password,
        u.user_type_id, u.faculty_id, f.name AS faculty_name,
        u.device_token, u.profile_picture, u.first_login,
        u.system_deleted, u.create_date, u.update_date
    FROM users u
    LEFT JOIN faculties f ON f.id = u.faculty_id
"#;

/// Busca um utilizador ativo pelo seu ID.
pub async fn find_user_by_id<'e, E>(executor: E, user_id: i64) -> AppResult<Option<User>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    tracing::debug!("Buscando utilizador por ID: {}", user_id);
    let user = sqlx::query_as::<_, User>(&format!(
        "{} WHERE u.id = ?1 AND u.system_deleted = 0",
        USER_SELECT
    ))
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
    Ok(user)
}

pub async fn get_user(db_pool: &SqlitePool, user_id: i64) -> AppResult<User> {
    find_user_by_id(db_pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// Busca pelo email, usado no login e na recuperação de senha.
pub async fn find_active_user_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "{} WHERE u.email = ?1 AND u.system_deleted = 0",
        USER_SELECT
    ))
    .bind(email.trim())
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

pub async fn list_users(db_pool: &SqlitePool, page: Pagination) -> AppResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "{} WHERE u.system_deleted = 0 ORDER BY u.id LIMIT ?1 OFFSET ?2",
        USER_SELECT
    ))
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Encontrados {} utilizadores.", users.len());
    Ok(users)
}

pub async fn user_type_exists(db_pool: &SqlitePool, user_type_id: i64) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_types WHERE id = ?1 AND system_deleted = 0",
    )
    .bind(user_type_id)
    .fetch_one(db_pool)
    .await?;
    Ok(count > 0)
}

async fn column_taken(db_pool: &SqlitePool, column: &str, value: &str, except_id: i64) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM users WHERE {} = ?1 AND system_deleted = 0 AND id != ?2",
        column
    ))
    .bind(value)
    .bind(except_id)
    .fetch_one(db_pool)
    .await?;
    Ok(count > 0)
}

/// Verifica email, telefone e CPF, por esta ordem.
async fn ensure_unique(
    db_pool: &SqlitePool,
    email: Option<&str>,
    phone: Option<&str>,
    cpf: Option<&str>,
    except_id: i64,
) -> AppResult<()> {
    let checks = [
        ("email", email, "Email already registered"),
        ("phone", phone, "Phone number already registered"),
        ("cpf", cpf, "CPF already registered"),
    ];
    for (column, value, message) in checks {
        if let Some(value) = value {
            if column_taken(db_pool, column, value, except_id).await? {
                tracing::warn!("Utilizador rejeitado: {} '{}' já existe.", column, value);
                return Err(AppError::bad_request(message));
            }
        }
    }
    Ok(())
}

pub async fn create_user(db_pool: &SqlitePool, payload: &UserCreate) -> AppResult<User> {
    let email = payload.email.trim();
    let phone = payload.phone.trim();
    let cpf = payload.cpf.trim();
    tracing::info!("Tentando criar utilizador: {}", email);

    if !user_type_exists(db_pool, payload.user_type_id).await? {
        return Err(AppError::bad_request("Invalid user type"));
    }
    if let Some(faculty_id) = payload.faculty_id {
        faculty_service::get_faculty(db_pool, faculty_id).await?;
    }
    ensure_unique(db_pool, Some(email), Some(phone), Some(cpf), 0).await?;

    let hashed_password = auth_service::hash_password(&payload.password).await?;

    let id = sqlx::query(
        r#"
        INSERT INTO users
            (login, name, email, cpf, phone, hashed_password, user_type_id, faculty_id, device_token, first_login)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 1)
        "#,
    )
    .bind(email)
    .bind(payload.name.trim())
    .bind(email)
    .bind(cpf)
    .bind(phone)
    .bind(&hashed_password)
    .bind(payload.user_type_id)
    .bind(payload.faculty_id)
    .bind(payload.device_token.as_deref())
    .execute(db_pool)
    .await?
    .last_insert_rowid();

    tracing::info!("✅ Utilizador '{}' criado com ID {}.", email, id);
    get_user(db_pool, id).await
}

pub async fn update_user(db_pool: &SqlitePool, user_id: i64, payload: &UserUpdate) -> AppResult<User> {
    let current = get_user(db_pool, user_id).await?;
    tracing::info!("Atualizando dados para user: {}", user_id);

    let email = payload.email.as_deref().map(str::trim).unwrap_or(&current.email).to_string();
    let phone = payload.phone.as_deref().map(str::trim).unwrap_or(&current.phone).to_string();

    ensure_unique(
        db_pool,
        (email != current.email).then_some(email.as_str()),
        (phone != current.phone).then_some(phone.as_str()),
        None,
        user_id,
    )
    .await?;

    let faculty_id = match payload.faculty_id {
        Some(id) => {
            faculty_service::get_faculty(db_pool, id).await?;
            Some(id)
        }
        None => current.faculty_id,
    };

    // Trocar a senha encerra o primeiro acesso
    let (hashed_password, first_login) = match payload.password.as_deref() {
        Some(password) => (auth_service::hash_password(password).await?, false),
        None => (current.hashed_password.clone(), current.first_login),
    };

    let name = payload.name.as_deref().map(str::trim).unwrap_or(&current.name).to_string();
    let device_token = payload.device_token.clone().or(current.device_token);

    sqlx::query(
        r#"
        UPDATE users
        SET login = ?1, email = ?1, phone = ?2, hashed_password = ?3, first_login = ?4,
            faculty_id = ?5, device_token = ?6, name = ?7
        WHERE id = ?8
        "#,
    )
    .bind(&email)
    .bind(&phone)
    .bind(&hashed_password)
    .bind(first_login)
    .bind(faculty_id)
    .bind(&device_token)
    .bind(&name)
    .bind(user_id)
    .execute(db_pool)
    .await?;

    tracing::info!("✅ Dados atualizados com sucesso para user: {}", user_id);
    get_user(db_pool, user_id).await
}

pub async fn update_profile_picture(db_pool: &SqlitePool, user_id: i64, picture: &str) -> AppResult<User> {
    get_user(db_pool, user_id).await?;
    sqlx::query("UPDATE users SET profile_picture = ?1 WHERE id = ?2")
        .bind(picture)
        .bind(user_id)
        .execute(db_pool)
        .await?;
    get_user(db_pool, user_id).await
}

/// Substitui a senha (usado pela recuperação de senha, dentro de uma transação).
pub async fn set_password<'e, E>(executor: E, user_id: i64, hashed_password: &str) -> AppResult<()>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE users SET hashed_password = ?1, first_login = 0 WHERE id = ?2")
        .bind(hashed_password)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_user(db_pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    let rows_affected =
        sqlx::query("UPDATE users SET system_deleted = 1 WHERE id = ?1 AND system_deleted = 0")
            .bind(user_id)
            .execute(db_pool)
            .await?
            .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao remover: Utilizador '{}' não encontrado.", user_id);
        return Err(AppError::not_found("User not found"));
    }
    tracing::info!("🗑️ Utilizador {} removido.", user_id);
    Ok(())
}
