// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::User,
    services::{mail_service, mail_service::Mailer, user_service},
};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use sqlx::SqlitePool;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use uuid::Uuid;

const MAX_FAILED_ATTEMPTS: usize = 5;
const ATTEMPT_WINDOW_MINUTES: i64 = 10;

/// Verifica se a senha fornecida corresponde ao hash guardado.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &stored_hash))
        .await
        .map_err(|e| {
            tracing::error!("Erro na task spawn_blocking (verify_password): {:?}", e);
            AppError::InternalServerError
        })?
        .map_err(|e| {
            tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
            AppError::PasswordHashingError
        })
}

/// Gera um hash bcrypt para uma senha.
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| {
            tracing::error!("Erro na task spawn_blocking (hash_password): {:?}", e);
            AppError::InternalServerError
        })?
        .map_err(|e| {
            tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
            AppError::PasswordHashingError
        })
}

/// Tentativas de login falhadas por email, mantidas em memória.
#[derive(Debug, Clone, Default)]
pub struct LoginThrottle {
    failures: Arc<Mutex<HashMap<String, Vec<DateTime<Utc>>>>>,
}

impl LoginThrottle {
    /// Descarta tentativas fora da janela e recusa o email se já atingiu o limite.
    pub async fn check(&self, email: &str, now: DateTime<Utc>) -> AppResult<()> {
        let window = Duration::minutes(ATTEMPT_WINDOW_MINUTES);
        let mut failures = self.failures.lock().await;
        let Some(attempts) = failures.get_mut(email) else {
            return Ok(());
        };
        attempts.retain(|ts| now - *ts < window);

        let count = attempts.len();
        if count == 0 {
            failures.remove(email);
        } else if count >= MAX_FAILED_ATTEMPTS {
            tracing::warn!("Login bloqueado para '{}': {} tentativas falhadas.", email, count);
            return Err(AppError::TooManyAttempts);
        }
        Ok(())
    }

    /// Regista a falha e descarta os emails cujas tentativas já expiraram.
    pub async fn record_failure(&self, email: &str, now: DateTime<Utc>) {
        let window = Duration::minutes(ATTEMPT_WINDOW_MINUTES);
        let mut failures = self.failures.lock().await;
        failures.retain(|_, attempts| {
            attempts.retain(|ts| now - *ts < window);
            !attempts.is_empty()
        });
        failures.entry(email.to_string()).or_default().push(now);
    }

    pub async fn reset(&self, email: &str) {
        self.failures.lock().await.remove(email);
    }
}

/// Valida as credenciais e devolve o utilizador autenticado.
pub async fn login(
    db_pool: &SqlitePool,
    throttle: &LoginThrottle,
    email: &str,
    password: &str,
) -> AppResult<User> {
    let email = email.trim();
    let now = Utc::now();
    throttle.check(email, now).await?;

    let user = user_service::find_active_user_by_email(db_pool, email).await?;
    let authenticated = match &user {
        Some(user) => verify_password(password, &user.hashed_password).await?,
        None => false,
    };

    let user = match user {
        Some(user) if authenticated => user,
        _ => {
            tracing::warn!("Falha de login para '{}'.", email);
            throttle.record_failure(email, now).await;
            return Err(AppError::InvalidCredentials);
        }
    };

    throttle.reset(email).await;
    tracing::info!("🔑 Login de '{}' (tipo {}).", email, user.user_type_id);
    Ok(user)
}

/// Gera um token de redefinição e envia-o por email.
///
/// Emails desconhecidos e falhas de email (montagem ou envio) não são revelados ao cliente.
pub async fn forgot_password(
    db_pool: &SqlitePool,
    mailer: &dyn Mailer,
    mail_from: &str,
    ttl_minutes: i64,
    email: &str,
) -> AppResult<()> {
    let Some(user) = user_service::find_active_user_by_email(db_pool, email).await? else {
        tracing::info!("Recuperação de senha pedida para email desconhecido.");
        return Ok(());
    };

    let token = Uuid::new_v4().to_string();
    let message = match mail_service::reset_password_message(mail_from, &user.email, &token, ttl_minutes) {
        Ok(message) => message,
        Err(e) => {
            tracing::error!("Email de redefinição não montado para o utilizador {}: {}", user.id, e);
            return Ok(());
        }
    };
    let expires_at = (Utc::now() + Duration::minutes(ttl_minutes)).naive_utc();

    sqlx::query("INSERT INTO password_reset_tokens (token, user_id, expires_at) VALUES (?1, ?2, ?3)")
        .bind(&token)
        .bind(user.id)
        .bind(expires_at)
        .execute(db_pool)
        .await?;

    match mailer.send(message).await {
        Ok(()) => tracing::info!("📧 Token de redefinição enviado ao utilizador {}.", user.id),
        Err(e) => tracing::error!("Falha ao enviar email de redefinição ao utilizador {}: {}", user.id, e),
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct ResetToken {
    user_id: i64,
    expires_at: NaiveDateTime,
}

/// Consome o token e substitui a senha do utilizador.
pub async fn reset_password(db_pool: &SqlitePool, token: &str, new_password: &str) -> AppResult<()> {
    let invalid = || AppError::bad_request("Invalid or expired token");
    let hashed_password = hash_password(new_password).await?;

    let mut tx = db_pool.begin().await?;

    let row = sqlx::query_as::<_, ResetToken>(
        "SELECT user_id, expires_at FROM password_reset_tokens WHERE token = ?1 AND used = 0",
    )
    .bind(token)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(invalid)?;

    if row.expires_at <= Utc::now().naive_utc() {
        tracing::warn!("Token de redefinição expirado para o utilizador {}.", row.user_id);
        return Err(invalid());
    }

    let consumed = sqlx::query("UPDATE password_reset_tokens SET used = 1 WHERE token = ?1 AND used = 0")
        .bind(token)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    if consumed == 0 {
        return Err(invalid());
    }

    user_service::set_password(&mut *tx, row.user_id, &hashed_password).await?;
    tx.commit().await?;

    tracing::info!("✅ Senha redefinida para o utilizador {}.", row.user_id);
    Ok(())
}
