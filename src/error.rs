// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de configuração: {0}")]
    ConfigError(String),

    #[error("Erro ao processar password")]
    PasswordHashingError,

    // Credenciais erradas no POST /auth
    #[error("Unauthorized")]
    InvalidCredentials,

    #[error("Too many login attempts. Please try again in 15 minutes.")]
    TooManyAttempts,

    #[error("Erro na sessão: {0}")]
    SessionError(String),

    #[error("Erro ao enviar email: {0}")]
    MailError(String),

    #[error("Falha ao enviar notificação: {0}")]
    PushError(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Dados inválidos: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Erro interno inesperado")]
    InternalServerError,

    #[error("Não autorizado")]
    Unauthorized,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::TooManyAttempts => StatusCode::FORBIDDEN,
            AppError::SqlxError(_)
            | AppError::SqlxMigrateError(_)
            | AppError::ConfigError(_)
            | AppError::PasswordHashingError
            | AppError::SessionError(_)
            | AppError::MailError(_)
            | AppError::PushError(_)
            | AppError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Corpo JSON devolvido em qualquer resposta de erro.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let detail = match &self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                tracing::error!("Erro processado: {:?}", self);
                "Erro ao aceder aos dados.".to_string()
            }
            AppError::ConfigError(_) | AppError::InternalServerError => {
                tracing::error!("Erro processado: {:?}", self);
                "Ocorreu um erro inesperado.".to_string()
            }
            AppError::PasswordHashingError => {
                tracing::error!("Erro processado: {:?}", self);
                "Erro ao processar credenciais.".to_string()
            }
            AppError::SessionError(_) => {
                tracing::error!("Erro processado: {:?}", self);
                "Erro na gestão da sua sessão.".to_string()
            }
            // Estas mensagens já são seguras para o cliente
            AppError::MailError(_) | AppError::PushError(_) => {
                tracing::error!("Erro processado: {:?}", self);
                self.to_string()
            }
            _ => {
                tracing::debug!("Pedido rejeitado ({}): {}", status, self);
                self.to_string()
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
