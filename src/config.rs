// src/config.rs
use crate::error::{AppError, AppResult};
use std::env;
use std::net::SocketAddr;

/// Credenciais SMTP usadas pelo fluxo de recuperação de senha.
#[derive(Clone)]
pub struct SmtpConfig {
    pub relay: String,
    pub username: String,
    pub password: String,
    pub from: String,
}

// A senha nunca aparece nos logs
impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("relay", &self.relay)
            .field("username", &self.username)
            .field("from", &self.from)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub smtp: Option<SmtpConfig>,
    pub fcm_server_key: Option<String>,
    pub reset_token_ttl_minutes: i64,
    pub session_secure_cookie: bool,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_RESET_TOKEN_TTL_MINUTES: i64 = 30;
const DEFAULT_MAIL_FROM: &str = "no-reply@circular.local";

/// Lê uma variável opcional, tratando valores vazios como ausentes.
fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AppConfig {
    /// Carrega a configuração a partir das variáveis de ambiente.
    /// O `.env` é lido antes, em `main`.
    pub fn from_env() -> AppResult<Self> {
        let database_url = optional_var("DATABASE_URL")
            .ok_or_else(|| AppError::ConfigError("DATABASE_URL não definida".into()))?;

        let bind_addr_str = optional_var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind_addr_str.parse::<SocketAddr>().map_err(|e| {
            AppError::ConfigError(format!("BIND_ADDR inválido '{}': {}", bind_addr_str, e))
        })?;

        // SMTP só é ativado quando o grupo completo está presente
        let smtp = match (
            optional_var("SMTP_RELAY"),
            optional_var("SMTP_USERNAME"),
            optional_var("SMTP_PASSWORD"),
        ) {
            (Some(relay), Some(username), Some(password)) => Some(SmtpConfig {
                from: optional_var("SMTP_FROM").unwrap_or_else(|| username.clone()),
                relay,
                username,
                password,
            }),
            (None, None, None) => None,
            _ => {
                return Err(AppError::ConfigError(
                    "SMTP_RELAY, SMTP_USERNAME e SMTP_PASSWORD devem ser definidas em conjunto"
                        .into(),
                ))
            }
        };

        let reset_token_ttl_minutes = match optional_var("RESET_TOKEN_TTL_MINUTES") {
            Some(v) => v.parse::<i64>().ok().filter(|m| *m > 0).ok_or_else(|| {
                AppError::ConfigError(format!("RESET_TOKEN_TTL_MINUTES inválido: {}", v))
            })?,
            None => DEFAULT_RESET_TOKEN_TTL_MINUTES,
        };

        let session_secure_cookie = optional_var("SESSION_SECURE_COOKIE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            bind_addr,
            smtp,
            fcm_server_key: optional_var("FCM_SERVER_KEY"),
            reset_token_ttl_minutes,
            session_secure_cookie,
        })
    }

    /// Remetente dos emails enviados pela aplicação.
    pub fn mail_from(&self) -> &str {
        self.smtp.as_ref().map(|s| s.from.as_str()).unwrap_or(DEFAULT_MAIL_FROM)
    }

    /// Configuração mínima usada pelos testes (base em memória, sem SMTP nem push).
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            smtp: None,
            fcm_server_key: None,
            reset_token_ttl_minutes: DEFAULT_RESET_TOKEN_TTL_MINUTES,
            session_secure_cookie: false,
        }
    }
}
