// src/state.rs
use crate::{
    config::AppConfig,
    services::{auth_service::LoginThrottle, mail_service::Mailer, notification_service::PushNotifier},
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<AppConfig>,
    // Implementações trocáveis: SMTP/FCM em produção, gravadores nos testes
    pub mailer: Arc<dyn Mailer>,
    pub notifier: Arc<dyn PushNotifier>,
    pub login_throttle: LoginThrottle,
}

impl AppState {
    pub fn new(
        db_pool: SqlitePool,
        config: AppConfig,
        mailer: Arc<dyn Mailer>,
        notifier: Arc<dyn PushNotifier>,
    ) -> Self {
        Self {
            db_pool,
            config: Arc::new(config),
            mailer,
            notifier,
            login_throttle: LoginThrottle::default(),
        }
    }
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for LoginThrottle {
    fn from_ref(state: &AppState) -> LoginThrottle {
        state.login_throttle.clone()
    }
}
