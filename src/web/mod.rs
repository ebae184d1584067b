// src/web/mod.rs
pub mod auth_handlers;
pub mod bus_handlers;
pub mod bus_stop_handlers;
pub mod extractors;
pub mod faculty_handlers;
pub mod mw_auth;
pub mod notification_handlers;
pub mod routes;
pub mod student_trip_handlers;
pub mod trip_bus_stop_handlers;
pub mod trip_handlers;
pub mod user_handlers;

use crate::state::AppState;
use axum::Router;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

/// Chave da sessão onde fica o ID do utilizador autenticado.
pub const SESSION_USER_KEY: &str = "user_id";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct OkResponse {
    pub ok: bool,
}

impl Default for OkResponse {
    fn default() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok".into() }
    }

    pub fn deleted() -> Self {
        Self { status: "deleted".into() }
    }
}

/// Cria o store de sessões na mesma base de dados e garante a sua tabela.
pub async fn create_session_store(db_pool: SqlitePool) -> Result<SqliteStore, sqlx::Error> {
    let store = SqliteStore::new(db_pool);
    store.migrate().await?;
    Ok(store)
}

/// Router completo com rastreio HTTP e sessões.
pub fn app(app_state: AppState, session_store: SqliteStore) -> Router {
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(app_state.config.session_secure_cookie)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));

    routes::create_router(app_state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(session_layer),
    )
}
