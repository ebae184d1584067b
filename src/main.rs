// src/main.rs
use circular::{
    config::AppConfig,
    db,
    services::{
        mail_service::{LettreMailer, LogMailer, Mailer},
        notification_service::{DisabledNotifier, FcmNotifier, PushNotifier},
    },
    state::AppState,
    web,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_sessions::ExpiredDeletion;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "circular=debug,tower_http=info,sqlx=warn,tower_sessions=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Logging ---
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer())
        .init();

    tracing::info!("🚀 Iniciando servidor do Circular...");

    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("❌ Configuração inválida: {}", e);
        anyhow::anyhow!("Configuração inválida: {}", e)
    })?;

    // --- Base de dados ---
    let db_pool = match db::create_db_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("❌ Falha crítica ao inicializar a base de dados: {}", e);
            return Err(anyhow::anyhow!("Falha ao conectar/migrar DB: {}", e));
        }
    };

    // --- Sessões ---
    let session_store = web::create_session_store(db_pool.clone())
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao criar session store: {}", e))?;

    let cleanup_store = session_store.clone();
    tokio::spawn(async move {
        if let Err(e) = cleanup_store
            .continuously_delete_expired(tokio::time::Duration::from_secs(60 * 60))
            .await
        {
            tracing::error!("Erro na task de limpeza de sessões: {:?}", e);
        }
    });
    tracing::info!("🧹 Tarefa de limpeza de sessões iniciada.");

    // --- Email e push ---
    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!("📧 SMTP configurado via {}.", smtp.relay);
            Arc::new(LettreMailer::connect(smtp)?)
        }
        None => {
            tracing::warn!("⚠️ SMTP não configurado; emails serão apenas registados no log.");
            Arc::new(LogMailer)
        }
    };
    let notifier: Arc<dyn PushNotifier> = match &config.fcm_server_key {
        Some(key) => Arc::new(FcmNotifier::new(key.clone())),
        None => {
            tracing::warn!("⚠️ FCM_SERVER_KEY não definida; notificações push desativadas.");
            Arc::new(DisabledNotifier)
        }
    };

    let bind_addr = config.bind_addr;
    let app_state = AppState::new(db_pool, config, mailer, notifier);
    let app = web::app(app_state, session_store);

    let listener = match TcpListener::bind(bind_addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("❌ Falha ao iniciar listener em {}: {}", bind_addr, e);
            return Err(e.into());
        }
    };
    tracing::info!("📡 Servidor escutando em http://{}", bind_addr);

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        tracing::error!("❌ Erro fatal no servidor: {}", e);
        return Err(e.into());
    }

    Ok(())
}
