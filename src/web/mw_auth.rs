// src/web/mw_auth.rs
use crate::{error::AppError, web::SESSION_USER_KEY};
use axum::{extract::Request, middleware::Next, response::Response};
use tower_sessions::Session;

/// ID do utilizador autenticado, colocado nas extensões do pedido.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUserId(pub i64);

// Middleware que exige uma sessão com login
pub async fn require_auth(session: Session, mut request: Request, next: Next) -> Result<Response, AppError> {
    match session.get::<i64>(SESSION_USER_KEY).await {
        Ok(Some(user_id)) => {
            tracing::debug!("Autenticação MW: utilizador {} autenticado.", user_id);
            request.extensions_mut().insert(CurrentUserId(user_id));
            Ok(next.run(request).await)
        }
        Ok(None) => {
            tracing::debug!("Autenticação MW: pedido sem sessão.");
            Err(AppError::Unauthorized)
        }
        Err(e) => {
            tracing::error!("Autenticação MW: erro ao ler sessão: {:?}", e);
            Err(AppError::SessionError(format!("Erro ao verificar sessão: {}", e)))
        }
    }
}
