// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{ForgotPasswordRequest, LoginData, LoginResponse, ResetPasswordRequest, User},
    services::{auth_service, user_service},
    state::AppState,
    web::{extractors::ValidatedJson, mw_auth::CurrentUserId, StatusResponse, SESSION_USER_KEY},
};
use axum::{extract::State, Extension, Json};
use tower_sessions::Session;

// POST /auth
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    ValidatedJson(payload): ValidatedJson<LoginData>,
) -> AppResult<Json<LoginResponse>> {
    let user = auth_service::login(&state.db_pool, &state.login_throttle, &payload.email, &payload.password).await?;

    // Novo ID de sessão a cada login
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {}", e)))?;
    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao inserir na sessão: {}", e)))?;

    Ok(Json(LoginResponse { status: "success".into(), user_type_id: user.user_type_id }))
}

// GET /auth/me (protegida por mw_auth)
pub async fn handle_me(
    State(state): State<AppState>,
    Extension(CurrentUserId(user_id)): Extension<CurrentUserId>,
) -> AppResult<Json<User>> {
    let user = user_service::find_user_by_id(&state.db_pool, user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(Json(user))
}

// POST /auth/logout
pub async fn handle_logout(session: Session) -> AppResult<Json<StatusResponse>> {
    let user_id: Option<i64> = session.get(SESSION_USER_KEY).await.ok().flatten();

    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {}", e)))?;

    match user_id {
        Some(id) => tracing::info!("🚪 Utilizador {} desligado.", id),
        None => tracing::info!("🚪 Sessão anónima desligada."),
    }
    Ok(Json(StatusResponse::ok()))
}

// POST /auth/forgot-password
pub async fn handle_forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<StatusResponse>> {
    auth_service::forgot_password(
        &state.db_pool,
        state.mailer.as_ref(),
        state.config.mail_from(),
        state.config.reset_token_ttl_minutes,
        &payload.email,
    )
    .await?;
    Ok(Json(StatusResponse::ok()))
}

// POST /auth/reset-password
pub async fn handle_reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<StatusResponse>> {
    auth_service::reset_password(&state.db_pool, &payload.token, &payload.new_password).await?;
    Ok(Json(StatusResponse::ok()))
}
