// src/web/notification_handlers.rs
use crate::{error::AppResult, services::notification_service::PushResult, state::AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NotificationParams {
    pub token: String,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationResponse {
    pub status: String,
    pub result: PushResult,
}

// POST /notifications/send-notification?token=&title=&message=
pub async fn handle_send_notification(
    State(state): State<AppState>,
    Query(params): Query<NotificationParams>,
) -> AppResult<Json<NotificationResponse>> {
    let result = state.notifier.send(&params.token, &params.title, &params.message).await?;
    tracing::info!("📲 Notificação '{}' enviada ({}).", params.title, result.message_id);
    Ok(Json(NotificationResponse { status: "Notification sent".into(), result }))
}
