// src/services/notification_service.rs
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const FCM_SEND_URL: &str = "https://fcm.googleapis.com/fcm/send";

/// Resultado de um envio de push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushResult {
    pub success: bool,
    pub message_id: String,
}

/// Envio de notificações push para um dispositivo.
#[async_trait]
pub trait PushNotifier: Send + Sync {
    async fn send(&self, device_token: &str, title: &str, body: &str) -> AppResult<PushResult>;
}

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct FcmRequest<'a> {
    to: &'a str,
    notification: FcmNotification<'a>,
}

#[derive(Deserialize)]
struct FcmResult {
    message_id: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct FcmResponse {
    #[serde(default)]
    success: i64,
    #[serde(default)]
    results: Vec<FcmResult>,
}

/// Cliente da API HTTP do Firebase Cloud Messaging.
#[derive(Clone)]
pub struct FcmNotifier {
    client: Client,
    server_key: String,
    endpoint: String,
}

impl FcmNotifier {
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            server_key: server_key.into(),
            endpoint: FCM_SEND_URL.to_string(),
        }
    }
}

#[async_trait]
impl PushNotifier for FcmNotifier {
    async fn send(&self, device_token: &str, title: &str, body: &str) -> AppResult<PushResult> {
        let request = FcmRequest {
            to: device_token,
            notification: FcmNotification { title, body },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("key={}", self.server_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::PushError(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::PushError(format!("FCM devolveu {}: {}", status, text)));
        }

        let parsed: FcmResponse = response
            .json()
            .await
            .map_err(|e| AppError::PushError(format!("Resposta FCM inválida: {}", e)))?;
        interpret_response(parsed)
    }
}

fn interpret_response(response: FcmResponse) -> AppResult<PushResult> {
    let first = response.results.into_iter().next();
    match first {
        Some(FcmResult { message_id: Some(message_id), .. }) if response.success > 0 => {
            Ok(PushResult { success: true, message_id })
        }
        Some(FcmResult { error: Some(error), .. }) => Err(AppError::PushError(error)),
        _ => Err(AppError::PushError("FCM não confirmou o envio".into())),
    }
}

/// Usado quando FCM_SERVER_KEY não está definida.
#[derive(Clone, Default)]
pub struct DisabledNotifier;

#[async_trait]
impl PushNotifier for DisabledNotifier {
    async fn send(&self, _device_token: &str, title: &str, _body: &str) -> AppResult<PushResult> {
        tracing::warn!("Push não configurado; notificação '{}' não enviada.", title);
        Err(AppError::PushError("push notifications are not configured".into()))
    }
}
