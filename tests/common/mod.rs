// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use circular::{
    config::AppConfig,
    db,
    error::{AppError, AppResult},
    services::{
        mail_service::Mailer,
        notification_service::{PushNotifier, PushResult},
    },
    state::AppState,
    web,
};
use lettre::Message;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Mailer que guarda as mensagens em memória.
#[derive(Clone, Default)]
pub struct RecorderMailer {
    pub messages: Arc<Mutex<Vec<Message>>>,
}

#[async_trait]
impl Mailer for RecorderMailer {
    async fn send(&self, message: Message) -> AppResult<()> {
        self.messages.lock().await.push(message);
        Ok(())
    }
}

impl RecorderMailer {
    pub async fn recipients(&self) -> Vec<String> {
        let messages = self.messages.lock().await;
        messages
            .iter()
            .flat_map(|m| m.envelope().to().iter().map(ToString::to_string).collect::<Vec<_>>())
            .collect()
    }
}

/// Notificador que regista os envios e pode ser forçado a falhar.
#[derive(Clone, Default)]
pub struct RecorderNotifier {
    pub sent: Arc<Mutex<Vec<(String, String, String)>>>,
    pub fail_with: Arc<Mutex<Option<String>>>,
}

#[async_trait]
impl PushNotifier for RecorderNotifier {
    async fn send(&self, device_token: &str, title: &str, body: &str) -> AppResult<PushResult> {
        if let Some(error) = self.fail_with.lock().await.clone() {
            return Err(AppError::PushError(error));
        }
        let mut sent = self.sent.lock().await;
        sent.push((device_token.to_string(), title.to_string(), body.to_string()));
        Ok(PushResult { success: true, message_id: format!("msg-{}", sent.len()) })
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestResponse {
    pub fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }

    pub fn id(&self) -> i64 {
        self.body["id"].as_i64().expect("response has no id")
    }
}

pub struct TestContext {
    pub app: Router,
    pub db_pool: SqlitePool,
    pub mailer: RecorderMailer,
    pub notifier: RecorderNotifier,
}

impl TestContext {
    pub async fn new() -> Self {
        let db_pool = db::create_memory_pool().await.unwrap();
        let session_store = web::create_session_store(db_pool.clone()).await.unwrap();
        let mailer = RecorderMailer::default();
        let notifier = RecorderNotifier::default();
        let state = AppState::new(
            db_pool.clone(),
            AppConfig::for_tests(),
            Arc::new(mailer.clone()),
            Arc::new(notifier.clone()),
        );
        Self { app: web::app(state, session_store), db_pool, mailer, notifier }
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        TestResponse { status, set_cookie, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), None).await
    }

    pub async fn put_empty(&self, uri: &str) -> TestResponse {
        self.send(Method::PUT, uri, None, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, None).await
    }

    // --- Fixtures ---

    pub async fn create_faculty(&self, name: &str) -> i64 {
        let response = self.post("/faculties", json!({ "name": name })).await;
        assert_eq!(StatusCode::CREATED, response.status, "{:?}", response.body);
        response.id()
    }

    pub async fn create_bus(&self, plate: &str, capacity: i64) -> i64 {
        let response = self
            .post(
                "/buses",
                json!({ "registration_number": plate, "name": format!("Circular {}", plate), "capacity": capacity }),
            )
            .await;
        assert_eq!(StatusCode::CREATED, response.status, "{:?}", response.body);
        response.id()
    }

    pub async fn create_stop(&self, name: &str, faculty_id: i64) -> i64 {
        let response = self.post("/bus_stops", json!({ "name": name, "faculty_id": faculty_id })).await;
        assert_eq!(StatusCode::CREATED, response.status, "{:?}", response.body);
        response.id()
    }

    /// Insere um utilizador diretamente, sem passar pelo bcrypt.
    pub async fn insert_user(&self, name: &str, user_type_id: i64, device_token: Option<&str>) -> i64 {
        let email = format!("{}@example.com", name.to_lowercase());
        sqlx::query(
            r#"
            INSERT INTO users (login, name, email, cpf, phone, hashed_password, user_type_id, device_token)
            VALUES (?1, ?2, ?1, ?3, ?3, 'x', ?4, ?5)
            "#,
        )
        .bind(&email)
        .bind(name)
        .bind(format!("cpf-{}", name))
        .bind(user_type_id)
        .bind(device_token)
        .execute(&self.db_pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    pub async fn create_trip(&self, trip_type: i64, bus_id: i64, driver_id: i64) -> i64 {
        let response = self
            .post("/trips", json!({ "trip_type": trip_type, "bus_id": bus_id, "driver_id": driver_id }))
            .await;
        assert_eq!(StatusCode::CREATED, response.status, "{:?}", response.body);
        response.id()
    }

    pub async fn enroll(&self, trip_id: i64, student_id: i64, point_id: i64) -> TestResponse {
        self.post(
            "/student_trips",
            json!({ "trip_id": trip_id, "student_id": student_id, "point_id": point_id }),
        )
        .await
    }
}
