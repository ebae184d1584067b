// tests/auth.rs
mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use common::{TestContext, TestResponse};
use serde_json::json;

const PASSWORD: &str = "segredo";

/// Utilizador com senha real; custo baixo para os testes não ficarem lentos.
async fn user_with_password(ctx: &TestContext, name: &str) -> i64 {
    let id = ctx.insert_user(name, 1, None).await;
    let hash = bcrypt::hash(PASSWORD, 4).unwrap();
    sqlx::query("UPDATE users SET hashed_password = ?1 WHERE id = ?2")
        .bind(hash)
        .bind(id)
        .execute(&ctx.db_pool)
        .await
        .unwrap();
    id
}

async fn login(ctx: &TestContext, email: &str, password: &str) -> TestResponse {
    ctx.post("/auth", json!({ "email": email, "password": password })).await
}

#[tokio::test]
async fn test_login_session_and_logout() {
    let ctx = TestContext::new().await;
    user_with_password(&ctx, "Alice").await;

    let response = login(&ctx, "alice@example.com", PASSWORD).await;
    assert_eq!(StatusCode::OK, response.status, "{:?}", response.body);
    assert_eq!(json!({ "status": "success", "user_type_id": 1 }), response.body);
    let cookie = response.set_cookie.expect("login sets a session cookie");
    assert!(cookie.starts_with("id="));

    let me = ctx.send(Method::GET, "/auth/me", None, Some(&cookie)).await;
    assert_eq!(StatusCode::OK, me.status);
    assert_eq!("Alice", me.body["name"]);
    assert!(me.body.get("hashed_password").is_none());

    let response = ctx.send(Method::POST, "/auth/logout", None, Some(&cookie)).await;
    assert_eq!(json!({ "status": "ok" }), response.body);

    let me = ctx.send(Method::GET, "/auth/me", None, Some(&cookie)).await;
    assert_eq!(StatusCode::UNAUTHORIZED, me.status);
}

#[tokio::test]
async fn test_me_requires_session() {
    let ctx = TestContext::new().await;
    assert_eq!(StatusCode::UNAUTHORIZED, ctx.get("/auth/me").await.status);
}

#[tokio::test]
async fn test_invalid_credentials() {
    let ctx = TestContext::new().await;
    user_with_password(&ctx, "Alice").await;

    let response = login(&ctx, "alice@example.com", "errada").await;
    assert_eq!(StatusCode::UNAUTHORIZED, response.status);
    assert_eq!("Unauthorized", response.detail());
    assert!(response.set_cookie.is_none());

    let response = login(&ctx, "ninguem@example.com", PASSWORD).await;
    assert_eq!(StatusCode::UNAUTHORIZED, response.status);
}

#[tokio::test]
async fn test_login_throttle() {
    let ctx = TestContext::new().await;
    user_with_password(&ctx, "Alice").await;

    for _ in 0..5 {
        let response = login(&ctx, "alice@example.com", "errada").await;
        assert_eq!(StatusCode::UNAUTHORIZED, response.status);
    }

    // Mesmo com a senha certa o email fica bloqueado
    let response = login(&ctx, "alice@example.com", PASSWORD).await;
    assert_eq!(StatusCode::FORBIDDEN, response.status);
    assert!(response.detail().starts_with("Too many login attempts"));

    user_with_password(&ctx, "Bruno").await;
    assert_eq!(StatusCode::OK, login(&ctx, "bruno@example.com", PASSWORD).await.status);
}

#[tokio::test]
async fn test_successful_login_resets_failures() {
    let ctx = TestContext::new().await;
    user_with_password(&ctx, "Alice").await;

    for _ in 0..4 {
        login(&ctx, "alice@example.com", "errada").await;
    }
    assert_eq!(StatusCode::OK, login(&ctx, "alice@example.com", PASSWORD).await.status);
    for _ in 0..4 {
        login(&ctx, "alice@example.com", "errada").await;
    }
    assert_eq!(StatusCode::OK, login(&ctx, "alice@example.com", PASSWORD).await.status);
}

async fn latest_token(ctx: &TestContext, user_id: i64) -> String {
    sqlx::query_scalar("SELECT token FROM password_reset_tokens WHERE user_id = ?1 ORDER BY create_date DESC LIMIT 1")
        .bind(user_id)
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_forgot_and_reset_password() {
    let ctx = TestContext::new().await;
    let user_id = user_with_password(&ctx, "Alice").await;

    let response = ctx.post("/auth/forgot-password", json!({ "email": "alice@example.com" })).await;
    assert_eq!(json!({ "status": "ok" }), response.body);
    assert_eq!(vec!["alice@example.com".to_string()], ctx.mailer.recipients().await);

    let token = latest_token(&ctx, user_id).await;
    let response = ctx
        .post("/auth/reset-password", json!({ "token": token, "new_password": "novasenha" }))
        .await;
    assert_eq!(StatusCode::OK, response.status, "{:?}", response.body);

    assert_eq!(StatusCode::UNAUTHORIZED, login(&ctx, "alice@example.com", PASSWORD).await.status);
    assert_eq!(StatusCode::OK, login(&ctx, "alice@example.com", "novasenha").await.status);

    let first_login: bool = sqlx::query_scalar("SELECT first_login FROM users WHERE id = ?1")
        .bind(user_id)
        .fetch_one(&ctx.db_pool)
        .await
        .unwrap();
    assert!(!first_login);

    // O token só serve uma vez
    let response = ctx
        .post("/auth/reset-password", json!({ "token": token, "new_password": "outrasenha" }))
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("Invalid or expired token", response.detail());
}

#[tokio::test]
async fn test_forgot_password_unknown_email() {
    let ctx = TestContext::new().await;

    let response = ctx.post("/auth/forgot-password", json!({ "email": "ninguem@example.com" })).await;
    assert_eq!(StatusCode::OK, response.status);
    assert!(ctx.mailer.recipients().await.is_empty());

    let response = ctx.post("/auth/forgot-password", json!({ "email": "not-an-email" })).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
}

#[tokio::test]
async fn test_reset_password_rejects_bad_tokens() {
    let ctx = TestContext::new().await;
    let user_id = user_with_password(&ctx, "Alice").await;

    let response = ctx
        .post("/auth/reset-password", json!({ "token": "inexistente", "new_password": "novasenha" }))
        .await;
    assert_eq!("Invalid or expired token", response.detail());

    sqlx::query("INSERT INTO password_reset_tokens (token, user_id, expires_at) VALUES ('velho', ?1, ?2)")
        .bind(user_id)
        .bind((Utc::now() - Duration::minutes(1)).naive_utc())
        .execute(&ctx.db_pool)
        .await
        .unwrap();
    let response = ctx
        .post("/auth/reset-password", json!({ "token": "velho", "new_password": "novasenha" }))
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("Invalid or expired token", response.detail());

    let response = ctx
        .post("/auth/reset-password", json!({ "token": "velho", "new_password": "123" }))
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
}

#[tokio::test]
async fn test_send_notification() {
    let ctx = TestContext::new().await;

    let response = ctx
        .send(Method::POST, "/notifications/send-notification?token=abc&title=Oi&message=Ola", None, None)
        .await;
    assert_eq!(StatusCode::OK, response.status);
    assert_eq!(
        json!({ "status": "Notification sent", "result": { "success": true, "message_id": "msg-1" } }),
        response.body
    );
    assert_eq!(
        vec![("abc".to_string(), "Oi".to_string(), "Ola".to_string())],
        ctx.notifier.sent.lock().await.clone()
    );

    *ctx.notifier.fail_with.lock().await = Some("InvalidRegistration".into());
    let response = ctx
        .send(Method::POST, "/notifications/send-notification?token=abc&title=Oi&message=Ola", None, None)
        .await;
    assert_eq!(StatusCode::INTERNAL_SERVER_ERROR, response.status);
    assert_eq!("Falha ao enviar notificação: InvalidRegistration", response.detail());
}
