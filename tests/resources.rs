// tests/resources.rs
mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_faculty_crud() {
    let ctx = TestContext::new().await;

    let id = ctx.create_faculty("FACOM").await;
    let response = ctx.get(&format!("/faculties/{}", id)).await;
    assert_eq!(StatusCode::OK, response.status);
    assert_eq!("FACOM", response.body["name"]);

    let response = ctx.put(&format!("/faculties/{}", id), json!({ "name": "FAMAT" })).await;
    assert_eq!(StatusCode::OK, response.status);
    assert_eq!("FAMAT", response.body["name"]);

    let response = ctx.delete(&format!("/faculties/{}", id)).await;
    assert_eq!(StatusCode::OK, response.status);
    assert_eq!("FAMAT", response.body["name"]);

    let response = ctx.get(&format!("/faculties/{}", id)).await;
    assert_eq!(StatusCode::NOT_FOUND, response.status);
    assert_eq!("Faculty not found", response.detail());

    let response = ctx.get("/faculties").await;
    assert_eq!(json!([]), response.body);
}

#[tokio::test]
async fn test_faculty_requires_name() {
    let ctx = TestContext::new().await;
    let response = ctx.post("/faculties", json!({ "name": "" })).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);

    let response = ctx.post("/faculties", json!({ "name": "   " })).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("Faculty name is required", response.detail());
}

#[tokio::test]
async fn test_list_pagination() {
    let ctx = TestContext::new().await;
    for name in ["A", "B", "C"] {
        ctx.create_faculty(name).await;
    }

    let response = ctx.get("/faculties?skip=1&limit=1").await;
    let names: Vec<&str> = response.body.as_array().unwrap().iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(vec!["B"], names);
}

#[tokio::test]
async fn test_bus_plate_is_normalized_and_unique() {
    let ctx = TestContext::new().await;

    let response = ctx
        .post("/buses", json!({ "registration_number": "abc1d23", "name": "Circular 1", "capacity": 40 }))
        .await;
    assert_eq!(StatusCode::CREATED, response.status);
    assert_eq!("ABC1D23", response.body["registration_number"]);
    let bus_id = response.id();

    let response = ctx
        .post("/buses", json!({ "registration_number": "ABC1D23", "name": "Circular 2", "capacity": 40 }))
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("Registration number already registered", response.detail());

    let response = ctx
        .post("/buses", json!({ "registration_number": "XYZ9876", "name": "Circular 1", "capacity": 40 }))
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("Bus name already registered", response.detail());

    let response = ctx
        .post("/buses", json!({ "registration_number": "12ABCDE", "name": "Circular 3", "capacity": 40 }))
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("Invalid registration number format", response.detail());

    let response = ctx
        .post("/buses", json!({ "registration_number": "DEF1234", "name": "Circular 4", "capacity": 0 }))
        .await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);

    let response = ctx.put(&format!("/buses/{}", bus_id), json!({ "capacity": 50 })).await;
    assert_eq!(StatusCode::OK, response.status);
    assert_eq!(50, response.body["capacity"]);
    assert_eq!("ABC1D23", response.body["registration_number"]);

    let response = ctx.delete(&format!("/buses/{}", bus_id)).await;
    assert_eq!(json!({ "ok": true }), response.body);

    // A placa de um ônibus removido pode ser reutilizada
    ctx.create_bus("ABC1D23", 30).await;
    assert_eq!(StatusCode::NOT_FOUND, ctx.get(&format!("/buses/{}", bus_id)).await.status);
}

#[tokio::test]
async fn test_bus_stop_rules() {
    let ctx = TestContext::new().await;
    let faculty_id = ctx.create_faculty("FACOM").await;

    let response = ctx.post("/bus_stops", json!({ "name": "Portaria", "faculty_id": 999 })).await;
    assert_eq!(StatusCode::NOT_FOUND, response.status);
    assert_eq!("Faculty not found", response.detail());

    let stop_id = ctx.create_stop("Portaria", faculty_id).await;
    let response = ctx.post("/bus_stops", json!({ "name": "Portaria", "faculty_id": faculty_id })).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("Bus stop name already registered", response.detail());

    // Recriar um ponto removido reativa a mesma linha
    ctx.delete(&format!("/bus_stops/{}", stop_id)).await;
    let other_faculty = ctx.create_faculty("FAMAT").await;
    let response = ctx.post("/bus_stops", json!({ "name": "Portaria", "faculty_id": other_faculty })).await;
    assert_eq!(StatusCode::CREATED, response.status);
    assert_eq!(stop_id, response.id());
    assert_eq!(other_faculty, response.body["faculty_id"]);
}

#[tokio::test]
async fn test_bus_stop_listings() {
    let ctx = TestContext::new().await;

    let response = ctx.get("/bus_stops/ida").await;
    assert_eq!(StatusCode::NOT_FOUND, response.status);
    assert_eq!("No bus stops found", response.detail());
    assert_eq!(StatusCode::NOT_FOUND, ctx.get("/bus_stops/list/faculty_names").await.status);

    let faculty_id = ctx.create_faculty("FACOM").await;
    let stop_id = ctx.create_stop("Portaria", faculty_id).await;

    let response = ctx.get("/bus_stops/ida").await;
    assert_eq!(StatusCode::OK, response.status);
    assert_eq!(json!([{ "id": stop_id, "name": "Portaria - FACOM", "status": "A caminho" }]), response.body);

    let response = ctx.get("/bus_stops/list/faculty_names").await;
    assert_eq!(json!([{ "id": stop_id, "name": "Portaria - FACOM" }]), response.body);

    let response = ctx.get("/bus_stops/volta/1").await;
    assert_eq!(StatusCode::NOT_FOUND, response.status);
    assert_eq!("No bus stops found for this trip", response.detail());
}

fn user_payload(email: &str, cpf: &str, phone: &str) -> serde_json::Value {
    json!({
        "name": "Maria",
        "email": email,
        "password": "segredo",
        "cpf": cpf,
        "phone": phone,
        "user_type_id": 1
    })
}

#[tokio::test]
async fn test_user_creation_and_uniqueness() {
    let ctx = TestContext::new().await;
    let faculty_id = ctx.create_faculty("FACOM").await;

    let mut payload = user_payload("maria@example.com", "12345678909", "5511999999999");
    payload["faculty_id"] = json!(faculty_id);
    let response = ctx.post("/users", payload).await;
    assert_eq!(StatusCode::CREATED, response.status, "{:?}", response.body);
    assert_eq!("maria@example.com", response.body["login"]);
    assert_eq!(true, response.body["first_login"]);
    assert_eq!("FACOM", response.body["faculty_name"]);
    assert!(response.body.get("hashed_password").is_none());

    let response = ctx.post("/users", user_payload("maria@example.com", "98765432100", "5511988888888")).await;
    assert_eq!("Email already registered", response.detail());

    let response = ctx.post("/users", user_payload("ana@example.com", "98765432100", "5511999999999")).await;
    assert_eq!("Phone number already registered", response.detail());

    let response = ctx.post("/users", user_payload("ana@example.com", "12345678909", "5511988888888")).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("CPF already registered", response.detail());
}

#[tokio::test]
async fn test_user_validation() {
    let ctx = TestContext::new().await;

    let response = ctx.post("/users", user_payload("not-an-email", "12345678909", "5511999999999")).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);

    let response = ctx.post("/users", user_payload("a@example.com", "12345678900", "5511999999999")).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);

    let response = ctx.post("/users", user_payload("a@example.com", "12345678909", "123")).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);

    let mut payload = user_payload("a@example.com", "12345678909", "5511999999999");
    payload["password"] = json!("123");
    assert_eq!(StatusCode::BAD_REQUEST, ctx.post("/users", payload).await.status);

    let mut payload = user_payload("a@example.com", "12345678909", "5511999999999");
    payload["user_type_id"] = json!(42);
    assert_eq!(StatusCode::BAD_REQUEST, ctx.post("/users", payload).await.status);
}

#[tokio::test]
async fn test_user_update_and_delete() {
    let ctx = TestContext::new().await;
    let response = ctx.post("/users", user_payload("maria@example.com", "12345678909", "5511999999999")).await;
    let user_id = response.id();

    let response = ctx
        .put(&format!("/users/{}", user_id), json!({ "password": "novasenha", "name": "Maria Silva" }))
        .await;
    assert_eq!(StatusCode::OK, response.status);
    assert_eq!(false, response.body["first_login"]);
    assert_eq!("Maria Silva", response.body["name"]);

    let response = ctx
        .put(&format!("/users/{}/profile_picture", user_id), json!({ "picture": "https://img/1.png" }))
        .await;
    assert_eq!("https://img/1.png", response.body["profile_picture"]);

    let response = ctx.delete(&format!("/users/{}", user_id)).await;
    assert_eq!(json!({ "ok": true }), response.body);
    let response = ctx.get(&format!("/users/{}", user_id)).await;
    assert_eq!(StatusCode::NOT_FOUND, response.status);
    assert_eq!("User not found", response.detail());
}
