// tests/trips.rs
mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

const IDA: i64 = 1;
const VOLTA: i64 = 2;
const ATIVA: i64 = 1;
const CONCLUIDA: i64 = 2;
const EM_AULA: i64 = 2;
const A_CAMINHO: i64 = 1;

#[tokio::test]
async fn test_trip_requires_bus_and_driver() {
    let ctx = TestContext::new().await;
    let driver_id = ctx.insert_user("Joao", 2, None).await;
    let bus_id = ctx.create_bus("ABC1234", 10).await;

    let response = ctx.post("/trips", json!({ "trip_type": IDA, "bus_id": 999, "driver_id": driver_id })).await;
    assert_eq!(StatusCode::NOT_FOUND, response.status);
    assert_eq!("Bus not found", response.detail());

    let response = ctx.post("/trips", json!({ "trip_type": IDA, "bus_id": bus_id, "driver_id": 999 })).await;
    assert_eq!(StatusCode::NOT_FOUND, response.status);
    assert_eq!("Driver not found", response.detail());

    let response = ctx.post("/trips", json!({ "trip_type": IDA, "bus_id": bus_id, "driver_id": driver_id })).await;
    assert_eq!(StatusCode::CREATED, response.status);
    assert_eq!(ATIVA, response.body["status"]);
    assert_eq!(false, response.body["bus_issue"]);
}

#[tokio::test]
async fn test_one_active_trip_per_bus_and_driver() {
    let ctx = TestContext::new().await;
    let driver_a = ctx.insert_user("Joao", 2, None).await;
    let driver_b = ctx.insert_user("Pedro", 2, None).await;
    let bus_a = ctx.create_bus("ABC1234", 10).await;
    let bus_b = ctx.create_bus("XYZ1234", 10).await;

    ctx.create_trip(IDA, bus_a, driver_a).await;

    for (bus, driver) in [(bus_a, driver_b), (bus_b, driver_a)] {
        let response = ctx.post("/trips", json!({ "trip_type": IDA, "bus_id": bus, "driver_id": driver })).await;
        assert_eq!(StatusCode::BAD_REQUEST, response.status);
        assert_eq!("Há uma viagem ativa para o ônibus ou motorista", response.detail());
    }

    // Viagens concluídas não bloqueiam
    let response = ctx
        .post("/trips", json!({ "trip_type": IDA, "status": CONCLUIDA, "bus_id": bus_a, "driver_id": driver_b }))
        .await;
    assert_eq!(StatusCode::CREATED, response.status);
    ctx.create_trip(IDA, bus_b, driver_b).await;
}

#[tokio::test]
async fn test_update_and_delete_trip() {
    let ctx = TestContext::new().await;
    let driver_id = ctx.insert_user("Joao", 2, None).await;
    let bus_id = ctx.create_bus("ABC1234", 10).await;
    let trip_id = ctx.create_trip(IDA, bus_id, driver_id).await;

    let response = ctx.put(&format!("/trips/{}", trip_id), json!({ "bus_issue": true })).await;
    assert_eq!(StatusCode::OK, response.status);
    assert_eq!(true, response.body["bus_issue"]);

    let response = ctx.put(&format!("/trips/{}", trip_id), json!({ "trip_type": 7 })).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);

    let response = ctx.delete(&format!("/trips/{}", trip_id)).await;
    assert_eq!(json!({ "status": "deleted" }), response.body);
    let response = ctx.get(&format!("/trips/{}", trip_id)).await;
    assert_eq!("Trip not found", response.detail());
}

#[tokio::test]
async fn test_finalizar_ida_opens_volta() {
    let ctx = TestContext::new().await;
    let driver_id = ctx.insert_user("Joao", 2, None).await;
    let alice = ctx.insert_user("Alice", 1, None).await;
    let bruno = ctx.insert_user("Bruno", 1, None).await;
    let faculty_id = ctx.create_faculty("FACOM").await;
    let portaria = ctx.create_stop("Portaria", faculty_id).await;
    let biblioteca = ctx.create_stop("Biblioteca", faculty_id).await;
    let bus_id = ctx.create_bus("ABC1234", 10).await;
    let ida_id = ctx.create_trip(IDA, bus_id, driver_id).await;

    assert_eq!(StatusCode::CREATED, ctx.enroll(ida_id, alice, portaria).await.status);
    assert_eq!(StatusCode::CREATED, ctx.enroll(ida_id, bruno, biblioteca).await.status);

    let response = ctx.put_empty(&format!("/trips/{}/finalizar_ida", ida_id)).await;
    assert_eq!(StatusCode::OK, response.status, "{:?}", response.body);
    assert_eq!(CONCLUIDA, response.body["status"]);

    let trips = ctx.get("/trips").await.body;
    let volta = trips
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["trip_type"] == VOLTA)
        .expect("volta trip created")
        .clone();
    assert_eq!(ATIVA, volta["status"]);
    assert_eq!(bus_id, volta["bus_id"]);
    assert_eq!(driver_id, volta["driver_id"]);
    let volta_id = volta["id"].as_i64().unwrap();

    let cloned = ctx.get(&format!("/student_trips?trip_id={}", volta_id)).await.body;
    let cloned = cloned.as_array().unwrap();
    assert_eq!(2, cloned.len());
    assert!(cloned.iter().all(|st| st["status"] == EM_AULA));
    assert_eq!(alice, cloned[0]["student_id"]);
    assert_eq!(portaria, cloned[0]["point_id"]);

    let originals = ctx.get(&format!("/student_trips?trip_id={}", ida_id)).await.body;
    assert!(originals.as_array().unwrap().iter().all(|st| st["status"] == EM_AULA));

    let stops = ctx.get(&format!("/trip_bus_stops?trip_id={}", volta_id)).await.body;
    let stops = stops.as_array().unwrap();
    assert_eq!(2, stops.len());
    assert!(stops.iter().all(|s| s["status"] == A_CAMINHO));

    let response = ctx.get(&format!("/bus_stops/volta/{}", volta_id)).await;
    assert_eq!(
        json!([
            { "id": portaria, "name": "Portaria - FACOM", "status": "A caminho" },
            { "id": biblioteca, "name": "Biblioteca - FACOM", "status": "A caminho" }
        ]),
        response.body
    );
}

#[tokio::test]
async fn test_finalizar_ida_errors() {
    let ctx = TestContext::new().await;
    let driver_id = ctx.insert_user("Joao", 2, None).await;
    let bus_id = ctx.create_bus("ABC1234", 10).await;
    let volta_id = ctx.create_trip(VOLTA, bus_id, driver_id).await;

    let response = ctx.put_empty("/trips/999/finalizar_ida").await;
    assert_eq!(StatusCode::NOT_FOUND, response.status);
    assert_eq!("Viagem de ida não encontrada", response.detail());

    let response = ctx.put_empty(&format!("/trips/{}/finalizar_ida", volta_id)).await;
    assert_eq!(StatusCode::NOT_FOUND, response.status);

    let response = ctx.put_empty(&format!("/trips/{}/finalizar_volta", volta_id)).await;
    assert_eq!(CONCLUIDA, response.body["status"]);
    let response = ctx.put_empty(&format!("/trips/{}/finalizar_volta", volta_id)).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("Viagem de volta já finalizada", response.detail());

    let ida_id = ctx.create_trip(IDA, bus_id, driver_id).await;
    assert_eq!(StatusCode::OK, ctx.put_empty(&format!("/trips/{}/finalizar_ida", ida_id)).await.status);

    // A volta criada ocupa o ônibus; a ida já não pode ser finalizada de novo
    let response = ctx.put_empty(&format!("/trips/{}/finalizar_ida", ida_id)).await;
    assert_eq!(StatusCode::BAD_REQUEST, response.status);
    assert_eq!("Viagem de ida já finalizada", response.detail());
}
