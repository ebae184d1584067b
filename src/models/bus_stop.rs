// src/models/bus_stop.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BusStop {
    pub id: i64,
    pub name: String,
    pub faculty_id: i64,
    pub system_deleted: i64,
    pub create_date: NaiveDateTime,
    pub update_date: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BusStopCreate {
    #[validate(length(min = 1, message = "Bus stop name is required"))]
    pub name: String,
    #[validate(range(min = 1))]
    pub faculty_id: i64,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct BusStopUpdate {
    #[validate(length(min = 1, message = "Bus stop name is required"))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub faculty_id: Option<i64>,
}

/// Ponto formatado como "<ponto> - <faculdade>", usado pelas listagens da app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusStopListItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<String>,
}

impl BusStopListItem {
    pub fn new(id: i64, stop_name: &str, faculty_name: &str, status: Option<&str>) -> Self {
        Self {
            id,
            name: format!("{} - {}", stop_name, faculty_name),
            status: status.map(str::to_string),
        }
    }
}

// Linha auxiliar dos JOINs ponto + faculdade (+ estado do ponto na viagem)
#[derive(Debug, FromRow)]
pub struct BusStopWithFaculty {
    pub id: i64,
    pub name: String,
    pub faculty_name: String,
}
