// src/models/bus.rs
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::LazyLock;
use validator::Validate;

// Placa Mercosul (ABC1D23) ou antiga (ABC1234)
static PLATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{3}[0-9][A-Z][0-9]{2}$|^[A-Z]{3}[0-9]{4}$").expect("regex de placa válida")
});

pub const INVALID_PLATE_MESSAGE: &str = "Invalid registration number format";

/// Normaliza a placa para maiúsculas e valida o formato.
pub fn normalize_registration_number(raw: &str) -> Result<String, &'static str> {
    let plate = raw.trim().to_uppercase();
    if PLATE_RE.is_match(&plate) {
        Ok(plate)
    } else {
        Err(INVALID_PLATE_MESSAGE)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Bus {
    pub id: i64,
    pub registration_number: String,
    pub name: String,
    pub capacity: i64,
    pub system_deleted: i64,
    pub create_date: NaiveDateTime,
    pub update_date: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BusCreate {
    pub registration_number: String,
    #[validate(length(min = 1, message = "Bus name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: i64,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct BusUpdate {
    pub registration_number: Option<String>,
    #[validate(length(min = 1, message = "Bus name is required"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be positive"))]
    pub capacity: Option<i64>,
}
