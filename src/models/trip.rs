// src/models/trip.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Sentido da viagem. Guardado e exposto como inteiro (1 = ida, 2 = volta).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[repr(i32)]
#[serde(into = "i32", try_from = "i32")]
pub enum TripType {
    Ida = 1,
    Volta = 2,
}

impl From<TripType> for i32 {
    fn from(value: TripType) -> i32 {
        value as i32
    }
}

impl TryFrom<i32> for TripType {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TripType::Ida),
            2 => Ok(TripType::Volta),
            x => Err(format!("Tipo de viagem inválido: {}", x)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[repr(i32)]
#[serde(into = "i32", try_from = "i32")]
pub enum TripStatus {
    Ativa = 1,
    Concluida = 2,
}

impl From<TripStatus> for i32 {
    fn from(value: TripStatus) -> i32 {
        value as i32
    }
}

impl TryFrom<i32> for TripStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TripStatus::Ativa),
            2 => Ok(TripStatus::Concluida),
            x => Err(format!("Estado de viagem inválido: {}", x)),
        }
    }
}

// Representa uma linha da tabela 'trips'
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Trip {
    pub id: i64,
    pub trip_type: TripType,
    pub status: TripStatus,
    pub bus_id: i64,
    pub driver_id: i64,
    pub bus_issue: bool,
    pub system_deleted: i64,
    pub create_date: NaiveDateTime,
    pub update_date: NaiveDateTime,
}

impl Trip {
    pub fn is_active(&self) -> bool {
        self.status == TripStatus::Ativa
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TripCreate {
    pub trip_type: TripType,
    #[serde(default)]
    pub status: Option<TripStatus>,
    #[validate(range(min = 1))]
    pub bus_id: i64,
    #[validate(range(min = 1))]
    pub driver_id: i64,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct TripUpdate {
    pub trip_type: Option<TripType>,
    pub status: Option<TripStatus>,
    #[validate(range(min = 1))]
    pub bus_id: Option<i64>,
    #[validate(range(min = 1))]
    pub driver_id: Option<i64>,
    pub bus_issue: Option<bool>,
}
