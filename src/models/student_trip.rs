// src/models/student_trip.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Situação de um aluno dentro de uma viagem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[repr(i32)]
#[serde(into = "i32", try_from = "i32")]
pub enum StudentStatus {
    Presente = 1,
    EmAula = 2,
    AguardandoNoPonto = 3,
    NaoVoltara = 4,
    FilaDeEspera = 5,
}

impl From<StudentStatus> for i32 {
    fn from(value: StudentStatus) -> i32 {
        value as i32
    }
}

impl TryFrom<i32> for StudentStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(StudentStatus::Presente),
            2 => Ok(StudentStatus::EmAula),
            3 => Ok(StudentStatus::AguardandoNoPonto),
            4 => Ok(StudentStatus::NaoVoltara),
            5 => Ok(StudentStatus::FilaDeEspera),
            x => Err(format!("Estado de aluno inválido: {}", x)),
        }
    }
}

impl StudentStatus {
    /// Alunos que contam para a lotação do ônibus.
    pub fn occupies_seat(self) -> bool {
        !matches!(self, StudentStatus::NaoVoltara | StudentStatus::FilaDeEspera)
    }

    /// Alunos que ainda não embarcaram no ponto.
    pub fn blocks_departure(self) -> bool {
        matches!(self, StudentStatus::AguardandoNoPonto | StudentStatus::EmAula)
    }

    /// A fila de espera só é atribuída pelo sistema, nunca pedida.
    pub fn can_change_to(self, target: StudentStatus) -> bool {
        self != target && target != StudentStatus::FilaDeEspera
    }
}

// Linha da tabela 'student_trips'
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StudentTrip {
    pub id: i64,
    pub trip_id: i64,
    pub student_id: i64,
    pub status: StudentStatus,
    pub point_id: i64,
    pub system_deleted: i64,
    pub create_date: NaiveDateTime,
    pub update_date: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudentTripCreate {
    #[validate(range(min = 1))]
    pub trip_id: i64,
    #[validate(range(min = 1))]
    pub student_id: i64,
    #[validate(range(min = 1))]
    pub point_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct StudentTripStatusUpdate {
    pub status: StudentStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePointParams {
    pub point_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTripParams {
    pub new_trip_id: i64,
}
