// src/models/trip_bus_stop.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Progresso do ônibus em relação a um ponto, dentro de uma viagem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[repr(i32)]
#[serde(into = "i32", try_from = "i32")]
pub enum TripBusStopStatus {
    ACaminho = 1,
    NoPonto = 2,
    ProximoPonto = 3,
    JaPassou = 4,
    OnibusComProblema = 5,
}

impl From<TripBusStopStatus> for i32 {
    fn from(value: TripBusStopStatus) -> i32 {
        value as i32
    }
}

impl TryFrom<i32> for TripBusStopStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(TripBusStopStatus::ACaminho),
            2 => Ok(TripBusStopStatus::NoPonto),
            3 => Ok(TripBusStopStatus::ProximoPonto),
            4 => Ok(TripBusStopStatus::JaPassou),
            5 => Ok(TripBusStopStatus::OnibusComProblema),
            x => Err(format!("Estado de ponto inválido: {}", x)),
        }
    }
}

pub const ALREADY_PASSED_MESSAGE: &str = "Ônibus já passou por esse ponto de ônibus.";
pub const INVALID_TRANSITION_MESSAGE: &str = "Invalid status transition";

impl TripBusStopStatus {
    /// Estados para os quais o ponto pode avançar a partir de `self`.
    pub fn allowed_targets(self) -> &'static [TripBusStopStatus] {
        use TripBusStopStatus::*;
        match self {
            ACaminho => &[NoPonto, ProximoPonto, OnibusComProblema],
            NoPonto => &[JaPassou, OnibusComProblema],
            ProximoPonto => &[NoPonto, OnibusComProblema],
            JaPassou => &[],
            OnibusComProblema => &[ACaminho, NoPonto, ProximoPonto, JaPassou],
        }
    }

    /// Valida a transição e devolve a mensagem de erro a expor ao cliente.
    pub fn check_transition(self, target: TripBusStopStatus) -> Result<(), &'static str> {
        if self == TripBusStopStatus::JaPassou {
            return Err(ALREADY_PASSED_MESSAGE);
        }
        if self.allowed_targets().contains(&target) {
            Ok(())
        } else {
            Err(INVALID_TRANSITION_MESSAGE)
        }
    }

    /// Texto exibido nas listagens de pontos.
    pub fn label(self) -> &'static str {
        match self {
            TripBusStopStatus::ACaminho => "A caminho",
            TripBusStopStatus::NoPonto => "No ponto",
            TripBusStopStatus::ProximoPonto => "Próximo ponto",
            TripBusStopStatus::JaPassou => "Já passou",
            TripBusStopStatus::OnibusComProblema => "Ônibus com problema",
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TripBusStop {
    pub id: i64,
    pub trip_id: i64,
    pub bus_stop_id: i64,
    pub status: TripBusStopStatus,
    pub system_deleted: i64,
    pub create_date: NaiveDateTime,
    pub update_date: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TripBusStopCreate {
    #[validate(range(min = 1))]
    pub trip_id: i64,
    #[validate(range(min = 1))]
    pub bus_stop_id: i64,
    #[serde(default)]
    pub status: Option<TripBusStopStatus>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TripBusStopUpdate {
    pub status: TripBusStopStatus,
}

#[cfg(test)]
mod tests {
    use super::TripBusStopStatus::*;
    use super::*;

    const ALL: [TripBusStopStatus; 5] = [ACaminho, NoPonto, ProximoPonto, JaPassou, OnibusComProblema];

    #[test]
    fn test_a_caminho_transitions() {
        assert_eq!(Ok(()), ACaminho.check_transition(NoPonto));
        assert_eq!(Ok(()), ACaminho.check_transition(ProximoPonto));
        assert_eq!(Ok(()), ACaminho.check_transition(OnibusComProblema));
        assert_eq!(Err(INVALID_TRANSITION_MESSAGE), ACaminho.check_transition(JaPassou));
        assert_eq!(Err(INVALID_TRANSITION_MESSAGE), ACaminho.check_transition(ACaminho));
    }

    #[test]
    fn test_no_ponto_transitions() {
        assert_eq!(Ok(()), NoPonto.check_transition(JaPassou));
        assert_eq!(Ok(()), NoPonto.check_transition(OnibusComProblema));
        assert_eq!(Err(INVALID_TRANSITION_MESSAGE), NoPonto.check_transition(ACaminho));
        assert_eq!(Err(INVALID_TRANSITION_MESSAGE), NoPonto.check_transition(ProximoPonto));
    }

    #[test]
    fn test_proximo_ponto_transitions() {
        assert_eq!(Ok(()), ProximoPonto.check_transition(NoPonto));
        assert_eq!(Ok(()), ProximoPonto.check_transition(OnibusComProblema));
        assert_eq!(Err(INVALID_TRANSITION_MESSAGE), ProximoPonto.check_transition(JaPassou));
    }

    #[test]
    fn test_ja_passou_is_terminal() {
        for target in ALL {
            assert_eq!(Err(ALREADY_PASSED_MESSAGE), JaPassou.check_transition(target));
        }
    }

    #[test]
    fn test_problem_recovers_to_any_progress_state() {
        for target in [ACaminho, NoPonto, ProximoPonto, JaPassou] {
            assert_eq!(Ok(()), OnibusComProblema.check_transition(target));
        }
        assert_eq!(
            Err(INVALID_TRANSITION_MESSAGE),
            OnibusComProblema.check_transition(OnibusComProblema)
        );
    }

    #[test]
    fn test_no_state_moves_to_itself() {
        for status in ALL {
            assert!(status.check_transition(status).is_err());
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!("A caminho", ACaminho.label());
        assert_eq!("Já passou", JaPassou.label());
    }
}
