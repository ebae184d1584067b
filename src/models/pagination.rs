// src/models/pagination.rs
use serde::Deserialize;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

/// Parâmetros `skip`/`limit` aceites por todas as listagens.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_LIMIT }
    }
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        self.skip.max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

/// Filtro opcional por viagem, usado junto com a paginação.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TripFilter {
    pub trip_id: Option<i64>,
}
