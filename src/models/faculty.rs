// src/models/faculty.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    pub system_deleted: i64,
    pub create_date: NaiveDateTime,
    pub update_date: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FacultyCreate {
    #[validate(length(min = 1, message = "Faculty name is required"))]
    pub name: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct FacultyUpdate {
    #[validate(length(min = 1, message = "Faculty name is required"))]
    pub name: Option<String>,
}
