// src/models/user.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Perfis de utilizador semeados pela migração inicial.
pub const USER_TYPE_STUDENT: i64 = 1;
pub const USER_TYPE_DRIVER: i64 = 2;
pub const USER_TYPE_ADMIN: i64 = 3;

// Representa um utilizador lido da tabela 'users' (com o nome da faculdade via LEFT JOIN)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub phone: String,
    #[serde(skip_serializing, default)]
    pub hashed_password: String,
    pub user_type_id: i64,
    pub faculty_id: Option<i64>,
    pub faculty_name: Option<String>,
    pub device_token: Option<String>,
    pub profile_picture: Option<String>,
    pub first_login: bool,
    pub system_deleted: i64,
    pub create_date: NaiveDateTime,
    pub update_date: NaiveDateTime,
}

/// Valida o CPF pelos dois dígitos verificadores.
pub fn is_valid_cpf(raw: &str) -> bool {
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || raw.chars().any(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    for i in 9..11 {
        let sum: u32 = (0..i).map(|n| digits[n] * ((i as u32 + 1) - n as u32)).sum();
        let check = (sum * 10) % 11 % 10;
        if check != digits[i] {
            return false;
        }
    }
    true
}

/// Valida um número brasileiro, com ou sem o prefixo 55: DDD válido e
/// 8 dígitos (fixo) ou 9 dígitos começando por 9 (celular).
pub fn is_valid_phone(raw: &str) -> bool {
    let trimmed = raw.trim();
    if !trimmed.chars().all(|c| c.is_ascii_digit() || " +-()".contains(c)) {
        return false;
    }
    let mut digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if (digits.len() == 12 || digits.len() == 13) && digits.starts_with("55") {
        digits = digits[2..].to_string();
    }
    let bytes = digits.as_bytes();
    match bytes.len() {
        10 | 11 => {}
        _ => return false,
    }
    // DDD não tem zeros
    if bytes[0] == b'0' || bytes[1] == b'0' {
        return false;
    }
    if bytes.len() == 11 && bytes[2] != b'9' {
        return false;
    }
    true
}

fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    if is_valid_cpf(cpf) {
        Ok(())
    } else {
        Err(ValidationError::new("cpf").with_message("Invalid CPF".into()))
    }
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Invalid phone number".into()))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: String,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    pub user_type_id: i64,
    pub faculty_id: Option<i64>,
    pub device_token: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(email(message = "Invalid email"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub password: Option<String>,
    pub faculty_id: Option<i64>,
    pub device_token: Option<String>,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserProfilePicture {
    #[validate(length(min = 1))]
    pub picture: String,
}

// Dados do POST /auth
#[derive(Debug, Deserialize, Validate)]
pub struct LoginData {
    #[validate(length(min = 1))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    pub user_type_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters"))]
    pub new_password: String,
}
