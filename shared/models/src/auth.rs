use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Cycle length stored when a registration does not supply one.
pub const DEFAULT_CYCLE_LENGTH: i32 = 28;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    // Never leaves the process: digests are stored, not transmitted.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub birth_year: Option<i32>,
    pub average_cycle_length: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub name: Option<String>,
    pub birth_year: Option<i32>,
    pub average_cycle_length: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user's normalized email.
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
