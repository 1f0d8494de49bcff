use super::Role;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Doctor account. Doubles as the authenticated actor.
#[derive(Clone, Debug, Serialize, FromRow)]
pub struct Doctor {
    pub id: i64,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub role: Role,
    pub avatar: Option<String>,
    pub active: bool,
    pub speciality_id: Option<i64>,
    pub room_id: Option<i64>,
    /// Joined from `specialities`.
    pub speciality_name: Option<String>,
    /// Joined from `rooms`.
    pub room_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated PUT body for a doctor. `None` keeps the stored value.
#[derive(Clone, Debug, PartialEq)]
pub struct DoctorChanges {
    pub phone: String,
    pub name: String,
    pub role: Role,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub speciality_id: Option<i64>,
    pub room_id: Option<i64>,
    pub active: Option<bool>,
}
