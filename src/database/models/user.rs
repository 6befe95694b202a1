use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub staff_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub position: String,
    pub country: String,
    pub email: String,
    pub reporting_manager: Option<i32>,
    pub role_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Payload for creating a user. `staff_id` comes from the HR system,
/// so it is supplied by the caller rather than generated here.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub staff_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub position: String,
    pub country: String,
    pub email: String,
    pub reporting_manager: Option<i32>,
    pub role_id: i32,
}

/// Payload for updating a user's profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub reporting_manager: Option<i32>,
    pub role_id: Option<i32>,
}
