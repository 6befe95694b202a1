use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    pub id: i32,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or renaming a role.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleInput {
    pub title: String,
}

/// Query parameters for the role authorization check.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleCheckQuery {
    pub user_id: i32,
    pub role_id: Option<i32>,
    pub department: Option<String>,
}

/// Response body for the role authorization check.
#[derive(Debug, Clone, Serialize)]
pub struct RoleCheckResult {
    #[serde(rename = "userId")]
    pub user_id: i32,
    #[serde(rename = "isAuthorized")]
    pub is_authorized: bool,
}
