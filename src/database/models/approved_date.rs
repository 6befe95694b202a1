use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One approved work-from-home day. Identified by the
/// (staff_id, request_id, date) triple rather than a surrogate id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ApprovedDate {
    pub staff_id: i32,
    pub request_id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Composite key addressing a single approved day. Doubles as the
/// insert payload since the row carries no other caller-supplied data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedDateKey {
    pub staff_id: i32,
    pub request_id: i64,
    pub date: NaiveDate,
}

/// Payload for moving an approved day to a different date.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveApprovedDateInput {
    pub staff_id: i32,
    pub request_id: i64,
    pub date: NaiveDate,
    pub new_date: NaiveDate,
}
