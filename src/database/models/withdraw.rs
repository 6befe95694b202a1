use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::request::{ApprovalStatus, Timeslot};

string_enum! {
    /// Withdraw requests never reach "withdrawn"; an approved one is
    /// consumed instead.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum WithdrawStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected"
    }
}

impl From<WithdrawStatus> for ApprovalStatus {
    fn from(status: WithdrawStatus) -> Self {
        match status {
            WithdrawStatus::Pending => ApprovalStatus::Pending,
            WithdrawStatus::Approved => ApprovalStatus::Approved,
            WithdrawStatus::Rejected => ApprovalStatus::Rejected,
        }
    }
}

/// A request to give back a single approved work-from-home day.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WithdrawRequest {
    pub id: i64,
    pub staff_id: i32,
    pub date: NaiveDate,
    pub timeslot: Timeslot,
    pub reason: String,
    pub status: WithdrawStatus,
    pub processed_by: Option<i32>,
    pub processing_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for submitting a withdraw request.
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawRequestInput {
    pub staff_id: i32,
    pub date: NaiveDate,
    pub timeslot: Timeslot,
    pub reason: String,
}

/// Payload for editing a withdraw request while it is still pending.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWithdrawRequestInput {
    pub date: Option<NaiveDate>,
    pub timeslot: Option<Timeslot>,
    pub reason: Option<String>,
}

/// Historical record of a day that was approved and later given back.
/// Kept free of foreign keys so the history survives staff deletion.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WithdrawnDate {
    pub id: i64,
    pub staff_id: i32,
    pub withdraw_request_id: i64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a withdrawn-date record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewWithdrawnDate {
    pub staff_id: i32,
    pub withdraw_request_id: i64,
    pub date: NaiveDate,
}
