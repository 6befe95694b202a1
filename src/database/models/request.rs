use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;

string_enum! {
    /// Half-day or full-day arrangement slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Timeslot {
        Am => "AM",
        Pm => "PM",
        FullDay => "FULL_DAY"
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ApprovalStatus {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Withdrawn => "withdrawn"
    }
}

/// A work-from-home request covering one or more dates.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WfhRequest {
    pub id: i64,
    pub staff_id: i32,
    pub daterange: Vec<NaiveDate>,
    pub timeslot: Timeslot,
    pub reason: String,
    pub status: ApprovalStatus,
    pub document_url: Option<String>,
    pub processed_by: Option<i32>,
    pub processing_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for submitting a new request.
#[derive(Debug, Clone, Deserialize)]
pub struct WfhRequestInput {
    pub staff_id: i32,
    pub daterange: Vec<NaiveDate>,
    pub timeslot: Timeslot,
    pub reason: String,
    pub document_url: Option<String>,
}

/// Payload for editing a request while it is still pending.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWfhRequestInput {
    pub daterange: Option<Vec<NaiveDate>>,
    pub timeslot: Option<Timeslot>,
    pub reason: Option<String>,
    pub document_url: Option<String>,
}

/// Payload for an approve or reject decision.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionInput {
    pub processor_id: i32,
    pub note: Option<String>,
}

/// Query parameters for listing requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFilter {
    pub staff_id: Option<i32>,
    pub status: Option<ApprovalStatus>,
}
