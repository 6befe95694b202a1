use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::macros::string_enum;
use super::request::{ApprovalStatus, WfhRequest};
use super::withdraw::WithdrawRequest;

string_enum! {
    /// Which kind of action a log entry records.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum LogKind {
        WfhRequest => "wfh_request",
        Withdrawal => "withdrawal",
        Delegation => "delegation"
    }
}

/// Append-only audit record. Carries no foreign keys so the trail
/// survives deletion of the staff or requests it refers to.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RequestLog {
    pub id: i64,
    pub staff_id: i32,
    pub request_id: Option<i64>,
    pub withdraw_request_id: Option<i64>,
    pub processor_id: Option<i32>,
    pub request_type: LogKind,
    pub reason: Option<String>,
    pub status: ApprovalStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for a log entry. Built internally on every lifecycle
/// transition and accepted verbatim on the manual log endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLog {
    pub staff_id: i32,
    pub request_id: Option<i64>,
    pub withdraw_request_id: Option<i64>,
    pub processor_id: Option<i32>,
    pub request_type: LogKind,
    pub reason: Option<String>,
    pub status: ApprovalStatus,
}

impl NewLog {
    /// Log entry mirroring the current state of a WFH request.
    pub fn for_request(request: &WfhRequest, processor_id: Option<i32>) -> Self {
        Self {
            staff_id: request.staff_id,
            request_id: Some(request.id),
            withdraw_request_id: None,
            processor_id,
            request_type: LogKind::WfhRequest,
            reason: Some(request.reason.clone()),
            status: request.status,
        }
    }

    /// Log entry mirroring the current state of a withdraw request.
    pub fn for_withdraw_request(request: &WithdrawRequest, processor_id: Option<i32>) -> Self {
        Self {
            staff_id: request.staff_id,
            request_id: None,
            withdraw_request_id: Some(request.id),
            processor_id,
            request_type: LogKind::Withdrawal,
            reason: Some(request.reason.clone()),
            status: request.status.into(),
        }
    }
}

/// Query parameters for listing log entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogFilter {
    pub staff_id: Option<i32>,
    pub request_id: Option<i64>,
    pub withdraw_request_id: Option<i64>,
    pub processor_id: Option<i32>,
}

/// Payload for an administrative correction to a log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLogInput {
    pub reason: Option<String>,
    pub status: Option<ApprovalStatus>,
}
