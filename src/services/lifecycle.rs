//! Lifecycle rules for WFH requests and withdraw requests: which
//! transitions are legal, and which derived rows each transition must
//! write. Everything here is pure; the repository layer executes the
//! computed effects inside a single transaction.

use std::collections::HashSet;

use crate::database::models::{
    ApprovalStatus, ApprovedDateKey, LogKind, NewLog, NewWithdrawnDate, UpdateWfhRequestInput,
    WfhRequest, WfhRequestInput, WithdrawRequest, WithdrawRequestInput, WithdrawStatus,
};
use crate::error::AppError;

/// Rows an approval writes besides the status flip itself.
#[derive(Debug, Clone)]
pub struct ApprovalEffects {
    pub approved_dates: Vec<ApprovedDateKey>,
    pub log: NewLog,
}

/// Rows a withdrawal approval writes after the request row is removed.
#[derive(Debug, Clone)]
pub struct WithdrawalEffects {
    pub withdrawn_date: NewWithdrawnDate,
    pub log: NewLog,
}

pub fn validate_new_request(input: &WfhRequestInput) -> Result<(), AppError> {
    if input.daterange.is_empty() {
        return Err(AppError::validation("At least one date is required"));
    }
    let mut seen = HashSet::new();
    for date in &input.daterange {
        if !seen.insert(date) {
            return Err(AppError::validation(format!(
                "Duplicate date in request: {date}"
            )));
        }
    }
    if input.reason.trim().is_empty() {
        return Err(AppError::validation("Reason is required"));
    }
    Ok(())
}

/// Same field rules as creation, applied to whichever fields an edit
/// actually carries.
pub fn validate_update_request(input: &UpdateWfhRequestInput) -> Result<(), AppError> {
    if let Some(daterange) = &input.daterange {
        if daterange.is_empty() {
            return Err(AppError::validation("At least one date is required"));
        }
        let mut seen = HashSet::new();
        for date in daterange {
            if !seen.insert(date) {
                return Err(AppError::validation(format!(
                    "Duplicate date in request: {date}"
                )));
            }
        }
    }
    if let Some(reason) = &input.reason {
        if reason.trim().is_empty() {
            return Err(AppError::validation("Reason is required"));
        }
    }
    Ok(())
}

pub fn validate_withdraw_request(input: &WithdrawRequestInput) -> Result<(), AppError> {
    if input.reason.trim().is_empty() {
        return Err(AppError::validation("Reason is required"));
    }
    Ok(())
}

/// Guard for the approve, reject and edit paths of a WFH request.
pub fn ensure_pending(request: &WfhRequest) -> Result<(), AppError> {
    if request.status != ApprovalStatus::Pending {
        return Err(AppError::conflict(format!(
            "Request {} is {}, only pending requests can be processed",
            request.id, request.status
        )));
    }
    Ok(())
}

/// Approved requests are never physically deleted; a withdrawal
/// supersedes them instead.
pub fn ensure_deletable(request: &WfhRequest) -> Result<(), AppError> {
    match request.status {
        ApprovalStatus::Pending | ApprovalStatus::Rejected => Ok(()),
        _ => Err(AppError::conflict(format!(
            "Request {} is {} and cannot be deleted",
            request.id, request.status
        ))),
    }
}

pub fn ensure_withdraw_pending(request: &WithdrawRequest) -> Result<(), AppError> {
    if request.status != WithdrawStatus::Pending {
        return Err(AppError::conflict(format!(
            "Withdraw request {} is {}, only pending requests can be processed",
            request.id, request.status
        )));
    }
    Ok(())
}

/// One approved day per requested date, plus the audit entry. The
/// composite (staff_id, request_id, date) key makes re-application safe.
pub fn approval_effects(request: &WfhRequest, processor_id: i32) -> ApprovalEffects {
    let approved_dates = request
        .daterange
        .iter()
        .map(|&date| ApprovedDateKey {
            staff_id: request.staff_id,
            request_id: request.id,
            date,
        })
        .collect();

    ApprovalEffects {
        approved_dates,
        log: decision_log(request, processor_id, ApprovalStatus::Approved),
    }
}

pub fn rejection_log(request: &WfhRequest, processor_id: i32) -> NewLog {
    decision_log(request, processor_id, ApprovalStatus::Rejected)
}

fn decision_log(request: &WfhRequest, processor_id: i32, status: ApprovalStatus) -> NewLog {
    NewLog {
        staff_id: request.staff_id,
        request_id: Some(request.id),
        withdraw_request_id: None,
        processor_id: Some(processor_id),
        request_type: LogKind::WfhRequest,
        reason: Some(request.reason.clone()),
        status,
    }
}

/// Removal of the approved day plus its audit trail. The day to delete
/// is addressed by (staff_id, date); a withdraw request does not record
/// which WFH request produced the day.
pub fn withdrawal_effects(request: &WithdrawRequest, processor_id: i32) -> WithdrawalEffects {
    WithdrawalEffects {
        withdrawn_date: NewWithdrawnDate {
            staff_id: request.staff_id,
            withdraw_request_id: request.id,
            date: request.date,
        },
        log: withdraw_decision_log(request, processor_id, ApprovalStatus::Approved),
    }
}

pub fn withdrawal_rejection_log(request: &WithdrawRequest, processor_id: i32) -> NewLog {
    withdraw_decision_log(request, processor_id, ApprovalStatus::Rejected)
}

fn withdraw_decision_log(
    request: &WithdrawRequest,
    processor_id: i32,
    status: ApprovalStatus,
) -> NewLog {
    NewLog {
        staff_id: request.staff_id,
        request_id: None,
        withdraw_request_id: Some(request.id),
        processor_id: Some(processor_id),
        request_type: LogKind::Withdrawal,
        reason: Some(request.reason.clone()),
        status,
    }
}
