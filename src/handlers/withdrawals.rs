use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::database::models::{
    DecisionInput, UpdateWithdrawRequestInput, WithdrawRequestInput, WithdrawStatus,
};
use crate::database::repositories::{
    ApprovedDateRepository, RoleRepository, UserRepository, WithdrawRepository,
};
use crate::error::AppError;
use crate::handlers::shared::{self, SuccessBody};
use crate::services::access_policy::Action;
use crate::services::lifecycle;

#[derive(Debug, Deserialize)]
pub struct WithdrawQuery {
    pub staff_id: Option<i32>,
    pub status: Option<WithdrawStatus>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawnDatesQuery {
    pub staff_id: Option<i32>,
}

/// Submit a request to give back an approved WFH day. The day must be
/// approved and belong to the requesting staff member.
pub async fn create_withdraw_request(
    repo: web::Data<WithdrawRepository>,
    approved_dates: web::Data<ApprovedDateRepository>,
    users: web::Data<UserRepository>,
    input: web::Json<WithdrawRequestInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    lifecycle::validate_withdraw_request(&input)?;

    users
        .find_by_staff_id(input.staff_id)
        .await?
        .ok_or_else(|| AppError::not_found("Staff member not found"))?;

    if !approved_dates
        .exists_for_staff_date(input.staff_id, input.date)
        .await?
    {
        return Err(AppError::not_found(
            "No approved WFH day found for this date",
        ));
    }

    let request = repo.create_withdraw_request(input).await?;

    Ok(HttpResponse::Created().json(request))
}

/// Get all withdraw requests with optional filtering.
pub async fn get_withdraw_requests(
    repo: web::Data<WithdrawRepository>,
    query: web::Query<WithdrawQuery>,
) -> Result<HttpResponse, AppError> {
    let requests = repo
        .get_withdraw_requests(query.staff_id, query.status)
        .await?;

    Ok(HttpResponse::Ok().json(requests))
}

pub async fn get_withdraw_request(
    repo: web::Data<WithdrawRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let request = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Withdraw request not found"))?;

    Ok(HttpResponse::Ok().json(request))
}

/// Edit a withdraw request that is still pending.
pub async fn update_withdraw_request(
    repo: web::Data<WithdrawRepository>,
    path: web::Path<i64>,
    input: web::Json<UpdateWithdrawRequestInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Withdraw request not found"))?;
    lifecycle::ensure_withdraw_pending(&existing)?;

    let updated = repo
        .update_withdraw_request(id, input.into_inner())
        .await?
        .ok_or_else(|| AppError::conflict("Withdraw request is no longer pending"))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Cancel a pending withdraw request.
pub async fn delete_withdraw_request(
    repo: web::Data<WithdrawRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Withdraw request not found"))?;
    lifecycle::ensure_withdraw_pending(&existing)?;

    if !repo.delete_withdraw_request(id).await? {
        return Err(AppError::conflict("Withdraw request is no longer pending"));
    }

    Ok(HttpResponse::Ok().json(SuccessBody::ok()))
}

/// Approve a withdrawal: the approved day is given back and the
/// withdraw request itself is consumed.
pub async fn approve_withdraw_request(
    repo: web::Data<WithdrawRepository>,
    users: web::Data<UserRepository>,
    roles: web::Data<RoleRepository>,
    path: web::Path<i64>,
    input: web::Json<DecisionInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let decision = input.into_inner();

    let request = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Withdraw request not found"))?;
    lifecycle::ensure_withdraw_pending(&request)?;

    shared::authorize_decision(
        &users,
        &roles,
        decision.processor_id,
        request.staff_id,
        Action::Approve,
    )
    .await?;

    repo.approve_withdraw_request(id, decision.processor_id)
        .await?
        .ok_or_else(|| AppError::conflict("Withdraw request is no longer pending"))?;

    Ok(HttpResponse::Ok().json(SuccessBody::ok()))
}

/// Reject a withdrawal; the approved day stays in place.
pub async fn reject_withdraw_request(
    repo: web::Data<WithdrawRepository>,
    users: web::Data<UserRepository>,
    roles: web::Data<RoleRepository>,
    path: web::Path<i64>,
    input: web::Json<DecisionInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let decision = input.into_inner();

    let request = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Withdraw request not found"))?;
    lifecycle::ensure_withdraw_pending(&request)?;

    shared::authorize_decision(
        &users,
        &roles,
        decision.processor_id,
        request.staff_id,
        Action::Reject,
    )
    .await?;

    let rejected = repo
        .reject_withdraw_request(id, decision.processor_id, decision.note)
        .await?
        .ok_or_else(|| AppError::conflict("Withdraw request is no longer pending"))?;

    Ok(HttpResponse::Ok().json(rejected))
}

/// History of days that were approved and later given back.
pub async fn get_withdrawn_dates(
    repo: web::Data<WithdrawRepository>,
    query: web::Query<WithdrawnDatesQuery>,
) -> Result<HttpResponse, AppError> {
    let dates = repo.get_withdrawn_dates(query.staff_id).await?;

    Ok(HttpResponse::Ok().json(dates))
}

pub async fn get_withdrawn_dates_by_staff(
    repo: web::Data<WithdrawRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let dates = repo.get_withdrawn_dates(Some(path.into_inner())).await?;

    Ok(HttpResponse::Ok().json(dates))
}
