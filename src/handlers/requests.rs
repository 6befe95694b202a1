use actix_web::{HttpResponse, web};

use crate::database::models::{
    DecisionInput, RequestFilter, UpdateWfhRequestInput, WfhRequestInput,
};
use crate::database::repositories::{RequestRepository, RoleRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::{self, SuccessBody, ViewerQuery};
use crate::services::access_policy::Action;
use crate::services::lifecycle;

/// Submit a new WFH request. The request starts out pending.
pub async fn create_request(
    repo: web::Data<RequestRepository>,
    users: web::Data<UserRepository>,
    input: web::Json<WfhRequestInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    lifecycle::validate_new_request(&input)?;

    users
        .find_by_staff_id(input.staff_id)
        .await?
        .ok_or_else(|| AppError::not_found("Staff member not found"))?;

    let request = repo.create_request(input).await?;

    Ok(HttpResponse::Created().json(request))
}

/// Get all requests with optional filtering.
pub async fn get_requests(
    repo: web::Data<RequestRepository>,
    query: web::Query<RequestFilter>,
) -> Result<HttpResponse, AppError> {
    let requests = repo.get_requests(&query).await?;

    Ok(HttpResponse::Ok().json(requests))
}

pub async fn get_request(
    repo: web::Data<RequestRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let request = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Request not found"))?;

    Ok(HttpResponse::Ok().json(request))
}

/// List one staff member's requests. An empty history surfaces as 404.
pub async fn get_requests_by_staff(
    repo: web::Data<RequestRepository>,
    users: web::Data<UserRepository>,
    roles: web::Data<RoleRepository>,
    path: web::Path<i32>,
    query: web::Query<ViewerQuery>,
) -> Result<HttpResponse, AppError> {
    let staff_id = path.into_inner();
    let requests = repo.get_requests_by_staff(staff_id).await?;

    if requests.is_empty() {
        return Err(AppError::not_found("No requests found for this staff"));
    }

    if query.viewer_id.is_some() {
        let target = users
            .find_by_staff_id(staff_id)
            .await?
            .ok_or_else(|| AppError::not_found("Staff member not found"))?;
        shared::authorize_view(&users, &roles, query.viewer_id, &target).await?;
    }

    Ok(HttpResponse::Ok().json(requests))
}

/// Requests of everyone reporting directly to the given manager.
pub async fn get_requests_for_manager(
    repo: web::Data<RequestRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let manager_staff_id = path.into_inner();
    let requests = repo.get_requests_for_manager(manager_staff_id).await?;

    if requests.is_empty() {
        return Err(AppError::not_found("No requests found for this team"));
    }

    Ok(HttpResponse::Ok().json(requests))
}

/// Edit a request that is still pending.
pub async fn update_request(
    repo: web::Data<RequestRepository>,
    path: web::Path<i64>,
    input: web::Json<UpdateWfhRequestInput>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = input.into_inner();
    lifecycle::validate_update_request(&input)?;

    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Request not found"))?;
    lifecycle::ensure_pending(&existing)?;

    repo.update_request(id, input)
        .await?
        .ok_or_else(|| AppError::conflict("Request is no longer pending"))?;

    Ok(HttpResponse::Ok().json(SuccessBody::ok()))
}

pub async fn delete_request(
    repo: web::Data<RequestRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let existing = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Request not found"))?;
    lifecycle::ensure_deletable(&existing)?;

    if !repo.delete_request(id).await? {
        return Err(AppError::conflict("Request is no longer deletable"));
    }

    Ok(HttpResponse::Ok().json(SuccessBody::ok()))
}

/// Approve a pending request on behalf of the given processor.
pub async fn approve_request(
    repo: web::Data<RequestRepository>,
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
        .ok_or_else(|| AppError::not_found("Request not found"))?;
    lifecycle::ensure_pending(&request)?;

    shared::authorize_decision(
        &users,
        &roles,
        decision.processor_id,
        request.staff_id,
        Action::Approve,
    )
    .await?;

    let approved = repo
        .approve_request(id, decision.processor_id, decision.note)
        .await?
        .ok_or_else(|| AppError::conflict("Request is no longer pending"))?;

    Ok(HttpResponse::Ok().json(approved))
}

/// Reject a pending request on behalf of the given processor.
pub async fn reject_request(
    repo: web::Data<RequestRepository>,
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
        .ok_or_else(|| AppError::not_found("Request not found"))?;
    lifecycle::ensure_pending(&request)?;

    shared::authorize_decision(
        &users,
        &roles,
        decision.processor_id,
        request.staff_id,
        Action::Reject,
    )
    .await?;

    let rejected = repo
        .reject_request(id, decision.processor_id, decision.note)
        .await?
        .ok_or_else(|| AppError::conflict("Request is no longer pending"))?;

    Ok(HttpResponse::Ok().json(rejected))
}
