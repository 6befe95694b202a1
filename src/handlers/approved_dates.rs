use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::database::models::{ApprovedDateKey, MoveApprovedDateInput};
use crate::database::repositories::ApprovedDateRepository;
use crate::error::AppError;
use crate::handlers::shared::SuccessBody;

#[derive(Debug, Deserialize)]
pub struct ApprovedDatesQuery {
    pub staff_id: Option<i32>,
}

/// Get all approved dates, optionally narrowed to one staff member.
pub async fn get_approved_dates(
    repo: web::Data<ApprovedDateRepository>,
    query: web::Query<ApprovedDatesQuery>,
) -> Result<HttpResponse, AppError> {
    let dates = repo.get_all(query.staff_id).await?;

    Ok(HttpResponse::Ok().json(dates))
}

/// Manually record an approved day, keyed by staff, request and date.
pub async fn create_approved_date(
    repo: web::Data<ApprovedDateRepository>,
    input: web::Json<ApprovedDateKey>,
) -> Result<HttpResponse, AppError> {
    let approved_date = repo.create(input.into_inner()).await?;

    Ok(HttpResponse::Created().json(approved_date))
}

/// Move an approved day to a different date.
pub async fn move_approved_date(
    repo: web::Data<ApprovedDateRepository>,
    input: web::Json<MoveApprovedDateInput>,
) -> Result<HttpResponse, AppError> {
    let approved_date = repo
        .move_date(input.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Approved date not found"))?;

    Ok(HttpResponse::Ok().json(approved_date))
}

/// Remove an approved day, addressed by its composite key in the query
/// string.
pub async fn delete_approved_date(
    repo: web::Data<ApprovedDateRepository>,
    query: web::Query<ApprovedDateKey>,
) -> Result<HttpResponse, AppError> {
    if !repo.delete(query.into_inner()).await? {
        return Err(AppError::not_found("Approved date not found"));
    }

    Ok(HttpResponse::Ok().json(SuccessBody::ok()))
}

/// Approved days across a team lead's direct reports. Empty is fine.
pub async fn get_team_approved_dates(
    repo: web::Data<ApprovedDateRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let dates = repo.get_for_team(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(dates))
}

/// Approved days across one department. Empty is fine.
pub async fn get_department_approved_dates(
    repo: web::Data<ApprovedDateRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let dates = repo.get_for_department(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(dates))
}
