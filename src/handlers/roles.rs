use actix_web::{HttpResponse, web};

use crate::database::models::{RoleCheckQuery, RoleCheckResult, RoleInput};
use crate::database::repositories::{RoleRepository, UserRepository};
use crate::error::AppError;
use crate::handlers::shared::SuccessBody;
use crate::services::access_policy;

pub async fn get_roles(repo: web::Data<RoleRepository>) -> Result<HttpResponse, AppError> {
    let roles = repo.get_roles().await?;

    Ok(HttpResponse::Ok().json(roles))
}

pub async fn create_role(
    repo: web::Data<RoleRepository>,
    input: web::Json<RoleInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    if input.title.trim().is_empty() {
        return Err(AppError::validation("Role title is required"));
    }

    let role = repo.create_role(input).await?;

    Ok(HttpResponse::Created().json(role))
}

pub async fn get_role(
    repo: web::Data<RoleRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let role = repo
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Role not found"))?;

    Ok(HttpResponse::Ok().json(role))
}

pub async fn update_role(
    repo: web::Data<RoleRepository>,
    path: web::Path<i32>,
    input: web::Json<RoleInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    if input.title.trim().is_empty() {
        return Err(AppError::validation("Role title is required"));
    }

    let role = repo
        .update_role(path.into_inner(), input)
        .await?
        .ok_or_else(|| AppError::not_found("Role not found"))?;

    Ok(HttpResponse::Ok().json(role))
}

/// Delete a role. Roles still assigned to users are kept by the
/// referential-integrity constraint, which surfaces as 400.
pub async fn delete_role(
    repo: web::Data<RoleRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    if !repo.delete_role(path.into_inner()).await? {
        return Err(AppError::not_found("Role not found"));
    }

    Ok(HttpResponse::Ok().json(SuccessBody::ok()))
}

/// Authorization probe: the user passes when EITHER the role id OR the
/// department matches their record.
pub async fn check_role(
    users: web::Data<UserRepository>,
    query: web::Query<RoleCheckQuery>,
) -> Result<HttpResponse, AppError> {
    let user = users
        .find_by_staff_id(query.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let is_authorized = access_policy::role_or_department_matches(
        &user,
        query.role_id,
        query.department.as_deref(),
    );

    Ok(HttpResponse::Ok().json(RoleCheckResult {
        user_id: user.staff_id,
        is_authorized,
    }))
}
