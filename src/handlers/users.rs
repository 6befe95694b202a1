use actix_web::{HttpResponse, web};

use crate::database::models::{CreateUserInput, UpdateUserInput};
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::handlers::shared::SuccessBody;

pub async fn get_users(repo: web::Data<UserRepository>) -> Result<HttpResponse, AppError> {
    let users = repo.get_users().await?;

    Ok(HttpResponse::Ok().json(users))
}

/// Create a user. Unknown role or reporting-manager references are
/// rejected by the referential-integrity constraints as 400.
pub async fn create_user(
    repo: web::Data<UserRepository>,
    input: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    validate_user_input(&input)?;

    let user = repo.create_user(input).await?;

    Ok(HttpResponse::Created().json(user))
}

pub async fn get_user(
    repo: web::Data<UserRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let user = repo
        .find_by_staff_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_user(
    repo: web::Data<UserRepository>,
    path: web::Path<i32>,
    input: web::Json<UpdateUserInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    if let Some(email) = &input.email {
        validate_email(email)?;
    }

    let user = repo
        .update_user(path.into_inner(), input)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Delete a user. Users still referenced by requests are kept by the
/// referential-integrity constraints, which surface as 400.
pub async fn delete_user(
    repo: web::Data<UserRepository>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    if !repo.delete_user(path.into_inner()).await? {
        return Err(AppError::not_found("User not found"));
    }

    Ok(HttpResponse::Ok().json(SuccessBody::ok()))
}

fn validate_user_input(input: &CreateUserInput) -> Result<(), AppError> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(AppError::validation("First and last name are required"));
    }
    validate_email(&input.email)
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(AppError::validation("A valid email address is required"));
    }
    Ok(())
}
