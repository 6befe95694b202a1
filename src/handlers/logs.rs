use actix_web::{HttpResponse, web};

use crate::database::models::{LogFilter, NewLog, UpdateLogInput};
use crate::database::repositories::LogRepository;
use crate::error::AppError;
use crate::handlers::shared::SuccessBody;

/// Get audit entries with optional filtering, oldest first.
pub async fn get_logs(
    repo: web::Data<LogRepository>,
    query: web::Query<LogFilter>,
) -> Result<HttpResponse, AppError> {
    let logs = repo.get_logs(&query).await?;

    Ok(HttpResponse::Ok().json(logs))
}

/// Record an entry directly, e.g. a delegation of approval authority.
pub async fn create_log(
    repo: web::Data<LogRepository>,
    input: web::Json<NewLog>,
) -> Result<HttpResponse, AppError> {
    let log = repo.append(&input.into_inner()).await?;

    Ok(HttpResponse::Created().json(log))
}

/// Administrative correction of a recorded entry.
pub async fn update_log(
    repo: web::Data<LogRepository>,
    path: web::Path<i64>,
    input: web::Json<UpdateLogInput>,
) -> Result<HttpResponse, AppError> {
    let log = repo
        .update_log(path.into_inner(), input.into_inner())
        .await?
        .ok_or_else(|| AppError::not_found("Log entry not found"))?;

    Ok(HttpResponse::Ok().json(log))
}

/// Administrative deletion of a recorded entry.
pub async fn delete_log(
    repo: web::Data<LogRepository>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    if !repo.delete_log(path.into_inner()).await? {
        return Err(AppError::not_found("Log entry not found"));
    }

    Ok(HttpResponse::Ok().json(SuccessBody::ok()))
}
