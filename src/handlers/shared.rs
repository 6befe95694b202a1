use actix_web::{HttpResponse, http::header};
use serde::{Deserialize, Serialize};

use crate::database::models::User;
use crate::database::repositories::{RoleRepository, UserRepository};
use crate::error::AppError;
use crate::services::access_policy::{self, Action};

/// Failure body for every error surface: `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Success body for operations whose result is the fact they happened.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Optional actor identity on read endpoints. When absent the read is
/// served openly; when present the viewer must exist and pass the
/// access policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewerQuery {
    pub viewer_id: Option<i32>,
}

/// `OPTIONS` response advertising the verbs a route accepts.
pub fn allow(methods: &str) -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header((header::ALLOW, methods))
        .finish()
}

/// Load the processor and the record owner, then run the mutation
/// policy. An unknown processor is a 404, a denial a 403.
pub(crate) async fn authorize_decision(
    users: &UserRepository,
    roles: &RoleRepository,
    processor_id: i32,
    owner_staff_id: i32,
    action: Action,
) -> Result<(), AppError> {
    let processor = users
        .find_by_staff_id(processor_id)
        .await?
        .ok_or_else(|| AppError::not_found("Processor not found"))?;
    let owner = users
        .find_by_staff_id(owner_staff_id)
        .await?
        .ok_or_else(|| AppError::not_found("Staff member not found"))?;
    let role = roles.find_by_id(processor.role_id).await?;

    if !access_policy::can_mutate(&processor, role.as_ref(), &owner, action) {
        return Err(AppError::forbidden("Not authorized to process this request"));
    }

    Ok(())
}

/// Run the view policy for an optional viewer identity.
pub(crate) async fn authorize_view(
    users: &UserRepository,
    roles: &RoleRepository,
    viewer_id: Option<i32>,
    target: &User,
) -> Result<(), AppError> {
    let Some(viewer_id) = viewer_id else {
        return Ok(());
    };

    let viewer = users
        .find_by_staff_id(viewer_id)
        .await?
        .ok_or_else(|| AppError::not_found("Viewer not found"))?;
    let role = roles.find_by_id(viewer.role_id).await?;

    if !access_policy::can_view(&viewer, role.as_ref(), target) {
        return Err(AppError::forbidden("Not authorized to view these records"));
    }

    Ok(())
}
