use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::database::models::{
    ApprovalStatus, ApprovedDate, RequestFilter, WfhRequest, WithdrawnDate,
};
use crate::database::repositories::{
    ApprovedDateRepository, RequestRepository, RoleRepository, UserRepository, WithdrawRepository,
};
use crate::error::AppError;
use crate::handlers::shared::{self, ViewerQuery};

/// One staff member's WFH picture: confirmed days, requests still in
/// flight, and days given back.
#[derive(Debug, Serialize)]
pub struct Schedule {
    pub staff_id: i32,
    pub approved_dates: Vec<ApprovedDate>,
    pub pending_requests: Vec<WfhRequest>,
    pub withdrawn_dates: Vec<WithdrawnDate>,
}

pub async fn get_schedule(
    users: web::Data<UserRepository>,
    roles: web::Data<RoleRepository>,
    requests: web::Data<RequestRepository>,
    approved_dates: web::Data<ApprovedDateRepository>,
    withdrawals: web::Data<WithdrawRepository>,
    path: web::Path<i32>,
    query: web::Query<ViewerQuery>,
) -> Result<HttpResponse, AppError> {
    let staff_id = path.into_inner();

    let target = users
        .find_by_staff_id(staff_id)
        .await?
        .ok_or_else(|| AppError::not_found("Staff member not found"))?;
    shared::authorize_view(&users, &roles, query.viewer_id, &target).await?;

    let pending_filter = RequestFilter {
        staff_id: Some(staff_id),
        status: Some(ApprovalStatus::Pending),
    };

    let schedule = Schedule {
        staff_id,
        approved_dates: approved_dates.get_by_staff(staff_id).await?,
        pending_requests: requests.get_requests(&pending_filter).await?,
        withdrawn_dates: withdrawals.get_withdrawn_dates(Some(staff_id)).await?,
    };

    Ok(HttpResponse::Ok().json(schedule))
}
