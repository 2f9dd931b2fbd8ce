//! HR API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    Holiday, HolidayCreate, LeaveBalance, LeaveRequest, LeaveRequestCreate, LeaveType,
    LeaveTypeCreate, LeaveTypeUpdate, PayrollRecord, PayrollRecordCreate,
};
use crate::utils::AppResult;
use crate::workflow::effects;

// ========== Leave types ==========

/// GET /api/hr/leave-types
pub async fn leave_types(State(state): State<ServerState>) -> AppResult<Json<Vec<LeaveType>>> {
    Ok(Json(state.hr.find_leave_types().await?))
}

/// POST /api/hr/leave-types (admin)
pub async fn create_leave_type(
    State(state): State<ServerState>,
    Json(payload): Json<LeaveTypeCreate>,
) -> AppResult<Json<LeaveType>> {
    Ok(Json(state.hr.create_leave_type(payload).await?))
}

/// PUT /api/hr/leave-types/:id (admin)
pub async fn update_leave_type(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<LeaveTypeUpdate>,
) -> AppResult<Json<LeaveType>> {
    Ok(Json(state.hr.update_leave_type(&id, payload).await?))
}

// ========== Balances ==========

/// GET /api/hr/balances - the caller's own balances
pub async fn my_balances(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<LeaveBalance>>> {
    Ok(Json(
        state.hr.balances_for_profile(&current_user.id).await?,
    ))
}

/// GET /api/hr/balances/:profile_id (admin)
pub async fn balances_for(
    State(state): State<ServerState>,
    Path(profile_id): Path<String>,
) -> AppResult<Json<Vec<LeaveBalance>>> {
    Ok(Json(state.hr.balances_for_profile(&profile_id).await?))
}

// ========== Leave requests ==========

/// GET /api/hr/leave-requests - the caller's own requests
pub async fn my_leave_requests(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    Ok(Json(
        state.hr.leave_requests_for_profile(&current_user.id).await?,
    ))
}

/// GET /api/hr/leave-requests/pending (admin)
pub async fn pending_requests(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    Ok(Json(state.hr.pending_leave_requests().await?))
}

/// POST /api/hr/leave-requests
///
/// The balance check runs against the year the leave starts in.
pub async fn create_leave_request(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<LeaveRequestCreate>,
) -> AppResult<Json<LeaveRequest>> {
    let year = chrono::Datelike::year(&payload.start_date);
    let request = state
        .hr
        .create_leave_request(&current_user.id, payload, year)
        .await?;

    // Admins review; tell them there is something to look at
    if let Ok(admins) = state
        .profiles
        .find_active_by_role(shared::workflow::Role::Admin)
        .await
    {
        let recipients: Vec<String> = admins
            .iter()
            .filter_map(|p| p.id.as_ref().map(|t| t.to_string()))
            .filter(|id| *id != current_user.id)
            .collect();
        effects::notify(
            &state,
            &recipients,
            "Leave request",
            &format!(
                "{} requested {:.1} day(s) of leave",
                current_user.display_name, request.days
            ),
            None,
            None,
        )
        .await;
    }

    Ok(Json(request))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub approve: bool,
}

/// POST /api/hr/leave-requests/:id/review (admin)
pub async fn review_leave_request(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<Json<LeaveRequest>> {
    let request = state
        .hr
        .review_leave_request(&id, &current_user.id, payload.approve)
        .await?;

    let outcome = if payload.approve { "approved" } else { "rejected" };
    effects::notify(
        &state,
        std::slice::from_ref(&request.profile_id),
        "Leave request reviewed",
        &format!("Your leave request was {}", outcome),
        None,
        None,
    )
    .await;
    effects::log_activity(
        &state,
        &current_user,
        &format!("leave_request.{}", outcome),
        "leave_request",
        &id,
        serde_json::json!({ "profile_id": request.profile_id, "days": request.days }),
    )
    .await;

    Ok(Json(request))
}

/// POST /api/hr/leave-requests/:id/cancel
pub async fn cancel_leave_request(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<LeaveRequest>> {
    let request = state
        .hr
        .cancel_leave_request(&id, &current_user.id)
        .await?;
    Ok(Json(request))
}

// ========== Holidays ==========

/// GET /api/hr/holidays
pub async fn holidays(State(state): State<ServerState>) -> AppResult<Json<Vec<Holiday>>> {
    Ok(Json(state.hr.find_holidays().await?))
}

/// POST /api/hr/holidays (admin)
pub async fn create_holiday(
    State(state): State<ServerState>,
    Json(payload): Json<HolidayCreate>,
) -> AppResult<Json<Holiday>> {
    Ok(Json(state.hr.create_holiday(payload).await?))
}

/// DELETE /api/hr/holidays/:id (admin)
pub async fn delete_holiday(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = state.hr.delete_holiday(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}

// ========== Payroll ==========

/// GET /api/hr/payroll - the caller's own records
pub async fn my_payroll(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<PayrollRecord>>> {
    Ok(Json(state.hr.payroll_for_profile(&current_user.id).await?))
}

/// GET /api/hr/payroll/:profile_id (admin)
pub async fn payroll_for(
    State(state): State<ServerState>,
    Path(profile_id): Path<String>,
) -> AppResult<Json<Vec<PayrollRecord>>> {
    Ok(Json(state.hr.payroll_for_profile(&profile_id).await?))
}

/// POST /api/hr/payroll (admin)
pub async fn create_payroll(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<PayrollRecordCreate>,
) -> AppResult<Json<PayrollRecord>> {
    let record = state.hr.create_payroll(payload).await?;
    effects::log_activity(
        &state,
        &current_user,
        "payroll.created",
        "payroll",
        &record.id.as_ref().map(|t| t.to_string()).unwrap_or_default(),
        serde_json::json!({ "profile_id": record.profile_id, "month": record.month }),
    )
    .await;
    Ok(Json(record))
}
