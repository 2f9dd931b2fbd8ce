//! HR Repository
//!
//! Leave types, balances, requests, holidays and payroll. One repository for
//! the whole HR area; the tables are small reference/fact tables and the
//! operations are plain CRUD plus the approve/reject balance bookkeeping.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{
    Holiday, HolidayCreate, LeaveBalance, LeaveRequest, LeaveRequestCreate, LeaveType,
    LeaveTypeCreate, LeaveTypeUpdate, PayrollRecord, PayrollRecordCreate,
};
use shared::util::now_millis;
use shared::workflow::ApprovalStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct HrRepository {
    base: BaseRepository,
}

impl HrRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    // ── Leave types ─────────────────────────────────────────────────

    pub async fn find_leave_types(&self) -> RepoResult<Vec<LeaveType>> {
        let types: Vec<LeaveType> = self
            .base
            .db()
            .query("SELECT * FROM leave_type WHERE is_active = true ORDER BY name ASC")
            .await?
            .take(0)?;
        Ok(types)
    }

    pub async fn create_leave_type(&self, data: LeaveTypeCreate) -> RepoResult<LeaveType> {
        let row = LeaveType {
            id: None,
            name: data.name,
            annual_quota: data.annual_quota,
            is_active: true,
        };
        let created: Option<LeaveType> = self.base.db().create("leave_type").content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create leave type".to_string()))
    }

    pub async fn update_leave_type(
        &self,
        id: &str,
        data: LeaveTypeUpdate,
    ) -> RepoResult<LeaveType> {
        let thing = parse_record_id(id)?;
        let mut existing: LeaveType = self
            .base
            .db()
            .select(thing.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Leave type {} not found", id)))?;
        if let Some(name) = data.name {
            existing.name = name;
        }
        if let Some(quota) = data.annual_quota {
            existing.annual_quota = quota;
        }
        if let Some(is_active) = data.is_active {
            existing.is_active = is_active;
        }
        // The target record is named by `thing`; a serialized id in the
        // content document makes SurrealDB reject the update.
        existing.id = None;
        let updated: Option<LeaveType> = self.base.db().update(thing).content(existing).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update leave type".to_string()))
    }

    // ── Leave balances ──────────────────────────────────────────────

    /// Balance for one user/type/year, created from the type's annual quota
    /// on first access.
    pub async fn balance_for(
        &self,
        profile_id: &str,
        leave_type_id: &str,
        year: i32,
    ) -> RepoResult<LeaveBalance> {
        let pid = profile_id.to_string();
        let tid = leave_type_id.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM leave_balance WHERE profile_id = $pid AND leave_type_id = $tid AND year = $year LIMIT 1",
            )
            .bind(("pid", pid))
            .bind(("tid", tid))
            .bind(("year", year))
            .await?;
        let rows: Vec<LeaveBalance> = result.take(0)?;
        if let Some(balance) = rows.into_iter().next() {
            return Ok(balance);
        }

        let type_thing = parse_record_id(leave_type_id)?;
        let leave_type: LeaveType = self
            .base
            .db()
            .select(type_thing)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Leave type {} not found", leave_type_id)))?;
        let row = LeaveBalance {
            id: None,
            profile_id: profile_id.to_string(),
            leave_type_id: leave_type_id.to_string(),
            year,
            allocated: leave_type.annual_quota,
            used: 0.0,
        };
        let created: Option<LeaveBalance> =
            self.base.db().create("leave_balance").content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create leave balance".to_string()))
    }

    pub async fn balances_for_profile(&self, profile_id: &str) -> RepoResult<Vec<LeaveBalance>> {
        let pid = profile_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM leave_balance WHERE profile_id = $pid ORDER BY year DESC")
            .bind(("pid", pid))
            .await?;
        let rows: Vec<LeaveBalance> = result.take(0)?;
        Ok(rows)
    }

    async fn add_used(&self, balance: LeaveBalance, days: f64) -> RepoResult<LeaveBalance> {
        let thing = balance
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("Balance row without id".to_string()))?;
        let rid = parse_record_id(&thing.to_string())?;
        let mut row = balance;
        row.id = None;
        row.used += days;
        let updated: Option<LeaveBalance> = self.base.db().update(rid).content(row).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update leave balance".to_string()))
    }

    // ── Leave requests ──────────────────────────────────────────────

    pub async fn create_leave_request(
        &self,
        profile_id: &str,
        data: LeaveRequestCreate,
        year: i32,
    ) -> RepoResult<LeaveRequest> {
        if data.end_date < data.start_date {
            return Err(RepoError::Validation(
                "End date before start date".to_string(),
            ));
        }
        if data.days <= 0.0 {
            return Err(RepoError::Validation("Days must be positive".to_string()));
        }
        let balance = self
            .balance_for(profile_id, &data.leave_type_id, year)
            .await?;
        if balance.used + data.days > balance.allocated {
            return Err(RepoError::Validation(format!(
                "Insufficient leave balance: {:.1} of {:.1} days remaining",
                balance.allocated - balance.used,
                balance.allocated
            )));
        }
        let row = LeaveRequest {
            id: None,
            profile_id: profile_id.to_string(),
            leave_type_id: data.leave_type_id,
            start_date: data.start_date,
            end_date: data.end_date,
            days: data.days,
            reason: data.reason,
            status: ApprovalStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now_millis(),
        };
        let created: Option<LeaveRequest> =
            self.base.db().create("leave_request").content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create leave request".to_string()))
    }

    pub async fn leave_requests_for_profile(
        &self,
        profile_id: &str,
    ) -> RepoResult<Vec<LeaveRequest>> {
        let pid = profile_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM leave_request WHERE profile_id = $pid ORDER BY created_at DESC")
            .bind(("pid", pid))
            .await?;
        let rows: Vec<LeaveRequest> = result.take(0)?;
        Ok(rows)
    }

    pub async fn pending_leave_requests(&self) -> RepoResult<Vec<LeaveRequest>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM leave_request WHERE status = 'pending' ORDER BY created_at ASC")
            .await?;
        let rows: Vec<LeaveRequest> = result.take(0)?;
        Ok(rows)
    }

    /// Approve or reject a pending request. Approval consumes balance; any
    /// other target status is rejected here.
    pub async fn review_leave_request(
        &self,
        id: &str,
        reviewer_id: &str,
        approve: bool,
    ) -> RepoResult<LeaveRequest> {
        let thing = parse_record_id(id)?;
        let mut request: LeaveRequest = self
            .base
            .db()
            .select(thing.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Leave request {} not found", id)))?;
        if request.status != ApprovalStatus::Pending {
            return Err(RepoError::Validation(
                "Leave request already reviewed".to_string(),
            ));
        }

        if approve {
            let year = chrono::Datelike::year(&request.start_date);
            let balance = self
                .balance_for(&request.profile_id, &request.leave_type_id, year)
                .await?;
            self.add_used(balance, request.days).await?;
            request.status = ApprovalStatus::Approved;
        } else {
            request.status = ApprovalStatus::Rejected;
        }
        request.reviewed_by = Some(reviewer_id.to_string());
        request.reviewed_at = Some(now_millis());
        request.id = None;

        let updated: Option<LeaveRequest> =
            self.base.db().update(thing).content(request).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update leave request".to_string()))
    }

    /// Requester cancels their own pending request
    pub async fn cancel_leave_request(
        &self,
        id: &str,
        profile_id: &str,
    ) -> RepoResult<LeaveRequest> {
        let thing = parse_record_id(id)?;
        let mut request: LeaveRequest = self
            .base
            .db()
            .select(thing.clone())
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Leave request {} not found", id)))?;
        if request.profile_id != profile_id {
            return Err(RepoError::Validation(
                "Only the requester can cancel".to_string(),
            ));
        }
        if request.status != ApprovalStatus::Pending {
            return Err(RepoError::Validation(
                "Only pending requests can be cancelled".to_string(),
            ));
        }
        request.status = ApprovalStatus::Cancelled;
        request.id = None;
        let updated: Option<LeaveRequest> =
            self.base.db().update(thing).content(request).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update leave request".to_string()))
    }

    // ── Holidays ────────────────────────────────────────────────────

    pub async fn find_holidays(&self) -> RepoResult<Vec<Holiday>> {
        let rows: Vec<Holiday> = self
            .base
            .db()
            .query("SELECT * FROM holiday ORDER BY date ASC")
            .await?
            .take(0)?;
        Ok(rows)
    }

    pub async fn create_holiday(&self, data: HolidayCreate) -> RepoResult<Holiday> {
        let row = Holiday {
            id: None,
            name: data.name,
            date: data.date,
            is_optional: data.is_optional,
        };
        let created: Option<Holiday> = self.base.db().create("holiday").content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create holiday".to_string()))
    }

    pub async fn delete_holiday(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id)?;
        let deleted: Option<Holiday> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }

    // ── Payroll ─────────────────────────────────────────────────────

    pub async fn create_payroll(&self, data: PayrollRecordCreate) -> RepoResult<PayrollRecord> {
        let row = PayrollRecord {
            id: None,
            profile_id: data.profile_id,
            month: data.month,
            net: data.gross - data.deductions,
            gross: data.gross,
            deductions: data.deductions,
            note: data.note,
            created_at: now_millis(),
        };
        let created: Option<PayrollRecord> =
            self.base.db().create("payroll").content(row).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payroll record".to_string()))
    }

    pub async fn payroll_for_profile(&self, profile_id: &str) -> RepoResult<Vec<PayrollRecord>> {
        let pid = profile_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM payroll WHERE profile_id = $pid ORDER BY month DESC")
            .bind(("pid", pid))
            .await?;
        let rows: Vec<PayrollRecord> = result.take(0)?;
        Ok(rows)
    }
}
