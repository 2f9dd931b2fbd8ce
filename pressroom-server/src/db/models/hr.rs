//! HR Models
//!
//! Leave types, year-scoped balances, leave requests with an approval status,
//! holidays and payroll records. Reference/fact tables with plain CRUD; the
//! workflow engine never touches these.

use super::serde_thing;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::workflow::ApprovalStatus;
use surrealdb::sql::Thing;

// ── Leave types ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveType {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    pub name: String,
    /// Days allocated per year
    pub annual_quota: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveTypeCreate {
    pub name: String,
    pub annual_quota: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveTypeUpdate {
    pub name: Option<String>,
    pub annual_quota: Option<f64>,
    pub is_active: Option<bool>,
}

// ── Leave balances ──────────────────────────────────────────────────

/// Per-user, per-type, per-year balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveBalance {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    pub profile_id: String,
    pub leave_type_id: String,
    pub year: i32,
    pub allocated: f64,
    #[serde(default)]
    pub used: f64,
}

// ── Leave requests ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    pub profile_id: String,
    pub leave_type_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    #[serde(default)]
    pub reason: Option<String>,
    pub status: ApprovalStatus,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reviewed_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequestCreate {
    pub leave_type_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    #[serde(default)]
    pub reason: Option<String>,
}

// ── Holidays ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holiday {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_optional: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayCreate {
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub is_optional: bool,
}

// ── Payroll ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRecord {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Thing>,
    pub profile_id: String,
    /// "YYYY-MM"
    pub month: String,
    pub gross: Decimal,
    pub deductions: Decimal,
    pub net: Decimal,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRecordCreate {
    pub profile_id: String,
    pub month: String,
    pub gross: Decimal,
    pub deductions: Decimal,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_true() -> bool {
    true
}
