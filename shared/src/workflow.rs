//! Workflow vocabulary: stages, departments, statuses and priorities.
//!
//! The source of truth for an item's position in the shop is `current_stage`;
//! `assigned_department` is always derived through [`Department::for_stage`] at
//! mutation time. All enums serialize as snake_case strings so the wire format
//! stays stable and casing is normalized at the boundary, never at read sites.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level stage an order item currently belongs to.
///
/// Normal flow: `sales → design → prepress → production → {outsource |
/// dispatch} → completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Sales,
    Design,
    Prepress,
    Production,
    Outsource,
    Dispatch,
    Completed,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Sales => "sales",
            Stage::Design => "design",
            Stage::Prepress => "prepress",
            Stage::Production => "production",
            Stage::Outsource => "outsource",
            Stage::Dispatch => "dispatch",
            Stage::Completed => "completed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Organizational owner of an item's current work.
///
/// Mirrors [`Stage`] in normal flow; `dispatch` and `completed` work is owned
/// by production staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Sales,
    Design,
    Prepress,
    Production,
    Outsource,
    Dispatch,
}

impl Department {
    /// Canonical stage → department mapping. The only place this relationship
    /// is written down.
    pub fn for_stage(stage: Stage) -> Department {
        match stage {
            Stage::Sales => Department::Sales,
            Stage::Design => Department::Design,
            Stage::Prepress => Department::Prepress,
            Stage::Production => Department::Production,
            Stage::Outsource => Department::Outsource,
            // Dispatch and completed items remain under the dispatch desk,
            // which production staffs (see notification fan-out).
            Stage::Dispatch | Stage::Completed => Department::Dispatch,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Sales => "sales",
            Department::Design => "design",
            Department::Prepress => "prepress",
            Department::Production => "production",
            Department::Outsource => "outsource",
            Department::Dispatch => "dispatch",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained item status within a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    NewOrder,
    DesignInProgress,
    PendingForCustomerApproval,
    PendingClientApproval,
    ApprovedByCustomer,
    RejectedByCustomer,
    PrepressInProgress,
    ProductionInProgress,
    ReadyForDispatch,
    PendingDispatch,
    Outsourced,
    Dispatched,
    Completed,
}

impl ItemStatus {
    /// Statuses in which the item sits with sales waiting on a customer
    /// decision. Approve/reject actions are only legal here.
    pub fn is_awaiting_approval(&self) -> bool {
        matches!(
            self,
            ItemStatus::PendingForCustomerApproval | ItemStatus::PendingClientApproval
        )
    }
}

/// Production sub-step. Each item carries its own ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Substage {
    Printing,
    Foiling,
    Pasting,
    Cutting,
    Binding,
    Packing,
}

impl Substage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Substage::Printing => "printing",
            Substage::Foiling => "foiling",
            Substage::Pasting => "pasting",
            Substage::Cutting => "cutting",
            Substage::Binding => "binding",
            Substage::Packing => "packing",
        }
    }
}

impl fmt::Display for Substage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one entry in an item's substage sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubstageStatus {
    Pending,
    InProgress,
    Completed,
}

/// Outsource sub-record stage. Strictly forward-only, with two permitted
/// backward edges (see the transition engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutsourceStage {
    Outsourced,
    VendorInProgress,
    VendorDispatched,
    ReceivedFromVendor,
    QualityCheck,
    DecisionPending,
}

impl OutsourceStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutsourceStage::Outsourced => "outsourced",
            OutsourceStage::VendorInProgress => "vendor_in_progress",
            OutsourceStage::VendorDispatched => "vendor_dispatched",
            OutsourceStage::ReceivedFromVendor => "received_from_vendor",
            OutsourceStage::QualityCheck => "quality_check",
            OutsourceStage::DecisionPending => "decision_pending",
        }
    }
}

impl fmt::Display for OutsourceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency tier derived from delivery-date proximity.
///
/// Ordered so that `High > Medium > Low` for escalation checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Compute priority from the delivery date, calendar days relative to `today`.
///
/// Time-of-day is irrelevant by construction (`NaiveDate` carries none).
/// No delivery date means lowest urgency. Must be re-evaluated on every read
/// since "today" advances; the stored value is never authoritative.
pub fn priority_for(delivery_date: Option<NaiveDate>, today: NaiveDate) -> Priority {
    let Some(date) = delivery_date else {
        return Priority::Low;
    };
    let days = (date - today).num_days();
    if days > 5 {
        Priority::Low
    } else if days >= 3 {
        Priority::Medium
    } else {
        Priority::High
    }
}

/// Where an order came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    Manual,
    Imported,
}

/// Order-level payment status (visible to admin/sales only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
    Refunded,
}

/// HR approval status for leave requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// User role. Admin and sales see every order; the remaining roles are scoped
/// to their department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Sales,
    Design,
    Prepress,
    Production,
    Dispatch,
}

impl Role {
    /// Department a role works in. Admin has none (sees everything).
    pub fn department(&self) -> Option<Department> {
        match self {
            Role::Admin => None,
            Role::Sales => Some(Department::Sales),
            Role::Design => Some(Department::Design),
            Role::Prepress => Some(Department::Prepress),
            Role::Production => Some(Department::Production),
            Role::Dispatch => Some(Department::Dispatch),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Sales => "sales",
            Role::Design => "design",
            Role::Prepress => "prepress",
            Role::Production => "production",
            Role::Dispatch => "dispatch",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn priority_low_beyond_five_days() {
        let today = d(2025, 6, 1);
        assert_eq!(priority_for(Some(d(2025, 6, 7)), today), Priority::Low);
        assert_eq!(priority_for(Some(d(2025, 7, 1)), today), Priority::Low);
    }

    #[test]
    fn priority_medium_between_three_and_five_days() {
        let today = d(2025, 6, 1);
        assert_eq!(priority_for(Some(d(2025, 6, 4)), today), Priority::Medium);
        assert_eq!(priority_for(Some(d(2025, 6, 5)), today), Priority::Medium);
        assert_eq!(priority_for(Some(d(2025, 6, 6)), today), Priority::Medium);
    }

    #[test]
    fn priority_high_under_three_days() {
        let today = d(2025, 6, 1);
        assert_eq!(priority_for(Some(d(2025, 6, 3)), today), Priority::High);
        assert_eq!(priority_for(Some(d(2025, 6, 1)), today), Priority::High);
        // Overdue stays high
        assert_eq!(priority_for(Some(d(2025, 5, 20)), today), Priority::High);
    }

    #[test]
    fn priority_without_delivery_date_is_low() {
        assert_eq!(priority_for(None, d(2025, 6, 1)), Priority::Low);
    }

    #[test]
    fn priority_ordering_supports_escalation_checks() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn stage_department_mapping_is_canonical() {
        assert_eq!(Department::for_stage(Stage::Sales), Department::Sales);
        assert_eq!(Department::for_stage(Stage::Design), Department::Design);
        assert_eq!(Department::for_stage(Stage::Prepress), Department::Prepress);
        assert_eq!(
            Department::for_stage(Stage::Production),
            Department::Production
        );
        assert_eq!(Department::for_stage(Stage::Outsource), Department::Outsource);
        assert_eq!(Department::for_stage(Stage::Dispatch), Department::Dispatch);
        assert_eq!(Department::for_stage(Stage::Completed), Department::Dispatch);
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&Stage::Prepress).unwrap(),
            "\"prepress\""
        );
        assert_eq!(
            serde_json::to_string(&ItemStatus::PendingForCustomerApproval).unwrap(),
            "\"pending_for_customer_approval\""
        );
        assert_eq!(
            serde_json::to_string(&OutsourceStage::VendorInProgress).unwrap(),
            "\"vendor_in_progress\""
        );
        let back: Stage = serde_json::from_str("\"design\"").unwrap();
        assert_eq!(back, Stage::Design);
    }
}
