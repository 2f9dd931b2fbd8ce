//! OrderItem Model
//!
//! The unit of workflow. Each item tracks its own stage, status, substage
//! sequence, assignment, and optional outsource/dispatch sub-records.
//!
//! `current_stage` is authoritative; `assigned_department` is written through
//! `Department::for_stage` on every transition. The pair can only diverge for
//! rows ingested from an import that carried a department without a stage,
//! which the visibility filter tolerates.

use super::serde_thing;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::workflow::{
    Department, ItemStatus, OutsourceStage, Stage, Substage, SubstageStatus,
};
use std::collections::BTreeMap;
use surrealdb::sql::Thing;

pub type OrderItemId = Thing;

/// One entry in an item's production substage sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstagePlan {
    pub substage: Substage,
    pub status: SubstageStatus,
}

/// Append-only follow-up note on an outsource record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowUpNote {
    pub note: String,
    pub by_id: String,
    pub by_name: String,
    pub at: i64,
}

/// Outsource sub-record: vendor snapshot + job tracking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutsourceRecord {
    /// Set when the vendor was picked from the stored list
    #[serde(default)]
    pub vendor_id: Option<String>,
    pub vendor_name: String,
    pub vendor_phone: String,
    pub work_type: String,
    pub quantity_sent: i64,
    pub expected_return_date: NaiveDate,
    pub stage: OutsourceStage,
    #[serde(default)]
    pub follow_ups: Vec<FollowUpNote>,
}

/// Sales' dispatch decision for an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DispatchDecision {
    Pickup,
    Courier {
        address: String,
        #[serde(default)]
        instructions: Option<String>,
    },
}

/// Dispatch sub-record: the decision plus finalization details
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchRecord {
    #[serde(default)]
    pub decision: Option<DispatchDecision>,
    #[serde(default)]
    pub courier: Option<String>,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub dispatch_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_express: bool,
}

/// OrderItem row matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<OrderItemId>,
    #[serde(with = "serde_thing")]
    pub order_id: Thing,
    pub product_name: String,
    pub quantity: i64,
    /// Key → value specification map; at least one entry required at creation
    pub specifications: BTreeMap<String, String>,
    pub current_stage: Stage,
    pub status: ItemStatus,
    pub assigned_department: Department,
    /// Profile record id ("profile:xyz") of the assignee, if any
    #[serde(default)]
    pub assigned_to: Option<String>,
    /// Breadcrumb captured when a non-sales department sends the item to
    /// sales for customer approval; approve/reject routes back here.
    #[serde(default)]
    pub previous_department: Option<Department>,
    #[serde(default)]
    pub previous_assigned_to: Option<String>,
    /// Whether this item needs design work; drives approval-return inference
    /// when no breadcrumb is recorded.
    #[serde(default)]
    pub need_design: bool,
    /// User-selected ordered production sub-steps
    #[serde(default)]
    pub substage_sequence: Vec<SubstagePlan>,
    #[serde(default)]
    pub current_substage: Option<Substage>,
    #[serde(default)]
    pub outsource: Option<OutsourceRecord>,
    #[serde(default)]
    pub dispatch: Option<DispatchRecord>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl OrderItem {
    /// Whether every substage in the sequence is completed
    pub fn substages_done(&self) -> bool {
        !self.substage_sequence.is_empty()
            && self
                .substage_sequence
                .iter()
                .all(|p| p.status == SubstageStatus::Completed)
    }
}

/// Item creation payload, embedded in `OrderCreate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub product_name: String,
    pub quantity: i64,
    pub specifications: BTreeMap<String, String>,
    #[serde(default)]
    pub need_design: bool,
    /// Production sub-steps in execution order; may be chosen later
    #[serde(default)]
    pub substage_sequence: Vec<Substage>,
}
