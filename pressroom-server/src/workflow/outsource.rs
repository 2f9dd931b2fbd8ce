//! Outsource sub-machine
//!
//! An outsourced item carries an [`OutsourceRecord`] with its own stage
//! chain. The chain only moves forward except for two sanctioned backward
//! edges: an explicit revert to `outsourced` from `vendor_in_progress`, and
//! a QC failure sending `quality_check` back to `vendor_in_progress`.

use crate::db::models::{FollowUpNote, OrderItem, OutsourceRecord};
use crate::utils::AppError;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::util::now_millis;
use shared::workflow::{Department, ItemStatus, OutsourceStage, Stage};

/// Legal stage edges. Everything else is rejected.
const ALLOWED_EDGES: &[(OutsourceStage, OutsourceStage)] = &[
    (OutsourceStage::Outsourced, OutsourceStage::VendorInProgress),
    (OutsourceStage::VendorInProgress, OutsourceStage::VendorDispatched),
    (OutsourceStage::VendorDispatched, OutsourceStage::ReceivedFromVendor),
    (OutsourceStage::ReceivedFromVendor, OutsourceStage::QualityCheck),
    (OutsourceStage::QualityCheck, OutsourceStage::DecisionPending),
    // Explicit revert
    (OutsourceStage::VendorInProgress, OutsourceStage::Outsourced),
    // QC fail
    (OutsourceStage::QualityCheck, OutsourceStage::VendorInProgress),
];

/// Start-outsource payload. `vendor_id` is set when the vendor was picked
/// from the stored list; a free-typed vendor may opt into being persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct OutsourceStart {
    #[serde(default)]
    pub vendor_id: Option<String>,
    pub vendor_name: String,
    pub vendor_phone: String,
    pub work_type: String,
    pub quantity_sent: i64,
    pub expected_return_date: NaiveDate,
    /// Save the free-typed vendor for future jobs
    #[serde(default)]
    pub save_vendor: bool,
    pub note: String,
}

/// Validate the payload and move the item into the outsource stage.
/// Production only; design never outsources.
pub fn start(item: &mut OrderItem, req: &OutsourceStart) -> Result<&'static str, AppError> {
    if req.note.trim().is_empty() {
        return Err(AppError::validation("A note is required on every transition"));
    }
    if item.current_stage != Stage::Production {
        return Err(AppError::invalid_transition(
            "Only production items can be outsourced",
        ));
    }
    if item.outsource.is_some() {
        return Err(AppError::invalid_transition(
            "Item already has an active outsource job",
        ));
    }
    if req.vendor_name.trim().is_empty() {
        return Err(AppError::validation("Vendor name is required"));
    }
    if req.vendor_phone.trim().is_empty() {
        return Err(AppError::validation("Vendor phone is required"));
    }
    if req.work_type.trim().is_empty() {
        return Err(AppError::validation("Work type is required"));
    }
    if req.quantity_sent <= 0 {
        return Err(AppError::validation("Quantity sent must be positive"));
    }

    item.outsource = Some(OutsourceRecord {
        vendor_id: req.vendor_id.clone(),
        vendor_name: req.vendor_name.trim().to_string(),
        vendor_phone: req.vendor_phone.trim().to_string(),
        work_type: req.work_type.trim().to_string(),
        quantity_sent: req.quantity_sent,
        expected_return_date: req.expected_return_date,
        stage: OutsourceStage::Outsourced,
        follow_ups: Vec::new(),
    });
    item.current_stage = Stage::Outsource;
    item.assigned_department = Department::Outsource;
    item.status = ItemStatus::Outsourced;

    Ok("outsourced")
}

/// Advance (or revert along a sanctioned edge) the outsource stage.
/// Reaching `decision_pending` hands the item to sales for the dispatch
/// decision; reverting to `outsourced` keeps it with the outsource desk.
pub fn advance(
    item: &mut OrderItem,
    to: OutsourceStage,
    note: &str,
) -> Result<&'static str, AppError> {
    if note.trim().is_empty() {
        return Err(AppError::validation("A note is required on every transition"));
    }
    let record = item
        .outsource
        .as_mut()
        .ok_or_else(|| AppError::invalid_transition("Item has no outsource job"))?;

    let from = record.stage;
    if !ALLOWED_EDGES.contains(&(from, to)) {
        return Err(AppError::invalid_transition(format!(
            "Outsource stage cannot move from {} to {}",
            from, to
        )));
    }
    record.stage = to;

    Ok(match (from, to) {
        (OutsourceStage::VendorInProgress, OutsourceStage::Outsourced) => "outsource_reverted",
        (OutsourceStage::QualityCheck, OutsourceStage::VendorInProgress) => "outsource_qc_failed",
        _ => "outsource_advanced",
    })
}

/// Append a follow-up note to the outsource record
pub fn add_follow_up(
    item: &mut OrderItem,
    note: &str,
    by_id: &str,
    by_name: &str,
) -> Result<(), AppError> {
    if note.trim().is_empty() {
        return Err(AppError::validation("Follow-up note cannot be empty"));
    }
    let record = item
        .outsource
        .as_mut()
        .ok_or_else(|| AppError::invalid_transition("Item has no outsource job"))?;
    record.follow_ups.push(FollowUpNote {
        note: note.trim().to_string(),
        by_id: by_id.to_string(),
        by_name: by_name.to_string(),
        at: now_millis(),
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn production_item() -> OrderItem {
        OrderItem {
            id: None,
            order_id: "order_record:o1".parse().unwrap(),
            product_name: "Foil boxes".to_string(),
            quantity: 1000,
            specifications: BTreeMap::from([("finish".to_string(), "gold foil".to_string())]),
            current_stage: Stage::Production,
            status: ItemStatus::ProductionInProgress,
            assigned_department: Department::Production,
            assigned_to: None,
            previous_department: None,
            previous_assigned_to: None,
            need_design: false,
            substage_sequence: Vec::new(),
            current_substage: None,
            outsource: None,
            dispatch: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn start_req() -> OutsourceStart {
        OutsourceStart {
            vendor_id: None,
            vendor_name: "Shree Foils".to_string(),
            vendor_phone: "98765".to_string(),
            work_type: "foiling".to_string(),
            quantity_sent: 1000,
            expected_return_date: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            save_vendor: false,
            note: "sent for foiling".to_string(),
        }
    }

    #[test]
    fn start_moves_item_into_outsource() {
        let mut it = production_item();
        start(&mut it, &start_req()).unwrap();
        assert_eq!(it.current_stage, Stage::Outsource);
        assert_eq!(it.status, ItemStatus::Outsourced);
        let record = it.outsource.as_ref().unwrap();
        assert_eq!(record.stage, OutsourceStage::Outsourced);
    }

    #[test]
    fn start_validates_vendor_fields() {
        let mut it = production_item();
        let mut req = start_req();
        req.vendor_phone = " ".to_string();
        assert!(matches!(start(&mut it, &req), Err(AppError::Validation(_))));

        let mut req = start_req();
        req.quantity_sent = 0;
        assert!(matches!(start(&mut it, &req), Err(AppError::Validation(_))));
        assert!(it.outsource.is_none());
    }

    #[test]
    fn start_refuses_non_production_items() {
        let mut it = production_item();
        it.current_stage = Stage::Design;
        assert!(matches!(
            start(&mut it, &start_req()),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn forward_chain_advances() {
        let mut it = production_item();
        start(&mut it, &start_req()).unwrap();
        for to in [
            OutsourceStage::VendorInProgress,
            OutsourceStage::VendorDispatched,
            OutsourceStage::ReceivedFromVendor,
            OutsourceStage::QualityCheck,
            OutsourceStage::DecisionPending,
        ] {
            advance(&mut it, to, "next").unwrap();
            assert_eq!(it.outsource.as_ref().unwrap().stage, to);
        }
    }

    #[test]
    fn only_sanctioned_backward_edges_exist() {
        let mut it = production_item();
        start(&mut it, &start_req()).unwrap();
        advance(&mut it, OutsourceStage::VendorInProgress, "n").unwrap();

        // Explicit revert
        let action = advance(&mut it, OutsourceStage::Outsourced, "wrong vendor").unwrap();
        assert_eq!(action, "outsource_reverted");

        advance(&mut it, OutsourceStage::VendorInProgress, "n").unwrap();
        advance(&mut it, OutsourceStage::VendorDispatched, "n").unwrap();

        // No skipping back to the start from here
        assert!(matches!(
            advance(&mut it, OutsourceStage::Outsourced, "n"),
            Err(AppError::InvalidTransition(_))
        ));

        advance(&mut it, OutsourceStage::ReceivedFromVendor, "n").unwrap();
        advance(&mut it, OutsourceStage::QualityCheck, "n").unwrap();

        // QC fail
        let action = advance(&mut it, OutsourceStage::VendorInProgress, "rework").unwrap();
        assert_eq!(action, "outsource_qc_failed");
    }

    #[test]
    fn no_stage_skipping_forward() {
        let mut it = production_item();
        start(&mut it, &start_req()).unwrap();
        assert!(matches!(
            advance(&mut it, OutsourceStage::QualityCheck, "skip"),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn follow_ups_append() {
        let mut it = production_item();
        start(&mut it, &start_req()).unwrap();
        add_follow_up(&mut it, "called vendor, on track", "profile:p1", "Priya").unwrap();
        add_follow_up(&mut it, "delayed by a day", "profile:p1", "Priya").unwrap();
        assert_eq!(it.outsource.as_ref().unwrap().follow_ups.len(), 2);
    }
}
