//! Dispatch flow
//!
//! Two operations on a dispatch-ready item:
//!
//! - **decision** (sales): pickup or courier. Courier routes the item back
//!   to production with a pending-dispatch status so the floor packs it;
//!   pickup parks it with the dispatch desk.
//! - **finalize** (dispatch): records courier, tracking number and date,
//!   marks the item dispatched. When every item of the order is dispatched
//!   the caller marks the order completed.

use crate::db::models::{DispatchDecision, DispatchRecord, OrderItem};
use crate::utils::AppError;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::workflow::{Department, ItemStatus, Stage};

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    pub decision: DispatchDecision,
    /// Courier name; required when the decision is courier
    #[serde(default)]
    pub courier: Option<String>,
    pub note: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinalizeRequest {
    pub courier: String,
    pub tracking_number: String,
    pub dispatch_date: NaiveDate,
    #[serde(default)]
    pub is_express: bool,
    pub note: String,
}

/// Record the dispatch decision for a ready item
pub fn decide(item: &mut OrderItem, req: &DecisionRequest) -> Result<&'static str, AppError> {
    if req.note.trim().is_empty() {
        return Err(AppError::validation("A note is required on every transition"));
    }
    if item.status != ItemStatus::ReadyForDispatch
        && item.status != ItemStatus::PendingDispatch
        && !matches!(item.outsource.as_ref().map(|o| o.stage), Some(s) if s == shared::workflow::OutsourceStage::DecisionPending)
    {
        return Err(AppError::invalid_transition(format!(
            "Item is not ready for a dispatch decision (status {:?})",
            item.status
        )));
    }

    let courier = match &req.decision {
        DispatchDecision::Pickup => None,
        DispatchDecision::Courier { .. } => {
            let name = req.courier.as_deref().map(str::trim).unwrap_or("");
            if name.is_empty() {
                return Err(AppError::validation(
                    "Courier dispatch requires a courier name",
                ));
            }
            Some(name.to_string())
        }
    };

    let record = item.dispatch.get_or_insert_with(DispatchRecord::default);
    record.decision = Some(req.decision.clone());
    record.courier = courier;

    item.status = ItemStatus::PendingDispatch;
    match req.decision {
        // Courier jobs go back to the production floor for packing
        DispatchDecision::Courier { .. } => {
            item.current_stage = Stage::Production;
            item.assigned_department = Department::Production;
        }
        DispatchDecision::Pickup => {
            item.current_stage = Stage::Dispatch;
            item.assigned_department = Department::Dispatch;
        }
    }

    Ok("dispatch_decided")
}

/// Finalize dispatch. All three details are required together.
pub fn finalize(item: &mut OrderItem, req: &FinalizeRequest) -> Result<&'static str, AppError> {
    if req.note.trim().is_empty() {
        return Err(AppError::validation("A note is required on every transition"));
    }
    if item.status != ItemStatus::ReadyForDispatch && item.status != ItemStatus::PendingDispatch {
        return Err(AppError::invalid_transition(format!(
            "Item is not awaiting dispatch (status {:?})",
            item.status
        )));
    }
    if req.courier.trim().is_empty() {
        return Err(AppError::validation("Courier is required to dispatch"));
    }
    if req.tracking_number.trim().is_empty() {
        return Err(AppError::validation("Tracking number is required to dispatch"));
    }

    let record = item.dispatch.get_or_insert_with(DispatchRecord::default);
    record.courier = Some(req.courier.trim().to_string());
    record.tracking_number = Some(req.tracking_number.trim().to_string());
    record.dispatch_date = Some(req.dispatch_date);
    record.is_express = req.is_express;

    item.current_stage = Stage::Dispatch;
    item.assigned_department = Department::Dispatch;
    item.status = ItemStatus::Dispatched;

    Ok("dispatched")
}

/// Whether the order is fully dispatched and can be marked completed
pub fn all_dispatched(items: &[OrderItem]) -> bool {
    !items.is_empty() && items.iter().all(|i| i.status == ItemStatus::Dispatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn ready_item() -> OrderItem {
        OrderItem {
            id: None,
            order_id: "order_record:o1".parse().unwrap(),
            product_name: "Letterheads".to_string(),
            quantity: 500,
            specifications: BTreeMap::from([("paper".to_string(), "100gsm".to_string())]),
            current_stage: Stage::Production,
            status: ItemStatus::ReadyForDispatch,
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

    #[test]
    fn pickup_is_always_valid() {
        let mut it = ready_item();
        let req = DecisionRequest {
            decision: DispatchDecision::Pickup,
            courier: None,
            note: "customer collects".to_string(),
        };
        decide(&mut it, &req).unwrap();
        assert_eq!(it.status, ItemStatus::PendingDispatch);
        assert_eq!(it.current_stage, Stage::Dispatch);
    }

    #[test]
    fn courier_requires_a_name_and_routes_to_production() {
        let mut it = ready_item();
        let decision = DispatchDecision::Courier {
            address: "14 MG Road".to_string(),
            instructions: None,
        };
        let req = DecisionRequest {
            decision: decision.clone(),
            courier: None,
            note: "ship it".to_string(),
        };
        assert!(matches!(decide(&mut it, &req), Err(AppError::Validation(_))));

        let req = DecisionRequest {
            decision,
            courier: Some("BlueDart".to_string()),
            note: "ship it".to_string(),
        };
        decide(&mut it, &req).unwrap();
        assert_eq!(it.status, ItemStatus::PendingDispatch);
        assert_eq!(it.current_stage, Stage::Production);
        assert_eq!(
            it.dispatch.as_ref().unwrap().courier.as_deref(),
            Some("BlueDart")
        );
    }

    #[test]
    fn finalize_requires_all_details() {
        let mut it = ready_item();
        let mut req = FinalizeRequest {
            courier: "BlueDart".to_string(),
            tracking_number: "".to_string(),
            dispatch_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            is_express: false,
            note: "out for delivery".to_string(),
        };
        assert!(matches!(finalize(&mut it, &req), Err(AppError::Validation(_))));
        assert_eq!(it.status, ItemStatus::ReadyForDispatch);

        req.tracking_number = "BD123".to_string();
        finalize(&mut it, &req).unwrap();
        assert_eq!(it.status, ItemStatus::Dispatched);
        assert_eq!(it.current_stage, Stage::Dispatch);
        let record = it.dispatch.as_ref().unwrap();
        assert_eq!(record.tracking_number.as_deref(), Some("BD123"));
        assert!(record.dispatch_date.is_some());
    }

    #[test]
    fn finalize_rejects_items_not_awaiting_dispatch() {
        let mut it = ready_item();
        it.status = ItemStatus::DesignInProgress;
        let req = FinalizeRequest {
            courier: "BlueDart".to_string(),
            tracking_number: "BD1".to_string(),
            dispatch_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            is_express: false,
            note: "n".to_string(),
        };
        assert!(matches!(
            finalize(&mut it, &req),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn order_completes_when_every_item_is_dispatched() {
        let mut a = ready_item();
        let mut b = ready_item();
        assert!(!all_dispatched(&[a.clone(), b.clone()]));
        a.status = ItemStatus::Dispatched;
        assert!(!all_dispatched(&[a.clone(), b.clone()]));
        b.status = ItemStatus::Dispatched;
        assert!(all_dispatched(&[a, b]));
        assert!(!all_dispatched(&[]));
    }
}
