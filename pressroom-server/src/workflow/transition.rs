//! Item transition engine
//!
//! The single place workflow moves are validated and applied. Handlers build
//! a [`MoveRequest`] (or call [`apply_approval`] / [`complete_substage`]) and
//! persist the mutated item afterwards; the engine itself never touches the
//! database.

use crate::db::models::OrderItem;
use crate::utils::AppError;
use serde::Deserialize;
use shared::workflow::{Department, ItemStatus, Stage, SubstageStatus};

/// Inverse of `Department::for_stage` for routing approvals back. Dispatch
/// owns both the dispatch and completed stages; routing targets dispatch.
fn stage_for(department: Department) -> Stage {
    match department {
        Department::Sales => Stage::Sales,
        Department::Design => Stage::Design,
        Department::Prepress => Stage::Prepress,
        Department::Production => Stage::Production,
        Department::Outsource => Stage::Outsource,
        Department::Dispatch => Stage::Dispatch,
    }
}

/// Default (stage, status) → (stage, status) when the caller names no
/// destination. Pairs outside this table require an explicit destination.
fn default_next(stage: Stage, status: ItemStatus) -> Option<(Stage, ItemStatus)> {
    match (stage, status) {
        (Stage::Sales, ItemStatus::NewOrder) => Some((Stage::Design, ItemStatus::DesignInProgress)),
        (Stage::Design, ItemStatus::DesignInProgress) => {
            Some((Stage::Prepress, ItemStatus::PrepressInProgress))
        }
        (Stage::Prepress, ItemStatus::PrepressInProgress) => {
            Some((Stage::Production, ItemStatus::ProductionInProgress))
        }
        (Stage::Production, ItemStatus::ProductionInProgress) => {
            Some((Stage::Production, ItemStatus::ReadyForDispatch))
        }
        (Stage::Production, ItemStatus::ReadyForDispatch) => {
            Some((Stage::Dispatch, ItemStatus::Dispatched))
        }
        _ => None,
    }
}

/// Default status an item takes on entering a stage through a generic move
fn entry_status(stage: Stage) -> ItemStatus {
    match stage {
        Stage::Sales => ItemStatus::PendingForCustomerApproval,
        Stage::Design => ItemStatus::DesignInProgress,
        Stage::Prepress => ItemStatus::PrepressInProgress,
        Stage::Production => ItemStatus::ProductionInProgress,
        Stage::Outsource => ItemStatus::Outsourced,
        Stage::Dispatch => ItemStatus::PendingDispatch,
        Stage::Completed => ItemStatus::Completed,
    }
}

/// A generic "process" move
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveRequest {
    /// Destination stage; None uses the default table
    pub to_stage: Option<Stage>,
    /// Status override; None uses the destination's entry status
    pub to_status: Option<ItemStatus>,
    /// Assignee at the destination; None lands in the unassigned pool
    pub assigned_to: Option<String>,
    /// Mandatory transition note
    pub note: String,
}

/// Validate and apply a generic move. Returns the timeline action name.
pub fn apply_move(item: &mut OrderItem, req: &MoveRequest) -> Result<&'static str, AppError> {
    require_note(&req.note)?;

    let current_dept = Department::for_stage(item.current_stage);

    let (to_stage, to_status) = match req.to_stage {
        Some(stage) => (stage, req.to_status.unwrap_or_else(|| entry_status(stage))),
        None => default_next(item.current_stage, item.status).ok_or_else(|| {
            AppError::invalid_transition(format!(
                "No default destination from {}/{:?}; a destination is required",
                item.current_stage, item.status
            ))
        })?,
    };
    let to_dept = Department::for_stage(to_stage);

    // Outsource and dispatch finalization have dedicated flows with their own
    // required fields; the generic path never performs them.
    if to_stage == Stage::Outsource {
        return Err(AppError::invalid_transition(
            "Moving to outsource requires the outsource flow",
        ));
    }
    if to_status == ItemStatus::Dispatched {
        return Err(AppError::invalid_transition(
            "Dispatching requires the dispatch finalize flow",
        ));
    }
    // Completion is derived from every item being dispatched, never picked
    // as a destination.
    if to_stage == Stage::Completed {
        return Err(AppError::invalid_transition(
            "Items complete through dispatch, not a direct move",
        ));
    }

    // An explicitly picked destination must leave the current department;
    // default-table advances may stay (status-only moves).
    if req.to_stage.is_some() && to_dept == current_dept {
        return Err(AppError::invalid_transition(format!(
            "Item is already with {}",
            current_dept
        )));
    }

    // Breadcrumb for approval routing, captured on the way to sales
    let action = if to_dept == Department::Sales && current_dept != Department::Sales {
        item.previous_department = Some(current_dept);
        item.previous_assigned_to = item.assigned_to.clone();
        "sent_for_approval"
    } else {
        "moved"
    };

    item.current_stage = to_stage;
    item.assigned_department = to_dept;
    item.assigned_to = req.assigned_to.clone();
    item.status = to_status;

    // Entering production starts the substage sequence where it left off
    if to_stage == Stage::Production && item.current_substage.is_none() {
        if let Some(next) = item
            .substage_sequence
            .iter_mut()
            .find(|p| p.status != SubstageStatus::Completed)
        {
            next.status = SubstageStatus::InProgress;
            item.current_substage = Some(next.substage);
        }
    }

    Ok(action)
}

/// Approve or reject an item that is with sales awaiting a customer decision.
/// Routes back to the department that sent it, or infers the target from
/// `need_design` when no breadcrumb exists, and unassigns in that case.
pub fn apply_approval(
    item: &mut OrderItem,
    approve: bool,
    note: &str,
) -> Result<&'static str, AppError> {
    require_note(note)?;

    if !item.status.is_awaiting_approval() {
        return Err(AppError::invalid_transition(format!(
            "Item is not awaiting approval (status {:?})",
            item.status
        )));
    }

    match item.previous_department.take() {
        Some(dept) => {
            item.current_stage = stage_for(dept);
            item.assigned_department = dept;
            item.assigned_to = item.previous_assigned_to.take();
        }
        None => {
            let dept = if item.need_design {
                Department::Design
            } else {
                Department::Prepress
            };
            item.current_stage = stage_for(dept);
            item.assigned_department = dept;
            item.assigned_to = None;
            item.previous_assigned_to = None;
        }
    }

    item.status = if approve {
        ItemStatus::ApprovedByCustomer
    } else {
        ItemStatus::RejectedByCustomer
    };

    Ok(if approve { "approved" } else { "rejected" })
}

/// Complete the item's current production substage. The terminal substage
/// advances the whole item to ready-for-dispatch; a non-terminal one moves
/// `current_substage` to the next entry in the sequence.
pub fn complete_substage(item: &mut OrderItem, note: &str) -> Result<&'static str, AppError> {
    require_note(note)?;

    if item.current_stage != Stage::Production {
        return Err(AppError::invalid_transition(
            "Substages only apply to items in production",
        ));
    }
    if item.substage_sequence.is_empty() {
        return Err(AppError::invalid_transition(
            "Item has no substage sequence",
        ));
    }

    let index = item
        .substage_sequence
        .iter()
        .position(|p| p.status != SubstageStatus::Completed)
        .ok_or_else(|| AppError::invalid_transition("All substages already completed"))?;

    item.substage_sequence[index].status = SubstageStatus::Completed;

    match item.substage_sequence.get_mut(index + 1) {
        Some(next) => {
            next.status = SubstageStatus::InProgress;
            item.current_substage = Some(next.substage);
        }
        None => {
            item.current_substage = None;
            item.status = ItemStatus::ReadyForDispatch;
        }
    }

    Ok("substage_completed")
}

fn require_note(note: &str) -> Result<(), AppError> {
    if note.trim().is_empty() {
        return Err(AppError::validation("A note is required on every transition"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::SubstagePlan;
    use shared::util::now_millis;
    use shared::workflow::Substage;
    use std::collections::BTreeMap;

    fn item(stage: Stage, status: ItemStatus) -> OrderItem {
        OrderItem {
            id: None,
            order_id: "order_record:o1".parse().unwrap(),
            product_name: "Wedding cards".to_string(),
            quantity: 200,
            specifications: BTreeMap::from([("paper".to_string(), "300gsm".to_string())]),
            current_stage: stage,
            status,
            assigned_department: Department::for_stage(stage),
            assigned_to: None,
            previous_department: None,
            previous_assigned_to: None,
            need_design: false,
            substage_sequence: Vec::new(),
            current_substage: None,
            outsource: None,
            dispatch: None,
            created_at: now_millis(),
            updated_at: now_millis(),
        }
    }

    fn plan(substages: &[Substage]) -> Vec<SubstagePlan> {
        substages
            .iter()
            .map(|s| SubstagePlan {
                substage: *s,
                status: SubstageStatus::Pending,
            })
            .collect()
    }

    #[test]
    fn default_chain_walks_the_happy_path() {
        let mut it = item(Stage::Sales, ItemStatus::NewOrder);
        let req = MoveRequest {
            note: "to design".to_string(),
            ..Default::default()
        };
        apply_move(&mut it, &req).unwrap();
        assert_eq!(it.current_stage, Stage::Design);
        assert_eq!(it.status, ItemStatus::DesignInProgress);
        assert_eq!(it.assigned_department, Department::Design);

        let req = MoveRequest {
            note: "to prepress".to_string(),
            ..Default::default()
        };
        apply_move(&mut it, &req).unwrap();
        assert_eq!(it.current_stage, Stage::Prepress);
        assert_eq!(it.status, ItemStatus::PrepressInProgress);
    }

    #[test]
    fn production_default_is_a_status_advance() {
        let mut it = item(Stage::Production, ItemStatus::ProductionInProgress);
        let req = MoveRequest {
            note: "done printing".to_string(),
            ..Default::default()
        };
        apply_move(&mut it, &req).unwrap();
        assert_eq!(it.current_stage, Stage::Production);
        assert_eq!(it.status, ItemStatus::ReadyForDispatch);
    }

    #[test]
    fn empty_note_fails_closed() {
        let mut it = item(Stage::Sales, ItemStatus::NewOrder);
        let req = MoveRequest {
            note: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            apply_move(&mut it, &req),
            Err(AppError::Validation(_))
        ));
        assert_eq!(it.current_stage, Stage::Sales);
    }

    #[test]
    fn explicit_move_to_own_department_is_rejected() {
        let mut it = item(Stage::Design, ItemStatus::DesignInProgress);
        let req = MoveRequest {
            to_stage: Some(Stage::Design),
            note: "noop".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            apply_move(&mut it, &req),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn design_cannot_move_to_outsource() {
        let mut it = item(Stage::Design, ItemStatus::DesignInProgress);
        let req = MoveRequest {
            to_stage: Some(Stage::Outsource),
            note: "send out".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            apply_move(&mut it, &req),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn explicit_move_to_completed_is_rejected() {
        let mut it = item(Stage::Design, ItemStatus::DesignInProgress);
        let req = MoveRequest {
            to_stage: Some(Stage::Completed),
            note: "call it done".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            apply_move(&mut it, &req),
            Err(AppError::InvalidTransition(_))
        ));
        assert_eq!(it.current_stage, Stage::Design);
        assert_eq!(it.status, ItemStatus::DesignInProgress);
    }

    #[test]
    fn generic_path_never_dispatches() {
        let mut it = item(Stage::Production, ItemStatus::ReadyForDispatch);
        let req = MoveRequest {
            note: "ship it".to_string(),
            ..Default::default()
        };
        // Default destination is dispatched, which the generic path refuses
        assert!(matches!(
            apply_move(&mut it, &req),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn sending_to_sales_records_the_breadcrumb() {
        let mut it = item(Stage::Design, ItemStatus::DesignInProgress);
        it.assigned_to = Some("profile:dee".to_string());
        let req = MoveRequest {
            to_stage: Some(Stage::Sales),
            note: "customer proof".to_string(),
            ..Default::default()
        };
        let action = apply_move(&mut it, &req).unwrap();
        assert_eq!(action, "sent_for_approval");
        assert_eq!(it.previous_department, Some(Department::Design));
        assert_eq!(it.previous_assigned_to, Some("profile:dee".to_string()));
        assert_eq!(it.status, ItemStatus::PendingForCustomerApproval);
    }

    #[test]
    fn approval_routes_back_through_the_breadcrumb() {
        let mut it = item(Stage::Sales, ItemStatus::PendingForCustomerApproval);
        it.previous_department = Some(Department::Design);
        it.previous_assigned_to = Some("profile:dee".to_string());

        apply_approval(&mut it, true, "customer loved it").unwrap();
        assert_eq!(it.current_stage, Stage::Design);
        assert_eq!(it.assigned_to, Some("profile:dee".to_string()));
        assert_eq!(it.status, ItemStatus::ApprovedByCustomer);
        assert!(it.previous_department.is_none());
    }

    #[test]
    fn approval_without_breadcrumb_infers_from_need_design() {
        let mut it = item(Stage::Sales, ItemStatus::PendingClientApproval);
        it.assigned_to = Some("profile:sal".to_string());
        it.need_design = true;
        apply_approval(&mut it, false, "redo the artwork").unwrap();
        assert_eq!(it.current_stage, Stage::Design);
        assert_eq!(it.assigned_to, None);
        assert_eq!(it.status, ItemStatus::RejectedByCustomer);

        let mut it = item(Stage::Sales, ItemStatus::PendingClientApproval);
        it.need_design = false;
        apply_approval(&mut it, true, "straight to plates").unwrap();
        assert_eq!(it.current_stage, Stage::Prepress);
        assert_eq!(it.assigned_to, None);
    }

    #[test]
    fn approval_requires_awaiting_status() {
        let mut it = item(Stage::Design, ItemStatus::DesignInProgress);
        assert!(matches!(
            apply_approval(&mut it, true, "ok"),
            Err(AppError::InvalidTransition(_))
        ));
    }

    #[test]
    fn terminal_substage_advances_to_ready_for_dispatch() {
        let mut it = item(Stage::Production, ItemStatus::ProductionInProgress);
        it.substage_sequence = plan(&[Substage::Printing, Substage::Packing]);
        it.current_substage = Some(Substage::Printing);

        complete_substage(&mut it, "printed").unwrap();
        assert_eq!(it.current_substage, Some(Substage::Packing));
        assert_eq!(it.status, ItemStatus::ProductionInProgress);

        complete_substage(&mut it, "packed").unwrap();
        assert_eq!(it.current_substage, None);
        assert_eq!(it.status, ItemStatus::ReadyForDispatch);
    }

    #[test]
    fn entering_production_starts_the_sequence() {
        let mut it = item(Stage::Prepress, ItemStatus::PrepressInProgress);
        it.substage_sequence = plan(&[Substage::Printing, Substage::Cutting]);
        let req = MoveRequest {
            note: "plates ready".to_string(),
            ..Default::default()
        };
        apply_move(&mut it, &req).unwrap();
        assert_eq!(it.current_stage, Stage::Production);
        assert_eq!(it.current_substage, Some(Substage::Printing));
        assert_eq!(it.substage_sequence[0].status, SubstageStatus::InProgress);
    }

    #[test]
    fn substage_outside_production_is_rejected() {
        let mut it = item(Stage::Design, ItemStatus::DesignInProgress);
        it.substage_sequence = plan(&[Substage::Printing]);
        assert!(matches!(
            complete_substage(&mut it, "n"),
            Err(AppError::InvalidTransition(_))
        ));
    }
}
