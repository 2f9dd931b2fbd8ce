//! Role-based order visibility
//!
//! Pure filters applied after the order cache. Admin and sales see every
//! order; department roles see an order when at least one of its items sits
//! with their department; production viewers with a specialty are further
//! narrowed to items whose current substage matches it. `assigned_to` never
//! narrows visibility, it only drives the "my queue" view.

use crate::auth::CurrentUser;
use crate::db::models::OrderItem;
use shared::workflow::{Department, Role};

/// Department whose staff handle an item held by `dept`. No role maps to the
/// outsource department; the production floor chases vendor work.
fn holding_department(dept: Department) -> Department {
    match dept {
        Department::Outsource => Department::Production,
        d => d,
    }
}

/// Whether one item falls inside the viewer's slice of the workflow
pub fn item_visible(item: &OrderItem, viewer: &CurrentUser) -> bool {
    let dept = match viewer.role.department() {
        // Admin
        None => return true,
        Some(d) => d,
    };
    if viewer.role == Role::Sales {
        return true;
    }

    // assigned_department can lag current_stage for imported rows; either
    // matching counts.
    let in_department = holding_department(item.assigned_department) == dept
        || holding_department(Department::for_stage(item.current_stage)) == dept;
    if !in_department {
        return false;
    }

    if viewer.role == Role::Production {
        if let Some(specialty) = viewer.specialty {
            return item.current_substage == Some(specialty);
        }
    }
    true
}

/// Whether an order shows up in the viewer's list at all
pub fn order_visible(items: &[OrderItem], viewer: &CurrentUser) -> bool {
    if viewer.is_admin() || viewer.role == Role::Sales {
        return true;
    }
    items.iter().any(|item| item_visible(item, viewer))
}

/// Whether the item sits in the viewer's personal queue
pub fn assigned_to_viewer(item: &OrderItem, viewer: &CurrentUser) -> bool {
    item.assigned_to.as_deref() == Some(viewer.id.as_str())
}

/// Whether the viewer may see order financials (totals, payment status)
pub fn sees_financials(viewer: &CurrentUser) -> bool {
    viewer.is_admin() || viewer.role == Role::Sales
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::workflow::{ItemStatus, Stage, Substage};
    use std::collections::BTreeMap;

    fn viewer(role: Role, specialty: Option<Substage>) -> CurrentUser {
        CurrentUser {
            id: "profile:v1".to_string(),
            username: "viewer".to_string(),
            display_name: "Viewer".to_string(),
            role,
            specialty,
        }
    }

    fn item(stage: Stage, dept: Department) -> OrderItem {
        OrderItem {
            id: None,
            order_id: "order_record:o1".parse().unwrap(),
            product_name: "Stickers".to_string(),
            quantity: 100,
            specifications: BTreeMap::new(),
            current_stage: stage,
            status: ItemStatus::DesignInProgress,
            assigned_department: dept,
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
    fn admin_and_sales_see_everything() {
        let it = item(Stage::Prepress, Department::Prepress);
        assert!(order_visible(&[it.clone()], &viewer(Role::Admin, None)));
        assert!(order_visible(&[it], &viewer(Role::Sales, None)));
        assert!(order_visible(&[], &viewer(Role::Sales, None)));
    }

    #[test]
    fn department_match_on_assigned_department() {
        let it = item(Stage::Design, Department::Design);
        assert!(order_visible(&[it.clone()], &viewer(Role::Design, None)));
        assert!(!order_visible(&[it], &viewer(Role::Prepress, None)));
    }

    #[test]
    fn stage_fallback_covers_divergent_rows() {
        // Imported row whose department never got rewritten
        let mut it = item(Stage::Prepress, Department::Sales);
        it.status = ItemStatus::PrepressInProgress;
        assert!(item_visible(&it, &viewer(Role::Prepress, None)));
    }

    #[test]
    fn outsourced_items_stay_with_production_viewers() {
        let mut it = item(Stage::Outsource, Department::Outsource);
        it.status = ItemStatus::Outsourced;
        assert!(item_visible(&it, &viewer(Role::Production, None)));
        assert!(!item_visible(&it, &viewer(Role::Design, None)));
        assert!(order_visible(&[it], &viewer(Role::Production, None)));
    }

    #[test]
    fn one_matching_item_reveals_the_order() {
        let design = item(Stage::Design, Department::Design);
        let production = item(Stage::Production, Department::Production);
        assert!(order_visible(
            &[design, production],
            &viewer(Role::Production, None)
        ));
    }

    #[test]
    fn specialty_narrows_production_viewers() {
        let mut it = item(Stage::Production, Department::Production);
        it.current_substage = Some(Substage::Foiling);

        assert!(item_visible(&it, &viewer(Role::Production, None)));
        assert!(item_visible(
            &it,
            &viewer(Role::Production, Some(Substage::Foiling))
        ));
        assert!(!item_visible(
            &it,
            &viewer(Role::Production, Some(Substage::Cutting))
        ));

        // No current substage yet: specialists see nothing of it
        it.current_substage = None;
        assert!(!item_visible(
            &it,
            &viewer(Role::Production, Some(Substage::Foiling))
        ));
    }

    #[test]
    fn assignment_never_narrows_visibility() {
        let mut it = item(Stage::Design, Department::Design);
        it.assigned_to = Some("profile:someone_else".to_string());
        let v = viewer(Role::Design, None);
        assert!(item_visible(&it, &v));
        assert!(!assigned_to_viewer(&it, &v));
    }

    #[test]
    fn financial_redaction_is_role_based() {
        assert!(sees_financials(&viewer(Role::Admin, None)));
        assert!(sees_financials(&viewer(Role::Sales, None)));
        assert!(!sees_financials(&viewer(Role::Production, None)));
    }
}
