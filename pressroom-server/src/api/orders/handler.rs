//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use surrealdb::sql::Thing;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    DuplicateVerdict, Order, OrderCreate, OrderItem, OrderItemCreate, OrderUpdate, OrderView,
    SubstagePlan,
};
use crate::utils::{AppError, AppResult};
use crate::workflow::{duplicate, effects, notify, visibility};
use shared::util::now_millis;
use shared::workflow::{
    Department, ItemStatus, PaymentStatus, Stage, SubstageStatus, priority_for,
};

const RESOURCE: &str = "order";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub archived: bool,
    /// "me" restricts to orders with an item assigned to the viewer
    #[serde(default)]
    pub assigned: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    50
}

/// GET /api/orders - visible orders, most urgent first
pub async fn list(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderView>>> {
    let rows = state.order_rows(query.archived).await?;
    let today = chrono::Local::now().date_naive();
    let include_financials = visibility::sees_financials(&current_user);
    let only_mine = query.assigned.as_deref() == Some("me");

    let mut views: Vec<OrderView> = rows
        .iter()
        .filter(|(_, items)| visibility::order_visible(items, &current_user))
        .filter(|(_, items)| {
            !only_mine
                || items
                    .iter()
                    .any(|item| visibility::assigned_to_viewer(item, &current_user))
        })
        .map(|(order, items)| {
            let items = items
                .iter()
                .filter(|item| visibility::item_visible(item, &current_user))
                .cloned()
                .collect();
            OrderView::assemble(order.clone(), items, today, include_financials)
        })
        .collect();

    views.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| a.delivery_date.cmp(&b.delivery_date))
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let per_page = query.per_page.clamp(1, 200);
    let skip = query.page.saturating_sub(1) * per_page;
    let page: Vec<OrderView> = views.into_iter().skip(skip).take(per_page).collect();

    Ok(Json(page))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderView>> {
    let order = state
        .orders
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    let items = state.items.find_by_order(&id).await?;

    // Invisible orders 404 rather than 403: no probing for order numbers
    if !visibility::order_visible(&items, &current_user) {
        return Err(AppError::not_found(format!("Order {} not found", id)));
    }

    let items = items
        .into_iter()
        .filter(|item| visibility::item_visible(item, &current_user))
        .collect();
    let today = chrono::Local::now().date_naive();
    let view = OrderView::assemble(
        order,
        items,
        today,
        visibility::sees_financials(&current_user),
    );
    Ok(Json(view))
}

/// Build item rows for a new order. `lenient` relaxes the specification
/// requirement for imported rows, whose source data may omit specs.
pub(super) fn build_item_rows(
    order_id: &Thing,
    items: &[OrderItemCreate],
    lenient: bool,
) -> Result<Vec<OrderItem>, AppError> {
    if items.is_empty() {
        return Err(AppError::validation("An order needs at least one item"));
    }
    let now = now_millis();
    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if item.product_name.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Item {}: product name is required",
                index + 1
            )));
        }
        if item.quantity < 1 {
            return Err(AppError::validation(format!(
                "Item {}: quantity must be at least 1",
                index + 1
            )));
        }
        if !lenient && item.specifications.is_empty() {
            return Err(AppError::validation(format!(
                "Item {}: at least one specification is required",
                index + 1
            )));
        }
        rows.push(OrderItem {
            id: None,
            order_id: order_id.clone(),
            product_name: item.product_name.trim().to_string(),
            quantity: item.quantity,
            specifications: item.specifications.clone(),
            current_stage: Stage::Sales,
            status: ItemStatus::NewOrder,
            assigned_department: Department::Sales,
            assigned_to: None,
            previous_department: None,
            previous_assigned_to: None,
            need_design: item.need_design,
            substage_sequence: item
                .substage_sequence
                .iter()
                .map(|s| SubstagePlan {
                    substage: *s,
                    status: SubstageStatus::Pending,
                })
                .collect(),
            current_substage: None,
            outsource: None,
            dispatch: None,
            created_at: now,
            updated_at: now,
        });
    }
    Ok(rows)
}

/// POST /api/orders - manual intake
///
/// Validation runs over the whole payload before any row is written, so a
/// bad third item fails the entire intake.
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderView>> {
    let order_number = payload.order_number.trim().to_string();
    if order_number.is_empty() {
        return Err(AppError::validation("Order number is required"));
    }
    if payload.customer.name.trim().is_empty() {
        return Err(AppError::validation("Customer name is required"));
    }

    // Advisory check first for a readable message; the unique index is the
    // hard stop underneath.
    let verdict = duplicate::check(&state.orders, &order_number, None).await;
    if verdict.duplicate {
        return Err(AppError::conflict(
            verdict
                .reason
                .unwrap_or_else(|| "Order number already exists".to_string()),
        ));
    }

    // Validate items before the order row exists
    let probe = Thing::from(("order_record", "pending"));
    build_item_rows(&probe, &payload.items, false)?;

    let now = now_millis();
    let order = Order {
        id: None,
        order_number,
        external_ref: None,
        customer: payload.customer,
        notes: payload.notes,
        delivery_date: payload.delivery_date,
        is_completed: false,
        is_archived: false,
        source: payload.source,
        total: payload.total,
        payment_status: payload.payment_status.unwrap_or(PaymentStatus::Unpaid),
        created_at: now,
        updated_at: now,
    };
    let order = state.orders.create(order).await?;
    let order_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Created order has no id"))?;

    let mut items = Vec::with_capacity(payload.items.len());
    for row in build_item_rows(&order_id, &payload.items, false)? {
        items.push(state.items.create(row).await?);
    }

    let id_str = order_id.to_string();
    effects::record_timeline(
        &state,
        &order_id,
        None,
        Stage::Sales,
        "order_created",
        "Order created",
        Vec::new(),
        &current_user,
    )
    .await;
    effects::log_activity(
        &state,
        &current_user,
        "order.created",
        RESOURCE,
        &id_str,
        serde_json::json!({ "order_number": order.order_number, "items": items.len() }),
    )
    .await;
    state
        .broadcast_sync(RESOURCE, "created", &id_str, Some(&order))
        .await;
    announce_new_order(&state, &current_user, &order, &order_id).await;

    let today = chrono::Local::now().date_naive();
    Ok(Json(OrderView::assemble(
        order,
        items,
        today,
        visibility::sees_financials(&current_user),
    )))
}

/// PUT /api/orders/:id - customer info, notes, delivery date, financials
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let before = state
        .orders
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    let order = state.orders.update_info(&id, payload).await?;

    // A tighter delivery date can escalate priority; tell the floor
    let today = chrono::Local::now().date_naive();
    let old_priority = priority_for(before.delivery_date, today);
    let new_priority = priority_for(order.delivery_date, today);
    if notify::escalated(old_priority, new_priority) {
        escalate(&state, &current_user, &order, &id).await;
    }

    effects::log_activity(
        &state,
        &current_user,
        "order.updated",
        RESOURCE,
        &id,
        serde_json::json!({ "order_number": order.order_number }),
    )
    .await;
    state
        .broadcast_sync(RESOURCE, "updated", &id, Some(&order))
        .await;

    Ok(Json(order))
}

/// Notify admins plus the departments currently holding this order's items
async fn escalate(state: &ServerState, actor: &CurrentUser, order: &Order, order_id: &str) {
    let items = match state.items.find_by_order(order_id).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(target: "workflow", error = %e, "Escalation skipped");
            return;
        }
    };
    let profiles = match state.profiles.find_all().await {
        Ok(profiles) => profiles,
        Err(e) => {
            tracing::warn!(target: "workflow", error = %e, "Escalation skipped");
            return;
        }
    };
    let mut recipients: Vec<String> = Vec::new();
    let mut departments: Vec<Department> = Vec::new();
    for item in &items {
        if !departments.contains(&item.assigned_department) {
            departments.push(item.assigned_department);
        }
    }
    for dept in departments {
        for id in notify::escalation_audience(&profiles, dept, &actor.id) {
            if !recipients.contains(&id) {
                recipients.push(id);
            }
        }
    }
    effects::notify(
        state,
        &recipients,
        "Order escalated to high priority",
        &format!(
            "Order {} is now high priority (delivery {})",
            order.order_number,
            order
                .delivery_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unset".to_string())
        ),
        Some(order_id),
        None,
    )
    .await;
}

#[derive(Debug, Deserialize)]
pub struct ArchiveRequest {
    #[serde(default = "default_archived")]
    pub archived: bool,
}

fn default_archived() -> bool {
    true
}

/// POST /api/orders/:id/archive - archive or restore
pub async fn archive(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ArchiveRequest>,
) -> AppResult<Json<Order>> {
    let update = OrderUpdate {
        is_archived: Some(payload.archived),
        ..Default::default()
    };
    let order = state.orders.update_info(&id, update).await?;

    let action = if payload.archived { "archived" } else { "restored" };
    effects::log_activity(
        &state,
        &current_user,
        &format!("order.{}", action),
        RESOURCE,
        &id,
        serde_json::json!({ "order_number": order.order_number }),
    )
    .await;
    state
        .broadcast_sync(RESOURCE, action, &id, Some(&order))
        .await;

    Ok(Json(order))
}

/// DELETE /api/orders/:id - hard delete with cascade
pub async fn delete_order(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let order = state
        .orders
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    // Uploaded artifacts go with the order
    let files = state.files.find_by_order(&id).await.unwrap_or_default();
    let deleted = state.orders.delete_cascade(&id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Order {} not found", id)));
    }
    for file in &files {
        if let Err(e) = state.file_storage.delete(&file.path) {
            tracing::warn!(target: "files", error = %e, path = %file.path, "Orphaned upload");
        }
    }

    effects::log_activity(
        &state,
        &current_user,
        "order.deleted",
        RESOURCE,
        &id,
        serde_json::json!({ "order_number": order.order_number }),
    )
    .await;
    state
        .broadcast_sync::<()>(RESOURCE, "deleted", &id, None)
        .await;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[derive(Debug, Deserialize)]
pub struct DuplicateCheckRequest {
    pub order_number: String,
    #[serde(default)]
    pub external_ref: Option<String>,
}

/// POST /api/orders/check-duplicate - advisory, fails open
pub async fn check_duplicate(
    State(state): State<ServerState>,
    Json(payload): Json<DuplicateCheckRequest>,
) -> AppResult<Json<DuplicateVerdict>> {
    let verdict = duplicate::check(
        &state.orders,
        payload.order_number.trim(),
        payload.external_ref.as_deref(),
    )
    .await;
    Ok(Json(verdict))
}

/// Shared post-create side effects for intake and import
pub(super) async fn announce_new_order(
    state: &ServerState,
    current_user: &CurrentUser,
    order: &Order,
    order_id: &Thing,
) {
    let id_str = order_id.to_string();
    if let Ok(profiles) = state.profiles.find_all().await {
        let recipients = notify::transition_audience(&profiles, Stage::Sales, &current_user.id);
        effects::notify(
            state,
            &recipients,
            "New order",
            &format!("Order {} for {}", order.order_number, order.customer.name),
            Some(&id_str),
            None,
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn spec_item(name: &str, quantity: i64, specs: &[(&str, &str)]) -> OrderItemCreate {
        OrderItemCreate {
            product_name: name.to_string(),
            quantity,
            specifications: specs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            need_design: false,
            substage_sequence: Vec::new(),
        }
    }

    fn order_id() -> Thing {
        Thing::from(("order_record", "o1"))
    }

    #[test]
    fn intake_rows_start_in_sales() {
        let rows = build_item_rows(
            &order_id(),
            &[spec_item("  Letterheads ", 500, &[("paper", "100gsm")])],
            false,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_name, "Letterheads");
        assert_eq!(rows[0].current_stage, Stage::Sales);
        assert_eq!(rows[0].status, ItemStatus::NewOrder);
        assert_eq!(rows[0].assigned_department, Department::Sales);
    }

    #[test]
    fn missing_specifications_fail_the_whole_intake() {
        let items = [
            spec_item("Letterheads", 500, &[("paper", "100gsm")]),
            spec_item("Envelopes", 500, &[]),
        ];
        let err = build_item_rows(&order_id(), &items, false).unwrap_err();
        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("at least one specification"));
                assert!(msg.contains("Item 2"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn imported_rows_may_omit_specifications() {
        let rows =
            build_item_rows(&order_id(), &[spec_item("Envelopes", 500, &[])], true).unwrap();
        assert!(rows[0].specifications.is_empty());
    }

    #[test]
    fn zero_quantity_and_blank_name_are_rejected() {
        let err =
            build_item_rows(&order_id(), &[spec_item("Flyers", 0, &[("ink", "cmyk")])], false)
                .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err =
            build_item_rows(&order_id(), &[spec_item("   ", 10, &[("ink", "cmyk")])], false)
                .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn empty_item_list_is_rejected() {
        assert!(build_item_rows(&order_id(), &[], false).is_err());
        assert!(build_item_rows(&order_id(), &[], true).is_err());
    }
}
