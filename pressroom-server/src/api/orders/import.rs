//! Storefront import handler
//!
//! Pulls one order from the WooCommerce bridge and creates it locally.
//! Concurrency-safe for the retype case: each request takes a ticket from
//! the pending registry and a superseded response is discarded instead of
//! landing after newer data.

use axum::{Json, extract::State};
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    CustomerSnapshot, ImportCacheRow, Order, OrderCreate, OrderItemCreate, OrderView,
};
use crate::import::{BridgeOrder, normalize_order_number};
use crate::utils::{AppError, AppResult};
use crate::workflow::{duplicate, effects, visibility};
use shared::util::now_millis;
use shared::workflow::{OrderSource, PaymentStatus, Stage};

use super::handler::{announce_new_order, build_item_rows};

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub order_number: String,
}

/// POST /api/orders/import
pub async fn import_order(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ImportRequest>,
) -> AppResult<Json<OrderView>> {
    let storefront = state
        .storefront
        .as_ref()
        .ok_or_else(|| AppError::StorefrontError("Storefront bridge not configured".to_string()))?;

    let number = normalize_order_number(&payload.order_number);
    if number.is_empty() {
        return Err(AppError::validation(format!(
            "'{}' contains no order number",
            payload.order_number
        )));
    }

    let verdict = duplicate::check(&state.orders, &number, None).await;
    if verdict.duplicate {
        return Err(AppError::conflict(verdict.reason.unwrap_or_else(|| {
            format!("Order {} already exists", number)
        })));
    }

    let ticket = state.pending_imports.begin(&number);
    let result = run_import(&state, &current_user, storefront, &number, ticket).await;
    state.pending_imports.finish(&number, ticket);
    result.map(Json)
}

async fn run_import(
    state: &ServerState,
    current_user: &CurrentUser,
    storefront: &crate::import::StorefrontClient,
    number: &str,
    ticket: u64,
) -> AppResult<OrderView> {
    let (bridge_order, raw) = storefront.fetch_order(number).await?;

    // A retyped number superseded this lookup while it was in flight
    if !state.pending_imports.is_current(number, ticket) {
        tracing::info!(target: "import", order_number = number, "Discarding superseded lookup");
        return Err(AppError::conflict(format!(
            "Lookup for {} superseded by a newer request",
            number
        )));
    }

    // The bridge must hand back the order that was asked for
    let returned = normalize_order_number(&bridge_order.order_number);
    if returned != number {
        return Err(AppError::OrderNumberMismatch(format!(
            "Asked the storefront for {} but it returned {}",
            number, returned
        )));
    }

    // Idempotent per external id: repeat imports refresh the cache row
    let cache_row = ImportCacheRow {
        id: None,
        external_ref: bridge_order.id.clone(),
        order_number: number.to_string(),
        payload: raw,
        fetched_at: now_millis(),
    };
    if let Err(e) = state.import_cache.upsert(cache_row).await {
        tracing::warn!(target: "import", error = %e, "Import cache upsert failed");
    }

    let verdict = duplicate::check(&state.orders, number, Some(&bridge_order.id)).await;
    if verdict.duplicate {
        return Err(AppError::conflict(verdict.reason.unwrap_or_else(|| {
            format!("Order {} already imported", number)
        })));
    }

    let create = to_order_create(number, &bridge_order);
    let now = now_millis();
    let order = Order {
        id: None,
        order_number: create.order_number.clone(),
        external_ref: create.external_ref.clone(),
        customer: create.customer.clone(),
        notes: create.notes.clone(),
        delivery_date: create.delivery_date,
        is_completed: false,
        is_archived: false,
        source: OrderSource::Imported,
        total: create.total,
        payment_status: PaymentStatus::Unpaid,
        created_at: now,
        updated_at: now,
    };
    let order = state.orders.create(order).await?;
    let order_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Created order has no id"))?;

    let mut items = Vec::with_capacity(create.items.len());
    for row in build_item_rows(&order_id, &create.items, true)? {
        items.push(state.items.create(row).await?);
    }

    let id_str = order_id.to_string();
    effects::record_timeline(
        state,
        &order_id,
        None,
        Stage::Sales,
        "order_imported",
        &format!("Imported from storefront ({})", bridge_order.id),
        Vec::new(),
        current_user,
    )
    .await;
    effects::log_activity(
        state,
        current_user,
        "order.imported",
        "order",
        &id_str,
        serde_json::json!({
            "order_number": order.order_number,
            "external_ref": bridge_order.id,
        }),
    )
    .await;
    state
        .broadcast_sync("order", "created", &id_str, Some(&order))
        .await;
    announce_new_order(state, current_user, &order, &order_id).await;

    let today = chrono::Local::now().date_naive();
    Ok(OrderView::assemble(
        order,
        items,
        today,
        visibility::sees_financials(current_user),
    ))
}

/// Map the bridge payload into the intake shape
fn to_order_create(number: &str, bridge: &BridgeOrder) -> OrderCreate {
    let items = bridge
        .items
        .iter()
        .map(|item| OrderItemCreate {
            product_name: item.product_name.clone(),
            quantity: item.quantity.max(1),
            specifications: if item.specifications.is_empty() {
                BTreeMap::new()
            } else {
                item.specifications.clone()
            },
            need_design: false,
            substage_sequence: Vec::new(),
        })
        .collect();

    OrderCreate {
        order_number: number.to_string(),
        external_ref: Some(bridge.id.clone()),
        customer: CustomerSnapshot {
            name: bridge.customer_name.clone(),
            phone: bridge.customer_phone.clone(),
            email: bridge.customer_email.clone(),
            address: bridge.customer_address.clone(),
        },
        notes: bridge.notes.clone(),
        delivery_date: bridge.delivery_date,
        source: OrderSource::Imported,
        total: bridge.total.unwrap_or_default(),
        payment_status: None,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::BridgeOrderItem;

    fn bridge_order() -> BridgeOrder {
        serde_json::from_value(serde_json::json!({
            "id": "wc-778",
            "order_number": "WC-1042",
            "customer_name": "Asha Traders",
            "items": [
                { "product_name": "Business cards", "quantity": 0 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn bridge_payload_maps_to_intake_shape() {
        let create = to_order_create("1042", &bridge_order());
        assert_eq!(create.order_number, "1042");
        assert_eq!(create.external_ref.as_deref(), Some("wc-778"));
        assert_eq!(create.source, OrderSource::Imported);
        // Zero quantities from the storefront are clamped, not rejected
        assert_eq!(create.items[0].quantity, 1);
    }

    #[test]
    fn bridge_items_keep_their_specifications() {
        let mut order = bridge_order();
        order.items = vec![BridgeOrderItem {
            product_name: "Flyers".to_string(),
            quantity: 300,
            specifications: BTreeMap::from([("size".to_string(), "A5".to_string())]),
        }];
        let create = to_order_create("1042", &order);
        assert_eq!(
            create.items[0].specifications.get("size").map(String::as_str),
            Some("A5")
        );
    }
}
