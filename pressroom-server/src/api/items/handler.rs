//! Order item workflow handlers
//!
//! Every action follows the same shape: load the item, run the pure engine
//! function against it, persist the mutated row, then fire the best-effort
//! side effects (timeline, notifications, activity log, change feed).

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{OrderItem, VendorCreate};
use crate::utils::{AppError, AppResult};
use crate::workflow::{self, MoveRequest, dispatch, effects, notify, outsource};
use shared::workflow::{OutsourceStage, Stage};

const RESOURCE: &str = "order_item";

async fn load_item(state: &ServerState, id: &str) -> AppResult<OrderItem> {
    state
        .items
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Item {} not found", id)))
}

/// Persist the item and run the transition side effects
async fn commit(
    state: &ServerState,
    current_user: &CurrentUser,
    item: OrderItem,
    action: &str,
    note: &str,
    notify_stage: Option<Stage>,
) -> AppResult<OrderItem> {
    let item = state.items.save(item).await?;
    let item_id = item.id.clone();
    let id_str = item_id.as_ref().map(|t| t.to_string()).unwrap_or_default();

    effects::record_timeline(
        state,
        &item.order_id,
        item_id.as_ref(),
        item.current_stage,
        action,
        note,
        Vec::new(),
        current_user,
    )
    .await;

    if let Some(stage) = notify_stage {
        if let Ok(profiles) = state.profiles.find_all().await {
            let recipients = notify::transition_audience(&profiles, stage, &current_user.id);
            effects::notify(
                state,
                &recipients,
                &format!("Item {}", action.replace('_', " ")),
                &format!("{} is now in {}", item.product_name, item.current_stage),
                Some(&item.order_id.to_string()),
                Some(&id_str),
            )
            .await;
        }
    }

    effects::log_activity(
        state,
        current_user,
        &format!("item.{}", action),
        RESOURCE,
        &id_str,
        serde_json::json!({ "product": item.product_name, "stage": item.current_stage }),
    )
    .await;
    state
        .broadcast_sync(RESOURCE, action, &id_str, Some(&item))
        .await;

    Ok(item)
}

/// POST /api/items/:id/process - generic move along the workflow
pub async fn process(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<OrderItem>> {
    let mut item = load_item(&state, &id).await?;
    let action = workflow::apply_move(&mut item, &payload)?;
    let stage = item.current_stage;
    let item = commit(&state, &current_user, item, action, &payload.note, Some(stage)).await?;
    Ok(Json(item))
}

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub note: String,
}

/// POST /api/items/:id/approve - customer approved, route back
pub async fn approve(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> AppResult<Json<OrderItem>> {
    let mut item = load_item(&state, &id).await?;
    let action = workflow::apply_approval(&mut item, true, &payload.note)?;
    let stage = item.current_stage;
    let item = commit(&state, &current_user, item, action, &payload.note, Some(stage)).await?;
    Ok(Json(item))
}

/// POST /api/items/:id/reject - customer rejected, route back for rework
pub async fn reject(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> AppResult<Json<OrderItem>> {
    let mut item = load_item(&state, &id).await?;
    let action = workflow::apply_approval(&mut item, false, &payload.note)?;
    let stage = item.current_stage;
    let item = commit(&state, &current_user, item, action, &payload.note, Some(stage)).await?;
    Ok(Json(item))
}

/// POST /api/items/:id/substage/complete
pub async fn complete_substage(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> AppResult<Json<OrderItem>> {
    let mut item = load_item(&state, &id).await?;
    let action = workflow::complete_substage(&mut item, &payload.note)?;
    // Finishing the last substage is worth telling the floor about
    let stage = item
        .substages_done()
        .then_some(Stage::Dispatch);
    let item = commit(&state, &current_user, item, action, &payload.note, stage).await?;
    Ok(Json(item))
}

/// POST /api/items/:id/outsource - hand the item to a vendor
pub async fn start_outsource(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<outsource::OutsourceStart>,
) -> AppResult<Json<OrderItem>> {
    let mut item = load_item(&state, &id).await?;
    let action = outsource::start(&mut item, &payload)?;

    // Free-typed vendors can opt into the stored list for next time
    if payload.save_vendor && payload.vendor_id.is_none() {
        let create = VendorCreate {
            name: payload.vendor_name.trim().to_string(),
            phone: payload.vendor_phone.trim().to_string(),
            email: None,
            address: None,
            work_types: vec![payload.work_type.trim().to_string()],
        };
        if let Err(e) = state.vendors.create(create).await {
            tracing::warn!(target: "vendors", error = %e, "Vendor save skipped");
        } else {
            state
                .broadcast_sync::<()>("vendor", "created", "", None)
                .await;
        }
    }

    let item = commit(
        &state,
        &current_user,
        item,
        action,
        &payload.note,
        Some(Stage::Outsource),
    )
    .await?;
    Ok(Json(item))
}

#[derive(Debug, Deserialize)]
pub struct OutsourceAdvanceRequest {
    pub to: OutsourceStage,
    pub note: String,
}

/// POST /api/items/:id/outsource/advance
pub async fn advance_outsource(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OutsourceAdvanceRequest>,
) -> AppResult<Json<OrderItem>> {
    let mut item = load_item(&state, &id).await?;
    let action = outsource::advance(&mut item, payload.to, &payload.note)?;
    // Sales make the dispatch call once the job reaches decision_pending
    let stage = (payload.to == OutsourceStage::DecisionPending).then_some(Stage::Dispatch);
    let item = commit(&state, &current_user, item, action, &payload.note, stage).await?;
    Ok(Json(item))
}

/// POST /api/items/:id/outsource/notes - append a follow-up
pub async fn add_outsource_note(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> AppResult<Json<OrderItem>> {
    let mut item = load_item(&state, &id).await?;
    outsource::add_follow_up(
        &mut item,
        &payload.note,
        &current_user.id,
        &current_user.display_name,
    )?;
    let item = commit(
        &state,
        &current_user,
        item,
        "outsource_follow_up",
        &payload.note,
        None,
    )
    .await?;
    Ok(Json(item))
}

/// POST /api/items/:id/dispatch/decision - pickup or courier
pub async fn dispatch_decision(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<dispatch::DecisionRequest>,
) -> AppResult<Json<OrderItem>> {
    let mut item = load_item(&state, &id).await?;
    let action = dispatch::decide(&mut item, &payload)?;
    let item = commit(&state, &current_user, item, action, &payload.note, None).await?;
    Ok(Json(item))
}

/// POST /api/items/:id/dispatch/finalize - courier, tracking, date
pub async fn dispatch_finalize(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<dispatch::FinalizeRequest>,
) -> AppResult<Json<OrderItem>> {
    let mut item = load_item(&state, &id).await?;
    let action = dispatch::finalize(&mut item, &payload)?;
    let order_id = item.order_id.to_string();
    let item = commit(
        &state,
        &current_user,
        item,
        action,
        &payload.note,
        Some(Stage::Dispatch),
    )
    .await?;

    // Last item out closes the order
    let siblings = state.items.find_by_order(&order_id).await?;
    if dispatch::all_dispatched(&siblings) {
        let order = state.orders.mark_completed(&order_id).await?;
        effects::record_timeline(
            &state,
            &item.order_id,
            None,
            Stage::Completed,
            "order_completed",
            "All items dispatched",
            Vec::new(),
            &current_user,
        )
        .await;
        if let Ok(profiles) = state.profiles.find_all().await {
            let recipients =
                notify::transition_audience(&profiles, Stage::Completed, &current_user.id);
            effects::notify(
                &state,
                &recipients,
                "Order completed",
                &format!("Order {} is fully dispatched", order.order_number),
                Some(&order_id),
                None,
            )
            .await;
        }
        state
            .broadcast_sync("order", "completed", &order_id, Some(&order))
            .await;
    }

    Ok(Json(item))
}
