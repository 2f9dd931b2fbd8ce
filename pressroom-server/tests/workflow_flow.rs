//! End-to-end workflow over an in-memory database
//!
//! Drives an order from intake through design, approval, production
//! substages and dispatch using the repositories and the transition engine,
//! the same path the HTTP handlers take.

use pressroom_server::db::DbService;
use pressroom_server::db::models::{CustomerSnapshot, Order, OrderItem, OrderUpdate, SubstagePlan};
use pressroom_server::db::repository::{OrderItemRepository, OrderRepository, TimelineRepository};
use pressroom_server::workflow::{self, MoveRequest, dispatch, duplicate};
use shared::util::now_millis;
use shared::workflow::{
    Department, ItemStatus, OrderSource, PaymentStatus, Stage, Substage, SubstageStatus,
};
use std::collections::BTreeMap;

fn order_row(number: &str) -> Order {
    let now = now_millis();
    Order {
        id: None,
        order_number: number.to_string(),
        external_ref: None,
        customer: CustomerSnapshot {
            name: "Asha Traders".to_string(),
            phone: Some("98765".to_string()),
            email: None,
            address: None,
        },
        notes: None,
        delivery_date: None,
        is_completed: false,
        is_archived: false,
        source: OrderSource::Manual,
        total: rust_decimal::Decimal::ZERO,
        payment_status: PaymentStatus::Unpaid,
        created_at: now,
        updated_at: now,
    }
}

fn item_row(order_id: &surrealdb::sql::Thing, substages: &[Substage]) -> OrderItem {
    let now = now_millis();
    OrderItem {
        id: None,
        order_id: order_id.clone(),
        product_name: "Wedding cards".to_string(),
        quantity: 200,
        specifications: BTreeMap::from([("paper".to_string(), "300gsm".to_string())]),
        current_stage: Stage::Sales,
        status: ItemStatus::NewOrder,
        assigned_department: Department::Sales,
        assigned_to: None,
        previous_department: None,
        previous_assigned_to: None,
        need_design: true,
        substage_sequence: substages
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
    }
}

fn move_with_note(note: &str) -> MoveRequest {
    MoveRequest {
        note: note.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn full_workflow_to_completion() {
    let db = DbService::open_in_memory().await.unwrap();
    let orders = OrderRepository::new(db.db.clone());
    let items = OrderItemRepository::new(db.db.clone());
    let timeline = TimelineRepository::new(db.db.clone());

    let order = orders.create(order_row("1042")).await.unwrap();
    let order_id = order.id.clone().unwrap();
    let item = items
        .create(item_row(&order_id, &[Substage::Printing, Substage::Packing]))
        .await
        .unwrap();

    // Sales -> design -> prepress -> production along the default chain
    let mut item = item;
    workflow::apply_move(&mut item, &move_with_note("to design")).unwrap();
    let mut item = items.save(item).await.unwrap();
    assert_eq!(item.current_stage, Stage::Design);

    workflow::apply_move(&mut item, &move_with_note("design done")).unwrap();
    let mut item = items.save(item).await.unwrap();
    assert_eq!(item.current_stage, Stage::Prepress);

    workflow::apply_move(&mut item, &move_with_note("plates ready")).unwrap();
    let mut item = items.save(item).await.unwrap();
    assert_eq!(item.current_stage, Stage::Production);
    assert_eq!(item.current_substage, Some(Substage::Printing));

    // Both substages; the terminal one readies the item for dispatch
    workflow::complete_substage(&mut item, "printed").unwrap();
    assert_eq!(item.current_substage, Some(Substage::Packing));
    workflow::complete_substage(&mut item, "packed").unwrap();
    let mut item = items.save(item).await.unwrap();
    assert_eq!(item.status, ItemStatus::ReadyForDispatch);

    // Finalize dispatch with the full detail set
    let finalize = dispatch::FinalizeRequest {
        courier: "BlueDart".to_string(),
        tracking_number: "BD-991".to_string(),
        dispatch_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        is_express: false,
        note: "out for delivery".to_string(),
    };
    dispatch::finalize(&mut item, &finalize).unwrap();
    let item = items.save(item).await.unwrap();
    assert_eq!(item.status, ItemStatus::Dispatched);

    // Single item dispatched -> order completes
    let siblings = items.find_by_order(&order_id.to_string()).await.unwrap();
    assert!(dispatch::all_dispatched(&siblings));
    let order = orders.mark_completed(&order_id.to_string()).await.unwrap();
    assert!(order.is_completed);

    // Timeline is untouched by this low-level path; the table still answers
    let entries = timeline.find_by_order(&order_id.to_string()).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn approval_round_trip_through_sales() {
    let db = DbService::open_in_memory().await.unwrap();
    let orders = OrderRepository::new(db.db.clone());
    let items = OrderItemRepository::new(db.db.clone());

    let order = orders.create(order_row("2001")).await.unwrap();
    let order_id = order.id.clone().unwrap();
    let mut item = items.create(item_row(&order_id, &[])).await.unwrap();

    workflow::apply_move(&mut item, &move_with_note("to design")).unwrap();
    item.assigned_to = Some("profile:dee".to_string());

    // Send to sales for customer approval; breadcrumb captured
    let req = MoveRequest {
        to_stage: Some(Stage::Sales),
        note: "proof ready".to_string(),
        ..Default::default()
    };
    workflow::apply_move(&mut item, &req).unwrap();
    let mut item = items.save(item).await.unwrap();
    assert!(item.status.is_awaiting_approval());
    assert_eq!(item.previous_department, Some(Department::Design));

    // Rejection routes back to design with the same assignee
    workflow::apply_approval(&mut item, false, "customer wants gold foil").unwrap();
    let item = items.save(item).await.unwrap();
    assert_eq!(item.current_stage, Stage::Design);
    assert_eq!(item.assigned_to, Some("profile:dee".to_string()));
    assert_eq!(item.status, ItemStatus::RejectedByCustomer);
}

#[tokio::test]
async fn duplicate_numbers_are_caught_before_and_at_the_index() {
    let db = DbService::open_in_memory().await.unwrap();
    let orders = OrderRepository::new(db.db.clone());

    orders.create(order_row("3001")).await.unwrap();

    // Advisory check sees the first row
    let verdict = duplicate::check(&orders, "3001", None).await;
    assert!(verdict.duplicate);

    // The unique index is the hard stop for a racing write
    let err = orders.create(order_row("3001")).await;
    assert!(err.is_err());

    let verdict = duplicate::check(&orders, "3002", None).await;
    assert!(!verdict.duplicate);
}

#[tokio::test]
async fn full_row_saves_keep_the_record_identity() {
    let db = DbService::open_in_memory().await.unwrap();
    let orders = OrderRepository::new(db.db.clone());
    let items = OrderItemRepository::new(db.db.clone());

    let order = orders.create(order_row("5001")).await.unwrap();
    let order_id = order.id.clone().unwrap();
    let item = items.create(item_row(&order_id, &[])).await.unwrap();
    let item_id = item.id.clone().unwrap();

    // A full-row replace must come back under the same record id
    let saved = items.save(item).await.unwrap();
    assert_eq!(saved.id, Some(item_id));
    assert_eq!(saved.product_name, "Wedding cards");

    let updated = orders
        .update_info(
            &order_id.to_string(),
            OrderUpdate {
                notes: Some("rush job".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.id, Some(order_id.clone()));
    assert_eq!(updated.notes.as_deref(), Some("rush job"));

    let fetched = orders.find_by_id(&order_id.to_string()).await.unwrap().unwrap();
    assert_eq!(fetched.notes.as_deref(), Some("rush job"));
}

#[tokio::test]
async fn invalid_transitions_leave_no_trace() {
    let db = DbService::open_in_memory().await.unwrap();
    let orders = OrderRepository::new(db.db.clone());
    let items = OrderItemRepository::new(db.db.clone());

    let order = orders.create(order_row("4001")).await.unwrap();
    let order_id = order.id.clone().unwrap();
    let item = items.create(item_row(&order_id, &[])).await.unwrap();

    // Missing note fails before anything mutates
    let mut copy = item.clone();
    assert!(workflow::apply_move(&mut copy, &move_with_note("  ")).is_err());

    let stored = items
        .find_by_id(&item.id.clone().unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.current_stage, Stage::Sales);
    assert_eq!(stored.status, ItemStatus::NewOrder);
}
