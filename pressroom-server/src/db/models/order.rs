//! Order Model
//!
//! An order is the customer-facing unit: one customer snapshot, financial
//! fields (admin/sales only), and one or more order items that each travel
//! the workflow independently.

use super::serde_thing;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::workflow::{OrderSource, PaymentStatus, Priority};
use surrealdb::sql::Thing;

pub type OrderId = Thing;

/// Customer contact details captured at intake. A snapshot, not a reference;
/// later edits to a customer record never rewrite past orders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Order row matching the SurrealDB schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<OrderId>,
    /// Manually entered order number, unique across orders
    pub order_number: String,
    /// External storefront order id, set for imported orders
    #[serde(default)]
    pub external_ref: Option<String>,
    pub customer: CustomerSnapshot,
    #[serde(default)]
    pub notes: Option<String>,
    /// Delivery date drives priority; None means lowest urgency
    #[serde(default)]
    pub delivery_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_archived: bool,
    pub source: OrderSource,
    /// Financial fields, redacted for non-admin/non-sales viewers
    #[serde(default)]
    pub total: Decimal,
    #[serde(default = "default_payment_status")]
    pub payment_status: PaymentStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_payment_status() -> PaymentStatus {
    PaymentStatus::Unpaid
}

/// Order creation payload. Items are created together with the order so the
/// "at least one specification per item" rule can fail the whole intake before
/// any row is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub order_number: String,
    #[serde(default)]
    pub external_ref: Option<String>,
    pub customer: CustomerSnapshot,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<chrono::NaiveDate>,
    pub source: OrderSource,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    pub items: Vec<super::order_item::OrderItemCreate>,
}

/// Order info update (customer details, notes, delivery date, financials).
/// Workflow fields are never writable through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub customer: Option<CustomerSnapshot>,
    pub notes: Option<String>,
    /// Some(None) clears the delivery date
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<Option<chrono::NaiveDate>>,
    pub total: Option<Decimal>,
    pub payment_status: Option<PaymentStatus>,
    pub is_archived: Option<bool>,
}

/// Serde helper distinguishing "absent" from "explicitly null"
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Order as returned by the API: computed priority, item rows, financial
/// fields present only for admin/sales viewers.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    pub id: String,
    pub order_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
    pub customer: CustomerSnapshot,
    pub notes: Option<String>,
    pub delivery_date: Option<chrono::NaiveDate>,
    pub is_completed: bool,
    pub is_archived: bool,
    pub source: OrderSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    /// Derived on every read from delivery_date and today's date
    pub priority: Priority,
    pub created_at: i64,
    pub updated_at: i64,
    pub items: Vec<super::order_item::OrderItem>,
}

impl OrderView {
    pub fn assemble(
        order: Order,
        items: Vec<super::order_item::OrderItem>,
        today: chrono::NaiveDate,
        include_financials: bool,
    ) -> Self {
        let priority = shared::workflow::priority_for(order.delivery_date, today);
        Self {
            id: order.id.map(|t| t.to_string()).unwrap_or_default(),
            order_number: order.order_number,
            external_ref: order.external_ref,
            customer: order.customer,
            notes: order.notes,
            delivery_date: order.delivery_date,
            is_completed: order.is_completed,
            is_archived: order.is_archived,
            source: order.source,
            total: include_financials.then_some(order.total),
            payment_status: include_financials.then_some(order.payment_status),
            priority,
            created_at: order.created_at,
            updated_at: order.updated_at,
            items,
        }
    }
}

/// Duplicate-check verdict (see workflow::duplicate)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateVerdict {
    pub duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
