//! Duplicate order check
//!
//! Advisory check run before intake and import. Matches on order number and,
//! for imports, on the storefront's external id. Fails OPEN: a lookup error
//! is logged and reported as "no duplicate" so a flaky index never blocks
//! order entry. The unique index on `order_number` remains the hard stop.

use crate::db::models::DuplicateVerdict;
use crate::db::repository::OrderRepository;
use tracing::warn;

pub async fn check(
    orders: &OrderRepository,
    order_number: &str,
    external_ref: Option<&str>,
) -> DuplicateVerdict {
    match orders.find_by_order_number(order_number).await {
        Ok(Some(existing)) => {
            return DuplicateVerdict {
                duplicate: true,
                reason: Some(format!(
                    "Order number {} already exists ({})",
                    order_number,
                    existing.customer.name
                )),
            };
        }
        Ok(None) => {}
        Err(e) => {
            warn!(target: "orders", error = %e, order_number, "Duplicate check failed, allowing");
            return DuplicateVerdict {
                duplicate: false,
                reason: None,
            };
        }
    }

    if let Some(external_ref) = external_ref {
        match orders.find_by_external_ref(external_ref).await {
            Ok(Some(_)) => {
                return DuplicateVerdict {
                    duplicate: true,
                    reason: Some(format!("Storefront order {} already imported", external_ref)),
                };
            }
            Ok(None) => {}
            Err(e) => {
                warn!(target: "orders", error = %e, external_ref, "Duplicate check failed, allowing");
            }
        }
    }

    DuplicateVerdict {
        duplicate: false,
        reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::Surreal;
    use surrealdb::engine::local::Mem;

    #[tokio::test]
    async fn lookup_errors_report_no_duplicate() {
        // No namespace selected on this handle, so every lookup errors;
        // the check must still answer instead of blocking intake.
        let db = Surreal::new::<Mem>(()).await.unwrap();
        let orders = OrderRepository::new(db);

        let verdict = check(&orders, "9001", Some("wc-9001")).await;
        assert!(!verdict.duplicate);
        assert!(verdict.reason.is_none());
    }
}
