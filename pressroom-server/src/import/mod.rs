//! Storefront import
//!
//! Pulls orders from the WooCommerce bridge by order number. The bridge
//! returns either the order payload or a structured error code; codes map
//! onto [`AppError`] variants so the client sees a stable taxonomy.
//!
//! Concurrency: operators retype order numbers quickly, so a later lookup
//! for the same number supersedes an in-flight one. Each request takes a
//! ticket from [`PendingImports`]; when the response lands, a stale ticket
//! means the result is discarded instead of overwriting newer data.

mod client;

pub use client::{BridgeOrder, BridgeOrderItem, StorefrontClient};

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Strip storefront prefixes and non-digits from an order number.
/// "WC-1042", "MAN-1042" and " 1042 " all normalize to "1042". Idempotent.
pub fn normalize_order_number(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix("WC-")
        .or_else(|| trimmed.strip_prefix("MAN-"))
        .unwrap_or(trimmed);
    stripped.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// In-flight lookup registry. One ticket per order number; a newer ticket
/// invalidates every older one for the same number.
#[derive(Debug, Default)]
pub struct PendingImports {
    counter: AtomicU64,
    current: DashMap<String, u64>,
}

impl PendingImports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lookup and get its ticket
    pub fn begin(&self, order_number: &str) -> u64 {
        let ticket = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.current.insert(order_number.to_string(), ticket);
        ticket
    }

    /// Whether this ticket is still the latest lookup for the number
    pub fn is_current(&self, order_number: &str, ticket: u64) -> bool {
        self.current
            .get(order_number)
            .map(|t| *t == ticket)
            .unwrap_or(false)
    }

    /// Clear the entry if this ticket still owns it
    pub fn finish(&self, order_number: &str, ticket: u64) {
        self.current
            .remove_if(order_number, |_, current| *current == ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_prefixes_and_junk() {
        assert_eq!(normalize_order_number("WC-1042"), "1042");
        assert_eq!(normalize_order_number("MAN-1042"), "1042");
        assert_eq!(normalize_order_number(" #1042 "), "1042");
        assert_eq!(normalize_order_number("1042"), "1042");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_order_number("WC-10 42a");
        assert_eq!(once, "1042");
        assert_eq!(normalize_order_number(&once), once);
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let pending = PendingImports::new();
        let first = pending.begin("1042");
        let second = pending.begin("1042");

        assert!(!pending.is_current("1042", first));
        assert!(pending.is_current("1042", second));

        // The superseded lookup cannot clear the newer ticket
        pending.finish("1042", first);
        assert!(pending.is_current("1042", second));

        pending.finish("1042", second);
        assert!(!pending.is_current("1042", second));
    }

    #[test]
    fn tickets_are_per_order_number() {
        let pending = PendingImports::new();
        let a = pending.begin("1042");
        let b = pending.begin("2000");
        assert!(pending.is_current("1042", a));
        assert!(pending.is_current("2000", b));
    }
}
