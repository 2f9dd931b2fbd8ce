//! WooCommerce bridge client

use crate::utils::AppError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Order payload as returned by the bridge
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeOrder {
    /// Storefront order id, stored as external_ref
    pub id: String,
    pub order_number: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub total: Option<rust_decimal::Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
    pub items: Vec<BridgeOrderItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeOrderItem {
    pub product_name: String,
    pub quantity: i64,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
}

/// Raw bridge envelope
#[derive(Debug, Deserialize)]
struct BridgeResponse {
    #[serde(default)]
    found: Option<bool>,
    #[serde(default)]
    order: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl StorefrontClient {
    pub fn new(base_url: String, token: Option<String>, timeout_ms: u64) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Fetch one order by its normalized number. Returns the typed order and
    /// the raw payload for the import cache.
    pub async fn fetch_order(
        &self,
        order_number: &str,
    ) -> Result<(BridgeOrder, serde_json::Value), AppError> {
        let url = format!(
            "{}/orders/{}",
            self.base_url.trim_end_matches('/'),
            order_number
        );

        let mut request = self.http.get(&url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::StorefrontError(format!("Bridge unreachable: {}", e)))?;

        let body: BridgeResponse = response
            .json()
            .await
            .map_err(|e| AppError::StorefrontError(format!("Malformed bridge response: {}", e)))?;

        if let Some(error) = body.error {
            return Err(map_bridge_error(&error, order_number));
        }

        match (body.found, body.order) {
            (Some(false), _) | (_, None) => Err(AppError::ImportNotFound(format!(
                "Order {} not found in storefront",
                order_number
            ))),
            (_, Some(raw)) => {
                let order: BridgeOrder = serde_json::from_value(raw.clone()).map_err(|e| {
                    AppError::StorefrontError(format!("Malformed bridge order: {}", e))
                })?;
                Ok((order, raw))
            }
        }
    }
}

fn map_bridge_error(code: &str, order_number: &str) -> AppError {
    match code {
        "ORDER_NOT_FOUND" => AppError::ImportNotFound(format!(
            "Order {} not found in storefront",
            order_number
        )),
        "ORDER_NUMBER_MISMATCH" => AppError::OrderNumberMismatch(format!(
            "Storefront returned a different order number for {}",
            order_number
        )),
        "UNAUTHORIZED" => {
            AppError::StorefrontError("Bridge rejected credentials (UNAUTHORIZED)".to_string())
        }
        "WOOCOMMERCE_ERROR" => AppError::StorefrontError("Storefront reported an error".to_string()),
        other => AppError::StorefrontError(format!("Unknown bridge error: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_error_codes_map_to_taxonomy() {
        assert!(matches!(
            map_bridge_error("ORDER_NOT_FOUND", "1"),
            AppError::ImportNotFound(_)
        ));
        assert!(matches!(
            map_bridge_error("ORDER_NUMBER_MISMATCH", "1"),
            AppError::OrderNumberMismatch(_)
        ));
        assert!(matches!(
            map_bridge_error("UNAUTHORIZED", "1"),
            AppError::StorefrontError(_)
        ));
        assert!(matches!(
            map_bridge_error("SOMETHING_ELSE", "1"),
            AppError::StorefrontError(_)
        ));
    }

    #[test]
    fn bridge_order_deserializes_minimal_payload() {
        let raw = serde_json::json!({
            "id": "wc-778",
            "order_number": "1042",
            "customer_name": "Asha Traders",
            "items": [
                { "product_name": "Business cards", "quantity": 500,
                  "specifications": { "paper": "300gsm matte" } }
            ]
        });
        let order: BridgeOrder = serde_json::from_value(raw).unwrap();
        assert_eq!(order.order_number, "1042");
        assert_eq!(order.items.len(), 1);
        assert!(order.delivery_date.is_none());
    }
}
