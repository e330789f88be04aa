//! Order endpoints: placement, listing, and fulfillment.

use serde::{Deserialize, Serialize};

use weshop_core::models::Order;

use crate::error::ApiError;
use crate::http::ApiClient;

/// Payload for `POST /orders/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub product: i64,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FulfillResponse {
    order: Order,
}

impl ApiClient {
    /// List orders visible to the current user (buyers see their own,
    /// sellers see orders on their shop, admins see everything).
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/orders/").await
    }

    /// Get a single order by id.
    pub async fn order(&self, id: i64) -> Result<Order, ApiError> {
        self.get(&format!("/orders/{id}/")).await
    }

    /// Place an order as the current buyer.
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.post("/orders/", &serde_json::to_value(order)?).await
    }

    /// Mark an order delivered (seller or admin).
    pub async fn fulfill_order(&self, id: i64) -> Result<Order, ApiError> {
        let resp: FulfillResponse = self.post_empty(&format!("/orders/{id}/fulfill/")).await?;
        Ok(resp.order)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_order_omits_absent_contact_fields() {
        let order = NewOrder {
            product: 8,
            quantity: 2,
            buyer_phone: None,
            buyer_message: None,
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json, serde_json::json!({"product": 8, "quantity": 2}));
    }
}
