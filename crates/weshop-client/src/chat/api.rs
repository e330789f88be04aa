//! Chat REST endpoints: conversations listing, per-order history, and the
//! durable message write.

use serde_json::json;

use weshop_core::models::Conversation;

use crate::error::ApiError;
use crate::http::ApiClient;

impl ApiClient {
    /// List the current user's conversations, newest first.
    pub async fn conversations(&self) -> Result<Vec<Conversation>, ApiError> {
        self.get("/chat/conversations/").await
    }

    /// Fetch the conversation (with history) for an order.
    pub async fn conversation_for_order(&self, order_id: i64) -> Result<Conversation, ApiError> {
        self.get(&format!("/chat/conversations/order/{order_id}/"))
            .await
    }

    /// Create (or fetch) the conversation for an order.
    pub async fn start_chat(&self, order_id: i64) -> Result<Conversation, ApiError> {
        self.post(&format!("/chat/orders/{order_id}/start-chat/"), &json!({}))
            .await
    }

    /// Durably persist a chat message for an order. Returns the updated
    /// conversation.
    pub async fn send_chat_message(
        &self,
        order_id: i64,
        content: &str,
    ) -> Result<Conversation, ApiError> {
        self.post(
            &format!("/chat/orders/{order_id}/start-chat/"),
            &json!({ "content": content }),
        )
        .await
    }
}
