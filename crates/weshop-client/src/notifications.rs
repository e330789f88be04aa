//! Seller notification endpoints.

use serde::Deserialize;

use weshop_core::models::Notification;

use crate::error::ApiError;
use crate::http::ApiClient;

/// Bare `{"status": "..."}` acknowledgement used by the read endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReply {
    pub status: String,
}

impl ApiClient {
    /// List notifications for the current seller.
    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.get("/notifications/").await
    }

    /// Mark one notification as read.
    pub async fn mark_notification_read(&self, id: i64) -> Result<StatusReply, ApiError> {
        self.post_empty(&format!("/notifications/{id}/read/")).await
    }

    /// Mark every unread notification as read.
    pub async fn mark_all_notifications_read(&self) -> Result<StatusReply, ApiError> {
        self.post_empty("/notifications/read-all/").await
    }
}
