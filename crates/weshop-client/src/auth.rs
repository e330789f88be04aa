//! Authentication endpoints.

use serde_json::json;

use weshop_core::models::{AuthResponse, RegisterPayload};

use crate::error::ApiError;
use crate::http::ApiClient;

impl ApiClient {
    /// Exchange credentials for a token pair and user record.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post(
            "/login/",
            &json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Create an account; a successful registration also logs the user in.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse, ApiError> {
        self.post("/register/", &serde_json::to_value(payload)?).await
    }
}
