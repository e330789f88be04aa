//! API endpoint configuration.
//!
//! Resolves the marketplace base URL from the environment and derives the
//! WebSocket endpoint used by order chat channels.

/// Default REST base URL, including the `/api` prefix.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Environment variable overriding the REST base URL.
pub const API_BASE_ENV: &str = "WESHOP_API_BASE";

/// Marketplace endpoint configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// REST base URL (e.g., "<http://127.0.0.1:8000/api>").
    pub base_url: String,
}

impl ApiConfig {
    /// Build a config from an explicit base URL. Trailing slashes are stripped.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Resolve the base URL from `WESHOP_API_BASE`, falling back to the default.
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.into()))
    }

    /// Build the full URL for an API path (paths start with `/`).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Derive the chat WebSocket URL for an order.
    ///
    /// The socket lives on the same host as the REST API, outside the `/api`
    /// prefix: `ws(s)://<host>/ws/chat/<order_id>/`.
    pub fn chat_ws_url(&self, order_id: i64) -> String {
        let host_root = self.base_url.trim_end_matches('/').trim_end_matches("/api");
        let ws_root = if let Some(rest) = host_root.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = host_root.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            host_root.to_string()
        };
        format!("{ws_root}/ws/chat/{order_id}/")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8000/api");
    }

    #[test]
    fn trailing_slash_stripped() {
        let config = ApiConfig::new("http://localhost:8000/api/");
        assert_eq!(config.base_url, "http://localhost:8000/api");
    }

    #[test]
    fn endpoint_construction() {
        let config = ApiConfig::new("http://localhost:8000/api");
        assert_eq!(
            config.endpoint("/shops/12/verify/"),
            "http://localhost:8000/api/shops/12/verify/"
        );
    }

    #[test]
    fn chat_ws_url_plain() {
        let config = ApiConfig::new("http://127.0.0.1:8000/api");
        assert_eq!(config.chat_ws_url(7), "ws://127.0.0.1:8000/ws/chat/7/");
    }

    #[test]
    fn chat_ws_url_tls() {
        let config = ApiConfig::new("https://shop.example.com/api");
        assert_eq!(config.chat_ws_url(42), "wss://shop.example.com/ws/chat/42/");
    }
}
