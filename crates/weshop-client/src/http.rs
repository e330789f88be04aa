//! Marketplace REST API client.
//!
//! Wraps reqwest with bearer-token attachment from the shared token store and
//! one automatic refresh-and-retry on authorization failure. There is no
//! process-wide default Authorization header: every request reads the current
//! access token at build time, so a completed refresh is picked up by all
//! subsequent requests. Concurrent refresh attempts are funneled through a
//! single in-flight exchange.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use weshop_core::{ApiConfig, TokenStore};

use crate::error::{ApiError, parse_field_errors};

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

/// Authenticated marketplace API client.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    store: Arc<TokenStore>,
    /// Serializes token refreshes so a burst of 401s performs one exchange.
    refresh_gate: Mutex<()>,
}

impl ApiClient {
    /// Create a new API client over the given endpoint config and store.
    pub fn new(config: ApiConfig, store: Arc<TokenStore>) -> Result<Self, ApiError> {
        if config.base_url.is_empty() {
            return Err(ApiError::Config("base_url is empty".into()));
        }

        // Ensure a TLS crypto provider is installed (reqwest uses rustls-no-provider).
        // An Err here means one was already installed, which is fine.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            config,
            store,
            refresh_gate: Mutex::new(()),
        })
    }

    /// Endpoint configuration this client talks to.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// The token store shared with this client.
    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None, &[]).await
    }

    pub(crate) async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.request(Method::GET, path, None, query).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        self.request(Method::POST, path, Some(body), &[]).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::POST, path, None, &[]).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<T, ApiError> {
        self.request(Method::PUT, path, Some(body), &[]).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let resp = self.execute(Method::DELETE, path, None, &[]).await?;
        Self::check_status(resp).await?;
        Ok(())
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self.execute(method, path, body, query).await?;
        let resp = Self::check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// Send with the current token; on the first 401, refresh and resend once.
    /// A 401 on the resend is not retried again and surfaces to the caller.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Response, ApiError> {
        let token = self.store.access_token();
        let resp = self
            .send_once(method.clone(), path, body, query, token.as_deref())
            .await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }

        let fresh = self.refresh_access(token.as_deref()).await?;
        debug!(path, "retrying request with refreshed token");
        self.send_once(method, path, body, query, Some(&fresh)).await
    }

    async fn send_once(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Result<Response, ApiError> {
        let mut req = self.http.request(method, self.config.endpoint(path));
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = token {
            req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Single-flight: the gate serializes callers, and a caller that waited
    /// behind a completed refresh adopts the stored token instead of spending
    /// the refresh token again. `stale` is the access token the failing
    /// request was sent with.
    async fn refresh_access(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(current) = self.store.access_token() {
            if stale != Some(current.as_str()) {
                debug!("adopting access token refreshed by a concurrent request");
                return Ok(current);
            }
        }

        let Some(refresh) = self.store.refresh_token() else {
            warn!("authorization failed with no refresh token, clearing session");
            self.clear_session();
            return Err(ApiError::SessionExpired);
        };

        match self.exchange_refresh_token(&refresh).await {
            Ok(access) => {
                self.store.set_access(&access)?;
                Ok(access)
            }
            Err(e) => {
                warn!(error = %e, "token refresh failed, clearing session");
                self.clear_session();
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh: &str) -> Result<String, ApiError> {
        let resp = self
            .http
            .post(self.config.endpoint("/token/refresh/"))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        let body: RefreshResponse = resp.json().await?;
        Ok(body.access)
    }

    fn clear_session(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear session store");
        }
    }

    /// Map non-success statuses into `ApiError`, reading the body for
    /// field-keyed validation errors and server-reported messages.
    async fn check_status(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let reason = status.canonical_reason().unwrap_or("Unknown");
        let body: Option<Value> = resp.json().await.ok();

        if status == StatusCode::BAD_REQUEST {
            if let Some(fields) = body.as_ref().and_then(parse_field_errors) {
                return Err(ApiError::Validation(fields));
            }
        }

        let message = body
            .as_ref()
            .and_then(|v| {
                v.get("detail")
                    .or_else(|| v.get("error"))
                    .and_then(Value::as_str)
            })
            .map_or_else(|| reason.to_string(), ToString::to_string);

        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
