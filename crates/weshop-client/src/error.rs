//! Error types for the WeShop API client.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field-keyed validation errors as returned by the API
/// (e.g. `{"username": ["This field is required."]}`).
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("validation failed: {}", summarize(.0))]
    Validation(FieldErrors),

    /// Authorization failed and could not be recovered by a token refresh;
    /// the stored session has been cleared.
    #[error("session expired, login required")]
    SessionExpired,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session store error: {0}")]
    Store(#[from] weshop_core::Error),
}

impl ApiError {
    /// First server-reported message, preferring `non_field_errors`, falling
    /// back to the error's own rendering.
    pub fn first_message(&self) -> String {
        if let Self::Validation(fields) = self {
            if let Some(msg) = fields.get("non_field_errors").and_then(|v| v.first()) {
                return msg.clone();
            }
            if let Some(msg) = fields.values().flatten().next() {
                return msg.clone();
            }
        }
        self.to_string()
    }
}

/// Convert a DRF error body into field-keyed messages. Values may be a
/// single string or a list of strings; anything else is rendered as-is.
pub(crate) fn parse_field_errors(value: &serde_json::Value) -> Option<FieldErrors> {
    let object = value.as_object()?;
    let mut fields = FieldErrors::new();
    for (key, entry) in object {
        let messages = match entry {
            serde_json::Value::String(s) => vec![s.clone()],
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            other => vec![other.to_string()],
        };
        fields.insert(key.clone(), messages);
    }
    Some(fields)
}

fn summarize(fields: &FieldErrors) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join("; ")))
        .collect::<Vec<_>>()
        .join(", ")
}
