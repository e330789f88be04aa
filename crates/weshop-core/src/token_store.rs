//! Persistent session storage.
//!
//! Holds the access/refresh token pair, the cached user record, and the theme
//! preference, mirrored to `~/.weshop/session.json` across runs. One store
//! instance is constructed at startup and shared by the HTTP client, the
//! session manager, and the chat transport; all fields change together under
//! a single lock, so a reader never observes a token without its user.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{TokenPair, UserRecord};

/// Persisted session fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoredSession {
    /// Short-lived credential attached to API requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Long-lived credential exchanged for new access tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Cached profile of the logged-in user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
    /// UI theme preference; survives logout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

/// Durable store for tokens and the cached user record.
#[derive(Debug)]
pub struct TokenStore {
    path: Option<PathBuf>,
    state: Mutex<StoredSession>,
}

impl TokenStore {
    /// Path to the session directory: `~/.weshop/`.
    pub fn session_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".weshop"))
    }

    /// Path to the session file: `~/.weshop/session.json`.
    pub fn session_path() -> Option<PathBuf> {
        Self::session_dir().map(|d| d.join("session.json"))
    }

    /// Open the store at the default path. Starts empty if the file doesn't
    /// exist or is invalid.
    pub fn open_default() -> Self {
        Self::session_path().map_or_else(Self::in_memory, Self::open)
    }

    /// Open a store backed by the given file.
    pub fn open(path: PathBuf) -> Self {
        let state = std::fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();
        Self {
            path: Some(path),
            state: Mutex::new(state),
        }
    }

    /// Open a store with no disk backing (tests, ephemeral sessions).
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(StoredSession::default()),
        }
    }

    /// Snapshot of the current session fields, all-absent if never set.
    pub fn read(&self) -> StoredSession {
        self.lock().clone()
    }

    /// Current access token, if any.
    pub fn access_token(&self) -> Option<String> {
        self.lock().access_token.clone()
    }

    /// Current refresh token, if any.
    pub fn refresh_token(&self) -> Option<String> {
        self.lock().refresh_token.clone()
    }

    /// Cached user record, if any.
    pub fn user(&self) -> Option<UserRecord> {
        self.lock().user.clone()
    }

    /// Stored theme preference, if any.
    pub fn theme(&self) -> Option<String> {
        self.lock().theme.clone()
    }

    /// Persist both tokens and the user record together.
    pub fn save(&self, pair: TokenPair, user: UserRecord) -> Result<()> {
        let mut state = self.lock();
        state.access_token = Some(pair.access);
        state.refresh_token = Some(pair.refresh);
        state.user = Some(user);
        self.persist(&state)
    }

    /// Replace only the access token (refresh cycle).
    pub fn set_access(&self, access: &str) -> Result<()> {
        let mut state = self.lock();
        state.access_token = Some(access.to_string());
        self.persist(&state)
    }

    /// Store the theme preference.
    pub fn set_theme(&self, theme: &str) -> Result<()> {
        let mut state = self.lock();
        state.theme = Some(theme.to_string());
        self.persist(&state)
    }

    /// Remove tokens and user record. Idempotent; the theme preference stays.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.lock();
        state.access_token = None;
        state.refresh_token = None;
        state.user = None;
        self.persist(&state)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoredSession> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn persist(&self, state: &StoredSession) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
