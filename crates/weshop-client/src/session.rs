//! Session lifecycle: bootstrap, login, register, logout.
//!
//! The manager starts in `Initializing` so callers can tell "not yet
//! bootstrapped" apart from "logged out", then settles into `Anonymous` or
//! `Authenticated` based on what the token store holds.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use weshop_core::TokenStore;
use weshop_core::models::{RegisterPayload, UserRecord};

use crate::error::{ApiError, FieldErrors};
use crate::http::ApiClient;

/// Authentication state of the application.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Startup state; the token store has not been consulted yet.
    Initializing,
    /// No valid credentials.
    Anonymous,
    /// Logged in as the given user.
    Authenticated(UserRecord),
}

/// Result of a login attempt. Never an `Err`: failures carry the first
/// server-reported message so callers can render it directly.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Success(UserRecord),
    Rejected(String),
}

/// Result of a registration attempt; failures carry the full field-keyed
/// error payload for per-field rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    Success(UserRecord),
    Rejected(FieldErrors),
}

/// Identity and auth actions for the rest of the application.
#[derive(Debug)]
pub struct SessionManager {
    api: Arc<ApiClient>,
    store: Arc<TokenStore>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    /// Create a manager over the given client. The state is `Initializing`
    /// until [`SessionManager::initialize`] runs.
    pub fn new(api: Arc<ApiClient>) -> Self {
        let store = Arc::clone(api.store());
        Self {
            api,
            store,
            state: RwLock::new(SessionState::Initializing),
        }
    }

    /// Bootstrap auth state from the token store: a stored user plus access
    /// token means `Authenticated`, anything less means `Anonymous`.
    pub fn initialize(&self) -> SessionState {
        let snapshot = self.store.read();
        let next = match (snapshot.user, snapshot.access_token) {
            (Some(user), Some(_)) => SessionState::Authenticated(user),
            _ => SessionState::Anonymous,
        };
        *self.state_mut() = next.clone();
        next
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// The logged-in user, if any.
    pub fn current_user(&self) -> Option<UserRecord> {
        match self.state() {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether the session is authenticated.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), SessionState::Authenticated(_))
    }

    /// Log in with username and password. On success the token pair and user
    /// are persisted together and the state becomes `Authenticated`.
    pub async fn login(&self, username: &str, password: &str) -> LoginOutcome {
        match self.api.login(username, password).await {
            Ok(grant) => {
                if let Err(e) = self.store.save(grant.token_pair(), grant.user.clone()) {
                    warn!(error = %e, "failed to persist session");
                }
                info!(username = %grant.user.username, "logged in");
                *self.state_mut() = SessionState::Authenticated(grant.user.clone());
                LoginOutcome::Success(grant.user)
            }
            Err(e) => LoginOutcome::Rejected(login_error_message(&e)),
        }
    }

    /// Register a new account. A successful registration logs the user in.
    pub async fn register(&self, payload: &RegisterPayload) -> RegisterOutcome {
        match self.api.register(payload).await {
            Ok(grant) => {
                if let Err(e) = self.store.save(grant.token_pair(), grant.user.clone()) {
                    warn!(error = %e, "failed to persist session");
                }
                info!(username = %grant.user.username, "registered");
                *self.state_mut() = SessionState::Authenticated(grant.user.clone());
                RegisterOutcome::Success(grant.user)
            }
            Err(ApiError::Validation(fields)) => RegisterOutcome::Rejected(fields),
            Err(e) => {
                let mut fields = FieldErrors::new();
                fields.insert("non_field_errors".into(), vec![e.to_string()]);
                RegisterOutcome::Rejected(fields)
            }
        }
    }

    /// Clear the stored session and become `Anonymous`. No network call;
    /// always succeeds.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear session store");
        }
        *self.state_mut() = SessionState::Anonymous;
        info!("logged out");
    }

    fn state_mut(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn login_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Validation(_) => error.first_message(),
        ApiError::Api { .. } | ApiError::SessionExpired => "Invalid credentials".into(),
        _ => "Login failed".into(),
    }
}
