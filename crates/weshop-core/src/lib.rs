//! WeShop Core Library
//!
//! Shared functionality for WeShop components:
//! - API endpoint configuration and WebSocket URL derivation
//! - Domain records mirroring the marketplace REST wire format
//! - Persistent token store shared by the HTTP client and chat transport
//! - Common error types

pub mod config;
pub mod error;
pub mod models;
pub mod token_store;
pub mod tracing_init;

pub use config::ApiConfig;
pub use error::{Error, Result};
pub use token_store::{StoredSession, TokenStore};
