//! WeShop API Client Library
//!
//! Typed client for the marketplace REST API and the order chat WebSocket:
//! - bearer-token attachment with a single automatic refresh-and-retry on 401,
//!   funneling concurrent refreshes through one in-flight exchange
//! - session lifecycle (bootstrap, login, register, logout)
//! - per-order chat sessions combining a realtime socket with durable HTTP
//!   persistence

pub mod chat;
pub mod error;
pub mod http;
pub mod session;

mod auth;
mod notifications;
mod orders;
mod products;
mod shops;

pub use chat::{ChatEvent, ChatSession, unread_count};
pub use error::{ApiError, FieldErrors};
pub use http::ApiClient;
pub use notifications::StatusReply;
pub use orders::NewOrder;
pub use products::{NewComment, NewProduct, ProductFilter};
pub use session::{LoginOutcome, RegisterOutcome, SessionManager, SessionState};
pub use shops::{JoinPaymentReceipt, NewShop, ShopDocuments, ShopVerdict};
