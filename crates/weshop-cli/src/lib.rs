//! WeShop CLI Library
//!
//! Command-line storefront for the WeShop marketplace: auth, shops,
//! products, orders, notifications, and order chat.

pub mod auth_cmd;
pub mod chat_cmd;
pub mod notification_cmd;
pub mod order_cmd;
pub mod product_cmd;
pub mod render;
pub mod shop_cmd;
