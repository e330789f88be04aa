//! Order chat: a realtime WebSocket channel combined with durable HTTP
//! persistence, plus the conversations listing.

mod api;
mod session;

pub use session::{ChatEvent, ChatSession};

use weshop_core::models::Conversation;

/// Count unread messages across conversations, ignoring the current user's
/// own messages. Computed client-side; the server does not report it.
pub fn unread_count(conversations: &[Conversation], me: i64) -> usize {
    conversations
        .iter()
        .flat_map(|c| &c.messages)
        .filter(|m| !m.is_read && m.sender_id() != me)
        .count()
}
