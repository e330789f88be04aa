//! Plain-text rendering for listings.

use std::collections::HashMap;

use weshop_core::models::{Conversation, Message, Notification, Order, Product, Shop};

/// One-line shop summary.
pub fn shop_line(shop: &Shop) -> String {
    let fee = if shop.joined_fee_paid { "fee paid" } else { "fee due" };
    format!(
        "#{} {} [{}] owner: {} ({fee})",
        shop.id, shop.name, shop.verification_status, shop.owner_username
    )
}

/// One-line product summary.
pub fn product_line(product: &Product) -> String {
    format!(
        "#{} {} - {} ({}, stock {}) @ {}",
        product.id,
        product.name,
        product.price,
        product.category,
        product.stock_quantity,
        product.shop_name
    )
}

/// One-line order summary.
pub fn order_line(order: &Order) -> String {
    format!(
        "#{} {} x{} = {} [{}] buyer: {}",
        order.id,
        order.product_name,
        order.quantity,
        order.total_price,
        order.status,
        order.buyer_username
    )
}

/// One-line notification summary.
pub fn notification_line(notification: &Notification) -> String {
    let marker = if notification.is_read { " " } else { "*" };
    format!("{marker} #{} {}", notification.id, notification.title)
}

/// One-line conversation summary with its unread count for the current user.
pub fn conversation_line(conversation: &Conversation, unread: usize) -> String {
    let names: Vec<&str> = conversation
        .participants
        .iter()
        .map(|p| p.username.as_str())
        .collect();
    format!(
        "order #{}: {} ({} messages, {unread} unread)",
        conversation.order_id,
        names.join(", "),
        conversation.messages.len()
    )
}

/// Render a chat message with the sender resolved to a username when known.
pub fn message_line(message: &Message, names: &HashMap<i64, String>) -> String {
    let sender_id = message.sender_id();
    let sender = names
        .get(&sender_id)
        .cloned()
        .unwrap_or_else(|| format!("user {sender_id}"));
    format!(
        "[{}] {}: {}",
        message.timestamp.format("%H:%M:%S"),
        sender,
        message.content
    )
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use weshop_core::models::{OrderStatus, SenderRef, VerificationStatus};

    #[test]
    fn shop_line_shows_status_and_owner() {
        let shop = Shop {
            id: 3,
            name: "Tech Shop".into(),
            description: String::new(),
            owner: 2,
            owner_username: "bob".into(),
            business_license_number: String::new(),
            tax_id: String::new(),
            business_address: String::new(),
            business_phone: String::new(),
            business_email: String::new(),
            joined_fee_paid: true,
            verification_status: VerificationStatus::Verified,
            is_verified: true,
            documents_complete: true,
            rejection_reason: String::new(),
            verified_at: None,
            created_at: None,
        };
        assert_eq!(shop_line(&shop), "#3 Tech Shop [verified] owner: bob (fee paid)");
    }

    #[test]
    fn order_line_shows_totals() {
        let order = Order {
            id: 1,
            buyer: 1,
            buyer_username: "alice".into(),
            product: 8,
            product_name: "Mug".into(),
            shop_name: "Tech".into(),
            quantity: 2,
            total_price: Decimal::new(2000, 2),
            status: OrderStatus::Pending,
            buyer_phone: String::new(),
            buyer_message: String::new(),
            created_at: None,
        };
        assert_eq!(order_line(&order), "#1 Mug x2 = 20.00 [pending] buyer: alice");
    }

    #[test]
    fn message_line_falls_back_to_user_id() {
        let message = Message {
            id: 1,
            sender: SenderRef::Id(9),
            content: "hello".into(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 2, 3).single().unwrap(),
            is_read: true,
        };
        let line = message_line(&message, &HashMap::new());
        assert_eq!(line, "[10:02:03] user 9: hello");
    }
}
