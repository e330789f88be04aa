//! Domain records for the marketplace REST API.
//!
//! Field names and enum values mirror the server's JSON wire format, so these
//! types deserialize straight from API responses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marketplace user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(Self::Buyer),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Authenticated user as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

/// Access/refresh token pair issued at login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Response body of `POST /login/` and `POST /register/`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: UserRecord,
    pub access: String,
    pub refresh: String,
}

impl AuthResponse {
    /// The token pair carried by this grant.
    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            access: self.access.clone(),
            refresh: self.refresh.clone(),
        }
    }
}

/// Registration payload for `POST /register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub role: Role,
}

/// Shop verification lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    DocumentsSubmitted,
    UnderReview,
    Verified,
    Rejected,
}

impl VerificationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::DocumentsSubmitted => "documents_submitted",
            Self::UnderReview => "under_review",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "documents_submitted" => Ok(Self::DocumentsSubmitted),
            "under_review" => Ok(Self::UnderReview),
            "verified" => Ok(Self::Verified),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown verification status: {other}")),
        }
    }
}

/// Seller shop record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shop {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub owner: i64,
    #[serde(default)]
    pub owner_username: String,
    #[serde(default)]
    pub business_license_number: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub business_address: String,
    #[serde(default)]
    pub business_phone: String,
    #[serde(default)]
    pub business_email: String,
    #[serde(default)]
    pub joined_fee_paid: bool,
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub documents_complete: bool,
    #[serde(default)]
    pub rejection_reason: String,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Product listing category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Books,
    Home,
    Sports,
    Beauty,
    Toys,
    Automotive,
    Food,
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Clothing => "clothing",
            Self::Books => "books",
            Self::Home => "home",
            Self::Sports => "sports",
            Self::Beauty => "beauty",
            Self::Toys => "toys",
            Self::Automotive => "automotive",
            Self::Food => "food",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electronics" => Ok(Self::Electronics),
            "clothing" => Ok(Self::Clothing),
            "books" => Ok(Self::Books),
            "home" => Ok(Self::Home),
            "sports" => Ok(Self::Sports),
            "beauty" => Ok(Self::Beauty),
            "toys" => Ok(Self::Toys),
            "automotive" => Ok(Self::Automotive),
            "food" => Ok(Self::Food),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub shop: i64,
    #[serde(default)]
    pub shop_name: String,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Buyer order record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub buyer: i64,
    #[serde(default)]
    pub buyer_username: String,
    pub product: i64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub shop_name: String,
    pub quantity: u32,
    pub total_price: Decimal,
    pub status: OrderStatus,
    #[serde(default)]
    pub buyer_phone: String,
    #[serde(default)]
    pub buyer_message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Notification category for seller/admin alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewOrder,
    OrderUpdate,
    PaymentReceived,
    ShopVerified,
    ShopRejected,
}

/// Order summary embedded in a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo {
    pub id: i64,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub buyer_username: String,
    #[serde(default)]
    pub buyer_phone: String,
    pub quantity: u32,
    pub total_price: Decimal,
    pub status: OrderStatus,
}

/// Seller notification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub notification_type: NotificationKind,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order_info: Option<OrderInfo>,
}

/// Product comment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub user: UserRecord,
    pub content: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Message sender, either a bare id (live socket frames) or a full user
/// record (history payloads).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SenderRef {
    Id(i64),
    User(UserRecord),
}

impl SenderRef {
    /// The sender's user id regardless of representation.
    pub fn id(&self) -> i64 {
        match self {
            Self::Id(id) => *id,
            Self::User(user) => user.id,
        }
    }
}

/// Chat message, normalized across history and socket delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender: SenderRef,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl Message {
    /// The sending user's id.
    pub fn sender_id(&self) -> i64 {
        self.sender.id()
    }
}

/// Order-scoped conversation with its message history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub order_id: i64,
    #[serde(default)]
    pub participants: Vec<UserRecord>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn role_roundtrip() {
        let json = serde_json::to_string(&Role::Seller).unwrap();
        assert_eq!(json, "\"seller\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn product_price_parses_from_string() {
        let json = r#"{
            "id": 3, "name": "Keyboard", "description": "",
            "price": "49.90", "shop": 1, "shop_name": "Tech",
            "stock_quantity": 12, "category": "electronics",
            "is_active": true, "created_at": "2024-05-01T10:00:00Z"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price.to_string(), "49.90");
        assert_eq!(product.category, Category::Electronics);
    }

    #[test]
    fn unknown_category_maps_to_other() {
        let category: Category = serde_json::from_str("\"gardening\"").unwrap();
        assert_eq!(category, Category::Other);
    }

    #[test]
    fn message_sender_accepts_bare_id() {
        let json = r#"{
            "id": 9, "sender": 4, "content": "hi",
            "timestamp": "2024-05-01T10:00:00Z", "is_read": true
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.sender_id(), 4);
    }

    #[test]
    fn message_sender_accepts_user_object() {
        let json = r#"{
            "id": 9,
            "sender": {"id": 4, "username": "alice", "role": "buyer"},
            "content": "hi",
            "timestamp": "2024-05-01T10:00:00Z"
        }"#;
        let message: Message = serde_json::from_str(json).unwrap();
        assert_eq!(message.sender_id(), 4);
        assert!(!message.is_read);
    }

    #[test]
    fn conversation_parses_history_payload() {
        let json = r#"{
            "id": 1, "order_id": 7,
            "participants": [
                {"id": 4, "username": "alice", "role": "buyer"},
                {"id": 5, "username": "bob", "role": "seller"}
            ],
            "messages": [
                {"id": 1, "sender": {"id": 4, "username": "alice", "role": "buyer"},
                 "content": "hello", "timestamp": "2024-05-01T10:00:00Z", "is_read": false}
            ],
            "created_at": "2024-05-01T09:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        }"#;
        let conversation: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(conversation.order_id, 7);
        assert_eq!(conversation.participants.len(), 2);
        assert_eq!(conversation.messages[0].sender_id(), 4);
    }

    #[test]
    fn verification_status_wire_names() {
        let status: VerificationStatus =
            serde_json::from_str("\"documents_submitted\"").unwrap();
        assert_eq!(status, VerificationStatus::DocumentsSubmitted);
        assert_eq!(status.to_string(), "documents_submitted");
    }

    #[test]
    fn auth_response_token_pair() {
        let json = r#"{
            "user": {"id": 1, "username": "alice", "role": "buyer"},
            "access": "A1", "refresh": "R1"
        }"#;
        let grant: AuthResponse = serde_json::from_str(json).unwrap();
        let pair = grant.token_pair();
        assert_eq!(pair.access, "A1");
        assert_eq!(pair.refresh, "R1");
    }
}
