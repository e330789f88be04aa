//! Product endpoints: catalog browsing, seller CRUD, and comments.

use rust_decimal::Decimal;
use serde::Serialize;

use weshop_core::models::{Category, Comment, Product};

use crate::error::ApiError;
use crate::http::ApiClient;

/// Optional catalog filters for `GET /products/`.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub shop: Option<i64>,
    pub category: Option<Category>,
}

impl ProductFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(shop) = self.shop {
            query.push(("shop", shop.to_string()));
        }
        if let Some(category) = self.category {
            query.push(("category", category.as_str().to_string()));
        }
        query
    }
}

/// Payload for `POST /products/` and `PUT /products/:id/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock_quantity: u32,
    pub category: Category,
}

/// Payload for `POST /products/:id/comments/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub content: String,
    pub rating: u8,
}

impl ApiClient {
    /// List products, optionally filtered by shop or category.
    pub async fn products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        self.get_query("/products/", &filter.query()).await
    }

    /// Get a single product by id.
    pub async fn product(&self, id: i64) -> Result<Product, ApiError> {
        self.get(&format!("/products/{id}/")).await
    }

    /// Create a product under the current seller's verified shop.
    pub async fn create_product(&self, product: &NewProduct) -> Result<Product, ApiError> {
        self.post("/products/", &serde_json::to_value(product)?).await
    }

    /// Replace a product's listing fields.
    pub async fn update_product(&self, id: i64, product: &NewProduct) -> Result<Product, ApiError> {
        self.put(&format!("/products/{id}/"), &serde_json::to_value(product)?)
            .await
    }

    /// Delete a product listing.
    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/products/{id}/")).await
    }

    /// List comments on a product.
    pub async fn product_comments(&self, product_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.get(&format!("/products/{product_id}/comments/")).await
    }

    /// Leave a comment on a product.
    pub async fn comment_on_product(
        &self,
        product_id: i64,
        comment: &NewComment,
    ) -> Result<Comment, ApiError> {
        self.post(
            &format!("/products/{product_id}/comments/"),
            &serde_json::to_value(comment)?,
        )
        .await
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_builds_no_query() {
        assert!(ProductFilter::default().query().is_empty());
    }

    #[test]
    fn filter_query_uses_wire_category() {
        let filter = ProductFilter {
            shop: Some(3),
            category: Some(Category::Electronics),
        };
        let query = filter.query();
        assert_eq!(query[0], ("shop", "3".to_string()));
        assert_eq!(query[1], ("category", "electronics".to_string()));
    }

    #[test]
    fn new_product_serializes_price_as_decimal_string() {
        let product = NewProduct {
            name: "Mug".into(),
            description: "Ceramic".into(),
            price: Decimal::new(1250, 2),
            stock_quantity: 5,
            category: Category::Home,
        };
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["price"], json!("12.50"));
    }
}
