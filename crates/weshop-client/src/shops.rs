//! Shop endpoints: browsing, creation, and the verification pipeline.

use serde::{Deserialize, Serialize};

use weshop_core::models::{Shop, VerificationStatus};

use crate::error::ApiError;
use crate::http::ApiClient;

/// Payload for `POST /shops/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewShop {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Business profile submitted with `POST /shops/:id/documents/`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShopDocuments {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_email: Option<String>,
}

/// Admin decision for `POST /shops/:id/verify/`.
#[derive(Debug, Clone, Serialize)]
pub struct ShopVerdict {
    pub verification_status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_notes: Option<String>,
}

/// Response of `POST /shops/join-payment/`.
#[derive(Debug, Clone, Deserialize)]
pub struct JoinPaymentReceipt {
    pub message: String,
    pub shop_status: VerificationStatus,
    pub payment_status: bool,
}

#[derive(Debug, Deserialize)]
struct ShopEnvelope {
    shop: Shop,
}

impl ApiClient {
    /// List all shops.
    pub async fn shops(&self) -> Result<Vec<Shop>, ApiError> {
        self.get("/shops/").await
    }

    /// Get a single shop by id.
    pub async fn shop(&self, id: i64) -> Result<Shop, ApiError> {
        self.get(&format!("/shops/{id}/")).await
    }

    /// Create a shop for the current seller.
    pub async fn create_shop(&self, shop: &NewShop) -> Result<Shop, ApiError> {
        self.post("/shops/", &serde_json::to_value(shop)?).await
    }

    /// Pay the one-time join fee for the current seller's shop.
    pub async fn pay_join_fee(&self) -> Result<JoinPaymentReceipt, ApiError> {
        self.post_empty("/shops/join-payment/").await
    }

    /// Submit business documents for a shop under verification.
    pub async fn upload_shop_documents(
        &self,
        shop_id: i64,
        documents: &ShopDocuments,
    ) -> Result<Shop, ApiError> {
        let envelope: ShopEnvelope = self
            .post(
                &format!("/shops/{shop_id}/documents/"),
                &serde_json::to_value(documents)?,
            )
            .await?;
        Ok(envelope.shop)
    }

    /// Record an admin verification decision for a shop.
    pub async fn verify_shop(&self, shop_id: i64, verdict: &ShopVerdict) -> Result<Shop, ApiError> {
        let envelope: ShopEnvelope = self
            .post(
                &format!("/shops/{shop_id}/verify/"),
                &serde_json::to_value(verdict)?,
            )
            .await?;
        Ok(envelope.shop)
    }
}
