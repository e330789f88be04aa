//! Shop subcommands: browsing, creation, and the verification pipeline.

use std::io::{self, Write};
use std::sync::Arc;

use weshop_client::{ApiClient, NewShop, ShopDocuments, ShopVerdict};
use weshop_core::models::VerificationStatus;

use crate::render;

/// Shop subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum ShopAction {
    /// List all shops.
    List,
    /// Show one shop.
    Show { id: i64 },
    /// Create a shop (sellers only).
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Pay the one-time join fee for your shop.
    JoinPayment,
    /// Submit business documents for verification.
    Documents {
        id: i64,
        #[arg(long)]
        license_number: Option<String>,
        #[arg(long)]
        tax_id: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Record a verification decision (admins only).
    Verify {
        id: i64,
        /// New status, e.g. "verified" or "rejected".
        #[arg(long)]
        status: VerificationStatus,
        #[arg(long)]
        reason: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Execute a shop subcommand.
pub async fn run(action: ShopAction, api: &Arc<ApiClient>) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        ShopAction::List => {
            for shop in api.shops().await? {
                writeln!(out, "{}", render::shop_line(&shop))?;
            }
        }
        ShopAction::Show { id } => {
            let shop = api.shop(id).await?;
            writeln!(out, "{}", render::shop_line(&shop))?;
            if !shop.description.is_empty() {
                writeln!(out, "{}", shop.description)?;
            }
            writeln!(out, "Documents complete: {}", shop.documents_complete)?;
            if !shop.rejection_reason.is_empty() {
                writeln!(out, "Rejection reason: {}", shop.rejection_reason)?;
            }
        }
        ShopAction::Create { name, description } => {
            let shop = api.create_shop(&NewShop { name, description }).await?;
            writeln!(out, "Created shop #{} ({})", shop.id, shop.verification_status)?;
        }
        ShopAction::JoinPayment => {
            let receipt = api.pay_join_fee().await?;
            writeln!(out, "{}", receipt.message)?;
            writeln!(out, "Shop status: {}", receipt.shop_status)?;
        }
        ShopAction::Documents {
            id,
            license_number,
            tax_id,
            address,
            phone,
            email,
        } => {
            let documents = ShopDocuments {
                business_license_number: license_number,
                tax_id,
                business_address: address,
                business_phone: phone,
                business_email: email,
            };
            let shop = api.upload_shop_documents(id, &documents).await?;
            writeln!(out, "Documents submitted; shop is now {}", shop.verification_status)?;
        }
        ShopAction::Verify {
            id,
            status,
            reason,
            notes,
        } => {
            let verdict = ShopVerdict {
                verification_status: status,
                rejection_reason: reason,
                verification_notes: notes,
            };
            let shop = api.verify_shop(id, &verdict).await?;
            writeln!(out, "Shop #{} is now {}", shop.id, shop.verification_status)?;
        }
    }
    Ok(())
}
