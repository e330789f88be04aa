//! Product subcommands: catalog browsing, seller CRUD, and comments.

use std::io::{self, Write};
use std::sync::Arc;

use rust_decimal::Decimal;

use weshop_client::{ApiClient, NewComment, NewProduct, ProductFilter};
use weshop_core::models::Category;

use crate::render;

/// Product subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum ProductAction {
    /// List products, optionally filtered.
    List {
        #[arg(long)]
        shop: Option<i64>,
        #[arg(long)]
        category: Option<Category>,
    },
    /// Show one product.
    Show { id: i64 },
    /// Create a product (verified sellers only).
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        price: Decimal,
        #[arg(short, long, default_value_t = 0)]
        stock: u32,
        #[arg(short, long, default_value = "other")]
        category: Category,
    },
    /// Replace a product's listing fields.
    Update {
        id: i64,
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        price: Decimal,
        #[arg(short, long, default_value_t = 0)]
        stock: u32,
        #[arg(short, long, default_value = "other")]
        category: Category,
    },
    /// Delete a product listing.
    Delete { id: i64 },
    /// List comments on a product.
    Comments { id: i64 },
    /// Leave a comment on a product.
    Comment {
        id: i64,
        #[arg(short, long)]
        content: String,
        /// Rating from 1 to 5.
        #[arg(short, long, default_value_t = 5)]
        rating: u8,
    },
}

/// Execute a product subcommand.
pub async fn run(action: ProductAction, api: &Arc<ApiClient>) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        ProductAction::List { shop, category } => {
            let filter = ProductFilter { shop, category };
            for product in api.products(&filter).await? {
                writeln!(out, "{}", render::product_line(&product))?;
            }
        }
        ProductAction::Show { id } => {
            let product = api.product(id).await?;
            writeln!(out, "{}", render::product_line(&product))?;
            if !product.description.is_empty() {
                writeln!(out, "{}", product.description)?;
            }
        }
        ProductAction::Create {
            name,
            description,
            price,
            stock,
            category,
        } => {
            let product = api
                .create_product(&NewProduct {
                    name,
                    description,
                    price,
                    stock_quantity: stock,
                    category,
                })
                .await?;
            writeln!(out, "Created product #{}", product.id)?;
        }
        ProductAction::Update {
            id,
            name,
            description,
            price,
            stock,
            category,
        } => {
            let product = api
                .update_product(
                    id,
                    &NewProduct {
                        name,
                        description,
                        price,
                        stock_quantity: stock,
                        category,
                    },
                )
                .await?;
            writeln!(out, "Updated product #{}", product.id)?;
        }
        ProductAction::Delete { id } => {
            api.delete_product(id).await?;
            writeln!(out, "Deleted product #{id}")?;
        }
        ProductAction::Comments { id } => {
            for comment in api.product_comments(id).await? {
                writeln!(
                    out,
                    "{} ({}/5): {}",
                    comment.user.username, comment.rating, comment.content
                )?;
            }
        }
        ProductAction::Comment {
            id,
            content,
            rating,
        } => {
            let comment = api
                .comment_on_product(id, &NewComment { content, rating })
                .await?;
            writeln!(out, "Comment #{} posted", comment.id)?;
        }
    }
    Ok(())
}
