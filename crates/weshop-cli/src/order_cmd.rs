//! Order subcommands: placement, listing, and fulfillment.

use std::io::{self, Write};
use std::sync::Arc;

use weshop_client::{ApiClient, NewOrder};

use crate::render;

/// Order subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum OrderAction {
    /// List orders visible to you.
    List,
    /// Show one order.
    Show { id: i64 },
    /// Place an order (buyers only).
    Create {
        /// Product id.
        #[arg(short, long)]
        product: i64,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
        /// Contact phone for the seller.
        #[arg(long)]
        phone: Option<String>,
        /// Message to the seller.
        #[arg(long)]
        message: Option<String>,
    },
    /// Mark an order delivered (seller or admin).
    Fulfill { id: i64 },
}

/// Execute an order subcommand.
pub async fn run(action: OrderAction, api: &Arc<ApiClient>) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        OrderAction::List => {
            for order in api.orders().await? {
                writeln!(out, "{}", render::order_line(&order))?;
            }
        }
        OrderAction::Show { id } => {
            let order = api.order(id).await?;
            writeln!(out, "{}", render::order_line(&order))?;
            if !order.buyer_phone.is_empty() {
                writeln!(out, "Contact: {}", order.buyer_phone)?;
            }
            if !order.buyer_message.is_empty() {
                writeln!(out, "Message: {}", order.buyer_message)?;
            }
        }
        OrderAction::Create {
            product,
            quantity,
            phone,
            message,
        } => {
            let order = api
                .create_order(&NewOrder {
                    product,
                    quantity,
                    buyer_phone: phone,
                    buyer_message: message,
                })
                .await?;
            writeln!(out, "Placed order #{} ({})", order.id, order.total_price)?;
        }
        OrderAction::Fulfill { id } => {
            let order = api.fulfill_order(id).await?;
            writeln!(out, "Order #{} is now {}", order.id, order.status)?;
        }
    }
    Ok(())
}
