//! Seller notification subcommands.

use std::io::{self, Write};
use std::sync::Arc;

use weshop_client::ApiClient;

use crate::render;

/// Notification subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum NotificationAction {
    /// List your notifications (unread marked with *).
    List,
    /// Mark one notification as read.
    Read { id: i64 },
    /// Mark all notifications as read.
    ReadAll,
}

/// Execute a notification subcommand.
pub async fn run(action: NotificationAction, api: &Arc<ApiClient>) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match action {
        NotificationAction::List => {
            for notification in api.notifications().await? {
                writeln!(out, "{}", render::notification_line(&notification))?;
                if let Some(info) = &notification.order_info {
                    writeln!(
                        out,
                        "    order #{}: {} x{} ({})",
                        info.id, info.product_name, info.quantity, info.status
                    )?;
                }
            }
        }
        NotificationAction::Read { id } => {
            api.mark_notification_read(id).await?;
            writeln!(out, "Notification #{id} marked read")?;
        }
        NotificationAction::ReadAll => {
            api.mark_all_notifications_read().await?;
            writeln!(out, "All notifications marked read")?;
        }
    }
    Ok(())
}
