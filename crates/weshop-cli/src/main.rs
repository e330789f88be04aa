//! WeShop CLI
//!
//! Command-line storefront for the WeShop marketplace. Auth state persists
//! under `~/.weshop/` between invocations; every command talks to the REST
//! API, and `chat open` additionally attaches the order's WebSocket channel.

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use weshop_cli::{auth_cmd, chat_cmd, notification_cmd, order_cmd, product_cmd, shop_cmd};
use weshop_client::{ApiClient, SessionManager};
use weshop_core::{ApiConfig, TokenStore, tracing_init};

#[derive(Parser, Debug)]
#[command(name = "weshop")]
#[command(version, about = "WeShop marketplace CLI", long_about = None)]
struct Cli {
    /// API base URL (e.g. "http://127.0.0.1:8000/api")
    #[arg(long, env = "WESHOP_API_BASE")]
    api_base: Option<String>,

    /// Emit structured JSON log lines instead of the human-readable format
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Account and session management
    Auth {
        #[command(subcommand)]
        action: auth_cmd::AuthAction,
    },
    /// Browse and manage shops
    Shops {
        #[command(subcommand)]
        action: shop_cmd::ShopAction,
    },
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: product_cmd::ProductAction,
    },
    /// Place and track orders
    Orders {
        #[command(subcommand)]
        action: order_cmd::OrderAction,
    },
    /// Seller notifications
    Notifications {
        #[command(subcommand)]
        action: notification_cmd::NotificationAction,
    },
    /// Order chat
    Chat {
        #[command(subcommand)]
        action: chat_cmd::ChatAction,
    },
    /// Show or set the theme preference
    Theme { value: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_init::init_tracing("weshop=warn", cli.log_json);

    let config = cli.api_base.map_or_else(ApiConfig::from_env, ApiConfig::new);
    info!(base_url = %config.base_url, "starting weshop CLI");

    let store = Arc::new(TokenStore::open_default());
    let api = Arc::new(ApiClient::new(config, Arc::clone(&store))?);
    let session = SessionManager::new(Arc::clone(&api));
    session.initialize();

    match cli.command {
        Command::Auth { action } => auth_cmd::run(action, &session).await,
        Command::Shops { action } => shop_cmd::run(action, &api).await,
        Command::Products { action } => product_cmd::run(action, &api).await,
        Command::Orders { action } => order_cmd::run(action, &api).await,
        Command::Notifications { action } => notification_cmd::run(action, &api).await,
        Command::Chat { action } => chat_cmd::run(action, &api, &session).await,
        Command::Theme { value } => theme(&store, value),
    }
}

fn theme(store: &TokenStore, value: Option<String>) -> anyhow::Result<()> {
    let mut out = io::stdout();
    match value {
        Some(value) => {
            store.set_theme(&value)?;
            writeln!(out, "Theme set to {value}")?;
        }
        None => {
            let theme = store.theme().unwrap_or_else(|| "light".into());
            writeln!(out, "{theme}")?;
        }
    }
    Ok(())
}
