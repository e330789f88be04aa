//! Chat subcommands: conversations listing and the interactive order chat.
//!
//! `chat open` multiplexes stdin lines with inbound socket events; every
//! submitted line goes out over the realtime channel (best-effort) and the
//! durable HTTP write.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use weshop_client::{ApiClient, ChatEvent, ChatSession, SessionManager, unread_count};
use weshop_core::models::UserRecord;

use crate::render;

/// Chat subcommand actions.
#[derive(clap::Subcommand, Debug)]
pub enum ChatAction {
    /// List your conversations with unread counts.
    List,
    /// Create (or fetch) the conversation for an order.
    Start { order_id: i64 },
    /// Open the interactive chat for an order.
    Open { order_id: i64 },
}

/// Execute a chat subcommand.
pub async fn run(
    action: ChatAction,
    api: &Arc<ApiClient>,
    session: &SessionManager,
) -> anyhow::Result<()> {
    match action {
        ChatAction::List => list(api, session).await,
        ChatAction::Start { order_id } => start(api, order_id).await,
        ChatAction::Open { order_id } => open(api, session, order_id).await,
    }
}

fn require_user(session: &SessionManager) -> anyhow::Result<UserRecord> {
    session
        .current_user()
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `weshop auth login` first."))
}

async fn list(api: &Arc<ApiClient>, session: &SessionManager) -> anyhow::Result<()> {
    let user = require_user(session)?;
    let conversations = api.conversations().await?;

    let mut out = io::stdout();
    for conversation in &conversations {
        let unread = unread_count(std::slice::from_ref(conversation), user.id);
        writeln!(out, "{}", render::conversation_line(conversation, unread))?;
    }
    writeln!(
        out,
        "{} unread total",
        unread_count(&conversations, user.id)
    )?;
    Ok(())
}

async fn start(api: &Arc<ApiClient>, order_id: i64) -> anyhow::Result<()> {
    let conversation = api.start_chat(order_id).await?;
    let mut out = io::stdout();
    writeln!(
        out,
        "Conversation #{} ready for order #{}",
        conversation.id, conversation.order_id
    )?;
    Ok(())
}

enum Step {
    Line(String),
    Event(ChatEvent),
    Eof,
}

async fn open(
    api: &Arc<ApiClient>,
    session: &SessionManager,
    order_id: i64,
) -> anyhow::Result<()> {
    let user = require_user(session)?;
    let mut chat = ChatSession::open(Arc::clone(api), order_id, user.id).await?;
    let names: HashMap<i64, String> = chat
        .participants()
        .iter()
        .map(|p| (p.id, p.username.clone()))
        .collect();

    let mut out = io::stdout();
    for message in chat.messages() {
        writeln!(out, "{}", render::message_line(message, &names))?;
    }
    if !chat.is_live() {
        writeln!(out, "(realtime channel unavailable; messages still send)")?;
    }
    writeln!(out, "Type a message and press Enter; /quit to leave.")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let step = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => Step::Line(line),
                None => Step::Eof,
            },
            event = chat.next_event() => event.map_or(Step::Eof, Step::Event),
        };

        match step {
            Step::Line(line) => {
                let text = line.trim();
                if text == "/quit" {
                    break;
                }
                if text.is_empty() {
                    continue;
                }
                if let Err(e) = chat.send(text).await {
                    writeln!(out, "Failed to send message: {e}")?;
                } else if let Some(sent) = chat.messages().last() {
                    writeln!(out, "{}", render::message_line(sent, &names))?;
                }
            }
            Step::Event(ChatEvent::Message(message)) => {
                writeln!(out, "{}", render::message_line(&message, &names))?;
            }
            Step::Event(ChatEvent::Closed) => {
                writeln!(out, "(realtime channel closed; messages still send)")?;
            }
            Step::Eof => break,
        }
    }

    chat.close();
    Ok(())
}
