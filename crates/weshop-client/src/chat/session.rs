//! Per-order chat session.
//!
//! Owns the in-memory message sequence for one order: history is loaded once
//! at open, live frames append as they arrive, and every send goes out over
//! the socket (best-effort) and the durable HTTP write (always). Messages are
//! keyed by server-assigned id, so a socket echo of an HTTP-persisted send
//! never displays twice. A dropped socket stays dropped until the session is
//! reopened.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::debug;

use weshop_core::models::{Message, SenderRef, UserRecord};

use crate::error::ApiError;
use crate::http::ApiClient;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, WsMessage>;
type WsSource = SplitStream<WsStream>;

/// Inbound frame shape on the chat socket.
#[derive(Debug, Deserialize)]
struct InboundFrame {
    message_id: i64,
    message: String,
    sender_id: i64,
    timestamp: DateTime<Utc>,
}

impl InboundFrame {
    fn into_message(self) -> Message {
        Message {
            id: self.message_id,
            sender: SenderRef::Id(self.sender_id),
            content: self.message,
            timestamp: self.timestamp,
            // Arriving in an open session means it is being viewed.
            is_read: true,
        }
    }
}

/// Outbound frame shape on the chat socket.
#[derive(Debug, Serialize)]
struct OutboundFrame<'a> {
    message: &'a str,
    sender_id: i64,
}

/// Live-channel event surfaced to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A new message was appended to the sequence.
    Message(Message),
    /// The socket closed; realtime delivery has stopped for this session.
    Closed,
}

/// Message sequence and transports for one order's chat.
#[derive(Debug)]
pub struct ChatSession {
    api: Arc<ApiClient>,
    order_id: i64,
    sender_id: i64,
    participants: Vec<UserRecord>,
    messages: Vec<Message>,
    seen: HashSet<i64>,
    events: mpsc::UnboundedReceiver<ChatEvent>,
    /// Keeps the event channel open while the session lives, so
    /// [`ChatSession::next_event`] pends (rather than ending) when the
    /// socket is down.
    _events_tx: mpsc::UnboundedSender<ChatEvent>,
    out_tx: Option<mpsc::UnboundedSender<WsMessage>>,
    reader: Option<tokio::task::JoinHandle<()>>,
    live: Arc<AtomicBool>,
}

impl ChatSession {
    /// Open a chat session for an order: load history, then attach the live
    /// socket. A socket connection failure is not fatal; the session carries
    /// on with durable HTTP delivery only.
    pub async fn open(
        api: Arc<ApiClient>,
        order_id: i64,
        sender_id: i64,
    ) -> Result<Self, ApiError> {
        let conversation = api.conversation_for_order(order_id).await?;
        let seen = conversation.messages.iter().map(|m| m.id).collect();

        let (events_tx, events) = mpsc::unbounded_channel();
        let events_keepalive = events_tx.clone();
        let live = Arc::new(AtomicBool::new(false));

        let ws_url = api.config().chat_ws_url(order_id);
        let (out_tx, reader) = match connect_async(ws_url.as_str()).await {
            Ok((stream, _)) => {
                let (sink, source) = stream.split();
                let (out_tx, out_rx) = mpsc::unbounded_channel();
                live.store(true, Ordering::SeqCst);
                // The writer runs detached: it ends on its own once the
                // session drops its sender, closing the socket on the way out.
                let _writer = spawn_writer(sink, out_rx, Arc::clone(&live));
                let reader =
                    spawn_reader(source, out_tx.clone(), events_tx, Arc::clone(&live));
                (Some(out_tx), Some(reader))
            }
            Err(e) => {
                debug!(error = %e, order_id, "chat socket unavailable, durable delivery only");
                (None, None)
            }
        };

        Ok(Self {
            api,
            order_id,
            sender_id,
            participants: conversation.participants,
            messages: conversation.messages,
            seen,
            events,
            _events_tx: events_keepalive,
            out_tx,
            reader,
            live,
        })
    }

    /// The order this session is scoped to.
    pub const fn order_id(&self) -> i64 {
        self.order_id
    }

    /// Conversation participants from the history load.
    pub fn participants(&self) -> &[UserRecord] {
        &self.participants
    }

    /// The message sequence: history order, then live arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether the realtime channel is currently open.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Send a message: best-effort over the live channel when open (failures
    /// are silent), and always via the durable HTTP write (failures surface).
    pub async fn send(&mut self, content: &str) -> Result<(), ApiError> {
        self.send_realtime(content);
        let conversation = self.api.send_chat_message(self.order_id, content).await?;
        for message in conversation.messages {
            self.apply(message);
        }
        Ok(())
    }

    /// Wait for the next live-channel event, folding new messages into the
    /// sequence. Duplicates of already-known messages are skipped. Pends
    /// indefinitely while the socket is down; callers typically `select!`
    /// over this alongside their other input sources.
    pub async fn next_event(&mut self) -> Option<ChatEvent> {
        loop {
            match self.events.recv().await? {
                ChatEvent::Message(message) => {
                    if self.apply(message.clone()) {
                        return Some(ChatEvent::Message(message));
                    }
                }
                ChatEvent::Closed => return Some(ChatEvent::Closed),
            }
        }
    }

    /// Fold any pending live-channel events into the sequence without
    /// waiting. Returns how many new messages were applied.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            if let ChatEvent::Message(message) = event {
                if self.apply(message) {
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Close the realtime channel. History and durable sends keep working.
    pub fn close(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        // Dropping the sender ends the writer task, which closes the socket.
        self.out_tx = None;
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }

    fn apply(&mut self, message: Message) -> bool {
        if self.seen.insert(message.id) {
            self.messages.push(message);
            true
        } else {
            false
        }
    }

    fn send_realtime(&mut self, content: &str) {
        if !self.is_live() {
            return;
        }
        let frame = OutboundFrame {
            message: content,
            sender_id: self.sender_id,
        };
        match serde_json::to_string(&frame) {
            Ok(text) => {
                let closed = self
                    .out_tx
                    .as_ref()
                    .is_none_or(|tx| tx.send(WsMessage::Text(text.into())).is_err());
                if closed {
                    self.live.store(false, Ordering::SeqCst);
                }
            }
            Err(e) => debug!(error = %e, "failed to encode realtime frame"),
        }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}

/// Read loop: parse inbound frames into events, answer pings, and report the
/// close. Events sent after the session dropped land in a closed channel and
/// vanish.
fn spawn_reader(
    mut source: WsSource,
    out_tx: mpsc::UnboundedSender<WsMessage>,
    events: mpsc::UnboundedSender<ChatEvent>,
    live: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = source.next().await {
            match frame {
                Ok(WsMessage::Text(text)) => {
                    match serde_json::from_str::<InboundFrame>(text.as_str()) {
                        Ok(inbound) => {
                            if events.send(ChatEvent::Message(inbound.into_message())).is_err() {
                                break;
                            }
                        }
                        Err(e) => debug!(error = %e, "ignoring malformed chat frame"),
                    }
                }
                Ok(WsMessage::Ping(payload)) => {
                    let _ = out_tx.send(WsMessage::Pong(payload));
                }
                Ok(WsMessage::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "chat socket error");
                    break;
                }
            }
        }
        live.store(false, Ordering::SeqCst);
        let _ = events.send(ChatEvent::Closed);
    })
}

/// Write loop: forward queued frames to the socket, then close it when the
/// session drops its sender.
fn spawn_writer(
    mut sink: WsSink,
    mut out_rx: mpsc::UnboundedReceiver<WsMessage>,
    live: Arc<AtomicBool>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = out_rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
        live.store(false, Ordering::SeqCst);
        let _ = sink.close().await;
    })
}
