//! Actor-per-connection for member and admin WebSockets.
//!
//! Each socket splits into a reader loop and a writer task fed by an mpsc
//! channel; any part of the system sends to a client by cloning the sender.
//! No idle timeout is imposed: a connection persists until the transport
//! reports closure.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::admin::commands;
use crate::identity::Identity;
use crate::state::AppState;
use crate::ws::broadcast;
use crate::ws::protocol::Outbound;

/// Run a team-member connection. Inbound text is free chat, broadcast to the
/// member's team as a `c:` line.
pub async fn run_member(socket: WebSocket, state: AppState, identity: Identity) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();

    let conn_id = state.registry.connect_member(&identity, tx.clone());
    // First connection from a new team opens its scoreboard entry at 0.
    state.scores.entry(identity.team).or_insert(0);

    tracing::info!(name = %identity.name, team = identity.team, "member actor started");

    let writer_handle = tokio::spawn(writer_task(ws_sender, rx));

    loop {
        match ws_receiver.next().await {
            Some(Ok(msg)) => match msg {
                Message::Text(text) => {
                    let line = format!("{}: {}", identity.name, text.as_str());
                    broadcast::broadcast_team(&state.registry, identity.team, &Outbound::Chat(line));
                }
                Message::Ping(data) => {
                    let _ = tx.send(Message::Pong(data));
                }
                Message::Close(frame) => {
                    tracing::debug!(name = %identity.name, reason = ?frame, "member initiated close");
                    break;
                }
                _ => {}
            },
            Some(Err(e)) => {
                tracing::warn!(name = %identity.name, team = identity.team, error = %e, "member receive error");
                break;
            }
            None => break,
        }
    }

    writer_handle.abort();

    // Remove from the registry before announcing the departure, so the team
    // broadcast never iterates over the dead handle. A displaced connection
    // removes nothing (its replacement holds the slot) and stays silent.
    let removed = state.registry.disconnect_member(&identity, conn_id);
    if removed {
        broadcast::broadcast_team(
            &state.registry,
            identity.team,
            &Outbound::Chat(format!("{} has disconnected", identity.name)),
        );
    }

    tracing::info!(name = %identity.name, team = identity.team, "member actor stopped");
}

/// Run the admin connection: each inbound text line is one command.
pub async fn run_admin(socket: WebSocket, state: AppState) {
    let (ws_sender, mut ws_receiver) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();

    state.registry.connect_admin(tx.clone());
    tracing::info!("admin actor started");

    let writer_handle = tokio::spawn(writer_task(ws_sender, rx));

    loop {
        match ws_receiver.next().await {
            Some(Ok(msg)) => match msg {
                Message::Text(text) => {
                    commands::handle_line(&state, text.as_str());
                }
                Message::Ping(data) => {
                    let _ = tx.send(Message::Pong(data));
                }
                Message::Close(frame) => {
                    tracing::debug!(reason = ?frame, "admin initiated close");
                    break;
                }
                _ => {}
            },
            Some(Err(e)) => {
                tracing::warn!(error = %e, "admin receive error");
                break;
            }
            None => break,
        }
    }

    writer_handle.abort();
    state.registry.disconnect_admin(&tx);
    tracing::info!("admin actor stopped");
}

/// Writer task: forwards mpsc messages to the WebSocket sink.
async fn writer_task(
    mut ws_sender: futures_util::stream::SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = rx.recv().await {
        if ws_sender.send(msg).await.is_err() {
            // WebSocket send failed — connection is broken
            break;
        }
    }
}
